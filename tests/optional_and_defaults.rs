use vecloom::builder::VecSink;
use vecloom::spec::FeatureSpec;
use vecloom::transformers::Identity;

#[derive(Clone)]
struct Row {
    x: Option<f64>,
}

#[test]
fn optional_field_substitutes_its_default_when_missing() -> anyhow::Result<()> {
    let rows = vec![Row { x: Some(2.0) }, Row { x: None }, Row { x: Some(4.0) }];
    let extractor = FeatureSpec::of()
        .optional(|r: &Row| r.x, Some(0.0), Identity::new("x"))?
        .extract(rows);

    let values = extractor.feature_values(&VecSink::default())?;
    assert_eq!(values, vec![vec![2.0], vec![0.0], vec![4.0]]);
    Ok(())
}

#[test]
fn optional_field_with_no_default_emits_a_skip() -> anyhow::Result<()> {
    let rows = vec![Row { x: Some(2.0) }, Row { x: None }, Row { x: Some(4.0) }];
    let extractor = FeatureSpec::of()
        .optional(|r: &Row| r.x, None, Identity::new("x"))?
        .extract(rows);

    let values = extractor.feature_values(&VecSink::default())?;
    assert_eq!(values[0], vec![2.0]);
    assert!(values[1][0].is_nan());
    assert_eq!(values[2], vec![4.0]);
    Ok(())
}

#[test]
fn missing_records_do_not_participate_in_aggregation() -> anyhow::Result<()> {
    use vecloom::transformers::MinMaxScaler;

    // Only the `Some` records should shape the learned range: if the
    // `None` record participated it would have to be imputed with *some*
    // numeric value first, which optional/default semantics never do.
    let rows = vec![Row { x: Some(10.0) }, Row { x: None }, Row { x: Some(20.0) }];
    let extractor = FeatureSpec::of()
        .optional(|r: &Row| r.x, None, MinMaxScaler::new("x"))?
        .extract(rows);

    let values = extractor.feature_values(&VecSink::default())?;
    assert_eq!(values[0], vec![0.0]);
    assert!(values[1][0].is_nan());
    assert_eq!(values[2], vec![1.0]);
    Ok(())
}
