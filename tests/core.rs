use vecloom::builder::VecSink;
use vecloom::spec::FeatureSpec;
use vecloom::testing::assert_feature_vectors_equal;
use vecloom::transformers::{Identity, MinMaxScaler};

#[derive(Clone)]
struct Row {
    x: f64,
}

fn rows(values: &[f64]) -> Vec<Row> {
    values.iter().map(|x| Row { x: *x }).collect()
}

#[test]
fn identity_pass_through() -> anyhow::Result<()> {
    let extractor = FeatureSpec::of()
        .required(|r: &Row| r.x, Identity::new("id"))?
        .extract(rows(&[1.0, 2.0, 3.0]));

    assert_eq!(extractor.feature_names()?, vec!["id".to_string()]);
    let values = extractor.feature_values(&VecSink::default())?;
    assert_feature_vectors_equal(&values, &[vec![1.0], vec![2.0], vec![3.0]]);
    assert_eq!(extractor.feature_settings()?.matches("\"name\"").count(), 1);
    Ok(())
}

#[test]
fn min_max_over_a_known_range() -> anyhow::Result<()> {
    let extractor = FeatureSpec::of()
        .required(|r: &Row| r.x, MinMaxScaler::new("x"))?
        .extract(rows(&[0.0, 5.0, 10.0]));

    let values = extractor.feature_values(&VecSink::default())?;
    assert_feature_vectors_equal(&values, &[vec![0.0], vec![0.5], vec![1.0]]);

    let settings = extractor.feature_settings()?;
    let replayed = FeatureSpec::of()
        .required(|r: &Row| r.x, MinMaxScaler::new("x"))?
        .extract_with_settings(rows(&[0.0, 5.0, 10.0]), &settings)?;
    assert_feature_vectors_equal(&replayed.feature_values(&VecSink::default())?, &values);
    Ok(())
}

#[test]
fn width_agreement_holds_for_every_record() -> anyhow::Result<()> {
    let extractor = FeatureSpec::of()
        .required(|r: &Row| r.x, MinMaxScaler::new("x"))?
        .required(|r: &Row| r.x, Identity::new("raw_x"))?
        .extract(rows(&[1.0, 4.0, 9.0]));

    let dim = extractor.feature_dimension()?;
    assert_eq!(extractor.feature_names()?.len(), dim);
    for row in extractor.feature_values(&VecSink::default())? {
        assert_eq!(row.len(), dim);
    }
    Ok(())
}

#[test]
fn order_stability_across_repeated_extractions() -> anyhow::Result<()> {
    let build = || {
        FeatureSpec::of()
            .required(|r: &Row| r.x, Identity::new("x"))
            .unwrap()
            .required(|r: &Row| r.x, MinMaxScaler::new("scaled_x"))
            .unwrap()
    };
    let first = build().extract(rows(&[1.0, 2.0, 3.0]));
    let second = build().extract(rows(&[1.0, 2.0, 3.0]));
    assert_eq!(first.feature_names()?, second.feature_names()?);
    Ok(())
}
