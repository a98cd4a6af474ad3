use vecloom::builder::{FeatureBuilder, VecSink};
use vecloom::error::FeatureError;
use vecloom::spec::FeatureSpec;
use vecloom::transformers::{Identity, MinMaxScaler};

#[derive(Clone)]
struct Row {
    x: f64,
}

#[test]
fn malformed_settings_json_surfaces_as_an_error() {
    let err = FeatureSpec::of()
        .required(|r: &Row| r.x, Identity::new("x"))
        .unwrap()
        .extract_with_settings(vec![Row { x: 1.0 }], "not json")
        .unwrap_err();
    assert!(err.downcast_ref::<serde_json::Error>().is_some());
}

#[test]
fn settings_missing_a_declared_transformer_fails_at_replay() {
    let err = FeatureSpec::of()
        .required(|r: &Row| r.x, Identity::new("x"))
        .unwrap()
        .required(|r: &Row| r.x, MinMaxScaler::new("scaled"))
        .unwrap()
        .extract_with_settings(
            vec![Row { x: 1.0 }],
            r#"[{"name":"x","params":{},"aggregators":null}]"#,
        )
        .unwrap()
        .feature_dimension()
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<FeatureError>(),
        Some(&FeatureError::MissingSettings("scaled".to_string()))
    );
}

#[test]
fn decoder_rejects_a_malformed_encoded_aggregator_string() {
    let err = FeatureSpec::of()
        .required(|r: &Row| r.x, MinMaxScaler::new("x"))
        .unwrap()
        .extract_with_settings(
            vec![Row { x: 1.0 }],
            r#"[{"name":"x","params":{},"aggregators":"only_one_value"}]"#,
        )
        .unwrap()
        .feature_dimension()
        .unwrap_err();
    assert!(err.to_string().contains("rejected its settings"));
}

#[test]
fn empty_dataset_with_no_settings_fails_at_present() {
    let err = FeatureSpec::of()
        .required(|r: &Row| r.x, Identity::new("x"))
        .unwrap()
        .extract(Vec::<Row>::new())
        .feature_dimension()
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<FeatureError>(),
        Some(&FeatureError::EmptyAggregate)
    );
}

#[test]
fn empty_dataset_with_settings_succeeds_and_emits_no_records() -> anyhow::Result<()> {
    let settings = r#"[{"name":"x","params":{},"aggregators":null}]"#;
    let extractor = FeatureSpec::of()
        .required(|r: &Row| r.x, Identity::new("x"))?
        .extract_with_settings(Vec::<Row>::new(), settings)?;
    assert_eq!(extractor.feature_dimension()?, 1);
    assert!(extractor.feature_values(&VecSink::default())?.is_empty());
    Ok(())
}

#[test]
fn bulk_add_with_mismatched_lengths_fails_fast() {
    let mut sink = VecSink::default();
    sink.init(2);
    let err = sink
        .add_many(&["a".to_string()], &[1.0, 2.0])
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<FeatureError>(),
        Some(&FeatureError::MismatchedBulkAdd(1, 2))
    );
}
