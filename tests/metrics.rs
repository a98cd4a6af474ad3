#![cfg(feature = "metrics")]

use std::sync::Arc;

use vecloom::builder::VecSink;
use vecloom::metrics::ExtractionMetrics;
use vecloom::spec::FeatureSpec;
use vecloom::transformers::Identity;

#[derive(Clone)]
struct Row {
    x: Option<f64>,
}

#[test]
fn extractor_records_seen_and_skipped_counts_per_transformer() -> anyhow::Result<()> {
    let rows = vec![Row { x: Some(1.0) }, Row { x: None }, Row { x: Some(3.0) }];
    let metrics = Arc::new(ExtractionMetrics::new());
    let extractor = FeatureSpec::of()
        .optional(|r: &Row| r.x, None, Identity::new("x"))?
        .extract(rows)
        .with_metrics(metrics.clone());

    let _ = extractor.feature_values(&VecSink::default())?;

    let json = metrics.to_json();
    assert_eq!(json["x_seen"]["value"], serde_json::json!(2));
    assert_eq!(json["x_skipped"]["value"], serde_json::json!(1));
    assert!(json["reduce_duration_ms"]["value"].as_f64().unwrap() >= 0.0);
    Ok(())
}
