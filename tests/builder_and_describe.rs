use vecloom::builder::{FeatureBuilder, FeatureSink, VecSink};
use vecloom::spec::FeatureSpec;
use vecloom::transformers::{Bucketizer, Identity, MinMaxScaler};

#[derive(Clone)]
struct Row {
    x: f64,
}

#[test]
fn vec_sink_new_builder_is_independent_of_the_prototype() {
    let mut proto = VecSink::default();
    proto.init(1);
    proto.add("a", 1.0);

    let mut fresh = proto.new_builder();
    fresh.init(1);
    fresh.add("a", 9.0);

    assert_eq!(proto.result(), vec![1.0]);
    assert_eq!(fresh.result(), vec![9.0]);
}

#[test]
fn describe_lists_one_line_per_entry_and_crossing() -> anyhow::Result<()> {
    let set = FeatureSpec::of()
        .required(|r: &Row| r.x, Bucketizer::new("bucket", 4))?
        .required(|r: &Row| r.x, Identity::new("raw"))?
        .cross("bucket", "raw", |a, b| a * b)?
        .build();
    let lines = set.describe();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("bucket"));
    assert!(lines[0].contains("n_buckets=4"));
    assert!(lines[2].contains("bucket x raw"));
    Ok(())
}

#[test]
fn feature_set_len_and_names_reflect_declaration_order() -> anyhow::Result<()> {
    let set = FeatureSpec::of()
        .required(|r: &Row| r.x, Identity::new("a"))?
        .required(|r: &Row| r.x, MinMaxScaler::new("b"))?
        .build();
    assert_eq!(set.len(), 2);
    assert!(!set.is_empty());
    assert_eq!(set.names(), vec!["a", "b"]);
    Ok(())
}
