use vecloom::builder::VecSink;
use vecloom::multi::MultiFeatureSpec;
use vecloom::spec::FeatureSpec;
use vecloom::transformers::Identity;

#[derive(Clone)]
struct Row {
    d: f64,
}

fn rows(values: &[f64]) -> Vec<Row> {
    values.iter().map(|d| Row { d: *d }).collect()
}

#[test]
fn multi_spec_routes_each_spec_into_its_own_output_vector() -> anyhow::Result<()> {
    let g0 = FeatureSpec::of().required(|r: &Row| r.d, Identity::new("id"))?;
    let g1 = FeatureSpec::of().required(|r: &Row| r.d, Identity::new("id2"))?;
    let multi = MultiFeatureSpec::new(vec![g0, g1])?;
    let extractor = multi.extract(rows(&[1.0, 2.0]));

    assert_eq!(extractor.num_groups(), 2);
    assert_eq!(extractor.feature_names()?, vec![vec!["id".to_string()], vec!["id2".to_string()]]);

    let values = extractor.feature_values(&VecSink::default())?;
    assert_eq!(values, vec![vec![vec![1.0], vec![1.0]], vec![vec![2.0], vec![2.0]]]);
    Ok(())
}

#[test]
fn multi_spec_width_per_group_equals_sum_of_that_groups_entries() -> anyhow::Result<()> {
    let g0 = FeatureSpec::of()
        .required(|r: &Row| r.d, Identity::new("a"))?
        .required(|r: &Row| r.d, Identity::new("b"))?;
    let g1 = FeatureSpec::of().required(|r: &Row| r.d, Identity::new("c"))?;
    let multi = MultiFeatureSpec::new(vec![g0, g1])?;
    let extractor = multi.extract(rows(&[1.0]));

    let names = extractor.feature_names()?;
    assert_eq!(names[0].len(), 2);
    assert_eq!(names[1].len(), 1);
    Ok(())
}

#[test]
fn a_crossing_declared_within_one_groups_spec_survives_bundling() -> anyhow::Result<()> {
    // A cross can only be declared between two names already present in the
    // same `FeatureSpec`, so bundling that spec as one multi-spec group
    // keeps both endpoints in that group by construction — there is no
    // public way to split a cross's endpoints across groups.
    let g0 = FeatureSpec::of()
        .required(|r: &Row| r.d, Identity::new("a"))?
        .required(|r: &Row| r.d, Identity::new("b"))?
        .cross("a", "b", |x, y| x + y)?;
    let g1 = FeatureSpec::of().required(|r: &Row| r.d, Identity::new("c"))?;
    let multi = MultiFeatureSpec::new(vec![g0, g1])?;
    let extractor = multi.extract(rows(&[2.0]));
    let names = extractor.feature_names()?;
    assert_eq!(names[0], vec!["a".to_string(), "b".to_string(), "a_x_b".to_string()]);
    Ok(())
}

#[test]
fn filter_prunes_entries_and_rebuilds_group_mapping() -> anyhow::Result<()> {
    let g0 = FeatureSpec::of()
        .required(|r: &Row| r.d, Identity::new("a"))?
        .required(|r: &Row| r.d, Identity::new("b"))?;
    let g1 = FeatureSpec::of().required(|r: &Row| r.d, Identity::new("c"))?;
    let multi = MultiFeatureSpec::new(vec![g0, g1])?;
    let filtered = multi.filter(|name| name != "b");
    let extractor = filtered.extract(rows(&[5.0]));
    assert_eq!(extractor.feature_names()?, vec![vec!["a".to_string()], vec!["c".to_string()]]);
    Ok(())
}
