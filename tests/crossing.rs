use vecloom::builder::VecSink;
use vecloom::spec::FeatureSpec;
use vecloom::transformers::OneHotEncoder;

#[derive(Clone)]
struct Row {
    color: String,
    size: String,
}

fn rows() -> Vec<Row> {
    vec![
        Row { color: "red".to_string(), size: "s".to_string() },
        Row { color: "blue".to_string(), size: "m".to_string() },
        Row { color: "red".to_string(), size: "l".to_string() },
    ]
}

#[test]
fn crossing_two_one_hot_blocks_grows_by_the_product_of_their_widths() -> anyhow::Result<()> {
    // "color" learns {blue, red} (width 2), "size" learns {l, m, s} (width 3).
    let extractor = FeatureSpec::of()
        .required(|r: &Row| r.color.clone(), OneHotEncoder::new("color"))?
        .required(|r: &Row| r.size.clone(), OneHotEncoder::new("size"))?
        .cross("color", "size", |a, b| a * b)?
        .extract(rows());

    assert_eq!(extractor.feature_dimension()?, 2 + 3 + 6);

    let names = extractor.feature_names()?;
    // Cross block follows both single-transformer blocks, left-major.
    assert_eq!(&names[5..], &[
        "color_blue_x_size_l",
        "color_blue_x_size_m",
        "color_blue_x_size_s",
        "color_red_x_size_l",
        "color_red_x_size_m",
        "color_red_x_size_s",
    ]);
    Ok(())
}

#[test]
fn cross_cell_value_is_the_outer_product_under_the_declared_combiner() -> anyhow::Result<()> {
    let extractor = FeatureSpec::of()
        .required(|r: &Row| r.color.clone(), OneHotEncoder::new("color"))?
        .required(|r: &Row| r.size.clone(), OneHotEncoder::new("size"))?
        .cross("color", "size", |a, b| a * b)?
        .extract(rows());

    let values = extractor.feature_values(&VecSink::default())?;
    // Row 0: color=red (one-hot [0,1]), size=s (one-hot [0,0,1]).
    // Cross block left-major: blue_x_l, blue_x_m, blue_x_s, red_x_l, red_x_m, red_x_s.
    assert_eq!(&values[0][5..], &[0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
    Ok(())
}

#[test]
fn cross_block_is_skipped_whole_when_either_side_is_unseen_on_replay() -> anyhow::Result<()> {
    let fitted = FeatureSpec::of()
        .required(|r: &Row| r.color.clone(), OneHotEncoder::new("color"))?
        .required(|r: &Row| r.size.clone(), OneHotEncoder::new("size"))?
        .cross("color", "size", |a, b| a * b)?
        .extract(rows());
    let settings = fitted.feature_settings()?;

    let replay_rows = vec![Row { color: "purple".to_string(), size: "s".to_string() }];
    let replayed = FeatureSpec::of()
        .required(|r: &Row| r.color.clone(), OneHotEncoder::new("color"))?
        .required(|r: &Row| r.size.clone(), OneHotEncoder::new("size"))?
        .cross("color", "size", |a, b| a * b)?
        .extract_with_settings(replay_rows, &settings)?;

    let values = replayed.feature_values(&VecSink::default())?;
    // color block (unseen "purple") skips entirely; its cross block must too.
    assert!(values[0][0..2].iter().all(|v| v.is_nan()));
    assert!(values[0][5..].iter().all(|v| v.is_nan()));
    Ok(())
}
