//! A small, always-compiled reference transformer set.
//!
//! Concrete transformer algorithms are external collaborators: the engine
//! never special-cases any of these. They exist
//! so the engine is exercisable end to end and so the worked scenarios
//! (identity pass-through, min-max over a known range, one-hot with
//! unseen-category handling during replay, crossing two one-hot blocks)
//! have a concrete [`crate::transformer::Transformer`] to run against.

mod bucketizer;
mod identity;
mod min_max;
mod one_hot;
mod standard;

pub use bucketizer::Bucketizer;
pub use identity::Identity;
pub use min_max::MinMaxScaler;
pub use one_hot::OneHotEncoder;
pub use standard::StandardScaler;

/// Delimiter used to join encoded fields. `f64::to_string` never produces
/// it, so the numeric list codec needs no escaping. [`one_hot::OneHotEncoder`]
/// percent-encodes it (and `%`) in each category before joining, since an
/// arbitrary category string may contain it.
pub(crate) const FIELD_SEP: char = ',';

pub(crate) fn encode_f64_list(values: &[f64]) -> String {
    values
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(&FIELD_SEP.to_string())
}

pub(crate) fn decode_f64_list(s: &str) -> anyhow::Result<Vec<f64>> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    s.split(FIELD_SEP)
        .map(|part| part.parse::<f64>().map_err(anyhow::Error::from))
        .collect()
}
