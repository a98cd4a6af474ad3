//! Stable error discriminants for the parts of the engine that cross a
//! component boundary (spec construction, settings decode, replay).
//!
//! Everything else propagates as a plain `anyhow::Error` — transformer
//! runtime failures (arithmetic domain violations, empty-monoid-at-present)
//! are the transformer's own `anyhow::Result`, and the engine never
//! downgrades or wraps them further.

use std::fmt;

/// Named error kinds from the spec-construction and settings-replay paths.
///
/// Matched by discriminant rather than by parsing `Display` output; wrap
/// in `anyhow::Error` (via `From`) to cross a fallible boundary alongside
/// ordinary `anyhow!`/`bail!` errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureError {
    /// Two entries (or two specs being combined) declared the same transformer name.
    DuplicateName(String),
    /// A `cross` declaration referenced a name not present in the spec.
    UnknownCrossName(String),
    /// `combine` was called with zero specs.
    EmptyCombine,
    /// A cross's two endpoints were assigned to different multi-spec groups.
    CrossGroupMismatch(String, String),
    /// Settings JSON did not contain an entry for a declared transformer.
    MissingSettings(String),
    /// A transformer's `decode_aggregator` rejected its encoded string.
    SettingsDecode(String, String),
    /// The dataset had zero records and no settings were supplied to replay from.
    EmptyAggregate,
    /// `add(names, values)` was called with mismatched lengths.
    MismatchedBulkAdd(usize, usize),
}

impl fmt::Display for FeatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureError::DuplicateName(name) => {
                write!(f, "duplicate transformer name: {name}")
            }
            FeatureError::UnknownCrossName(name) => {
                write!(f, "cross references unknown transformer name: {name}")
            }
            FeatureError::EmptyCombine => write!(f, "combine requires at least one spec"),
            FeatureError::CrossGroupMismatch(left, right) => write!(
                f,
                "cross endpoints '{left}' and '{right}' belong to different groups"
            ),
            FeatureError::MissingSettings(name) => {
                write!(f, "settings missing entry for transformer: {name}")
            }
            FeatureError::SettingsDecode(name, reason) => {
                write!(f, "transformer '{name}' rejected its settings: {reason}")
            }
            FeatureError::EmptyAggregate => write!(
                f,
                "cannot compute aggregate from an empty dataset without settings to replay"
            ),
            FeatureError::MismatchedBulkAdd(names, values) => write!(
                f,
                "add(names, values) length mismatch: {names} names vs {values} values"
            ),
        }
    }
}

impl std::error::Error for FeatureError {}
