//! The settings codec: a JSON array, one object per transformer in
//! entry order, each `{ "name", "params", "aggregators" }`.
//!
//! `aggregators` is the transformer-defined string from `encode_aggregator`,
//! opaque to the core. The schema tolerates unknown extra fields so a
//! settings blob produced by a newer version of a transformer can still be
//! read by an older one, as long as the fields this module cares about are
//! present.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One transformer's settings: `(name, params, encoded aggregator)`.
///
/// `aggregators` is `None` iff the entry's slot itself was `None` (zero
/// contributing records and no default) — not a choice the transformer
/// makes, since a transformer that did contribute always produces a real
/// `String` from `encode_aggregator`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsEntry {
    pub name: String,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    pub aggregators: Option<String>,
}

/// Parse a settings JSON array. Unknown extra fields on each object are
/// silently ignored.
pub fn parse_settings(json: &str) -> anyhow::Result<Vec<SettingsEntry>> {
    let entries: Vec<SettingsEntry> = serde_json::from_str(json)?;
    Ok(entries)
}

/// Serialize a settings array back to JSON, entry order preserved.
pub fn serialize_settings(entries: &[SettingsEntry]) -> anyhow::Result<String> {
    Ok(serde_json::to_string(entries)?)
}
