//! One-hot encoder over string categories. `B` is the set of categories
//! observed during fitting; `C` is that set, frozen and sorted for a stable
//! column order. An unseen category at emission time (typically during
//! replay against new data) skips the whole block rather than emitting an
//! all-zero row, so "never seen this category" stays distinguishable from
//! "saw it, it's the reference level."

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::aggregator::Aggregator;
use crate::builder::FeatureBuilder;
use crate::transformer::Transformer;

use super::FIELD_SEP;

/// Percent-encodes `%` and the field separator so an arbitrary category
/// string round-trips through the joined settings string even when it
/// contains the separator itself (e.g. `"red,white"`).
fn encode_category(category: &str) -> String {
    let mut out = String::with_capacity(category.len());
    for ch in category.chars() {
        if ch == '%' || ch == FIELD_SEP {
            out.push('%');
            out.push_str(&format!("{:02X}", ch as u32));
        } else {
            out.push(ch);
        }
    }
    out
}

fn decode_category(s: &str) -> anyhow::Result<String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch == '%' {
            let hex: String = chars.by_ref().take(2).collect();
            anyhow::ensure!(hex.len() == 2, "truncated percent-escape in category {s:?}");
            let code = u32::from_str_radix(&hex, 16)?;
            out.push(char::from_u32(code).ok_or_else(|| anyhow::anyhow!("invalid percent-escape in category {s:?}"))?);
        } else {
            out.push(ch);
        }
    }
    Ok(out)
}

#[derive(Clone)]
pub struct OneHotEncoder {
    name: String,
    aggregator: Aggregator<String, BTreeSet<String>, Vec<String>>,
}

impl OneHotEncoder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aggregator: Aggregator::total(
                |s: &String| {
                    let mut set = BTreeSet::new();
                    set.insert(s.clone());
                    set
                },
                |mut a: BTreeSet<String>, b: BTreeSet<String>| {
                    a.extend(b);
                    a
                },
                |set: BTreeSet<String>| set.into_iter().collect(),
            ),
        }
    }
}

impl Transformer<String, BTreeSet<String>, Vec<String>> for OneHotEncoder {
    fn name(&self) -> &str {
        &self.name
    }

    fn aggregator(&self) -> &Aggregator<String, BTreeSet<String>, Vec<String>> {
        &self.aggregator
    }

    fn feature_dimension(&self, c: &Vec<String>) -> usize {
        c.len()
    }

    fn feature_names(&self, c: &Vec<String>) -> Vec<String> {
        c.iter().map(|category| format!("{}_{category}", self.name)).collect()
    }

    fn build_features(&self, a: Option<&String>, c: &Vec<String>, sink: &mut dyn FeatureBuilder) {
        match a.and_then(|value| c.iter().position(|category| category == value)) {
            None => sink.skip_n(c.len()),
            Some(idx) => {
                for i in 0..c.len() {
                    sink.add(&format!("{}_{}", self.name, c[i]), if i == idx { 1.0 } else { 0.0 });
                }
            }
        }
    }

    fn encode_aggregator(&self, c: &Vec<String>) -> String {
        c.iter().map(|category| encode_category(category)).collect::<Vec<_>>().join(&FIELD_SEP.to_string())
    }

    fn decode_aggregator(&self, s: &str) -> anyhow::Result<Vec<String>> {
        if s.is_empty() {
            return Ok(Vec::new());
        }
        s.split(FIELD_SEP).map(decode_category).collect()
    }

    fn params(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }
}
