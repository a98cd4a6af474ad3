//! Standard scaler: rescales to zero mean, unit variance. `B = (sum, sum of
//! squares, count)`; `present` derives `(mean, population std)` from that
//! running accumulator.

use std::collections::BTreeMap;

use crate::aggregator::Aggregator;
use crate::builder::FeatureBuilder;
use crate::transformer::Transformer;

use super::{decode_f64_list, encode_f64_list};

#[derive(Clone)]
pub struct StandardScaler {
    name: String,
    aggregator: Aggregator<f64, (f64, f64, u64), (f64, f64)>,
}

impl StandardScaler {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aggregator: Aggregator::new(
                |x: &f64| (*x, x * x, 1u64),
                |a: (f64, f64, u64), b: (f64, f64, u64)| (a.0 + b.0, a.1 + b.1, a.2 + b.2),
                |(sum, sumsq, count)| {
                    anyhow::ensure!(count > 0, "StandardScaler presented with zero observations");
                    let n = count as f64;
                    let mean = sum / n;
                    let variance = (sumsq / n - mean * mean).max(0.0);
                    Ok((mean, variance.sqrt()))
                },
            ),
        }
    }
}

impl Transformer<f64, (f64, f64, u64), (f64, f64)> for StandardScaler {
    fn name(&self) -> &str {
        &self.name
    }

    fn aggregator(&self) -> &Aggregator<f64, (f64, f64, u64), (f64, f64)> {
        &self.aggregator
    }

    fn feature_dimension(&self, _c: &(f64, f64)) -> usize {
        1
    }

    fn feature_names(&self, _c: &(f64, f64)) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn build_features(&self, a: Option<&f64>, c: &(f64, f64), sink: &mut dyn FeatureBuilder) {
        let (mean, std) = *c;
        match a {
            None => sink.skip(),
            Some(x) => {
                let scaled = if std == 0.0 { 0.0 } else { (x - mean) / std };
                sink.add(&self.name, scaled);
            }
        }
    }

    fn encode_aggregator(&self, c: &(f64, f64)) -> String {
        encode_f64_list(&[c.0, c.1])
    }

    fn decode_aggregator(&self, s: &str) -> anyhow::Result<(f64, f64)> {
        let parts = decode_f64_list(s)?;
        anyhow::ensure!(parts.len() == 2, "StandardScaler settings must encode exactly 2 values");
        Ok((parts[0], parts[1]))
    }

    fn params(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }
}
