//! Min-max scaler: rescales into `[0, 1]` using the dataset's observed
//! range. `B = C = (min, max)`; `present` is infallible given the range,
//! since the running min/max accumulator is already the presented summary.

use std::collections::BTreeMap;

use crate::aggregator::Aggregator;
use crate::builder::FeatureBuilder;
use crate::transformer::Transformer;

use super::{decode_f64_list, encode_f64_list};

#[derive(Clone)]
pub struct MinMaxScaler {
    name: String,
    aggregator: Aggregator<f64, (f64, f64), (f64, f64)>,
}

impl MinMaxScaler {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aggregator: Aggregator::total(
                |x: &f64| (*x, *x),
                |a: (f64, f64), b: (f64, f64)| (a.0.min(b.0), a.1.max(b.1)),
                |range| range,
            ),
        }
    }
}

impl Transformer<f64, (f64, f64), (f64, f64)> for MinMaxScaler {
    fn name(&self) -> &str {
        &self.name
    }

    fn aggregator(&self) -> &Aggregator<f64, (f64, f64), (f64, f64)> {
        &self.aggregator
    }

    fn feature_dimension(&self, _c: &(f64, f64)) -> usize {
        1
    }

    fn feature_names(&self, _c: &(f64, f64)) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn build_features(&self, a: Option<&f64>, c: &(f64, f64), sink: &mut dyn FeatureBuilder) {
        let (min, max) = *c;
        match a {
            None => sink.skip(),
            Some(x) => {
                let span = max - min;
                let scaled = if span == 0.0 { 0.0 } else { (x - min) / span };
                sink.add(&self.name, scaled);
            }
        }
    }

    fn encode_aggregator(&self, c: &(f64, f64)) -> String {
        encode_f64_list(&[c.0, c.1])
    }

    fn decode_aggregator(&self, s: &str) -> anyhow::Result<(f64, f64)> {
        let parts = decode_f64_list(s)?;
        anyhow::ensure!(parts.len() == 2, "MinMaxScaler settings must encode exactly 2 values");
        Ok((parts[0], parts[1]))
    }

    fn params(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_into_unit_range() {
        let t = MinMaxScaler::new("x");
        let a = t.aggregator().prepare(&0.0);
        let b = t.aggregator().prepare(&5.0);
        let c = t.aggregator().prepare(&10.0);
        let combined = t.aggregator().combine(t.aggregator().combine(a, b), c);
        let presented = t.aggregator().present(combined).unwrap();
        assert_eq!(presented, (0.0, 10.0));
    }

    #[test]
    fn aggregator_round_trips_through_settings_string() {
        let t = MinMaxScaler::new("x");
        let encoded = t.encode_aggregator(&(1.5, 9.5));
        let decoded = t.decode_aggregator(&encoded).unwrap();
        assert_eq!(decoded, (1.5, 9.5));
    }

    #[test]
    fn constant_range_scales_to_zero_without_dividing_by_zero() {
        let t = MinMaxScaler::new("x");
        // span == 0 must not panic or produce NaN/Inf.
        let c = (5.0, 5.0);
        assert_eq!(t.feature_dimension(&c), 1);
    }
}
