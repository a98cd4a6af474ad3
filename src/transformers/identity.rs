//! Pass-through transformer: emits the raw `f64` unchanged. No learned
//! state (`B = C = ()`), so fitting and replay are identical.

use crate::aggregator::Aggregator;
use crate::builder::FeatureBuilder;
use crate::transformer::Transformer;

#[derive(Clone)]
pub struct Identity {
    name: String,
    aggregator: Aggregator<f64, (), ()>,
}

impl Identity {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aggregator: Aggregator::unit(),
        }
    }
}

impl Transformer<f64, (), ()> for Identity {
    fn name(&self) -> &str {
        &self.name
    }

    fn aggregator(&self) -> &Aggregator<f64, (), ()> {
        &self.aggregator
    }

    fn feature_dimension(&self, _c: &()) -> usize {
        1
    }

    fn feature_names(&self, _c: &()) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn build_features(&self, a: Option<&f64>, _c: &(), sink: &mut dyn FeatureBuilder) {
        match a {
            Some(x) => sink.add(&self.name, *x),
            None => sink.skip(),
        }
    }

    fn encode_aggregator(&self, _c: &()) -> String {
        String::new()
    }

    fn decode_aggregator(&self, _s: &str) -> anyhow::Result<()> {
        Ok(())
    }
}
