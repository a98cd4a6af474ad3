//! The feature builder: a polymorphic sink over an output type `F`.
//!
//! The trait is split the way the engine's other type-erased seams are
//! split: [`FeatureBuilder`] is object-safe (no type parameter on any
//! method) so a [`crate::entry::DynFeatureEntry`] can drive it through a
//! `&mut dyn FeatureBuilder`, while [`FeatureSink`] carries the one
//! genuinely generic operation — producing the assembled `F` — and is
//! only ever used generically, never as a trait object.

/// Per-record sink operations. Implementors emit exactly as many cells as
/// `init` declared; `add` + `skip` counts disagreeing with the declared
/// dimension is a programmer error and implementations may assert on it
/// rather than recover.
pub trait FeatureBuilder: Send {
    /// Called once per record before any `add`/`skip`.
    fn init(&mut self, total_dimension: usize);

    /// Called before each transformer's emission block.
    fn prepare(&mut self, transformer_name: &str);

    /// Emit one numeric cell.
    fn add(&mut self, name: &str, value: f64);

    /// Emit one sentinel hole.
    fn skip(&mut self);

    /// Emit `n` sentinel holes.
    fn skip_n(&mut self, n: usize) {
        for _ in 0..n {
            self.skip();
        }
    }

    /// Bulk variant of `add`, equivalent to zipped `add`s in order.
    /// Mismatched lengths fail fast rather than silently truncating.
    fn add_many(&mut self, names: &[String], values: &[f64]) -> anyhow::Result<()> {
        if names.len() != values.len() {
            anyhow::bail!(crate::error::FeatureError::MismatchedBulkAdd(
                names.len(),
                values.len()
            ));
        }
        for (name, value) in names.iter().zip(values) {
            self.add(name, *value);
        }
        Ok(())
    }
}

/// The generic half of the sink contract: producing the assembled output
/// and spawning a fresh, independent instance (used per group in the
/// multi path, and per record in the single-spec path).
pub trait FeatureSink: FeatureBuilder {
    type Output;

    /// Terminal: returns the assembled output. The builder is conceptually
    /// spent after this — callers obtain the next instance via `new_builder`.
    fn result(&mut self) -> Self::Output;

    /// Construct a fresh, independent instance from this one's configuration.
    fn new_builder(&self) -> Self
    where
        Self: Sized;
}

/// A dense `Vec<f64>` sink: the minimal concrete builder a host needs to
/// get a feature spec running before wiring up its own tensor/array type.
/// Skips are represented as `f64::NAN` — sentinel holes, not zeros, so a
/// missing feature stays distinguishable from an observed zero. One
/// instance is a prototype passed to
/// `feature_values`; each record's emission runs against a fresh instance
/// obtained via `new_builder`.
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    values: Vec<f64>,
}

impl FeatureBuilder for VecSink {
    fn init(&mut self, total_dimension: usize) {
        self.values = Vec::with_capacity(total_dimension);
    }

    fn prepare(&mut self, _transformer_name: &str) {}

    fn add(&mut self, _name: &str, value: f64) {
        self.values.push(value);
    }

    fn skip(&mut self) {
        self.values.push(f64::NAN);
    }
}

impl FeatureSink for VecSink {
    type Output = Vec<f64>;

    fn result(&mut self) -> Vec<f64> {
        std::mem::take(&mut self.values)
    }

    fn new_builder(&self) -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_represents_skips_as_nan() {
        let mut sink = VecSink::default().new_builder();
        sink.init(2);
        sink.add("a", 1.5);
        sink.skip();
        let out = sink.result();
        assert_eq!(out[0], 1.5);
        assert!(out[1].is_nan());
    }
}
