//! The monoidal `prepare`/`combine`/`present` triple.
//!
//! Rather than a trait every transformer implements by inheritance, the
//! aggregator is a record of three function values attached to the
//! transformer (see [`crate::transformer::Transformer::aggregator`]). This
//! keeps the aggregator reusable and testable independent of any one
//! transformer's `feature_names`/`build_features` machinery.

use std::sync::Arc;

/// `prepare: A -> B`, `combine: (B, B) -> B` (must be associative), `present: B -> C`.
///
/// `combine` is expected to be associative; commutativity is not assumed.
/// `present` may fail only for a semantically invalid input (e.g. an empty
/// monoid with no identity) — the engine guarantees it is only ever called
/// with a `B` produced by at least one `prepare`, or rehydrated at replay.
#[derive(Clone)]
pub struct Aggregator<A, B, C> {
    prepare: Arc<dyn Fn(&A) -> B + Send + Sync>,
    combine: Arc<dyn Fn(B, B) -> B + Send + Sync>,
    present: Arc<dyn Fn(B) -> anyhow::Result<C> + Send + Sync>,
}

impl<A, B, C> Aggregator<A, B, C> {
    pub fn new(
        prepare: impl Fn(&A) -> B + Send + Sync + 'static,
        combine: impl Fn(B, B) -> B + Send + Sync + 'static,
        present: impl Fn(B) -> anyhow::Result<C> + Send + Sync + 'static,
    ) -> Self {
        Self {
            prepare: Arc::new(prepare),
            combine: Arc::new(combine),
            present: Arc::new(present),
        }
    }

    /// Convenience constructor for a summary whose `present` step is infallible.
    pub fn total(
        prepare: impl Fn(&A) -> B + Send + Sync + 'static,
        combine: impl Fn(B, B) -> B + Send + Sync + 'static,
        present: impl Fn(B) -> C + Send + Sync + 'static,
    ) -> Self {
        Self::new(prepare, combine, move |b| Ok(present(b)))
    }

    pub fn prepare(&self, a: &A) -> B {
        (self.prepare)(a)
    }

    pub fn combine(&self, lhs: B, rhs: B) -> B {
        (self.combine)(lhs, rhs)
    }

    pub fn present(&self, b: B) -> anyhow::Result<C> {
        (self.present)(b)
    }
}

impl Aggregator<(), (), ()> {
    /// The aggregator for a stateless transformer: `B = C = unit`, every step is identity.
    pub fn unit() -> Self {
        Aggregator::new(|_: &()| (), |_, _| (), |_| Ok(()))
    }
}

/// The `Option<B>` monoid combination:
/// `None ⊕ None = None`, `Some ⊕ None = Some`, `None ⊕ Some = Some`,
/// `Some(x) ⊕ Some(y) = Some(combine(x, y))`.
pub fn combine_options<B>(
    lhs: Option<B>,
    rhs: Option<B>,
    combine: impl FnOnce(B, B) -> B,
) -> Option<B> {
    match (lhs, rhs) {
        (None, None) => None,
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (Some(a), Some(b)) => Some(combine(a, b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_monoid_matches_spec_table() {
        assert_eq!(combine_options::<i32>(None, None, |a, b| a + b), None);
        assert_eq!(combine_options(Some(1), None, |a, b| a + b), Some(1));
        assert_eq!(combine_options(None, Some(2), |a, b| a + b), Some(2));
        assert_eq!(combine_options(Some(1), Some(2), |a, b| a + b), Some(3));
    }

    #[test]
    fn sum_aggregator_is_associative_over_a_sample() {
        let agg: Aggregator<f64, f64, f64> = Aggregator::total(|a| *a, |a, b| a + b, |b| b);
        let a = agg.prepare(&1.0);
        let b = agg.prepare(&2.0);
        let c = agg.prepare(&3.0);
        let left = agg.combine(agg.combine(a, b), c);
        let a = agg.prepare(&1.0);
        let b = agg.prepare(&2.0);
        let c = agg.prepare(&3.0);
        let right = agg.combine(a, agg.combine(b, c));
        assert_eq!(left, right);
    }
}
