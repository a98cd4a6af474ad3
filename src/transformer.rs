//! The transformer contract: the algebraic shape every concrete
//! transformer (scaler, encoder, bucketizer, hasher, ...) implements.
//!
//! A transformer is parameterized by three semantic types: the raw input
//! `A`, the aggregator state `B`, and the presented summary `C`. Concrete
//! algorithms are external collaborators — this trait fixes only the
//! contract they satisfy. A small worked set lives in [`crate::transformers`].

use std::collections::BTreeMap;

use crate::aggregator::Aggregator;
use crate::builder::FeatureBuilder;

/// `Elem` is the transport-safety bound carried by every value that moves
/// through a slot array or across a parallel reduce: `'static` so it can be
/// boxed behind `dyn Any`, `Send + Sync` so partitions can cross worker
/// boundaries, `Clone` because entries replay a stored `default` and
/// records are revisited for `feature_values_with_original`.
pub trait Elem: 'static + Send + Sync + Clone {}
impl<X> Elem for X where X: 'static + Send + Sync + Clone {}

/// A single named feature transformation.
///
/// `build_features` must emit exactly `feature_dimension(c)` ordered
/// values; when `a` is `None` it must emit that many skips (sentinel
/// holes — the sink decides their representation, never zeros standing
/// in for "no value"). `feature_names(c)` must be stable for a given `c`
/// and unique within the transformer's own block.
pub trait Transformer<A, B, C>: Send + Sync
where
    A: Elem,
    B: Elem,
    C: Elem,
{
    /// Unique identifier within a spec.
    fn name(&self) -> &str;

    /// The prepare/combine/present triple used to derive `C` from a dataset.
    fn aggregator(&self) -> &Aggregator<A, B, C>;

    /// Emitted width. The core never assumes a width until after `present`
    /// has produced a `c` — widths may be summary-dependent (e.g. a
    /// one-hot encoder's width is its learned category count).
    fn feature_dimension(&self, c: &C) -> usize;

    /// Ordered names of length `feature_dimension(c)`.
    fn feature_names(&self, c: &C) -> Vec<String>;

    /// Emit this transformer's block into `sink`, in declared order.
    fn build_features(&self, a: Option<&A>, c: &C, sink: &mut dyn FeatureBuilder);

    /// String codec for the presented summary, used for settings provenance.
    /// Must round-trip: `decode_aggregator(encode_aggregator(c)) == Ok(c)`.
    fn encode_aggregator(&self, c: &C) -> String;

    /// Inverse of `encode_aggregator`. May fail if the string is malformed.
    fn decode_aggregator(&self, s: &str) -> anyhow::Result<C>;

    /// Parameter name -> string value, for settings provenance. Most
    /// transformers have none.
    fn params(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }
}
