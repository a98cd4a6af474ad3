//! The feature entry: a thin, type-erasing adapter pairing an
//! extractor function and optional default with a transformer.
//!
//! A [`FeatureSet`](crate::feature_set::FeatureSet) holds a heterogeneous
//! sequence of entries — each with its own `A`/`B`/`C` — in one positional
//! array. [`DynFeatureEntry`] is the object-safe seam that makes that
//! possible: every operation reads from and writes to the single slot
//! position assigned to this entry, and never touches any other slot. The
//! `Option<...>` a slot holds is downcast through `Any`, with the
//! invariant that every slot in the set is always stepped through the
//! same phase transition in lockstep (maintained by
//! [`FeatureSet`](crate::feature_set::FeatureSet), not here).

use std::any::Any;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::builder::FeatureBuilder;
use crate::transformer::{Elem, Transformer};

/// A type-erased slot value. Its dynamic type is whatever phase the engine
/// is currently stepping through (`Option<A>`, `Option<B>`, or `Option<C>`).
pub type AnyBox = Box<dyn Any + Send + Sync>;

/// Object-safe, type-erased view of one feature entry.
///
/// `T` is the record type (shared by every entry in a set); `A`/`B`/`C`
/// are erased behind `AnyBox`.
pub(crate) trait DynFeatureEntry<T>: Send + Sync {
    fn name(&self) -> &str;

    /// `t -> Option<A>`, applying `default` when the extractor returns `None`.
    fn extract(&self, t: &T) -> AnyBox;

    /// Whether a raw (`Option<A>`) slot is `Some` — used by
    /// [`crate::metrics::ExtractionMetrics`] to count skips without
    /// downcasting outside this module.
    fn is_present(&self, a: &AnyBox) -> bool;

    /// `Option<A> -> Option<B>`.
    fn prepare(&self, a: &AnyBox) -> AnyBox;

    /// `(Option<B>, Option<B>) -> Option<B>` monoid combination rules.
    fn combine(&self, lhs: AnyBox, rhs: AnyBox) -> AnyBox;

    /// `Option<B> -> Option<C>`. Only invokes the transformer's `present`
    /// when the slot is `Some`.
    fn present(&self, b: AnyBox) -> anyhow::Result<AnyBox>;

    /// Width of this entry given its (erased) `Option<C>` slot; 0 when `None`.
    fn feature_dimension(&self, c: &AnyBox) -> usize;

    /// Names of this entry's block; empty when the slot is `None`.
    fn feature_names(&self, c: &AnyBox) -> Vec<String>;

    /// Emit this entry's block. A `None` slot emits nothing (zero width).
    fn build_features(&self, a: &AnyBox, c: &AnyBox, sink: &mut dyn FeatureBuilder);

    fn params(&self) -> BTreeMap<String, String>;

    /// `Option<C> -> Option<String>`; `None` iff the slot itself is `None`
    /// (the entry had zero contributing records and no default — not the
    /// transformer's own choice, which is always a real `String`).
    fn encode_settings_aggregator(&self, c: &AnyBox) -> Option<String>;

    /// Inverse of `encode_settings_aggregator`. `s = None` reconstructs a
    /// `None` slot directly, without involving the transformer.
    fn decode_aggregator(&self, s: Option<&str>) -> anyhow::Result<AnyBox>;
}

pub(crate) struct EntryImpl<T, A, B, C, X>
where
    T: Elem,
    A: Elem,
    B: Elem,
    C: Elem,
    X: Transformer<A, B, C> + 'static,
{
    extract: Arc<dyn Fn(&T) -> Option<A> + Send + Sync>,
    default: Option<A>,
    transformer: Arc<X>,
    _marker: PhantomData<fn() -> (B, C)>,
}

impl<T, A, B, C, X> EntryImpl<T, A, B, C, X>
where
    T: Elem,
    A: Elem,
    B: Elem,
    C: Elem,
    X: Transformer<A, B, C> + 'static,
{
    pub(crate) fn new(
        extract: impl Fn(&T) -> Option<A> + Send + Sync + 'static,
        default: Option<A>,
        transformer: X,
    ) -> Self {
        Self {
            extract: Arc::new(extract),
            default,
            transformer: Arc::new(transformer),
            _marker: PhantomData,
        }
    }
}

fn downcast_ref<'a, X: 'static>(b: &'a AnyBox, ctx: &str) -> &'a X {
    b.downcast_ref::<X>()
        .unwrap_or_else(|| panic!("slot type mismatch in {ctx}: expected {}", std::any::type_name::<X>()))
}

fn downcast_owned<X: 'static>(b: AnyBox, ctx: &str) -> X {
    *b.downcast::<X>()
        .unwrap_or_else(|_| panic!("slot type mismatch in {ctx}: expected {}", std::any::type_name::<X>()))
}

impl<T, A, B, C, X> DynFeatureEntry<T> for EntryImpl<T, A, B, C, X>
where
    T: Elem,
    A: Elem,
    B: Elem,
    C: Elem,
    X: Transformer<A, B, C> + 'static,
{
    fn name(&self) -> &str {
        self.transformer.name()
    }

    fn extract(&self, t: &T) -> AnyBox {
        let value = (self.extract)(t).or_else(|| self.default.clone());
        Box::new(value)
    }

    fn is_present(&self, a: &AnyBox) -> bool {
        let opt_a: &Option<A> = downcast_ref(a, "is_present");
        opt_a.is_some()
    }

    fn prepare(&self, a: &AnyBox) -> AnyBox {
        let opt_a: &Option<A> = downcast_ref(a, "prepare");
        let opt_b: Option<B> = opt_a.as_ref().map(|a| self.transformer.aggregator().prepare(a));
        Box::new(opt_b)
    }

    fn combine(&self, lhs: AnyBox, rhs: AnyBox) -> AnyBox {
        let lhs: Option<B> = downcast_owned(lhs, "combine/lhs");
        let rhs: Option<B> = downcast_owned(rhs, "combine/rhs");
        let combined = crate::aggregator::combine_options(lhs, rhs, |x, y| {
            self.transformer.aggregator().combine(x, y)
        });
        Box::new(combined)
    }

    fn present(&self, b: AnyBox) -> anyhow::Result<AnyBox> {
        let opt_b: Option<B> = downcast_owned(b, "present");
        let opt_c: Option<C> = match opt_b {
            None => None,
            Some(b) => Some(self.transformer.aggregator().present(b)?),
        };
        Ok(Box::new(opt_c))
    }

    fn feature_dimension(&self, c: &AnyBox) -> usize {
        let opt_c: &Option<C> = downcast_ref(c, "feature_dimension");
        opt_c.as_ref().map(|c| self.transformer.feature_dimension(c)).unwrap_or(0)
    }

    fn feature_names(&self, c: &AnyBox) -> Vec<String> {
        let opt_c: &Option<C> = downcast_ref(c, "feature_names");
        opt_c
            .as_ref()
            .map(|c| self.transformer.feature_names(c))
            .unwrap_or_default()
    }

    fn build_features(&self, a: &AnyBox, c: &AnyBox, sink: &mut dyn FeatureBuilder) {
        let opt_a: &Option<A> = downcast_ref(a, "build_features/a");
        let opt_c: &Option<C> = downcast_ref(c, "build_features/c");
        if let Some(c) = opt_c {
            self.transformer.build_features(opt_a.as_ref(), c, sink);
        }
    }

    fn params(&self) -> BTreeMap<String, String> {
        self.transformer.params()
    }

    fn encode_settings_aggregator(&self, c: &AnyBox) -> Option<String> {
        let opt_c: &Option<C> = downcast_ref(c, "encode_settings_aggregator");
        opt_c.as_ref().map(|c| self.transformer.encode_aggregator(c))
    }

    fn decode_aggregator(&self, s: Option<&str>) -> anyhow::Result<AnyBox> {
        let opt_c: Option<C> = match s {
            None => None,
            Some(s) => Some(self.transformer.decode_aggregator(s)?),
        };
        Ok(Box::new(opt_c))
    }
}
