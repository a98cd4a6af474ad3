//! The spec builder: the user-facing fluent DSL for declaring
//! required/optional fields, crossings, and combining specs, producing a
//! [`FeatureSet`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::entry::{DynFeatureEntry, EntryImpl};
use crate::error::FeatureError;
use crate::feature_set::{CrossDecl, FeatureSet};
use crate::transformer::{Elem, Transformer};

/// Builds a [`FeatureSet`] over record type `T`. Entries accumulate in
/// declaration order; construction-time invariants (unique transformer
/// names, crosses referencing known names) are enforced as each operation
/// runs, so a caller never holds a `FeatureSpec` in an invalid state.
pub struct FeatureSpec<T: Elem> {
    entries: Vec<Arc<dyn DynFeatureEntry<T>>>,
    index: HashMap<String, usize>,
    crosses: Vec<CrossDecl>,
}

impl<T: Elem> FeatureSpec<T> {
    /// An empty spec over `T`.
    #[must_use]
    pub fn of() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            crosses: Vec::new(),
        }
    }

    fn push_entry<A, B, C, X>(
        &mut self,
        extract: impl Fn(&T) -> Option<A> + Send + Sync + 'static,
        default: Option<A>,
        transformer: X,
    ) -> anyhow::Result<()>
    where
        A: Elem,
        B: Elem,
        C: Elem,
        X: Transformer<A, B, C> + 'static,
    {
        let name = transformer.name().to_string();
        if self.index.contains_key(&name) {
            anyhow::bail!(FeatureError::DuplicateName(name));
        }
        let entry = EntryImpl::new(extract, default, transformer);
        self.index.insert(name, self.entries.len());
        self.entries.push(Arc::new(entry));
        Ok(())
    }

    /// Declare a required field: `extract: T -> A`. Records for which
    /// `extract` can't produce a value are the caller's responsibility to
    /// avoid — there is no default to fall back on.
    pub fn required<A, B, C, X>(
        mut self,
        extract: impl Fn(&T) -> A + Send + Sync + 'static,
        transformer: X,
    ) -> anyhow::Result<Self>
    where
        A: Elem,
        B: Elem,
        C: Elem,
        X: Transformer<A, B, C> + 'static,
    {
        self.push_entry(move |t| Some(extract(t)), None, transformer)?;
        Ok(self)
    }

    /// Declare an optional field: `extract: T -> Option<A>`, with an
    /// optional default substituted when `extract` returns `None`.
    pub fn optional<A, B, C, X>(
        mut self,
        extract: impl Fn(&T) -> Option<A> + Send + Sync + 'static,
        default: Option<A>,
        transformer: X,
    ) -> anyhow::Result<Self>
    where
        A: Elem,
        B: Elem,
        C: Elem,
        X: Transformer<A, B, C> + 'static,
    {
        self.push_entry(extract, default, transformer)?;
        Ok(self)
    }

    /// Declare a cross between two already-declared transformer names.
    /// `combiner` folds one scalar from each block's emitted value into
    /// one cross cell.
    pub fn cross(
        mut self,
        left_name: &str,
        right_name: &str,
        combiner: impl Fn(f64, f64) -> f64 + Send + Sync + 'static,
    ) -> anyhow::Result<Self> {
        let left = *self
            .index
            .get(left_name)
            .ok_or_else(|| FeatureError::UnknownCrossName(left_name.to_string()))?;
        let right = *self
            .index
            .get(right_name)
            .ok_or_else(|| FeatureError::UnknownCrossName(right_name.to_string()))?;
        self.crosses.push(CrossDecl {
            left,
            right,
            left_name: left_name.to_string(),
            right_name: right_name.to_string(),
            combiner: Arc::new(combiner),
            group: 0,
        });
        Ok(self)
    }

    /// Concatenate several specs into one, preserving entry order and
    /// unioning their crossings. Transformer names must remain unique
    /// across the union.
    pub fn combine(specs: Vec<FeatureSpec<T>>) -> anyhow::Result<Self> {
        if specs.is_empty() {
            anyhow::bail!(FeatureError::EmptyCombine);
        }
        let mut entries = Vec::new();
        let mut index = HashMap::new();
        let mut crosses = Vec::new();
        let mut offset = 0usize;
        for spec in specs {
            for (name, local_i) in &spec.index {
                if index.contains_key(name) {
                    anyhow::bail!(FeatureError::DuplicateName(name.clone()));
                }
                index.insert(name.clone(), offset + local_i);
            }
            for e in spec.entries {
                entries.push(e);
            }
            for c in spec.crosses {
                crosses.push(CrossDecl {
                    left: c.left + offset,
                    right: c.right + offset,
                    left_name: c.left_name,
                    right_name: c.right_name,
                    combiner: c.combiner,
                    group: 0,
                });
            }
            offset = entries.len();
        }
        Ok(Self { entries, index, crosses })
    }

    /// Finalize into an immutable [`FeatureSet`].
    #[must_use]
    pub fn build(self) -> FeatureSet<T> {
        FeatureSet::new(self.entries, self.index, self.crosses)
    }

    /// Build then construct an [`crate::extractor::Extractor`] that fits
    /// from scratch over `items`.
    pub fn extract(self, items: Vec<T>) -> crate::extractor::Extractor<T> {
        self.build().extract(items)
    }

    /// Build then construct an [`crate::extractor::Extractor`] that replays
    /// a previously computed settings blob instead of reducing over `items`.
    pub fn extract_with_settings(
        self,
        items: Vec<T>,
        settings_json: &str,
    ) -> anyhow::Result<crate::extractor::Extractor<T>> {
        self.build().extract_with_settings(items, settings_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformers::Identity;

    #[derive(Clone)]
    struct Row {
        x: f64,
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = FeatureSpec::<Row>::of()
            .required(|r: &Row| r.x, Identity::new("x"))
            .unwrap()
            .required(|r: &Row| r.x, Identity::new("x"))
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<FeatureError>(),
            Some(&FeatureError::DuplicateName("x".to_string()))
        );
    }

    #[test]
    fn rejects_cross_on_unknown_name() {
        let err = FeatureSpec::<Row>::of()
            .required(|r: &Row| r.x, Identity::new("x"))
            .unwrap()
            .cross("x", "missing", |a, b| a * b)
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<FeatureError>(),
            Some(&FeatureError::UnknownCrossName("missing".to_string()))
        );
    }

    #[test]
    fn rejects_empty_combine() {
        let err = FeatureSpec::<Row>::combine(Vec::new()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<FeatureError>(),
            Some(&FeatureError::EmptyCombine)
        );
    }

    #[test]
    fn combine_preserves_order_and_unions_crosses() {
        let a = FeatureSpec::<Row>::of()
            .required(|r: &Row| r.x, Identity::new("a"))
            .unwrap();
        let b = FeatureSpec::<Row>::of()
            .required(|r: &Row| r.x, Identity::new("b"))
            .unwrap()
            .cross("b", "b", |x, y| x + y)
            .unwrap();
        let combined = FeatureSpec::combine(vec![a, b]).unwrap().build();
        assert_eq!(combined.names(), vec!["a", "b"]);
    }
}
