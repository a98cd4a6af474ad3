//! Multi-spec & multi-extractor: bundles several specs into one,
//! remembering each entry's group id, and routes emission into `G`
//! independent output vectors per record.

use std::collections::HashMap;
use std::sync::Arc;

use crate::builder::FeatureSink;
use crate::entry::AnyBox;
use crate::error::FeatureError;
use crate::feature_set::FeatureSet;
use crate::settings::{self, SettingsEntry};
use crate::spec::FeatureSpec;
use crate::transformer::Elem;

/// A group-aware bundling of several [`FeatureSpec`]s sharing one
/// extraction pass. Every transformer name maps to exactly one group id in
/// `[0, num_groups)`; a cross whose two endpoints land in different groups
/// is rejected at construction.
pub struct MultiFeatureSpec<T: Elem> {
    feature_set: FeatureSet<T>,
    groups: HashMap<String, usize>,
    num_groups: usize,
}

impl<T: Elem> MultiFeatureSpec<T> {
    /// Bundle `specs` (one per output group, in group-id order).
    pub fn new(specs: Vec<FeatureSpec<T>>) -> anyhow::Result<Self> {
        if specs.is_empty() {
            anyhow::bail!(FeatureError::EmptyCombine);
        }
        let num_groups = specs.len();
        let mut entries = Vec::new();
        let mut index = HashMap::new();
        let mut groups = HashMap::new();
        let mut crosses = Vec::new();
        let mut offset = 0usize;

        let built: Vec<FeatureSet<T>> = specs.into_iter().map(FeatureSpec::build).collect();
        for (g, set) in built.into_iter().enumerate() {
            for (name, local_i) in &set.index {
                if index.contains_key(name) {
                    anyhow::bail!(FeatureError::DuplicateName(name.clone()));
                }
                index.insert(name.clone(), offset + local_i);
                groups.insert(name.clone(), g);
            }
            for c in &set.crosses {
                let left_group = *groups
                    .get(&set.entries[c.left].name().to_string())
                    .expect("left endpoint registered above");
                let right_group = *groups
                    .get(&set.entries[c.right].name().to_string())
                    .expect("right endpoint registered above");
                if left_group != right_group {
                    anyhow::bail!(FeatureError::CrossGroupMismatch(
                        c.left_name.clone(),
                        c.right_name.clone()
                    ));
                }
                crosses.push(crate::feature_set::CrossDecl {
                    left: c.left + offset,
                    right: c.right + offset,
                    left_name: c.left_name.clone(),
                    right_name: c.right_name.clone(),
                    combiner: Arc::clone(&c.combiner),
                    group: left_group,
                });
            }
            offset += set.entries.len();
            entries.extend(set.entries);
        }

        Ok(Self {
            feature_set: FeatureSet::new(entries, index, crosses),
            groups,
            num_groups,
        })
    }

    /// Number of distinct output vectors this spec produces per record.
    #[must_use]
    pub fn num_groups(&self) -> usize {
        self.num_groups
    }

    fn route(&self) -> impl Fn(usize) -> usize + '_ {
        let names: Vec<String> = self.feature_set.names().into_iter().map(str::to_string).collect();
        move |i: usize| self.groups[&names[i]]
    }

    /// Derive a new multi-spec retaining only entries whose name matches
    /// `pred`, pruning crossings whose endpoint was removed and rebuilding
    /// the group mapping over the survivors. Groups that end up with no
    /// surviving entries still exist (their output vector is simply empty).
    #[must_use]
    pub fn filter(&self, pred: impl Fn(&str) -> bool) -> Self {
        let filtered = self.feature_set.filter(&pred);
        let groups: HashMap<String, usize> = self
            .groups
            .iter()
            .filter(|(name, _)| pred(name))
            .map(|(name, g)| (name.clone(), *g))
            .collect();
        Self {
            feature_set: filtered,
            groups,
            num_groups: self.num_groups,
        }
    }

    /// Construct a multi-extractor, fitting from scratch.
    pub fn extract(self, items: Vec<T>) -> MultiExtractor<T> {
        MultiExtractor::new(self, items, crate::collection::ExtractionMode::default(), None)
    }

    /// Construct a multi-extractor that replays a previously fitted
    /// summary. If `settings` mentions only a subset of this spec's
    /// transformers, the spec is first filtered down to that subset
    /// (subset replay).
    pub fn extract_with_settings(
        self,
        items: Vec<T>,
        settings_json: &str,
    ) -> anyhow::Result<MultiExtractor<T>> {
        let settings = settings::parse_settings(settings_json)?;
        let mentioned: std::collections::HashSet<&str> =
            settings.iter().map(|s| s.name.as_str()).collect();
        let narrowed = if mentioned.len() == self.feature_set.len() {
            self
        } else {
            self.filter(|name| mentioned.contains(name))
        };
        Ok(MultiExtractor::new(
            narrowed,
            items,
            crate::collection::ExtractionMode::default(),
            Some(settings),
        ))
    }
}

/// Drives a [`MultiFeatureSpec`] against one dataset, emitting `G`
/// independent feature vectors per record.
pub struct MultiExtractor<T: Elem> {
    spec: MultiFeatureSpec<T>,
    inner: crate::extractor::Extractor<T>,
}

impl<T: Elem> MultiExtractor<T> {
    pub(crate) fn new(
        spec: MultiFeatureSpec<T>,
        items: Vec<T>,
        mode: crate::collection::ExtractionMode,
        settings: Option<Vec<SettingsEntry>>,
    ) -> Self {
        // `FeatureSet::clone` is a cheap `Arc`-sharing clone: `Extractor`
        // gets its own handle for the prepare/reduce/present pass while
        // `spec` keeps one for routing/introspection.
        let inner = crate::extractor::Extractor::new(spec.feature_set.clone(), items, mode, settings);
        Self { spec, inner }
    }

    #[must_use]
    pub fn num_groups(&self) -> usize {
        self.spec.num_groups
    }

    /// Per-group feature names, group-id order.
    pub fn feature_names(&self) -> anyhow::Result<Vec<Vec<String>>> {
        let presented = self.inner.aggregate()?;
        Ok(self.group_names(presented))
    }

    fn group_names(&self, presented: &[AnyBox]) -> Vec<Vec<String>> {
        let route = self.spec.route();
        let mut out: Vec<Vec<String>> = vec![Vec::new(); self.spec.num_groups];
        let feature_set = &self.spec.feature_set;
        for (i, _) in feature_set.names().iter().enumerate() {
            out[route(i)].extend(feature_set.entry_names(i, &presented[i]));
        }
        for c in feature_set.crosses_iter() {
            let left_names = feature_set.entry_names(c.left, &presented[c.left]);
            let right_names = feature_set.entry_names(c.right, &presented[c.right]);
            for l in &left_names {
                for r in &right_names {
                    out[c.group].push(crate::feature_set::cross_name(l, r));
                }
            }
        }
        out
    }

    /// Serialized settings for this fitted multi-spec.
    pub fn feature_settings(&self) -> anyhow::Result<String> {
        self.inner.feature_settings()
    }

    /// One group-ordered sequence of `G` feature vectors per record.
    pub fn feature_values<S: FeatureSink>(&self, proto: &S) -> anyhow::Result<Vec<Vec<S::Output>>> {
        let presented = self.inner.aggregate()?;
        let route = self.spec.route();
        let num_groups = self.spec.num_groups;
        self.inner
            .raw_rows()
            .iter()
            .map(|slots| {
                self.spec
                    .feature_set
                    .emit_grouped(slots, presented, &route, num_groups, proto)
            })
            .collect()
    }
}
