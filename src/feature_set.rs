//! The feature set: an ordered array of entries plus the cross map.
//! Owns the per-record prepare/sum/present/emit loops and the settings codec.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::builder::{FeatureBuilder, FeatureSink};
use crate::entry::{AnyBox, DynFeatureEntry};
use crate::error::FeatureError;
use crate::extractor::Extractor;
use crate::settings::SettingsEntry;
use crate::transformer::Elem;

/// One declared crossing between two entries, identified by their index
/// in `FeatureSet::entries`. `group` is always 0 for a plain `FeatureSet`;
/// [`crate::multi::MultiFeatureSpec`] assigns the real group id.
pub(crate) struct CrossDecl {
    pub left: usize,
    pub right: usize,
    pub left_name: String,
    pub right_name: String,
    pub combiner: Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>,
    pub group: usize,
}

impl Clone for CrossDecl {
    fn clone(&self) -> Self {
        Self {
            left: self.left,
            right: self.right,
            left_name: self.left_name.clone(),
            right_name: self.right_name.clone(),
            combiner: Arc::clone(&self.combiner),
            group: self.group,
        }
    }
}

/// Deterministic, injective cross-name combiner: `"{left}_x_{right}"`.
pub(crate) fn cross_name(left: &str, right: &str) -> String {
    format!("{left}_x_{right}")
}

/// An immutable, ordered collection of feature entries plus cross
/// declarations. Built via [`crate::spec::FeatureSpec`]; construction-time
/// invariants (unique names, crosses referencing known names) are enforced
/// there, before this type ever exists.
pub struct FeatureSet<T: Elem> {
    pub(crate) entries: Vec<Arc<dyn DynFeatureEntry<T>>>,
    pub(crate) index: HashMap<String, usize>,
    pub(crate) crosses: Vec<CrossDecl>,
}

impl<T: Elem> Clone for FeatureSet<T> {
    /// Entries are `Arc`-shared, not deep-copied; this is cheap and safe
    /// since entries and crosses are immutable once built.
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            index: self.index.clone(),
            crosses: self.crosses.clone(),
        }
    }
}

impl<T: Elem> FeatureSet<T> {
    pub(crate) fn new(
        entries: Vec<Arc<dyn DynFeatureEntry<T>>>,
        index: HashMap<String, usize>,
        crosses: Vec<CrossDecl>,
    ) -> Self {
        Self { entries, index, crosses }
    }

    /// Number of declared entries (not counting cross-derived width).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declared transformer names, in entry order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name()).collect()
    }

    pub(crate) fn entry_name(&self, i: usize) -> &str {
        self.entries[i].name()
    }

    pub(crate) fn entry_is_present(&self, i: usize, a: &AnyBox) -> bool {
        self.entries[i].is_present(a)
    }

    pub(crate) fn entry_names(&self, i: usize, c: &AnyBox) -> Vec<String> {
        self.entries[i].feature_names(c)
    }

    pub(crate) fn crosses_iter(&self) -> impl Iterator<Item = &CrossDecl> {
        self.crosses.iter()
    }

    /// One-line-per-entry debug/explain listing: name and params. Width is
    /// summary-dependent and only known after `present`, so it is omitted
    /// here — use `Extractor::feature_names` for a fitted spec.
    pub fn describe(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .entries
            .iter()
            .map(|e| {
                let params = e.params();
                if params.is_empty() {
                    e.name().to_string()
                } else {
                    let rendered = params
                        .iter()
                        .map(|(k, v)| format!("{k}={v}"))
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!("{} ({rendered})", e.name())
                }
            })
            .collect();
        for cross in &self.crosses {
            lines.push(format!("{} x {}", cross.left_name, cross.right_name));
        }
        lines
    }

    pub(crate) fn unsafe_get(&self, t: &T) -> Vec<AnyBox> {
        self.entries.iter().map(|e| e.extract(t)).collect()
    }

    pub(crate) fn unsafe_prepare(&self, raw: &[AnyBox]) -> Vec<AnyBox> {
        self.entries.iter().zip(raw).map(|(e, a)| e.prepare(a)).collect()
    }

    pub(crate) fn unsafe_sum(&self, lhs: Vec<AnyBox>, rhs: Vec<AnyBox>) -> Vec<AnyBox> {
        self.entries
            .iter()
            .zip(lhs.into_iter().zip(rhs))
            .map(|(e, (l, r))| e.combine(l, r))
            .collect()
    }

    pub(crate) fn unsafe_present(&self, prepared: Vec<AnyBox>) -> anyhow::Result<Vec<AnyBox>> {
        self.entries
            .iter()
            .zip(prepared)
            .map(|(e, b)| e.present(b))
            .collect()
    }

    fn entry_width(&self, i: usize, presented: &[AnyBox]) -> usize {
        self.entries[i].feature_dimension(&presented[i])
    }

    pub fn feature_dimension(&self, presented: &[AnyBox]) -> usize {
        let base: usize = (0..self.entries.len()).map(|i| self.entry_width(i, presented)).sum();
        let crossed: usize = self
            .crosses
            .iter()
            .map(|c| self.entry_width(c.left, presented) * self.entry_width(c.right, presented))
            .sum();
        base + crossed
    }

    pub fn feature_names(&self, presented: &[AnyBox]) -> Vec<String> {
        let mut out = Vec::new();
        for (i, e) in self.entries.iter().enumerate() {
            out.extend(e.feature_names(&presented[i]));
        }
        for c in &self.crosses {
            let left_names = self.entries[c.left].feature_names(&presented[c.left]);
            let right_names = self.entries[c.right].feature_names(&presented[c.right]);
            for l in &left_names {
                for r in &right_names {
                    out.push(cross_name(l, r));
                }
            }
        }
        out
    }

    pub fn feature_settings(&self, presented: &[AnyBox]) -> Vec<SettingsEntry> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| SettingsEntry {
                name: e.name().to_string(),
                params: e.params().into_iter().collect::<BTreeMap<_, _>>(),
                aggregators: e.encode_settings_aggregator(&presented[i]),
            })
            .collect()
    }

    pub fn decode_aggregators(&self, settings: &[SettingsEntry]) -> anyhow::Result<Vec<AnyBox>> {
        let by_name: HashMap<&str, &SettingsEntry> =
            settings.iter().map(|s| (s.name.as_str(), s)).collect();
        self.entries
            .iter()
            .map(|e| {
                let entry_settings = by_name
                    .get(e.name())
                    .ok_or_else(|| FeatureError::MissingSettings(e.name().to_string()))?;
                e.decode_aggregator(entry_settings.aggregators.as_deref())
                    .map_err(|err| {
                        anyhow::Error::new(FeatureError::SettingsDecode(
                            e.name().to_string(),
                            err.to_string(),
                        ))
                    })
            })
            .collect()
    }

    /// Emit one record's feature vector(s) into group-routed builders.
    /// `route(entry_index)` maps each entry to its output group; a plain
    /// `FeatureSet` always routes to group 0.
    pub(crate) fn emit_grouped<S: FeatureSink>(
        &self,
        raw: &[AnyBox],
        presented: &[AnyBox],
        route: impl Fn(usize) -> usize,
        num_groups: usize,
        proto: &S,
    ) -> anyhow::Result<Vec<S::Output>> {
        let mut builders: Vec<S> = (0..num_groups).map(|_| proto.new_builder()).collect();
        let mut group_dims = vec![0usize; num_groups];
        for i in 0..self.entries.len() {
            group_dims[route(i)] += self.entry_width(i, presented);
        }
        for c in &self.crosses {
            group_dims[c.group] += self.entry_width(c.left, presented) * self.entry_width(c.right, presented);
        }
        for (g, b) in builders.iter_mut().enumerate() {
            b.init(group_dims[g]);
        }

        let mut captured: Vec<Vec<Option<f64>>> = Vec::with_capacity(self.entries.len());
        for (i, e) in self.entries.iter().enumerate() {
            let g = route(i);
            let b = &mut builders[g];
            b.prepare(e.name());
            let mut proxy = CapturingSink { inner: b, captured: Vec::new() };
            e.build_features(&raw[i], &presented[i], &mut proxy);
            captured.push(proxy.captured);
        }

        for c in &self.crosses {
            let lw = self.entry_width(c.left, presented);
            let rw = self.entry_width(c.right, presented);
            let b = &mut builders[c.group];
            if lw == 0 || rw == 0 {
                b.skip_n(lw * rw);
                continue;
            }
            let left_vals = &captured[c.left];
            let right_vals = &captured[c.right];
            let left_skipped = left_vals.iter().all(|v| v.is_none());
            let right_skipped = right_vals.iter().all(|v| v.is_none());
            if left_skipped || right_skipped {
                b.skip_n(lw * rw);
                continue;
            }
            let left_names = self.entries[c.left].feature_names(&presented[c.left]);
            let right_names = self.entries[c.right].feature_names(&presented[c.right]);
            for (ln, lv) in left_names.iter().zip(left_vals) {
                for (rn, rv) in right_names.iter().zip(right_vals) {
                    match (lv, rv) {
                        (Some(a), Some(bv)) => b.add(&cross_name(ln, rn), (c.combiner)(*a, *bv)),
                        _ => b.skip(),
                    }
                }
            }
        }

        Ok(builders.into_iter().map(|mut b| b.result()).collect())
    }

    /// Single-spec emission: the `emit_grouped` special case with one group.
    pub(crate) fn feature_values<S: FeatureSink>(
        &self,
        raw: &[AnyBox],
        presented: &[AnyBox],
        proto: &S,
    ) -> anyhow::Result<S::Output> {
        let mut results = self.emit_grouped(raw, presented, |_| 0, 1, proto)?;
        Ok(results.remove(0))
    }

    /// Derive a spec retaining only entries whose name matches `pred`,
    /// pruning any cross whose endpoint was removed.
    pub fn filter(&self, pred: impl Fn(&str) -> bool) -> FeatureSet<T> {
        let mut entries = Vec::new();
        let mut index = HashMap::new();
        let mut remap: HashMap<usize, usize> = HashMap::new();
        for (old_i, e) in self.entries.iter().enumerate() {
            if pred(e.name()) {
                remap.insert(old_i, entries.len());
                index.insert(e.name().to_string(), entries.len());
                entries.push(Arc::clone(e));
            }
        }
        let crosses = self
            .crosses
            .iter()
            .filter_map(|c| {
                let left = *remap.get(&c.left)?;
                let right = *remap.get(&c.right)?;
                Some(CrossDecl {
                    left,
                    right,
                    left_name: c.left_name.clone(),
                    right_name: c.right_name.clone(),
                    combiner: Arc::clone(&c.combiner),
                    group: c.group,
                })
            })
            .collect();
        FeatureSet { entries, index, crosses }
    }

    /// Construct an extractor over `items`, fitting from scratch.
    pub fn extract(self, items: Vec<T>) -> Extractor<T> {
        Extractor::new(self, items, crate::collection::ExtractionMode::default(), None)
    }

    /// Construct an extractor with an explicit execution mode.
    pub fn extract_with_mode(
        self,
        items: Vec<T>,
        mode: crate::collection::ExtractionMode,
    ) -> Extractor<T> {
        Extractor::new(self, items, mode, None)
    }

    /// Construct an extractor that replays a previously fitted summary
    /// instead of reducing over `items`.
    pub fn extract_with_settings(self, items: Vec<T>, settings_json: &str) -> anyhow::Result<Extractor<T>> {
        let settings = crate::settings::parse_settings(settings_json)?;
        Ok(Extractor::new(
            self,
            items,
            crate::collection::ExtractionMode::default(),
            Some(settings),
        ))
    }
}

struct CapturingSink<'a> {
    inner: &'a mut dyn FeatureBuilder,
    captured: Vec<Option<f64>>,
}

impl<'a> FeatureBuilder for CapturingSink<'a> {
    fn init(&mut self, total_dimension: usize) {
        self.inner.init(total_dimension);
    }

    fn prepare(&mut self, transformer_name: &str) {
        self.inner.prepare(transformer_name);
    }

    fn add(&mut self, name: &str, value: f64) {
        self.inner.add(name, value);
        self.captured.push(Some(value));
    }

    fn skip(&mut self) {
        self.inner.skip();
        self.captured.push(None);
    }
}
