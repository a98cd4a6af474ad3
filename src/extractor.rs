//! The extractor: holds a feature set, an input dataset, and an
//! optional previously-fitted settings blob. Drives the feature set through
//! the prepare/reduce/present pipeline (or skips straight to replay) and
//! exposes names/values/settings as lazily materialized, memoized queries.

use std::sync::{Arc, OnceLock};

use crate::builder::FeatureSink;
use crate::collection::{Collection, ExtractionMode, RayonCollection, VecCollection};
use crate::entry::AnyBox;
use crate::error::FeatureError;
use crate::feature_set::FeatureSet;
#[cfg(feature = "metrics")]
use crate::metrics::ExtractionMetrics;
use crate::settings::{self, SettingsEntry};
use crate::transformer::Elem;

/// Drives one feature set against one dataset.
///
/// All phases are lazily materialized and memoized on first access: calling
/// `feature_names` twice, or `feature_names` then `feature_values`, never
/// recomputes the raw extraction or the reduce. A successfully computed
/// query (e.g. `feature_names`) stays valid even if a later query fails —
/// each terminal is memoized from its own pipeline prefix.
pub struct Extractor<T: Elem> {
    feature_set: FeatureSet<T>,
    items: Vec<T>,
    mode: ExtractionMode,
    given_settings: Option<Vec<SettingsEntry>>,
    raw: OnceLock<Arc<Vec<Vec<AnyBox>>>>,
    aggregate: OnceLock<Arc<Vec<AnyBox>>>,
    #[cfg(feature = "metrics")]
    metrics: Option<Arc<ExtractionMetrics>>,
}

impl<T: Elem> Extractor<T> {
    pub(crate) fn new(
        feature_set: FeatureSet<T>,
        items: Vec<T>,
        mode: ExtractionMode,
        given_settings: Option<Vec<SettingsEntry>>,
    ) -> Self {
        Self {
            feature_set,
            items,
            mode,
            given_settings,
            raw: OnceLock::new(),
            aggregate: OnceLock::new(),
            #[cfg(feature = "metrics")]
            metrics: None,
        }
    }

    /// Attach a metrics collector. The extractor records per-transformer
    /// seen/skip counts during raw extraction and the reduce phase's
    /// wall-clock cost the first time `aggregate` materializes.
    #[cfg(feature = "metrics")]
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<ExtractionMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Number of records in the backing dataset.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The raw, type-erased per-record extraction (`Option<A>` per entry).
    /// Used by [`crate::multi::MultiExtractor`] to re-drive emission through
    /// group-routed builders without re-extracting.
    pub(crate) fn raw_rows(&self) -> &Arc<Vec<Vec<AnyBox>>> {
        self.raw()
    }

    fn raw(&self) -> &Arc<Vec<Vec<AnyBox>>> {
        if self.raw.get().is_none() {
            let extracted: Vec<Vec<AnyBox>> =
                self.items.iter().map(|t| self.feature_set.unsafe_get(t)).collect();
            #[cfg(feature = "metrics")]
            if let Some(metrics) = &self.metrics {
                for row in &extracted {
                    for (i, slot) in row.iter().enumerate() {
                        metrics.record_seen(self.feature_set.entry_name(i), self.feature_set.entry_is_present(i, slot));
                    }
                }
            }
            let _ = self.raw.set(Arc::new(extracted));
        }
        self.raw.get().expect("raw set above")
    }

    /// The presented per-transformer summaries (`Option<C>` per entry,
    /// type-erased). Computed by replay when settings were supplied,
    /// otherwise by a prepare/reduce/present pass over the dataset.
    pub fn aggregate(&self) -> anyhow::Result<&Arc<Vec<AnyBox>>> {
        if self.aggregate.get().is_none() {
            let computed = self.compute_aggregate()?;
            let _ = self.aggregate.set(computed);
        }
        Ok(self.aggregate.get().expect("aggregate set above"))
    }

    fn compute_aggregate(&self) -> anyhow::Result<Arc<Vec<AnyBox>>> {
        if let Some(settings) = &self.given_settings {
            let presented = self.feature_set.decode_aggregators(settings)?;
            return Ok(Arc::new(presented));
        }
        if self.items.is_empty() {
            anyhow::bail!(FeatureError::EmptyAggregate);
        }
        #[cfg(feature = "metrics")]
        let start = std::time::Instant::now();
        let raw = self.raw();
        let prepared: Vec<Vec<AnyBox>> =
            raw.iter().map(|slots| self.feature_set.unsafe_prepare(slots)).collect();
        let combined = match self.mode {
            ExtractionMode::Sequential => {
                VecCollection.reduce(prepared, |a, b| self.feature_set.unsafe_sum(a, b))
            }
            ExtractionMode::Parallel => {
                RayonCollection.reduce(prepared, |a, b| self.feature_set.unsafe_sum(a, b))
            }
        }
        .expect("non-empty dataset yields a combined accumulator");
        let presented = self.feature_set.unsafe_present(combined)?;
        #[cfg(feature = "metrics")]
        if let Some(metrics) = &self.metrics {
            metrics.record_reduce_duration(start.elapsed());
        }
        Ok(Arc::new(presented))
    }

    /// Ordered feature names, stable across repeated
    /// extractions over the same spec and dataset.
    pub fn feature_names(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.feature_set.feature_names(self.aggregate()?))
    }

    /// The total emitted width, equal to `feature_names().len()`.
    pub fn feature_dimension(&self) -> anyhow::Result<usize> {
        Ok(self.feature_set.feature_dimension(self.aggregate()?))
    }

    /// Serialized settings for this fitted spec, or the settings this
    /// extractor was constructed to replay, passed through unchanged.
    pub fn feature_settings(&self) -> anyhow::Result<String> {
        if let Some(given) = &self.given_settings {
            return settings::serialize_settings(given);
        }
        let presented = self.aggregate()?;
        let entries = self.feature_set.feature_settings(presented);
        settings::serialize_settings(&entries)
    }

    /// One feature vector per record, in dataset order.
    pub fn feature_values<S: FeatureSink>(&self, proto: &S) -> anyhow::Result<Vec<S::Output>> {
        let presented = Arc::clone(self.aggregate()?);
        let raw = self.raw();
        raw.iter()
            .map(|slots| self.feature_set.feature_values(slots, &presented, proto))
            .collect()
    }

    /// Same as `feature_values`, but pairs each emitted vector with its
    /// source record.
    pub fn feature_values_with_original<S: FeatureSink>(
        &self,
        proto: &S,
    ) -> anyhow::Result<Vec<(T, S::Output)>>
    where
        T: Clone,
    {
        let presented = Arc::clone(self.aggregate()?);
        let raw = self.raw();
        self.items
            .iter()
            .cloned()
            .zip(raw.iter())
            .map(|(t, slots)| {
                let v = self.feature_set.feature_values(slots, &presented, proto)?;
                Ok((t, v))
            })
            .collect()
    }

    /// The underlying feature set, for introspection (e.g. `describe()`).
    pub fn feature_set(&self) -> &FeatureSet<T> {
        &self.feature_set
    }
}
