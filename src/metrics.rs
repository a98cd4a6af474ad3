//! Metrics collection and reporting for feature extraction runs.
//!
//! This module is gated behind the `metrics` feature (on by default). It
//! provides a small, extensible `Metric`/`MetricsCollector` registry and
//! adds [`ExtractionMetrics`], a thin, extraction-specific wrapper that an
//! [`crate::extractor::Extractor`] or [`crate::multi::MultiExtractor`] can
//! be given via `with_metrics` to record per-transformer seen/skip counts
//! and reduce-phase wall time.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vecloom::metrics::ExtractionMetrics;
//!
//! let metrics = Arc::new(ExtractionMetrics::new());
//! // ... attach via Extractor::with_metrics, run the extraction ...
//! metrics.print();
//! metrics.save_to_file("metrics.json").unwrap();
//! ```

use anyhow::Result;
use serde_json::{json, Value};
use std::any::Any;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Trait for custom metrics.
pub trait Metric: Send + Sync + Any {
    /// The name of this metric (e.g., `element_count`, `processing_time_ms`).
    fn name(&self) -> &str;

    /// The current value of this metric as a JSON value.
    fn value(&self) -> Value;

    /// Optional description of what this metric measures.
    fn description(&self) -> Option<&str> {
        None
    }

    /// Cast to Any for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// Thread-safe container for collecting extraction-run metrics.
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<HashMap<String, Box<dyn Metric>>>>,
}

impl MetricsCollector {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Register a custom metric. Replaces any existing metric of the same name.
    ///
    /// # Panics
    /// Panics if the internal lock is poisoned.
    pub fn register(&self, metric: Box<dyn Metric>) {
        let mut inner = self.inner.lock().unwrap();
        inner.insert(metric.name().to_string(), metric);
    }

    /// Increment a counter metric by name, creating it at `value` if absent.
    ///
    /// # Panics
    /// Panics if the internal lock is poisoned.
    pub fn increment_counter(&self, name: &str, value: u64) {
        let mut inner = self.inner.lock().unwrap();
        let current = inner
            .get(name)
            .and_then(|m| m.as_any().downcast_ref::<CounterMetric>())
            .map_or(0, |c| c.count);
        inner.insert(
            name.to_string(),
            Box::new(CounterMetric {
                name: name.to_string(),
                count: current + value,
            }),
        );
    }

    /// Set a gauge metric to a specific value.
    ///
    /// # Panics
    /// Panics if the internal lock is poisoned.
    pub fn set_gauge(&self, name: &str, value: f64) {
        let mut inner = self.inner.lock().unwrap();
        inner.insert(name.to_string(), Box::new(GaugeMetric::new(name, value)));
    }

    /// All metrics as a JSON object.
    ///
    /// # Panics
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let inner = self.inner.lock().unwrap();
        let mut metrics_json = serde_json::Map::new();
        for (name, metric) in inner.iter() {
            let mut metric_obj = serde_json::Map::new();
            metric_obj.insert("value".to_string(), metric.value());
            if let Some(desc) = metric.description() {
                metric_obj.insert("description".to_string(), json!(desc));
            }
            metrics_json.insert(name.clone(), Value::Object(metric_obj));
        }
        json!(metrics_json)
    }

    /// Print all metrics to stdout, sorted by name.
    ///
    /// # Panics
    /// Panics if the internal lock is poisoned.
    pub fn print(&self) {
        println!("\n========== Extraction Metrics ==========");
        let inner = self.inner.lock().unwrap();
        let mut sorted: Vec<_> = inner.iter().collect();
        sorted.sort_by_key(|(name, _)| *name);
        for (name, metric) in sorted {
            if let Some(desc) = metric.description() {
                println!("{name}: {} ({desc})", metric.value());
            } else {
                println!("{name}: {}", metric.value());
            }
        }
        drop(inner);
        println!("==========================================\n");
    }

    /// Save all metrics to a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written to.
    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let json = self.to_json();
        let mut file = File::create(path)?;
        let formatted = serde_json::to_string_pretty(&json)?;
        file.write_all(formatted.as_bytes())?;
        Ok(())
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// A simple counter metric.
pub struct CounterMetric {
    name: String,
    count: u64,
}

impl Metric for CounterMetric {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> Value {
        json!(self.count)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A gauge metric that holds a single numeric value.
pub struct GaugeMetric {
    name: String,
    value: f64,
    description: Option<String>,
}

impl GaugeMetric {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Metric for GaugeMetric {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> Value {
        json!(self.value)
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Records per-transformer seen/skip counts and reduce-phase duration for
/// one [`crate::extractor::Extractor`] or [`crate::multi::MultiExtractor`]
/// run.
pub struct ExtractionMetrics {
    collector: MetricsCollector,
}

impl ExtractionMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            collector: MetricsCollector::new(),
        }
    }

    /// Called once per (record, transformer) during raw extraction:
    /// `present` is whether that slot was `Some` for this record.
    pub fn record_seen(&self, transformer_name: &str, present: bool) {
        if present {
            self.collector.increment_counter(&format!("{transformer_name}_seen"), 1);
        } else {
            self.collector.increment_counter(&format!("{transformer_name}_skipped"), 1);
        }
    }

    /// Called once, when the reduce (prepare/combine/present) phase
    /// completes.
    pub fn record_reduce_duration(&self, elapsed: Duration) {
        #[allow(clippy::cast_precision_loss)]
        self.collector.set_gauge("reduce_duration_ms", elapsed.as_secs_f64() * 1000.0);
    }

    #[must_use]
    pub fn collector(&self) -> &MetricsCollector {
        &self.collector
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        self.collector.to_json()
    }

    pub fn print(&self) {
        self.collector.print();
    }

    /// # Errors
    /// Returns an error if the file cannot be created or written to.
    pub fn save_to_file(&self, path: &str) -> Result<()> {
        self.collector.save_to_file(path)
    }
}

impl Default for ExtractionMetrics {
    fn default() -> Self {
        Self::new()
    }
}
