//! # vecloom
//!
//! A **declarative feature extraction and transformation engine** for
//! tabular/record data, in the style of a scikit-learn `Pipeline` or a
//! Spark ML `Pipeline`, but built around a two-phase algebraic contract
//! rather than an estimator/transformer class hierarchy.
//!
//! ## Key Features
//!
//! - **Declarative spec API** — declare `required`/`optional` fields and
//!   `cross`ings with a fluent builder, producing an immutable feature set.
//! - **Two-phase extraction** — reduce (prepare/combine/present) a
//!   monoidal summary per transformer, then map/emit feature vectors using
//!   that summary.
//! - **Settings provenance and replay** — serialize the fitted summary to
//!   JSON and replay it against new data without re-scanning the fit set.
//! - **Multi-spec routing** — bundle several specs to emit several
//!   independent feature vectors per record in one pass.
//! - **Sequential and parallel reduction** — choose the right
//!   [`collection::Collection`] implementation for your workload.
//! - **A small reference transformer set** — `Identity`, `MinMaxScaler`,
//!   `StandardScaler`, `OneHotEncoder`, `Bucketizer` — enough to exercise
//!   the engine end to end.
//!
//! ## Quick Start
//!
//! ```
//! use vecloom::spec::FeatureSpec;
//! use vecloom::transformers::{Identity, MinMaxScaler};
//! use vecloom::builder::VecSink;
//! # use anyhow::Result;
//!
//! #[derive(Clone)]
//! struct Order {
//!     price: f64,
//!     quantity: f64,
//! }
//!
//! # fn main() -> Result<()> {
//! let orders = vec![
//!     Order { price: 10.0, quantity: 2.0 },
//!     Order { price: 50.0, quantity: 1.0 },
//! ];
//!
//! let extractor = FeatureSpec::of()
//!     .required(|o: &Order| o.price, MinMaxScaler::new("price"))?
//!     .required(|o: &Order| o.quantity, Identity::new("quantity"))?
//!     .extract(orders);
//!
//! let names = extractor.feature_names()?;
//! let values = extractor.feature_values(&VecSink::default())?;
//! assert_eq!(names, vec!["price".to_string(), "quantity".to_string()]);
//! assert_eq!(values.len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### `Transformer`
//!
//! A [`transformer::Transformer<A, B, C>`] is the algebraic shape every
//! concrete transformer (scaler, encoder, bucketizer) implements: `A` is
//! the raw field type, `B` the aggregator's running state, `C` the
//! presented, frozen summary used at emission time.
//!
//! ### `Aggregator`
//!
//! An [`aggregator::Aggregator<A, B, C>`] is a `prepare`/`combine`/
//! `present` triple: `combine` must be associative, so the reduce phase
//! can run sequentially or in parallel and produce the same result.
//!
//! ### `FeatureSpec` / `FeatureSet`
//!
//! Build a [`spec::FeatureSpec`] by declaring fields, then `.build()` it
//! (or call `.extract()` directly) into an immutable
//! [`feature_set::FeatureSet`] — the ordered array of entries plus any
//! declared crossings.
//!
//! ### `Extractor`
//!
//! An [`extractor::Extractor<T>`] drives one feature set against one
//! dataset. Every query (`feature_names`, `feature_dimension`,
//! `feature_values`, `feature_settings`) is lazily computed and memoized.
//!
//! ### Multi-spec
//!
//! [`multi::MultiFeatureSpec`] bundles several specs sharing one
//! extraction pass, routing each transformer's emission into one of `G`
//! independent output vectors.
//!
//! ## Settings Replay
//!
//! ```
//! use vecloom::spec::FeatureSpec;
//! use vecloom::transformers::MinMaxScaler;
//! # use anyhow::Result;
//!
//! #[derive(Clone)]
//! struct Row { x: f64 }
//!
//! # fn main() -> Result<()> {
//! let fit_set = vec![Row { x: 0.0 }, Row { x: 10.0 }];
//! let fitted = FeatureSpec::of()
//!     .required(|r: &Row| r.x, MinMaxScaler::new("x"))?
//!     .extract(fit_set);
//! let settings = fitted.feature_settings()?;
//!
//! // Later, replay the learned range against new data without refitting.
//! let new_rows = vec![Row { x: 5.0 }];
//! let replayed = FeatureSpec::of()
//!     .required(|r: &Row| r.x, MinMaxScaler::new("x"))?
//!     .extract_with_settings(new_rows, &settings)?;
//! assert_eq!(replayed.feature_dimension()?, 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Execution Modes
//!
//! Choose how the reduce phase runs via [`collection::ExtractionMode`]:
//! - **Sequential** (default) — [`collection::VecCollection`], single-threaded.
//! - **Parallel** — [`collection::RayonCollection`], data-parallel via Rayon.
//!
//! Both modes produce the same result, since `combine` is required to be
//! associative; parallel execution helps on CPU-heavy aggregators over
//! large datasets.
//!
//! ## Tracking Metrics
//! ```
//! # #[cfg(feature = "metrics")]
//! # {
//! use std::sync::Arc;
//! use vecloom::spec::FeatureSpec;
//! use vecloom::transformers::Identity;
//! use vecloom::metrics::ExtractionMetrics;
//!
//! #[derive(Clone)]
//! struct Row { x: f64 }
//!
//! let metrics = Arc::new(ExtractionMetrics::new());
//! let extractor = FeatureSpec::of()
//!     .required(|r: &Row| r.x, Identity::new("x"))
//!     .unwrap()
//!     .build()
//!     .extract(vec![Row { x: 1.0 }])
//!     .with_metrics(metrics.clone());
//! let _ = extractor.feature_names();
//! metrics.print();
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`transformer`] — the transformer contract.
//! - [`aggregator`] — prepare/combine/present.
//! - [`builder`] — the feature builder/sink contract, plus [`builder::VecSink`].
//! - [`entry`] — type-erased per-entry storage.
//! - [`feature_set`] — the built, immutable feature set.
//! - [`spec`] — the fluent spec builder.
//! - [`extractor`] — drives one feature set over one dataset.
//! - [`multi`] — multi-spec bundling and group-routed emission.
//! - [`collection`] — the `Collection` capability trait and execution modes.
//! - [`settings`] — the JSON settings codec.
//! - [`error`] — the `FeatureError` enum.
//! - [`transformers`] — a minimal reference transformer set.
//! - [`metrics`] — extraction metrics (feature: `metrics`, on by default).
//! - [`testing`] — assertions, test record builders, and fixtures.

pub mod aggregator;
pub mod builder;
pub mod collection;
pub mod entry;
pub mod error;
pub mod extractor;
pub mod feature_set;
pub mod multi;
pub mod settings;
pub mod spec;
pub mod transformer;
pub mod transformers;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod testing;

pub use aggregator::Aggregator;
pub use builder::{FeatureBuilder, FeatureSink, VecSink};
pub use collection::{Collection, ExtractionMode, RayonCollection, VecCollection};
pub use error::FeatureError;
pub use extractor::Extractor;
pub use feature_set::FeatureSet;
pub use multi::{MultiExtractor, MultiFeatureSpec};
pub use spec::FeatureSpec;
pub use transformer::{Elem, Transformer};

#[cfg(feature = "metrics")]
pub use metrics::ExtractionMetrics;
