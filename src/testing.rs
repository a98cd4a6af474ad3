//! Testing utilities for feature extraction pipelines.
//!
//! This module gives users of this crate a small testing facility for
//! feature vectors and record datasets, analogous to the assertion
//! helpers a dataset-processing library typically ships for its own
//! collection types:
//!
//! - **Assertions**: compare emitted feature vectors (and names) against
//!   expected values, exactly or within an epsilon.
//! - **Test data builders**: assemble record datasets fluently.
//! - **Fixtures**: pre-built sample datasets for common scenarios.
//!
//! # Quick Start
//!
//! ```
//! use vecloom::spec::FeatureSpec;
//! use vecloom::transformers::Identity;
//! use vecloom::builder::VecSink;
//! use vecloom::testing::assert_feature_vectors_close;
//!
//! #[derive(Clone)]
//! struct Row {
//!     x: f64,
//! }
//!
//! let extractor = FeatureSpec::of()
//!     .required(|r: &Row| r.x, Identity::new("x"))
//!     .unwrap()
//!     .extract(vec![Row { x: 1.0 }, Row { x: 2.0 }]);
//!
//! let values = extractor.feature_values(&VecSink::default()).unwrap();
//! assert_feature_vectors_close(&values, &[vec![1.0], vec![2.0]], 1e-9);
//! ```

pub mod assertions;
pub mod builders;
pub mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
