//! Gaussian Naive Bayes classification over numeric CSV data.
//!
//! Rows are `Vec<f64>` whose last value is the class label. [`dataset`] loads
//! and partitions rows, [`bayes`] fits per-class feature summaries and predicts.

pub mod bayes;
pub mod dataset;
pub mod error;

pub use bayes::{accuracy, FeatureSummary, GaussianNaiveBayes};
pub use error::{BayesError, Result};
