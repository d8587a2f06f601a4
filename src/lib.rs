//! incomelr: Census Income Classifier Library
//!
//! Loads a headerless census income dataset, cleans it, fits a one-hot
//! feature pipeline on a training split, selects a logistic regression
//! regularization strength by cross-validated ROC-AUC, and persists the
//! model and held-out metric.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
