//! Evaluation and reporting
//!
//! Runs a trained model over a held-out batch stream and summarizes the
//! outcome: per-class precision/recall/F1/support, macro and weighted
//! averages, aggregate accuracy, and an sklearn-style report keyed by
//! lineage name.

mod classification;
mod evaluate;

pub use classification::{classification_report, Average, ClassMetrics, ConfusionMatrix};
pub use evaluate::{accuracy_percent, evaluate};
