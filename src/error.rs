//! Crate error types

use std::path::PathBuf;

/// Errors surfaced by the training pipeline.
///
/// There is no local recovery anywhere in the crate: every failure
/// propagates up to `main`, which reports it and exits non-zero. The only
/// resilience mechanism is the inter-run checkpoint resume.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("tensor error: {0}")]
    Tensor(#[from] candle_core::Error),

    #[error("failed to read {path}: {reason}")]
    Fasta { path: PathBuf, reason: String },

    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("model shape error: {0}")]
    Shape(String),

    #[error("checkpoint error: {0}")]
    Checkpoint(String),
}

pub type Result<T> = std::result::Result<T, Error>;
