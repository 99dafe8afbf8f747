//! linaje: DNA lineage classification trainer
//!
//! Trains a 1-D convolutional network to assign DNA sequences (FASTA
//! records) to one of twelve lineage classes:
//! - Nucleotide encoding with corpus-wide padding ([`encode`])
//! - Per-lineage FASTA loading, seeded splits and mini-batches ([`data`])
//! - The convolutional classifier, shaped from the corpus ([`model`])
//! - Checkpointed, resumable epoch loop ([`train`])
//! - Per-class precision/recall/F1 reporting ([`eval`])
//!
//! Tensor compute, autograd and SGD come from candle; the crate issues
//! work synchronously and blocks on each step.

pub mod cli;
pub mod data;
pub mod device;
pub mod encode;
pub mod error;
pub mod eval;
pub mod logging;
pub mod model;
pub mod train;

pub use error::{Error, Result};
