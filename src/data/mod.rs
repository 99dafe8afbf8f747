//! Dataset construction
//!
//! Loads the twelve per-lineage FASTA collections, encodes them with a
//! corpus-wide target length, and partitions the result into train,
//! validation and test subsets served as shuffled mini-batches.

mod dataset;
mod fasta;

pub use dataset::{BatchIterator, DataSplit, LineageDataset, Subset};
pub use fasta::{load_corpus, NUM_LINEAGES};

/// Class names in label order, `"lineage 1"` through `"lineage 12"`.
pub fn label_names() -> Vec<String> {
    (0..NUM_LINEAGES).map(|i| format!("lineage {}", i + 1)).collect()
}
