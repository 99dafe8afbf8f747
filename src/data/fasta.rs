//! Per-lineage FASTA loading

use std::path::Path;

use bio::io::fasta;

use crate::{Error, Result};

/// Number of lineage classes; source file `lineage{i}.fasta` gets label
/// `i - 1`.
pub const NUM_LINEAGES: usize = 12;

/// Read all lineage collections from `dir` in fixed label order.
///
/// Returns the raw sequences and their labels, 1:1. A missing or malformed
/// file is fatal; there is no partial corpus.
pub fn load_corpus(dir: &Path) -> Result<(Vec<String>, Vec<u32>)> {
    let mut sequences = Vec::new();
    let mut labels = Vec::new();

    for i in 1..=NUM_LINEAGES {
        let path = dir.join(format!("lineage{i}.fasta"));
        let count = read_lineage_file(&path, &mut sequences)?;
        labels.extend(std::iter::repeat((i - 1) as u32).take(count));
        tracing::info!("loaded {count} sequences from lineage{i}.fasta");
    }

    Ok((sequences, labels))
}

/// Append every record of one FASTA file; returns how many were read.
fn read_lineage_file(path: &Path, sequences: &mut Vec<String>) -> Result<usize> {
    let reader = fasta::Reader::from_file(path).map_err(|e| Error::Fasta {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut count = 0;
    for record in reader.records() {
        let record = record.map_err(|e| Error::Fasta {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        sequences.push(String::from_utf8_lossy(record.seq()).into_owned());
        count += 1;
    }

    Ok(count)
}
