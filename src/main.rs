//! linaje CLI
//!
//! Single-command training entry point for the lineage classifier.
//!
//! # Usage
//!
//! ```bash
//! # Train with defaults (samples/lineage{1..12}.fasta, 70 epochs)
//! linaje
//!
//! # Train with overrides
//! linaje --data-dir /data/lineages --epochs 10 --lr 0.001
//!
//! # Resume: re-run with the same checkpoint dir
//! linaje --checkpoint-dir checkpoints
//! ```

use clap::Parser;
use linaje::cli::{run, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
