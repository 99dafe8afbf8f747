//! Command-line interface

use std::path::PathBuf;

use candle_core::{DType, Device};
use candle_nn::{VarBuilder, VarMap};
use clap::Parser;

use crate::data::{label_names, load_corpus, LineageDataset};
use crate::device::select_device;
use crate::eval::{accuracy_percent, classification_report, evaluate};
use crate::logging::{self, LogConfig};
use crate::model::LineageCnn;
use crate::train::{TrainConfig, Trainer};
use crate::Result;

/// Train the lineage classifier and report held-out metrics.
#[derive(Debug, Parser)]
#[command(name = "linaje", version, about)]
pub struct Cli {
    /// Directory containing lineage{1..12}.fasta
    #[arg(long, default_value = "samples")]
    pub data_dir: PathBuf,

    /// Number of training epochs
    #[arg(long, default_value_t = 70)]
    pub epochs: usize,

    /// SGD learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Mini-batch size
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Seed for dataset splitting and shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Checkpoint directory
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: PathBuf,

    /// Log file (console output is always on)
    #[arg(long, default_value = "training.log")]
    pub log_file: PathBuf,

    /// Force CPU even when an accelerator is available
    #[arg(long)]
    pub cpu: bool,
}

impl Cli {
    fn train_config(&self) -> TrainConfig {
        TrainConfig::default()
            .with_epochs(self.epochs)
            .with_lr(self.lr)
            .with_batch_size(self.batch_size)
            .with_seed(self.seed)
            .with_checkpoint_dir(&self.checkpoint_dir)
    }
}

/// Run the whole pipeline: load, encode, split, train, report.
pub fn run(cli: Cli) -> Result<()> {
    logging::init(&LogConfig::default().with_file(&cli.log_file))?;

    let device = if cli.cpu { Device::Cpu } else { select_device() };

    let (sequences, labels) = load_corpus(&cli.data_dir)?;
    let dataset = LineageDataset::from_sequences(&sequences, &labels, &device)?;
    tracing::info!(
        "corpus: {} sequences, target length {}",
        dataset.len(),
        dataset.target_len()
    );

    let split = dataset.split(0.75, 0.15, cli.seed)?;
    let mut train_batches = split.train.batches(cli.batch_size);
    let mut val_batches = split.val.batches(cli.batch_size);

    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
    let model = LineageCnn::new(vb, dataset.target_len())?;

    let mut trainer = Trainer::new(model, varmap, cli.train_config())?;
    let outcome = trainer.fit(&mut train_batches, &mut val_batches)?;
    tracing::info!("training complete");
    tracing::info!("total training time: {:.2} seconds", outcome.elapsed_secs);

    let names = label_names();

    let mut test_batches = split.test.batches(cli.batch_size);
    let (test_preds, test_truth) = evaluate(trainer.model(), &mut test_batches)?;
    tracing::info!(
        "classification report (test):\n{}",
        classification_report(&test_preds, &test_truth, &names)
    );

    let (val_preds, val_truth) = evaluate(trainer.model(), &mut val_batches)?;
    tracing::info!(
        "classification report (validation):\n{}",
        classification_report(&val_preds, &val_truth, &names)
    );

    tracing::info!(
        "validation accuracy: {:.2}%",
        accuracy_percent(&val_preds, &val_truth)
    );
    tracing::info!(
        "test accuracy: {:.2}%",
        accuracy_percent(&test_preds, &test_truth)
    );

    Ok(())
}
