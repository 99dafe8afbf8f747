//! Training configuration

use std::path::PathBuf;

/// Hyperparameters and paths for one training run.
#[derive(Clone, Debug)]
pub struct TrainConfig {
    /// Total number of epochs to reach (resume counts toward this).
    pub epochs: usize,
    /// SGD learning rate.
    pub lr: f64,
    /// Mini-batch size for every split.
    pub batch_size: usize,
    /// Seed for dataset splitting and per-epoch shuffles.
    pub seed: u64,
    /// Directory holding the checkpoint and best-model files.
    pub checkpoint_dir: PathBuf,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs: 70,
            lr: 1e-3,
            batch_size: 64,
            seed: 42,
            checkpoint_dir: PathBuf::from("checkpoints"),
        }
    }
}

impl TrainConfig {
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_lr(mut self, lr: f64) -> Self {
        self.lr = lr;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_checkpoint_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.checkpoint_dir = dir.into();
        self
    }
}
