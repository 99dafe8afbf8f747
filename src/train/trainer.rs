//! Epoch loop driving the train and validation phases

use std::fmt;
use std::time::Instant;

use candle_core::{D, Tensor};
use candle_nn::{Optimizer, SGD, VarMap};

use super::{Checkpoint, Manifest, TrainConfig};
use crate::data::BatchIterator;
use crate::model::LineageCnn;
use crate::Result;

/// The two sub-stages of an epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Parameters updated after every batch.
    Train,
    /// Parameters frozen; measures generalization.
    Val,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Train => write!(f, "train"),
            Phase::Val => write!(f, "val"),
        }
    }
}

/// Per-epoch mean loss and accuracy for both phases.
#[derive(Clone, Debug)]
pub struct EpochStats {
    pub epoch: usize,
    pub train_loss: f64,
    pub train_accuracy: f64,
    pub val_loss: f64,
    pub val_accuracy: f64,
}

/// Result of a training run.
#[derive(Clone, Debug)]
pub struct TrainOutcome {
    /// Epoch count reached (== configured epochs unless resumed past it).
    pub final_epoch: usize,
    /// Best validation accuracy seen across the run.
    pub best_val_accuracy: f64,
    /// Wall time of this process's share of the run.
    pub elapsed_secs: f64,
    /// Stats for every epoch executed by this process.
    pub history: Vec<EpochStats>,
}

/// Orchestrates the resumable training loop.
///
/// Each epoch runs a train phase then a validation phase over freshly
/// shuffled batches, tracks the best validation accuracy (persisting that
/// snapshot), and unconditionally writes a checkpoint so an interrupted
/// run restarts from the last completed epoch. The model is left holding
/// the final parameters, not the best ones.
pub struct Trainer {
    model: LineageCnn,
    varmap: VarMap,
    optimizer: SGD,
    config: TrainConfig,
    checkpoint: Checkpoint,
    best_val_accuracy: f64,
}

impl Trainer {
    pub fn new(model: LineageCnn, varmap: VarMap, config: TrainConfig) -> Result<Self> {
        let optimizer = SGD::new(varmap.all_vars(), config.lr)?;
        let checkpoint = Checkpoint::new(&config.checkpoint_dir);
        Ok(Self {
            model,
            varmap,
            optimizer,
            config,
            checkpoint,
            best_val_accuracy: 0.0,
        })
    }

    /// The model being trained.
    pub fn model(&self) -> &LineageCnn {
        &self.model
    }

    /// Run the epoch loop to completion.
    ///
    /// If a checkpoint exists in the configured directory, parameters are
    /// restored and the loop resumes from the persisted epoch; a corrupt
    /// or mismatched checkpoint is a fatal error.
    pub fn fit(
        &mut self,
        train: &mut BatchIterator,
        val: &mut BatchIterator,
    ) -> Result<TrainOutcome> {
        let start = Instant::now();

        let start_epoch = match self
            .checkpoint
            .resume(&mut self.varmap, self.model.target_len())?
        {
            Some(manifest) => {
                tracing::info!("resuming training from epoch {}", manifest.epoch);
                manifest.epoch
            }
            None => 0,
        };

        let last = self.config.epochs.saturating_sub(1);
        let mut history = Vec::new();

        for epoch in start_epoch..self.config.epochs {
            let epoch_start = Instant::now();
            tracing::info!("epoch {epoch}/{last}");
            tracing::info!("----------");

            train.reshuffle(self.config.seed, epoch);
            let (train_loss, train_accuracy) = self.run_phase(Phase::Train, train, epoch)?;

            val.reshuffle(self.config.seed, epoch);
            let (val_loss, val_accuracy) = self.run_phase(Phase::Val, val, epoch)?;

            if val_accuracy > self.best_val_accuracy {
                self.best_val_accuracy = val_accuracy;
                self.checkpoint.save_best(&self.varmap)?;
                tracing::info!("validation accuracy improved to {val_accuracy:.4}, snapshot saved");
            }

            self.checkpoint.save(
                &self.varmap,
                &Manifest {
                    epoch: epoch + 1,
                    target_len: self.model.target_len(),
                    lr: self.config.lr,
                },
            )?;

            history.push(EpochStats {
                epoch,
                train_loss,
                train_accuracy,
                val_loss,
                val_accuracy,
            });
            tracing::info!("epoch time: {:.2} seconds", epoch_start.elapsed().as_secs_f64());
        }

        Ok(TrainOutcome {
            final_epoch: self.config.epochs.max(start_epoch),
            best_val_accuracy: self.best_val_accuracy,
            elapsed_secs: start.elapsed().as_secs_f64(),
            history,
        })
    }

    /// One full pass over a phase's batch stream.
    ///
    /// Returns the epoch-level mean loss (weighted by batch size) and
    /// accuracy for the phase.
    fn run_phase(
        &mut self,
        phase: Phase,
        batches: &mut BatchIterator,
        epoch: usize,
    ) -> Result<(f64, f64)> {
        let phase_start = Instant::now();
        let mut running_loss = 0.0;
        let mut running_corrects = 0usize;
        let mut total = 0usize;

        while let Some(batch) = batches.next_batch() {
            let (inputs, labels) = batch?;
            let batch_len = labels.dim(0)?;

            let log_probs = self.model.forward(&inputs)?;
            let loss = candle_nn::loss::nll(&log_probs, &labels)?;

            if phase == Phase::Train {
                self.optimizer.backward_step(&loss)?;
            }

            running_loss += f64::from(loss.to_scalar::<f32>()?) * batch_len as f64;
            running_corrects += count_correct(&log_probs, &labels)?;
            total += batch_len;
        }

        let loss = safe_avg(running_loss, total);
        let accuracy = safe_avg(running_corrects as f64, total);
        let last = self.config.epochs.saturating_sub(1);
        tracing::info!("{phase} epoch {epoch}/{last}: loss={loss:.4} acc={accuracy:.4}");
        tracing::info!("{phase} phase time: {:.2} seconds", phase_start.elapsed().as_secs_f64());

        Ok((loss, accuracy))
    }
}

fn count_correct(log_probs: &Tensor, labels: &Tensor) -> Result<usize> {
    let preds = log_probs.argmax(D::Minus1)?.to_vec1::<u32>()?;
    let truth = labels.to_vec1::<u32>()?;
    Ok(preds.iter().zip(truth.iter()).filter(|(p, t)| p == t).count())
}

/// Average that tolerates an empty stream.
fn safe_avg(total: f64, count: usize) -> f64 {
    if count > 0 {
        total / count as f64
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LineageDataset;
    use crate::model::NUM_CLASSES;
    use candle_core::{DType, Device};
    use candle_nn::VarBuilder;

    const LEN: usize = 20;

    fn tiny_split(n: usize) -> (BatchIterator, BatchIterator) {
        let raw: Vec<String> = (0..n).map(|i| "ACGT".repeat(LEN / 4 + i % 2)).collect();
        let labels: Vec<u32> = (0..n).map(|i| (i % NUM_CLASSES) as u32).collect();
        let ds = LineageDataset::from_sequences(&raw, &labels, &Device::Cpu).unwrap();
        let split = ds.split(0.75, 0.25, 42).unwrap();
        (split.train.batches(8), split.val.batches(8))
    }

    fn tiny_trainer(config: TrainConfig) -> Trainer {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        // Corpus above has max length 24 (six ACGT repeats).
        let model = LineageCnn::new(vb, 24).unwrap();
        Trainer::new(model, varmap, config).unwrap()
    }

    #[test]
    fn test_fit_runs_all_epochs_and_checkpoints() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrainConfig::default()
            .with_epochs(2)
            .with_batch_size(8)
            .with_checkpoint_dir(dir.path());
        let mut trainer = tiny_trainer(config);

        let (mut train, mut val) = tiny_split(24);
        let outcome = trainer.fit(&mut train, &mut val).unwrap();

        assert_eq!(outcome.final_epoch, 2);
        assert_eq!(outcome.history.len(), 2);
        assert_eq!(outcome.history[0].epoch, 0);
        assert!(outcome.history.iter().all(|s| s.train_loss.is_finite()));

        let ckpt = Checkpoint::new(dir.path());
        assert!(ckpt.weights_path().exists());
        assert!(ckpt.manifest_path().exists());
    }

    #[test]
    fn test_fit_resumes_from_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrainConfig::default()
            .with_epochs(2)
            .with_batch_size(8)
            .with_checkpoint_dir(dir.path());

        let (mut train, mut val) = tiny_split(24);
        tiny_trainer(config.clone()).fit(&mut train, &mut val).unwrap();

        // A new process picks up at epoch 2 and only runs 2 more.
        let mut resumed = tiny_trainer(config.with_epochs(4));
        let outcome = resumed.fit(&mut train, &mut val).unwrap();
        assert_eq!(outcome.history.len(), 2);
        assert_eq!(outcome.history[0].epoch, 2);
        assert_eq!(outcome.final_epoch, 4);
    }

    #[test]
    fn test_fit_with_completed_checkpoint_runs_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrainConfig::default()
            .with_epochs(1)
            .with_batch_size(8)
            .with_checkpoint_dir(dir.path());

        let (mut train, mut val) = tiny_split(24);
        tiny_trainer(config.clone()).fit(&mut train, &mut val).unwrap();

        let outcome = tiny_trainer(config).fit(&mut train, &mut val).unwrap();
        assert!(outcome.history.is_empty());
        assert_eq!(outcome.final_epoch, 1);
    }

    #[test]
    fn test_best_snapshot_written_when_accuracy_improves() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrainConfig::default()
            .with_epochs(1)
            .with_batch_size(8)
            .with_checkpoint_dir(dir.path());
        let mut trainer = tiny_trainer(config);

        let (mut train, mut val) = tiny_split(24);
        let outcome = trainer.fit(&mut train, &mut val).unwrap();

        // With 12 classes over 6 validation samples any accuracy > 0 is an
        // improvement over the initial 0.0; either way the field is sane.
        assert!(outcome.best_val_accuracy >= 0.0);
        if outcome.best_val_accuracy > 0.0 {
            assert!(Checkpoint::new(dir.path()).best_weights_path().exists());
        }
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Train.to_string(), "train");
        assert_eq!(Phase::Val.to_string(), "val");
    }

    #[test]
    fn test_safe_avg_empty() {
        assert_eq!(safe_avg(0.0, 0), 0.0);
        assert!((safe_avg(6.0, 3) - 2.0).abs() < 1e-12);
    }
}
