//! Training loop
//!
//! This module provides the checkpointed, resumable epoch loop:
//! - Training configuration with the run's hyperparameters
//! - Checkpoint persistence (safetensors weights + JSON manifest)
//! - Trainer driving the train/validation phases of each epoch
//!
//! # Example
//!
//! ```no_run
//! use candle_core::{DType, Device};
//! use candle_nn::{VarBuilder, VarMap};
//! use linaje::model::LineageCnn;
//! use linaje::train::{TrainConfig, Trainer};
//!
//! # fn run(mut train_batches: linaje::data::BatchIterator,
//! #        mut val_batches: linaje::data::BatchIterator) -> linaje::Result<()> {
//! let varmap = VarMap::new();
//! let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
//! let model = LineageCnn::new(vb, 100)?;
//!
//! let config = TrainConfig::default().with_epochs(70);
//! let mut trainer = Trainer::new(model, varmap, config)?;
//! let outcome = trainer.fit(&mut train_batches, &mut val_batches)?;
//! println!("best validation accuracy: {:.4}", outcome.best_val_accuracy);
//! # Ok(())
//! # }
//! ```

mod checkpoint;
mod config;
mod trainer;

pub use checkpoint::{Checkpoint, Manifest};
pub use config::TrainConfig;
pub use trainer::{EpochStats, Phase, TrainOutcome, Trainer};
