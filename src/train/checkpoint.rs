//! Checkpoint persistence
//!
//! A checkpoint is a pair of files in one directory: the model parameters
//! as safetensors (whatever `VarMap::save` produces) and a small JSON
//! manifest carrying the scalars the weights file cannot: the next epoch
//! index, the corpus target length the model was shaped for, and the
//! optimizer learning rate. Both are written to a temp file in the same
//! directory and renamed into place, so a crash mid-write never leaves a
//! half-visible checkpoint. The manifest is written last: its presence is
//! what marks a checkpoint as complete.

use std::fs;
use std::path::{Path, PathBuf};

use candle_nn::VarMap;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::{Error, Result};

/// Scalar training state persisted beside the weights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Epoch to resume from (last completed epoch + 1).
    pub epoch: usize,
    /// Encoded sequence length the parameters are shaped for.
    pub target_len: usize,
    /// Optimizer learning rate (SGD carries no other state).
    pub lr: f64,
}

/// Handle on a checkpoint directory.
pub struct Checkpoint {
    dir: PathBuf,
}

impl Checkpoint {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn weights_path(&self) -> PathBuf {
        self.dir.join("checkpoint.safetensors")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join("checkpoint.json")
    }

    pub fn best_weights_path(&self) -> PathBuf {
        self.dir.join("best.safetensors")
    }

    /// Persist the current parameters and manifest, replacing any prior
    /// checkpoint.
    pub fn save(&self, varmap: &VarMap, manifest: &Manifest) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        self.replace_atomically(&self.weights_path(), |tmp| Ok(varmap.save(tmp)?))?;

        let json = serde_json::to_string_pretty(manifest)
            .map_err(|e| Error::Checkpoint(format!("failed to encode manifest: {e}")))?;
        self.replace_atomically(&self.manifest_path(), |tmp| Ok(fs::write(tmp, &json)?))
    }

    /// Persist a snapshot of the current parameters as the best model.
    pub fn save_best(&self, varmap: &VarMap) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        self.replace_atomically(&self.best_weights_path(), |tmp| Ok(varmap.save(tmp)?))
    }

    /// Restore a previous run's state, if any.
    ///
    /// Returns `None` when no manifest exists (fresh start). A manifest
    /// that is unreadable, that disagrees with `target_len`, or whose
    /// weights file is missing or corrupt is a fatal error; masking it
    /// would silently train on the wrong state.
    pub fn resume(&self, varmap: &mut VarMap, target_len: usize) -> Result<Option<Manifest>> {
        let manifest_path = self.manifest_path();
        if !manifest_path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&manifest_path)?;
        let manifest: Manifest = serde_json::from_str(&raw).map_err(|e| {
            Error::Checkpoint(format!("corrupt manifest {}: {e}", manifest_path.display()))
        })?;

        if manifest.target_len != target_len {
            return Err(Error::Checkpoint(format!(
                "checkpoint was written for target length {} but the corpus encodes to {target_len}",
                manifest.target_len
            )));
        }

        varmap.load(self.weights_path())?;
        Ok(Some(manifest))
    }

    fn replace_atomically<F>(&self, dest: &Path, write: F) -> Result<()>
    where
        F: FnOnce(&Path) -> Result<()>,
    {
        let tmp = NamedTempFile::new_in(&self.dir)?;
        write(tmp.path())?;
        tmp.persist(dest)
            .map_err(|e| Error::Checkpoint(format!("failed to replace {}: {e}", dest.display())))?;
        Ok(())
    }
}
