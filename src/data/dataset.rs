//! Encoded dataset, split and batch iteration

use candle_core::{Device, Tensor};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::encode::preprocess;
use crate::{Error, Result};

/// The full encoded corpus as device tensors.
///
/// Inputs are `[N, 1, target_len]` f32 (one channel per sample), labels are
/// `[N]` u32, in load order.
#[derive(Debug)]
pub struct LineageDataset {
    inputs: Tensor,
    labels: Tensor,
    target_len: usize,
    n_samples: usize,
}

/// The three disjoint, exhaustive partitions of a dataset.
pub struct DataSplit {
    pub train: Subset,
    pub val: Subset,
    pub test: Subset,
}

/// One partition of the corpus.
#[derive(Clone)]
pub struct Subset {
    inputs: Tensor,
    labels: Tensor,
}

impl LineageDataset {
    /// Encode a raw corpus and move it onto `device`.
    ///
    /// The target length is computed once over the whole corpus (see
    /// [`preprocess`]), never per class or per sample.
    pub fn from_sequences(raw: &[String], labels: &[u32], device: &Device) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::Dataset("empty corpus".to_string()));
        }
        if raw.len() != labels.len() {
            return Err(Error::Dataset(format!(
                "{} sequences but {} labels",
                raw.len(),
                labels.len()
            )));
        }

        let (encoded, target_len) = preprocess(raw);
        let n_samples = encoded.len();

        let mut flat = Vec::with_capacity(n_samples * target_len);
        for sequence in &encoded {
            flat.extend(sequence.iter().map(|&b| f32::from(b)));
        }

        let inputs = Tensor::from_vec(flat, (n_samples, 1, target_len), device)?;
        let labels = Tensor::new(labels, device)?;

        Ok(Self { inputs, labels, target_len, n_samples })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.n_samples
    }

    pub fn is_empty(&self) -> bool {
        self.n_samples == 0
    }

    /// Corpus-wide encoded length.
    pub fn target_len(&self) -> usize {
        self.target_len
    }

    /// Randomly partition into train/validation/test subsets.
    ///
    /// Sizes follow floor semantics: `train = floor(train_frac * N)`,
    /// `val = floor(val_frac * N)`, `test = N - train - val`. Membership is
    /// randomized by a ChaCha8 RNG seeded from `seed`, so the partition is
    /// fixed for a given seed and reproducible across runs.
    pub fn split(&self, train_frac: f64, val_frac: f64, seed: u64) -> Result<DataSplit> {
        if !(0.0..=1.0).contains(&train_frac)
            || !(0.0..=1.0).contains(&val_frac)
            || train_frac + val_frac > 1.0
        {
            return Err(Error::Dataset(format!(
                "invalid split fractions: train={train_frac} val={val_frac}"
            )));
        }

        let n = self.n_samples;
        let train_size = (train_frac * n as f64).floor() as usize;
        let val_size = (val_frac * n as f64).floor() as usize;

        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let train = self.subset(&indices[..train_size])?;
        let val = self.subset(&indices[train_size..train_size + val_size])?;
        let test = self.subset(&indices[train_size + val_size..])?;

        Ok(DataSplit { train, val, test })
    }

    fn subset(&self, indices: &[usize]) -> Result<Subset> {
        Ok(Subset {
            inputs: gather_rows(&self.inputs, indices)?,
            labels: gather_rows(&self.labels, indices)?,
        })
    }
}

impl Subset {
    /// Number of samples in this partition.
    pub fn len(&self) -> usize {
        self.labels.dim(0).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Batch iterator over this partition.
    pub fn batches(&self, batch_size: usize) -> BatchIterator {
        BatchIterator::new(self.inputs.clone(), self.labels.clone(), batch_size)
    }

    /// Labels in partition order.
    pub fn labels_vec(&self) -> Result<Vec<u32>> {
        Ok(self.labels.to_vec1()?)
    }
}

/// Mini-batch iterator over pre-loaded tensors.
///
/// Finite and restartable: [`BatchIterator::reshuffle`] reorders for a new
/// epoch, [`BatchIterator::reset`] restarts in the current order.
pub struct BatchIterator {
    inputs: Tensor,
    labels: Tensor,
    indices: Vec<usize>,
    batch_size: usize,
    pos: usize,
}

impl BatchIterator {
    pub fn new(inputs: Tensor, labels: Tensor, batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch size must be positive");
        let n = inputs.dim(0).unwrap_or(0);
        Self {
            inputs,
            labels,
            indices: (0..n).collect(),
            batch_size,
            pos: 0,
        }
    }

    /// Reshuffle for a new epoch using a seeded RNG derived from the base
    /// seed and the epoch index.
    pub fn reshuffle(&mut self, seed: u64, epoch: usize) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(epoch as u64));
        self.indices.shuffle(&mut rng);
        self.pos = 0;
    }

    /// Restart at the beginning without changing the order.
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// Total number of samples behind this iterator.
    pub fn num_samples(&self) -> usize {
        self.indices.len()
    }

    /// Returns the next mini-batch, or `None` once the pass is exhausted.
    pub fn next_batch(&mut self) -> Option<Result<(Tensor, Tensor)>> {
        let n = self.indices.len();
        if self.pos >= n {
            return None;
        }

        let end = (self.pos + self.batch_size).min(n);
        let batch = &self.indices[self.pos..end];
        self.pos = end;

        let gathered = gather_rows(&self.inputs, batch)
            .and_then(|inputs| Ok((inputs, gather_rows(&self.labels, batch)?)));
        Some(gathered)
    }
}

/// Select rows of `tensor` along dim 0.
fn gather_rows(tensor: &Tensor, indices: &[usize]) -> Result<Tensor> {
    if indices.is_empty() {
        let mut dims = tensor.dims().to_vec();
        dims[0] = 0;
        return Ok(Tensor::zeros(dims, tensor.dtype(), tensor.device())?);
    }
    let idx: Vec<u32> = indices.iter().map(|&i| i as u32).collect();
    let idx = Tensor::new(idx.as_slice(), tensor.device())?;
    Ok(tensor.index_select(&idx, 0)?)
}
