//! The lineage classifier network
//!
//! Fixed topology: two 1-D convolution + max-pool stages (1→128→256
//! channels, kernel 5, pooling factor 2) into one fully-connected layer
//! producing per-lineage scores, normalized by log-softmax.
//!
//! The fully-connected input width is derived analytically from the
//! corpus target length and the convolution/pooling parameters at
//! construction time, so the model shape follows the corpus instead of
//! hard-coding one corpus's sequence length.

use std::sync::atomic::{AtomicUsize, Ordering};

use candle_core::{D, Tensor};
use candle_nn::{Conv1d, Conv1dConfig, Linear, Module, VarBuilder};

use crate::{Error, Result};

/// Output classes, one per lineage.
pub const NUM_CLASSES: usize = 12;

const CONV1_CHANNELS: usize = 128;
const CONV2_CHANNELS: usize = 256;
const KERNEL_SIZE: usize = 5;
const POOL_SIZE: usize = 2;

/// Shortest encoded length the two conv/pool stages can consume.
pub const MIN_TARGET_LEN: usize = 16;

/// Width of the flattened feature map for an input of `target_len`.
///
/// Each stage shrinks the length to `(l - (KERNEL_SIZE - 1)) / POOL_SIZE`
/// (floor). Errors if `target_len` is too short to survive both stages.
pub fn flattened_len(target_len: usize) -> Result<usize> {
    let l1 = stage_len(target_len);
    let l2 = l1.and_then(stage_len);
    match l2 {
        Some(l2) => Ok(CONV2_CHANNELS * l2),
        None => Err(Error::Shape(format!(
            "target length {target_len} is below the minimum of {MIN_TARGET_LEN}"
        ))),
    }
}

fn stage_len(l: usize) -> Option<usize> {
    let conv = l.checked_sub(KERNEL_SIZE - 1)?;
    let pooled = conv / POOL_SIZE;
    (pooled > 0).then_some(pooled)
}

/// 1-D convolutional lineage classifier.
pub struct LineageCnn {
    conv1: Conv1d,
    conv2: Conv1d,
    fc1: Linear,
    target_len: usize,
    forward_calls: AtomicUsize,
}

impl LineageCnn {
    /// Build the network for inputs of exactly `target_len`.
    pub fn new(vb: VarBuilder, target_len: usize) -> Result<Self> {
        let flat = flattened_len(target_len)?;

        let conv1 = candle_nn::conv1d(
            1,
            CONV1_CHANNELS,
            KERNEL_SIZE,
            Conv1dConfig::default(),
            vb.pp("conv1"),
        )?;
        let conv2 = candle_nn::conv1d(
            CONV1_CHANNELS,
            CONV2_CHANNELS,
            KERNEL_SIZE,
            Conv1dConfig::default(),
            vb.pp("conv2"),
        )?;
        let fc1 = candle_nn::linear(flat, NUM_CLASSES, vb.pp("fc1"))?;

        Ok(Self {
            conv1,
            conv2,
            fc1,
            target_len,
            forward_calls: AtomicUsize::new(0),
        })
    }

    /// Input length this model was built for.
    pub fn target_len(&self) -> usize {
        self.target_len
    }

    /// Forward pass: `[batch, 1, target_len]` → `[batch, 12]` log-probabilities.
    pub fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let calls = self.forward_calls.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("forward pass {calls}");

        let xs = self.conv1.forward(xs)?.relu()?;
        let xs = max_pool1d(&xs, POOL_SIZE)?;
        let xs = self.conv2.forward(&xs)?.relu()?;
        let xs = max_pool1d(&xs, POOL_SIZE)?;
        let xs = xs.flatten_from(1)?;
        let logits = self.fc1.forward(&xs)?;
        Ok(candle_nn::ops::log_softmax(&logits, D::Minus1)?)
    }
}

/// 1-D max pooling over the last dimension of a `[B, C, L]` tensor.
fn max_pool1d(xs: &Tensor, size: usize) -> candle_core::Result<Tensor> {
    xs.unsqueeze(2)?.max_pool2d((1, size))?.squeeze(2)
}
