//! Inference pass over a batch stream

use candle_core::D;

use crate::data::BatchIterator;
use crate::model::LineageCnn;
use crate::Result;

/// Collect the arg-max prediction and true label for every sample.
///
/// Runs the whole stream from the start in its current order (no
/// reshuffle), with no parameter updates; output order matches stream
/// order.
pub fn evaluate(model: &LineageCnn, batches: &mut BatchIterator) -> Result<(Vec<usize>, Vec<usize>)> {
    let mut predictions = Vec::with_capacity(batches.num_samples());
    let mut truth = Vec::with_capacity(batches.num_samples());

    batches.reset();
    while let Some(batch) = batches.next_batch() {
        let (inputs, labels) = batch?;
        let log_probs = model.forward(&inputs)?;
        let preds = log_probs.argmax(D::Minus1)?.to_vec1::<u32>()?;
        let labels = labels.to_vec1::<u32>()?;

        predictions.extend(preds.into_iter().map(|p| p as usize));
        truth.extend(labels.into_iter().map(|t| t as usize));
    }

    Ok((predictions, truth))
}

/// Overall accuracy as a percentage.
pub fn accuracy_percent(predictions: &[usize], truth: &[usize]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let correct = predictions
        .iter()
        .zip(truth.iter())
        .filter(|(p, t)| p == t)
        .count();
    correct as f64 / truth.len() as f64 * 100.0
}
