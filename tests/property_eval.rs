//! Property tests for evaluation metrics and dataset splitting
//!
//! Ensures the reported metrics satisfy their mathematical invariants:
//! - Metrics bounded to [0, 1], never NaN or infinite
//! - Perfect predictions score 1.0 everywhere
//! - Support sums match the sample count
//! - Split sizes follow floor semantics and cover the corpus

use candle_core::Device;
use linaje::data::LineageDataset;
use linaje::eval::{Average, ClassMetrics, ConfusionMatrix};
use proptest::collection::vec;
use proptest::prelude::*;

const N_CLASSES: usize = 12;

/// Generate aligned prediction/truth vectors over the lineage classes.
fn label_pair(len: std::ops::Range<usize>) -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
    len.prop_flat_map(|l| (vec(0..N_CLASSES, l), vec(0..N_CLASSES, l)))
}

proptest! {
    #[test]
    fn prop_accuracy_bounded((y_pred, y_true) in label_pair(1..200)) {
        let cm = ConfusionMatrix::from_predictions(&y_pred, &y_true, N_CLASSES);
        let acc = cm.accuracy();
        prop_assert!((0.0..=1.0).contains(&acc));
        prop_assert!(acc.is_finite());
    }

    #[test]
    fn prop_perfect_predictions_score_one(y in vec(0..N_CLASSES, 1..200)) {
        let cm = ConfusionMatrix::from_predictions(&y, &y, N_CLASSES);
        prop_assert!((cm.accuracy() - 1.0).abs() < 1e-9);

        let metrics = ClassMetrics::from_confusion_matrix(&cm);
        for class in 0..N_CLASSES {
            if metrics.support[class] > 0 {
                prop_assert!((metrics.precision[class] - 1.0).abs() < 1e-9);
                prop_assert!((metrics.recall[class] - 1.0).abs() < 1e-9);
                prop_assert!((metrics.f1[class] - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn prop_per_class_metrics_bounded((y_pred, y_true) in label_pair(1..200)) {
        let cm = ConfusionMatrix::from_predictions(&y_pred, &y_true, N_CLASSES);
        let metrics = ClassMetrics::from_confusion_matrix(&cm);

        for class in 0..N_CLASSES {
            for value in [metrics.precision[class], metrics.recall[class], metrics.f1[class]] {
                prop_assert!((0.0..=1.0).contains(&value));
                prop_assert!(value.is_finite());
            }
        }
        for average in [Average::Macro, Average::Weighted] {
            prop_assert!((0.0..=1.0).contains(&metrics.f1_avg(average)));
        }
    }

    #[test]
    fn prop_support_sums_to_sample_count((y_pred, y_true) in label_pair(1..200)) {
        let cm = ConfusionMatrix::from_predictions(&y_pred, &y_true, N_CLASSES);
        let metrics = ClassMetrics::from_confusion_matrix(&cm);
        let total: usize = metrics.support.iter().sum();
        prop_assert_eq!(total, y_true.len());
        prop_assert_eq!(cm.total(), y_true.len());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// train = floor(0.75 N), val = floor(0.15 N), test = the rest, and the
    /// three partitions cover the corpus exactly.
    #[test]
    fn prop_split_sizes_floor_semantics(n in 1usize..200, seed in 0u64..1000) {
        let raw: Vec<String> = (0..n).map(|_| "ACGT".to_string()).collect();
        let labels: Vec<u32> = (0..n).map(|i| (i % N_CLASSES) as u32).collect();
        let ds = LineageDataset::from_sequences(&raw, &labels, &Device::Cpu).unwrap();

        let split = ds.split(0.75, 0.15, seed).unwrap();
        let train = split.train.len();
        let val = split.val.len();
        let test = split.test.len();

        prop_assert_eq!(train, (0.75 * n as f64).floor() as usize);
        prop_assert_eq!(val, (0.15 * n as f64).floor() as usize);
        prop_assert_eq!(train + val + test, n);
    }
}
