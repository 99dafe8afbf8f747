//! Classification metrics

use std::fmt;

/// Averaging strategy for multi-class metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Average {
    /// Unweighted mean over classes.
    Macro,
    /// Mean weighted by class support.
    Weighted,
}

/// Confusion matrix over a fixed set of classes.
///
/// Element `[i][j]` counts samples with true label `i` predicted as `j`.
/// The class count is fixed up front (twelve lineages), so classes absent
/// from a particular split still appear with zero support.
#[derive(Clone, Debug)]
pub struct ConfusionMatrix {
    matrix: Vec<Vec<usize>>,
    n_classes: usize,
}

impl ConfusionMatrix {
    /// Build from aligned prediction/truth slices.
    ///
    /// Labels at or beyond `n_classes` are ignored.
    pub fn from_predictions(y_pred: &[usize], y_true: &[usize], n_classes: usize) -> Self {
        assert_eq!(
            y_pred.len(),
            y_true.len(),
            "predictions and truth must have the same length"
        );

        let mut matrix = vec![vec![0; n_classes]; n_classes];
        for (&pred, &truth) in y_pred.iter().zip(y_true.iter()) {
            if pred < n_classes && truth < n_classes {
                matrix[truth][pred] += 1;
            }
        }

        Self { matrix, n_classes }
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Count at `[true_label][predicted_label]`.
    pub fn get(&self, true_label: usize, predicted_label: usize) -> usize {
        self.matrix[true_label][predicted_label]
    }

    pub fn true_positives(&self, class: usize) -> usize {
        self.matrix[class][class]
    }

    /// Predicted as `class` but weren't.
    pub fn false_positives(&self, class: usize) -> usize {
        (0..self.n_classes)
            .filter(|&i| i != class)
            .map(|i| self.matrix[i][class])
            .sum()
    }

    /// Were `class` but predicted otherwise.
    pub fn false_negatives(&self, class: usize) -> usize {
        (0..self.n_classes)
            .filter(|&j| j != class)
            .map(|j| self.matrix[class][j])
            .sum()
    }

    /// True instances of a class.
    pub fn support(&self, class: usize) -> usize {
        self.matrix[class].iter().sum()
    }

    pub fn total(&self) -> usize {
        self.matrix.iter().flatten().sum()
    }

    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let correct: usize = (0..self.n_classes).map(|i| self.matrix[i][i]).sum();
        correct as f64 / total as f64
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "confusion matrix (rows = true, cols = predicted):")?;
        for row in &self.matrix {
            for count in row {
                write!(f, "{count:>6} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Per-class precision, recall, F1 and support.
#[derive(Clone, Debug)]
pub struct ClassMetrics {
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
    pub f1: Vec<f64>,
    pub support: Vec<usize>,
}

impl ClassMetrics {
    pub fn from_confusion_matrix(cm: &ConfusionMatrix) -> Self {
        let n_classes = cm.n_classes();
        let mut precision = Vec::with_capacity(n_classes);
        let mut recall = Vec::with_capacity(n_classes);
        let mut f1 = Vec::with_capacity(n_classes);
        let mut support = Vec::with_capacity(n_classes);

        for class in 0..n_classes {
            let tp = cm.true_positives(class) as f64;
            let fp = cm.false_positives(class) as f64;
            let fn_ = cm.false_negatives(class) as f64;

            let p = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };
            let r = if tp + fn_ > 0.0 { tp / (tp + fn_) } else { 0.0 };
            let f = if p + r > 0.0 { 2.0 * p * r / (p + r) } else { 0.0 };

            precision.push(p);
            recall.push(r);
            f1.push(f);
            support.push(cm.support(class));
        }

        Self { precision, recall, f1, support }
    }

    pub fn precision_avg(&self, average: Average) -> f64 {
        self.averaged(&self.precision, average)
    }

    pub fn recall_avg(&self, average: Average) -> f64 {
        self.averaged(&self.recall, average)
    }

    pub fn f1_avg(&self, average: Average) -> f64 {
        self.averaged(&self.f1, average)
    }

    fn averaged(&self, values: &[f64], average: Average) -> f64 {
        match average {
            Average::Macro => {
                if values.is_empty() {
                    0.0
                } else {
                    values.iter().sum::<f64>() / values.len() as f64
                }
            }
            Average::Weighted => {
                let total_support: usize = self.support.iter().sum();
                if total_support == 0 {
                    return 0.0;
                }
                values
                    .iter()
                    .zip(self.support.iter())
                    .map(|(&v, &s)| v * s as f64)
                    .sum::<f64>()
                    / total_support as f64
            }
        }
    }
}

/// sklearn-style classification report.
///
/// One row per class name (names in label order), then macro and weighted
/// averages and the aggregate accuracy.
pub fn classification_report(y_pred: &[usize], y_true: &[usize], names: &[String]) -> String {
    let cm = ConfusionMatrix::from_predictions(y_pred, y_true, names.len());
    let metrics = ClassMetrics::from_confusion_matrix(&cm);

    let width = names.iter().map(|n| n.len()).max().unwrap_or(0).max(12);
    let mut report = String::new();

    report.push_str(&format!(
        "{:>width$} {:>10} {:>10} {:>10} {:>10}\n",
        "", "precision", "recall", "f1-score", "support"
    ));
    report.push_str(&"-".repeat(width + 44));
    report.push('\n');

    for (class, name) in names.iter().enumerate() {
        report.push_str(&format!(
            "{name:>width$} {:>10.2} {:>10.2} {:>10.2} {:>10}\n",
            metrics.precision[class],
            metrics.recall[class],
            metrics.f1[class],
            metrics.support[class]
        ));
    }

    report.push_str(&"-".repeat(width + 44));
    report.push('\n');

    let total_support: usize = metrics.support.iter().sum();
    report.push_str(&format!(
        "{:>width$} {:>10.2} {:>10.2} {:>10.2} {:>10}\n",
        "macro avg",
        metrics.precision_avg(Average::Macro),
        metrics.recall_avg(Average::Macro),
        metrics.f1_avg(Average::Macro),
        total_support
    ));
    report.push_str(&format!(
        "{:>width$} {:>10.2} {:>10.2} {:>10.2} {:>10}\n",
        "weighted avg",
        metrics.precision_avg(Average::Weighted),
        metrics.recall_avg(Average::Weighted),
        metrics.f1_avg(Average::Weighted),
        total_support
    ));

    report.push_str(&format!("\naccuracy: {:.4}\n", cm.accuracy()));
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("lineage {}", i + 1)).collect()
    }

    #[test]
    fn test_confusion_matrix_counts() {
        let y_pred = vec![0, 1, 1, 2, 0, 1];
        let y_true = vec![0, 1, 0, 2, 0, 2];
        let cm = ConfusionMatrix::from_predictions(&y_pred, &y_true, 3);

        assert_eq!(cm.get(0, 0), 2);
        assert_eq!(cm.get(0, 1), 1);
        assert_eq!(cm.get(1, 1), 1);
        assert_eq!(cm.get(2, 1), 1);
        assert_eq!(cm.get(2, 2), 1);
        assert_eq!(cm.total(), 6);
    }

    #[test]
    fn test_confusion_matrix_fixed_class_count() {
        // No sample of class 2, but the matrix still covers it.
        let cm = ConfusionMatrix::from_predictions(&[0, 1], &[0, 1], 3);
        assert_eq!(cm.n_classes(), 3);
        assert_eq!(cm.support(2), 0);
    }

    #[test]
    fn test_tp_fp_fn() {
        let y_pred = vec![1, 1, 0, 1];
        let y_true = vec![1, 0, 0, 1];
        let cm = ConfusionMatrix::from_predictions(&y_pred, &y_true, 2);

        assert_eq!(cm.true_positives(1), 2);
        assert_eq!(cm.false_positives(1), 1);
        assert_eq!(cm.false_negatives(1), 0);
        assert_eq!(cm.true_positives(0), 1);
        assert_eq!(cm.false_negatives(0), 1);
    }

    #[test]
    fn test_perfect_predictions_give_unit_metrics() {
        let y = vec![0, 1, 2, 0, 1, 2];
        let cm = ConfusionMatrix::from_predictions(&y, &y, 3);
        let metrics = ClassMetrics::from_confusion_matrix(&cm);

        assert_relative_eq!(cm.accuracy(), 1.0);
        for class in 0..3 {
            assert_relative_eq!(metrics.precision[class], 1.0);
            assert_relative_eq!(metrics.recall[class], 1.0);
            assert_relative_eq!(metrics.f1[class], 1.0);
        }
    }

    #[test]
    fn test_absent_class_metrics_are_zero_not_nan() {
        let cm = ConfusionMatrix::from_predictions(&[0, 0], &[0, 0], 2);
        let metrics = ClassMetrics::from_confusion_matrix(&cm);
        assert_relative_eq!(metrics.precision[1], 0.0);
        assert_relative_eq!(metrics.recall[1], 0.0);
        assert_relative_eq!(metrics.f1[1], 0.0);
    }

    #[test]
    fn test_weighted_average_tracks_support() {
        // Class 0: 3 samples all right. Class 1: 1 sample wrong.
        let y_pred = vec![0, 0, 0, 0];
        let y_true = vec![0, 0, 0, 1];
        let cm = ConfusionMatrix::from_predictions(&y_pred, &y_true, 2);
        let metrics = ClassMetrics::from_confusion_matrix(&cm);

        // recall: class 0 = 1.0 (support 3), class 1 = 0.0 (support 1)
        assert_relative_eq!(metrics.recall_avg(Average::Macro), 0.5);
        assert_relative_eq!(metrics.recall_avg(Average::Weighted), 0.75);
    }

    #[test]
    fn test_report_lists_every_lineage() {
        let y = vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];
        let report = classification_report(&y, &y, &names(12));

        for i in 1..=12 {
            assert!(report.contains(&format!("lineage {i}")));
        }
        assert!(report.contains("macro avg"));
        assert!(report.contains("weighted avg"));
        assert!(report.contains("accuracy: 1.0000"));
    }

    #[test]
    fn test_report_perfect_rows_show_ones() {
        let y = vec![0, 0, 1, 1];
        let report = classification_report(&y, &y, &names(2));
        for line in report.lines().filter(|l| l.contains("lineage")) {
            assert!(line.contains("1.00"));
        }
    }

    #[test]
    fn test_empty_inputs() {
        let cm = ConfusionMatrix::from_predictions(&[], &[], 3);
        assert_eq!(cm.total(), 0);
        assert_relative_eq!(cm.accuracy(), 0.0);
    }
}
