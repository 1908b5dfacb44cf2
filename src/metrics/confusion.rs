use std::collections::BTreeSet;

use nalgebra::DMatrix;

use crate::data::dataset::Symbol;
use crate::error::{Error, Result};

type ConfusionMatrix = DMatrix<usize>;

pub trait ClassificationMetrics<T: Symbol> {
    /// Returns every class found in either label slice, sorted.
    ///
    /// Row and column `i` of [`ClassificationMetrics::confusion_matrix`] refer to the `i`th class.
    fn classes(&self, y_true: &[T], y_pred: &[T]) -> Vec<T> {
        let classes: BTreeSet<&T> = y_true.iter().chain(y_pred).collect();
        classes.into_iter().cloned().collect()
    }

    /// Computes the confusion matrix based on the true labels and predicted labels.
    ///
    /// # Arguments
    ///
    /// * `y_true` - The true labels.
    /// * `y_pred` - The predicted labels.
    ///
    /// # Returns
    ///
    /// The confusion matrix, rows indexed by true class and columns by predicted class.
    fn confusion_matrix(&self, y_true: &[T], y_pred: &[T]) -> Result<ConfusionMatrix> {
        if y_true.len() != y_pred.len() {
            return Err(Error::Parameters(
                "predictions and labels are of different sizes".into(),
            ));
        }

        let classes = self.classes(y_true, y_pred);
        let mut matrix = DMatrix::zeros(classes.len(), classes.len());

        for (y_t, y_p) in y_true.iter().zip(y_pred) {
            let (Ok(matrix_row), Ok(matrix_col)) =
                (classes.binary_search(y_t), classes.binary_search(y_p))
            else {
                continue;
            };
            matrix[(matrix_row, matrix_col)] += 1;
        }

        Ok(matrix)
    }

    /// Computes the share of predictions equal to the true label.
    fn accuracy(&self, y_true: &[T], y_pred: &[T]) -> Result<f64> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;

        if y_true.is_empty() {
            return Ok(0.0);
        }
        let correct: usize = matrix.diagonal().iter().sum();

        Ok(correct as f64 / y_true.len() as f64)
    }

    /// Computes the precision based on the true labels and predicted labels.
    ///
    /// With two classes the greater one is the positive class; otherwise the
    /// per-class precisions are averaged.
    fn precision(&self, y_true: &[T], y_pred: &[T]) -> Result<f64> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;

        let num_classes = matrix.nrows();

        if num_classes == 2 {
            let tp = matrix[(1, 1)];
            let fp = matrix[(0, 1)];

            return Ok(ratio(tp, tp + fp));
        }

        let precision_total: f64 = (0..num_classes)
            .map(|class| {
                let tp = matrix[(class, class)];
                ratio(tp, matrix.column(class).sum())
            })
            .sum();

        Ok(ratio_f64(precision_total, num_classes))
    }

    /// Computes the recall based on the true labels and predicted labels.
    ///
    /// Same class handling as [`ClassificationMetrics::precision`].
    fn recall(&self, y_true: &[T], y_pred: &[T]) -> Result<f64> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;

        let num_classes = matrix.nrows();

        if num_classes == 2 {
            let tp = matrix[(1, 1)];
            let fn_ = matrix[(1, 0)];

            return Ok(ratio(tp, tp + fn_));
        }

        let recall_total: f64 = (0..num_classes)
            .map(|class| {
                let tp = matrix[(class, class)];
                ratio(tp, matrix.row(class).sum())
            })
            .sum();

        Ok(ratio_f64(recall_total, num_classes))
    }

    /// Computes the F1 score, the harmonic mean of precision and recall.
    fn f1_score(&self, y_true: &[T], y_pred: &[T]) -> Result<f64> {
        let precision = self.precision(y_true, y_pred)?;
        let recall = self.recall(y_true, y_pred)?;

        match (precision + recall).abs() < f64::EPSILON {
            true => Err(Error::Parameters(
                "precision and recall are both 0, F1 score undefined".into(),
            )),
            false => Ok(2.0 * (precision * recall) / (precision + recall)),
        }
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    match whole {
        0 => 0.0,
        whole => part as f64 / whole as f64,
    }
}

fn ratio_f64(total: f64, count: usize) -> f64 {
    match count {
        0 => 0.0,
        count => total / count as f64,
    }
}
