//! Multi-class evaluation metrics and error attribution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::gaps::GapType;

/// Cap on false-positive / false-negative exemplars in a report.
const MAX_ERROR_EXAMPLES: usize = 10;

/// Precision/recall/F1/support for one gap type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

/// Full evaluation artifact consumed by the dashboard and report renderers.
///
/// Field names are part of the external contract and must not be renamed.
/// `precision` and `recall` are macro-averaged; the confusion matrix uses
/// rows for true labels and columns for predictions, in
/// [`GapType::ALL`] order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_macro: f64,
    pub f1_micro: f64,
    pub confusion_matrix: Vec<Vec<usize>>,
    pub samples_evaluated: usize,
    pub false_positives: Vec<String>,
    pub false_negatives: Vec<String>,
    pub per_class_metrics: BTreeMap<String, ClassMetrics>,
}

/// Validation metrics returned by `train`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub accuracy: f64,
    pub precision_macro: f64,
    pub precision_micro: f64,
    pub recall_macro: f64,
    pub recall_micro: f64,
    pub f1_macro: f64,
    pub f1_micro: f64,
}

/// Cross-tabulate true vs predicted class indices.
pub(crate) fn confusion_matrix(
    y_true: &[usize],
    y_pred: &[usize],
    n_classes: usize,
) -> Vec<Vec<usize>> {
    let mut matrix = vec![vec![0usize; n_classes]; n_classes];
    for (&truth, &prediction) in y_true.iter().zip(y_pred) {
        if truth < n_classes && prediction < n_classes {
            matrix[truth][prediction] += 1;
        }
    }
    matrix
}

struct ClassCounts {
    true_positive: usize,
    predicted: usize,
    support: usize,
}

fn class_counts(matrix: &[Vec<usize>]) -> Vec<ClassCounts> {
    let n_classes = matrix.len();
    (0..n_classes)
        .map(|class| ClassCounts {
            true_positive: matrix[class][class],
            predicted: matrix.iter().map(|row| row[class]).sum(),
            support: matrix[class].iter().sum(),
        })
        .collect()
}

fn safe_ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Averaged metrics over a confusion matrix. Returns
/// `(accuracy, precision_macro, precision_micro, recall_macro, recall_micro,
/// f1_macro, f1_micro)`.
fn averaged_metrics(matrix: &[Vec<usize>]) -> (f64, f64, f64, f64, f64, f64, f64) {
    let counts = class_counts(matrix);
    let n_classes = counts.len() as f64;

    let mut precision_sum = 0.0;
    let mut recall_sum = 0.0;
    let mut f1_sum = 0.0;
    let mut tp_total = 0;
    let mut predicted_total = 0;
    let mut support_total = 0;
    for class in &counts {
        let precision = safe_ratio(class.true_positive, class.predicted);
        let recall = safe_ratio(class.true_positive, class.support);
        precision_sum += precision;
        recall_sum += recall;
        f1_sum += f1(precision, recall);
        tp_total += class.true_positive;
        predicted_total += class.predicted;
        support_total += class.support;
    }

    let accuracy = safe_ratio(tp_total, support_total);
    let precision_micro = safe_ratio(tp_total, predicted_total);
    let recall_micro = safe_ratio(tp_total, support_total);
    (
        accuracy,
        precision_sum / n_classes,
        precision_micro,
        recall_sum / n_classes,
        recall_micro,
        f1_sum / n_classes,
        f1(precision_micro, recall_micro),
    )
}

/// Validation-set metrics for `train`.
pub(crate) fn training_metrics(y_true: &[usize], y_pred: &[usize]) -> TrainingMetrics {
    let matrix = confusion_matrix(y_true, y_pred, GapType::ALL.len());
    let (accuracy, precision_macro, precision_micro, recall_macro, recall_micro, f1_macro, f1_micro) =
        averaged_metrics(&matrix);
    TrainingMetrics {
        accuracy,
        precision_macro,
        precision_micro,
        recall_macro,
        recall_micro,
        f1_macro,
        f1_micro,
    }
}

/// Build the full evaluation report for a held-out test set.
///
/// Misclassified examples render as
/// `"{description} | True: {t}, Predicted: {p}"` and are bucketed as false
/// positives when the predicted class index exceeds the true one, false
/// negatives otherwise. For a four-class problem that bucketing is an
/// approximation kept for downstream compatibility.
pub(crate) fn evaluate_predictions(
    y_true: &[usize],
    y_pred: &[usize],
    descriptions: &[String],
) -> EvaluationReport {
    let n_classes = GapType::ALL.len();
    let matrix = confusion_matrix(y_true, y_pred, n_classes);
    let (accuracy, precision_macro, _, recall_macro, _, f1_macro, f1_micro) =
        averaged_metrics(&matrix);

    let mut false_positives = Vec::new();
    let mut false_negatives = Vec::new();
    for (index, (&truth, &prediction)) in y_true.iter().zip(y_pred).enumerate() {
        if truth == prediction {
            continue;
        }
        let description = descriptions.get(index).map(String::as_str).unwrap_or("");
        let true_class = GapType::from_index(truth).map_or("?", GapType::as_str);
        let predicted_class = GapType::from_index(prediction).map_or("?", GapType::as_str);
        let line = format!("{description} | True: {true_class}, Predicted: {predicted_class}");
        if prediction > truth {
            false_positives.push(line);
        } else {
            false_negatives.push(line);
        }
    }
    false_positives.truncate(MAX_ERROR_EXAMPLES);
    false_negatives.truncate(MAX_ERROR_EXAMPLES);

    let counts = class_counts(&matrix);
    let per_class_metrics = GapType::ALL
        .iter()
        .map(|gap_type| {
            let class = &counts[gap_type.index()];
            let precision = safe_ratio(class.true_positive, class.predicted);
            let recall = safe_ratio(class.true_positive, class.support);
            (
                gap_type.as_str().to_string(),
                ClassMetrics {
                    precision,
                    recall,
                    f1_score: f1(precision, recall),
                    support: class.support,
                },
            )
        })
        .collect();

    EvaluationReport {
        accuracy,
        precision: precision_macro,
        recall: recall_macro,
        f1_macro,
        f1_micro,
        confusion_matrix: matrix,
        samples_evaluated: y_true.len(),
        false_positives,
        false_negatives,
        per_class_metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptions(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Sample {i}")).collect()
    }

    #[test]
    fn perfect_predictions_score_one() {
        let y = vec![0, 1, 2, 3, 0, 1, 2, 3];
        let report = evaluate_predictions(&y, &y, &descriptions(y.len()));
        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.precision, 1.0);
        assert_eq!(report.recall, 1.0);
        assert_eq!(report.f1_macro, 1.0);
        assert_eq!(report.f1_micro, 1.0);
        assert!(report.false_positives.is_empty());
        assert!(report.false_negatives.is_empty());
    }

    #[test]
    fn confusion_matrix_rows_sum_to_class_support() {
        let y_true = vec![0, 0, 1, 1, 2, 2, 3, 3, 3];
        let y_pred = vec![0, 1, 1, 1, 2, 3, 3, 0, 3];
        let report = evaluate_predictions(&y_true, &y_pred, &descriptions(y_true.len()));
        for gap_type in GapType::ALL {
            let row_sum: usize = report.confusion_matrix[gap_type.index()].iter().sum();
            let support = report.per_class_metrics[gap_type.as_str()].support;
            assert_eq!(row_sum, support);
        }
        assert_eq!(report.samples_evaluated, y_true.len());
    }

    #[test]
    fn error_lines_carry_description_and_labels() {
        let y_true = vec![0, 2];
        let y_pred = vec![1, 0];
        let descriptions = vec!["Synthetic: A".to_string(), "Real: B".to_string()];
        let report = evaluate_predictions(&y_true, &y_pred, &descriptions);
        assert_eq!(
            report.false_positives,
            vec!["Synthetic: A | True: missing, Predicted: thin"]
        );
        assert_eq!(
            report.false_negatives,
            vec!["Real: B | True: outdated, Predicted: missing"]
        );
    }

    #[test]
    fn error_lists_are_capped_at_ten() {
        let y_true = vec![0; 30];
        let y_pred = vec![1; 30];
        let report = evaluate_predictions(&y_true, &y_pred, &descriptions(30));
        assert_eq!(report.false_positives.len(), 10);
        assert!(report.false_negatives.is_empty());
    }

    #[test]
    fn zero_division_yields_zero_metrics() {
        // Class 3 never occurs and is never predicted.
        let y_true = vec![0, 1, 2];
        let y_pred = vec![0, 1, 2];
        let report = evaluate_predictions(&y_true, &y_pred, &descriptions(3));
        let metrics = &report.per_class_metrics["under-optimized"];
        assert_eq!(metrics.precision, 0.0);
        assert_eq!(metrics.recall, 0.0);
        assert_eq!(metrics.f1_score, 0.0);
        assert_eq!(metrics.support, 0);
    }

    #[test]
    fn report_serializes_with_contract_field_names() {
        let y = vec![0, 1];
        let report = evaluate_predictions(&y, &y, &descriptions(2));
        let json = serde_json::to_value(&report).unwrap();
        for field in [
            "accuracy",
            "precision",
            "recall",
            "f1_macro",
            "f1_micro",
            "confusion_matrix",
            "samples_evaluated",
            "false_positives",
            "false_negatives",
            "per_class_metrics",
        ] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
        let per_class = json.get("per_class_metrics").unwrap();
        assert!(per_class.get("under-optimized").is_some());
    }

    #[test]
    fn micro_scores_match_accuracy_for_single_label_data() {
        let y_true = vec![0, 1, 2, 3, 0, 1];
        let y_pred = vec![0, 1, 2, 0, 0, 2];
        let metrics = training_metrics(&y_true, &y_pred);
        assert!((metrics.precision_micro - metrics.accuracy).abs() < 1e-12);
        assert!((metrics.recall_micro - metrics.accuracy).abs() < 1e-12);
        assert!((metrics.f1_micro - metrics.accuracy).abs() < 1e-12);
    }
}
