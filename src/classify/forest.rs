//! Bagged ensemble of decision trees.
//!
//! Each tree is fit on a seeded bootstrap resample with balanced class
//! weights, so minority classes still shape the splits. The vote fraction
//! across trees doubles as the predicted-class probability.

use linfa::prelude::*;
use linfa::Dataset;
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::Rng;

/// Trees in the ensemble.
pub(crate) const ENSEMBLE_SIZE: usize = 50;
/// Depth cap for every tree.
const MAX_TREE_DEPTH: usize = 10;

/// A trained ensemble over a fixed number of classes.
pub(crate) struct GapForest {
    trees: Vec<DecisionTree<f64, usize>>,
    n_classes: usize,
}

/// Fit `n_trees` decision trees on bootstrap resamples of `records`.
pub(crate) fn fit_forest(
    records: &Array2<f64>,
    labels: &[usize],
    n_classes: usize,
    n_trees: usize,
    rng: &mut StdRng,
) -> Result<GapForest, linfa::Error> {
    let n_samples = records.nrows();
    let class_weights = balanced_class_weights(labels, n_classes);

    let mut trees = Vec::with_capacity(n_trees);
    for _ in 0..n_trees {
        let bootstrap: Vec<usize> = (0..n_samples)
            .map(|_| rng.random_range(0..n_samples))
            .collect();
        let boot_records = records.select(Axis(0), &bootstrap);
        let boot_labels: Array1<usize> =
            bootstrap.iter().map(|&index| labels[index]).collect();
        let weights: Array1<f32> = bootstrap
            .iter()
            .map(|&index| class_weights[labels[index]])
            .collect();
        let dataset = Dataset::new(boot_records, boot_labels).with_weights(weights);
        let tree = DecisionTree::params()
            .split_quality(SplitQuality::Gini)
            .max_depth(Some(MAX_TREE_DEPTH))
            .fit(&dataset)?;
        trees.push(tree);
    }
    Ok(GapForest { trees, n_classes })
}

/// Inverse-frequency class weights: `n / (n_classes * count)`.
fn balanced_class_weights(labels: &[usize], n_classes: usize) -> Vec<f32> {
    let mut counts = vec![0usize; n_classes];
    for &label in labels {
        if label < n_classes {
            counts[label] += 1;
        }
    }
    let n = labels.len() as f32;
    counts
        .iter()
        .map(|&count| {
            if count == 0 {
                0.0
            } else {
                n / (n_classes as f32 * count as f32)
            }
        })
        .collect()
}

impl GapForest {
    /// Per-class vote fractions, one row per input row.
    pub(crate) fn predict_proba(&self, records: &Array2<f64>) -> Array2<f64> {
        let mut votes = Array2::<f64>::zeros((records.nrows(), self.n_classes));
        for tree in &self.trees {
            let predictions = tree.predict(records);
            for (row, &label) in predictions.iter().enumerate() {
                if label < self.n_classes {
                    votes[[row, label]] += 1.0;
                }
            }
        }
        if !self.trees.is_empty() {
            votes /= self.trees.len() as f64;
        }
        votes
    }

    /// Majority-vote class per row; ties resolve to the lowest class index.
    pub(crate) fn predict(&self, records: &Array2<f64>) -> Vec<usize> {
        let proba = self.predict_proba(records);
        proba
            .rows()
            .into_iter()
            .map(|row| {
                let mut best = 0;
                let mut best_votes = f64::NEG_INFINITY;
                for (class, &votes) in row.iter().enumerate() {
                    if votes > best_votes {
                        best = class;
                        best_votes = votes;
                    }
                }
                best
            })
            .collect()
    }
}
