//! Gap-type classification: training data assembly, the trainable model,
//! and its evaluation.
//!
//! One seed governs every stochastic step (synthetic generation, stratified
//! splits, bootstrap resampling), so identical inputs produce identical
//! metrics across runs.

mod evaluation;
mod forest;
mod split;
pub mod synthetic;
pub mod vectorizer;

use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, warn};

use crate::gaps::{Gap, GapType};

use self::forest::{fit_forest, GapForest, ENSEMBLE_SIZE};
use self::split::stratified_split;
use self::synthetic::SyntheticGenerator;
use self::vectorizer::TfidfVectorizer;

pub use self::evaluation::{ClassMetrics, EvaluationReport, TrainingMetrics};

/// Share of samples held out for validation during training.
const VALIDATION_FRACTION: f64 = 0.2;
/// Share of samples held out for the evaluation test set.
const TEST_FRACTION: f64 = 0.25;
/// Advisory accuracy floor; falling below it logs a warning.
const ACCURACY_THRESHOLD: f64 = 0.80;
/// Gap keywords folded into a training text.
const KEYWORDS_PER_TEXT: usize = 10;

/// One labeled text example, real or synthetic.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSample {
    pub text: String,
    pub label: GapType,
    pub description: String,
    pub is_synthetic: bool,
}

/// Vectorized training data for one run.
///
/// The feature matrix is tied to the vocabulary the classifier fit while
/// building it; rebuild the set to retrain on different data.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    pub features: Array2<f64>,
    pub labels: Vec<GapType>,
    pub descriptions: Vec<String>,
}

/// Errors surfaced by training, evaluation, and prediction.
#[derive(Debug, Error)]
pub enum ModelError {
    /// `evaluate` or `predict` was called before `train`.
    #[error("Model must be trained before this operation")]
    NotTrained,
    /// The training set had no samples or no features.
    #[error("Training set is empty")]
    EmptyTrainingSet,
    /// The underlying decision-tree fit failed.
    #[error("Decision tree fit failed: {0}")]
    Fit(#[from] linfa::Error),
}

/// Multi-class gap classifier over TF-IDF features.
///
/// State moves from untrained to trained on a successful [`train`] call;
/// retraining replaces the previous ensemble atomically.
///
/// [`train`]: GapClassifier::train
pub struct GapClassifier {
    seed: u64,
    vectorizer: TfidfVectorizer,
    forest: Option<GapForest>,
}

impl GapClassifier {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            vectorizer: TfidfVectorizer::new(),
            forest: None,
        }
    }

    /// Whether [`GapClassifier::train`] has completed.
    pub fn is_trained(&self) -> bool {
        self.forest.is_some()
    }

    /// Assemble a training set from detected gaps plus `n_synthetic`
    /// generated samples, fitting the vectorizer vocabulary.
    ///
    /// Any previously trained ensemble is discarded because its features no
    /// longer match the new vocabulary.
    pub fn build_training_set(&mut self, gaps: &[Gap], n_synthetic: usize) -> TrainingSet {
        let mut texts = Vec::new();
        let mut labels = Vec::new();
        let mut descriptions = Vec::new();

        for gap in gaps {
            let keywords = gap
                .keywords
                .iter()
                .take(KEYWORDS_PER_TEXT)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" ");
            texts.push(format!("{} {} {}", gap.title, keywords, gap.reason));
            labels.push(gap.gap_type);
            descriptions.push(format!("Real: {}", gap.title));
        }

        let mut generator = SyntheticGenerator::new(self.seed);
        for sample in generator.generate(n_synthetic) {
            texts.push(sample.text);
            labels.push(sample.label);
            descriptions.push(format!("Synthetic: {}", sample.description));
        }

        debug!(
            real = gaps.len(),
            total = texts.len(),
            "Vectorizing training texts"
        );
        let features = self.vectorizer.fit_transform(&texts);
        self.forest = None;

        TrainingSet {
            features,
            labels,
            descriptions,
        }
    }

    /// Train the ensemble on a stratified 80/20 split and return
    /// validation-set metrics.
    pub fn train(&mut self, set: &TrainingSet) -> Result<TrainingMetrics, ModelError> {
        if set.features.nrows() == 0 || set.features.ncols() == 0 {
            return Err(ModelError::EmptyTrainingSet);
        }
        let labels: Vec<usize> = set.labels.iter().map(|label| label.index()).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let (train_indices, validation_indices) = stratified_split(
            &labels,
            GapType::ALL.len(),
            VALIDATION_FRACTION,
            &mut rng,
        );

        let train_records = set.features.select(Axis(0), &train_indices);
        let train_labels: Vec<usize> = train_indices.iter().map(|&i| labels[i]).collect();
        let forest = fit_forest(
            &train_records,
            &train_labels,
            GapType::ALL.len(),
            ENSEMBLE_SIZE,
            &mut rng,
        )?;

        let validation_records = set.features.select(Axis(0), &validation_indices);
        let validation_truth: Vec<usize> =
            validation_indices.iter().map(|&i| labels[i]).collect();
        let predictions = forest.predict(&validation_records);
        let metrics = evaluation::training_metrics(&validation_truth, &predictions);

        self.forest = Some(forest);
        Ok(metrics)
    }

    /// Evaluate the trained ensemble on a stratified 75/25 re-split.
    ///
    /// An accuracy below the advisory threshold logs a warning; the report
    /// is returned either way.
    pub fn evaluate(&self, set: &TrainingSet) -> Result<EvaluationReport, ModelError> {
        let forest = self.forest.as_ref().ok_or(ModelError::NotTrained)?;
        let labels: Vec<usize> = set.labels.iter().map(|label| label.index()).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let (_, test_indices) =
            stratified_split(&labels, GapType::ALL.len(), TEST_FRACTION, &mut rng);

        let test_records = set.features.select(Axis(0), &test_indices);
        let test_truth: Vec<usize> = test_indices.iter().map(|&i| labels[i]).collect();
        let test_descriptions: Vec<String> = test_indices
            .iter()
            .map(|&i| set.descriptions.get(i).cloned().unwrap_or_default())
            .collect();
        let predictions = forest.predict(&test_records);
        let report =
            evaluation::evaluate_predictions(&test_truth, &predictions, &test_descriptions);

        if report.accuracy < ACCURACY_THRESHOLD {
            warn!(
                accuracy = report.accuracy,
                threshold = ACCURACY_THRESHOLD,
                "Model accuracy is below the advisory threshold"
            );
        }
        Ok(report)
    }

    /// Predict the gap type for new text, with the ensemble vote fraction as
    /// confidence.
    pub fn predict(&self, text: &str) -> Result<(GapType, f64), ModelError> {
        let forest = self.forest.as_ref().ok_or(ModelError::NotTrained)?;
        let features = self.vectorizer.transform(&[text]);
        let proba = forest.predict_proba(&features);
        let mut best = 0;
        let mut confidence = f64::NEG_INFINITY;
        for (class, &votes) in proba.row(0).iter().enumerate() {
            if votes > confidence {
                best = class;
                confidence = votes;
            }
        }
        let gap_type = GapType::from_index(best).ok_or(ModelError::NotTrained)?;
        Ok((gap_type, confidence))
    }
}
