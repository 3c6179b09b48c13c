//! TF-IDF vectorization over unigrams and bigrams.
//!
//! The vocabulary is fit once per training run and frozen; `transform`
//! silently ignores terms outside it so inference never fails on unseen
//! text.

use std::collections::{BTreeMap, HashMap, HashSet};

use ndarray::Array2;

/// Cap on vocabulary size.
const MAX_FEATURES: usize = 500;
/// Minimum number of documents a term must appear in.
const MIN_DOCUMENT_FREQUENCY: usize = 2;
/// Maximum share of documents a term may appear in.
const MAX_DOCUMENT_SHARE: f64 = 0.8;

/// Bag-of-terms TF-IDF vectorizer with a frozen vocabulary.
#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    vocabulary: Vec<String>,
    index: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of feature columns, zero before fitting.
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Fit the vocabulary on `texts` and return their feature matrix.
    ///
    /// Replaces any previously fitted vocabulary.
    pub fn fit_transform<S: AsRef<str>>(&mut self, texts: &[S]) -> Array2<f64> {
        let documents: Vec<Vec<String>> =
            texts.iter().map(|text| extract_terms(text.as_ref())).collect();

        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for terms in &documents {
            let unique: HashSet<&str> = terms.iter().map(String::as_str).collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let n_documents = documents.len();
        let max_df = (MAX_DOCUMENT_SHARE * n_documents as f64).floor() as usize;
        let mut candidates: Vec<(&str, usize)> = document_frequency
            .into_iter()
            .filter(|&(_, df)| df >= MIN_DOCUMENT_FREQUENCY && df <= max_df)
            .collect();
        // Keep the most widespread terms; the BTreeMap ordering makes the
        // tie-break lexicographic.
        candidates.sort_by(|a, b| b.1.cmp(&a.1));
        candidates.truncate(MAX_FEATURES);
        candidates.sort_by(|a, b| a.0.cmp(b.0));

        self.vocabulary = candidates.iter().map(|(term, _)| term.to_string()).collect();
        self.index = self
            .vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();
        self.idf = candidates
            .iter()
            .map(|&(_, df)| smoothed_idf(n_documents, df))
            .collect();

        self.weigh_documents(&documents)
    }

    /// Vectorize `texts` through the fitted vocabulary. Out-of-vocabulary
    /// terms contribute nothing.
    pub fn transform<S: AsRef<str>>(&self, texts: &[S]) -> Array2<f64> {
        let documents: Vec<Vec<String>> =
            texts.iter().map(|text| extract_terms(text.as_ref())).collect();
        self.weigh_documents(&documents)
    }

    fn weigh_documents(&self, documents: &[Vec<String>]) -> Array2<f64> {
        let mut matrix = Array2::<f64>::zeros((documents.len(), self.vocabulary.len()));
        for (row, terms) in documents.iter().enumerate() {
            for term in terms {
                if let Some(&column) = self.index.get(term) {
                    matrix[[row, column]] += self.idf[column];
                }
            }
            normalize_row(&mut matrix, row);
        }
        matrix
    }
}

/// Smoothed inverse document frequency: `ln((1 + n) / (1 + df)) + 1`.
fn smoothed_idf(n_documents: usize, document_frequency: usize) -> f64 {
    ((1.0 + n_documents as f64) / (1.0 + document_frequency as f64)).ln() + 1.0
}

fn normalize_row(matrix: &mut Array2<f64>, row: usize) {
    let norm = matrix
        .row(row)
        .iter()
        .map(|v| v * v)
        .sum::<f64>()
        .sqrt();
    if norm > 0.0 {
        for value in matrix.row_mut(row) {
            *value /= norm;
        }
    }
}

/// Unigrams plus bigrams over lowercased alphanumeric tokens.
fn extract_terms(text: &str) -> Vec<String> {
    let tokens = tokenize(text);
    let mut terms = tokens.clone();
    for pair in tokens.windows(2) {
        terms.push(format!("{} {}", pair[0], pair[1]));
    }
    terms
}

/// Lowercase word tokens with stop words, single characters, and bare
/// numbers removed.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| s.len() > 1)
        .filter(|s| !is_stop_word(s))
        .filter(|s| !s.chars().all(|c| c.is_numeric()))
        .map(String::from)
        .collect()
}

fn is_stop_word(word: &str) -> bool {
    const STOP_WORDS: &[&str] = &[
        "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "has", "have",
        "in", "is", "it", "its", "of", "on", "or", "our", "so", "than", "that", "the", "their",
        "this", "to", "too", "was", "we", "were", "will", "with", "you", "your",
    ];
    STOP_WORDS.contains(&word)
}
