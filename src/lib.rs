//! Content gap scoring and classification pipeline.
//!
//! Detects content gaps relative to competitor corpora, scores their impact
//! and difficulty, and trains a classifier over real and synthetic gap
//! descriptions with standard multi-class evaluation.

/// Gap-type classification model, vectorizer, and evaluation metrics.
pub mod classify;
/// Input types supplied by corpus and topic-modeling collaborators.
pub mod corpus;
/// Gap detection strategies and scoring heuristics.
pub mod gaps;
/// Tracing subscriber setup.
pub mod logging;
