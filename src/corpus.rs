//! Input types supplied by the acquisition and topic-modeling collaborators.
//!
//! The core never performs I/O; corpora arrive as already-decoded JSON. A
//! malformed document is skipped with a warning so one bad record cannot
//! block an analysis run.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Per-document metadata from the corpus store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Origin of the document (file path or URL).
    pub source: String,
    /// Extracted keywords, most salient first.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Body length in words.
    #[serde(default)]
    pub word_count: u64,
    /// ISO-8601 publication or update time, when known.
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Named entities keyed by entity label.
    #[serde(default)]
    pub entities: serde_json::Map<String, serde_json::Value>,
}

/// Aggregate view of one side's published material.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    #[serde(default)]
    pub document_count: usize,
    #[serde(default)]
    pub total_token_count: u64,
    /// Most frequent keywords across the whole corpus.
    #[serde(default)]
    pub top_keywords: Vec<String>,
    #[serde(default)]
    pub documents: Vec<Document>,
}

/// One topic group produced by the topic-modeling collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicGroup {
    #[serde(default)]
    pub topic_id: usize,
    /// Topic words, strongest first.
    #[serde(default)]
    pub words: Vec<String>,
}

/// Cross-corpus comparison emitted by the topic-modeling collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicComparison {
    #[serde(default)]
    pub your_topics: Vec<TopicGroup>,
    #[serde(default)]
    pub competitor_topics: Vec<TopicGroup>,
    #[serde(default)]
    pub shared_topic_count: usize,
    #[serde(default)]
    pub missing_topic_count: usize,
    #[serde(default)]
    pub avg_similarity: f64,
}

/// Errors raised while decoding corpus payloads.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The top-level payload was not a JSON object.
    #[error("Corpus payload must be a JSON object")]
    NotAnObject,
}

impl Corpus {
    /// Decode a corpus from a raw JSON value.
    ///
    /// Documents missing required fields are skipped and logged rather than
    /// failing the whole corpus.
    pub fn from_json_value(value: &serde_json::Value) -> Result<Self, CorpusError> {
        let object = value.as_object().ok_or(CorpusError::NotAnObject)?;
        let mut corpus = Corpus {
            document_count: read_usize(object, "document_count"),
            total_token_count: read_u64(object, "total_token_count"),
            top_keywords: read_strings(object, "top_keywords"),
            documents: Vec::new(),
        };
        let raw_documents = object
            .get("documents")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        for (index, raw) in raw_documents.into_iter().enumerate() {
            match serde_json::from_value::<Document>(raw) {
                Ok(document) => corpus.documents.push(document),
                Err(err) => {
                    warn!(index, %err, "Skipping malformed corpus document");
                }
            }
        }
        Ok(corpus)
    }
}

fn read_usize(object: &serde_json::Map<String, serde_json::Value>, key: &str) -> usize {
    object
        .get(key)
        .and_then(|v| v.as_u64())
        .unwrap_or_default() as usize
}

fn read_u64(object: &serde_json::Map<String, serde_json::Value>, key: &str) -> u64 {
    object
        .get(key)
        .and_then(|v| v.as_u64())
        .unwrap_or_default()
}

fn read_strings(object: &serde_json::Map<String, serde_json::Value>, key: &str) -> Vec<String> {
    object
        .get(key)
        .and_then(|v| v.as_array())
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
