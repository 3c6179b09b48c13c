//! Gap detection: four independent strategies over corpus data.
//!
//! Each strategy is a pure function emitting [`Gap`] records; the aggregate
//! list is sorted by impact score descending, which is the only ordering
//! guarantee placed on it.

mod missing;
mod outdated;
pub mod scoring;
mod thin;
mod underoptimized;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::corpus::{Corpus, TopicComparison};

pub use missing::detect_missing;
pub use outdated::detect_outdated;
pub use thin::detect_thin;
pub use underoptimized::detect_underoptimized;

/// Maximum keywords attached to a single gap.
pub const MAX_GAP_KEYWORDS: usize = 15;

/// The four gap categories, in fixed classifier order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GapType {
    Missing,
    Thin,
    Outdated,
    UnderOptimized,
}

impl GapType {
    /// All gap types in classifier label order.
    pub const ALL: [GapType; 4] = [
        GapType::Missing,
        GapType::Thin,
        GapType::Outdated,
        GapType::UnderOptimized,
    ];

    /// Wire name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            GapType::Missing => "missing",
            GapType::Thin => "thin",
            GapType::Outdated => "outdated",
            GapType::UnderOptimized => "under-optimized",
        }
    }

    /// Display name used in sample descriptions.
    pub fn title_label(self) -> &'static str {
        match self {
            GapType::Missing => "Missing",
            GapType::Thin => "Thin",
            GapType::Outdated => "Outdated",
            GapType::UnderOptimized => "Under-Optimized",
        }
    }

    /// Stable class index into [`GapType::ALL`].
    pub fn index(self) -> usize {
        match self {
            GapType::Missing => 0,
            GapType::Thin => 1,
            GapType::Outdated => 2,
            GapType::UnderOptimized => 3,
        }
    }

    /// Inverse of [`GapType::index`].
    pub fn from_index(index: usize) -> Option<GapType> {
        GapType::ALL.get(index).copied()
    }
}

/// Ordinal effort estimate for closing a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Low,
    Medium,
    High,
}

/// A detected content deficiency relative to competitors.
///
/// Immutable once emitted; downstream recommendation and report generation
/// read every field verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gap {
    pub title: String,
    pub gap_type: GapType,
    /// Related keywords, at most [`MAX_GAP_KEYWORDS`].
    pub keywords: Vec<String>,
    /// Heuristic business value, always in `[15, 100]`.
    pub impact_score: u32,
    pub difficulty: Difficulty,
    pub reason: String,
    pub competitor_coverage: String,
}

/// Tunables for the detection strategies.
#[derive(Debug, Clone)]
pub struct GapDetectorConfig {
    /// Documents older than this many days are flagged as outdated.
    pub age_threshold_days: i64,
    /// Competitor-to-yours mean word count ratio that flags thin content.
    pub thin_ratio: f64,
    /// Minimum missing competitor keywords before a document counts as
    /// under-optimized.
    pub min_missing_keywords: usize,
    /// Reference point for document age; explicit so runs are reproducible.
    pub reference_time: OffsetDateTime,
    /// Competitor count used in coverage strings when the competitor corpus
    /// carries no distinct sources.
    pub fallback_competitor_count: usize,
}

impl Default for GapDetectorConfig {
    fn default() -> Self {
        Self {
            age_threshold_days: 365,
            thin_ratio: 1.3,
            min_missing_keywords: 3,
            reference_time: OffsetDateTime::now_utc(),
            fallback_competitor_count: 3,
        }
    }
}

/// Run all four detection strategies and return the combined gap list,
/// sorted by impact score descending.
///
/// Strategies are independent: empty inputs produce empty sub-lists and a
/// warning, never an error.
pub fn analyze_all_gaps(
    yours: &Corpus,
    competitors: &Corpus,
    comparison: &TopicComparison,
    config: &GapDetectorConfig,
) -> Vec<Gap> {
    if yours.documents.is_empty()
        && competitors.documents.is_empty()
        && comparison.competitor_topics.is_empty()
    {
        warn!("Gap analysis invoked with empty corpora; returning no gaps");
        return Vec::new();
    }

    let competitor_sources: BTreeSet<&str> = competitors
        .documents
        .iter()
        .map(|doc| doc.source.as_str())
        .collect();
    let competitor_count = if competitor_sources.is_empty() {
        config.fallback_competitor_count
    } else {
        competitor_sources.len()
    };

    let mut gaps = Vec::new();

    debug!("Analyzing missing content");
    gaps.extend(detect_missing(
        &yours.top_keywords,
        &comparison.competitor_topics,
        competitor_count,
    ));

    debug!("Analyzing thin content");
    gaps.extend(detect_thin(
        &yours.documents,
        &competitors.documents,
        config.thin_ratio,
    ));

    debug!("Analyzing outdated content");
    gaps.extend(detect_outdated(
        &yours.documents,
        config.age_threshold_days,
        config.reference_time,
    ));

    debug!("Analyzing under-optimized content");
    gaps.extend(detect_underoptimized(
        &yours.documents,
        &competitors.top_keywords,
        config.min_missing_keywords,
    ));

    gaps.sort_by(|a, b| b.impact_score.cmp(&a.impact_score));
    gaps
}

/// Capitalize the letter starting each word, lowercasing the rest.
pub(crate) fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}
