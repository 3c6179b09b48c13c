//! Under-optimized content detection: documents missing high-value
//! competitor keywords.

use std::collections::HashSet;

use crate::corpus::Document;

use super::outdated::source_basename;
use super::scoring::{classify_difficulty, impact_score, ImpactSignals};
use super::{Difficulty, Gap, GapType, MAX_GAP_KEYWORDS};

/// Maximum under-optimized gaps emitted per run.
const MAX_UNDEROPTIMIZED_GAPS: usize = 10;
/// Missing-keyword count above which optimization is extensive.
const EXTENSIVE_BAND: usize = 40;
/// Missing-keyword count above which optimization is moderate.
const MODERATE_BAND: usize = 25;
/// Cap on the competitor-frequency signal derived from missing keywords.
const MAX_FREQUENCY_SIGNAL: u32 = 8;

/// Detect your documents lacking more than `min_missing` competitor top
/// keywords, returning the top gaps by impact.
pub fn detect_underoptimized(
    your_documents: &[Document],
    competitor_keywords: &[String],
    min_missing: usize,
) -> Vec<Gap> {
    let mut gaps = Vec::new();
    for document in your_documents {
        let owned: HashSet<&str> = document.keywords.iter().map(String::as_str).collect();
        let missing = missing_keywords(competitor_keywords, &owned);
        if missing.len() > min_missing {
            gaps.push(build_gap(document, missing));
        }
    }
    gaps.sort_by(|a, b| b.impact_score.cmp(&a.impact_score));
    gaps.truncate(MAX_UNDEROPTIMIZED_GAPS);
    gaps
}

/// Competitor keywords absent from the document, deduplicated while
/// preserving competitor-list order.
fn missing_keywords<'a>(
    competitor_keywords: &'a [String],
    owned: &HashSet<&str>,
) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    competitor_keywords
        .iter()
        .map(String::as_str)
        .filter(|keyword| !owned.contains(keyword) && seen.insert(*keyword))
        .collect()
}

fn build_gap(document: &Document, missing: Vec<&str>) -> Gap {
    let missing_count = missing.len();
    let impact = impact_score(ImpactSignals {
        competitor_frequency: ((missing_count / 5) as u32).min(MAX_FREQUENCY_SIGNAL),
        search_volume_estimate: (missing_count * 150) as u32,
        topic_importance: (0.5 + missing_count as f64 / 100.0).min(0.9),
        competitive_advantage: 0.7,
        keyword_count: missing_count,
    });
    let (word_estimate, research, complexity) = if missing_count > EXTENSIVE_BAND {
        (
            1500 + missing_count as u64 * 15,
            Difficulty::High,
            Difficulty::Medium,
        )
    } else if missing_count > MODERATE_BAND {
        (
            1000 + missing_count as u64 * 12,
            Difficulty::Medium,
            Difficulty::Medium,
        )
    } else {
        (
            500 + missing_count as u64 * 10,
            Difficulty::Low,
            Difficulty::Low,
        )
    };
    let difficulty = classify_difficulty(word_estimate, research, complexity, &[]);
    Gap {
        title: source_basename(&document.source).to_string(),
        gap_type: GapType::UnderOptimized,
        keywords: missing
            .into_iter()
            .take(MAX_GAP_KEYWORDS)
            .map(str::to_string)
            .collect(),
        impact_score: impact,
        difficulty,
        reason: format!("Missing {missing_count} high-value competitor keywords"),
        competitor_coverage: format!("{missing_count} keyword opportunities"),
    }
}
