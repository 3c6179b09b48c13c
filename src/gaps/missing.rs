//! Missing-content detection: topics competitors cover that you do not.

use std::collections::{HashMap, HashSet};

use crate::corpus::TopicGroup;

use super::scoring::{classify_difficulty, impact_score, ImpactSignals};
use super::{title_case, Difficulty, Gap, GapType, MAX_GAP_KEYWORDS};

/// Maximum missing-content gaps emitted per run.
const MAX_MISSING_GAPS: usize = 20;
/// Topic words per group that count toward coverage frequency.
const COVERAGE_WORDS_PER_TOPIC: usize = 5;
/// Topic words per group collected as related keywords.
const RELATED_WORDS_PER_TOPIC: usize = 10;
/// Frequency at which a topic is considered widely covered.
const WIDE_COVERAGE_FREQUENCY: u32 = 3;
/// Frequency above which closing the gap demands deep research.
const DEEP_RESEARCH_FREQUENCY: u32 = 4;

struct TopicCoverage {
    word: String,
    frequency: u32,
    first_seen: usize,
    related: Vec<String>,
}

/// Detect competitor-only topics, ranked by coverage frequency with ties
/// broken by first occurrence.
pub fn detect_missing(
    your_top_keywords: &[String],
    competitor_topics: &[TopicGroup],
    competitor_count: usize,
) -> Vec<Gap> {
    let yours: HashSet<String> = your_top_keywords
        .iter()
        .map(|k| k.to_lowercase())
        .collect();

    let mut coverage: Vec<TopicCoverage> = Vec::new();
    let mut index_by_word: HashMap<String, usize> = HashMap::new();
    for topic in competitor_topics {
        for word in topic.words.iter().take(COVERAGE_WORDS_PER_TOPIC) {
            let lowered = word.to_lowercase();
            if yours.contains(&lowered) {
                continue;
            }
            let slot = *index_by_word.entry(lowered.clone()).or_insert_with(|| {
                coverage.push(TopicCoverage {
                    word: lowered,
                    frequency: 0,
                    first_seen: coverage.len(),
                    related: Vec::new(),
                });
                coverage.len() - 1
            });
            let entry = &mut coverage[slot];
            entry.frequency += 1;
            entry
                .related
                .extend(topic.words.iter().take(RELATED_WORDS_PER_TOPIC).cloned());
        }
    }

    coverage.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then(a.first_seen.cmp(&b.first_seen))
    });

    coverage
        .iter()
        .take(MAX_MISSING_GAPS)
        .map(|entry| build_gap(entry, competitor_count))
        .collect()
}

fn build_gap(entry: &TopicCoverage, competitor_count: usize) -> Gap {
    let keywords = dedup_keywords(&entry.related);
    let frequency = entry.frequency;
    let impact = impact_score(ImpactSignals {
        competitor_frequency: frequency,
        search_volume_estimate: frequency * 600,
        topic_importance: (0.5 + f64::from(frequency) / 10.0).min(1.0),
        competitive_advantage: if frequency >= WIDE_COVERAGE_FREQUENCY {
            0.7
        } else {
            0.5
        },
        keyword_count: keywords.len(),
    });
    let word_estimate = 1000 + u64::from(frequency) * 200;
    let difficulty = classify_difficulty(
        word_estimate,
        if frequency >= DEEP_RESEARCH_FREQUENCY {
            Difficulty::High
        } else {
            Difficulty::Medium
        },
        Difficulty::Medium,
        &[],
    );
    Gap {
        title: format!("Content about {}", title_case(&entry.word)),
        gap_type: GapType::Missing,
        keywords,
        impact_score: impact,
        difficulty,
        reason: format!(
            "Topic covered by {frequency} competitors but absent from your content"
        ),
        competitor_coverage: format!("{frequency}/{competitor_count} competitors"),
    }
}

fn dedup_keywords(related: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keywords = Vec::new();
    for word in related {
        if seen.insert(word.clone()) {
            keywords.push(word.clone());
            if keywords.len() == MAX_GAP_KEYWORDS {
                break;
            }
        }
    }
    keywords
}
