//! Thin-content detection: topics you cover with less depth than competitors.

use std::collections::HashMap;

use crate::corpus::Document;

use super::scoring::{classify_difficulty, impact_score, ImpactSignals};
use super::{title_case, Difficulty, Gap, GapType, MAX_GAP_KEYWORDS};

/// Maximum thin-content gaps emitted per run.
const MAX_THIN_GAPS: usize = 10;
/// Leading keywords per document treated as its primary topics.
const PRIMARY_KEYWORDS: usize = 3;
/// Word gap above which expansion requires medium research depth.
const RESEARCH_WORD_GAP: u64 = 1000;

/// Per-keyword document groups, preserving first-seen keyword order.
struct TopicGroups<'a> {
    order: Vec<String>,
    by_keyword: HashMap<String, Vec<&'a Document>>,
}

fn group_by_primary_keyword(documents: &[Document]) -> TopicGroups<'_> {
    let mut order = Vec::new();
    let mut by_keyword: HashMap<String, Vec<&Document>> = HashMap::new();
    for document in documents {
        for keyword in document.keywords.iter().take(PRIMARY_KEYWORDS) {
            let group = by_keyword.entry(keyword.clone()).or_insert_with(|| {
                order.push(keyword.clone());
                Vec::new()
            });
            group.push(document);
        }
    }
    TopicGroups { order, by_keyword }
}

fn mean_word_count(documents: &[&Document]) -> f64 {
    if documents.is_empty() {
        return 0.0;
    }
    let total: u64 = documents.iter().map(|d| d.word_count).sum();
    total as f64 / documents.len() as f64
}

/// Detect topics where competitor coverage is at least `ratio` times deeper
/// than yours, returning the top gaps by impact.
pub fn detect_thin(
    your_documents: &[Document],
    competitor_documents: &[Document],
    ratio: f64,
) -> Vec<Gap> {
    let yours = group_by_primary_keyword(your_documents);
    let competitors = group_by_primary_keyword(competitor_documents);

    let mut gaps = Vec::new();
    for topic in &yours.order {
        let Some(competitor_docs) = competitors.by_keyword.get(topic) else {
            continue;
        };
        let your_docs = &yours.by_keyword[topic];
        let your_mean = mean_word_count(your_docs);
        let competitor_mean = mean_word_count(competitor_docs);
        if competitor_mean <= your_mean * ratio {
            continue;
        }
        gaps.push(build_gap(topic, your_mean, competitor_mean, competitor_docs));
    }

    gaps.sort_by(|a, b| b.impact_score.cmp(&a.impact_score));
    gaps.truncate(MAX_THIN_GAPS);
    gaps
}

fn build_gap(
    topic: &str,
    your_mean: f64,
    competitor_mean: f64,
    competitor_docs: &[&Document],
) -> Gap {
    let word_gap = (competitor_mean - your_mean) as u64;
    let impact = impact_score(ImpactSignals {
        competitor_frequency: competitor_docs.len() as u32,
        search_volume_estimate: (word_gap * 2).min(u64::from(u32::MAX)) as u32,
        topic_importance: (0.5 + word_gap as f64 / 2000.0).min(1.0),
        competitive_advantage: 0.6,
        keyword_count: competitor_docs.len(),
    });
    let difficulty = classify_difficulty(
        word_gap,
        if word_gap > RESEARCH_WORD_GAP {
            Difficulty::Medium
        } else {
            Difficulty::Low
        },
        Difficulty::Low,
        &[],
    );

    let mut keywords = vec![topic.to_string()];
    for document in competitor_docs {
        if let Some(first) = document.keywords.first() {
            keywords.push(first.clone());
        }
    }
    keywords.truncate(MAX_GAP_KEYWORDS);

    Gap {
        title: format!("Expand coverage of {}", title_case(topic)),
        gap_type: GapType::Thin,
        keywords,
        impact_score: impact,
        difficulty,
        reason: format!(
            "Your content ({} words avg) is thinner than competitors ({} words avg)",
            your_mean as u64, competitor_mean as u64
        ),
        competitor_coverage: format!("{} competitor documents", competitor_docs.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(source: &str, keywords: &[&str], word_count: u64) -> Document {
        Document {
            source: source.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            word_count,
            timestamp: None,
            entities: serde_json::Map::new(),
        }
    }

    #[test]
    fn flags_shared_topic_with_deeper_competitor_coverage() {
        let yours = vec![doc("you/gantt", &["gantt"], 400)];
        let competitors = vec![doc("rival/gantt", &["gantt"], 600)];
        let gaps = detect_thin(&yours, &competitors, 1.3);
        assert_eq!(gaps.len(), 1);
        let gap = &gaps[0];
        assert_eq!(gap.title, "Expand coverage of Gantt");
        assert_eq!(gap.gap_type, GapType::Thin);
        assert_eq!(
            gap.reason,
            "Your content (400 words avg) is thinner than competitors (600 words avg)"
        );
        assert_eq!(gap.competitor_coverage, "1 competitor documents");
    }

    #[test]
    fn ignores_topics_below_the_ratio() {
        let yours = vec![doc("you/kanban", &["kanban"], 500)];
        let competitors = vec![doc("rival/kanban", &["kanban"], 600)];
        assert!(detect_thin(&yours, &competitors, 1.3).is_empty());
    }

    #[test]
    fn ignores_topics_competitors_do_not_cover() {
        let yours = vec![doc("you/niche", &["niche"], 100)];
        let competitors = vec![doc("rival/other", &["other"], 5000)];
        assert!(detect_thin(&yours, &competitors, 1.3).is_empty());
    }

    #[test]
    fn averages_word_counts_across_documents() {
        let yours = vec![
            doc("you/a", &["gantt"], 300),
            doc("you/b", &["gantt"], 500),
        ];
        let competitors = vec![
            doc("rival/a", &["gantt"], 500),
            doc("rival/b", &["gantt"], 700),
        ];
        // Means are 400 vs 600, exactly the 1.5x scenario.
        let gaps = detect_thin(&yours, &competitors, 1.3);
        assert_eq!(gaps.len(), 1);
        assert!(gaps[0].reason.contains("400 words avg"));
        assert!(gaps[0].reason.contains("600 words avg"));
    }

    #[test]
    fn returns_top_gaps_sorted_by_impact() {
        let mut yours = Vec::new();
        let mut competitors = Vec::new();
        for i in 0..15 {
            let topic = format!("topic{i}");
            yours.push(doc(&format!("you/{i}"), &[&topic], 200));
            // Larger i means a wider word gap and so a higher impact.
            competitors.push(doc(&format!("rival/{i}"), &[&topic], 600 + i * 150));
        }
        let gaps = detect_thin(&yours, &competitors, 1.3);
        assert_eq!(gaps.len(), MAX_THIN_GAPS);
        for window in gaps.windows(2) {
            assert!(window[0].impact_score >= window[1].impact_score);
        }
    }
}
