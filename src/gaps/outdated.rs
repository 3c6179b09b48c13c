//! Outdated-content detection: your documents past the age threshold.

use time::format_description::well_known::Iso8601;
use time::{Date, OffsetDateTime, PrimitiveDateTime};
use tracing::debug;

use crate::corpus::Document;

use super::scoring::{classify_difficulty, impact_score, ImpactSignals};
use super::{Difficulty, Gap, GapType};

/// Maximum outdated-content gaps emitted per run.
const MAX_OUTDATED_GAPS: usize = 10;
/// Keywords carried onto the gap from the stale document.
const KEYWORDS_PER_GAP: usize = 10;
/// Cap on the age multiplier feeding impact.
const MAX_AGE_MULTIPLIER: f64 = 3.0;
/// Age in days beyond which refreshing needs medium research depth.
const DEEP_REFRESH_AGE_DAYS: i64 = 730;
/// Minimum estimated rewrite size in words.
const MIN_REFRESH_WORDS: u64 = 500;

/// Detect documents older than `age_threshold_days` relative to `reference`,
/// returning the top gaps by impact.
///
/// Documents without a parseable ISO-8601 timestamp are skipped.
pub fn detect_outdated(
    your_documents: &[Document],
    age_threshold_days: i64,
    reference: OffsetDateTime,
) -> Vec<Gap> {
    let mut gaps = Vec::new();
    for document in your_documents {
        let Some(raw) = document.timestamp.as_deref() else {
            continue;
        };
        let Some(published) = parse_timestamp(raw) else {
            debug!(source = %document.source, timestamp = raw, "Skipping unparseable timestamp");
            continue;
        };
        let age_days = (reference - published).whole_days();
        if age_days > age_threshold_days {
            gaps.push(build_gap(document, age_days, age_threshold_days));
        }
    }
    gaps.sort_by(|a, b| b.impact_score.cmp(&a.impact_score));
    gaps.truncate(MAX_OUTDATED_GAPS);
    gaps
}

/// Parse an ISO-8601 timestamp, accepting full offsets, naive datetimes
/// (assumed UTC), and bare dates.
fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(parsed) = OffsetDateTime::parse(raw, &Iso8601::DEFAULT) {
        return Some(parsed);
    }
    if let Ok(parsed) = PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT) {
        return Some(parsed.assume_utc());
    }
    if let Ok(parsed) = Date::parse(raw, &Iso8601::DEFAULT) {
        return Some(parsed.midnight().assume_utc());
    }
    None
}

fn build_gap(document: &Document, age_days: i64, age_threshold_days: i64) -> Gap {
    let keywords: Vec<String> = document
        .keywords
        .iter()
        .take(KEYWORDS_PER_GAP)
        .cloned()
        .collect();
    let age_multiplier = (age_days as f64 / 365.0).min(MAX_AGE_MULTIPLIER);
    let impact = impact_score(ImpactSignals {
        competitor_frequency: (2.0 + age_multiplier) as u32,
        search_volume_estimate: (age_days * 5).min(i64::from(u32::MAX)) as u32,
        topic_importance: (0.4 + age_multiplier * 0.2).min(1.0),
        competitive_advantage: 0.5,
        keyword_count: keywords.len(),
    });
    let difficulty = classify_difficulty(
        MIN_REFRESH_WORDS.max((age_days / 2) as u64),
        if age_days > DEEP_REFRESH_AGE_DAYS {
            Difficulty::Medium
        } else {
            Difficulty::Low
        },
        Difficulty::Low,
        &[],
    );
    Gap {
        title: format!("Update: {}", source_basename(&document.source)),
        gap_type: GapType::Outdated,
        keywords,
        impact_score: impact,
        difficulty,
        reason: format!(
            "Content is {age_days} days old (threshold: {age_threshold_days} days)"
        ),
        competitor_coverage: "N/A - internal update".to_string(),
    }
}

pub(crate) fn source_basename(source: &str) -> &str {
    source.rsplit('/').next().unwrap_or(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn doc(source: &str, keywords: &[&str], timestamp: Option<&str>) -> Document {
        Document {
            source: source.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            word_count: 800,
            timestamp: timestamp.map(str::to_string),
            entities: serde_json::Map::new(),
        }
    }

    const REFERENCE: OffsetDateTime = datetime!(2026-01-01 00:00 UTC);

    #[test]
    fn flags_documents_past_the_threshold() {
        let docs = vec![doc(
            "site/guides/old-guide",
            &["planning"],
            Some("2024-01-01T00:00:00Z"),
        )];
        let gaps = detect_outdated(&docs, 365, REFERENCE);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].title, "Update: old-guide");
        assert_eq!(gaps[0].gap_type, GapType::Outdated);
        assert!(gaps[0].reason.contains("731 days old"));
        assert_eq!(gaps[0].competitor_coverage, "N/A - internal update");
    }

    #[test]
    fn keeps_recent_documents() {
        let docs = vec![doc("site/fresh", &[], Some("2025-10-01T00:00:00Z"))];
        assert!(detect_outdated(&docs, 365, REFERENCE).is_empty());
    }

    #[test]
    fn skips_missing_and_unparseable_timestamps() {
        let docs = vec![
            doc("site/no-date", &[], None),
            doc("site/bad-date", &[], Some("last spring")),
        ];
        assert!(detect_outdated(&docs, 365, REFERENCE).is_empty());
    }

    #[test]
    fn accepts_bare_dates_and_naive_datetimes() {
        let docs = vec![
            doc("site/a", &[], Some("2020-06-15")),
            doc("site/b", &[], Some("2021-03-01T08:30:00")),
        ];
        let gaps = detect_outdated(&docs, 365, REFERENCE);
        assert_eq!(gaps.len(), 2);
    }

    #[test]
    fn older_documents_score_higher() {
        let docs = vec![
            doc("site/two-years", &["a"], Some("2024-01-01")),
            doc("site/five-years", &["a"], Some("2021-01-01")),
        ];
        let gaps = detect_outdated(&docs, 365, REFERENCE);
        assert_eq!(gaps[0].title, "Update: five-years");
        assert!(gaps[0].impact_score >= gaps[1].impact_score);
    }
}
