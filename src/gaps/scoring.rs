//! Impact scoring and difficulty classification.
//!
//! Both are pure functions shared by every detection strategy. Every scoring
//! factor saturates independently so no single signal can dominate, and the
//! floor keeps detected gaps from being trivially deprioritized to zero.

use super::Difficulty;

/// Weight of competitor coverage in the impact score.
const COMPETITOR_WEIGHT: f64 = 35.0;
/// Competitor frequency at which the coverage factor saturates.
const COMPETITOR_SATURATION: f64 = 5.0;
/// Weight of estimated search volume.
const SEARCH_WEIGHT: f64 = 30.0;
/// Monthly search volume at which the search factor saturates.
const SEARCH_SATURATION: f64 = 8000.0;
/// Weight of business importance.
const IMPORTANCE_WEIGHT: f64 = 20.0;
/// Weight of keyword richness.
const KEYWORD_WEIGHT: f64 = 15.0;
/// Keyword count at which the richness factor saturates.
const KEYWORD_SATURATION: f64 = 50.0;
/// Competitive advantage above which the flat bonus applies.
const ADVANTAGE_THRESHOLD: f64 = 0.7;
/// Flat bonus for high competitive advantage.
const ADVANTAGE_BONUS: u32 = 5;
/// Minimum impact score for any detected gap.
pub const IMPACT_FLOOR: u32 = 15;
/// Maximum impact score.
pub const IMPACT_CEILING: u32 = 100;

/// Word count below which content effort earns a single point.
const WORDS_MEDIUM_TIER: u64 = 1000;
/// Word count below which content effort earns two points.
const WORDS_HIGH_TIER: u64 = 2500;
/// Cap on points contributed by extra resource requirements.
const MAX_RESOURCE_POINTS: u32 = 3;
/// Total points at or below which difficulty is low.
const LOW_MAX_POINTS: u32 = 4;
/// Total points at or below which difficulty is medium.
const MEDIUM_MAX_POINTS: u32 = 7;

/// Raw signals feeding the impact score.
#[derive(Debug, Clone, Copy)]
pub struct ImpactSignals {
    /// How many competitors cover the topic.
    pub competitor_frequency: u32,
    /// Estimated monthly search volume, when available.
    pub search_volume_estimate: u32,
    /// Relevance to the business, in `[0, 1]`.
    pub topic_importance: f64,
    /// Opportunity to differentiate, in `[0, 1]`.
    pub competitive_advantage: f64,
    /// Number of keyword opportunities in the gap.
    pub keyword_count: usize,
}

/// Heuristic business value of closing a gap, clamped to `[15, 100]`.
pub fn impact_score(signals: ImpactSignals) -> u32 {
    let competitor = (f64::from(signals.competitor_frequency) / COMPETITOR_SATURATION).min(1.0)
        * COMPETITOR_WEIGHT;
    let search =
        (f64::from(signals.search_volume_estimate) / SEARCH_SATURATION).min(1.0) * SEARCH_WEIGHT;
    let importance = signals.topic_importance * IMPORTANCE_WEIGHT;
    let keywords =
        (signals.keyword_count as f64 / KEYWORD_SATURATION).min(1.0) * KEYWORD_WEIGHT;

    let mut total = (competitor + search + importance + keywords) as u32;
    if signals.competitive_advantage > ADVANTAGE_THRESHOLD {
        total += ADVANTAGE_BONUS;
    }
    total.clamp(IMPACT_FLOOR, IMPACT_CEILING)
}

/// Ordinal effort model over content-creation signals.
///
/// Accumulates 1-3 points per factor plus up to three points for extra
/// resource requirements, then maps the total through fixed thresholds.
pub fn classify_difficulty(
    word_count_needed: u64,
    research_depth: Difficulty,
    technical_complexity: Difficulty,
    resource_requirements: &[String],
) -> Difficulty {
    let mut points = if word_count_needed < WORDS_MEDIUM_TIER {
        1
    } else if word_count_needed < WORDS_HIGH_TIER {
        2
    } else {
        3
    };
    points += tier_points(research_depth);
    points += tier_points(technical_complexity);
    points += (resource_requirements.len() as u32).min(MAX_RESOURCE_POINTS);

    if points <= LOW_MAX_POINTS {
        Difficulty::Low
    } else if points <= MEDIUM_MAX_POINTS {
        Difficulty::Medium
    } else {
        Difficulty::High
    }
}

fn tier_points(level: Difficulty) -> u32 {
    match level {
        Difficulty::Low => 1,
        Difficulty::Medium => 2,
        Difficulty::High => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(
        competitor_frequency: u32,
        search_volume_estimate: u32,
        topic_importance: f64,
        competitive_advantage: f64,
        keyword_count: usize,
    ) -> ImpactSignals {
        ImpactSignals {
            competitor_frequency,
            search_volume_estimate,
            topic_importance,
            competitive_advantage,
            keyword_count,
        }
    }

    #[test]
    fn saturated_signals_cap_at_ceiling() {
        assert_eq!(impact_score(signals(5, 8000, 1.0, 0.9, 50)), 100);
    }

    #[test]
    fn zero_signals_hit_the_floor() {
        assert_eq!(impact_score(signals(0, 0, 0.0, 0.0, 0)), 15);
    }

    #[test]
    fn impact_stays_in_bounds_for_extreme_inputs() {
        let extremes = [
            signals(0, 0, 0.0, 0.0, 0),
            signals(u32::MAX, u32::MAX, 1.0, 1.0, usize::MAX),
            signals(1, 0, 0.0, 1.0, 0),
            signals(0, u32::MAX, 0.5, 0.7, 3),
        ];
        for s in extremes {
            let score = impact_score(s);
            assert!((IMPACT_FLOOR..=IMPACT_CEILING).contains(&score), "score {score}");
        }
    }

    #[test]
    fn advantage_bonus_requires_strict_threshold() {
        let base = impact_score(signals(2, 1000, 0.5, 0.7, 10));
        let boosted = impact_score(signals(2, 1000, 0.5, 0.71, 10));
        assert_eq!(boosted, base + 5);
    }

    #[test]
    fn light_effort_classifies_low() {
        let difficulty = classify_difficulty(500, Difficulty::Low, Difficulty::Low, &[]);
        assert_eq!(difficulty, Difficulty::Low);
    }

    #[test]
    fn heavy_effort_classifies_high() {
        let resources = vec!["designer".to_string(), "sme".to_string()];
        let difficulty = classify_difficulty(3000, Difficulty::High, Difficulty::Medium, &resources);
        assert_eq!(difficulty, Difficulty::High);
    }

    #[test]
    fn difficulty_is_monotone_in_word_count() {
        let mut previous = Difficulty::Low;
        for words in [0, 500, 999, 1000, 2499, 2500, 10_000] {
            let difficulty =
                classify_difficulty(words, Difficulty::Medium, Difficulty::Medium, &[]);
            assert!(difficulty >= previous);
            previous = difficulty;
        }
    }

    #[test]
    fn resource_points_are_capped() {
        let many: Vec<String> = (0..10).map(|i| format!("resource-{i}")).collect();
        let capped = classify_difficulty(500, Difficulty::Low, Difficulty::Low, &many);
        let three: Vec<String> = many[..3].to_vec();
        assert_eq!(
            capped,
            classify_difficulty(500, Difficulty::Low, Difficulty::Low, &three)
        );
    }
}
