//! Synthetic training sample generation.
//!
//! Templates deliberately overlap across gap types, and a small share of
//! samples is mislabeled on purpose: without ambiguity and label noise the
//! classifier would memorize template vocabulary, and the noise floor keeps
//! the evaluation honest.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::gaps::GapType;

use super::TrainingSample;

/// Probability of using a type-specific template over an ambiguous one.
const TYPE_TEMPLATE_PROBABILITY: f64 = 0.90;
/// Probability of assigning a deliberately wrong label.
const LABEL_NOISE_RATE: f64 = 0.03;

const MISSING_TEMPLATES: &[&str] = &[
    "{topic} coverage needs improvement and expansion",
    "Limited discussion of {topic} compared to industry standards",
    "{topic} section is incomplete and requires development",
    "Competitors have extensive {topic} content we lack",
    "Our {topic} information is insufficient for users",
    "{topic} gaps identified in content audit",
];

const THIN_TEMPLATES: &[&str] = &[
    "{topic} content exists but lacks sufficient detail",
    "Superficial {topic} coverage needs more depth",
    "Brief mention of {topic} without comprehensive explanation",
    "{topic} section is too short and needs expansion",
    "Limited {topic} examples and use cases provided",
    "Our {topic} content is less detailed than competitors",
];

const OUTDATED_TEMPLATES: &[&str] = &[
    "{topic} information may be outdated or stale",
    "Content about {topic} needs updating and refresh",
    "{topic} section references old data and statistics",
    "Our {topic} coverage doesn't reflect current trends",
    "{topic} content was last updated over a year ago",
    "Need to modernize {topic} discussion and examples",
];

const UNDEROPTIMIZED_TEMPLATES: &[&str] = &[
    "{topic} content has low keyword density and poor SEO",
    "Missing relevant {topic} keywords in metadata",
    "{topic} page lacks proper heading structure",
    "Our {topic} content ranks poorly in search results",
    "{topic} section needs better internal linking",
    "Suboptimal {topic} content for search engines",
];

/// Cross-type templates that could plausibly describe any gap.
const AMBIGUOUS_TEMPLATES: &[&str] = &[
    "{topic} content needs work",
    "Issues with our {topic} coverage",
    "{topic} section requires attention",
    "Problems identified in {topic} area",
    "{topic} content gaps present",
    "Need to improve {topic} information",
];

const TOPICS: &[&str] = &[
    "machine learning",
    "artificial intelligence",
    "data analysis",
    "data science",
    "cloud computing",
    "cloud infrastructure",
    "cybersecurity",
    "network security",
    "digital marketing",
    "content marketing",
    "project management",
    "agile methodology",
    "customer service",
    "customer experience",
    "sales strategy",
    "business development",
    "product development",
    "product design",
    "team collaboration",
    "remote work",
    "business intelligence",
    "data visualization",
    "automation",
    "workflow automation",
    "mobile apps",
    "mobile development",
    "web development",
    "full-stack development",
    "API integration",
    "API design",
    "database management",
    "data architecture",
    "user experience",
    "UI design",
    "content strategy",
    "SEO strategy",
    "social media",
    "social media marketing",
    "email marketing",
    "marketing automation",
];

fn templates_for(gap_type: GapType) -> &'static [&'static str] {
    match gap_type {
        GapType::Missing => MISSING_TEMPLATES,
        GapType::Thin => THIN_TEMPLATES,
        GapType::Outdated => OUTDATED_TEMPLATES,
        GapType::UnderOptimized => UNDEROPTIMIZED_TEMPLATES,
    }
}

/// Deterministic generator of labeled gap descriptions.
pub struct SyntheticGenerator {
    rng: StdRng,
}

impl SyntheticGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Produce `n_samples / 4` samples per gap type.
    pub fn generate(&mut self, n_samples: usize) -> Vec<TrainingSample> {
        let per_type = n_samples / GapType::ALL.len();
        let mut samples = Vec::with_capacity(per_type * GapType::ALL.len());
        for gap_type in GapType::ALL {
            for _ in 0..per_type {
                samples.push(self.sample_for(gap_type));
            }
        }
        samples
    }

    fn sample_for(&mut self, intended: GapType) -> TrainingSample {
        let topic = *TOPICS
            .choose(&mut self.rng)
            .unwrap_or(&TOPICS[0]);
        let pool = if self.rng.random::<f64>() < TYPE_TEMPLATE_PROBABILITY {
            templates_for(intended)
        } else {
            AMBIGUOUS_TEMPLATES
        };
        let template = pool
            .choose(&mut self.rng)
            .copied()
            .unwrap_or("{topic} content needs work");
        let text = template.replace("{topic}", topic);

        let mut label = intended;
        if self.rng.random::<f64>() < LABEL_NOISE_RATE {
            let others: Vec<GapType> = GapType::ALL
                .into_iter()
                .filter(|&t| t != intended)
                .collect();
            if let Some(&wrong) = others.choose(&mut self.rng) {
                label = wrong;
            }
        }

        TrainingSample {
            text,
            label,
            description: format!("{} gap for {topic}", label.title_label()),
            is_synthetic: true,
        }
    }
}
