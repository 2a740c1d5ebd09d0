pub mod report;
pub mod rules;
pub mod scorer;
pub mod weights;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::context::AudienceContext;
use crate::{extract_text_features, stable_hash64, Platform};

pub use report::{
    Confidence, EstimatedPerformance, Priority, Recommendation, RecommendationKind, ScoreMetadata,
    ScoreReport,
};
pub use rules::{Rule, RuleOutcome, RuleSet};
pub use scorer::ContentScorer;
pub use weights::ScoreWeights;

/// Eight sub-scores and their weighted overall, all in [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreVector {
    pub content_alignment: f64,
    pub audience_relevance: f64,
    pub engagement_potential: f64,
    pub timing_optimization: f64,
    pub platform_optimization: f64,
    pub trend_alignment: f64,
    pub call_to_action: f64,
    pub readability: f64,
    pub overall: f64,
}

impl ScoreVector {
    pub fn sub_scores(&self) -> [(&'static str, f64); 8] {
        [
            ("content_alignment", self.content_alignment),
            ("audience_relevance", self.audience_relevance),
            ("engagement_potential", self.engagement_potential),
            ("timing_optimization", self.timing_optimization),
            ("platform_optimization", self.platform_optimization),
            ("trend_alignment", self.trend_alignment),
            ("call_to_action", self.call_to_action),
            ("readability", self.readability),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreOptions {
    pub platform: Platform,
    pub has_images: bool,
    pub has_links: bool,
    pub scheduled_at: Option<NaiveDateTime>,
    pub follower_count: u64,
}

impl Default for ScoreOptions {
    fn default() -> Self {
        Self {
            platform: Platform::Bluesky,
            has_images: false,
            has_links: false,
            scheduled_at: None,
            follower_count: 1_000,
        }
    }
}

impl ContentScorer {
    pub fn score_post(
        &self,
        text: &str,
        options: &ScoreOptions,
        context: &AudienceContext,
    ) -> ScoreReport {
        let features = extract_text_features(text);
        let scores = self.score(text, options, context);

        let recommendations = report::build_recommendations(&scores, &features, options, context);
        let improvements = report::build_improvements(&scores, &features, context);
        let estimated_performance =
            report::estimate_performance(scores.overall, options.follower_count);

        let metadata = ScoreMetadata {
            platform: options.platform,
            char_count: features.char_count,
            word_count: features.word_count,
            hashtag_count: features.hashtags,
            weights: self.weights().clone(),
            content_hash: format!("{:016x}", stable_hash64(text)),
            default_context: context.is_default(),
        };

        ScoreReport {
            scores,
            recommendations,
            improvements,
            estimated_performance,
            metadata,
        }
    }
}

/// Scores a draft with the default weights.
pub fn score_post(text: &str, options: &ScoreOptions, context: &AudienceContext) -> ScoreReport {
    ContentScorer::default().score_post(text, options, context)
}
