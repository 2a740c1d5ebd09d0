use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::scoring::ScoreVector;

/// Contribution of each sub-score to the overall score. The weights must sum
/// to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub content_alignment: f64,
    pub audience_relevance: f64,
    pub engagement_potential: f64,
    pub timing_optimization: f64,
    pub platform_optimization: f64,
    pub trend_alignment: f64,
    pub call_to_action: f64,
    pub readability: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            content_alignment: 0.25,
            audience_relevance: 0.20,
            engagement_potential: 0.20,
            timing_optimization: 0.10,
            platform_optimization: 0.10,
            trend_alignment: 0.05,
            call_to_action: 0.05,
            readability: 0.05,
        }
    }
}

const WEIGHT_TOLERANCE: f64 = 1e-6;

impl ScoreWeights {
    pub fn total(&self) -> f64 {
        self.content_alignment
            + self.audience_relevance
            + self.engagement_potential
            + self.timing_optimization
            + self.platform_optimization
            + self.trend_alignment
            + self.call_to_action
            + self.readability
    }

    pub fn is_normalized(&self) -> bool {
        (self.total() - 1.0).abs() < WEIGHT_TOLERANCE
            && [
                self.content_alignment,
                self.audience_relevance,
                self.engagement_potential,
                self.timing_optimization,
                self.platform_optimization,
                self.trend_alignment,
                self.call_to_action,
                self.readability,
            ]
            .iter()
            .all(|weight| *weight >= 0.0)
    }

    /// Returns these weights if they are a valid convex combination,
    /// otherwise the defaults.
    pub fn validated(self) -> Self {
        if self.is_normalized() {
            self
        } else {
            warn!(total = self.total(), "score weights do not sum to 1.0, using defaults");
            ScoreWeights::default()
        }
    }

    /// Weighted sum of the sub-scores, rounded and clamped to [0, 100].
    pub fn overall(&self, scores: &ScoreVector) -> f64 {
        let mut overall = 0.0;

        overall += scores.content_alignment * self.content_alignment;
        overall += scores.audience_relevance * self.audience_relevance;
        overall += scores.engagement_potential * self.engagement_potential;
        overall += scores.timing_optimization * self.timing_optimization;
        overall += scores.platform_optimization * self.platform_optimization;
        overall += scores.trend_alignment * self.trend_alignment;
        overall += scores.call_to_action * self.call_to_action;
        overall += scores.readability * self.readability;

        crate::clamp_score(overall.round())
    }
}
