use serde::{Deserialize, Serialize};

use crate::context::AudienceContext;
use crate::scoring::{ScoreOptions, ScoreVector, ScoreWeights};
use crate::{to_hashtag, Platform, TextFeatures};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Content,
    Engagement,
    Length,
    Timing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn from_overall(overall: f64) -> Self {
        if overall >= 80.0 {
            Confidence::High
        } else if overall >= 60.0 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatedPerformance {
    pub engagement_rate: f64,
    pub expected_likes: u64,
    pub expected_replies: u64,
    pub expected_shares: u64,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreMetadata {
    pub platform: Platform,
    pub char_count: usize,
    pub word_count: usize,
    pub hashtag_count: usize,
    pub weights: ScoreWeights,
    pub content_hash: String,
    pub default_context: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub scores: ScoreVector,
    pub recommendations: Vec<Recommendation>,
    pub improvements: Vec<String>,
    pub estimated_performance: EstimatedPerformance,
    pub metadata: ScoreMetadata,
}

pub fn build_recommendations(
    scores: &ScoreVector,
    features: &TextFeatures,
    options: &ScoreOptions,
    context: &AudienceContext,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if scores.content_alignment < 70.0 {
        let keywords: Vec<&str> = context
            .target_keywords
            .iter()
            .take(3)
            .map(String::as_str)
            .collect();
        recommendations.push(Recommendation {
            kind: RecommendationKind::Content,
            priority: Priority::High,
            title: "Align With Core Topics".to_string(),
            description: format!(
                "Tie the post to what your audience follows, e.g. {}.",
                keywords.join(", ")
            ),
        });
    }

    if scores.engagement_potential < 60.0 {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Engagement,
            priority: Priority::Medium,
            title: "Add a Call to Action".to_string(),
            description: "Ask readers to reply, share their setup, or weigh in with an opinion."
                .to_string(),
        });
    }

    let platform = options.platform;
    if features.char_count > platform.recommended_length() {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Length,
            priority: Priority::High,
            title: "Reduce Length".to_string(),
            description: format!(
                "{} posts perform best under {} characters; this draft has {}.",
                platform.label(),
                platform.recommended_length(),
                features.char_count
            ),
        });
    }

    if scores.timing_optimization < 50.0 {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Timing,
            priority: Priority::Low,
            title: "Schedule for Peak Hours".to_string(),
            description: "Post on a weekday around 9-11am, 1-3pm or 7-9pm.".to_string(),
        });
    }

    recommendations
}

pub fn build_improvements(
    scores: &ScoreVector,
    features: &TextFeatures,
    context: &AudienceContext,
) -> Vec<String> {
    let mut improvements = Vec::new();

    if features.hashtags == 0 {
        let examples: Vec<String> = context
            .target_keywords
            .iter()
            .take(2)
            .map(|keyword| to_hashtag(keyword))
            .collect();
        improvements.push(format!(
            "Add 1-2 relevant hashtags such as {}.",
            examples.join(" or ")
        ));
    }

    if features.questions == 0 && scores.engagement_potential < 60.0 {
        improvements.push("End with a question to invite replies.".to_string());
    }

    if scores.readability < 50.0 && features.char_count > 150 {
        improvements.push(
            "Break long sentences up; aim for under 15 words per sentence.".to_string(),
        );
    }

    improvements
}

pub fn estimate_performance(overall: f64, follower_count: u64) -> EstimatedPerformance {
    let engagement_rate = 0.02 * (overall / 50.0);
    let engagements = engagement_rate * follower_count as f64;

    EstimatedPerformance {
        engagement_rate,
        expected_likes: (engagements * 0.7).round() as u64,
        expected_replies: (engagements * 0.2).round() as u64,
        expected_shares: (engagements * 0.1).round() as u64,
        confidence: Confidence::from_overall(overall),
    }
}
