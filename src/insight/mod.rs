pub mod provider;

use std::fmt::Write as _;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analytics::{AccountMetrics, PerformanceAnalytics};
use crate::context::AudienceContext;
use crate::{format_float, format_number};

pub use provider::{build_generator, ProviderConfig, ProviderKind, TextGenerator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    ContentStrategy,
    AudienceGrowth,
    EngagementOptimization,
    TrendAnalysis,
    PostingOptimization,
    BrandPositioning,
}

impl InsightCategory {
    pub const ALL: [InsightCategory; 6] = [
        InsightCategory::ContentStrategy,
        InsightCategory::AudienceGrowth,
        InsightCategory::EngagementOptimization,
        InsightCategory::TrendAnalysis,
        InsightCategory::PostingOptimization,
        InsightCategory::BrandPositioning,
    ];

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "content_strategy" | "strategy" => Some(InsightCategory::ContentStrategy),
            "audience_growth" | "growth" => Some(InsightCategory::AudienceGrowth),
            "engagement_optimization" | "engagement" => {
                Some(InsightCategory::EngagementOptimization)
            }
            "trend_analysis" | "trends" => Some(InsightCategory::TrendAnalysis),
            "posting_optimization" | "posting" => Some(InsightCategory::PostingOptimization),
            "brand_positioning" | "brand" => Some(InsightCategory::BrandPositioning),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InsightCategory::ContentStrategy => "Content Strategy",
            InsightCategory::AudienceGrowth => "Audience Growth",
            InsightCategory::EngagementOptimization => "Engagement Optimization",
            InsightCategory::TrendAnalysis => "Trend Analysis",
            InsightCategory::PostingOptimization => "Posting Optimization",
            InsightCategory::BrandPositioning => "Brand Positioning",
        }
    }

    pub fn instruction(self) -> &'static str {
        match self {
            InsightCategory::ContentStrategy => {
                "Review the content mix above and propose 3-5 specific content ideas that fit the pillars and audience interests. For each, name the format and why it should resonate."
            }
            InsightCategory::AudienceGrowth => {
                "Suggest 3-5 concrete tactics to grow this account's following among the target audience. Reference the current follower numbers and what has worked so far."
            }
            InsightCategory::EngagementOptimization => {
                "Using the engagement numbers by format and topic, explain what drives replies and reposts for this account and give 3-5 changes that would raise engagement."
            }
            InsightCategory::TrendAnalysis => {
                "Identify 3-5 current trends in the audience's interest areas that this account could credibly post about, and how to angle each one for this brand voice."
            }
            InsightCategory::PostingOptimization => {
                "Recommend a posting cadence, best days and times, and post lengths for this account, grounded in the metrics above."
            }
            InsightCategory::BrandPositioning => {
                "Describe how this account is positioned today based on its voice and topics, and give 3-5 ways to sharpen that positioning without drifting from its values."
            }
        }
    }
}

/// Aggregate numbers fed into insight prompts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightMetrics {
    pub followers_count: Option<u64>,
    pub following_count: Option<u64>,
    pub posts_count: Option<u64>,
    pub avg_engagement: Option<f64>,
    pub engagement_rate: Option<f64>,
    pub on_target_percentage: Option<f64>,
    pub top_formats: Vec<String>,
    pub top_topics: Vec<String>,
}

impl InsightMetrics {
    pub fn from_analytics(analytics: &PerformanceAnalytics, account: Option<&AccountMetrics>) -> Self {
        Self {
            followers_count: account.map(|account| account.followers_count),
            following_count: account.map(|account| account.following_count),
            posts_count: account
                .map(|account| account.posts_count)
                .or(Some(analytics.summary.total_posts as u64)),
            avg_engagement: Some(analytics.summary.avg_engagement),
            engagement_rate: Some(analytics.summary.avg_rate),
            on_target_percentage: Some(analytics.ai_topic_insights.on_target_percentage),
            top_formats: analytics
                .engagement_by_format
                .iter()
                .take(3)
                .map(|entry| entry.format.clone())
                .collect(),
            top_topics: analytics
                .engagement_by_topic
                .iter()
                .take(3)
                .map(|entry| entry.topic.clone())
                .collect(),
        }
    }
}

/// Prompt assembly in front of an optional [`TextGenerator`].
#[derive(Clone, Default)]
pub struct InsightEngine {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl InsightEngine {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(build_generator(config))
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    pub fn generator(&self) -> Option<&Arc<dyn TextGenerator>> {
        self.generator.as_ref()
    }

    /// `None` when no provider is configured or the provider call fails.
    pub async fn generate(
        &self,
        category: InsightCategory,
        context: &AudienceContext,
        metrics: &InsightMetrics,
    ) -> Option<String> {
        let Some(generator) = &self.generator else {
            debug!(category = category.label(), "insights unavailable, no provider configured");
            return None;
        };

        let prompt = build_context(context, metrics);
        let instruction = format!(
            "{}\n\nFocus area: {}. Keep it under 250 words and use the brand tone.",
            category.instruction(),
            category.label()
        );
        let result = generator.generate(&prompt, &instruction).await;
        info!(
            provider = generator.name(),
            category = category.label(),
            generated = result.is_some(),
            "insight request finished"
        );
        result
    }
}

fn write_list(out: &mut String, label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "{}: {}", label, items.join(", "));
}

/// Renders the audience profile and metrics as the system context of an
/// insight request.
pub fn build_context(context: &AudienceContext, metrics: &InsightMetrics) -> String {
    let mut out = String::from(
        "You are a social media strategist advising an independent tech creator.\n\n",
    );

    out.push_str("## Brand voice\n");
    let _ = writeln!(out, "Tone: {}", context.brand_voice.tone);
    write_list(&mut out, "Values", &context.brand_voice.values);
    write_list(&mut out, "Preferred words", &context.brand_voice.preferred_words);
    write_list(&mut out, "Avoid", &context.brand_voice.avoid_words);

    out.push_str("\n## Audience\n");
    write_list(&mut out, "Interests", &context.customer_avatar.interests);
    write_list(&mut out, "Pain points", &context.customer_avatar.pain_points);
    write_list(&mut out, "Goals", &context.customer_avatar.goals);

    out.push_str("\n## Strategy\n");
    write_list(&mut out, "Pillars", &context.content_strategies.pillars);
    write_list(&mut out, "Formats", &context.content_strategies.formats);
    write_list(&mut out, "Guidelines", &context.content_strategies.posting_guidelines);
    write_list(&mut out, "Psychology principles", &context.psychology.principles);

    out.push_str("\n## Metrics\n");
    let before = out.len();
    if let Some(followers) = metrics.followers_count {
        let _ = writeln!(out, "Followers: {}", format_number(followers as f64));
    }
    if let Some(following) = metrics.following_count {
        let _ = writeln!(out, "Following: {}", format_number(following as f64));
    }
    if let Some(posts) = metrics.posts_count {
        let _ = writeln!(out, "Posts: {}", format_number(posts as f64));
    }
    if let Some(avg) = metrics.avg_engagement {
        let _ = writeln!(out, "Average engagement per post: {}", format_float(avg, 1));
    }
    if let Some(rate) = metrics.engagement_rate {
        let _ = writeln!(out, "Engagement rate: {}", format_float(rate, 1));
    }
    if let Some(on_target) = metrics.on_target_percentage {
        let _ = writeln!(out, "On-topic posts: {}%", format_float(on_target, 0));
    }
    write_list(&mut out, "Best formats", &metrics.top_formats);
    write_list(&mut out, "Best topics", &metrics.top_topics);
    if out.len() == before {
        out.push_str("No metrics available yet.\n");
    }

    out
}
