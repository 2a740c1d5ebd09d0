pub mod batch;
pub mod extract;
pub mod hooks;
pub mod plan;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analytics::AccountMetrics;
use crate::context::AudienceContext;
use crate::error::{EngineError, Result};
use crate::insight::TextGenerator;
use crate::scoring::{scorer, ContentScorer};
use crate::{word_count, Platform};

pub use batch::{BatchItemResult, BatchSettings};
pub use extract::key_insights;
pub use hooks::{generate_hooks, Hook, HookKind};
pub use plan::{
    fit_to_limit, generate_hashtags, DerivedPost, DerivedPosts, OpportunityKind, PlatformFit,
    PostKind, Predictions, RepurposingOpportunity, TimelineStage,
};

const WORDS_PER_MINUTE: usize = 200;
const MAX_SUBJECT_CHARS: usize = 60;

/// A long-form item such as a blog post or newsletter issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogItem {
    #[serde(default)]
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl BlogItem {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            url: None,
            published_at: None,
        }
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Tutorial,
    Opinion,
    Article,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentAnalysis {
    pub title: String,
    pub word_count: usize,
    pub reading_time_minutes: usize,
    pub content_type: ContentType,
    pub subject: String,
    pub key_insights: Vec<String>,
    pub matched_interests: Vec<String>,
    pub audience_alignment_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepurposingSuggestions {
    pub hooks: Vec<Hook>,
    pub opportunities: Vec<RepurposingOpportunity>,
    pub posts: DerivedPosts,
    pub hashtags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionStrategy {
    pub timeline: Vec<TimelineStage>,
    pub cross_platform: Vec<PlatformFit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepurposingReport {
    pub analysis: ContentAnalysis,
    pub suggestions: RepurposingSuggestions,
    pub strategy: DistributionStrategy,
    pub predictions: Predictions,
}

/// Turns one long-form item into hooks, derived posts and a distribution
/// plan. A configured [`TextGenerator`] is only used to polish the curiosity
/// hook; everything else is deterministic.
#[derive(Clone, Default)]
pub struct RepurposingEngine {
    scorer: ContentScorer,
    generator: Option<Arc<dyn TextGenerator>>,
    platform: Platform,
}

impl RepurposingEngine {
    pub fn new(scorer: ContentScorer) -> Self {
        Self {
            scorer,
            generator: None,
            platform: Platform::Bluesky,
        }
    }

    pub fn with_generator(mut self, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub async fn analyze(
        &self,
        item: &BlogItem,
        metrics: Option<&AccountMetrics>,
        context: &AudienceContext,
    ) -> Result<RepurposingReport> {
        if item.body.trim().is_empty() {
            return Err(EngineError::EmptyContent("blog body"));
        }

        let text = format!("{}\n\n{}", item.title, item.body);
        let word_count = item.word_count();
        let key_insights = extract::key_insights(&item.body);
        let matched_interests = extract::matched_interests(&text, context);
        let subject = subject_for(item, &matched_interests, context);
        let audience_alignment_score = scorer::content_alignment(&text, context);

        let content_type = if extract::TUTORIAL_VOCAB.any_match(&text) {
            ContentType::Tutorial
        } else if extract::CONTROVERSY_VOCAB.any_match(&text) {
            ContentType::Opinion
        } else {
            ContentType::Article
        };

        let mut hooks = generate_hooks(&text, &subject, context);
        self.refine_hooks(&mut hooks, item, context).await;

        let hashtags = generate_hashtags(&text, context);
        let input = plan::PlanInput {
            title: item.title.trim(),
            text: &text,
            url: item.url.as_deref(),
            word_count,
            subject: &subject,
            insights: &key_insights,
            interests: &matched_interests,
            hooks: &hooks,
            hashtags: &hashtags,
            platform: self.platform,
        };
        let opportunities = plan::identify_opportunities(&input);
        let posts = plan::generate_posts(&input, &self.scorer, context);

        let predictions = plan::predict_performance(
            &text,
            audience_alignment_score,
            metrics.and_then(|metrics| metrics.avg_engagement),
        );

        debug!(
            title = %item.title,
            words = word_count,
            insights = key_insights.len(),
            hooks = hooks.len(),
            posts = posts.len(),
            "content repurposed"
        );

        Ok(RepurposingReport {
            analysis: ContentAnalysis {
                title: item.title.clone(),
                word_count,
                reading_time_minutes: word_count.div_ceil(WORDS_PER_MINUTE).max(1),
                content_type,
                subject,
                key_insights,
                matched_interests,
                audience_alignment_score,
            },
            suggestions: RepurposingSuggestions {
                hooks,
                opportunities,
                posts,
                hashtags,
            },
            strategy: DistributionStrategy {
                timeline: plan::posting_timeline(),
                cross_platform: plan::cross_platform_fit(),
            },
            predictions,
        })
    }

    /// Rewrites the curiosity hook through the text generator when one is
    /// configured. Keeps the template hook on any failure.
    async fn refine_hooks(&self, hooks: &mut [Hook], item: &BlogItem, context: &AudienceContext) {
        let Some(generator) = &self.generator else {
            return;
        };
        let Some(hook) = hooks.iter_mut().find(|hook| hook.kind == HookKind::Curiosity) else {
            return;
        };

        let limit = self.platform.char_limit();
        let prompt = format!(
            "You write opening lines for social posts.\nBrand tone: {}\nAudience interests: {}",
            context.brand_voice.tone,
            context.interests().join(", ")
        );
        let instruction = format!(
            "Rewrite this hook for a {} post about \"{}\" in under {} characters, using a curiosity gap. Reply with the hook only.\n\nHook: {}",
            self.platform.label(),
            item.title,
            limit,
            hook.text
        );

        let Some(refined) = generator.generate(&prompt, &instruction).await else {
            return;
        };
        let refined = refined
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default()
            .trim_matches('"');
        if refined.is_empty() {
            return;
        }
        info!(provider = generator.name(), "hook refined");
        hook.text = fit_to_limit(refined, limit);
    }
}

/// The phrase hooks and question posts talk about: the first audience
/// interest the item mentions, then any target keyword, then the title.
fn subject_for(item: &BlogItem, interests: &[String], context: &AudienceContext) -> String {
    if let Some(interest) = interests.first() {
        return interest.clone();
    }
    let text = format!("{}\n\n{}", item.title, item.body);
    if let Some(keyword) = context.matchers().keywords_in(&text).into_iter().next() {
        return keyword;
    }
    let title = item.title.trim();
    if title.is_empty() {
        return "this topic".to_string();
    }
    fit_to_limit(&title.to_lowercase(), MAX_SUBJECT_CHARS)
}

/// Analyses one item with a default engine and no text generator.
pub async fn analyze_and_repurpose_blog_content(
    item: &BlogItem,
    metrics: Option<&AccountMetrics>,
    context: &AudienceContext,
) -> Result<RepurposingReport> {
    RepurposingEngine::default().analyze(item, metrics, context).await
}
