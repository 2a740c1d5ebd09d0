//! Everything derived from an analysed long-form item: opportunities, posts,
//! the posting timeline, hashtags, cross-platform fit and predictions.

use serde::{Deserialize, Serialize};

use crate::context::AudienceContext;
use crate::scoring::{ContentScorer, Priority, ScoreOptions};
use crate::{to_hashtag, Platform};

use super::extract::{
    ACTIONABLE_VOCAB, CONTROVERSY_VOCAB, PRIVACY_VOCAB, TIPS_VOCAB, TUTORIAL_VOCAB, VIRAL_TRENDS,
};
use super::hooks::Hook;

const MAX_HASHTAGS: usize = 4;
const THREAD_SERIES_MIN_WORDS: usize = 800;
const THREAD_MIN_WORDS: usize = 600;
const WORDS_PER_THREAD_POST: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityKind {
    ThreadSeries,
    TutorialBreakdown,
    BehindScenes,
    DiscussionStarter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepurposingOpportunity {
    pub kind: OpportunityKind,
    pub priority: Priority,
    pub description: String,
    pub reasoning: String,
    pub estimated_posts: Option<usize>,
    pub timeline: Option<String>,
    pub audience_alignment: Option<Priority>,
    pub engagement_potential: Option<Priority>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostKind {
    Announcement,
    Insight,
    Thread,
    Question,
    EvergreenTip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedPost {
    pub kind: PostKind,
    pub content: String,
    pub timing: String,
    pub hashtags: Vec<String>,
    pub expected_engagement: f64,
    pub psychology_principle: Option<String>,
    /// Individual posts of a thread; empty for single posts.
    pub segments: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedPosts {
    pub immediate: Vec<DerivedPost>,
    pub follow_up: Vec<DerivedPost>,
    pub long_term: Vec<DerivedPost>,
}

impl DerivedPosts {
    pub fn len(&self) -> usize {
        self.immediate.len() + self.follow_up.len() + self.long_term.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &DerivedPost> {
        self.immediate
            .iter()
            .chain(self.follow_up.iter())
            .chain(self.long_term.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineStage {
    pub stage: String,
    pub action: String,
    pub rationale: String,
    pub expected_reach: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformFit {
    pub platform: Platform,
    pub fit_score: f64,
    pub rationale: String,
    pub optimization: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predictions {
    pub bluesky_engagement: f64,
    pub viral_potential: f64,
    pub audience_alignment: f64,
    pub matched_trends: Vec<String>,
}

/// What the derivation steps need to know about the source item.
pub struct PlanInput<'a> {
    pub title: &'a str,
    pub text: &'a str,
    pub url: Option<&'a str>,
    pub word_count: usize,
    pub subject: &'a str,
    pub insights: &'a [String],
    pub interests: &'a [String],
    pub hooks: &'a [Hook],
    pub hashtags: &'a [String],
    pub platform: Platform,
}

pub fn identify_opportunities(input: &PlanInput<'_>) -> Vec<RepurposingOpportunity> {
    let mut opportunities = Vec::new();

    if input.word_count > THREAD_SERIES_MIN_WORDS {
        let posts = input.word_count.div_ceil(WORDS_PER_THREAD_POST);
        opportunities.push(RepurposingOpportunity {
            kind: OpportunityKind::ThreadSeries,
            priority: Priority::High,
            description: format!("Break the article into a {}-post thread series", posts),
            reasoning: format!(
                "At {} words the piece has enough depth for several standalone posts",
                input.word_count
            ),
            estimated_posts: Some(posts),
            timeline: Some("3-5 days".to_string()),
            audience_alignment: None,
            engagement_potential: None,
        });
    }

    if TUTORIAL_VOCAB.any_match(input.text) {
        opportunities.push(RepurposingOpportunity {
            kind: OpportunityKind::TutorialBreakdown,
            priority: Priority::High,
            description: "Turn each step into a short, actionable tip post".to_string(),
            reasoning: "Step-by-step content is saved and shared by a technical audience"
                .to_string(),
            estimated_posts: Some(input.insights.len().clamp(3, 5)),
            timeline: Some("1 week".to_string()),
            audience_alignment: Some(Priority::High),
            engagement_potential: None,
        });
    }

    opportunities.push(RepurposingOpportunity {
        kind: OpportunityKind::BehindScenes,
        priority: Priority::Medium,
        description: "Share the story of how this piece came together".to_string(),
        reasoning: "Process posts build trust and humanise technical content".to_string(),
        estimated_posts: Some(1),
        timeline: Some("24-48 hours".to_string()),
        audience_alignment: None,
        engagement_potential: None,
    });

    if CONTROVERSY_VOCAB.any_match(input.text) {
        opportunities.push(RepurposingOpportunity {
            kind: OpportunityKind::DiscussionStarter,
            priority: Priority::Medium,
            description: "Pull the most debatable claim out as a question".to_string(),
            reasoning: "Contested takes invite replies and quote posts".to_string(),
            estimated_posts: Some(1),
            timeline: None,
            audience_alignment: None,
            engagement_potential: Some(Priority::High),
        });
    }

    opportunities
}

/// Shortens `text` to at most `limit` characters, cutting at a word boundary
/// and appending an ellipsis.
pub fn fit_to_limit(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let budget = limit.saturating_sub(1);
    let cut: String = text.chars().take(budget).collect();
    let trimmed = match cut.rfind(char::is_whitespace) {
        Some(index) if index > budget / 2 => &cut[..index],
        _ => cut.as_str(),
    };
    format!("{}…", trimmed.trim_end_matches(|c: char| c.is_whitespace() || c == ',' || c == ':'))
}

struct PostWriter<'a> {
    scorer: &'a ContentScorer,
    context: &'a AudienceContext,
    platform: Platform,
}

impl PostWriter<'_> {
    /// Fits the content to the platform and scores it as a draft.
    fn write(
        &self,
        kind: PostKind,
        content: String,
        timing: &str,
        hashtags: Vec<String>,
        psychology_principle: Option<String>,
    ) -> DerivedPost {
        let content = fit_to_limit(&content, self.platform.char_limit());
        let options = ScoreOptions {
            platform: self.platform,
            ..ScoreOptions::default()
        };
        let expected_engagement = self.scorer.score(&content, &options, self.context).overall;
        DerivedPost {
            kind,
            content,
            timing: timing.to_string(),
            hashtags,
            expected_engagement,
            psychology_principle,
            segments: Vec::new(),
        }
    }
}

fn contextual_hashtags(text: &str, context: &AudienceContext, fallback: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for keyword in context.matchers().keywords_in(text) {
        let tag = to_hashtag(&keyword);
        if !tags.contains(&tag) {
            tags.push(tag);
        }
        if tags.len() == 2 {
            return tags;
        }
    }
    if tags.is_empty() {
        return fallback.iter().take(2).cloned().collect();
    }
    tags
}

pub fn generate_posts(
    input: &PlanInput<'_>,
    scorer: &ContentScorer,
    context: &AudienceContext,
) -> DerivedPosts {
    let platform = input.platform;
    let writer = PostWriter {
        scorer,
        context,
        platform,
    };
    let mut posts = DerivedPosts::default();

    let interest_line = match input.interests {
        [] => String::new(),
        [one] => format!(" For anyone into {}.", one),
        [first, second, ..] => format!(" For anyone into {} and {}.", first, second),
    };
    let announcement = match input.url {
        Some(url) => format!("New post: {}.{}\n\n{}", input.title, interest_line, url),
        None => format!("New post: {}.{}", input.title, interest_line),
    };
    posts.immediate.push(writer.write(
        PostKind::Announcement,
        announcement,
        "Within 2 hours of publishing",
        input.hashtags.iter().take(2).cloned().collect(),
        None,
    ));

    for (index, insight) in input.insights.iter().enumerate() {
        let hook = (!input.hooks.is_empty()).then(|| &input.hooks[index % input.hooks.len()]);
        let content = match hook {
            Some(hook) => format!("{}\n\n{}", hook.text, insight),
            None => insight.clone(),
        };
        posts.follow_up.push(writer.write(
            PostKind::Insight,
            content,
            &format!("Day {}", index + 1),
            contextual_hashtags(insight, context, input.hashtags),
            hook.map(|hook| hook.principle.clone()),
        ));
    }

    if input.word_count > THREAD_MIN_WORDS && !input.insights.is_empty() {
        let total = input.insights.len() + 2;
        let mut segments = vec![format!("🧵 {}: what I learned (1/{})", input.title, total)];
        for (index, insight) in input.insights.iter().enumerate() {
            segments.push(format!("{}/{} {}", index + 2, total, insight));
        }
        segments.push(format!(
            "{}/{} That's the short version. What would you add? Reply below.",
            total, total
        ));
        let segments: Vec<String> = segments
            .iter()
            .map(|segment| fit_to_limit(segment, platform.char_limit()))
            .collect();

        let mut thread = writer.write(
            PostKind::Thread,
            segments[0].clone(),
            "Day 3",
            input.hashtags.iter().take(2).cloned().collect(),
            Some("Narrative Transportation".to_string()),
        );
        thread.segments = segments;
        posts.follow_up.push(thread);
    }

    posts.follow_up.push(writer.write(
        PostKind::Question,
        format!(
            "Question for everyone into {}: what's the hardest part of your setup right now?",
            input.subject
        ),
        "Day 5",
        input.hashtags.iter().take(1).cloned().collect(),
        Some("Curiosity Gap".to_string()),
    ));

    let tip = match input.insights.first() {
        Some(insight) => format!("Tip: {}", insight),
        None => format!("Tip: revisit \"{}\" whenever you plan changes to your {} setup.", input.title, input.subject),
    };
    posts.long_term.push(writer.write(
        PostKind::EvergreenTip,
        tip,
        "Ongoing, every 4-6 weeks",
        input.hashtags.iter().take(2).cloned().collect(),
        Some("Social Proof+Authority".to_string()),
    ));

    posts
}

pub fn posting_timeline() -> Vec<TimelineStage> {
    [
        (
            "Immediate",
            "Announce the article with a link",
            "Catches followers while the piece is fresh",
            "Core followers",
        ),
        (
            "Day 1",
            "Post the strongest insight with the top hook",
            "A standalone takeaway travels further than a link",
            "Followers and their reposts",
        ),
        (
            "Day 3",
            "Publish the thread",
            "Threads reward readers who missed the article",
            "Extended network",
        ),
        (
            "Day 5",
            "Ask an engagement question",
            "Replies surface the post in more feeds",
            "Active repliers and their followers",
        ),
        (
            "Ongoing",
            "Reshare evergreen tips",
            "New followers have not seen the original",
            "New followers",
        ),
    ]
    .into_iter()
    .map(|(stage, action, rationale, reach)| TimelineStage {
        stage: stage.to_string(),
        action: action.to_string(),
        rationale: rationale.to_string(),
        expected_reach: reach.to_string(),
    })
    .collect()
}

/// Target keywords found in the text, then content-type tags; at most four.
pub fn generate_hashtags(text: &str, context: &AudienceContext) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    let mut push = |tag: String| {
        if tags.len() < MAX_HASHTAGS && !tags.contains(&tag) {
            tags.push(tag);
        }
    };

    for keyword in context.matchers().keywords_in(text) {
        push(to_hashtag(&keyword));
    }
    if TUTORIAL_VOCAB.any_match(text) {
        push("#Tutorial".to_string());
    }
    if TIPS_VOCAB.any_match(text) {
        push("#TechTips".to_string());
    }
    if PRIVACY_VOCAB.any_match(text) {
        push("#PrivacyFirst".to_string());
    }

    tags
}

pub fn cross_platform_fit() -> Vec<PlatformFit> {
    vec![
        PlatformFit {
            platform: Platform::Bluesky,
            fit_score: 95.0,
            rationale: "Tech-savvy, privacy-minded early adopters".to_string(),
            optimization: "Keep posts under 300 characters and use threads for depth".to_string(),
        },
        PlatformFit {
            platform: Platform::X,
            fit_score: 75.0,
            rationale: "Broad reach but a noisier, less targeted feed".to_string(),
            optimization: "Lead with the hook and add a visual".to_string(),
        },
        PlatformFit {
            platform: Platform::LinkedIn,
            fit_score: 70.0,
            rationale: "Professional audience interested in the business angle".to_string(),
            optimization: "Frame the lessons around cost, time and reliability".to_string(),
        },
    ]
}

pub fn predict_performance(text: &str, audience_alignment: f64, avg_engagement: Option<f64>) -> Predictions {
    let mut engagement = 50.0 + 0.3 * audience_alignment;
    engagement += TUTORIAL_VOCAB.apply_first(text).delta;
    engagement += PRIVACY_VOCAB.apply_first(text).delta;
    match avg_engagement {
        Some(avg) if avg > 20.0 => engagement += 15.0,
        Some(avg) if avg > 10.0 => engagement += 10.0,
        _ => {}
    }

    let trends = VIRAL_TRENDS.apply(text);
    let mut viral = 30.0;
    viral += CONTROVERSY_VOCAB.apply_first(text).delta;
    viral += ACTIONABLE_VOCAB.apply_first(text).delta;
    viral += trends.delta;

    Predictions {
        bluesky_engagement: engagement.min(100.0).round(),
        viral_potential: viral.min(100.0).round(),
        audience_alignment,
        matched_trends: trends.matched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fitting_respects_limit() {
        let text = "word ".repeat(100);
        let fitted = fit_to_limit(&text, 50);
        assert!(fitted.chars().count() <= 50);
        assert!(fitted.ends_with('…'));
        assert_eq!(fit_to_limit("short", 50), "short");
    }

    #[test]
    fn hashtags_match_whole_words_and_stems() {
        let context = AudienceContext::default();
        assert_eq!(
            generate_hashtags("Self-hosted email for a small startup", &context),
            vec!["#SelfHosting".to_string(), "#Startup".to_string()]
        );
        assert!(generate_hashtags("Check your email daily", &context).is_empty());
    }

    #[test]
    fn predictions_follow_vocabulary() {
        let predictions = predict_performance(
            "How to keep your privacy with local AI automation",
            60.0,
            Some(25.0),
        );
        // 50 + 18 + 15 tutorial + 20 privacy + 15 history
        assert_eq!(predictions.bluesky_engagement, 100.0);
        // 30 + 20 actionable + 3 trends
        assert_eq!(predictions.viral_potential, 80.0);
    }
}
