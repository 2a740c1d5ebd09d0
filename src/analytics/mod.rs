pub mod topics;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extract_text_features;

use topics::{CatalogueEntry, SIMILAR_TOPIC_CATALOGUE};

pub use topics::{classify_topic, TopicMatch, OTHER_TOPIC, PERSONAL_TOPIC};

const MAX_RATE: f64 = 15.0;
const UNDERPERFORMING_RATE: f64 = 2.0;
const ON_TARGET_GOAL: f64 = 70.0;
const SIMILAR_TOPIC_COUNT: usize = 5;
const CATALOGUE_BASELINE_RATE: f64 = 5.0;

/// One historical post from the caller's feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusPost {
    pub text: String,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub repost_count: u64,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl CorpusPost {
    pub fn engagement(&self) -> u64 {
        self.like_count + self.reply_count + self.repost_count
    }

    pub fn resolved_format(&self) -> String {
        match self.format.as_deref().map(str::trim) {
            Some(format) if !format.is_empty() => format.to_lowercase(),
            _ => infer_format(&self.text).to_string(),
        }
    }
}

/// Account-level numbers supplied alongside a corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountMetrics {
    pub followers_count: u64,
    pub following_count: u64,
    pub posts_count: u64,
    /// Average engagement per post, when the caller already knows it.
    pub avg_engagement: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatEngagement {
    pub format: String,
    pub count: usize,
    pub avg_engagement: f64,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicEngagement {
    pub topic: String,
    pub count: usize,
    pub avg_engagement: f64,
    pub rate: f64,
    pub on_target: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarTopic {
    pub topic: String,
    pub based_on: String,
    pub estimated_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicInsights {
    pub on_target_percentage: f64,
    pub top_topic: Option<String>,
    pub recommendations: Vec<String>,
    pub similar_topics: Vec<SimilarTopic>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_posts: usize,
    pub total_engagement: u64,
    pub avg_engagement: f64,
    pub avg_rate: f64,
    pub best_format: Option<String>,
    pub best_topic: Option<String>,
    /// Average engagement as a percentage of followers.
    pub engagement_per_follower: Option<f64>,
    pub first_post_at: Option<DateTime<Utc>>,
    pub last_post_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceAnalytics {
    pub engagement_by_format: Vec<FormatEngagement>,
    pub engagement_by_topic: Vec<TopicEngagement>,
    pub ai_topic_insights: TopicInsights,
    pub summary: AnalyticsSummary,
}

/// `thread`, `link`, `question` or `text`.
pub fn infer_format(text: &str) -> &'static str {
    let lowercase = text.to_lowercase();
    let trimmed = lowercase.trim_start();
    if trimmed.contains('🧵')
        || trimmed.starts_with("1/")
        || trimmed.contains("a thread")
        || trimmed.contains("thread:")
    {
        return "thread";
    }
    let features = extract_text_features(text);
    if features.urls > 0 {
        return "link";
    }
    if features.questions > 0 {
        return "question";
    }
    "text"
}

pub fn engagement_rate(avg_engagement: f64) -> f64 {
    (avg_engagement / 10.0).min(MAX_RATE)
}

#[derive(Default)]
struct Bucket {
    count: usize,
    engagement: u64,
}

impl Bucket {
    fn add(&mut self, engagement: u64) {
        self.count += 1;
        self.engagement += engagement;
    }

    fn average(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.engagement as f64 / self.count as f64
    }
}

/// Aggregates a corpus by format and topic. Stateless; the corpus is supplied
/// by the caller on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngagementAnalyzer;

impl EngagementAnalyzer {
    pub fn analyze(&self, corpus: &[CorpusPost], metrics: Option<&AccountMetrics>) -> PerformanceAnalytics {
        let engagement_by_format = self.engagement_by_format(corpus);
        let engagement_by_topic = self.engagement_by_topic(corpus);

        let total_engagement: u64 = corpus.iter().map(CorpusPost::engagement).sum();
        let avg_engagement = if corpus.is_empty() {
            0.0
        } else {
            total_engagement as f64 / corpus.len() as f64
        };
        let avg_rate = engagement_rate(avg_engagement);

        let ai_topic_insights = topic_insights(corpus.len(), &engagement_by_topic, avg_rate);

        let engagement_per_follower = metrics
            .filter(|metrics| metrics.followers_count > 0)
            .map(|metrics| {
                let average = metrics.avg_engagement.unwrap_or(avg_engagement);
                average / metrics.followers_count as f64 * 100.0
            });

        let summary = AnalyticsSummary {
            total_posts: corpus.len(),
            total_engagement,
            avg_engagement,
            avg_rate,
            best_format: engagement_by_format.first().map(|entry| entry.format.clone()),
            best_topic: ai_topic_insights.top_topic.clone(),
            engagement_per_follower,
            first_post_at: corpus.iter().filter_map(|post| post.created_at).min(),
            last_post_at: corpus.iter().filter_map(|post| post.created_at).max(),
        };

        debug!(
            posts = corpus.len(),
            formats = engagement_by_format.len(),
            topics = engagement_by_topic.len(),
            on_target = ai_topic_insights.on_target_percentage,
            "corpus analyzed"
        );

        PerformanceAnalytics {
            engagement_by_format,
            engagement_by_topic,
            ai_topic_insights,
            summary,
        }
    }

    pub fn engagement_by_format(&self, corpus: &[CorpusPost]) -> Vec<FormatEngagement> {
        let mut order: Vec<String> = Vec::new();
        let mut buckets: HashMap<String, Bucket> = HashMap::new();
        for post in corpus {
            let format = post.resolved_format();
            if !buckets.contains_key(&format) {
                order.push(format.clone());
            }
            buckets.entry(format).or_default().add(post.engagement());
        }

        let mut entries: Vec<FormatEngagement> = order
            .into_iter()
            .filter_map(|format| {
                let bucket = buckets.get(&format)?;
                let avg_engagement = bucket.average();
                Some(FormatEngagement {
                    format,
                    count: bucket.count,
                    avg_engagement,
                    rate: engagement_rate(avg_engagement),
                })
            })
            .collect();
        // Stable sort keeps first-seen order among ties.
        entries.sort_by(|a, b| b.avg_engagement.total_cmp(&a.avg_engagement));
        entries
    }

    pub fn engagement_by_topic(&self, corpus: &[CorpusPost]) -> Vec<TopicEngagement> {
        let mut order: Vec<TopicMatch> = Vec::new();
        let mut buckets: HashMap<&'static str, Bucket> = HashMap::new();
        for post in corpus {
            let matched = classify_topic(&post.text);
            if !buckets.contains_key(matched.topic) {
                order.push(matched);
            }
            buckets.entry(matched.topic).or_default().add(post.engagement());
        }

        let mut entries: Vec<TopicEngagement> = order
            .into_iter()
            .filter_map(|matched| {
                let bucket = buckets.get(matched.topic)?;
                let avg_engagement = bucket.average();
                Some(TopicEngagement {
                    topic: matched.topic.to_string(),
                    count: bucket.count,
                    avg_engagement,
                    rate: engagement_rate(avg_engagement),
                    on_target: matched.on_target,
                })
            })
            .collect();
        entries.sort_by(|a, b| b.avg_engagement.total_cmp(&a.avg_engagement));
        entries
    }
}

fn topic_insights(total_posts: usize, topics: &[TopicEngagement], corpus_rate: f64) -> TopicInsights {
    let on_target_posts: usize = topics
        .iter()
        .filter(|entry| entry.on_target)
        .map(|entry| entry.count)
        .sum();
    let on_target_percentage = if total_posts == 0 {
        0.0
    } else {
        on_target_posts as f64 / total_posts as f64 * 100.0
    };

    let top = topics.first();
    let mut recommendations = Vec::new();

    if total_posts > 0 && on_target_percentage < ON_TARGET_GOAL {
        recommendations.push(format!(
            "Only {:.0}% of posts cover your core topics (AI & Tech, Home Lab, Privacy & Security, Small Business, Personal). Focus more of your feed on them.",
            on_target_percentage
        ));
    }

    if let Some(top) = top {
        recommendations.push(format!(
            "{} is your top-performing topic ({:.1} engagement rate across {} posts). Double down on it.",
            top.topic, top.rate, top.count
        ));
    }

    for entry in topics
        .iter()
        .filter(|entry| entry.rate < UNDERPERFORMING_RATE && entry.count > 1)
    {
        recommendations.push(format!(
            "{} is underperforming ({:.1} rate over {} posts). Try a different angle or post it less often.",
            entry.topic, entry.rate, entry.count
        ));
    }

    if topics.iter().any(|entry| entry.topic == PERSONAL_TOPIC) {
        recommendations.push(
            "Your audience responds to personal posts. Share more behind-the-scenes content."
                .to_string(),
        );
    }

    TopicInsights {
        on_target_percentage,
        top_topic: top.map(|entry| entry.topic.clone()),
        recommendations,
        similar_topics: similar_topics(topics, corpus_rate),
    }
}

/// Catalogue entries related to the best performing on-target topics first,
/// then the rest of the catalogue in its fixed order.
fn similar_topics(topics: &[TopicEngagement], corpus_rate: f64) -> Vec<SimilarTopic> {
    let scale = corpus_rate / CATALOGUE_BASELINE_RATE;

    let mut ranked: Vec<&CatalogueEntry> = Vec::new();
    for entry in topics.iter().filter(|entry| entry.on_target) {
        ranked.extend(
            SIMILAR_TOPIC_CATALOGUE
                .iter()
                .filter(|candidate| candidate.based_on == entry.topic),
        );
    }
    for candidate in SIMILAR_TOPIC_CATALOGUE {
        if !ranked.iter().any(|seen| seen.topic == candidate.topic) {
            ranked.push(candidate);
        }
    }

    ranked
        .into_iter()
        .take(SIMILAR_TOPIC_COUNT)
        .map(|candidate| SimilarTopic {
            topic: candidate.topic.to_string(),
            based_on: candidate.based_on.to_string(),
            estimated_rate: round2(candidate.rate * scale),
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn get_performance_analytics(
    corpus: &[CorpusPost],
    metrics: Option<&AccountMetrics>,
) -> PerformanceAnalytics {
    EngagementAnalyzer.analyze(corpus, metrics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_inference() {
        assert_eq!(infer_format("1/ Here is how I back up my NAS"), "thread");
        assert_eq!(infer_format("New post: https://example.com/nas"), "link");
        assert_eq!(infer_format("Which VPN do you use?"), "question");
        assert_eq!(infer_format("Shipped the update."), "text");
    }

    #[test]
    fn rate_is_capped() {
        assert_eq!(engagement_rate(40.0), 4.0);
        assert_eq!(engagement_rate(400.0), 15.0);
    }
}
