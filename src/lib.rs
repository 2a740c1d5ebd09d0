pub mod analytics;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod insight;
pub mod repurpose;
pub mod scoring;

use serde::{Deserialize, Serialize};

pub use analytics::{get_performance_analytics, EngagementAnalyzer, PerformanceAnalytics};
pub use context::{AudienceContext, AudienceContextStore};
pub use engine::ContentEngine;
pub use error::EngineError;
pub use insight::{InsightCategory, InsightEngine, TextGenerator};
pub use repurpose::{analyze_and_repurpose_blog_content, BlogItem, RepurposingEngine, RepurposingReport};
pub use scoring::{score_post, ContentScorer, ScoreOptions, ScoreReport, ScoreVector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    #[default]
    Bluesky,
    X,
    Threads,
    Mastodon,
    LinkedIn,
}

impl Platform {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "bluesky" | "bsky" => Some(Platform::Bluesky),
            "x" | "twitter" => Some(Platform::X),
            "threads" => Some(Platform::Threads),
            "mastodon" | "fediverse" => Some(Platform::Mastodon),
            "linkedin" => Some(Platform::LinkedIn),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Platform::Bluesky => "Bluesky",
            Platform::X => "X",
            Platform::Threads => "Threads",
            Platform::Mastodon => "Mastodon",
            Platform::LinkedIn => "LinkedIn",
        }
    }

    /// Hard character limit of a single post.
    pub fn char_limit(self) -> usize {
        match self {
            Platform::Bluesky => 300,
            Platform::X => 280,
            Platform::Threads => 500,
            Platform::Mastodon => 500,
            Platform::LinkedIn => 3000,
        }
    }

    /// Length above which a draft should be shortened even if it still fits.
    pub fn recommended_length(self) -> usize {
        match self {
            Platform::Bluesky => 280,
            Platform::X => 260,
            Platform::Threads => 450,
            Platform::Mastodon => 450,
            Platform::LinkedIn => 1300,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextFeatures {
    pub char_count: usize,
    pub word_count: usize,
    pub sentence_count: usize,
    pub line_count: usize,
    pub hashtags: usize,
    pub mentions: usize,
    pub urls: usize,
    pub questions: usize,
    pub exclamations: usize,
    pub has_line_breaks: bool,
    pub has_sentence_punctuation: bool,
}

impl TextFeatures {
    pub fn avg_words_per_sentence(&self) -> f64 {
        if self.sentence_count == 0 {
            return 0.0;
        }
        self.word_count as f64 / self.sentence_count as f64
    }
}

pub fn extract_text_features(text: &str) -> TextFeatures {
    let mut questions = 0usize;
    let mut exclamations = 0usize;
    let mut periods = 0usize;

    for ch in text.chars() {
        match ch {
            '?' => questions += 1,
            '!' => exclamations += 1,
            '.' => periods += 1,
            _ => {}
        }
    }

    let mut hashtags = 0usize;
    let mut mentions = 0usize;
    let mut word_count = 0usize;
    for word in text.split_whitespace() {
        if word.chars().any(|c| c.is_alphanumeric()) {
            word_count += 1;
        }
        let mut chars = word.chars();
        match (chars.next(), chars.next()) {
            (Some('#'), Some(next)) if next.is_alphanumeric() => hashtags += 1,
            (Some('@'), Some(next)) if next.is_alphanumeric() => mentions += 1,
            _ => {}
        }
    }

    let lowercase = text.to_lowercase();
    let urls = ["http://", "https://", "www."]
        .iter()
        .map(|needle| lowercase.matches(needle).count())
        .sum();

    let sentence_count = split_sentences(text).len();
    let line_count = text.lines().filter(|line| !line.trim().is_empty()).count();

    TextFeatures {
        char_count: text.chars().count(),
        word_count,
        sentence_count,
        line_count,
        hashtags,
        mentions,
        urls,
        questions,
        exclamations,
        has_line_breaks: text.trim().contains('\n'),
        has_sentence_punctuation: questions + exclamations + periods > 0,
    }
}

/// Splits on `.`, `!` and `?`, keeping pieces that contain a word.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|piece| piece.chars().any(|c| c.is_alphanumeric()))
        .collect()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace()
        .filter(|word| word.chars().any(|c| c.is_alphanumeric()))
        .count()
}

/// `self-hosting` -> `#SelfHosting`, `ai` -> `#AI`.
pub fn to_hashtag(keyword: &str) -> String {
    let mut tag = String::from("#");
    for word in keyword.split(|c: char| c.is_whitespace() || c == '-' || c == '_') {
        let word: String = word.chars().filter(|c| c.is_alphanumeric()).collect();
        if word.is_empty() {
            continue;
        }
        if word.chars().count() <= 2 {
            tag.push_str(&word.to_uppercase());
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            tag.extend(first.to_uppercase());
            tag.push_str(&chars.as_str().to_lowercase());
        }
    }
    tag
}

pub fn stable_hash64(value: &str) -> u64 {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

/// Clamps a score to [0, 100]; NaN becomes 0.
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

pub fn format_number(value: f64) -> String {
    let rounded = value.round().max(0.0) as i64;
    let mut chars: Vec<char> = rounded.to_string().chars().collect();
    let mut result = String::new();
    let mut count = 0usize;

    while let Some(ch) = chars.pop() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(ch);
        count += 1;
    }

    result.chars().rev().collect()
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}
