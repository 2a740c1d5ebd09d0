use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use content_intel::analytics::{AccountMetrics, CorpusPost};
use content_intel::context::{AudienceContext, DocumentKind};
use content_intel::insight::{InsightCategory, InsightMetrics};
use content_intel::repurpose::BlogItem;
use content_intel::{Platform, ScoreOptions};

#[derive(Debug, Deserialize)]
pub struct ApiScoreRequest {
    pub text: Option<String>,
    pub platform: Option<String>,
    pub has_images: Option<bool>,
    pub has_links: Option<bool>,
    pub scheduled_at: Option<String>,
    pub follower_count: Option<u64>,
}

impl ApiScoreRequest {
    /// Missing options fall back to `defaults`.
    pub fn into_parts(self, defaults: ScoreOptions) -> Result<(String, ScoreOptions), String> {
        let text = self.text.ok_or_else(|| "text is required".to_string())?;
        let mut options = defaults;

        if let Some(platform) = self.platform.as_deref() {
            options.platform = Platform::from_str(platform)
                .ok_or_else(|| format!("invalid platform: {}", platform))?;
        }
        if let Some(value) = self.has_images {
            options.has_images = value;
        }
        if let Some(value) = self.has_links {
            options.has_links = value;
        }
        if let Some(value) = self.scheduled_at.as_deref() {
            options.scheduled_at = Some(parse_scheduled_at(value)?);
        }
        if let Some(value) = self.follower_count {
            options.follower_count = value;
        }

        Ok((text, options))
    }
}

/// Accepts RFC 3339 or a local `YYYY-MM-DDTHH:MM[:SS]` / `YYYY-MM-DD HH:MM`.
pub fn parse_scheduled_at(value: &str) -> Result<NaiveDateTime, String> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }
    Err(format!("invalid schedule time: {}", value))
}

#[derive(Debug, Deserialize)]
pub struct ApiRepurposeRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub url: Option<String>,
    pub metrics: Option<AccountMetrics>,
}

impl ApiRepurposeRequest {
    pub fn into_item(self) -> (BlogItem, Option<AccountMetrics>) {
        let mut item = BlogItem::new(self.title.unwrap_or_default(), self.body.unwrap_or_default());
        item.url = self.url.filter(|url| !url.trim().is_empty());
        (item, self.metrics)
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiBatchRequest {
    pub items: Vec<BlogItem>,
    pub metrics: Option<AccountMetrics>,
}

#[derive(Debug, Deserialize)]
pub struct ApiAnalyticsRequest {
    pub corpus: Vec<CorpusPost>,
    pub metrics: Option<AccountMetrics>,
}

#[derive(Debug, Deserialize)]
pub struct ApiInsightsRequest {
    pub category: String,
    pub metrics: Option<InsightMetrics>,
    pub corpus: Option<Vec<CorpusPost>>,
    pub account: Option<AccountMetrics>,
}

impl ApiInsightsRequest {
    pub fn category(&self) -> Result<InsightCategory, String> {
        InsightCategory::from_str(&self.category)
            .ok_or_else(|| format!("invalid insight category: {}", self.category))
    }
}

#[derive(Debug, Serialize)]
pub struct ApiInsightsResponse {
    pub category: InsightCategory,
    pub available: bool,
    pub insight: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApiContextResponse {
    pub sources: Vec<DocumentKind>,
    pub default_context: bool,
    pub target_keywords: Vec<String>,
    pub interests: Vec<String>,
}

impl ApiContextResponse {
    pub fn from_context(context: &AudienceContext) -> Self {
        Self {
            sources: context.sources.clone(),
            default_context: context.is_default(),
            target_keywords: context.target_keywords.clone(),
            interests: context.interests().to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_formats() {
        let expected = NaiveDateTime::parse_from_str("2026-10-20T10:00:00", "%Y-%m-%dT%H:%M:%S").unwrap();
        assert_eq!(parse_scheduled_at("2026-10-20T10:00").unwrap(), expected);
        assert_eq!(parse_scheduled_at("2026-10-20 10:00").unwrap(), expected);
        assert_eq!(parse_scheduled_at("2026-10-20T10:00:00+02:00").unwrap(), expected);
        assert!(parse_scheduled_at("next tuesday").is_err());
    }

    #[test]
    fn score_request_requires_text() {
        let request: ApiScoreRequest = serde_json::from_str(r#"{"platform": "x"}"#).unwrap();
        assert!(request.into_parts(ScoreOptions::default()).is_err());

        let request: ApiScoreRequest =
            serde_json::from_str(r#"{"text": "", "platform": "x", "follower_count": 50}"#).unwrap();
        let (text, options) = request.into_parts(ScoreOptions::default()).unwrap();
        assert!(text.is_empty());
        assert_eq!(options.platform, Platform::X);
        assert_eq!(options.follower_count, 50);
    }

    #[test]
    fn unknown_platform_is_rejected() {
        let request: ApiScoreRequest =
            serde_json::from_str(r#"{"text": "hi", "platform": "myspace"}"#).unwrap();
        assert!(request.into_parts(ScoreOptions::default()).is_err());
    }
}
