use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use once_cell::sync::Lazy;

use crate::context::AudienceContext;
use crate::scoring::rules::{Rule, RuleSet};
use crate::scoring::{ScoreOptions, ScoreVector, ScoreWeights};
use crate::{clamp_score, extract_text_features, TextFeatures};

pub(crate) static TUTORIAL: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::new(vec![Rule::terms(
        "tutorial",
        &["tip", "guide", "tutorial", "how to"],
        15.0,
    )])
});

static PROFESSIONAL: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::new(vec![Rule::terms(
        "professional",
        &[
            "solution",
            "strategy",
            "workflow",
            "framework",
            "professional",
            "efficiency",
            "best practice",
            "roi",
        ],
        10.0,
    )])
});

static TECHNICAL_TERMS: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::per_term(
        &[
            "docker",
            "kubernetes",
            "linux",
            "server",
            "api",
            "vpn",
            "encryption",
            "self-hosted",
            "homelab",
            "raspberry pi",
            "nas",
            "proxmox",
            "open source",
            "git",
            "network",
            "backup",
            "script",
            "database",
            "firewall",
            "container",
        ],
        8.0,
    )
});

static BUSINESS_VALUE: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::per_term(
        &[
            "save time",
            "save money",
            "cost",
            "productivity",
            "efficiency",
            "revenue",
            "growth",
            "roi",
            "profit",
            "scale",
        ],
        6.0,
    )
});

static JARGON: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::per_term(
        &[
            "kubernetes",
            "k8s",
            "orchestration",
            "microservices",
            "containerization",
            "idempotent",
            "cidr",
            "subnet",
            "reverse proxy",
            "zfs",
            "raid",
            "ansible",
            "terraform",
            "vlan",
        ],
        0.0,
    )
});

static ENGAGEMENT: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::new(vec![
        Rule::terms(
            "question_word",
            &["what", "why", "how", "which", "who", "when", "where"],
            10.0,
        ),
        Rule::terms(
            "call_to_action",
            &[
                "share",
                "comment",
                "reply",
                "let me know",
                "tell me",
                "follow",
                "repost",
                "subscribe",
                "join",
            ],
            12.0,
        ),
        Rule::terms(
            "opinion",
            &[
                "what do you think",
                "thoughts",
                "opinion",
                "agree",
                "disagree",
                "your take",
            ],
            8.0,
        ),
    ])
});

static PROMOTIONAL: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::new(vec![Rule::terms("promotional", &["buy", "sale", "discount"], -15.0)])
});

static ANALYSIS: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::new(vec![Rule::terms(
        "analysis",
        &[
            "tutorial",
            "guide",
            "how to",
            "analysis",
            "breakdown",
            "deep dive",
            "explained",
            "lessons",
        ],
        10.0,
    )])
});

pub(crate) static TRENDING: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::per_term(
        &[
            "ai",
            "artificial intelligence",
            "llm",
            "local ai",
            "privacy",
            "self-hosting",
            "homelab",
            "automation",
            "open source",
            "cybersecurity",
            "decentralized",
            "fediverse",
            "bluesky",
            "data sovereignty",
        ],
        10.0,
    )
});

static CTA_TIERS: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::new(vec![
        Rule::terms(
            "strong",
            &["what do you think", "share your", "comment", "reply"],
            25.0,
        ),
        Rule::terms("medium", &["thoughts", "opinion", "agree"], 15.0),
        Rule::terms("weak", &["check out", "more info"], 8.0),
    ])
});

const PEAK_HOURS: &[(u32, u32)] = &[(9, 11), (13, 15), (19, 21)];
const SECONDARY_HOURS: &[(u32, u32)] = &[(8, 12), (17, 22)];
const DAYTIME_HOURS: (u32, u32) = (6, 23);

/// Scores drafts against an audience context. Holds no state besides the
/// weights, so one instance can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct ContentScorer {
    weights: ScoreWeights,
}

impl ContentScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self {
            weights: weights.validated(),
        }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    pub fn score(&self, text: &str, options: &ScoreOptions, context: &AudienceContext) -> ScoreVector {
        let features = extract_text_features(text);

        let mut scores = ScoreVector {
            content_alignment: content_alignment(text, context),
            audience_relevance: audience_relevance(text),
            engagement_potential: engagement_potential(text, &features, options),
            timing_optimization: timing_optimization(options.scheduled_at),
            platform_optimization: platform_optimization(text, &features, options),
            trend_alignment: trend_alignment(text),
            call_to_action: call_to_action(text, &features),
            readability: readability(&features),
            overall: 0.0,
        };
        scores.overall = self.weights.overall(&scores);
        scores
    }
}

pub fn content_alignment(text: &str, context: &AudienceContext) -> f64 {
    let mut score = 30.0;

    let matchers = context.matchers();
    score += 15.0 * matchers.keywords_in(text).len() as f64;
    score += 10.0 * matchers.pain_lead_hits(text) as f64;

    score += PROFESSIONAL.apply(text).delta;
    score += TUTORIAL.apply(text).delta;

    clamp_score(score)
}

pub fn audience_relevance(text: &str) -> f64 {
    let mut score = 40.0;
    score += TECHNICAL_TERMS.apply(text).delta;
    score += BUSINESS_VALUE.apply(text).delta;
    if JARGON.apply(text).count() > 2 {
        score -= 15.0;
    }
    clamp_score(score)
}

pub fn engagement_potential(text: &str, features: &TextFeatures, options: &ScoreOptions) -> f64 {
    let mut score = 35.0;

    let length = features.char_count;
    if (100..=250).contains(&length) {
        score += 20.0;
    } else if (50..=300).contains(&length) {
        score += 10.0;
    } else if length < 50 {
        score -= 10.0;
    }

    if features.questions > 0 {
        score += 15.0;
    }
    if features.exclamations > 0 {
        score += 8.0;
    }
    if options.has_images {
        score += 12.0;
    }
    if options.has_links || features.urls > 0 {
        score += 8.0;
    }

    score += ENGAGEMENT.apply(text).delta;

    match features.hashtags {
        0 => {}
        1..=3 => score += 10.0,
        _ => score -= 5.0,
    }

    clamp_score(score)
}

/// Without a schedule the base value is returned unadjusted.
pub fn timing_optimization(scheduled_at: Option<NaiveDateTime>) -> f64 {
    let mut score = 50.0;
    let Some(at) = scheduled_at else {
        return score;
    };

    let hour = at.hour();
    let in_band = |(start, end): &(u32, u32)| (*start..=*end).contains(&hour);
    if PEAK_HOURS.iter().any(in_band) {
        score += 25.0;
    } else if SECONDARY_HOURS.iter().any(in_band) {
        score += 15.0;
    } else if in_band(&DAYTIME_HOURS) {
        score += 5.0;
    } else {
        score -= 20.0;
    }

    match at.weekday() {
        Weekday::Sat | Weekday::Sun => score -= 10.0,
        _ => score += 15.0,
    }

    clamp_score(score)
}

pub fn platform_optimization(text: &str, features: &TextFeatures, options: &ScoreOptions) -> f64 {
    let mut score = 60.0;

    if features.char_count <= options.platform.char_limit() {
        score += 20.0;
    } else {
        score -= 25.0;
    }

    score += PROMOTIONAL.apply(text).delta;
    score += ANALYSIS.apply(text).delta;

    clamp_score(score)
}

pub fn trend_alignment(text: &str) -> f64 {
    let mut score = 45.0;
    let outcome = TRENDING.apply(text);
    score += outcome.delta;
    if outcome.count() >= 2 {
        score += 15.0;
    }
    clamp_score(score)
}

pub fn call_to_action(text: &str, features: &TextFeatures) -> f64 {
    let mut score = 30.0;
    score += CTA_TIERS.apply_first(text).delta;
    if features.questions > 0 {
        score += 12.0;
    }
    clamp_score(score)
}

pub fn readability(features: &TextFeatures) -> f64 {
    let mut score = 50.0;

    if features.word_count > 0 {
        let avg = features.avg_words_per_sentence();
        if avg <= 15.0 {
            score += 20.0;
        } else if avg <= 20.0 {
            score += 10.0;
        } else {
            score -= 10.0;
        }
    }

    if features.char_count > 150 && features.line_count > 1 {
        score += 15.0;
    }

    if features.char_count > 200 && !features.has_line_breaks && !features.has_sentence_punctuation {
        score -= 20.0;
    }

    clamp_score(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(year, month, day).and_then(|date| date.and_hms_opt(hour, 0, 0))
    }

    #[test]
    fn timing_bands() {
        // 2026-10-20 is a Tuesday, 2026-10-24 a Saturday.
        assert_eq!(timing_optimization(at(2026, 10, 20, 10)), 90.0);
        assert_eq!(timing_optimization(at(2026, 10, 20, 12)), 80.0);
        assert_eq!(timing_optimization(at(2026, 10, 20, 7)), 70.0);
        assert_eq!(timing_optimization(at(2026, 10, 24, 3)), 20.0);
        assert_eq!(timing_optimization(None), 50.0);
    }

    #[test]
    fn jargon_penalty_needs_three_terms() {
        let light = audience_relevance("Kubernetes and terraform");
        let heavy = audience_relevance("Kubernetes and terraform with ansible");
        // ansible adds no technical bonus, so the only difference is the penalty.
        assert_eq!(light - heavy, 15.0);
    }

    #[test]
    fn cta_uses_strongest_tier() {
        let features = extract_text_features("Check out my thoughts, then reply");
        assert_eq!(call_to_action("Check out my thoughts, then reply", &features), 55.0);
    }

    #[test]
    fn wall_of_text_is_penalised() {
        let wall = "word ".repeat(60);
        let features = extract_text_features(&wall);
        // 60 words in one sentence: -10, wall of text: -20.
        assert_eq!(readability(&features), 20.0);
    }
}
