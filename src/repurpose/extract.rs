use once_cell::sync::Lazy;
use regex::Regex;

use crate::context::AudienceContext;
use crate::scoring::{Rule, RuleSet};
use crate::split_sentences;

const MAX_INSIGHTS: usize = 5;

/// Phrases that announce a takeaway. Single words like "key" are too loose:
/// "the API key" is not an insight.
pub(crate) static INSIGHT_MARKERS: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::new(vec![
        Rule::pattern("the key", r"\bthe\s+key\s+(?:is|to)\b", 0.0),
        Rule::pattern("important to", r"\bimportant\s+to\s+(?:understand|know)\b", 0.0),
        Rule::pattern("what matters most", r"\bwhat\s+matters\s+most\b", 0.0),
        Rule::pattern("biggest mistake", r"\bthe\s+biggest\s+mistake\b", 0.0),
        Rule::pattern("here's why", r"\bhere['’]s\s+why\b", 0.0),
        Rule::pattern("the truth", r"\bthe\s+truth\s+is\b", 0.0),
    ])
});

pub(crate) static TUTORIAL_VOCAB: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::new(vec![Rule::terms(
        "tutorial",
        &[
            "how to",
            "tutorial",
            "guide",
            "step by step",
            "step",
            "install",
            "setup",
            "set up",
            "configure",
            "walkthrough",
        ],
        15.0,
    )])
});

pub(crate) static CONTROVERSY_VOCAB: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::new(vec![Rule::terms(
        "controversy",
        &[
            "myth",
            "wrong",
            "unpopular opinion",
            "controversial",
            "overrated",
            "hot take",
            "debate",
            "stop using",
            "is dead",
        ],
        25.0,
    )])
});

pub(crate) static ACTIONABLE_VOCAB: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::new(vec![Rule::terms("actionable", &["how to", "step by step"], 20.0)])
});

pub(crate) static PRIVACY_VOCAB: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::new(vec![Rule::terms(
        "privacy",
        &[
            "privacy",
            "security",
            "encryption",
            "surveillance",
            "data protection",
            "secure",
        ],
        20.0,
    )])
});

pub(crate) static TIPS_VOCAB: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::new(vec![Rule::terms("tips", &["tip", "trick", "hack", "shortcut"], 0.0)])
});

pub(crate) static CONTRARIAN_VOCAB: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::new(vec![Rule::terms("contrarian", &["everyone", "most people"], 0.0)])
});

pub(crate) static VIRAL_TRENDS: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::per_term(&["ai", "privacy", "self-hosting", "automation"], 10.0)
});

static EXPERIENCE: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2}|a few|several)\s+(years?|months?)\b").ok()
});

/// Sentences carrying an insight marker, 30-200 characters. Falls back to
/// the first sentence of each of the first five paragraphs (40-180
/// characters).
pub fn key_insights(body: &str) -> Vec<String> {
    let mut insights: Vec<String> = split_sentences(body)
        .into_iter()
        .map(normalize_whitespace)
        .filter(|sentence| (30..=200).contains(&sentence.chars().count()))
        .filter(|sentence| INSIGHT_MARKERS.any_match(sentence))
        .take(MAX_INSIGHTS)
        .collect();

    if insights.is_empty() {
        insights = paragraphs(body)
            .into_iter()
            .take(5)
            .filter_map(|paragraph| split_sentences(paragraph).into_iter().next())
            .map(normalize_whitespace)
            .filter(|sentence| (40..=180).contains(&sentence.chars().count()))
            .collect();
    }

    insights.dedup();
    insights
}

pub fn paragraphs(body: &str) -> Vec<&str> {
    body.split("\n\n")
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .collect()
}

fn normalize_whitespace(sentence: &str) -> String {
    sentence.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Audience interests that appear in the text, in context order.
pub fn matched_interests(text: &str, context: &AudienceContext) -> Vec<String> {
    context.matchers().interests_in(text)
}

/// First pain point whose leading word appears in the text.
pub fn matched_pain_point(text: &str, context: &AudienceContext) -> Option<String> {
    let index = context.matchers().first_pain_point(text)?;
    context.pain_points().get(index).cloned()
}

/// "5 years", "several months" and the like.
pub fn experience_phrase(text: &str) -> Option<String> {
    let pattern = EXPERIENCE.as_ref()?;
    let captures = pattern.captures(text)?;
    Some(format!(
        "{} {}",
        captures.get(1)?.as_str().to_lowercase(),
        captures.get(2)?.as_str().to_lowercase()
    ))
}
