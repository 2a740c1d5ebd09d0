//! Compiled whole-word matchers for the keyword lists of an audience context.

use std::fmt;

use once_cell::sync::OnceCell;

use crate::scoring::{Rule, RuleSet};

/// Target keywords, interests and pain-point lead words, each compiled once.
#[derive(Debug, Clone)]
pub struct KeywordMatchers {
    keywords: RuleSet,
    interests: RuleSet,
    /// Distinct lead words with the index of the first pain point using them.
    pain_leads: Vec<(usize, Rule)>,
}

impl KeywordMatchers {
    pub fn new(keywords: &[String], interests: &[String], pain_points: &[String]) -> Self {
        let mut pain_leads: Vec<(usize, Rule)> = Vec::new();
        let mut seen: Vec<String> = Vec::new();
        for (index, pain_point) in pain_points.iter().enumerate() {
            let Some(lead) = pain_point.split_whitespace().next() else {
                continue;
            };
            let lead = lead
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            if lead.len() < 3 || seen.contains(&lead) {
                continue;
            }
            pain_leads.push((index, Rule::terms(&lead, &[lead.as_str()], 0.0)));
            seen.push(lead);
        }

        Self {
            keywords: RuleSet::per_term(keywords, 0.0),
            interests: RuleSet::per_term(interests, 0.0),
            pain_leads,
        }
    }

    /// Target keywords present in the text, in context order.
    pub fn keywords_in(&self, text: &str) -> Vec<String> {
        self.keywords.apply(text).matched
    }

    pub fn interests_in(&self, text: &str) -> Vec<String> {
        self.interests.apply(text).matched
    }

    /// Number of distinct pain-point lead words present in the text.
    pub fn pain_lead_hits(&self, text: &str) -> usize {
        self.pain_leads
            .iter()
            .filter(|(_, rule)| rule.is_match(text))
            .count()
    }

    /// Index of the first pain point whose lead word appears in the text.
    pub fn first_pain_point(&self, text: &str) -> Option<usize> {
        self.pain_leads
            .iter()
            .find(|(_, rule)| rule.is_match(text))
            .map(|(index, _)| *index)
    }
}

/// Lazily built matchers. Derived from the context's own lists, so it never
/// takes part in equality or serialization.
#[derive(Clone, Default)]
pub(crate) struct MatcherCache(OnceCell<KeywordMatchers>);

impl MatcherCache {
    pub(crate) fn get_or_build(&self, build: impl FnOnce() -> KeywordMatchers) -> &KeywordMatchers {
        self.0.get_or_init(build)
    }
}

impl PartialEq for MatcherCache {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl fmt::Debug for MatcherCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatcherCache")
            .field("built", &self.0.get().is_some())
            .finish()
    }
}
