//! Keyword heuristics expressed as `(pattern, delta)` tables.
//!
//! Every scoring adjustment that depends on vocabulary goes through a
//! [`RuleSet`], so the tables can be tested on their own and the scorer only
//! decides which set to apply and how (all matches or first tier).

use regex::Regex;

#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pattern: Option<Regex>,
    pub delta: f64,
}

impl Rule {
    /// A rule that fires when any of `terms` appears as a whole word.
    pub fn terms(name: &str, terms: &[&str], delta: f64) -> Self {
        Self {
            name: name.to_string(),
            pattern: compile_terms(terms),
            delta,
        }
    }

    /// A rule backed by a raw regex source, matched case-insensitively.
    pub fn pattern(name: &str, source: &str, delta: f64) -> Self {
        Self {
            name: name.to_string(),
            pattern: Regex::new(&format!("(?i){}", source)).ok(),
            delta,
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(text))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleOutcome {
    pub delta: f64,
    pub matched: Vec<String>,
}

impl RuleOutcome {
    pub fn count(&self) -> usize {
        self.matched.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// One rule per term, each worth `delta`, so matches are counted per
    /// distinct term.
    pub fn per_term<S: AsRef<str>>(terms: &[S], delta: f64) -> Self {
        let rules = terms
            .iter()
            .map(|term| term.as_ref().trim())
            .filter(|term| !term.is_empty())
            .map(|term| Rule::terms(term, &[term], delta))
            .collect();
        Self { rules }
    }

    /// Sums the delta of every matching rule.
    pub fn apply(&self, text: &str) -> RuleOutcome {
        let mut outcome = RuleOutcome::default();
        for rule in &self.rules {
            if rule.is_match(text) {
                outcome.delta += rule.delta;
                outcome.matched.push(rule.name.clone());
            }
        }
        outcome
    }

    /// Applies only the first matching rule; used for tiered vocabularies.
    pub fn apply_first(&self, text: &str) -> RuleOutcome {
        self.rules
            .iter()
            .find(|rule| rule.is_match(text))
            .map(|rule| RuleOutcome {
                delta: rule.delta,
                matched: vec![rule.name.clone()],
            })
            .unwrap_or_default()
    }

    pub fn any_match(&self, text: &str) -> bool {
        self.rules.iter().any(|rule| rule.is_match(text))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn compile_terms(terms: &[&str]) -> Option<Regex> {
    let alternatives: Vec<String> = terms
        .iter()
        .map(|term| term.trim())
        .filter(|term| !term.is_empty())
        .map(term_pattern)
        .collect();
    if alternatives.is_empty() {
        return None;
    }
    let source = format!(r"(?i)\b(?:{})\b", alternatives.join("|"));
    // Terms are escaped, so only pathological sizes can fail to compile.
    Regex::new(&source).ok()
}

/// Whole-word form of a term: spaces match any whitespace, a plural suffix is
/// tolerated and `-ing` keywords also match their bare stem.
fn term_pattern(term: &str) -> String {
    let lowered = term.to_lowercase();
    if lowered.len() > 5 && lowered.ends_with("ing") {
        let stem = &lowered[..lowered.len() - 3];
        return format!("{}(?:ing|ed|s)?", escape_term(stem));
    }
    format!("{}(?:s|es)?", escape_term(&lowered))
}

fn escape_term(term: &str) -> String {
    term.split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyword_matches(text: &str, keyword: &str) -> bool {
        Rule::terms(keyword, &[keyword], 0.0).is_match(text)
    }

    #[test]
    fn terms_match_whole_words_only() {
        let rule = Rule::terms("ai", &["ai"], 10.0);
        assert!(rule.is_match("Local AI is here"));
        assert!(!rule.is_match("check your email"));
    }

    #[test]
    fn ing_keywords_match_their_stem() {
        assert!(keyword_matches("How to self-host your email", "self-hosting"));
        assert!(keyword_matches("my self-hosted stack", "self-hosting"));
        assert!(!keyword_matches("hosting provider", "self-hosting"));
    }

    #[test]
    fn plurals_and_multiword_terms_match() {
        assert!(keyword_matches("Automating backups nightly", "backup"));
        assert!(keyword_matches("Open  source tools", "open source"));
    }

    #[test]
    fn per_term_counts_distinct_matches() {
        let set = RuleSet::per_term(&["docker", "linux", "vpn"], 8.0);
        let outcome = set.apply("Docker on Linux, docker everywhere");
        assert_eq!(outcome.count(), 2);
        assert!((outcome.delta - 16.0).abs() < 1e-9);
    }

    #[test]
    fn apply_first_uses_highest_tier_only() {
        let set = RuleSet::new(vec![
            Rule::terms("strong", &["what do you think"], 25.0),
            Rule::terms("medium", &["thoughts"], 15.0),
        ]);
        let outcome = set.apply_first("Thoughts? What do you think?");
        assert_eq!(outcome.matched, vec!["strong".to_string()]);
        assert!((outcome.delta - 25.0).abs() < 1e-9);
    }

    #[test]
    fn raw_patterns_are_case_insensitive() {
        let rule = Rule::pattern("why", r"\bhere['’]s\s+why\b", 0.0);
        assert!(rule.is_match("HERE'S WHY it works"));
        assert!(rule.is_match("Here’s why it works"));
        assert!(!rule.is_match("where is why"));
        assert!(!Rule::pattern("broken", "(", 0.0).is_match("("));
    }

    #[test]
    fn empty_terms_never_match() {
        assert!(!keyword_matches("anything", "  "));
        assert!(RuleSet::per_term::<&str>(&[], 1.0).is_empty());
    }
}
