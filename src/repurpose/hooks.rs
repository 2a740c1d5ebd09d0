use serde::{Deserialize, Serialize};

use crate::context::AudienceContext;
use crate::scoring::Priority;

use super::extract::{experience_phrase, matched_pain_point, CONTRARIAN_VOCAB};

const MAX_HOOKS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookKind {
    Curiosity,
    Contrarian,
    Authority,
    ProblemSolution,
    StoryTeaser,
}

impl HookKind {
    pub fn principle(self) -> &'static str {
        match self {
            HookKind::Curiosity => "Curiosity Gap",
            HookKind::Contrarian => "Cognitive Dissonance",
            HookKind::Authority => "Social Proof+Authority",
            HookKind::ProblemSolution => "Pain Point Resolution",
            HookKind::StoryTeaser => "Narrative Transportation",
        }
    }

    fn expected_engagement(self) -> f64 {
        match self {
            HookKind::ProblemSolution => 90.0,
            HookKind::Contrarian => 88.0,
            HookKind::Curiosity => 85.0,
            HookKind::StoryTeaser => 78.0,
            HookKind::Authority => 75.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hook {
    pub text: String,
    pub kind: HookKind,
    pub principle: String,
    pub expected_engagement: f64,
    pub audience_alignment: Option<Priority>,
}

impl Hook {
    fn new(kind: HookKind, text: String) -> Self {
        Self {
            text,
            kind,
            principle: kind.principle().to_string(),
            expected_engagement: kind.expected_engagement(),
            audience_alignment: None,
        }
    }
}

/// Builds up to five hooks ranked by expected engagement. `subject` is the
/// short topic phrase the hooks talk about.
pub fn generate_hooks(text: &str, subject: &str, context: &AudienceContext) -> Vec<Hook> {
    let mut hooks = vec![Hook::new(
        HookKind::Curiosity,
        format!("What nobody tells you about {}...", subject),
    )];

    if CONTRARIAN_VOCAB.any_match(text) {
        hooks.push(Hook::new(
            HookKind::Contrarian,
            format!("Everyone says {} is complicated. They're wrong.", subject),
        ));
    }

    let authority = match experience_phrase(text) {
        Some(experience) => format!(
            "After {} with {}, here's what actually matters.",
            experience, subject
        ),
        None => format!(
            "I tested this so you don't have to. Here's what actually works for {}.",
            subject
        ),
    };
    hooks.push(Hook::new(HookKind::Authority, authority));

    if let Some(pain_point) = matched_pain_point(text, context) {
        let mut hook = Hook::new(
            HookKind::ProblemSolution,
            format!(
                "Struggling with {}? Here's how I solved it.",
                pain_point.trim_end_matches('.').to_lowercase()
            ),
        );
        hook.audience_alignment = Some(Priority::High);
        hooks.push(hook);
    }

    hooks.push(Hook::new(
        HookKind::StoryTeaser,
        format!(
            "Last month my {} setup broke. What happened next changed how I work.",
            subject
        ),
    ));

    rank_hooks(&mut hooks);
    hooks.truncate(MAX_HOOKS);
    hooks
}

pub fn rank_hooks(hooks: &mut [Hook]) {
    hooks.sort_by(|a, b| b.expected_engagement.total_cmp(&a.expected_engagement));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pain_point_hook_ranks_first() {
        let context = AudienceContext::default();
        let hooks = generate_hooks("My backups kept failing every week", "homelab", &context);
        assert_eq!(hooks[0].kind, HookKind::ProblemSolution);
        assert_eq!(hooks[0].principle, "Pain Point Resolution");
        assert_eq!(hooks[0].audience_alignment, Some(Priority::High));
    }

    #[test]
    fn contrarian_needs_trigger_words() {
        let context = AudienceContext::default();
        let plain = generate_hooks("A calm post", "docker", &context);
        assert!(plain.iter().all(|hook| hook.kind != HookKind::Contrarian));

        let loud = generate_hooks("Most people overthink docker", "docker", &context);
        assert!(loud.iter().any(|hook| hook.principle == "Cognitive Dissonance"));
    }
}
