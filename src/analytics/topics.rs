//! Ordered topic taxonomy. Classification is first-match-wins, so the order of
//! the groups is part of the behaviour.

use once_cell::sync::Lazy;

use crate::scoring::{Rule, RuleSet};

pub const OTHER_TOPIC: &str = "Other";
pub const PERSONAL_TOPIC: &str = "Personal";

pub struct TopicGroup {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

pub const PRIMARY_TOPICS: &[TopicGroup] = &[
    TopicGroup {
        name: "AI & Tech",
        keywords: &[
            "ai",
            "artificial intelligence",
            "machine learning",
            "llm",
            "gpt",
            "chatgpt",
            "claude",
            "tech",
            "software",
            "programming",
            "code",
            "developer",
        ],
    },
    TopicGroup {
        name: "Home Lab",
        keywords: &[
            "homelab",
            "home lab",
            "server",
            "self-hosting",
            "self-hosted",
            "docker",
            "proxmox",
            "nas",
            "raspberry pi",
            "kubernetes",
        ],
    },
    TopicGroup {
        name: "Privacy & Security",
        keywords: &[
            "privacy",
            "security",
            "encryption",
            "vpn",
            "surveillance",
            "data protection",
            "password",
            "breach",
            "tracking",
        ],
    },
    TopicGroup {
        name: "Small Business",
        keywords: &[
            "business",
            "startup",
            "entrepreneur",
            "small business",
            "customer",
            "revenue",
            "marketing",
            "freelance",
            "client",
        ],
    },
    TopicGroup {
        name: PERSONAL_TOPIC,
        keywords: &[
            "personal",
            "my journey",
            "life",
            "family",
            "weekend",
            "grateful",
            "behind the scenes",
            "lesson learned",
        ],
    },
];

pub const SECONDARY_TOPICS: &[TopicGroup] = &[
    TopicGroup {
        name: "Politics/News",
        keywords: &[
            "politics",
            "election",
            "government",
            "news",
            "policy",
            "congress",
            "senate",
        ],
    },
    TopicGroup {
        name: "Sports/Gaming",
        keywords: &[
            "sports",
            "game",
            "gaming",
            "football",
            "nba",
            "esports",
            "match",
            "playoffs",
        ],
    },
    TopicGroup {
        name: "Food/Lifestyle",
        keywords: &[
            "food",
            "recipe",
            "coffee",
            "restaurant",
            "cooking",
            "travel",
            "dinner",
        ],
    },
];

static PRIMARY_RULES: Lazy<Vec<(&'static str, RuleSet)>> = Lazy::new(|| compile(PRIMARY_TOPICS));
static SECONDARY_RULES: Lazy<Vec<(&'static str, RuleSet)>> =
    Lazy::new(|| compile(SECONDARY_TOPICS));

fn compile(groups: &[TopicGroup]) -> Vec<(&'static str, RuleSet)> {
    groups
        .iter()
        .map(|group| {
            (
                group.name,
                RuleSet::new(vec![Rule::terms(group.name, group.keywords, 0.0)]),
            )
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicMatch {
    pub topic: &'static str,
    pub on_target: bool,
}

pub fn classify_topic(text: &str) -> TopicMatch {
    if let Some((topic, _)) = PRIMARY_RULES.iter().find(|(_, rules)| rules.any_match(text)) {
        return TopicMatch {
            topic,
            on_target: true,
        };
    }
    let topic = SECONDARY_RULES
        .iter()
        .find(|(_, rules)| rules.any_match(text))
        .map(|(topic, _)| *topic)
        .unwrap_or(OTHER_TOPIC);
    TopicMatch {
        topic,
        on_target: false,
    }
}

pub struct CatalogueEntry {
    pub based_on: &'static str,
    pub topic: &'static str,
    pub rate: f64,
}

pub const SIMILAR_TOPIC_CATALOGUE: &[CatalogueEntry] = &[
    CatalogueEntry { based_on: "AI & Tech", topic: "Running local LLMs on consumer hardware", rate: 8.5 },
    CatalogueEntry { based_on: "AI & Tech", topic: "AI tools that actually save small teams time", rate: 7.2 },
    CatalogueEntry { based_on: "AI & Tech", topic: "Prompt workflows for everyday automation", rate: 6.8 },
    CatalogueEntry { based_on: "Home Lab", topic: "Budget homelab builds under $300", rate: 9.1 },
    CatalogueEntry { based_on: "Home Lab", topic: "Self-hosted backup strategies that survive disasters", rate: 7.8 },
    CatalogueEntry { based_on: "Home Lab", topic: "Docker Compose stacks for beginners", rate: 7.0 },
    CatalogueEntry { based_on: "Privacy & Security", topic: "De-Googling your digital life step by step", rate: 8.8 },
    CatalogueEntry { based_on: "Privacy & Security", topic: "Hardening your home network", rate: 7.4 },
    CatalogueEntry { based_on: "Privacy & Security", topic: "Password manager showdown", rate: 6.9 },
    CatalogueEntry { based_on: "Small Business", topic: "Bootstrapping a tech side business", rate: 7.1 },
    CatalogueEntry { based_on: "Small Business", topic: "Automating client onboarding", rate: 6.5 },
    CatalogueEntry { based_on: PERSONAL_TOPIC, topic: "Lessons from building in public", rate: 7.6 },
    CatalogueEntry { based_on: PERSONAL_TOPIC, topic: "Weekly behind-the-scenes updates", rate: 6.2 },
];
