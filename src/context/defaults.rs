//! Built-in audience profile used whenever a guidance document or one of its
//! fields is unavailable.

pub const BASE_KEYWORDS: &[&str] = &[
    "privacy",
    "security",
    "self-hosting",
    "homelab",
    "automation",
    "productivity",
    "ai",
    "tech",
    "business",
    "startup",
    "entrepreneur",
    "open source",
    "decentralized",
    "control",
    "autonomy",
];

pub const DEFAULT_TONE: &str = "knowledgeable, direct, and approachable";

pub const DEFAULT_VALUES: &[&str] = &[
    "digital sovereignty",
    "transparency",
    "practical expertise",
    "privacy by default",
];

pub const DEFAULT_PREFERRED_WORDS: &[&str] = &[
    "control",
    "own",
    "practical",
    "simple",
    "secure",
    "independent",
];

pub const DEFAULT_AVOID_WORDS: &[&str] = &[
    "revolutionary",
    "game-changer",
    "synergy",
    "disrupt",
    "guru",
];

pub const DEFAULT_INTERESTS: &[&str] = &[
    "privacy",
    "security",
    "homelab",
    "self-hosting",
    "automation",
    "productivity",
    "open source",
    "ai",
];

pub const DEFAULT_PAIN_POINTS: &[&str] = &[
    "data privacy concerns with big tech platforms",
    "vendor lock-in and rising subscription costs",
    "complex setup and maintenance of self-hosted services",
    "backups that fail when you need them",
    "time lost to repetitive manual tasks",
    "security gaps in home networks",
];

pub const DEFAULT_GOALS: &[&str] = &[
    "own and control their data",
    "build reliable home infrastructure",
    "automate routine work",
    "grow a sustainable tech business",
];

pub const DEFAULT_PILLARS: &[&str] = &[
    "privacy and security",
    "self-hosting and homelab",
    "automation and productivity",
    "building a tech business",
];

pub const DEFAULT_FORMATS: &[&str] = &[
    "tutorial threads",
    "behind-the-scenes posts",
    "tool comparisons",
    "discussion questions",
];

pub const DEFAULT_POSTING_GUIDELINES: &[&str] = &[
    "post on weekdays between 9-11am and 7-9pm",
    "lead with a concrete takeaway",
    "use 1-2 relevant hashtags",
];

pub const DEFAULT_PRINCIPLES: &[&str] = &[
    "Curiosity Gap",
    "Cognitive Dissonance",
    "Social Proof",
    "Authority",
    "Pain Point Resolution",
    "Narrative Transportation",
];

pub fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
