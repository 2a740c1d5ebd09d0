pub mod defaults;
pub mod matchers;
pub mod parser;
pub mod source;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info};

use crate::context::defaults::owned;
use crate::context::matchers::MatcherCache;
use crate::context::parser::{extract_field, extract_list_items, extract_section};

pub use matchers::KeywordMatchers;
pub use source::{DocumentSource, FsDocumentSource, MemoryDocumentSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    BrandVoice,
    CustomerAvatar,
    ContentStrategy,
    MarketingPsychology,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 4] = [
        DocumentKind::BrandVoice,
        DocumentKind::CustomerAvatar,
        DocumentKind::ContentStrategy,
        DocumentKind::MarketingPsychology,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::BrandVoice => "brand-voice",
            DocumentKind::CustomerAvatar => "customer-avatar",
            DocumentKind::ContentStrategy => "content-strategy",
            DocumentKind::MarketingPsychology => "marketing-psychology",
        }
    }
}

/// File names of the guidance documents, relative to the document source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceDocuments {
    pub brand_voice: String,
    pub customer_avatar: String,
    pub content_strategy: String,
    pub marketing_psychology: String,
}

impl Default for GuidanceDocuments {
    fn default() -> Self {
        Self {
            brand_voice: "brand-voice.md".to_string(),
            customer_avatar: "customer-avatar.md".to_string(),
            content_strategy: "content-strategy.md".to_string(),
            marketing_psychology: "marketing-psychology.md".to_string(),
        }
    }
}

impl GuidanceDocuments {
    pub fn path(&self, kind: DocumentKind) -> &str {
        match kind {
            DocumentKind::BrandVoice => &self.brand_voice,
            DocumentKind::CustomerAvatar => &self.customer_avatar,
            DocumentKind::ContentStrategy => &self.content_strategy,
            DocumentKind::MarketingPsychology => &self.marketing_psychology,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandVoice {
    pub tone: String,
    pub values: Vec<String>,
    pub preferred_words: Vec<String>,
    pub avoid_words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerAvatar {
    pub interests: Vec<String>,
    pub pain_points: Vec<String>,
    pub goals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentStrategies {
    pub pillars: Vec<String>,
    pub formats: Vec<String>,
    pub posting_guidelines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsychologyGuidance {
    pub principles: Vec<String>,
}

/// Immutable snapshot of the brand and audience profile shared by every
/// scoring and generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudienceContext {
    pub brand_voice: BrandVoice,
    pub customer_avatar: CustomerAvatar,
    pub content_strategies: ContentStrategies,
    pub psychology: PsychologyGuidance,
    pub target_keywords: Vec<String>,
    /// Documents that were actually loaded; everything else is defaulted.
    pub sources: Vec<DocumentKind>,
    #[serde(skip)]
    matchers: MatcherCache,
}

impl Default for AudienceContext {
    fn default() -> Self {
        AudienceContext::from_documents(None, None, None, None)
    }
}

impl AudienceContext {
    pub fn from_documents(
        brand_voice: Option<&str>,
        customer_avatar: Option<&str>,
        content_strategy: Option<&str>,
        marketing_psychology: Option<&str>,
    ) -> Self {
        let mut sources = Vec::new();
        for (kind, doc) in DocumentKind::ALL.iter().zip([
            brand_voice,
            customer_avatar,
            content_strategy,
            marketing_psychology,
        ]) {
            if doc.is_some() {
                sources.push(*kind);
            }
        }

        let customer_avatar = parse_customer_avatar(customer_avatar.unwrap_or_default());
        let target_keywords = merge_keywords(&customer_avatar.interests);

        Self {
            brand_voice: parse_brand_voice(brand_voice.unwrap_or_default()),
            customer_avatar,
            content_strategies: parse_content_strategies(content_strategy.unwrap_or_default()),
            psychology: parse_psychology(marketing_psychology.unwrap_or_default()),
            target_keywords,
            sources,
            matchers: MatcherCache::default(),
        }
    }

    pub fn interests(&self) -> &[String] {
        &self.customer_avatar.interests
    }

    pub fn pain_points(&self) -> &[String] {
        &self.customer_avatar.pain_points
    }

    pub fn is_default(&self) -> bool {
        self.sources.is_empty()
    }

    /// Whole-word matchers for the keyword lists, compiled on first use.
    /// Edits to the lists after that are not picked up.
    pub fn matchers(&self) -> &KeywordMatchers {
        self.matchers.get_or_build(|| {
            KeywordMatchers::new(&self.target_keywords, self.interests(), self.pain_points())
        })
    }
}

fn parse_brand_voice(text: &str) -> BrandVoice {
    let tone = extract_field(text, &["tone", "voice"])
        .or_else(|| extract_section(text, &["tone"]).into_iter().next())
        .unwrap_or_else(|| {
            debug!(field = "tone", "using default brand tone");
            defaults::DEFAULT_TONE.to_string()
        });

    BrandVoice {
        tone,
        values: or_default(
            "values",
            extract_section(text, &["core values", "values"]),
            defaults::DEFAULT_VALUES,
        ),
        preferred_words: or_default(
            "preferred_words",
            extract_section(text, &["preferred", "words to use", "use these"]),
            defaults::DEFAULT_PREFERRED_WORDS,
        ),
        avoid_words: or_default(
            "avoid_words",
            extract_section(text, &["avoid", "don't use", "never use"]),
            defaults::DEFAULT_AVOID_WORDS,
        ),
    }
}

fn parse_customer_avatar(text: &str) -> CustomerAvatar {
    CustomerAvatar {
        interests: or_default(
            "interests",
            extract_section(text, &["interests", "passions"]),
            defaults::DEFAULT_INTERESTS,
        ),
        pain_points: or_default(
            "pain_points",
            extract_section(text, &["pain points", "pain point", "challenges", "frustrations"]),
            defaults::DEFAULT_PAIN_POINTS,
        ),
        goals: or_default(
            "goals",
            extract_section(text, &["goals", "aspirations", "desires"]),
            defaults::DEFAULT_GOALS,
        ),
    }
}

fn parse_content_strategies(text: &str) -> ContentStrategies {
    ContentStrategies {
        pillars: or_default(
            "pillars",
            extract_section(text, &["pillars", "themes"]),
            defaults::DEFAULT_PILLARS,
        ),
        formats: or_default(
            "formats",
            extract_list_items(
                text,
                &["thread", "tutorial", "video", "guide", "behind", "comparison", "question", "carousel"],
            ),
            defaults::DEFAULT_FORMATS,
        ),
        posting_guidelines: or_default(
            "posting_guidelines",
            extract_section(text, &["posting", "schedule", "frequency"]),
            defaults::DEFAULT_POSTING_GUIDELINES,
        ),
    }
}

fn parse_psychology(text: &str) -> PsychologyGuidance {
    PsychologyGuidance {
        principles: or_default(
            "principles",
            extract_list_items(
                text,
                &[
                    "curiosity",
                    "social proof",
                    "authority",
                    "scarcity",
                    "reciprocity",
                    "pain",
                    "story",
                    "narrative",
                    "dissonance",
                ],
            ),
            defaults::DEFAULT_PRINCIPLES,
        ),
    }
}

fn or_default(field: &'static str, parsed: Vec<String>, fallback: &[&str]) -> Vec<String> {
    if parsed.is_empty() {
        debug!(field, "using default audience field");
        owned(fallback)
    } else {
        parsed
    }
}

fn merge_keywords(interests: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keywords = Vec::new();
    let base = defaults::BASE_KEYWORDS.iter().map(|keyword| keyword.to_string());
    for keyword in base.chain(interests.iter().cloned()) {
        let keyword = keyword.trim().to_string();
        if keyword.is_empty() || !seen.insert(keyword.to_lowercase()) {
            continue;
        }
        keywords.push(keyword);
    }
    keywords
}

/// Loads the audience context once and hands out shared snapshots.
///
/// Concurrent first-time callers wait on the same in-flight fetch; `refresh`
/// swaps in an empty cell so the next `load` fetches again.
pub struct AudienceContextStore {
    source: Arc<dyn DocumentSource>,
    documents: GuidanceDocuments,
    cell: Mutex<Arc<OnceCell<Arc<AudienceContext>>>>,
}

impl AudienceContextStore {
    pub fn new(source: Arc<dyn DocumentSource>, documents: GuidanceDocuments) -> Self {
        Self {
            source,
            documents,
            cell: Mutex::new(Arc::new(OnceCell::new())),
        }
    }

    pub async fn load(&self) -> Arc<AudienceContext> {
        let cell = self.cell.lock().await.clone();
        let context = cell.get_or_init(|| self.fetch_context()).await.clone();
        context
    }

    pub async fn refresh(&self) {
        let mut guard = self.cell.lock().await;
        *guard = Arc::new(OnceCell::new());
        info!("audience context cache cleared");
    }

    pub async fn is_cached(&self) -> bool {
        self.cell.lock().await.initialized()
    }

    async fn fetch_context(&self) -> Arc<AudienceContext> {
        let (brand_voice, customer_avatar, content_strategy, marketing_psychology) = tokio::join!(
            self.fetch(DocumentKind::BrandVoice),
            self.fetch(DocumentKind::CustomerAvatar),
            self.fetch(DocumentKind::ContentStrategy),
            self.fetch(DocumentKind::MarketingPsychology),
        );

        let context = AudienceContext::from_documents(
            brand_voice.as_deref(),
            customer_avatar.as_deref(),
            content_strategy.as_deref(),
            marketing_psychology.as_deref(),
        );
        info!(
            loaded = context.sources.len(),
            keywords = context.target_keywords.len(),
            "audience context loaded"
        );
        Arc::new(context)
    }

    async fn fetch(&self, kind: DocumentKind) -> Option<String> {
        let document = self.source.fetch_document(self.documents.path(kind)).await;
        if document.is_none() {
            debug!(document = kind.label(), "guidance document missing, falling back to defaults");
        }
        document
    }
}
