use std::sync::Arc;

use tracing::info;

use crate::analytics::{AccountMetrics, CorpusPost, EngagementAnalyzer, PerformanceAnalytics};
use crate::config::EngineConfig;
use crate::context::{AudienceContext, AudienceContextStore, DocumentSource, FsDocumentSource};
use crate::error::Result;
use crate::insight::{build_generator, InsightCategory, InsightEngine, InsightMetrics, TextGenerator};
use crate::repurpose::{BatchItemResult, BlogItem, RepurposingEngine, RepurposingReport};
use crate::scoring::{ContentScorer, ScoreOptions, ScoreReport};

/// Wires the context store, scorer, analyzer, repurposer and insight engine
/// together. Cheap to share behind an `Arc`.
pub struct ContentEngine {
    config: EngineConfig,
    store: AudienceContextStore,
    scorer: ContentScorer,
    analyzer: EngagementAnalyzer,
    repurposer: RepurposingEngine,
    insights: InsightEngine,
}

impl ContentEngine {
    /// Reads guidance documents from `documents.root` and builds the text
    /// generator from `[provider]`.
    pub fn from_config(config: EngineConfig) -> Self {
        let source = Arc::new(FsDocumentSource::new(config.documents.root.clone()));
        let generator = build_generator(&config.provider);
        Self::with_parts(config, source, generator)
    }

    pub fn with_parts(
        config: EngineConfig,
        source: Arc<dyn DocumentSource>,
        generator: Option<Arc<dyn TextGenerator>>,
    ) -> Self {
        let scorer = ContentScorer::new(config.scoring.weights.clone());
        let store = AudienceContextStore::new(source, config.documents.files.clone());
        let repurposer = RepurposingEngine::new(scorer.clone()).with_generator(generator.clone());

        info!(
            documents = %config.documents.root.display(),
            provider = generator.as_ref().map(|g| g.name()).unwrap_or("none"),
            batch_size = config.batch.size,
            "content engine ready"
        );

        Self {
            store,
            scorer,
            analyzer: EngagementAnalyzer,
            repurposer,
            insights: InsightEngine::new(generator),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &AudienceContextStore {
        &self.store
    }

    pub fn insights_available(&self) -> bool {
        self.insights.is_configured()
    }

    pub async fn context(&self) -> Arc<AudienceContext> {
        self.store.load().await
    }

    pub async fn refresh_context(&self) -> Arc<AudienceContext> {
        self.store.refresh().await;
        self.store.load().await
    }

    /// Options default to the configured follower count.
    pub fn default_options(&self) -> ScoreOptions {
        ScoreOptions {
            follower_count: self.config.scoring.follower_count,
            ..ScoreOptions::default()
        }
    }

    pub async fn score_post(&self, text: &str, options: &ScoreOptions) -> ScoreReport {
        let context = self.context().await;
        self.scorer.score_post(text, options, &context)
    }

    pub async fn analyze_and_repurpose_blog_content(
        &self,
        item: &BlogItem,
        metrics: Option<&AccountMetrics>,
    ) -> Result<RepurposingReport> {
        let context = self.context().await;
        self.repurposer.analyze(item, metrics, &context).await
    }

    pub async fn repurpose_corpus(
        &self,
        items: &[BlogItem],
        metrics: Option<&AccountMetrics>,
    ) -> Vec<BatchItemResult> {
        let context = self.context().await;
        self.repurposer
            .repurpose_corpus(items, metrics, &context, &self.config.batch)
            .await
    }

    pub fn get_performance_analytics(
        &self,
        corpus: &[CorpusPost],
        metrics: Option<&AccountMetrics>,
    ) -> PerformanceAnalytics {
        self.analyzer.analyze(corpus, metrics)
    }

    pub async fn generate_insights(
        &self,
        category: InsightCategory,
        metrics: &InsightMetrics,
    ) -> Option<String> {
        let context = self.context().await;
        self.insights.generate(category, &context, metrics).await
    }
}
