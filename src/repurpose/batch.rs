//! Corpus-level repurposing with bounded concurrency.
//!
//! At most `size` items run at once. A slot cools down for `pacing` before it
//! is handed to the next waiting item, which keeps bursts against a remote
//! text generator small. Every item runs under its own deadline and a late or
//! failing item degrades to `default_score` without touching its siblings.

use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::time::{sleep, timeout};
use tracing::{info, warn};

use crate::analytics::AccountMetrics;
use crate::context::AudienceContext;
use crate::error::EngineError;

use super::{BlogItem, RepurposingEngine, RepurposingReport};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    pub size: usize,
    pub pacing_ms: u64,
    pub item_timeout_ms: u64,
    pub default_score: f64,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            size: 3,
            pacing_ms: 500,
            item_timeout_ms: 3_000,
            default_score: 75.0,
        }
    }
}

impl BatchSettings {
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    pub fn item_timeout(&self) -> Duration {
        Duration::from_millis(self.item_timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItemResult {
    pub index: usize,
    pub title: String,
    pub score: f64,
    pub report: Option<RepurposingReport>,
    pub error: Option<String>,
}

impl BatchItemResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

impl RepurposingEngine {
    /// Results come back in input order, one per item.
    pub async fn repurpose_corpus(
        &self,
        items: &[BlogItem],
        metrics: Option<&AccountMetrics>,
        context: &AudienceContext,
        settings: &BatchSettings,
    ) -> Vec<BatchItemResult> {
        let size = settings.size.max(1);
        let semaphore = Semaphore::new(size);
        let total = items.len();

        let tasks = items.iter().enumerate().map(|(index, item)| {
            let semaphore = &semaphore;
            async move {
                let permit = semaphore.acquire().await;
                let result = self.repurpose_item(index, item, metrics, context, settings).await;
                // Only pace when another item is still waiting for this slot.
                if index + size < total {
                    sleep(settings.pacing()).await;
                }
                drop(permit);
                result
            }
        });

        let results = join_all(tasks).await;
        let failed = results.iter().filter(|result| !result.is_ok()).count();
        info!(items = total, failed, batch_size = size, "corpus repurposed");
        results
    }

    async fn repurpose_item(
        &self,
        index: usize,
        item: &BlogItem,
        metrics: Option<&AccountMetrics>,
        context: &AudienceContext,
        settings: &BatchSettings,
    ) -> BatchItemResult {
        let outcome = match timeout(settings.item_timeout(), self.analyze(item, metrics, context)).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::Timeout(settings.item_timeout_ms)),
        };

        match outcome {
            Ok(report) => BatchItemResult {
                index,
                title: item.title.clone(),
                score: report.analysis.audience_alignment_score,
                report: Some(report),
                error: None,
            },
            Err(err) => {
                warn!(index, title = %item.title, error = %err, "item degraded to default score");
                BatchItemResult {
                    index,
                    title: item.title.clone(),
                    score: settings.default_score,
                    report: None,
                    error: Some(err.to_string()),
                }
            }
        }
    }
}
