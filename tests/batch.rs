use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use content_intel::repurpose::{BatchSettings, HookKind};
use content_intel::{AudienceContext, BlogItem, ContentScorer, RepurposingEngine, TextGenerator};

const REFINED: &str = "The homelab habit nobody talks about";

/// Answers instantly unless the instruction mentions a slow title.
struct ScriptedGenerator {
    calls: AtomicUsize,
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, _context: &str, instruction: &str) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if instruction.contains("slow") {
            tokio::time::sleep(Duration::from_secs(10)).await;
        }
        Some(format!("\"{}\"", REFINED))
    }
}

fn engine(generator: Arc<ScriptedGenerator>) -> RepurposingEngine {
    RepurposingEngine::new(ContentScorer::default()).with_generator(Some(generator))
}

fn items(titles: &[&str]) -> Vec<BlogItem> {
    titles
        .iter()
        .map(|title| {
            BlogItem::new(
                *title,
                "I keep all my homelab backups on a small NAS and test restores monthly. ".repeat(20),
            )
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn slow_item_degrades_without_blocking_siblings() {
    let generator = Arc::new(ScriptedGenerator {
        calls: AtomicUsize::new(0),
    });
    let engine = engine(generator.clone());
    let context = AudienceContext::default();
    let corpus = items(&["one", "two", "a slow one", "four", "five"]);

    let started = Instant::now();
    let results = engine
        .repurpose_corpus(&corpus, None, &context, &BatchSettings::default())
        .await;
    let elapsed = started.elapsed();

    assert_eq!(results.len(), 5);
    for (index, result) in results.iter().enumerate() {
        assert_eq!(result.index, index);
        assert_eq!(result.title, corpus[index].title);
    }

    let slow = &results[2];
    assert!(!slow.is_ok());
    assert!(slow.report.is_none());
    assert_eq!(slow.score, 75.0);
    assert!(slow.error.as_deref().unwrap_or_default().contains("timed out"));

    for result in results.iter().filter(|result| result.index != 2) {
        assert!(result.is_ok(), "item {} failed: {:?}", result.index, result.error);
        let report = result.report.as_ref().expect("report");
        assert_eq!(result.score, report.analysis.audience_alignment_score);
        let curiosity = report
            .suggestions
            .hooks
            .iter()
            .find(|hook| hook.kind == HookKind::Curiosity)
            .expect("curiosity hook");
        assert_eq!(curiosity.text, REFINED);
    }

    assert_eq!(generator.calls.load(Ordering::SeqCst), 5);
    // Bounded by the slow item's deadline, not by its ten second sleep.
    assert!(elapsed >= Duration::from_secs(3));
    assert!(elapsed < Duration::from_millis(3_500));
}

#[tokio::test(start_paused = true)]
async fn slots_cool_down_between_items() {
    let engine = RepurposingEngine::new(ContentScorer::default());
    let context = AudienceContext::default();
    let corpus = items(&["one", "two", "three"]);
    let settings = BatchSettings {
        size: 1,
        ..BatchSettings::default()
    };

    let started = Instant::now();
    let results = engine.repurpose_corpus(&corpus, None, &context, &settings).await;

    assert!(results.iter().all(|result| result.is_ok()));
    // Two hand-overs of the single slot, no pause after the last item.
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(1_000));
    assert!(elapsed < Duration::from_millis(1_500));
}

#[tokio::test(start_paused = true)]
async fn batch_wider_than_corpus_does_not_pause() {
    let engine = RepurposingEngine::new(ContentScorer::default());
    let context = AudienceContext::default();
    let corpus = items(&["one", "two"]);

    let started = Instant::now();
    let results = engine
        .repurpose_corpus(&corpus, None, &context, &BatchSettings::default())
        .await;

    assert_eq!(results.len(), 2);
    assert!(started.elapsed() < Duration::from_millis(1));
}

#[tokio::test]
async fn empty_item_gets_default_score() {
    let engine = RepurposingEngine::new(ContentScorer::default());
    let context = AudienceContext::default();
    let mut corpus = items(&["one"]);
    corpus.push(BlogItem::new("blank", ""));
    let settings = BatchSettings {
        default_score: 60.0,
        pacing_ms: 0,
        ..BatchSettings::default()
    };

    let results = engine.repurpose_corpus(&corpus, None, &context, &settings).await;

    assert!(results[0].is_ok());
    assert_eq!(results[1].score, 60.0);
    assert!(results[1].error.as_deref().unwrap_or_default().contains("empty"));
}

#[tokio::test]
async fn empty_corpus_returns_nothing() {
    let engine = RepurposingEngine::new(ContentScorer::default());
    let context = AudienceContext::default();
    let results = engine
        .repurpose_corpus(&[], None, &context, &BatchSettings::default())
        .await;
    assert!(results.is_empty());
}
