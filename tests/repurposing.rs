use content_intel::analytics::AccountMetrics;
use content_intel::repurpose::{HookKind, OpportunityKind, PostKind};
use content_intel::{
    analyze_and_repurpose_blog_content, AudienceContext, BlogItem, ContentScorer, EngineError,
    RepurposingEngine,
};
use content_intel::Platform;

fn article(sentence: &str, times: usize) -> BlogItem {
    BlogItem::new("Homelab backup notes", sentence.repeat(times))
}

#[tokio::test]
async fn long_kubernetes_article_becomes_a_thread_series() {
    let context = AudienceContext::default();
    let item = BlogItem::new(
        "Predictable homelab backups",
        "Kubernetes makes homelab backups predictable when every volume has a snapshot policy. "
            .repeat(100),
    );
    assert_eq!(item.word_count(), 1200);

    let report = analyze_and_repurpose_blog_content(&item, None, &context)
        .await
        .expect("report");

    let series = report
        .suggestions
        .opportunities
        .iter()
        .find(|opportunity| opportunity.kind == OpportunityKind::ThreadSeries)
        .expect("thread series");
    assert_eq!(series.estimated_posts, Some(6));
    assert_eq!(series.timeline.as_deref(), Some("3-5 days"));

    assert!(report
        .suggestions
        .hooks
        .iter()
        .any(|hook| hook.principle == "Pain Point Resolution"));
    assert!(!report.suggestions.hashtags.is_empty());
    assert!(report.suggestions.hashtags.len() <= 4);
    assert_eq!(report.analysis.word_count, 1200);
    assert_eq!(report.analysis.reading_time_minutes, 6);
}

#[tokio::test]
async fn thread_series_size_follows_word_count() {
    let context = AudienceContext::default();
    let item = article("I keep all my homelab backups on a small NAS. ", 100);
    assert_eq!(item.word_count(), 1000);

    let report = analyze_and_repurpose_blog_content(&item, None, &context)
        .await
        .expect("report");
    let series = report
        .suggestions
        .opportunities
        .iter()
        .find(|opportunity| opportunity.kind == OpportunityKind::ThreadSeries)
        .expect("thread series");
    assert_eq!(series.estimated_posts, Some(5));
}

#[tokio::test]
async fn short_article_has_no_thread_series() {
    let context = AudienceContext::default();
    let item = article("I keep all my homelab backups on a small NAS. ", 40);

    let report = analyze_and_repurpose_blog_content(&item, None, &context)
        .await
        .expect("report");
    let kinds: Vec<OpportunityKind> = report
        .suggestions
        .opportunities
        .iter()
        .map(|opportunity| opportunity.kind)
        .collect();
    assert!(!kinds.contains(&OpportunityKind::ThreadSeries));
    assert!(kinds.contains(&OpportunityKind::BehindScenes));
}

#[tokio::test]
async fn tutorial_and_controversy_opportunities() {
    let context = AudienceContext::default();
    let item = BlogItem::new(
        "How to set up Proxmox",
        "This guide shows how to install Proxmox on old hardware. \
         The common myth that you need a rack server is wrong. \
         The key lesson I learned is that a used mini PC handles most workloads.",
    );

    let report = analyze_and_repurpose_blog_content(&item, None, &context)
        .await
        .expect("report");
    let opportunities = &report.suggestions.opportunities;

    let tutorial = opportunities
        .iter()
        .find(|opportunity| opportunity.kind == OpportunityKind::TutorialBreakdown)
        .expect("tutorial breakdown");
    assert!((3..=5).contains(&tutorial.estimated_posts.unwrap_or_default()));

    assert!(opportunities
        .iter()
        .any(|opportunity| opportunity.kind == OpportunityKind::DiscussionStarter));
    assert!(report.suggestions.hashtags.contains(&"#Tutorial".to_string()));
}

#[tokio::test]
async fn empty_body_is_rejected() {
    let context = AudienceContext::default();
    let item = BlogItem::new("Draft", "  \n ");
    let result = analyze_and_repurpose_blog_content(&item, None, &context).await;
    assert!(matches!(result, Err(EngineError::EmptyContent(_))));
}

#[tokio::test]
async fn derived_posts_fit_the_platform() {
    let context = AudienceContext::default();
    let body = "The key lesson from running my homelab for 5 years is that boring hardware wins every time, because it is cheap to replace and well supported. ".repeat(60);
    let item = BlogItem {
        url: Some("https://example.com/homelab-lessons".to_string()),
        ..BlogItem::new("Five years of homelab lessons", body)
    };

    for platform in [Platform::X, Platform::Bluesky] {
        let engine = RepurposingEngine::new(ContentScorer::default()).with_platform(platform);
        let report = engine.analyze(&item, None, &context).await.expect("report");
        let posts = &report.suggestions.posts;
        let limit = platform.char_limit();

        assert!(!posts.is_empty());
        for post in posts.iter() {
            assert!(post.content.chars().count() <= limit, "{:?} too long", post.kind);
            assert!((0.0..=100.0).contains(&post.expected_engagement));
            for segment in &post.segments {
                assert!(segment.chars().count() <= limit);
            }
        }
        assert_eq!(posts.immediate[0].kind, PostKind::Announcement);
        assert!(posts.immediate[0].content.contains("https://example.com/homelab-lessons"));
        assert!(posts.follow_up.iter().any(|post| post.kind == PostKind::Thread));
        assert_eq!(posts.long_term[0].kind, PostKind::EvergreenTip);
    }
}

#[tokio::test]
async fn strategy_and_hooks_are_complete() {
    let context = AudienceContext::default();
    let item = article("After 3 years of self-hosting, my backups finally work. ", 20);

    let report = analyze_and_repurpose_blog_content(&item, None, &context)
        .await
        .expect("report");

    let stages: Vec<&str> = report
        .strategy
        .timeline
        .iter()
        .map(|stage| stage.stage.as_str())
        .collect();
    assert_eq!(stages, vec!["Immediate", "Day 1", "Day 3", "Day 5", "Ongoing"]);

    let platforms: Vec<Platform> = report
        .strategy
        .cross_platform
        .iter()
        .map(|fit| fit.platform)
        .collect();
    assert_eq!(platforms, vec![Platform::Bluesky, Platform::X, Platform::LinkedIn]);

    let hooks = &report.suggestions.hooks;
    assert!(hooks.len() <= 5);
    for pair in hooks.windows(2) {
        assert!(pair[0].expected_engagement >= pair[1].expected_engagement);
    }
    let authority = hooks
        .iter()
        .find(|hook| hook.kind == HookKind::Authority)
        .expect("authority hook");
    assert!(authority.text.contains("3 years"));
}

#[tokio::test]
async fn engagement_history_lifts_predictions() {
    let context = AudienceContext::default();
    let item = article("I keep all my homelab backups on a small NAS. ", 30);

    let cold = analyze_and_repurpose_blog_content(&item, None, &context)
        .await
        .expect("report");
    let metrics = AccountMetrics {
        avg_engagement: Some(25.0),
        ..AccountMetrics::default()
    };
    let warm = analyze_and_repurpose_blog_content(&item, Some(&metrics), &context)
        .await
        .expect("report");

    assert!(warm.predictions.bluesky_engagement > cold.predictions.bluesky_engagement);
    assert!(warm.predictions.bluesky_engagement <= 100.0);
    assert_eq!(warm.predictions.viral_potential, cold.predictions.viral_potential);
}

#[tokio::test]
async fn every_insight_gets_a_follow_up_post() {
    let context = AudienceContext::default();
    let item = BlogItem::new(
        "What running a homelab taught me",
        "The key to a quiet homelab is choosing fanless mini PCs. \
         It is important to understand that snapshots are not backups. \
         What matters most is restoring from backups every single month. \
         The biggest mistake is trusting one disk with all your photos. \
         The truth is that most services never need a full cluster.",
    );

    let report = analyze_and_repurpose_blog_content(&item, None, &context)
        .await
        .expect("report");
    assert_eq!(report.analysis.key_insights.len(), 5);

    let insight_posts: Vec<_> = report
        .suggestions
        .posts
        .follow_up
        .iter()
        .filter(|post| post.kind == PostKind::Insight)
        .collect();
    assert_eq!(insight_posts.len(), report.analysis.key_insights.len());
    assert_eq!(insight_posts[4].timing, "Day 5");
}
