use content_intel::analytics::{AccountMetrics, CorpusPost};
use content_intel::get_performance_analytics;

fn post(text: &str, likes: u64, replies: u64, reposts: u64) -> CorpusPost {
    CorpusPost {
        text: text.to_string(),
        like_count: likes,
        reply_count: replies,
        repost_count: reposts,
        format: None,
        created_at: None,
    }
}

fn tagged(text: &str, format: &str, likes: u64) -> CorpusPost {
    CorpusPost {
        format: Some(format.to_string()),
        ..post(text, likes, 0, 0)
    }
}

#[test]
fn formats_are_grouped_and_ranked() {
    let corpus = vec![
        tagged("One", "Video", 90),
        tagged("Two", "video", 110),
        tagged("Three", "text", 10),
        post("Which backup tool do you trust?", 30, 10, 0),
    ];
    let analytics = get_performance_analytics(&corpus, None);
    let formats = &analytics.engagement_by_format;

    assert_eq!(formats.len(), 3);
    assert_eq!(formats[0].format, "video");
    assert_eq!(formats[0].count, 2);
    assert_eq!(formats[0].avg_engagement, 100.0);
    assert_eq!(formats[0].rate, 10.0);
    assert_eq!(formats[1].format, "question");
    assert_eq!(formats[1].avg_engagement, 40.0);
    assert_eq!(formats[2].format, "text");
    assert_eq!(analytics.summary.best_format.as_deref(), Some("video"));
}

#[test]
fn rate_is_capped_at_fifteen() {
    let corpus = vec![post("Viral post", 900, 200, 400)];
    let analytics = get_performance_analytics(&corpus, None);
    assert_eq!(analytics.engagement_by_format[0].rate, 15.0);
    assert_eq!(analytics.summary.avg_rate, 15.0);
}

#[test]
fn topics_use_first_matching_group() {
    let corpus = vec![
        post("Running a local AI model on my homelab server", 50, 5, 5),
        post("My Proxmox cluster finally works", 20, 2, 2),
        post("Encryption at rest for everything", 10, 0, 0),
        post("Election night thoughts", 1, 0, 0),
        post("Morning coffee", 0, 0, 0),
    ];
    let analytics = get_performance_analytics(&corpus, None);
    let topics: Vec<&str> = analytics
        .engagement_by_topic
        .iter()
        .map(|entry| entry.topic.as_str())
        .collect();

    assert_eq!(
        topics,
        vec!["AI & Tech", "Home Lab", "Privacy & Security", "Politics/News", "Food/Lifestyle"]
    );
    assert!(analytics.engagement_by_topic[0].on_target);
    assert!(!analytics.engagement_by_topic[3].on_target);
    assert_eq!(analytics.ai_topic_insights.on_target_percentage, 60.0);
}

#[test]
fn recommendations_cover_focus_top_topic_and_laggards() {
    let corpus = vec![
        post("New Docker compose stack for the homelab", 80, 10, 10),
        post("Football is back", 1, 0, 0),
        post("Big game tonight", 2, 0, 0),
        post("Grateful for my family this weekend", 30, 5, 5),
    ];
    let analytics = get_performance_analytics(&corpus, None);
    let insights = &analytics.ai_topic_insights;
    let recommendations = insights.recommendations.join("\n");

    assert_eq!(insights.on_target_percentage, 50.0);
    assert_eq!(insights.top_topic.as_deref(), Some("Home Lab"));
    assert!(recommendations.contains("Only 50% of posts cover your core topics"));
    assert!(recommendations.contains("Home Lab is your top-performing topic"));
    assert!(recommendations.contains("Sports/Gaming is underperforming"));
    assert!(recommendations.contains("behind-the-scenes"));
}

#[test]
fn similar_topics_scale_with_corpus_rate() {
    // Average engagement 50 gives a rate of 5, so catalogue rates are unchanged.
    let corpus = vec![
        post("Proxmox backups on a budget", 40, 5, 5),
        post("VPN setup for the family", 40, 5, 5),
    ];
    let analytics = get_performance_analytics(&corpus, None);
    let similar = &analytics.ai_topic_insights.similar_topics;

    assert!((4..=5).contains(&similar.len()));
    assert_eq!(similar[0].based_on, "Home Lab");
    assert_eq!(similar[0].estimated_rate, 9.1);

    // Halving engagement halves every estimate.
    let quieter: Vec<CorpusPost> = corpus
        .iter()
        .map(|entry| post(&entry.text, 20, 2, 3))
        .collect();
    let halved = get_performance_analytics(&quieter, None);
    assert_eq!(halved.ai_topic_insights.similar_topics[0].estimated_rate, 4.55);
}

#[test]
fn summary_uses_account_metrics() {
    let corpus = vec![post("Homelab tour", 40, 5, 5), post("Privacy checklist", 10, 0, 0)];
    let metrics = AccountMetrics {
        followers_count: 1_000,
        ..AccountMetrics::default()
    };
    let analytics = get_performance_analytics(&corpus, Some(&metrics));

    assert_eq!(analytics.summary.total_posts, 2);
    assert_eq!(analytics.summary.total_engagement, 60);
    assert_eq!(analytics.summary.avg_engagement, 30.0);
    let per_follower = analytics.summary.engagement_per_follower.expect("followers supplied");
    assert!((per_follower - 3.0).abs() < 1e-9);
}

#[test]
fn empty_corpus_is_not_an_error() {
    let analytics = get_performance_analytics(&[], None);
    assert!(analytics.engagement_by_format.is_empty());
    assert!(analytics.engagement_by_topic.is_empty());
    assert_eq!(analytics.summary.total_posts, 0);
    assert_eq!(analytics.ai_topic_insights.on_target_percentage, 0.0);
    assert!(analytics.ai_topic_insights.recommendations.is_empty());
}

#[test]
fn corpus_deserializes_from_json() {
    let json = r#"[
        {"text": "1/ Backing up a NAS", "like_count": 12, "reply_count": 3, "repost_count": 1, "created_at": "2026-10-01T09:00:00Z"},
        {"text": "Plain note"}
    ]"#;
    let corpus: Vec<CorpusPost> = serde_json::from_str(json).expect("parse corpus");
    assert_eq!(corpus[0].engagement(), 16);
    assert_eq!(corpus[0].resolved_format(), "thread");
    assert_eq!(corpus[1].engagement(), 0);

    let analytics = get_performance_analytics(&corpus, None);
    assert!(analytics.summary.first_post_at.is_some());
}
