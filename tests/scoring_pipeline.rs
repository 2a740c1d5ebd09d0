use chrono::{NaiveDate, NaiveDateTime};
use content_intel::scoring::{scorer, ScoreWeights};
use content_intel::{score_post, AudienceContext, ContentScorer, Platform, ScoreOptions};

fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .expect("valid date")
}

fn options(platform: Platform, scheduled_at: Option<NaiveDateTime>) -> ScoreOptions {
    ScoreOptions {
        platform,
        scheduled_at,
        ..ScoreOptions::default()
    }
}

#[test]
fn every_score_stays_in_bounds() {
    let context = AudienceContext::default();
    let long = "privacy homelab self-hosting automation ai docker linux server vpn! ".repeat(40);
    let inputs = [
        "",
        "   ",
        "?",
        "#a #b #c #d #e #f #g",
        "Buy now! Huge sale, discount everything, buy buy buy",
        "🦀🦀🦀 ünïcödé tëxt with no punctuation at all and it just keeps going on and on without any break whatsoever so the readability penalty kicks in hard here",
        long.as_str(),
    ];

    for text in inputs {
        for platform in [Platform::Bluesky, Platform::X, Platform::LinkedIn] {
            let report = score_post(text, &options(platform, Some(at(2026, 10, 24, 3))), &context);
            for (name, value) in report.scores.sub_scores() {
                assert!((0.0..=100.0).contains(&value), "{} out of range: {}", name, value);
            }
            assert!((0.0..=100.0).contains(&report.scores.overall));
        }
    }
}

#[test]
fn scoring_is_deterministic() {
    let context = AudienceContext::default();
    let text = "What's your backup strategy for the homelab? Share your setup below.";
    let options = options(Platform::Bluesky, Some(at(2026, 10, 20, 19)));

    let first = score_post(text, &options, &context);
    let second = score_post(text, &options, &context);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).expect("serialize"),
        serde_json::to_string(&second).expect("serialize")
    );
    assert_eq!(first.metadata.content_hash, second.metadata.content_hash);
}

#[test]
fn default_weights_sum_to_one() {
    let weights = ScoreWeights::default();
    assert!((weights.total() - 1.0).abs() < 1e-9);
    assert!(weights.is_normalized());
}

#[test]
fn invalid_weights_fall_back_to_defaults() {
    let weights = ScoreWeights {
        content_alignment: 0.9,
        ..ScoreWeights::default()
    };
    let scorer = ContentScorer::new(weights);
    assert_eq!(scorer.weights(), &ScoreWeights::default());
}

#[test]
fn overall_matches_weighted_sum() {
    let context = AudienceContext::default();
    let report = score_post(
        "How to automate your homelab backups with a simple script. Thoughts?",
        &options(Platform::Bluesky, Some(at(2026, 10, 20, 10))),
        &context,
    );
    let weights = ScoreWeights::default();
    let scores = &report.scores;
    let expected = scores.content_alignment * weights.content_alignment
        + scores.audience_relevance * weights.audience_relevance
        + scores.engagement_potential * weights.engagement_potential
        + scores.timing_optimization * weights.timing_optimization
        + scores.platform_optimization * weights.platform_optimization
        + scores.trend_alignment * weights.trend_alignment
        + scores.call_to_action * weights.call_to_action
        + scores.readability * weights.readability;
    assert_eq!(scores.overall, expected.round());
}

#[test]
fn adding_a_brand_keyword_never_lowers_alignment() {
    let context = AudienceContext::default();
    let base = "Notes from rebuilding my setup this weekend";
    let one = "Notes from rebuilding my privacy setup this weekend";
    let two = "Notes from rebuilding my privacy setup and homelab this weekend";

    let base_score = scorer::content_alignment(base, &context);
    let one_score = scorer::content_alignment(one, &context);
    let two_score = scorer::content_alignment(two, &context);
    assert!(one_score >= base_score);
    assert!(two_score >= one_score);
    assert!(two_score > base_score);
}

#[test]
fn weekday_peak_beats_weekend_night() {
    let context = AudienceContext::default();
    let text = "Self-hosting tip: snapshot before every upgrade.";
    let tuesday = score_post(text, &options(Platform::Bluesky, Some(at(2026, 10, 20, 10))), &context);
    let saturday = score_post(text, &options(Platform::Bluesky, Some(at(2026, 10, 24, 3))), &context);
    assert!(tuesday.scores.timing_optimization > saturday.scores.timing_optimization);
}

#[test]
fn missing_schedule_keeps_neutral_timing() {
    let context = AudienceContext::default();
    let report = score_post("Anything", &options(Platform::Bluesky, None), &context);
    assert_eq!(report.scores.timing_optimization, 50.0);
}

#[test]
fn self_hosting_tutorial_scores_well_on_a_short_platform() {
    let context = AudienceContext::default();
    let text = "How to self-host your email in 10 minutes";
    let report = score_post(text, &options(Platform::Bluesky, Some(at(2026, 10, 20, 10))), &context);

    assert!(report.scores.platform_optimization >= 80.0);
    assert!(report.scores.timing_optimization >= 75.0);

    // "how to" is worth 15 and the self-hosting keyword another 15.
    let without_tutorial = scorer::content_alignment("Self-host your email in 10 minutes", &context);
    let without_keyword = scorer::content_alignment("How to move your email in 10 minutes", &context);
    assert_eq!(report.scores.content_alignment - without_tutorial, 15.0);
    assert_eq!(report.scores.content_alignment - without_keyword, 15.0);
}

#[test]
fn overlong_post_gets_length_penalty_and_recommendation() {
    let context = AudienceContext::default();
    let text = "Self-hosting notes. ".repeat(18);
    assert!(text.chars().count() > 300);

    let report = score_post(&text, &options(Platform::Bluesky, None), &context);
    let fitting = score_post("Self-hosting notes.", &options(Platform::Bluesky, None), &context);

    // 60 - 25 versus 60 + 20.
    assert_eq!(report.scores.platform_optimization, 35.0);
    assert_eq!(fitting.scores.platform_optimization - report.scores.platform_optimization, 45.0);
    assert!(report
        .recommendations
        .iter()
        .any(|recommendation| recommendation.title == "Reduce Length"));
}

#[test]
fn performance_estimate_scales_with_followers() {
    let context = AudienceContext::default();
    let text = "What's the one self-hosted app you couldn't live without? Reply below!";
    let small = score_post(
        text,
        &ScoreOptions {
            follower_count: 100,
            ..ScoreOptions::default()
        },
        &context,
    );
    let large = score_post(
        text,
        &ScoreOptions {
            follower_count: 100_000,
            ..ScoreOptions::default()
        },
        &context,
    );
    assert_eq!(
        small.estimated_performance.engagement_rate,
        large.estimated_performance.engagement_rate
    );
    assert!(large.estimated_performance.expected_likes > small.estimated_performance.expected_likes);
}
