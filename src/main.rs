mod api;
mod server;

use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use content_intel::analytics::{AccountMetrics, CorpusPost, PerformanceAnalytics};
use content_intel::config::EngineConfig;
use content_intel::insight::{InsightCategory, InsightMetrics};
use content_intel::repurpose::{BlogItem, RepurposingReport};
use content_intel::{format_float, format_number, format_percent, ContentEngine, Platform, ScoreReport};

#[derive(Parser)]
#[command(name = "content-intel", about = "Audience-aware post scoring and content repurposing")]
struct Cli {
    /// Config file (defaults to $CONTENT_INTEL_CONFIG or config/engine.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score a post draft.
    Score(ScoreArgs),
    /// Derive hooks, posts and a posting plan from a long-form item.
    Repurpose(RepurposeArgs),
    /// Repurpose a JSON array of long-form items.
    Batch(BatchArgs),
    /// Aggregate engagement of a JSON corpus of posts.
    Analytics(AnalyticsArgs),
    /// Ask the configured text generator for strategy insights.
    Insights(InsightsArgs),
    /// Write the default config file.
    InitConfig(InitConfigArgs),
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
struct ScoreArgs {
    #[arg(long)]
    text: Option<String>,
    #[arg(long, default_value = "bluesky")]
    platform: String,
    #[arg(long)]
    images: bool,
    #[arg(long)]
    link: bool,
    /// Planned publish time, e.g. 2026-10-20T10:00.
    #[arg(long)]
    at: Option<String>,
    #[arg(long)]
    followers: Option<u64>,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct RepurposeArgs {
    #[arg(long, default_value = "")]
    title: String,
    /// Markdown or text file with the body; stdin when omitted.
    #[arg(long)]
    file: Option<PathBuf>,
    #[arg(long)]
    url: Option<String>,
    #[arg(long)]
    avg_engagement: Option<f64>,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct BatchArgs {
    /// JSON array of `{title, body, url?}` items.
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    avg_engagement: Option<f64>,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct AnalyticsArgs {
    /// JSON array of posts with like/reply/repost counts.
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    followers: Option<u64>,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct InsightsArgs {
    #[arg(long, default_value = "content_strategy")]
    category: String,
    /// Optional corpus to derive metrics from.
    #[arg(long)]
    corpus: Option<PathBuf>,
    #[arg(long)]
    followers: Option<u64>,
}

#[derive(Args, Debug, Clone)]
struct InitConfigArgs {
    #[arg(long, default_value = "config/engine.toml")]
    path: PathBuf,
    #[arg(long)]
    force: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 8787)]
    port: u16,
    #[arg(long, default_value = "dashboard/dist")]
    web_root: String,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();

    if let Command::InitConfig(args) = &cli.command {
        return run_init_config(args);
    }

    let (config, _) = EngineConfig::load(cli.config)?;
    let engine = Arc::new(ContentEngine::from_config(config));

    match cli.command {
        Command::Score(args) => run_score(&engine, args).await,
        Command::Repurpose(args) => run_repurpose(&engine, args).await,
        Command::Batch(args) => run_batch(&engine, args).await,
        Command::Analytics(args) => run_analytics(&engine, args),
        Command::Insights(args) => run_insights(&engine, args).await,
        Command::Serve(args) => server::serve(args, engine).await,
        Command::InitConfig(_) => Ok(()),
    }
}

async fn run_score(engine: &ContentEngine, args: ScoreArgs) -> Result<(), String> {
    let mut options = engine.default_options();
    options.platform = Platform::from_str(&args.platform)
        .ok_or_else(|| format!("invalid platform: {}", args.platform))?;
    options.has_images = args.images;
    options.has_links = args.link;
    if let Some(at) = args.at.as_deref() {
        options.scheduled_at = Some(api::parse_scheduled_at(at)?);
    }
    if let Some(followers) = args.followers {
        options.follower_count = followers;
    }

    let text = read_text(args.text)?;
    let report = engine.score_post(&text, &options).await;

    if args.json {
        return print_json(&report);
    }
    print_score(&report);
    Ok(())
}

fn print_score(report: &ScoreReport) {
    let scores = &report.scores;
    println!(
        "Overall score: {} ({} confidence)",
        format_float(scores.overall, 0),
        report.estimated_performance.confidence.label()
    );
    for (name, value) in scores.sub_scores() {
        println!("  {:<22} {}", name, format_float(value, 0));
    }

    let performance = &report.estimated_performance;
    println!(
        "Estimated engagement: {} (likes {} | replies {} | shares {})",
        format_percent(performance.engagement_rate),
        format_number(performance.expected_likes as f64),
        format_number(performance.expected_replies as f64),
        format_number(performance.expected_shares as f64)
    );
    println!(
        "Length: {} chars on {} (limit {})",
        report.metadata.char_count,
        report.metadata.platform.label(),
        report.metadata.platform.char_limit()
    );
    if report.metadata.default_context {
        println!("Note: no guidance documents found, scored against the built-in profile");
    }

    if !report.recommendations.is_empty() {
        println!("\nRecommendations:");
        for recommendation in &report.recommendations {
            println!(
                "- [{}] {}: {}",
                recommendation.priority.label(),
                recommendation.title,
                recommendation.description
            );
        }
    }
    if !report.improvements.is_empty() {
        println!("\nImprovements:");
        for improvement in &report.improvements {
            println!("- {}", improvement);
        }
    }
}

async fn run_repurpose(engine: &ContentEngine, args: RepurposeArgs) -> Result<(), String> {
    let body = match args.file.as_deref() {
        Some(path) => read_file(path)?,
        None => read_text(None)?,
    };
    let mut item = BlogItem::new(args.title, body);
    item.url = args.url;
    let metrics = metrics_with_average(args.avg_engagement);

    let report = engine
        .analyze_and_repurpose_blog_content(&item, metrics.as_ref())
        .await
        .map_err(|err| err.to_string())?;

    if args.json {
        return print_json(&report);
    }
    print_repurpose(&report);
    Ok(())
}

fn print_repurpose(report: &RepurposingReport) {
    let analysis = &report.analysis;
    println!(
        "{} words, ~{} min read, audience alignment {}",
        format_number(analysis.word_count as f64),
        analysis.reading_time_minutes,
        format_float(analysis.audience_alignment_score, 0)
    );
    println!(
        "Predicted Bluesky engagement {} | viral potential {}",
        format_float(report.predictions.bluesky_engagement, 0),
        format_float(report.predictions.viral_potential, 0)
    );

    println!("\nHooks:");
    for hook in &report.suggestions.hooks {
        println!("- ({}) {}", hook.principle, hook.text);
    }

    println!("\nOpportunities:");
    for opportunity in &report.suggestions.opportunities {
        let posts = opportunity
            .estimated_posts
            .map(|posts| format!(" [{} posts]", posts))
            .unwrap_or_default();
        println!(
            "- [{}] {}{}",
            opportunity.priority.label(),
            opportunity.description,
            posts
        );
    }

    println!("\nPosts:");
    for post in report.suggestions.posts.iter() {
        println!("- {}: {}", post.timing, post.content.replace('\n', " "));
    }

    if !report.suggestions.hashtags.is_empty() {
        println!("\nHashtags: {}", report.suggestions.hashtags.join(" "));
    }
}

async fn run_batch(engine: &ContentEngine, args: BatchArgs) -> Result<(), String> {
    let items: Vec<BlogItem> = read_json(&args.input)?;
    let metrics = metrics_with_average(args.avg_engagement);
    let results = engine.repurpose_corpus(&items, metrics.as_ref()).await;

    if args.json {
        return print_json(&results);
    }
    for result in &results {
        match &result.error {
            Some(error) => println!(
                "{}. {} -> {} (default, {})",
                result.index + 1,
                result.title,
                format_float(result.score, 0),
                error
            ),
            None => println!(
                "{}. {} -> {}",
                result.index + 1,
                result.title,
                format_float(result.score, 0)
            ),
        }
    }
    Ok(())
}

fn run_analytics(engine: &ContentEngine, args: AnalyticsArgs) -> Result<(), String> {
    let corpus: Vec<CorpusPost> = read_json(&args.input)?;
    let metrics = args.followers.map(|followers_count| AccountMetrics {
        followers_count,
        ..AccountMetrics::default()
    });
    let analytics = engine.get_performance_analytics(&corpus, metrics.as_ref());

    if args.json {
        return print_json(&analytics);
    }
    print_analytics(&analytics);
    Ok(())
}

fn print_analytics(analytics: &PerformanceAnalytics) {
    let summary = &analytics.summary;
    println!(
        "{} posts, {} total engagement, {} avg per post (rate {})",
        format_number(summary.total_posts as f64),
        format_number(summary.total_engagement as f64),
        format_float(summary.avg_engagement, 1),
        format_float(summary.avg_rate, 1)
    );
    if let Some(per_follower) = summary.engagement_per_follower {
        println!("Engagement per follower: {}%", format_float(per_follower, 2));
    }

    println!("\nBy format:");
    for entry in &analytics.engagement_by_format {
        println!(
            "  {:<10} {:>4} posts  avg {}  rate {}",
            entry.format,
            entry.count,
            format_float(entry.avg_engagement, 1),
            format_float(entry.rate, 1)
        );
    }

    println!("\nBy topic:");
    for entry in &analytics.engagement_by_topic {
        println!(
            "  {:<20} {:>4} posts  avg {}  rate {}",
            entry.topic,
            entry.count,
            format_float(entry.avg_engagement, 1),
            format_float(entry.rate, 1)
        );
    }

    let insights = &analytics.ai_topic_insights;
    println!(
        "\nOn-target posts: {}%",
        format_float(insights.on_target_percentage, 0)
    );
    for recommendation in &insights.recommendations {
        println!("- {}", recommendation);
    }
    if !insights.similar_topics.is_empty() {
        println!("\nTopics to try:");
        for topic in &insights.similar_topics {
            println!(
                "- {} (est. rate {})",
                topic.topic,
                format_float(topic.estimated_rate, 1)
            );
        }
    }
}

async fn run_insights(engine: &ContentEngine, args: InsightsArgs) -> Result<(), String> {
    let category = InsightCategory::from_str(&args.category)
        .ok_or_else(|| format!("invalid insight category: {}", args.category))?;
    if !engine.insights_available() {
        return Err("insights unavailable: set AI_PROVIDER and AI_API_KEY".to_string());
    }

    let account = args.followers.map(|followers_count| AccountMetrics {
        followers_count,
        ..AccountMetrics::default()
    });
    let metrics = match args.corpus.as_deref() {
        Some(path) => {
            let corpus: Vec<CorpusPost> = read_json(path)?;
            let analytics = engine.get_performance_analytics(&corpus, account.as_ref());
            InsightMetrics::from_analytics(&analytics, account.as_ref())
        }
        None => InsightMetrics {
            followers_count: account.map(|account| account.followers_count),
            ..InsightMetrics::default()
        },
    };

    let insight = engine
        .generate_insights(category, &metrics)
        .await
        .ok_or_else(|| "insight generation failed".to_string())?;
    println!("{}\n\n{}", category.label(), insight);
    Ok(())
}

fn run_init_config(args: &InitConfigArgs) -> Result<(), String> {
    if args.path.exists() && !args.force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            args.path.display()
        ));
    }
    EngineConfig::default().write(&args.path)?;
    println!("Wrote {}", args.path.display());
    Ok(())
}

fn metrics_with_average(avg_engagement: Option<f64>) -> Option<AccountMetrics> {
    avg_engagement.map(|avg| AccountMetrics {
        avg_engagement: Some(avg),
        ..AccountMetrics::default()
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| format!("failed to serialize output: {}", err))?;
    println!("{}", payload);
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let contents = read_file(path)?;
    serde_json::from_str(&contents)
        .map_err(|err| format!("failed to parse {}: {}", path.display(), err))
}

fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path)
        .map_err(|err| format!("failed to read {}: {}", path.display(), err))
}

fn read_text(arg: Option<String>) -> Result<String, String> {
    if let Some(text) = arg {
        if !text.trim().is_empty() {
            return Ok(text);
        }
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|err| format!("failed reading stdin: {}", err))?;
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Err("missing text: pass --text or pipe stdin".to_string());
    }
    Ok(trimmed.to_string())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
