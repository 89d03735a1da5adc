//! Command-line entry point for Chronix News.
//!
//! ## Usage
//!
//! ```sh
//! chronix_news refresh
//! chronix_news watch --interval-minutes 30
//! chronix_news query --sentiment positive -q vaccine
//! ```

use chronix_news::cli::{Cli, Command, FetchArgs, QueryArgs};
use chronix_news::config::Settings;
use chronix_news::filter::FilterState;
use chronix_news::outputs::snapshot::read_snapshot;
use chronix_news::pipeline::Pipeline;
use chronix_news::providers::gnews::GNewsProvider;
use chronix_news::providers::newsapi::NewsApiProvider;
use chronix_news::providers::{NewsProvider, ProviderKind};
use chronix_news::scheduler::{Scheduler, SystemClock};
use chronix_news::sentiment::{MatchMode, SentimentScorer};
use chronix_news::store::ArticleStore;
use chronix_news::utils::ensure_writable_dir;
use clap::Parser;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    debug!(?args.config, ?args.data_file, "Parsed CLI arguments");

    let mut settings = Settings::load(args.config.as_deref()).await?;
    if let Some(ref data_file) = args.data_file {
        settings.data_file = data_file.clone();
    }

    match args.command {
        Command::Refresh(fetch) => {
            fetch.apply(&mut settings);
            run_fetch(&fetch, &settings, false).await?;
        }
        Command::Watch(fetch) => {
            fetch.apply(&mut settings);
            run_fetch(&fetch, &settings, true).await?;
        }
        Command::Query(query) => run_query(&query, &settings.data_file).await?,
        Command::Classify { text, word_boundary } => {
            let mode = if word_boundary {
                MatchMode::WordBoundary
            } else {
                settings.sentiment_match
            };
            let text = text.join(" ");
            let score = SentimentScorer::for_mode(mode).score(&text);
            debug!(positive = score.positive, negative = score.negative, "Scored text");
            println!("{}", score.label());
        }
    }

    let elapsed = start_time.elapsed();
    debug!(?elapsed, "Execution complete");
    Ok(())
}

async fn run_fetch(fetch: &FetchArgs, settings: &Settings, watch: bool) -> Result<(), BoxError> {
    // Early check: ensure the snapshot directory is writable
    if let Some(dir) = settings.data_file.parent().filter(|d| !d.as_os_str().is_empty()) {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir.display(),
                error = %e,
                "Snapshot directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    let api_key = fetch.api_key(settings.provider);
    let key_mode = if api_key == "demo" { "DEMO MODE" } else { "CONFIGURED" };
    info!(
        provider = ?settings.provider,
        api_key = key_mode,
        data_file = %settings.data_file.display(),
        "Chronix news service starting"
    );

    let client = reqwest::Client::builder()
        .user_agent(concat!("chronix_news/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()?;

    match settings.provider {
        ProviderKind::Newsapi => {
            let provider = NewsApiProvider::new(client, api_key, &settings.language, settings.page_size);
            drive(provider, settings, watch).await
        }
        ProviderKind::Gnews => {
            let provider = GNewsProvider::new(client, api_key, &settings.language, settings.page_size);
            drive(provider, settings, watch).await
        }
    }
}

#[instrument(level = "info", skip_all, fields(provider = provider.name(), watch = watch))]
async fn drive<P>(provider: P, settings: &Settings, watch: bool) -> Result<(), BoxError>
where
    P: NewsProvider + Send + Sync + 'static,
{
    let store = Arc::new(ArticleStore::new());
    let pipeline = Pipeline::new(provider, SystemClock, Arc::clone(&store))
        .with_categories(settings.categories.clone())
        .with_match_mode(settings.sentiment_match)
        .with_concurrency(settings.concurrency)
        .with_snapshot_path(&settings.data_file);

    if !watch {
        if let Some(report) = pipeline.refresh().await {
            info!(
                total = report.total,
                positive = report.sentiments.positive,
                neutral = report.sentiments.neutral,
                negative = report.sentiments.negative,
                snapshot_written = report.snapshot_written,
                "Refresh finished"
            );
            if !report.snapshot_written {
                return Err(format!("failed to write {}", settings.data_file.display()).into());
            }
        }
        return Ok(());
    }

    let mut scheduler = Scheduler::new(Arc::new(pipeline));
    scheduler.start(settings.interval())?;
    info!(interval_minutes = settings.interval_minutes, "Auto-refresh running; press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    info!("Shutting down auto-refresh service");
    scheduler.stop().await;

    let held = store.snapshot().await;
    info!(generation = held.generation, articles = held.articles.len(), "Final article set");
    Ok(())
}

#[instrument(level = "info", skip_all, fields(path = %data_file.display()))]
async fn run_query(query: &QueryArgs, data_file: &Path) -> Result<(), BoxError> {
    let snapshot = read_snapshot(data_file).await?;
    let state = FilterState {
        category: query.category,
        sentiment: query.sentiment,
        query: query.search.clone(),
    };
    let matches = state.apply(&snapshot.articles);
    info!(
        total = snapshot.total_articles,
        matched = matches.len(),
        last_updated = %snapshot.last_updated,
        "Filtered snapshot"
    );
    println!("{}", serde_json::to_string_pretty(&matches)?);
    Ok(())
}
