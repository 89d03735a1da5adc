//! Command-line interface definitions for Chronix News.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! API keys can be provided via flags or environment variables; everything
//! else can also come from the YAML settings file (see [`crate::config`]),
//! with flags taking precedence.

use crate::config::Settings;
use crate::models::{Category, Selection, Sentiment};
use crate::providers::ProviderKind;
use crate::sentiment::MatchMode;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the Chronix News application.
///
/// # Examples
///
/// ```sh
/// # Fetch once into the default snapshot file
/// chronix_news refresh
///
/// # Poll GNews every 10 minutes
/// chronix_news watch --provider gnews --interval-minutes 10
///
/// # Negative finance stories mentioning "bank"
/// chronix_news query --category finance --sentiment negative -q bank
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML settings file
    #[arg(short, long, global = true, env = "CHRONIX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Snapshot file to write (refresh/watch) or read (query)
    #[arg(short, long, global = true)]
    pub data_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch every category once and write the snapshot
    Refresh(FetchArgs),

    /// Refresh on a timer until interrupted
    Watch(FetchArgs),

    /// Filter the articles in the snapshot and print them as JSON
    Query(QueryArgs),

    /// Print the sentiment label for a piece of text
    Classify {
        /// Text to score; multiple words are joined with spaces
        #[arg(required = true)]
        text: Vec<String>,

        /// Only count keywords that appear as whole words
        #[arg(long)]
        word_boundary: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Upstream news API
    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    /// NewsAPI key
    #[arg(long, env = "NEWS_API_KEY", default_value = "demo", hide_env_values = true)]
    pub news_api_key: String,

    /// GNews API token
    #[arg(long, env = "GNEWS_API_KEY", default_value = "demo", hide_env_values = true)]
    pub gnews_api_key: String,

    /// Comma-separated categories to fetch
    #[arg(long, value_delimiter = ',')]
    pub categories: Vec<Category>,

    /// Minutes between refreshes (watch only)
    #[arg(long)]
    pub interval_minutes: Option<u64>,

    /// Only count sentiment keywords that appear as whole words
    #[arg(long)]
    pub word_boundary: bool,
}

impl FetchArgs {
    /// Overlay the flags that were given onto `settings`.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(provider) = self.provider {
            settings.provider = provider;
        }
        if !self.categories.is_empty() {
            settings.categories = self.categories.clone();
        }
        if let Some(minutes) = self.interval_minutes {
            settings.interval_minutes = minutes;
        }
        if self.word_boundary {
            settings.sentiment_match = MatchMode::WordBoundary;
        }
    }

    /// The key for the selected provider.
    pub fn api_key(&self, provider: ProviderKind) -> &str {
        match provider {
            ProviderKind::Newsapi => &self.news_api_key,
            ProviderKind::Gnews => &self.gnews_api_key,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Category to keep, or `all`
    #[arg(long, default_value = "all")]
    pub category: Selection<Category>,

    /// Sentiment to keep, or `all`
    #[arg(long, default_value = "all")]
    pub sentiment: Selection<Sentiment>,

    /// Case-insensitive text to look for in titles and descriptions
    #[arg(short = 'q', long, default_value = "")]
    pub search: String,
}
