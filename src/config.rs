//! Optional YAML settings file.
//!
//! Every key is optional; anything left out falls back to the built-in
//! default. Command-line flags override values from the file.
//!
//! ```yaml
//! provider: newsapi
//! categories: [technology, world, health, finance, sports, politics]
//! interval_minutes: 30
//! data_file: data/news-cache.json
//! page_size: 10
//! language: en
//! concurrency: 1
//! sentiment_match: substring
//! ```

use crate::models::Category;
use crate::providers::ProviderKind;
use crate::sentiment::MatchMode;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{info, instrument};

pub const DEFAULT_DATA_FILE: &str = "data/news-cache.json";
pub const DEFAULT_INTERVAL_MINUTES: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub provider: ProviderKind,
    pub categories: Vec<Category>,
    pub interval_minutes: u64,
    pub data_file: PathBuf,
    pub page_size: u32,
    pub language: String,
    pub concurrency: usize,
    pub sentiment_match: MatchMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            categories: Category::FETCHED.to_vec(),
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            page_size: 10,
            language: "en".to_string(),
            concurrency: 1,
            sentiment_match: MatchMode::default(),
        }
    }
}

impl Settings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes * 60)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Load settings from `path`, or the defaults when no path is given.
    #[instrument(level = "info", skip_all)]
    pub async fn load(path: Option<&Path>) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let Some(path) = path else {
            return Ok(Settings::default());
        };
        let yaml = fs::read_to_string(path).await?;
        let settings = Settings::from_yaml(&yaml)?;
        info!(path = %path.display(), ?settings, "Loaded settings file");
        Ok(settings)
    }
}
