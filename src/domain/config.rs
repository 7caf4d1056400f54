//! # Configuration
//!
//! Manages the loading and parsing of the bot's configuration file (`config.yaml`)
//! and the feed credentials, which only ever come from the environment.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::types::StyleOptions;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`; every section is optional.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub wordcloud: WordCloudConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub twitter: TwitterConfig,
}

impl AppConfig {
    /// Load the configuration from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_backoff_secs")]
    pub rate_limit_backoff_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            page_size: default_page_size(),
            language: default_language(),
            rate_limit_backoff_secs: default_backoff_secs(),
        }
    }
}

fn default_max_results() -> usize {
    500
}
fn default_page_size() -> usize {
    100
}
fn default_language() -> String {
    "ja".to_string()
}
fn default_backoff_secs() -> u64 {
    60
}

#[derive(Debug, Deserialize, Clone)]
pub struct WordCloudConfig {
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_min_font_size")]
    pub min_font_size: u32,
    #[serde(default)]
    pub max_font_size: Option<u32>,
    #[serde(default = "default_max_words")]
    pub max_words: usize,
    #[serde(default = "default_font_path")]
    pub font_path: PathBuf,
    /// Where rendered images are written before upload. Defaults to the system temp dir.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Default for WordCloudConfig {
    fn default() -> Self {
        Self {
            background: default_background(),
            width: default_width(),
            height: default_height(),
            min_font_size: default_min_font_size(),
            max_font_size: None,
            max_words: default_max_words(),
            font_path: default_font_path(),
            output_dir: None,
        }
    }
}

impl WordCloudConfig {
    pub fn style(&self) -> StyleOptions {
        StyleOptions {
            background: self.background.clone(),
            width: self.width,
            height: self.height,
            min_font_size: self.min_font_size,
            max_font_size: self.max_font_size,
            max_words: self.max_words,
            font_path: self.font_path.clone(),
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

fn default_background() -> String {
    "white".to_string()
}
fn default_width() -> u32 {
    900
}
fn default_height() -> u32 {
    450
}
fn default_min_font_size() -> u32 {
    12
}
fn default_max_words() -> usize {
    200
}
fn default_font_path() -> PathBuf {
    PathBuf::from("rounded-mplus-1p-bold.ttf")
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AnalysisConfig {
    /// Added on top of the built-in stop words.
    #[serde(default)]
    pub extra_stop_words: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub directory: PathBuf,
    #[serde(default = "default_log_file")]
    pub file_name: String,
    /// Used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_log_dir(),
            file_name: default_log_file(),
            filter: default_log_filter(),
        }
    }
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_log_file() -> String {
    "session.log".to_string()
}
fn default_log_filter() -> String {
    "info,hyper=warn,reqwest=warn".to_string()
}

/// Endpoints of the feed provider.
#[derive(Debug, Deserialize, Clone)]
pub struct TwitterConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_upload_base")]
    pub upload_base: String,
    #[serde(default = "default_stream_base")]
    pub stream_base: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            upload_base: default_upload_base(),
            stream_base: default_stream_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.twitter.com/1.1".to_string()
}
fn default_upload_base() -> String {
    "https://upload.twitter.com/1.1".to_string()
}
fn default_stream_base() -> String {
    "https://stream.twitter.com/1.1".to_string()
}
fn default_timeout_secs() -> u64 {
    60
}

pub const CONSUMER_KEY_ENV: &str = "CONSUMER_KEY";
pub const CONSUMER_SECRET_ENV: &str = "CONSUMER_SECRET";
pub const ACCESS_TOKEN_ENV: &str = "ACCESS_TOKEN";
pub const ACCESS_TOKEN_SECRET_ENV: &str = "ACCESS_TOKEN_SECRET";

/// OAuth 1.0a credentials for the bot account.
#[derive(Clone)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build credentials from any variable source. Fails listing every missing name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut missing = Vec::new();
        let mut read = |name: &'static str| match lookup(name).filter(|v| !v.trim().is_empty()) {
            Some(value) => value,
            None => {
                missing.push(name);
                String::new()
            }
        };

        let credentials = Self {
            consumer_key: read(CONSUMER_KEY_ENV),
            consumer_secret: read(CONSUMER_SECRET_ENV),
            access_token: read(ACCESS_TOKEN_ENV),
            access_token_secret: read(ACCESS_TOKEN_SECRET_ENV),
        };

        if !missing.is_empty() {
            anyhow::bail!("Missing credentials in environment: {}", missing.join(", "));
        }
        Ok(credentials)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[MASKED]")
            .field("access_token", &"[MASKED]")
            .field("access_token_secret", &"[MASKED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.search.max_results, 500);
        assert_eq!(config.search.language, "ja");
        assert_eq!(config.search.rate_limit_backoff_secs, 60);

        let style = config.wordcloud.style();
        assert_eq!(style.background, "white");
        assert_eq!((style.width, style.height), (900, 450));
        assert_eq!(style.min_font_size, 12);
        assert_eq!(style.font_path, PathBuf::from("rounded-mplus-1p-bold.ttf"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "search:\n  max_results: 200\nwordcloud:\n  background: \"#000000\"\n";
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.search.max_results, 200);
        assert_eq!(config.search.page_size, 100);
        assert_eq!(config.wordcloud.background, "#000000");
        assert_eq!(config.wordcloud.width, 900);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = AppConfig::from_yaml("  \n").unwrap();
        assert_eq!(config.search.max_results, 500);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config.logging.file_name, "session.log");
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "search: [1, 2").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }

    #[test]
    fn test_credentials_report_all_missing() {
        let env: HashMap<&str, &str> = [(CONSUMER_KEY_ENV, "key"), (ACCESS_TOKEN_ENV, " ")]
            .into_iter()
            .collect();
        let err = Credentials::from_lookup(|k| env.get(k).map(|v| v.to_string()))
            .unwrap_err()
            .to_string();
        assert!(err.contains(CONSUMER_SECRET_ENV));
        assert!(err.contains(ACCESS_TOKEN_ENV));
        assert!(err.contains(ACCESS_TOKEN_SECRET_ENV));
        assert!(!err.contains("CONSUMER_KEY,"));
    }

    #[test]
    fn test_credentials_debug_masks_secrets() {
        let creds = Credentials::from_lookup(|k| Some(format!("value-of-{k}"))).unwrap();
        let debug = format!("{creds:?}");
        assert!(debug.contains("value-of-CONSUMER_KEY"));
        assert!(!debug.contains("value-of-CONSUMER_SECRET"));
        assert!(!debug.contains("value-of-ACCESS_TOKEN_SECRET"));
    }
}
