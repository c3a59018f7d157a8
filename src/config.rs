use std::path::PathBuf;

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::Strategy;
use crate::locator::TrackSelection;

pub const DEFAULT_WATCH_URL: &str = "https://www.youtube.com/watch";

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// On-disk configuration; every key is optional
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub languages: Option<Vec<String>>,
    pub strategy: Option<Strategy>,
    pub track_selection: Option<TrackSelection>,
    pub accept_language: Option<String>,
    pub user_agent: Option<String>,
    pub watch_url: Option<String>,
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Read `ytscribe/config.toml` under the platform config dir; absent file means defaults
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytscribe")
        .join("config.toml")
}

/// Everything an extraction needs, passed in explicitly
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub languages: Vec<String>,
    pub strategy: Strategy,
    pub track_selection: TrackSelection,
    pub accept_language: Option<String>,
    pub user_agent: String,
    pub watch_url: String,
    pub output_dir: PathBuf,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        ExtractorConfig {
            languages: default_languages(),
            strategy: Strategy::default(),
            track_selection: TrackSelection::default(),
            accept_language: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            watch_url: DEFAULT_WATCH_URL.to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl ExtractorConfig {
    /// Resolve file values over the built-in defaults
    pub fn from_config(config: &Config) -> Self {
        let defaults = ExtractorConfig::default();
        ExtractorConfig {
            languages: config
                .languages
                .clone()
                .filter(|l| !l.is_empty())
                .unwrap_or(defaults.languages),
            strategy: config.strategy.unwrap_or(defaults.strategy),
            track_selection: config.track_selection.unwrap_or(defaults.track_selection),
            accept_language: config.accept_language.clone(),
            user_agent: config.user_agent.clone().unwrap_or(defaults.user_agent),
            watch_url: config.watch_url.clone().unwrap_or(defaults.watch_url),
            output_dir: config.output_dir.clone().unwrap_or(defaults.output_dir),
        }
    }

    /// Explicit Accept-Language, else one derived from the preference list
    pub fn accept_language_header(&self) -> Option<String> {
        self.accept_language
            .clone()
            .or_else(|| accept_language_for(&self.languages))
    }
}

pub fn default_languages() -> Vec<String> {
    vec!["ko".to_string(), "en".to_string()]
}

/// `["ko", "en", "ja"]` becomes `ko,en;q=0.9,ja;q=0.8`
pub fn accept_language_for(languages: &[String]) -> Option<String> {
    if languages.is_empty() {
        return None;
    }
    let header = languages
        .iter()
        .enumerate()
        .map(|(i, lang)| {
            if i == 0 {
                lang.clone()
            } else {
                let q = 10usize.saturating_sub(i).max(1);
                format!("{lang};q=0.{q}")
            }
        })
        .collect::<Vec<_>>()
        .join(",");
    Some(header)
}
