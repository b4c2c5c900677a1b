//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::content::reading_time::WORDS_PER_MINUTE;
use crate::search::DEFAULT_THRESHOLD;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub posts_dir: String,
    pub projects_dir: String,
    pub public_dir: String,

    // Writing
    pub reading_speed: u32,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Search
    #[serde(default)]
    pub search: SearchConfig,

    // Home page
    #[serde(default)]
    pub home: HomeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            content_dir: "content".to_string(),
            posts_dir: "blog".to_string(),
            projects_dir: "projects".to_string(),
            public_dir: "public".to_string(),

            reading_speed: WORDS_PER_MINUTE,
            highlight: HighlightConfig::default(),

            search: SearchConfig::default(),

            home: HomeConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file. `.toml` files are read as TOML,
    /// everything else as YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Find the config file in a site directory, if there is one
    pub fn locate<P: AsRef<Path>>(base_dir: P) -> Option<std::path::PathBuf> {
        ["_config.yml", "_config.yaml", "_config.toml"]
            .iter()
            .map(|name| base_dir.as_ref().join(name))
            .find(|path| path.is_file())
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: true,
        }
    }
}

/// Fuzzy search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Lower is stricter; 0.0 only accepts exact substrings
    pub threshold: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Home page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeConfig {
    pub latest_posts: usize,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self { latest_posts: 2 }
    }
}
