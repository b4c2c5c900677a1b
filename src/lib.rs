//! folio: a markdown-driven portfolio site generator
//!
//! Blog posts and projects live as markdown files with YAML front-matter.
//! This crate loads them into typed records, estimates reading time,
//! extracts a table of contents, fuzzy-searches posts and renders the whole
//! thing as a static site or serves it over HTTP.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod search;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::ContentLoader;

/// A portfolio site rooted at a directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the content collections
    pub content_dir: PathBuf,
    /// Blog post collection
    pub posts_dir: PathBuf,
    /// Project collection
    pub projects_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Site {
    /// Open a site from a directory, using defaults when it has no config
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();

        let config = match config::SiteConfig::locate(&base_dir) {
            Some(path) => config::SiteConfig::load(&path)?,
            None => config::SiteConfig::default(),
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Build a site from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        let posts_dir = content_dir.join(&config.posts_dir);
        let projects_dir = content_dir.join(&config.projects_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            content_dir,
            posts_dir,
            projects_dir,
            public_dir,
        }
    }

    /// Content loader for this site's collections
    pub fn loader(&self) -> ContentLoader {
        ContentLoader::new(self)
    }

    /// Search options from the site configuration
    pub fn search_options(&self) -> search::SearchOptions {
        search::SearchOptions {
            threshold: self.config.search.threshold,
        }
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_paths_follow_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("_config.yml"),
            "content_dir: src\nposts_dir: posts\npublic_dir: out\n",
        )
        .unwrap();

        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.posts_dir, dir.path().join("src/posts"));
        assert_eq!(site.projects_dir, dir.path().join("src/projects"));
        assert_eq!(site.public_dir, dir.path().join("out"));
    }

    #[test]
    fn test_site_without_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.posts_dir, dir.path().join("content/blog"));
        assert_eq!(site.search_options().threshold, 0.3);
    }
}
