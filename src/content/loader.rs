//! Content loader - loads blog posts and projects from the content directory

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::reading_time::WORDS_PER_MINUTE;
use super::{BlogPost, ContentError, ContentRecord, FrontMatter, Project};
use crate::Site;

/// The two content collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Posts,
    Projects,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Posts => "posts",
            Collection::Projects => "projects",
        }
    }
}

/// Loads content records straight from disk.
///
/// Every call re-reads the backing files; see [`crate::cache::ContentCache`]
/// for a memoizing wrapper.
#[derive(Debug, Clone)]
pub struct ContentLoader {
    posts_dir: PathBuf,
    projects_dir: PathBuf,
    words_per_minute: u32,
}

impl ContentLoader {
    /// Create a loader for a site's configured directories
    pub fn new(site: &Site) -> Self {
        Self::from_dirs(&site.posts_dir, &site.projects_dir)
            .with_reading_speed(site.config.reading_speed)
    }

    /// Create a loader over explicit collection directories
    pub fn from_dirs<P: AsRef<Path>, Q: AsRef<Path>>(posts_dir: P, projects_dir: Q) -> Self {
        Self {
            posts_dir: posts_dir.as_ref().to_path_buf(),
            projects_dir: projects_dir.as_ref().to_path_buf(),
            words_per_minute: WORDS_PER_MINUTE,
        }
    }

    pub fn with_reading_speed(mut self, words_per_minute: u32) -> Self {
        self.words_per_minute = words_per_minute;
        self
    }

    /// Directory backing a collection
    pub fn dir(&self, collection: Collection) -> &Path {
        match collection {
            Collection::Posts => &self.posts_dir,
            Collection::Projects => &self.projects_dir,
        }
    }

    /// Load all blog posts, newest first.
    ///
    /// Dates are compared as plain strings; posts with equal dates keep
    /// their file name order.
    pub fn get_blog_posts(&self) -> Result<Vec<BlogPost>, ContentError> {
        let mut posts = self.load_collection(Collection::Posts, |slug, fm, body| {
            BlogPost::from_source(slug, fm, body, self.words_per_minute)
        })?;

        posts.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(posts)
    }

    /// Load a single blog post. `None` when there is no such file.
    pub fn get_blog_post(&self, slug: &str) -> Result<Option<BlogPost>, ContentError> {
        self.load_one(Collection::Posts, slug, |slug, fm, body| {
            BlogPost::from_source(slug, fm, body, self.words_per_minute)
        })
    }

    /// Load all projects in file name order
    pub fn get_projects(&self) -> Result<Vec<Project>, ContentError> {
        self.load_collection(Collection::Projects, |slug, fm, body| {
            Project::from_source(slug, fm, body, self.words_per_minute)
        })
    }

    /// Load a single project. `None` when there is no such file.
    pub fn get_project(&self, slug: &str) -> Result<Option<Project>, ContentError> {
        self.load_one(Collection::Projects, slug, |slug, fm, body| {
            Project::from_source(slug, fm, body, self.words_per_minute)
        })
    }

    /// Load a single record from either collection
    pub fn get(
        &self,
        collection: Collection,
        slug: &str,
    ) -> Result<Option<ContentRecord>, ContentError> {
        Ok(match collection {
            Collection::Posts => self.get_blog_post(slug)?.map(ContentRecord::from),
            Collection::Projects => self.get_project(slug)?.map(ContentRecord::from),
        })
    }

    fn load_collection<T, F>(&self, collection: Collection, build: F) -> Result<Vec<T>, ContentError>
    where
        F: Fn(String, &FrontMatter, &str) -> T,
    {
        let dir = self.dir(collection);
        if !dir.is_dir() {
            tracing::debug!("No {} directory at {:?}", collection.as_str(), dir);
            return Ok(Vec::new());
        }

        let mut records = Vec::new();

        for path in markdown_files(dir) {
            let Some(slug) = slug_of(&path) else {
                tracing::warn!("Skipping file with a non UTF-8 name: {:?}", path);
                continue;
            };

            match read_source(&path) {
                Ok((fm, body)) => records.push(build(slug, &fm, &body)),
                Err(e) => tracing::warn!("Failed to load {}: {}", collection.as_str(), e),
            }
        }

        tracing::debug!("Loaded {} {}", records.len(), collection.as_str());

        Ok(records)
    }

    fn load_one<T, F>(
        &self,
        collection: Collection,
        slug: &str,
        build: F,
    ) -> Result<Option<T>, ContentError>
    where
        F: FnOnce(String, &FrontMatter, &str) -> T,
    {
        if !is_valid_slug(slug) {
            return Ok(None);
        }

        let path = self.dir(collection).join(format!("{}.md", slug));
        match read_source(&path) {
            Ok((fm, body)) => Ok(Some(build(slug.to_string(), &fm, &body))),
            Err(ContentError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Markdown files directly inside `dir`, by file name
fn markdown_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|path| path.is_file() && is_markdown_file(path))
        .collect()
}

/// Read a file and split off its front-matter
fn read_source(path: &Path) -> Result<(FrontMatter, String), ContentError> {
    let content = fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let (fm, body) = FrontMatter::parse(&content).map_err(|source| ContentError::FrontMatter {
        path: path.to_path_buf(),
        source,
    })?;

    Ok((fm, body.to_string()))
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md")
        .unwrap_or(false)
}

fn slug_of(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

/// Slugs name a file inside the collection directory, never a path
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug != "." && slug != ".." && !slug.contains(['/', '\\', '\0'])
}
