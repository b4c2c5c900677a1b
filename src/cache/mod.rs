//! In-memory content cache
//!
//! Loaded collections are kept per [`Collection`] together with a
//! fingerprint of the backing directory (markdown file count plus the newest
//! modification time). A lookup reloads the collection only when the
//! fingerprint has changed. The post search index is kept alongside and
//! rebuilt only when the post collection it was built from is replaced.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;
use walkdir::WalkDir;

use crate::content::{BlogPost, Collection, ContentError, ContentLoader, Project};
use crate::search::{SearchIndex, SearchOptions};

/// Snapshot of a collection directory used to detect changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    /// Number of markdown files
    pub files: usize,
    /// Newest modification time among the directory and its files
    pub newest: Option<SystemTime>,
}

impl Fingerprint {
    /// Fingerprint a collection directory; a missing directory has no files
    pub fn of(dir: &Path) -> Self {
        let mut fingerprint = Self {
            files: 0,
            newest: None,
        };

        for entry in WalkDir::new(dir)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let is_markdown = entry.depth() == 1
                && entry.file_type().is_file()
                && entry.path().extension().is_some_and(|e| e == "md");
            if entry.depth() == 1 && !is_markdown {
                continue;
            }
            if is_markdown {
                fingerprint.files += 1;
            }

            let modified = entry.metadata().ok().and_then(|m| m.modified().ok());
            fingerprint.newest = fingerprint.newest.max(modified);
        }

        fingerprint
    }
}

struct Entry<T> {
    fingerprint: Fingerprint,
    records: Arc<Vec<T>>,
}

/// Memoizing wrapper around [`ContentLoader`]
pub struct ContentCache {
    loader: ContentLoader,
    posts: Mutex<Option<Entry<BlogPost>>>,
    projects: Mutex<Option<Entry<Project>>>,
    post_index: Mutex<Option<Arc<SearchIndex<BlogPost>>>>,
    search: SearchOptions,
}

impl ContentCache {
    pub fn new(loader: ContentLoader) -> Self {
        Self {
            loader,
            posts: Mutex::new(None),
            projects: Mutex::new(None),
            post_index: Mutex::new(None),
            search: SearchOptions::default(),
        }
    }

    pub fn with_search_options(mut self, options: SearchOptions) -> Self {
        self.search = options;
        self
    }

    /// The uncached loader, for single-record lookups
    pub fn loader(&self) -> &ContentLoader {
        &self.loader
    }

    /// All blog posts, newest first
    pub fn posts(&self) -> Result<Arc<Vec<BlogPost>>, ContentError> {
        refresh(&self.posts, self.loader.dir(Collection::Posts), || {
            self.loader.get_blog_posts()
        })
    }

    /// All projects in file name order
    pub fn projects(&self) -> Result<Arc<Vec<Project>>, ContentError> {
        refresh(&self.projects, self.loader.dir(Collection::Projects), || {
            self.loader.get_projects()
        })
    }

    /// Search index over [`ContentCache::posts`]
    pub fn post_index(&self) -> Result<Arc<SearchIndex<BlogPost>>, ContentError> {
        let posts = self.posts()?;
        let mut slot = self.post_index.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(index) = slot.as_ref() {
            if Arc::ptr_eq(index.records(), &posts) {
                return Ok(Arc::clone(index));
            }
        }

        tracing::debug!("Rebuilding search index over {} posts", posts.len());
        let index = Arc::new(SearchIndex::new(posts, self.search));
        *slot = Some(Arc::clone(&index));

        Ok(index)
    }

    /// Drop every cached collection
    pub fn invalidate(&self) {
        *self.posts.lock().unwrap_or_else(PoisonError::into_inner) = None;
        *self.projects.lock().unwrap_or_else(PoisonError::into_inner) = None;
        *self.post_index.lock().unwrap_or_else(PoisonError::into_inner) = None;
        tracing::debug!("Content cache invalidated");
    }
}

fn refresh<T, F>(
    slot: &Mutex<Option<Entry<T>>>,
    dir: &Path,
    load: F,
) -> Result<Arc<Vec<T>>, ContentError>
where
    F: FnOnce() -> Result<Vec<T>, ContentError>,
{
    let fingerprint = Fingerprint::of(dir);
    let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(entry) = slot.as_ref() {
        if entry.fingerprint == fingerprint {
            return Ok(Arc::clone(&entry.records));
        }
    }

    tracing::debug!("Reloading {:?}", dir);
    let records = Arc::new(load()?);
    *slot = Some(Entry {
        fingerprint,
        records: Arc::clone(&records),
    });

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_post(dir: &Path, slug: &str, date: &str) {
        fs::write(
            dir.join(format!("{slug}.md")),
            format!("---\ntitle: {slug}\ndate: {date}\n---\nBody"),
        )
        .unwrap();
    }

    #[test]
    fn test_unchanged_collection_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        let posts_dir = dir.path().join("blog");
        fs::create_dir_all(&posts_dir).unwrap();
        write_post(&posts_dir, "one", "2024-01-01");

        let cache = ContentCache::new(ContentLoader::from_dirs(&posts_dir, dir.path().join("p")));
        let first = cache.posts().unwrap();
        let second = cache.posts().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_new_file_triggers_reload() {
        let dir = tempfile::tempdir().unwrap();
        let posts_dir = dir.path().join("blog");
        fs::create_dir_all(&posts_dir).unwrap();
        write_post(&posts_dir, "one", "2024-01-01");

        let cache = ContentCache::new(ContentLoader::from_dirs(&posts_dir, dir.path().join("p")));
        assert_eq!(cache.posts().unwrap().len(), 1);

        write_post(&posts_dir, "two", "2024-02-01");
        let posts = cache.posts().unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].slug, "two");
    }

    #[test]
    fn test_post_index_rebuilt_only_on_change() {
        let dir = tempfile::tempdir().unwrap();
        let posts_dir = dir.path().join("blog");
        fs::create_dir_all(&posts_dir).unwrap();
        write_post(&posts_dir, "one", "2024-01-01");

        let cache = ContentCache::new(ContentLoader::from_dirs(&posts_dir, dir.path().join("p")))
            .with_search_options(SearchOptions { threshold: 0.1 });
        let first = cache.post_index().unwrap();
        let second = cache.post_index().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(first.records(), &cache.posts().unwrap()));
        assert_eq!(first.options().threshold, 0.1);

        write_post(&posts_dir, "two", "2024-02-01");
        let third = cache.post_index().unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.len(), 2);
        assert_eq!(third.search("two").len(), 1);
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let dir = tempfile::tempdir().unwrap();
        let projects_dir = dir.path().join("projects");
        fs::create_dir_all(&projects_dir).unwrap();
        fs::write(projects_dir.join("app.md"), "---\ntitle: App\n---\n").unwrap();

        let cache = ContentCache::new(ContentLoader::from_dirs(dir.path().join("b"), &projects_dir));
        let first = cache.projects().unwrap();
        cache.invalidate();
        let second = cache.projects().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_directory_fingerprint() {
        let dir = tempfile::tempdir().unwrap();
        let fingerprint = Fingerprint::of(&dir.path().join("missing"));
        assert_eq!(fingerprint.files, 0);
        assert_eq!(fingerprint.newest, None);

        let cache = ContentCache::new(ContentLoader::from_dirs(
            dir.path().join("missing"),
            dir.path().join("also-missing"),
        ));
        assert!(cache.posts().unwrap().is_empty());
    }
}
