//! Blog post and project records

use serde::{Deserialize, Serialize};

use super::reading_time::reading_time_with_speed;
use super::FrontMatter;

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    /// File name without `.md`
    pub slug: String,
    pub title: String,
    /// Publication date as written in the front-matter
    pub date: String,
    pub description: String,
    pub category: String,
    /// Raw markdown body
    pub content: String,
    /// Estimated minutes to read
    pub reading_time: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl BlogPost {
    /// Build a post from its parsed front-matter and body
    pub fn from_source(
        slug: String,
        fm: &FrontMatter,
        body: &str,
        words_per_minute: u32,
    ) -> Self {
        Self {
            slug,
            title: fm.string_or_empty("title"),
            date: fm.string_or_empty("date"),
            description: fm.string_or_empty("description"),
            category: fm.string_or_empty("category"),
            content: body.to_string(),
            reading_time: reading_time_with_speed(body, words_per_minute),
            last_updated: fm.string("lastUpdated"),
        }
    }
}

/// A portfolio project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// File name without `.md`
    pub slug: String,
    pub title: String,
    pub description: String,
    /// Cover image path or URL
    pub image: String,
    pub tags: Vec<String>,
    /// Raw markdown body
    pub content: String,
    /// Estimated minutes to read
    pub reading_time: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,

    // Presentation-only fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blog_post_slug: Option<String>,
    #[serde(default)]
    pub pinned: bool,
}

impl Project {
    /// Build a project from its parsed front-matter and body
    pub fn from_source(
        slug: String,
        fm: &FrontMatter,
        body: &str,
        words_per_minute: u32,
    ) -> Self {
        Self {
            slug,
            title: fm.string_or_empty("title"),
            description: fm.string_or_empty("description"),
            image: fm.string_or_empty("image"),
            tags: fm.strings("tags"),
            content: body.to_string(),
            reading_time: reading_time_with_speed(body, words_per_minute),
            date: fm.string("date"),
            last_updated: fm.string("lastUpdated"),
            live_url: fm.string("liveUrl"),
            github_url: fm.string("githubUrl"),
            blog_post_slug: fm.string("blogPostSlug"),
            pinned: fm.flag("pinned"),
        }
    }
}

/// Either kind of content record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentRecord {
    Post(BlogPost),
    Project(Project),
}

impl ContentRecord {
    pub fn slug(&self) -> &str {
        match self {
            ContentRecord::Post(post) => &post.slug,
            ContentRecord::Project(project) => &project.slug,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ContentRecord::Post(post) => &post.title,
            ContentRecord::Project(project) => &project.title,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            ContentRecord::Post(post) => &post.description,
            ContentRecord::Project(project) => &project.description,
        }
    }

    /// Raw markdown body
    pub fn content(&self) -> &str {
        match self {
            ContentRecord::Post(post) => &post.content,
            ContentRecord::Project(project) => &project.content,
        }
    }

    pub fn reading_time(&self) -> u32 {
        match self {
            ContentRecord::Post(post) => post.reading_time,
            ContentRecord::Project(project) => project.reading_time,
        }
    }

    pub fn last_updated(&self) -> Option<&str> {
        match self {
            ContentRecord::Post(post) => post.last_updated.as_deref(),
            ContentRecord::Project(project) => project.last_updated.as_deref(),
        }
    }
}

impl From<BlogPost> for ContentRecord {
    fn from(post: BlogPost) -> Self {
        ContentRecord::Post(post)
    }
}

impl From<Project> for ContentRecord {
    fn from(project: Project) -> Self {
        ContentRecord::Project(project)
    }
}
