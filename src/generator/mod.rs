//! Generator module - generates static HTML files using built-in Tera templates

use anyhow::{Context as _, Result};
use chrono::Datelike;
use serde::Serialize;
use std::fs;
use std::path::Path;

use tera::Context;

use crate::content::{extract_headings, BlogPost, MarkdownRenderer, Project};
use crate::templates::{SiteData, TemplateRenderer};
use crate::Site;

/// Entry of the client-side search index
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchEntry<'a> {
    slug: &'a str,
    title: &'a str,
    description: &'a str,
    category: &'a str,
    date: &'a str,
    reading_time: u32,
    content: &'a str,
}

/// Static site generator using Tera templates
pub struct Generator {
    site: Site,
    renderer: TemplateRenderer,
    markdown: MarkdownRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        let markdown = MarkdownRenderer::from_config(&site.config.highlight);

        Ok(Self {
            site: site.clone(),
            renderer,
            markdown,
        })
    }

    /// Generate the entire site.
    ///
    /// `posts` are expected newest first, as the loader returns them.
    pub fn generate(&self, posts: &[BlogPost], projects: &[Project]) -> Result<()> {
        fs::create_dir_all(&self.site.public_dir)?;

        let site_data = SiteData::from(&self.site.config);

        self.generate_home(posts, projects, &site_data)?;
        self.generate_blog_index(posts, &site_data)?;
        self.generate_post_pages(posts, &site_data)?;
        self.generate_projects_index(projects, &site_data)?;
        self.generate_project_pages(projects, &site_data)?;
        self.generate_not_found(&site_data)?;
        self.generate_search_index(posts)?;

        Ok(())
    }

    /// Create a base context with common variables
    fn create_base_context(&self, site_data: &SiteData) -> Context {
        let mut context = Context::new();
        context.insert("site", site_data);
        context.insert("year", &chrono::Local::now().year());
        context
    }

    /// Home page: latest posts and pinned projects
    fn generate_home(
        &self,
        posts: &[BlogPost],
        projects: &[Project],
        site_data: &SiteData,
    ) -> Result<()> {
        let latest: Vec<&BlogPost> = posts.iter().take(self.site.config.home.latest_posts).collect();
        let pinned: Vec<&Project> = projects.iter().filter(|p| p.pinned).collect();

        let mut context = self.create_base_context(site_data);
        context.insert("posts", &latest);
        context.insert("projects", &pinned);

        let html = self.renderer.render("index.html", &context)?;
        write_page(&self.site.public_dir.join("index.html"), &html)
    }

    fn generate_blog_index(&self, posts: &[BlogPost], site_data: &SiteData) -> Result<()> {
        let mut context = self.create_base_context(site_data);
        context.insert("posts", posts);

        let html = self.renderer.render("blog.html", &context)?;
        write_page(&self.site.public_dir.join("blog").join("index.html"), &html)
    }

    /// Generate individual post pages
    fn generate_post_pages(&self, posts: &[BlogPost], site_data: &SiteData) -> Result<()> {
        for post in posts {
            let body = self
                .markdown
                .render(&post.content)
                .with_context(|| format!("Failed to render post {}", post.slug))?;

            let mut context = self.create_base_context(site_data);
            context.insert("post", post);
            context.insert("body", &body);
            context.insert("headings", &extract_headings(&post.content));

            let html = self.renderer.render("post.html", &context)?;
            let output_path = self
                .site
                .public_dir
                .join("blog")
                .join(&post.slug)
                .join("index.html");
            write_page(&output_path, &html)?;
            tracing::debug!("Generated post: {:?}", output_path);
        }

        tracing::info!("Generated {} post pages", posts.len());
        Ok(())
    }

    fn generate_projects_index(&self, projects: &[Project], site_data: &SiteData) -> Result<()> {
        let mut context = self.create_base_context(site_data);
        context.insert("projects", projects);

        let html = self.renderer.render("projects.html", &context)?;
        write_page(
            &self.site.public_dir.join("projects").join("index.html"),
            &html,
        )
    }

    /// Generate individual project pages
    fn generate_project_pages(&self, projects: &[Project], site_data: &SiteData) -> Result<()> {
        for project in projects {
            let body = self
                .markdown
                .render(&project.content)
                .with_context(|| format!("Failed to render project {}", project.slug))?;

            let mut context = self.create_base_context(site_data);
            context.insert("project", project);
            context.insert("body", &body);
            context.insert("headings", &extract_headings(&project.content));

            let html = self.renderer.render("project.html", &context)?;
            let output_path = self
                .site
                .public_dir
                .join("projects")
                .join(&project.slug)
                .join("index.html");
            write_page(&output_path, &html)?;
            tracing::debug!("Generated project: {:?}", output_path);
        }

        tracing::info!("Generated {} project pages", projects.len());
        Ok(())
    }

    fn generate_not_found(&self, site_data: &SiteData) -> Result<()> {
        let context = self.create_base_context(site_data);
        let html = self.renderer.render("404.html", &context)?;
        write_page(&self.site.public_dir.join("404.html"), &html)
    }

    /// Generate search index (JSON)
    fn generate_search_index(&self, posts: &[BlogPost]) -> Result<()> {
        let entries: Vec<SearchEntry> = posts
            .iter()
            .map(|p| SearchEntry {
                slug: &p.slug,
                title: &p.title,
                description: &p.description,
                category: &p.category,
                date: &p.date,
                reading_time: p.reading_time,
                content: &p.content,
            })
            .collect();

        let output_path = self.site.public_dir.join("search.json");
        let json = serde_json::to_string_pretty(&entries)?;
        fs::write(&output_path, json)?;
        tracing::info!("Generated search.json");

        Ok(())
    }
}

fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create dir {:?}", parent))?;
    }
    fs::write(path, html).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(slug: &str, date: &str, content: &str) -> BlogPost {
        BlogPost {
            slug: slug.to_string(),
            title: format!("Title {slug}"),
            date: date.to_string(),
            description: "A post".to_string(),
            category: "Notes".to_string(),
            content: content.to_string(),
            reading_time: 1,
            last_updated: None,
        }
    }

    fn project(slug: &str, pinned: bool) -> Project {
        Project {
            slug: slug.to_string(),
            title: format!("Project {slug}"),
            description: "A project".to_string(),
            image: String::new(),
            tags: vec!["rust".to_string()],
            content: "## Overview\n\nDetails.".to_string(),
            reading_time: 1,
            date: None,
            last_updated: None,
            live_url: None,
            github_url: Some("https://github.com/example/app".to_string()),
            blog_post_slug: Some("first".to_string()),
            pinned,
        }
    }

    #[test]
    fn test_generate_writes_all_pages() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        let generator = Generator::new(&site).unwrap();

        let posts = vec![
            post("third", "2024-03-01", "# Third\n\n## Setup\n\nText."),
            post("second", "2024-02-01", "Body"),
            post("first", "2024-01-01", "Body"),
        ];
        let projects = vec![project("pinned-app", true), project("side-app", false)];
        generator.generate(&posts, &projects).unwrap();

        let public = &site.public_dir;
        for page in [
            "index.html",
            "404.html",
            "search.json",
            "blog/index.html",
            "blog/first/index.html",
            "projects/index.html",
            "projects/side-app/index.html",
        ] {
            assert!(public.join(page).is_file(), "missing {page}");
        }

        let home = fs::read_to_string(public.join("index.html")).unwrap();
        assert!(home.contains("Title third"));
        assert!(home.contains("Title second"));
        assert!(!home.contains("Title first"));
        assert!(home.contains("Project pinned-app"));
        assert!(!home.contains("Project side-app"));

        let page = fs::read_to_string(public.join("blog/third/index.html")).unwrap();
        assert!(page.contains(r#"<h2 id="setup">Setup</h2>"#));
        assert!(page.contains(r##"href="#setup""##));
        assert!(page.contains("March 1, 2024"));
        assert!(page.contains("1 min read"));

        let project_page =
            fs::read_to_string(public.join("projects/pinned-app/index.html")).unwrap();
        assert!(project_page.contains("View on GitHub"));
        assert!(project_page.contains("/blog/first/"));
        assert!(!project_page.contains("View Live Demo"));
    }

    #[test]
    fn test_search_index_contents() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        let generator = Generator::new(&site).unwrap();

        generator
            .generate(&[post("only", "2024-01-01", "Hello")], &[])
            .unwrap();

        let json = fs::read_to_string(site.public_dir.join("search.json")).unwrap();
        let entries: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["slug"], "only");
        assert_eq!(entries[0]["readingTime"], 1);
        assert_eq!(entries[0]["content"], "Hello");
    }

    #[test]
    fn test_empty_site_still_generates() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        Generator::new(&site).unwrap().generate(&[], &[]).unwrap();

        let blog = fs::read_to_string(site.public_dir.join("blog/index.html")).unwrap();
        assert!(blog.contains("No posts yet."));
        let search = fs::read_to_string(site.public_dir.join("search.json")).unwrap();
        assert_eq!(search.trim(), "[]");
    }
}
