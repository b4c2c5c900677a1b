//! Initialize a new portfolio site

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG: &str = r#"# Site
title: My Portfolio
description: Writing about infrastructure, tooling and the projects I build.
author: John Doe
language: en

# URL
url: http://example.com
root: /

# Directory
content_dir: content
posts_dir: blog
projects_dir: projects
public_dir: public

# Writing
reading_speed: 200
highlight:
  theme: base16-ocean.dark
  line_number: true

# Search (0.0 is exact, higher tolerates more typos)
search:
  threshold: 0.3

# Home page
home:
  latest_posts: 2
"#;

/// Initialize a new site in the given directory.
///
/// An existing config file is left alone.
pub fn init_site(target_dir: &Path) -> Result<()> {
    let posts_dir = target_dir.join("content/blog");
    let projects_dir = target_dir.join("content/projects");
    fs::create_dir_all(&posts_dir)?;
    fs::create_dir_all(&projects_dir)?;

    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        tracing::warn!("Keeping existing {:?}", config_path);
    } else {
        fs::write(&config_path, CONFIG)?;
    }

    let today = chrono::Local::now().format("%Y-%m-%d");

    let sample_post = format!(
        r#"---
title: Hello World
date: {today}
description: The first post on this site.
category: General
---

Welcome! This post lives in `content/blog/hello-world.md`.

## Writing posts

Create a new post with:

```bash
$ folio new "My New Post"
```

## Publishing

```bash
$ folio generate
$ folio server --watch
```
"#
    );

    let sample_project = format!(
        r#"---
title: Sample Project
date: {today}
description: A project showcased on the home page.
tags: [rust, markdown]
githubUrl: https://github.com/example/sample-project
pinned: true
---

## Overview

Describe what the project does and how it was built.
"#
    );

    write_if_missing(&posts_dir.join("hello-world.md"), &sample_post)?;
    write_if_missing(&projects_dir.join("sample-project.md"), &sample_project)?;

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if !path.exists() {
        fs::write(path, content)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Site;

    #[test]
    fn test_init_creates_loadable_site() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();

        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.config.title, "My Portfolio");

        let loader = site.loader();
        let posts = loader.get_blog_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "hello-world");
        assert_eq!(posts[0].category, "General");

        let projects = loader.get_projects().unwrap();
        assert_eq!(projects.len(), 1);
        assert!(projects[0].pinned);
        assert_eq!(projects[0].tags, vec!["rust", "markdown"]);
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("_config.yml"), "title: Mine\n").unwrap();

        init_site(dir.path()).unwrap();

        let config = fs::read_to_string(dir.path().join("_config.yml")).unwrap();
        assert_eq!(config, "title: Mine\n");
    }
}
