//! List site content

use anyhow::Result;
use std::collections::HashMap;

use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let loader = site.loader();

    match content_type {
        "post" | "posts" => {
            let posts = loader.get_blog_posts()?;
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!(
                    "  {} - {} [{}] ({} min)",
                    post.date, post.title, post.slug, post.reading_time
                );
            }
        }
        "project" | "projects" => {
            let projects = loader.get_projects()?;
            println!("Projects ({}):", projects.len());
            for project in projects {
                let pin = if project.pinned { " *" } else { "" };
                println!("  {} [{}]{}", project.title, project.slug, pin);
            }
        }
        "category" | "categories" => {
            let posts = loader.get_blog_posts()?;
            let categories = count_by(posts.iter().map(|p| p.category.as_str()));
            println!("Categories ({}):", categories.len());
            for (category, count) in categories {
                println!("  {} ({})", category, count);
            }
        }
        "tag" | "tags" => {
            let projects = loader.get_projects()?;
            let tags = count_by(projects.iter().flat_map(|p| p.tags.iter().map(String::as_str)));
            println!("Tags ({}):", tags.len());
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: posts, projects, categories, tags",
                content_type
            );
        }
    }

    Ok(())
}

/// Occurrences of each non-blank value, most frequent first then by name
fn count_by<'a, I>(values: I) -> Vec<(String, usize)>
where
    I: Iterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values.map(str::trim).filter(|v| !v.is_empty()) {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut counts: Vec<_> = counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}
