//! Create a new post or project

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::Collection;
use crate::Site;

/// Create a new markdown file in a collection and return its path
pub fn create(site: &Site, title: &str, collection: Collection) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    let target_dir = site.loader().dir(collection).to_path_buf();
    fs::create_dir_all(&target_dir)?;

    let file_path = target_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    fs::write(&file_path, scaffold(title, &today, collection)?)?;

    Ok(file_path)
}

/// Front-matter skeleton for a new record
fn scaffold(title: &str, date: &str, collection: Collection) -> Result<String> {
    // A JSON string is a valid YAML double-quoted scalar
    let title = serde_json::to_string(title)?;

    Ok(match collection {
        Collection::Posts => format!(
            "---\ntitle: {title}\ndate: {date}\ndescription: \"\"\ncategory: \"\"\n---\n"
        ),
        Collection::Projects => format!(
            "---\ntitle: {title}\ndate: {date}\ndescription: \"\"\nimage: \"\"\ntags: []\npinned: false\n---\n"
        ),
    })
}

/// Run the new command
pub fn run(site: &Site, title: &str, collection: Collection) -> Result<()> {
    let file_path = create(site, title, collection)?;
    println!("Created: {:?}", file_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_post_round_trips_through_loader() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();

        let path = create(&site, "Terraform: State & Locks", Collection::Posts).unwrap();
        assert_eq!(path, site.posts_dir.join("terraform-state-locks.md"));

        let post = site
            .loader()
            .get_blog_post("terraform-state-locks")
            .unwrap()
            .unwrap();
        assert_eq!(post.title, "Terraform: State & Locks");
        assert_eq!(post.date.len(), 10);
        assert_eq!(post.category, "");
        assert_eq!(post.reading_time, 0);
    }

    #[test]
    fn test_new_project() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();

        create(&site, "Homelab", Collection::Projects).unwrap();
        let project = site.loader().get_project("homelab").unwrap().unwrap();
        assert_eq!(project.title, "Homelab");
        assert!(project.tags.is_empty());
        assert!(!project.pinned);
    }

    #[test]
    fn test_new_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();

        create(&site, "Twice", Collection::Posts).unwrap();
        assert!(create(&site, "Twice", Collection::Posts).is_err());
    }

    #[test]
    fn test_new_rejects_unsluggable_title() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert!(create(&site, "!!!", Collection::Posts).is_err());
    }
}
