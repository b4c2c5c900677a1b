//! Fuzzy search from the command line

use anyhow::Result;
use std::sync::Arc;

use crate::search::SearchIndex;
use crate::Site;

/// Print blog posts matching a query, best first
pub fn run(site: &Site, query: &str) -> Result<()> {
    let posts = site.loader().get_blog_posts()?;
    let index = SearchIndex::new(Arc::new(posts), site.search_options());
    let hits = index.search(query);

    if hits.is_empty() {
        println!("No posts match {:?}", query);
        return Ok(());
    }

    println!("Results ({}):", hits.len());
    for hit in hits {
        match hit.score {
            Some(score) => println!(
                "  {:.3}  {} [{}]",
                score, hit.item.title, hit.item.slug
            ),
            None => println!("  {} [{}]", hit.item.title, hit.item.slug),
        }
    }

    Ok(())
}
