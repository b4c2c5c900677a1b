//! Print the heading outline of a post or project

use anyhow::Result;

use crate::content::{extract_headings, Collection, Heading};
use crate::Site;

/// Print the table of contents for one record
pub fn run(site: &Site, slug: &str, collection: Collection) -> Result<()> {
    let Some(record) = site.loader().get(collection, slug)? else {
        anyhow::bail!("No {} found with slug {:?}", collection.as_str(), slug);
    };

    let headings = extract_headings(record.content());
    if headings.is_empty() {
        println!("{} has no headings", record.title());
        return Ok(());
    }

    println!("{}", record.title());
    print!("{}", outline(&headings));

    Ok(())
}

/// One line per heading, indented by level
fn outline(headings: &[Heading]) -> String {
    headings
        .iter()
        .map(|h| {
            let indent = "  ".repeat(usize::from(h.level.saturating_sub(1)) + 1);
            format!("{}{} (#{})\n", indent, h.text, h.id)
        })
        .collect()
}
