//! Content module - loads blog posts and projects and derives page data

mod error;
mod frontmatter;
pub mod heading;
pub mod loader;
mod markdown;
pub mod reading_time;
mod record;

pub use error::ContentError;
pub use frontmatter::FrontMatter;
pub use heading::{extract_headings, slugify, Heading};
pub use loader::{Collection, ContentLoader};
pub use markdown::MarkdownRenderer;
pub use reading_time::calculate_reading_time;
pub use record::{BlogPost, ContentRecord, Project};
