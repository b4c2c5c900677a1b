//! Configuration module

mod site;

pub use site::HighlightConfig;
pub use site::HomeConfig;
pub use site::SearchConfig;
pub use site::SiteConfig;
