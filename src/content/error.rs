//! Content pipeline errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading content files.
///
/// A missing collection directory or a missing slug is never an error; the
/// loader reports those as an empty list or `None`.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid front-matter in {path:?}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
