//! Build error taxonomy

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a site build.
///
/// Every variant carries enough context to name the offending page; no
/// variant is recoverable. Commands surface these through anyhow and exit
/// non-zero without publishing partial output.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The front-matter block is unterminated or contains invalid
    /// key-value syntax.
    #[error("malformed front matter: {reason}")]
    MalformedFrontMatter { reason: String },

    /// A footnote reference has no matching definition at render completion.
    #[error("unresolved footnote reference [^{id}]")]
    UnresolvedFootnote { id: String },

    /// Two pages resolved to the same slug.
    #[error("duplicate slug `{slug}` ({first} and {second})")]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Load or write failure on durable storage.
    #[error("io failure on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
