//! Page model

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde::Serialize;
use std::path::PathBuf;

use super::markdown::Block;

/// Whether a page is a dated blog post or a standalone page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageKind {
    Post,
    Page,
}

/// A loaded content page
///
/// Created once at build time; the raw body is never mutated after load,
/// the rendered output lives alongside it.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    /// Unique identifier, derived from the source path (front matter may
    /// override the last segment)
    pub slug: String,

    /// Page title
    pub title: String,

    /// Publication date (required for posts)
    pub date: Option<DateTime<Local>>,

    /// Last updated date
    pub updated: Option<DateTime<Local>>,

    /// Short description for the index listing
    pub description: Option<String>,

    /// Whether the page is an unpublished draft
    pub draft: bool,

    /// Post (under the blog section) or standalone page
    pub kind: PageKind,

    /// Raw body text, after front matter
    pub raw: String,

    /// Typed body blocks produced by the renderer
    pub blocks: Vec<Block>,

    /// Rendered HTML body
    pub html: String,

    /// Source file path (relative to the content directory)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// Whether the page appears in the header navigation
    pub in_header: bool,

    /// Custom front-matter fields
    pub extra: IndexMap<String, toml::Value>,
}

impl Page {
    /// The date used for ordering posts: `updated` when present, else `date`
    pub fn sort_date(&self) -> Option<DateTime<Local>> {
        self.updated.or(self.date)
    }

    /// URL path for this page ("/slug/")
    pub fn url_path(&self) -> String {
        format!("/{}/", self.slug)
    }

    /// Get the previous post in an ordered list
    pub fn prev<'a>(&self, posts: &'a [Page]) -> Option<&'a Page> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        if pos > 0 {
            Some(&posts[pos - 1])
        } else {
            None
        }
    }

    /// Get the next post in an ordered list
    pub fn next<'a>(&self, posts: &'a [Page]) -> Option<&'a Page> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        if pos < posts.len() - 1 {
            Some(&posts[pos + 1])
        } else {
            None
        }
    }
}
