//! Content module - handles pages, front matter, and body rendering

mod frontmatter;
pub mod loader;
pub mod markdown;
mod page;

pub use frontmatter::FrontMatter;
pub use markdown::{Block, MarkdownRenderer, MarkupRenderer, Rendered};
pub use page::{Page, PageKind};
