//! Content loader - loads pages from the content directory

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::markdown::{MarkdownRenderer, MarkupRenderer};
use super::{FrontMatter, Page, PageKind};
use crate::error::BuildError;
use crate::Mica;

/// Loads pages from the content directory.
///
/// Loading is fail-fast: the first page that does not parse or render aborts
/// the whole build, since a partial site is not a meaningful output.
pub struct ContentLoader<'a> {
    mica: &'a Mica,
    renderer: Box<dyn MarkupRenderer>,
}

impl<'a> ContentLoader<'a> {
    /// Create a loader with the default markdown renderer
    pub fn new(mica: &'a Mica) -> Self {
        Self::with_renderer(mica, Box::new(MarkdownRenderer::new()))
    }

    /// Create a loader with a custom body renderer
    pub fn with_renderer(mica: &'a Mica, renderer: Box<dyn MarkupRenderer>) -> Self {
        Self { mica, renderer }
    }

    /// Load every page under the content directory.
    ///
    /// Files are visited in path order so repeated builds see the same
    /// sequence. Drafts are skipped unless `render_drafts` is set.
    pub fn load_all(&self) -> Result<Vec<Page>> {
        let mut pages = Vec::new();

        if !self.mica.content_dir.exists() {
            return Ok(pages);
        }

        for entry in WalkDir::new(&self.mica.content_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            // An entry we cannot read aborts the build: skipping it would
            // publish a partial site
            let entry = entry.map_err(|e| self.walk_error(e))?;
            let path = entry.path();
            if path.is_file() && is_markdown_file(path) {
                let page = self
                    .load_page(path)
                    .with_context(|| format!("failed to load page {:?}", path))?;

                if page.draft && !self.mica.config.render_drafts {
                    tracing::debug!("Skipping draft: {}", page.source);
                    continue;
                }
                pages.push(page);
            }
        }

        Ok(pages)
    }

    /// Turn a traversal failure into a build error with path context
    fn walk_error(&self, err: walkdir::Error) -> BuildError {
        let path = err
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.mica.content_dir.clone());
        let source = err.into_io_error().unwrap_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "filesystem loop detected")
        });
        BuildError::io(path, source)
    }

    /// Load a single page from a file
    fn load_page(&self, path: &Path) -> Result<Page> {
        let source_text =
            fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;

        let (fm, body) = FrontMatter::parse(&source_text)?;

        let relative = path
            .strip_prefix(&self.mica.content_dir)
            .unwrap_or(path);
        let source = relative.to_string_lossy().to_string();

        let kind = if relative
            .components()
            .next()
            .and_then(|c| c.as_os_str().to_str())
            == Some(self.mica.config.blog_dir.as_str())
        {
            PageKind::Post
        } else {
            PageKind::Page
        };

        let date = fm.parse_date();
        let updated = fm.parse_updated();

        // Posts sort by date; without one the output order would depend on
        // filesystem state
        if kind == PageKind::Post && date.is_none() {
            return Err(BuildError::MalformedFrontMatter {
                reason: "blog posts must set a `date` field".to_string(),
            }
            .into());
        }

        let title = fm.title.clone().unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string()
        });

        let slug = derive_slug(relative, fm.slug.as_deref());

        let rendered = self.renderer.render(body)?;

        Ok(Page {
            slug,
            title,
            date,
            updated,
            description: fm.description.clone(),
            draft: fm.draft,
            kind,
            raw: body.to_string(),
            blocks: rendered.blocks,
            html: rendered.html,
            source,
            full_source: path.to_path_buf(),
            in_header: fm.in_header(),
            extra: fm.extra,
        })
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

/// Derive a page slug from its relative source path.
///
/// Directory components are kept (slugified) so `blog/bitfields.md` and
/// `about.md` never collide; a front-matter `slug` replaces the final
/// segment; `index.md` collapses into its parent directory.
fn derive_slug(relative: &Path, override_slug: Option<&str>) -> String {
    let mut parts: Vec<String> = relative
        .parent()
        .map(|p| {
            p.components()
                .filter_map(|c| c.as_os_str().to_str())
                .map(slug::slugify)
                .collect()
        })
        .unwrap_or_default();

    let stem = relative
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled");

    match override_slug {
        Some(s) => parts.push(slug::slugify(s)),
        None if stem == "index" && !parts.is_empty() => {}
        None => parts.push(slug::slugify(stem)),
    }

    parts.join("/")
}
