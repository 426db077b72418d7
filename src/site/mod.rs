//! Site assembly: ordering, navigation, and output emission
//!
//! The assembler is the single synchronization barrier of a build: every
//! page must be loaded before it can compute ordering and navigation. The
//! assembly step itself is pure so it can be tested without touching disk.

use std::collections::HashMap;
use std::fs;

use crate::content::{Page, PageKind};
use crate::error::BuildError;
use crate::templates::{self, NavLink};
use crate::Mica;

/// An assembled site, ready to be written out
#[derive(Debug)]
pub struct Site {
    /// Posts, newest first (by `updated` falling back to `date`, ties
    /// broken by slug ascending)
    pub posts: Vec<Page>,
    /// Standalone pages, slug ascending
    pub pages: Vec<Page>,
    /// Header navigation: pages with `extra.in_header = true`
    pub header_nav: Vec<NavLink>,
}

impl Site {
    /// Number of documents the site will emit (pages, posts, index)
    pub fn document_count(&self) -> usize {
        self.posts.len() + self.pages.len() + 1
    }
}

/// Assemble the full page set into an ordered site.
///
/// Fails with [`BuildError::DuplicateSlug`] if two pages resolve to the same
/// identifier. The output order is total and deterministic: the same input
/// set always yields the same sequence.
pub fn assemble(pages: Vec<Page>) -> Result<Site, BuildError> {
    let mut seen: HashMap<String, std::path::PathBuf> = HashMap::new();
    for page in &pages {
        if let Some(first) = seen.insert(page.slug.clone(), page.full_source.clone()) {
            return Err(BuildError::DuplicateSlug {
                slug: page.slug.clone(),
                first,
                second: page.full_source.clone(),
            });
        }
    }

    let (mut posts, mut standalone): (Vec<Page>, Vec<Page>) =
        pages.into_iter().partition(|p| p.kind == PageKind::Post);

    posts.sort_by(|a, b| {
        b.sort_date()
            .cmp(&a.sort_date())
            .then_with(|| a.slug.cmp(&b.slug))
    });
    standalone.sort_by(|a, b| a.slug.cmp(&b.slug));

    let header_nav = standalone
        .iter()
        .filter(|p| p.in_header)
        .map(|p| NavLink {
            title: p.title.clone(),
            href: p.url_path(),
        })
        .collect();

    Ok(Site {
        posts,
        pages: standalone,
        header_nav,
    })
}

/// Writes an assembled site to the public directory
pub struct Generator {
    mica: Mica,
}

impl Generator {
    pub fn new(mica: &Mica) -> Self {
        Self { mica: mica.clone() }
    }

    /// Assemble and write the whole site
    pub fn generate(&self, pages: Vec<Page>) -> Result<Site, BuildError> {
        let site = assemble(pages)?;
        self.write(&site)?;
        Ok(site)
    }

    fn write(&self, site: &Site) -> Result<(), BuildError> {
        let public = &self.mica.public_dir;
        fs::create_dir_all(public).map_err(|e| BuildError::io(public, e))?;

        for post in &site.posts {
            let prev = post.prev(&site.posts);
            let next = post.next(&site.posts);
            let html =
                templates::render_page(&self.mica.config, post, &site.header_nav, prev, next);
            self.write_document(&post.slug, &html)?;
        }

        for page in &site.pages {
            let html =
                templates::render_page(&self.mica.config, page, &site.header_nav, None, None);
            self.write_document(&page.slug, &html)?;
        }

        let index = templates::render_index(&self.mica.config, &site.posts, &site.header_nav);
        let index_path = public.join("index.html");
        fs::write(&index_path, index).map_err(|e| BuildError::io(&index_path, e))?;

        Ok(())
    }

    /// Write one document at public/<slug>/index.html
    fn write_document(&self, slug: &str, html: &str) -> Result<(), BuildError> {
        let dir = self.mica.public_dir.join(slug);
        fs::create_dir_all(&dir).map_err(|e| BuildError::io(&dir, e))?;
        let path = dir.join("index.html");
        fs::write(&path, html).map_err(|e| BuildError::io(&path, e))?;
        tracing::debug!("Wrote {:?}", path);
        Ok(())
    }
}
