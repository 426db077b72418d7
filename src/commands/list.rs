//! List site content

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::site;
use crate::Mica;

/// List site content by type
pub fn run(mica: &Mica, content_type: &str) -> Result<()> {
    let loader = ContentLoader::new(mica);
    let pages = loader.load_all()?;
    let site = site::assemble(pages)?;

    match content_type {
        "post" | "posts" => {
            println!("Posts ({}):", site.posts.len());
            for post in &site.posts {
                let date = post
                    .sort_date()
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                println!("  {} - {} [{}]", date, post.title, post.slug);
            }
        }
        "page" | "pages" => {
            println!("Pages ({}):", site.pages.len());
            for page in &site.pages {
                let marker = if page.in_header { " (header)" } else { "" };
                println!("  {} [{}]{}", page.title, page.slug, marker);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, page", content_type);
        }
    }

    Ok(())
}
