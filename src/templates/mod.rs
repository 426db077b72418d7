//! Minimal built-in page templates
//!
//! Theming is out of scope, so output documents are assembled from plain
//! format strings: a shared shell with header navigation, an article body,
//! and previous/next links between posts.

use crate::config::SiteConfig;
use crate::content::markdown::html_escape;
use crate::content::{Page, PageKind};

/// A link in the site header or the post navigation
#[derive(Debug, Clone, PartialEq)]
pub struct NavLink {
    pub title: String,
    pub href: String,
}

/// Render a single page document
pub fn render_page(
    config: &SiteConfig,
    page: &Page,
    header_nav: &[NavLink],
    prev: Option<&Page>,
    next: Option<&Page>,
) -> String {
    let mut article = String::new();

    article.push_str(&format!("<h1>{}</h1>\n", html_escape(&page.title)));
    if page.kind == PageKind::Post {
        if let Some(date) = page.date {
            article.push_str(&format!(
                "<p class=\"meta\"><time datetime=\"{}\">{}</time></p>\n",
                date.format("%Y-%m-%d"),
                date.format("%B %-d, %Y")
            ));
        }
        if let Some(updated) = page.updated {
            article.push_str(&format!(
                "<p class=\"meta\">updated {}</p>\n",
                updated.format("%B %-d, %Y")
            ));
        }
    }
    article.push_str(&page.html);

    let mut nav = String::new();
    if prev.is_some() || next.is_some() {
        nav.push_str("<nav class=\"post-nav\">\n");
        if let Some(p) = prev {
            nav.push_str(&format!(
                "<a class=\"prev\" href=\"{}\">&larr; {}</a>\n",
                p.url_path(),
                html_escape(&p.title)
            ));
        }
        if let Some(n) = next {
            nav.push_str(&format!(
                "<a class=\"next\" href=\"{}\">{} &rarr;</a>\n",
                n.url_path(),
                html_escape(&n.title)
            ));
        }
        nav.push_str("</nav>\n");
    }

    shell(
        config,
        &page.title,
        page.description.as_deref(),
        header_nav,
        &format!("<article>\n{}</article>\n{}", article, nav),
    )
}

/// Render the site index: posts newest-first
pub fn render_index(config: &SiteConfig, posts: &[Page], header_nav: &[NavLink]) -> String {
    let mut listing = String::new();
    listing.push_str("<ul class=\"post-list\">\n");
    for post in posts {
        listing.push_str("<li>");
        if let Some(date) = post.sort_date() {
            listing.push_str(&format!(
                "<time datetime=\"{}\">{}</time> ",
                date.format("%Y-%m-%d"),
                date.format("%Y-%m-%d")
            ));
        }
        listing.push_str(&format!(
            "<a href=\"{}\">{}</a>",
            post.url_path(),
            html_escape(&post.title)
        ));
        if let Some(desc) = &post.description {
            listing.push_str(&format!(" <span class=\"desc\">{}</span>", html_escape(desc)));
        }
        listing.push_str("</li>\n");
    }
    listing.push_str("</ul>\n");

    let description = if config.description.is_empty() {
        None
    } else {
        Some(config.description.as_str())
    };

    shell(config, &config.title, description, header_nav, &listing)
}

/// The shared document shell
fn shell(
    config: &SiteConfig,
    title: &str,
    description: Option<&str>,
    header_nav: &[NavLink],
    body: &str,
) -> String {
    let mut head_meta = String::new();
    if let Some(desc) = description {
        head_meta.push_str(&format!(
            "<meta name=\"description\" content=\"{}\">\n",
            html_escape(desc)
        ));
    }

    let mut nav_links = String::new();
    for link in header_nav {
        nav_links.push_str(&format!(
            "<a href=\"{}\">{}</a>\n",
            link.href,
            html_escape(&link.title)
        ));
    }

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"{lang}\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title} | {site_title}</title>\n\
         {head_meta}\
         </head>\n\
         <body>\n\
         <header>\n\
         <a class=\"site-title\" href=\"/\">{site_title}</a>\n\
         <nav>\n{nav_links}</nav>\n\
         </header>\n\
         <main>\n{body}</main>\n\
         </body>\n\
         </html>\n",
        lang = config.language,
        title = html_escape(title),
        site_title = html_escape(&config.title),
        head_meta = head_meta,
        nav_links = nav_links,
        body = body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use indexmap::IndexMap;
    use std::path::PathBuf;

    fn post(slug: &str, title: &str) -> Page {
        Page {
            slug: slug.to_string(),
            title: title.to_string(),
            date: Some(Local.with_ymd_and_hms(2023, 5, 14, 0, 0, 0).unwrap()),
            updated: None,
            description: None,
            draft: false,
            kind: PageKind::Post,
            raw: String::new(),
            blocks: Vec::new(),
            html: "<p>body</p>\n".to_string(),
            source: format!("{}.md", slug),
            full_source: PathBuf::from(format!("{}.md", slug)),
            in_header: false,
            extra: IndexMap::new(),
        }
    }

    #[test]
    fn test_render_page_escapes_title() {
        let config = SiteConfig::default();
        let p = post("blog/a", "Fast & <loose>");
        let html = render_page(&config, &p, &[], None, None);
        assert!(html.contains("Fast &amp; &lt;loose&gt;"));
        assert!(html.contains("<p>body</p>"));
    }

    #[test]
    fn test_render_page_post_nav() {
        let config = SiteConfig::default();
        let a = post("blog/a", "A");
        let b = post("blog/b", "B");
        let html = render_page(&config, &a, &[], None, Some(&b));
        assert!(html.contains("href=\"/blog/b/\""));
        assert!(html.contains("B &rarr;"));
        assert!(!html.contains("class=\"prev\""));
    }

    #[test]
    fn test_render_index_lists_posts() {
        let config = SiteConfig::default();
        let posts = vec![post("blog/a", "First"), post("blog/b", "Second")];
        let nav = vec![NavLink {
            title: "about me".to_string(),
            href: "/about/".to_string(),
        }];
        let html = render_index(&config, &posts, &nav);
        assert!(html.contains("href=\"/blog/a/\""));
        assert!(html.contains("First"));
        assert!(html.contains("href=\"/about/\""));
        let first = html.find("First").unwrap();
        let second = html.find("Second").unwrap();
        assert!(first < second);
    }
}
