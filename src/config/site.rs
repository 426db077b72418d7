//! Site configuration (config.toml)

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,
    /// Section under content_dir whose pages are treated as blog posts
    pub blog_dir: String,

    // Writing
    pub render_drafts: bool,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: IndexMap<String, toml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "mica".to_string(),
            description: String::new(),
            author: String::new(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),

            content_dir: "content".to_string(),
            public_dir: "public".to_string(),
            blog_dir: "blog".to_string(),

            render_drafts: false,

            extra: IndexMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("failed to read {:?}", path.as_ref()))?;
        let config: SiteConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse {:?}", path.as_ref()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "mica");
        assert_eq!(config.content_dir, "content");
        assert_eq!(config.blog_dir, "blog");
        assert!(!config.render_drafts);
    }

    #[test]
    fn test_parse_config() {
        let raw = r#"
title = "field notes"
author = "Nina"
url = "https://example.net"
render_drafts = true
github_username = "nholt"
"#;
        let config: SiteConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.title, "field notes");
        assert_eq!(config.author, "Nina");
        assert!(config.render_drafts);
        assert_eq!(
            config.extra.get("github_username").and_then(|v| v.as_str()),
            Some("nholt")
        );
    }
}
