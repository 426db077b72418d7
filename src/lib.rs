//! mica: a small static site generator for personal sites
//!
//! This crate turns a directory of markdown sources with TOML front matter
//! into a set of static HTML pages: an index, date-ordered blog posts with
//! previous/next navigation, and standalone pages.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod site;
pub mod templates;

use anyhow::Result;
use std::path::Path;

pub use error::BuildError;

/// The main mica application
#[derive(Clone)]
pub struct Mica {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Content (source) directory
    pub content_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Mica {
    /// Create a new Mica instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("config.toml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        })
    }

    /// Build the static site
    pub fn build(&self) -> Result<()> {
        commands::build::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
