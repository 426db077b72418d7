//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"title = "my site"
description = ""
author = ""
url = "http://example.com"
"#;

const SAMPLE_ABOUT: &str = r#"+++
title = "about me"

[extra]
in_header = true
+++

Hi. This page is rendered from `content/about.md`.
"#;

const SAMPLE_POST: &str = r#"+++
title = "hello world"
date = 2024-01-01
+++

A first post. Edit or delete me, then run `mica build`.
"#;

/// Scaffold a new site in the target directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("config.toml");
    if config_path.exists() {
        anyhow::bail!("{:?} already exists", config_path);
    }

    fs::create_dir_all(target_dir.join("content").join("blog"))?;
    fs::write(&config_path, DEFAULT_CONFIG)?;
    fs::write(target_dir.join("content").join("about.md"), SAMPLE_ABOUT)?;
    fs::write(
        target_dir.join("content").join("blog").join("hello-world.md"),
        SAMPLE_POST,
    )?;

    tracing::info!("Initialized site in {:?}", target_dir);
    Ok(())
}
