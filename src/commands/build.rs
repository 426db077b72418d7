//! Build the static site

use anyhow::Result;
use notify::Watcher;
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::content::loader::ContentLoader;
use crate::site::Generator;
use crate::Mica;

/// Build the whole site: load, render, assemble, write.
///
/// Fail-fast: any page error aborts the build before anything is published.
pub fn run(mica: &Mica) -> Result<()> {
    let start = std::time::Instant::now();

    let loader = ContentLoader::new(mica);
    let pages = loader.load_all()?;
    tracing::info!("Loaded {} pages", pages.len());

    let generator = Generator::new(mica);
    let site = generator.generate(pages)?;

    let duration = start.elapsed();
    tracing::info!(
        "Wrote {} documents ({} posts, {} pages) in {:.2}s",
        site.document_count(),
        site.posts.len(),
        site.pages.len(),
        duration.as_secs_f64()
    );

    Ok(())
}

/// Watch for content changes and rebuild
pub async fn watch(mica: &Mica) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    watcher.watch(mica.content_dir.as_ref(), notify::RecursiveMode::Recursive)?;

    let config_path = mica.base_dir.join("config.toml");
    if config_path.exists() {
        watcher.watch(Path::new(&config_path), notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    // Debounce events
    let mut last_rebuild = std::time::Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("Content changed, rebuilding...");
                    if let Err(e) = run(mica) {
                        tracing::error!("Build failed: {:#}", e);
                    }
                    last_rebuild = std::time::Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                // Continue waiting
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    Ok(())
}
