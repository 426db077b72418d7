//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Mica;

/// Remove the public directory
pub fn run(mica: &Mica) -> Result<()> {
    if mica.public_dir.exists() {
        fs::remove_dir_all(&mica.public_dir)?;
        tracing::info!("Deleted: {:?}", mica.public_dir);
    }

    Ok(())
}
