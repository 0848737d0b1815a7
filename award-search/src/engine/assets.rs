///! Asset saving shared by engine implementations
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// Write a raw response asset, creating parent directories as needed.
pub async fn save_json_asset(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .context(format!("Failed to create asset directory: {:?}", parent))?;
    }
    fs::write(path, contents)
        .await
        .context(format!("Failed to write asset: {:?}", path))?;
    tracing::debug!("Saved asset: {:?}", path);
    Ok(())
}
