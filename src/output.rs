//! JSON output for extraction results.
//!
//! Each result is written as `{json_output_dir}/{stem}.info.json`, where the
//! stem is the video id or, for an unresolved delegation, the target platform
//! plus a slug of the target URL (see [`Extraction::stem`]).

use crate::error::Result;
use crate::models::Extraction;
use std::fs as stdfs;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Pretty-printed JSON for one result.
pub fn to_json(extraction: &Extraction) -> Result<String> {
    Ok(serde_json::to_string_pretty(extraction)?)
}

/// Write an [`Extraction`] to `{json_output_dir}/{stem}.info.json`.
///
/// # Returns
///
/// The path written to.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir.display()))]
pub async fn write_info_json(extraction: &Extraction, json_output_dir: &Path) -> Result<PathBuf> {
    let json = to_json(extraction)?;

    if let Err(e) = fs::create_dir_all(json_output_dir).await {
        error!(error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = json_output_dir.join(format!("{}.info.json", extraction.stem()));
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote info JSON");
    Ok(path)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).await?;
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = path.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}
