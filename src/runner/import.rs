//! The image import pipeline.
//!
//! One call imports a whole directory tree: every file with a supported
//! extension is normalized, re-encoded, and staged as an insert. The walk
//! runs inside a single transaction committed at the end, so a
//! directory-level failure leaves no partial work behind. Per-file
//! failures only skip that file.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::imaging;
use crate::storage::Database;

/// Extensions recognized as importable images, compared case-insensitively.
const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// A failure of the whole import, as opposed to a single file. These
/// propagate to the dispatcher and fail the directive.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("source directory does not exist: {0}")]
    MissingDirectory(PathBuf),
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Counts for one completed import directive.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Files normalized, encoded, and staged successfully.
    pub imported: usize,
    /// Supported files that failed to decode or encode and were skipped.
    pub failed: usize,
}

/// Imports every supported image under `dir` into the store as
/// `width` x `height` letterboxed JPEG records tagged with `category`.
///
/// All inserts from one call share a transaction. On success it is
/// committed once after the walk; on a directory-level error it is rolled
/// back, so no partial import is ever persisted.
pub fn import_directory(
    db: &Database,
    dir: &Path,
    category: &str,
    width: u32,
    height: u32,
) -> Result<ImportSummary, ImportError> {
    if !dir.is_dir() {
        return Err(ImportError::MissingDirectory(dir.to_path_buf()));
    }

    db.ensure_schema()?;
    db.begin()?;

    match stage_directory(db, dir, category, width, height) {
        Ok(summary) => {
            db.commit()?;
            info!(
                "image import complete: {} imported, {} failed",
                summary.imported, summary.failed
            );
            Ok(summary)
        }
        Err(err) => {
            if let Err(rollback_err) = db.rollback() {
                error!("rollback after failed import also failed: {rollback_err:#}");
            }
            Err(err)
        }
    }
}

fn stage_directory(
    db: &Database,
    dir: &Path,
    category: &str,
    width: u32,
    height: u32,
) -> Result<ImportSummary, ImportError> {
    let mut summary = ImportSummary::default();

    for entry in WalkDir::new(dir) {
        // Walk errors (unreadable subdirectory, dangling symlink) are
        // directory-level, not per-file.
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !is_supported(path) {
            continue;
        }

        match normalize_and_encode(path, width, height) {
            Ok(blob) => {
                let name = file_stem(path);
                db.insert_image(&name, category, &blob)?;
                summary.imported += 1;
                info!("imported image {} (category: {category})", path.display());
            }
            Err(err) => {
                summary.failed += 1;
                warn!("failed to import {}: {err:#}", path.display());
            }
        }
    }

    Ok(summary)
}

fn normalize_and_encode(path: &Path, width: u32, height: u32) -> anyhow::Result<Vec<u8>> {
    let canvas = imaging::normalize(path, width, height, imaging::DEFAULT_FILL)?;
    imaging::encode_jpeg(&canvas)
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
