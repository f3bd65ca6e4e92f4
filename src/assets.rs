//! Asset enumeration

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::capability::Capabilities;
use crate::error::{CollageError, CollageResult};
use crate::format::ImageKind;
use crate::natural::natural_cmp;
use crate::sniff::sniff_file;

/// Files this small cannot hold a readable image header.
pub const MIN_ASSET_BYTES: u64 = 11;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetEntry {
    pub path: PathBuf,
    /// Detected from content, not from the file name.
    pub kind: ImageKind,
}

/// Scan `dir` for images the codec table can handle.
///
/// Exactly `expected` entries must be found. They are returned in natural
/// order of their full paths, which is also their placement order. A
/// missing directory counts as zero entries.
#[tracing::instrument(skip(caps))]
pub fn enumerate(
    dir: &Path,
    caps: &Capabilities,
    expected: usize,
) -> CollageResult<Vec<AssetEntry>> {
    let mut entries = vec![];

    if dir.is_dir() {
        for entry in fs::read_dir(dir).map_err(|e| CollageError::io(dir, e))? {
            let path = entry.map_err(|e| CollageError::io(dir, e))?.path();
            let meta = match fs::metadata(&path) {
                Ok(m) if m.is_file() => m,
                _ => continue,
            };
            if meta.len() <= MIN_ASSET_BYTES {
                tracing::debug!(path = %path.display(), "skipping tiny file");
                continue;
            }

            match sniff_file(&path, meta.len())? {
                Some(kind) if caps.supports(kind) => entries.push(AssetEntry { path, kind }),
                Some(kind) => {
                    tracing::warn!(path = %path.display(), %kind, "skipping unsupported image")
                }
                None => tracing::debug!(path = %path.display(), "skipping non-image file"),
            }
        }
    }

    if entries.len() != expected {
        return Err(CollageError::AssetCountMismatch {
            found: entries.len(),
            expected,
        });
    }

    entries.sort_by(|a, b| natural_cmp(&a.path.to_string_lossy(), &b.path.to_string_lossy()));
    Ok(entries)
}
