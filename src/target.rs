//! Output target resolution

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::capability::Capabilities;
use crate::error::{CollageError, CollageResult};
use crate::format::ImageKind;

pub const DEFAULT_FILENAME: &str = "result";
pub const DEFAULT_EXTENSION: &str = "png";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputTarget {
    pub dir: PathBuf,
    pub filename: String,
    /// Extension as requested, e.g. `jpe`.
    pub extension: String,
    pub kind: ImageKind,
}

impl OutputTarget {
    /// Resolve an optional caller-supplied path.
    ///
    /// Without one, the collage goes to `<default_dir>/result.png`. A bare
    /// file name (no directory part) also lands in `default_dir`. A missing
    /// directory is created once the name and extension are known to be good.
    pub fn resolve(
        requested: Option<&str>,
        default_dir: &Path,
        caps: &Capabilities,
    ) -> CollageResult<Self> {
        let default_kind = caps.require_extension(DEFAULT_EXTENSION)?;

        let requested = match requested {
            Some(r) if !r.is_empty() => r,
            _ => {
                return Ok(Self {
                    dir: default_dir.to_path_buf(),
                    filename: DEFAULT_FILENAME.to_string(),
                    extension: DEFAULT_EXTENSION.to_string(),
                    kind: default_kind,
                })
            }
        };

        let path = Path::new(requested);
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| CollageError::InvalidFilename(requested.to_string()))?;

        let (stem, extension) = match name.rsplit_once('.') {
            Some((stem, ext)) => (stem, Some(ext)),
            None => (name, None),
        };
        if stem.is_empty() {
            return Err(CollageError::InvalidFilename(requested.to_string()));
        }

        let kind = caps.require_extension(extension.unwrap_or_default())?;

        let dir = match path.parent() {
            Some(parent) if !is_current_dir(parent) => {
                if !parent.is_dir() {
                    fs::create_dir_all(parent).map_err(|source| {
                        CollageError::DirectoryCreateFailed {
                            path: parent.to_path_buf(),
                            source,
                        }
                    })?;
                    tracing::info!(dir = %parent.display(), "created output directory");
                }
                parent.to_path_buf()
            }
            _ => default_dir.to_path_buf(),
        };

        Ok(Self {
            dir,
            filename: stem.to_string(),
            extension: extension.unwrap_or_default().to_string(),
            kind,
        })
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.{}", self.filename, self.extension))
    }
}

fn is_current_dir(p: &Path) -> bool {
    p.as_os_str().is_empty() || p == Path::new(".")
}
