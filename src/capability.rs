//! Codec capability table
//!
//! Computed once at startup and passed by reference to every component
//! that needs to know which formats can be both decoded and encoded.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::{CollageError, CollageResult};
use crate::format::ImageKind;

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    formats: BTreeSet<ImageKind>,
}

impl Capabilities {
    /// Query the compiled-in codecs.
    ///
    /// Fails when no codec is usable at all, or when magic-byte detection
    /// does not recognise a known signature.
    pub fn detect() -> CollageResult<Self> {
        if !matches!(image::guess_format(PNG_SIGNATURE), Ok(image::ImageFormat::Png)) {
            return Err(CollageError::MissingCapability(
                "content-based format detection is unavailable".to_string(),
            ));
        }

        let formats: BTreeSet<_> = ImageKind::ALL
            .into_iter()
            .filter(|kind| match kind.image_format() {
                Some(format) => format.reading_enabled() && format.writing_enabled(),
                // Built in, see `wbmp`.
                None => true,
            })
            .collect();

        let caps = Self::from_formats(formats)?;
        tracing::debug!(supported = %caps.describe(), "codec capabilities detected");
        Ok(caps)
    }

    /// Build a table from an explicit format list.
    pub fn from_formats(formats: impl IntoIterator<Item = ImageKind>) -> CollageResult<Self> {
        let formats: BTreeSet<_> = formats.into_iter().collect();
        if formats.is_empty() {
            return Err(CollageError::MissingCapability(
                "no image codec is available".to_string(),
            ));
        }
        Ok(Self { formats })
    }

    pub fn supports(&self, kind: ImageKind) -> bool {
        self.formats.contains(&kind)
    }

    /// Comma-separated type names, for error messages.
    pub fn describe(&self) -> String {
        self.formats
            .iter()
            .map(|k| k.type_name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Check an extension against the table.
    pub fn require_extension(&self, ext: &str) -> CollageResult<ImageKind> {
        match ImageKind::from_extension(ext) {
            Some(kind) if self.supports(kind) => Ok(kind),
            _ => Err(CollageError::UnsupportedFormat {
                requested: ext.to_string(),
                supported: self.describe(),
            }),
        }
    }
}
