//! Image kinds and the extension table shared by validation and codec dispatch.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Jpeg,
    Png,
    Bmp,
    Gif,
    Wbmp,
}

/// Extension → kind. Consulted by target resolution and by the encoder.
const EXTENSIONS: &[(&str, ImageKind)] = &[
    ("jpeg", ImageKind::Jpeg),
    ("jpg", ImageKind::Jpeg),
    ("jfif", ImageKind::Jpeg),
    ("jpe", ImageKind::Jpeg),
    ("png", ImageKind::Png),
    ("bmp", ImageKind::Bmp),
    ("wbmp", ImageKind::Wbmp),
    ("gif", ImageKind::Gif),
];

impl ImageKind {
    pub const ALL: [ImageKind; 5] = [
        ImageKind::Jpeg,
        ImageKind::Png,
        ImageKind::Bmp,
        ImageKind::Gif,
        ImageKind::Wbmp,
    ];

    /// Look up a file extension. Matching is exact, like the extension table.
    pub fn from_extension(ext: &str) -> Option<Self> {
        EXTENSIONS
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, kind)| *kind)
    }

    /// Canonical type name, the part after `image/` in the MIME type.
    pub fn type_name(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpeg",
            ImageKind::Png => "png",
            ImageKind::Bmp => "bmp",
            ImageKind::Gif => "gif",
            ImageKind::Wbmp => "vnd.wap.wbmp",
        }
    }

    pub fn mime_type(self) -> String {
        format!("image/{}", self.type_name())
    }

    /// Normalise a MIME type (`image/png`) or bare type name (`png`) to a kind.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let ty = mime.rsplit_once('/').map_or(mime, |(_, t)| t);
        Self::ALL.into_iter().find(|k| k.type_name() == ty)
    }

    /// The `image` crate format backing this kind. WBMP has none.
    pub fn image_format(self) -> Option<image::ImageFormat> {
        match self {
            ImageKind::Jpeg => Some(image::ImageFormat::Jpeg),
            ImageKind::Png => Some(image::ImageFormat::Png),
            ImageKind::Bmp => Some(image::ImageFormat::Bmp),
            ImageKind::Gif => Some(image::ImageFormat::Gif),
            ImageKind::Wbmp => None,
        }
    }

    pub fn from_image_format(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Jpeg => Some(ImageKind::Jpeg),
            image::ImageFormat::Png => Some(ImageKind::Png),
            image::ImageFormat::Bmp => Some(ImageKind::Bmp),
            image::ImageFormat::Gif => Some(ImageKind::Gif),
            _ => None,
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}
