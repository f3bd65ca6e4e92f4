//! Canvas allocation and tile placement

use std::fs;
use std::path::PathBuf;

use image::{imageops, DynamicImage, Rgba, RgbaImage};
use serde::Serialize;

use crate::assets::AssetEntry;
use crate::error::{CollageError, CollageResult};
use crate::format::ImageKind;
use crate::layout::{GridLayout, Slot};
use crate::wbmp;

/// White at zero alpha.
pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 0]);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub path: PathBuf,
    pub kind: ImageKind,
    pub slot: Slot,
    pub x: u32,
    pub y: u32,
}

/// The collage raster. Owned by one build and consumed by encoding.
pub struct Canvas {
    image: RgbaImage,
    layout: GridLayout,
    /// Colour GIF output maps to the palette's transparent index.
    transparent_key: Option<Rgba<u8>>,
}

impl Canvas {
    pub fn new(layout: GridLayout, output: ImageKind) -> Self {
        let (width, height) = layout.canvas_size();
        Self {
            image: RgbaImage::from_pixel(width, height, BACKGROUND),
            layout,
            transparent_key: (output == ImageKind::Gif).then_some(BACKGROUND),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn transparent_key(&self) -> Option<Rgba<u8>> {
        self.transparent_key
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Decode one asset and copy it verbatim into slot `index`.
    ///
    /// The decoded tile is dropped before returning, so at most one tile is
    /// held in memory alongside the canvas.
    pub fn place(&mut self, index: usize, entry: &AssetEntry) -> CollageResult<Placement> {
        let tile = decode_asset(entry)?;

        let expected = self.layout.tile_size();
        let actual = (tile.width(), tile.height());
        if actual != expected {
            return Err(CollageError::AssetDimensionMismatch {
                path: entry.path.clone(),
                expected,
                actual,
            });
        }

        let slot = self.layout.slot(index);
        let (x, y) = self.layout.origin(slot);
        imageops::replace(&mut self.image, &tile.to_rgba8(), i64::from(x), i64::from(y));
        tracing::debug!(path = %entry.path.display(), x, y, "placed tile");

        Ok(Placement {
            path: entry.path.clone(),
            kind: entry.kind,
            slot,
            x,
            y,
        })
    }
}

/// Decode with the codec matching the sniffed kind.
pub fn decode_asset(entry: &AssetEntry) -> CollageResult<DynamicImage> {
    let bytes = fs::read(&entry.path).map_err(|e| CollageError::io(&entry.path, e))?;
    let decoded = match entry.kind.image_format() {
        Some(format) => image::load_from_memory_with_format(&bytes, format),
        None => wbmp::decode(&bytes),
    };
    decoded.map_err(|source| CollageError::DecodeFailed {
        path: entry.path.clone(),
        source,
    })
}

/// Allocate a canvas and place every entry in order.
#[tracing::instrument(skip_all, fields(tiles = entries.len()))]
pub fn compose(
    entries: &[AssetEntry],
    layout: GridLayout,
    output: ImageKind,
) -> CollageResult<(Canvas, Vec<Placement>)> {
    let mut canvas = Canvas::new(layout, output);
    let placements = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| canvas.place(i, entry))
        .collect::<CollageResult<Vec<_>>>()?;
    Ok((canvas, placements))
}
