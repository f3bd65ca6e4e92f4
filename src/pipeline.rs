//! Collage pipeline - single entry point
//!
//! resolve target -> enumerate assets -> compose -> encode once -> emit.
//! Any failure aborts the build before the output file is touched.

use std::path::PathBuf;

use serde::Serialize;

use crate::assets;
use crate::capability::Capabilities;
use crate::compositor::{self, Placement};
use crate::encode::{self, Invocation};
use crate::error::CollageResult;
use crate::format::ImageKind;
use crate::hashing::sha256_hex;
use crate::layout::GridLayout;
use crate::target::OutputTarget;

pub const ASSET_DIR_NAME: &str = "assets";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollageConfig {
    /// Default output directory.
    pub root: PathBuf,
    /// Source images.
    pub asset_dir: PathBuf,
}

impl CollageConfig {
    /// `<root>/assets` holds the source images.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            asset_dir: root.join(ASSET_DIR_NAME),
            root,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub output: PathBuf,
    pub format: ImageKind,
    pub content_type: String,
    pub width: u32,
    pub height: u32,
    pub placements: Vec<Placement>,
    pub byte_len: usize,
    pub sha256: String,
}

pub struct CollageBuilder {
    caps: Capabilities,
    config: CollageConfig,
    layout: GridLayout,
}

impl CollageBuilder {
    pub fn new(caps: Capabilities, config: CollageConfig) -> Self {
        Self {
            caps,
            config,
            layout: GridLayout::standard(),
        }
    }

    /// Detect codec capabilities and build with them.
    pub fn detect(config: CollageConfig) -> CollageResult<Self> {
        Ok(Self::new(Capabilities::detect()?, config))
    }

    /// Build the collage.
    ///
    /// `requested` is the caller's output path, if any. In an interactive
    /// invocation the encoded bytes are also sent to the response sink.
    #[tracing::instrument(skip(self, invocation), fields(interactive = invocation.is_interactive()))]
    pub fn build(
        &self,
        requested: Option<&str>,
        invocation: Invocation<'_>,
    ) -> CollageResult<BuildReport> {
        let target = OutputTarget::resolve(requested, &self.config.root, &self.caps)?;
        let entries = assets::enumerate(&self.config.asset_dir, &self.caps, self.layout.count)?;

        let (canvas, placements) = compositor::compose(&entries, self.layout, target.kind)?;
        let (width, height) = canvas.dimensions();

        let bytes = encode::encode_for_target(canvas, &target, &self.caps)?;
        let sha256 = sha256_hex(&bytes);
        let output = encode::emit(&bytes, &target, invocation)?;

        Ok(BuildReport {
            output,
            format: target.kind,
            content_type: target.kind.mime_type(),
            width,
            height,
            placements,
            byte_len: bytes.len(),
            sha256,
        })
    }
}
