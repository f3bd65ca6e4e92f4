//! Encoding and emission
//!
//! The canvas is serialised once. The bytes go to the output file first and
//! then, for request-serving invocations only, to the response sink.

use std::io::{self, Cursor, Write};
use std::path::PathBuf;

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::capability::Capabilities;
use crate::compositor::Canvas;
use crate::error::{CollageError, CollageResult};
use crate::format::ImageKind;
use crate::target::OutputTarget;
use crate::wbmp;

/// Receives the encoded collage in a request-serving context.
pub trait ResponseSink {
    fn content_type(&mut self, mime: &str) -> io::Result<()>;
    fn body(&mut self, bytes: &[u8]) -> io::Result<()>;
}

/// Keeps the response in memory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BufferedResponse {
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl ResponseSink for BufferedResponse {
    fn content_type(&mut self, mime: &str) -> io::Result<()> {
        self.content_type = Some(mime.to_string());
        Ok(())
    }

    fn body(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.body.extend_from_slice(bytes);
        Ok(())
    }
}

/// CGI response: header block, blank line, then the body.
pub struct CgiResponse<W: Write> {
    out: W,
    started: bool,
}

impl<W: Write> CgiResponse<W> {
    pub fn new(out: W) -> Self {
        Self { out, started: false }
    }

    /// Whether the header block has gone out.
    pub fn started(&self) -> bool {
        self.started
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResponseSink for CgiResponse<W> {
    fn content_type(&mut self, mime: &str) -> io::Result<()> {
        self.started = true;
        write!(self.out, "Content-Type: {mime}\r\n\r\n")
    }

    fn body(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.write_all(bytes)?;
        self.out.flush()
    }
}

/// How the build was invoked.
pub enum Invocation<'a> {
    /// Offline: write the file only.
    Batch,
    /// Serving a request: emit the bytes to the sink as well.
    Interactive(&'a mut dyn ResponseSink),
}

impl Invocation<'_> {
    pub fn is_interactive(&self) -> bool {
        matches!(self, Invocation::Interactive(_))
    }
}

/// Serialise the canvas in the format named by the target's extension.
///
/// The extension is looked up again here; a target that somehow carries an
/// unknown or unsupported extension is rejected rather than producing nothing.
pub fn encode_for_target(
    canvas: Canvas,
    target: &OutputTarget,
    caps: &Capabilities,
) -> CollageResult<Vec<u8>> {
    let kind = caps.require_extension(&target.extension)?;
    if kind != target.kind {
        return Err(CollageError::UnsupportedFormat {
            requested: target.extension.clone(),
            supported: caps.describe(),
        });
    }
    encode(canvas, kind)
}

pub fn encode(canvas: Canvas, kind: ImageKind) -> CollageResult<Vec<u8>> {
    let transparent_key = canvas.transparent_key();
    let mut image = canvas.into_image();

    match kind {
        ImageKind::Jpeg => {
            // No alpha channel; the white background shows through.
            let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
            write_with(DynamicImage::ImageRgb8(rgb), ImageFormat::Jpeg)
        }
        ImageKind::Png => write_with(DynamicImage::ImageRgba8(image), ImageFormat::Png),
        ImageKind::Bmp => write_with(DynamicImage::ImageRgba8(image), ImageFormat::Bmp),
        ImageKind::Gif => {
            if let Some(key) = transparent_key {
                mark_transparent(&mut image, key);
            }
            write_with(DynamicImage::ImageRgba8(image), ImageFormat::Gif)
        }
        ImageKind::Wbmp => Ok(wbmp::encode(&image)),
    }
}

/// GIF transparency is all-or-nothing, and the encoder gives its transparent
/// palette index to zero-alpha pixels. Mostly transparent pixels become the
/// key colour, the rest become opaque.
fn mark_transparent(image: &mut RgbaImage, key: image::Rgba<u8>) {
    for px in image.pixels_mut() {
        if px.0[3] < 128 {
            *px = key;
        } else {
            px.0[3] = 255;
        }
    }
}

fn write_with(image: DynamicImage, format: ImageFormat) -> CollageResult<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, format)
        .map_err(|e| CollageError::Encode(format!("{format:?}: {e}")))?;
    Ok(cursor.into_inner())
}

/// Write the output file, then stream the same bytes to the response sink
/// when serving a request.
///
/// The file is written to a temporary sibling and renamed into place, so a
/// failed build never leaves a partial collage behind. The sink sees nothing
/// unless the file is in place. The file gets ordinary `0644` permissions
/// (less the umask) rather than the private mode of a temporary file.
#[tracing::instrument(skip(bytes, invocation), fields(len = bytes.len()))]
pub fn emit(
    bytes: &[u8],
    target: &OutputTarget,
    invocation: Invocation<'_>,
) -> CollageResult<PathBuf> {
    let path = target.path();
    let mut tmp = temp_builder()
        .tempfile_in(&target.dir)
        .map_err(|e| CollageError::io(&target.dir, e))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| CollageError::io(tmp.path(), e))?;
    tmp.persist(&path)
        .map_err(|e| CollageError::io(&path, e.error))?;
    tracing::info!(path = %path.display(), "collage written");

    if let Invocation::Interactive(sink) = invocation {
        sink.content_type(&target.kind.mime_type())
            .and_then(|_| sink.body(bytes))
            .map_err(CollageError::Response)?;
    }

    Ok(path)
}

fn temp_builder() -> tempfile::Builder<'static, 'static> {
    #[allow(unused_mut)]
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o644));
    }
    builder
}
