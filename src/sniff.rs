//! Magic-byte detection. The file name is never consulted.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{CollageError, CollageResult};
use crate::format::ImageKind;
use crate::wbmp;

/// Enough for every signature `image::guess_format` checks and a WBMP header.
const SNIFF_LEN: u64 = 32;

/// Detect the kind from leading bytes and the total length.
pub fn sniff_bytes(prefix: &[u8], total_len: u64) -> Option<ImageKind> {
    if let Some(kind) = image::guess_format(prefix)
        .ok()
        .and_then(ImageKind::from_image_format)
    {
        return Some(kind);
    }
    wbmp::is_wbmp_prefix(prefix, total_len).then_some(ImageKind::Wbmp)
}

/// Read the head of a file and detect its kind.
pub fn sniff_file(path: &Path, total_len: u64) -> CollageResult<Option<ImageKind>> {
    let file = File::open(path).map_err(|e| CollageError::io(path, e))?;
    let mut prefix = Vec::with_capacity(SNIFF_LEN as usize);
    file.take(SNIFF_LEN)
        .read_to_end(&mut prefix)
        .map_err(|e| CollageError::io(path, e))?;
    Ok(sniff_bytes(&prefix, total_len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signatures() {
        let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
        assert_eq!(sniff_bytes(png, 100), Some(ImageKind::Png));

        let jpeg = b"\xFF\xD8\xFF\xE0\0\x10JFIF\0";
        assert_eq!(sniff_bytes(jpeg, 100), Some(ImageKind::Jpeg));

        assert_eq!(sniff_bytes(b"GIF89a\x01\0\x01\0\0\0", 100), Some(ImageKind::Gif));
        assert_eq!(sniff_bytes(b"BM\0\0\0\0\0\0\0\0\0\0", 100), Some(ImageKind::Bmp));
    }

    #[test]
    fn test_wbmp_by_header_and_length() {
        // 8x2, one byte per row.
        let bytes = [0u8, 0, 8, 2, 0xFF, 0x00];
        assert_eq!(sniff_bytes(&bytes, 6), Some(ImageKind::Wbmp));
        assert_eq!(sniff_bytes(&bytes, 7), None);
    }

    #[test]
    fn test_plain_text_is_not_an_image() {
        assert_eq!(sniff_bytes(b"hello, world, not an image", 26), None);
    }
}
