//! WBMP (type 0) codec
//!
//! Monochrome, one bit per pixel, rows padded to whole bytes, 1 = white.
//! The `image` crate has no WBMP support, so the format is handled here.

use image::error::{DecodingError, ImageFormatHint};
use image::{DynamicImage, GrayImage, ImageError, ImageResult, Luma, RgbaImage};

/// Longest multi-byte integer accepted in a header field.
const MAX_FIELD_BYTES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub width: u32,
    pub height: u32,
    /// Offset of the first pixel row.
    pub data_offset: usize,
}

impl Header {
    fn row_bytes(&self) -> usize {
        (self.width as usize).div_ceil(8)
    }

    fn data_len(&self) -> usize {
        self.row_bytes() * self.height as usize
    }
}

fn read_multibyte(bytes: &[u8], pos: &mut usize) -> Option<u32> {
    let mut value: u32 = 0;
    for i in 0..MAX_FIELD_BYTES {
        let b = *bytes.get(*pos + i)?;
        value = (value << 7) | u32::from(b & 0x7F);
        if b & 0x80 == 0 {
            *pos += i + 1;
            return Some(value);
        }
    }
    None
}

fn write_multibyte(out: &mut Vec<u8>, value: u32) {
    let mut groups = vec![(value & 0x7F) as u8];
    let mut rest = value >> 7;
    while rest > 0 {
        groups.push((rest & 0x7F) as u8 | 0x80);
        rest >>= 7;
    }
    out.extend(groups.iter().rev());
}

/// Parse a type 0 header without checking the payload length.
pub fn parse_header(bytes: &[u8]) -> Option<Header> {
    let mut pos = 0;
    if read_multibyte(bytes, &mut pos)? != 0 {
        return None;
    }
    // Extension headers are not used by type 0.
    if *bytes.get(pos)? != 0 {
        return None;
    }
    pos += 1;
    let width = read_multibyte(bytes, &mut pos)?;
    let height = read_multibyte(bytes, &mut pos)?;
    Some(Header { width, height, data_offset: pos })
}

/// Strict check used for content sniffing: a WBMP has no magic number,
/// so the header must be well formed and the payload length exact.
pub fn is_wbmp(bytes: &[u8]) -> bool {
    is_wbmp_prefix(bytes, bytes.len() as u64)
}

/// Same as [`is_wbmp`] given only the leading bytes and the full length.
pub fn is_wbmp_prefix(prefix: &[u8], total_len: u64) -> bool {
    match parse_header(prefix) {
        Some(h) if h.width > 0 && h.height > 0 => {
            total_len.checked_sub(h.data_offset as u64) == Some(h.data_len() as u64)
        }
        _ => false,
    }
}

fn decode_error(msg: &str) -> ImageError {
    ImageError::Decoding(DecodingError::new(
        ImageFormatHint::Name("WBMP".to_string()),
        msg.to_string(),
    ))
}

pub fn decode(bytes: &[u8]) -> ImageResult<DynamicImage> {
    let header = parse_header(bytes).ok_or_else(|| decode_error("malformed header"))?;
    let data = &bytes[header.data_offset..];
    if data.len() < header.data_len() {
        return Err(decode_error("truncated pixel data"));
    }

    let row_bytes = header.row_bytes();
    let img = GrayImage::from_fn(header.width, header.height, |x, y| {
        let byte = data[y as usize * row_bytes + x as usize / 8];
        let bit = (byte >> (7 - (x % 8))) & 1;
        Luma([if bit == 1 { 255 } else { 0 }])
    });
    Ok(DynamicImage::ImageLuma8(img))
}

/// Threshold at 50% luminance. Transparent pixels count as white.
pub fn encode(img: &RgbaImage) -> Vec<u8> {
    let header = Header {
        width: img.width(),
        height: img.height(),
        data_offset: 0,
    };
    let mut out = vec![0, 0];
    write_multibyte(&mut out, header.width);
    write_multibyte(&mut out, header.height);

    let row_bytes = header.row_bytes();
    for row in img.rows() {
        let mut packed = vec![0u8; row_bytes];
        for (x, px) in row.enumerate() {
            let [r, g, b, a] = px.0;
            let luma = (u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000;
            if a == 0 || luma >= 128 {
                packed[x / 8] |= 0x80 >> (x % 8);
            }
        }
        out.extend_from_slice(&packed);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_multibyte_width() {
        let mut out = vec![];
        write_multibyte(&mut out, 362);
        assert_eq!(out, vec![0x82, 0x6A]);

        let mut pos = 0;
        assert_eq!(read_multibyte(&out, &mut pos), Some(362));
        assert_eq!(pos, 2);
    }

    #[test]
    fn test_encode_then_sniff_and_decode() {
        let mut img = RgbaImage::from_pixel(10, 3, Rgba([255, 255, 255, 255]));
        img.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        img.put_pixel(9, 2, Rgba([0, 0, 0, 0]));

        let bytes = encode(&img);
        assert!(is_wbmp(&bytes));

        let decoded = decode(&bytes).unwrap().to_luma8();
        assert_eq!(decoded.dimensions(), (10, 3));
        assert_eq!(decoded.get_pixel(0, 0).0, [0]);
        assert_eq!(decoded.get_pixel(1, 0).0, [255]);
        assert_eq!(decoded.get_pixel(9, 2).0, [255]);
    }

    #[test]
    fn test_rejects_wrong_length() {
        let img = RgbaImage::from_pixel(8, 2, Rgba([0, 0, 0, 255]));
        let mut bytes = encode(&img);
        bytes.push(0);
        assert!(!is_wbmp(&bytes));
        assert!(!is_wbmp(b"\x00\x00"));
        assert!(!is_wbmp(b"GIF89a........"));
    }

    #[test]
    fn test_truncated_decode_fails() {
        let img = RgbaImage::from_pixel(16, 4, Rgba([0, 0, 0, 255]));
        let bytes = encode(&img);
        assert!(decode(&bytes[..bytes.len() - 1]).is_err());
    }
}
