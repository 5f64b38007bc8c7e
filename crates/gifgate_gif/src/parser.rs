//! Block walker
//!
//! Every read is bounds-checked against the buffer; the outer loop is capped
//! at `len + 16` iterations so corrupt input always terminates.

use crate::block::{color_table_len, BlockKind};
use crate::error::GifError;
use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;

/// Buffers shorter than this are rejected before the signature check.
pub const MIN_GIF_LEN: usize = 14;

const SIGNATURE_87A: &[u8; 6] = b"GIF87a";
const SIGNATURE_89A: &[u8; 6] = b"GIF89a";

/// Signature (6) + logical screen descriptor (7).
const HEADER_LEN: usize = 13;
/// Offset of the packed byte inside an image descriptor (introducer included).
const IMAGE_PACKED_OFFSET: usize = 9;
/// Image descriptor length, introducer included.
const IMAGE_DESCRIPTOR_LEN: usize = 10;
const LOOP_SLACK: usize = 16;

/// Structural metadata for one buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GifMetadata {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u16>,
    pub frames: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<GifError>,
}

impl GifMetadata {
    fn ok(width: u16, height: u16, frames: u32) -> Self {
        Self {
            valid: true,
            width: Some(width),
            height: Some(height),
            frames,
            error: None,
        }
    }

    fn failed(error: GifError, dims: Option<(u16, u16)>, frames: u32) -> Self {
        Self {
            valid: false,
            width: dims.map(|(w, _)| w),
            height: dims.map(|(_, h)| h),
            frames,
            error: Some(error),
        }
    }

    /// Width and height, when the screen descriptor was read.
    pub fn dimensions(&self) -> Option<(u16, u16)> {
        self.width.zip(self.height)
    }
}

/// Parse a GIF container. Never panics.
pub fn parse(bytes: &[u8]) -> GifMetadata {
    if bytes.len() < MIN_GIF_LEN {
        return GifMetadata::failed(GifError::TooSmall, None, 0);
    }

    let signature = &bytes[..6];
    if signature != SIGNATURE_87A && signature != SIGNATURE_89A {
        return GifMetadata::failed(GifError::BadSignature, None, 0);
    }

    let width = LittleEndian::read_u16(&bytes[6..8]);
    let height = LittleEndian::read_u16(&bytes[8..10]);
    let packed = bytes[10];

    let mut walker = Walker {
        bytes,
        pos: HEADER_LEN + color_table_len(packed),
        frames: 0,
    };

    match walker.walk() {
        Ok(()) => GifMetadata::ok(width, height, walker.frames),
        Err(error) => GifMetadata::failed(error, Some((width, height)), walker.frames),
    }
}

struct Walker<'a> {
    bytes: &'a [u8],
    pos: usize,
    frames: u32,
}

impl Walker<'_> {
    /// Walk blocks until the trailer. `Ok` only when the trailer was found.
    fn walk(&mut self) -> Result<(), GifError> {
        let guard = self.bytes.len() + LOOP_SLACK;

        for _ in 0..guard {
            let Some(&introducer) = self.bytes.get(self.pos) else {
                break;
            };

            match BlockKind::from(introducer) {
                BlockKind::Trailer => return Ok(()),
                BlockKind::ImageDescriptor => self.image_descriptor()?,
                BlockKind::Extension => self.extension()?,
                BlockKind::Unknown(byte) => return Err(GifError::UnknownBlock(byte)),
            }
        }

        Err(GifError::MissingTrailer)
    }

    fn image_descriptor(&mut self) -> Result<(), GifError> {
        self.frames += 1;

        let local_packed = *self
            .bytes
            .get(self.pos + IMAGE_PACKED_OFFSET)
            .ok_or(GifError::ShortImageDescriptor)?;
        self.pos += IMAGE_DESCRIPTOR_LEN + color_table_len(local_packed);

        // LZW minimum code size
        if self.pos >= self.bytes.len() {
            return Err(GifError::TruncatedLzw);
        }
        self.pos += 1;

        self.skip_sub_blocks();
        Ok(())
    }

    fn extension(&mut self) -> Result<(), GifError> {
        // introducer + label
        if self.pos + 1 >= self.bytes.len() {
            return Err(GifError::BadExtensionHeader);
        }
        self.pos += 2;

        self.skip_sub_blocks();
        Ok(())
    }

    /// Consume `[len][data..len]` sub-blocks up to and including the zero
    /// terminator. Running off the end leaves `pos` past the buffer, which
    /// the outer loop reports as a missing trailer.
    fn skip_sub_blocks(&mut self) {
        while let Some(&len) = self.bytes.get(self.pos) {
            self.pos += 1;
            if len == 0 {
                return;
            }
            self.pos += len as usize;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1x1 GIF89a, 2-entry global table, one frame, empty sub-block chain.
    fn minimal_gif() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"GIF89a");
        bytes.extend_from_slice(&[1, 0, 1, 0, 0x80, 0, 0]);
        bytes.extend_from_slice(&[0, 0, 0, 0xff, 0xff, 0xff]);
        bytes.extend_from_slice(&[0x2C, 0, 0, 0, 0, 1, 0, 1, 0, 0]);
        bytes.push(0x02);
        bytes.push(0x00);
        bytes.push(0x3B);
        bytes
    }

    #[test]
    fn test_minimal_single_frame() {
        let meta = parse(&minimal_gif());
        assert!(meta.valid);
        assert_eq!(meta.frames, 1);
        assert_eq!(meta.dimensions(), Some((1, 1)));
        assert!(meta.error.is_none());
    }

    #[test]
    fn test_too_small_has_no_dimensions() {
        let meta = parse(b"GIF89a");
        assert_eq!(meta.error, Some(GifError::TooSmall));
        assert!(!meta.valid);
        assert_eq!(meta.dimensions(), None);
        assert_eq!(meta.frames, 0);
    }

    #[test]
    fn test_bad_signature() {
        let mut bytes = minimal_gif();
        bytes[3] = b'9';
        bytes[4] = b'0';
        let meta = parse(&bytes);
        assert_eq!(meta.error, Some(GifError::BadSignature));
        assert_eq!(meta.dimensions(), None);
    }

    #[test]
    fn test_gif87a_accepted() {
        let mut bytes = minimal_gif();
        bytes[4] = b'7';
        assert!(parse(&bytes).valid);
    }

    #[test]
    fn test_missing_trailer_keeps_partial_data() {
        let mut bytes = minimal_gif();
        bytes.pop();
        let meta = parse(&bytes);
        assert_eq!(meta.error, Some(GifError::MissingTrailer));
        assert_eq!(meta.dimensions(), Some((1, 1)));
        assert_eq!(meta.frames, 1);
    }

    #[test]
    fn test_unknown_block() {
        let mut bytes = minimal_gif();
        let last = bytes.len() - 1;
        bytes[last] = 0x3F;
        let meta = parse(&bytes);
        assert_eq!(meta.error, Some(GifError::UnknownBlock(0x3F)));
        assert_eq!(meta.error.map(|e| e.kind()).as_deref(), Some("unknown_block_0x3f"));
    }

    #[test]
    fn test_short_image_descriptor() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"GIF89a");
        bytes.extend_from_slice(&[4, 0, 4, 0, 0x00, 0, 0]);
        bytes.extend_from_slice(&[0x2C, 0, 0, 0]);
        let meta = parse(&bytes);
        assert_eq!(meta.error, Some(GifError::ShortImageDescriptor));
        assert_eq!(meta.frames, 1);
    }

    #[test]
    fn test_truncated_lzw() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"GIF89a");
        bytes.extend_from_slice(&[4, 0, 4, 0, 0x00, 0, 0]);
        bytes.extend_from_slice(&[0x2C, 0, 0, 0, 0, 4, 0, 4, 0, 0]);
        let meta = parse(&bytes);
        assert_eq!(meta.error, Some(GifError::TruncatedLzw));
    }

    #[test]
    fn test_bad_extension_header() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"GIF89a");
        bytes.extend_from_slice(&[4, 0, 4, 0, 0x00, 0, 0]);
        bytes.push(0x21);
        let meta = parse(&bytes);
        assert_eq!(meta.error, Some(GifError::BadExtensionHeader));
    }

    #[test]
    fn test_extension_is_skipped() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"GIF89a");
        bytes.extend_from_slice(&[2, 0, 3, 0, 0x00, 0, 0]);
        // Graphic control extension
        bytes.extend_from_slice(&[0x21, 0xF9, 0x04, 0, 0x0A, 0, 0, 0x00]);
        bytes.extend_from_slice(&[0x2C, 0, 0, 0, 0, 2, 0, 3, 0, 0]);
        bytes.extend_from_slice(&[0x02, 0x03, 0xAA, 0xBB, 0xCC, 0x00]);
        bytes.push(0x3B);
        let meta = parse(&bytes);
        assert!(meta.valid, "{:?}", meta.error);
        assert_eq!(meta.dimensions(), Some((2, 3)));
        assert_eq!(meta.frames, 1);
    }

    #[test]
    fn test_local_color_table_is_skipped() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"GIF89a");
        bytes.extend_from_slice(&[1, 0, 1, 0, 0x00, 0, 0]);
        bytes.extend_from_slice(&[0x2C, 0, 0, 0, 0, 1, 0, 1, 0, 0x80]);
        // Local table holds a 0x3B that must not be read as a trailer
        bytes.extend_from_slice(&[0x3B, 0, 0, 0, 0, 0]);
        bytes.extend_from_slice(&[0x02, 0x00, 0x3B]);
        let meta = parse(&bytes);
        assert!(meta.valid, "{:?}", meta.error);
        assert_eq!(meta.frames, 1);
    }

    #[test]
    fn test_sub_block_overrun_is_missing_trailer() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"GIF89a");
        bytes.extend_from_slice(&[1, 0, 1, 0, 0x00, 0, 0]);
        bytes.extend_from_slice(&[0x2C, 0, 0, 0, 0, 1, 0, 1, 0, 0]);
        bytes.extend_from_slice(&[0x02, 0xFF, 0x01]);
        let meta = parse(&bytes);
        assert_eq!(meta.error, Some(GifError::MissingTrailer));
    }

    #[test]
    fn test_metadata_json_shape() {
        let value = serde_json::to_value(parse(&minimal_gif())).unwrap();
        assert_eq!(value["valid"], true);
        assert_eq!(value["frames"], 1);
        assert!(value.get("error").is_none());

        let value = serde_json::to_value(parse(b"nope")).unwrap();
        assert_eq!(value["valid"], false);
        assert_eq!(value["error"], "too_small");
        assert!(value.get("width").is_none());
    }
}
