//! Block introducers that may follow the logical screen descriptor

/// Trailer byte; ends the stream.
pub const TRAILER: u8 = 0x3B;
/// Image descriptor introducer; one per frame.
pub const IMAGE_DESCRIPTOR: u8 = 0x2C;
/// Extension introducer (graphic control, application, comment, plain text).
pub const EXTENSION: u8 = 0x21;

/// Closed set of block kinds the walker dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Trailer,
    ImageDescriptor,
    Extension,
    Unknown(u8),
}

impl From<u8> for BlockKind {
    fn from(byte: u8) -> Self {
        match byte {
            TRAILER => Self::Trailer,
            IMAGE_DESCRIPTOR => Self::ImageDescriptor,
            EXTENSION => Self::Extension,
            other => Self::Unknown(other),
        }
    }
}

/// Size in bytes of a colour table announced by a packed descriptor byte.
///
/// High bit set means a table follows; the low three bits encode
/// `3 * 2^(n + 1)` bytes.
pub fn color_table_len(packed: u8) -> usize {
    if packed & 0x80 == 0 {
        return 0;
    }
    3 * (1usize << ((packed & 0x07) + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_kind_from_byte() {
        assert_eq!(BlockKind::from(0x3B), BlockKind::Trailer);
        assert_eq!(BlockKind::from(0x2C), BlockKind::ImageDescriptor);
        assert_eq!(BlockKind::from(0x21), BlockKind::Extension);
        assert_eq!(BlockKind::from(0x00), BlockKind::Unknown(0x00));
    }

    #[test]
    fn test_color_table_len() {
        assert_eq!(color_table_len(0x00), 0);
        // Size bits without the table flag are ignored
        assert_eq!(color_table_len(0x07), 0);
        assert_eq!(color_table_len(0x80), 6);
        assert_eq!(color_table_len(0x81), 12);
        assert_eq!(color_table_len(0x87), 768);
        assert_eq!(color_table_len(0xF7), 768);
    }
}
