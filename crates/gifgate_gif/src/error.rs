//! Structural failure kinds for the GIF parser

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Why a byte buffer is not a well-formed GIF container.
///
/// `Display` renders the stable kind string that ends up in catalog reasons,
/// e.g. `too_small` or `unknown_block_0x3f`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GifError {
    #[error("too_small")]
    TooSmall,

    #[error("bad_signature")]
    BadSignature,

    #[error("short_image_descriptor")]
    ShortImageDescriptor,

    #[error("truncated_lzw")]
    TruncatedLzw,

    #[error("bad_extension_header")]
    BadExtensionHeader,

    #[error("unknown_block_0x{0:x}")]
    UnknownBlock(u8),

    #[error("missing_trailer")]
    MissingTrailer,
}

impl GifError {
    /// Kind string, identical to the `Display` output.
    pub fn kind(&self) -> String {
        self.to_string()
    }
}

impl Serialize for GifError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
