//! gifgate GIF - Structural GIF Container Parser
//!
//! Walks a GIF byte stream block by block and reports what the container
//! looks like: logical screen size, frame count, and whether the block chain
//! is well formed. Pixel data is never decompressed.
//!
//! # Contract
//!
//! [`parse`] always returns a [`GifMetadata`]; malformed input never panics.
//! On failure the record keeps whatever width/height/frame count was already
//! read, which is useful when triaging broken files.
//!
//! ```text
//! ┌────────────┐   ┌──────────────┐   ┌──────────────────────────────┐
//! │ header (6) │──▶│ screen desc. │──▶│ blocks: 0x2C / 0x21 / 0x3B   │
//! │ GIF8[79]a  │   │ (+ GCT)      │   │ (image / extension / trailer)│
//! └────────────┘   └──────────────┘   └──────────────────────────────┘
//! ```

pub mod block;
pub mod error;
pub mod parser;

pub use block::BlockKind;
pub use error::GifError;
pub use parser::{parse, GifMetadata, MIN_GIF_LEN};
