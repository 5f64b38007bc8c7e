//! gifgate Test Utilities
//!
//! - [`GifBuilder`]: synthesises structurally valid GIF bytes with a chosen
//!   screen size, frame count and approximate file size, plus helpers to break
//!   them in specific ways.
//! - [`TestCatalog`]: a catalog root in a temp directory with the default
//!   stage layout (`inbox/`, `approved/`, `rejected/`). Removed on drop.
//!
//! # Usage
//!
//! ```rust,ignore
//! use gifgate_test_utils::{GifBuilder, TestCatalog};
//!
//! let catalog = TestCatalog::new();
//! let bytes = GifBuilder::new(50, 50).frames(3).build();
//! catalog.drop_in_inbox("siren.gif", &bytes);
//! ```

pub mod catalog;
pub mod gif;

pub use catalog::TestCatalog;
pub use gif::GifBuilder;
