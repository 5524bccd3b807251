//! Packing of 8-bit masks into potrace's word-aligned monochrome bitmaps.
//!
//! [`PackedBitmap::pack`] turns a row-major byte buffer into the layout
//! potrace reads directly, and [`PackedBitmap::as_raw`] hands it over as a
//! `potrace_bitmap_t`. With the `potrace` feature the crate also links
//! libpotrace and exposes [`potrace::trace`].

pub mod bitmap;
pub mod config;
pub mod error;
pub mod mask;
#[cfg(feature = "potrace")]
pub mod potrace;
pub mod vectorizer;

pub use bitmap::{PackedBitmap, RawBitmap, WORD_BITS, WORD_BYTES, Word};
pub use config::{MaskOptions, TraceParams, TurnPolicy};
pub use error::{BitmapError, BitmapResult};
pub use mask::{bitmap_to_gray_image, load_mask, pack_mask};
pub use vectorizer::MaskVectorizer;
#[cfg(feature = "potrace")]
pub use vectorizer::potrace::{PotraceOptions, PotraceVectorizer};
