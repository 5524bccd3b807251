use thiserror::Error;

/// Result type alias for operations that may fail with [`BitmapError`].
pub type BitmapResult<T> = std::result::Result<T, BitmapError>;

/// Error types that can occur while packing, loading or tracing a bitmap.
///
/// Packing failures are reported whole: either a fully populated bitmap is
/// returned or one of these variants is, never a partial result.
#[derive(Debug, Error)]
pub enum BitmapError {
    /// The packed buffer size does not fit in `usize`.
    #[error("Bitmap of {width}x{height} pixels is too large to pack")]
    SizeOverflow { width: usize, height: usize },
    /// The allocator could not provide the packed buffer.
    #[error("Failed to allocate {bytes} bytes for the packed bitmap")]
    OutOfMemory { bytes: usize },
    /// The pixel buffer length does not match `width * height`.
    #[error("Expected {expected} pixel bytes, found {found}")]
    InvalidInput { expected: usize, found: usize },
    /// The dimensions cannot be expressed in potrace's `int` fields.
    #[error("Bitmap of {width}x{height} pixels exceeds potrace's dimension limits")]
    DescriptorOverflow { width: usize, height: usize },
    /// The dimensions do not fit the `u32` sides of an `image` buffer.
    #[error("Bitmap of {width}x{height} pixels does not fit in an image")]
    ImageDimensions { width: usize, height: usize },
    /// The bitmap buffer was released before it was handed to the tracer.
    #[error("Bitmap buffer has already been released")]
    Released,
    /// Tracing failed inside potrace.
    #[error("Tracing failed: {0}")]
    Trace(String),
    /// Image loading, decoding, or encoding error.
    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),
    /// File system I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
