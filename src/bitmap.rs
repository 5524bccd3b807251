use std::marker::PhantomData;
use std::mem::size_of;
use std::os::raw::{c_int, c_ulong};

use log::debug;

use crate::{BitmapError, BitmapResult};

/// Machine word potrace packs scanlines into (`potrace_word`).
pub type Word = c_ulong;

/// Number of bytes in a [`Word`].
pub const WORD_BYTES: usize = size_of::<Word>();
/// Number of pixels stored in a [`Word`].
pub const WORD_BITS: usize = 8 * WORD_BYTES;

const HIGH_BIT: Word = 1 << (WORD_BITS - 1);

/// Number of words needed to hold one scanline of `width` pixels.
pub fn row_stride_words(width: usize) -> usize {
    if width == 0 {
        0
    } else {
        (width - 1) / WORD_BITS + 1
    }
}

/// Size in bytes of a packed buffer, or `None` if it does not fit in `usize`.
pub fn buffer_size(row_stride_words: usize, height: usize) -> Option<usize> {
    row_stride_words
        .checked_mul(height)?
        .checked_mul(WORD_BYTES)
}

/// Mask selecting column `x` inside its word, counted from the most significant bit.
fn bit_mask(x: usize) -> Word {
    HIGH_BIT >> (x % WORD_BITS)
}

fn allocate_words(len: usize) -> BitmapResult<Vec<Word>> {
    let mut words = Vec::new();
    words
        .try_reserve_exact(len)
        .map_err(|_| BitmapError::OutOfMemory {
            bytes: len.saturating_mul(WORD_BYTES),
        })?;
    words.resize(len, 0);
    Ok(words)
}

/// A one-bit-per-pixel raster in potrace's memory layout.
///
/// Rows are stored top to bottom, each padded to a whole number of words.
/// Within a word the leftmost pixel occupies the most significant bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBitmap {
    width: usize,
    height: usize,
    row_stride_words: usize,
    /// `None` once the buffer has been released.
    words: Option<Vec<Word>>,
}

impl PackedBitmap {
    /// Pack a row-major buffer of `width * height` bytes, where any non-zero
    /// byte marks a set pixel.
    pub fn pack(width: usize, height: usize, pixels: &[u8]) -> BitmapResult<Self> {
        let stride = row_stride_words(width);
        let bytes =
            buffer_size(stride, height).ok_or(BitmapError::SizeOverflow { width, height })?;
        let expected = width
            .checked_mul(height)
            .ok_or(BitmapError::SizeOverflow { width, height })?;
        if pixels.len() != expected {
            return Err(BitmapError::InvalidInput {
                expected,
                found: pixels.len(),
            });
        }

        let mut words = allocate_words(bytes / WORD_BYTES)?;
        if stride > 0 {
            let rows = pixels.chunks_exact(width);
            for (row, scanline) in rows.zip(words.chunks_exact_mut(stride)) {
                for (x, &value) in row.iter().enumerate() {
                    if value != 0 {
                        scanline[x / WORD_BITS] |= bit_mask(x);
                    }
                }
            }
        }

        debug!("Packed {width}x{height} bitmap into {bytes} bytes ({stride} words per row)");
        Ok(Self {
            width,
            height,
            row_stride_words: stride,
            words: Some(words),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of words per scanline.
    pub fn row_stride_words(&self) -> usize {
        self.row_stride_words
    }

    /// The packed words, or `None` if the buffer has been released.
    pub fn words(&self) -> Option<&[Word]> {
        self.words.as_deref()
    }

    pub fn is_released(&self) -> bool {
        self.words.is_none()
    }

    /// Free the packed buffer. Releasing an already released bitmap does nothing.
    pub fn release(&mut self) {
        if self.words.take().is_some() {
            debug!("Released {}x{} bitmap", self.width, self.height);
        }
    }

    /// Read the pixel at `(x, y)`. Returns `None` outside the bitmap or after release.
    pub fn get(&self, x: usize, y: usize) -> Option<bool> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let words = self.words.as_deref()?;
        let word = words[y * self.row_stride_words + x / WORD_BITS];
        Some((word & bit_mask(x)) != 0)
    }

    /// Number of set pixels. Padding bits are never set, so whole words are counted.
    pub fn count_set(&self) -> usize {
        self.words
            .as_deref()
            .map(|words| words.iter().map(|w| w.count_ones() as usize).sum())
            .unwrap_or(0)
    }

    /// Expand back into one byte per pixel (1 set, 0 clear). Empty after release.
    pub fn unpack(&self) -> Vec<u8> {
        let Some(words) = self.words.as_deref() else {
            return Vec::new();
        };
        let mut pixels = Vec::with_capacity(self.width * self.height);
        if self.row_stride_words == 0 {
            return pixels;
        }
        for scanline in words.chunks_exact(self.row_stride_words) {
            pixels.extend(
                (0..self.width).map(|x| u8::from((scanline[x / WORD_BITS] & bit_mask(x)) != 0)),
            );
        }
        pixels
    }

    /// Borrow the bitmap as potrace's `potrace_bitmap_t` descriptor.
    pub fn as_raw(&self) -> BitmapResult<RawBitmap<'_>> {
        let words = self.words.as_deref().ok_or(BitmapError::Released)?;
        let overflow = || BitmapError::DescriptorOverflow {
            width: self.width,
            height: self.height,
        };
        Ok(RawBitmap {
            w: c_int::try_from(self.width).map_err(|_| overflow())?,
            h: c_int::try_from(self.height).map_err(|_| overflow())?,
            dy: c_int::try_from(self.row_stride_words).map_err(|_| overflow())?,
            map: words.as_ptr(),
            _words: PhantomData,
        })
    }
}

/// Binary-compatible view of `potrace_bitmap_t`: `{ int w, h; int dy; potrace_word *map; }`.
///
/// potrace only reads through `map`, so the pointer is handed out as `const`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawBitmap<'a> {
    pub w: c_int,
    pub h: c_int,
    pub dy: c_int,
    pub map: *const Word,
    _words: PhantomData<&'a [Word]>,
}
