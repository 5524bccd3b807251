use image::GrayImage;

use crate::BitmapResult;

/// A trait representing an algorithm that can turn a mask into a vector representation.
pub trait MaskVectorizer {
    type Options;
    type Output;

    fn vectorize(&self, mask: &GrayImage, options: &Self::Options) -> BitmapResult<Self::Output>;
}

#[cfg(feature = "potrace")]
pub mod potrace;
