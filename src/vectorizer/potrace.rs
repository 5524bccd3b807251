use image::GrayImage;

use crate::BitmapResult;
use crate::config::{MaskOptions, TraceParams};
use crate::mask::pack_mask;
use crate::potrace::{TracedPath, trace};

use super::MaskVectorizer;

/// Options for thresholding a mask and tracing it with potrace.
#[derive(Debug, Clone, Default)]
pub struct PotraceOptions {
    pub mask: MaskOptions,
    pub params: TraceParams,
}

/// potrace-based vectorizer producing closed Bezier paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct PotraceVectorizer;

impl MaskVectorizer for PotraceVectorizer {
    type Options = PotraceOptions;
    type Output = Vec<TracedPath>;

    fn vectorize(&self, mask: &GrayImage, options: &Self::Options) -> BitmapResult<Self::Output> {
        let mut bitmap = pack_mask(mask, &options.mask)?;
        let paths = trace(&bitmap, &options.params)?.paths().collect();
        bitmap.release();
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn dark_blob_on_white_is_traced() {
        let mut mask = GrayImage::from_pixel(16, 16, Luma([255]));
        for y in 4..12 {
            for x in 4..12 {
                mask.put_pixel(x, y, Luma([0]));
            }
        }

        let paths = PotraceVectorizer
            .vectorize(&mask, &PotraceOptions::default())
            .unwrap();

        assert_eq!(paths.len(), 1);
        assert!(!paths[0].is_hole());
    }

    #[test]
    fn inverted_white_page_is_one_outline() {
        let mask = GrayImage::from_pixel(8, 8, Luma([255]));
        let options = PotraceOptions {
            mask: MaskOptions::default().with_invert(true),
            ..Default::default()
        };

        let paths = PotraceVectorizer.vectorize(&mask, &options).unwrap();

        assert_eq!(paths.len(), 1);
    }
}
