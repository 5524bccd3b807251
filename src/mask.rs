use std::path::Path;

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::contrast::{ThresholdType, threshold as ip_threshold};
use log::debug;

use crate::bitmap::PackedBitmap;
use crate::config::MaskOptions;
use crate::{BitmapError, BitmapResult};

/// Convert any image to luma, flattening transparent pixels onto white first.
pub fn to_luma(image: &DynamicImage) -> GrayImage {
    if !image.color().has_alpha() {
        return image.to_luma8();
    }

    let rgba = image.to_rgba8();
    let flattened = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let over_white = |c: u8| -> u8 {
            let (c, a) = (c as u32, a as u32);
            ((c * a + 255 * (255 - a) + 127) / 255) as u8
        };
        Rgb([over_white(r), over_white(g), over_white(b)])
    });
    DynamicImage::ImageRgb8(flattened).to_luma8()
}

/// Threshold the grayscale image to produce a binary mask.
pub fn threshold_mask(gray: &GrayImage, thr: u8) -> GrayImage {
    ip_threshold(gray, thr, ThresholdType::Binary)
}

/// Turn a grayscale image into one byte per pixel, 1 for pixels to trace.
///
/// Dark pixels (luma at or below the threshold) are traced unless `invert` is set.
pub fn mask_pixels(gray: &GrayImage, options: &MaskOptions) -> Vec<u8> {
    threshold_mask(gray, options.threshold)
        .pixels()
        .map(|Luma([v])| u8::from((*v == 0) != options.invert))
        .collect()
}

/// Threshold and pack a grayscale image.
pub fn pack_mask(gray: &GrayImage, options: &MaskOptions) -> BitmapResult<PackedBitmap> {
    let (w, h) = gray.dimensions();
    PackedBitmap::pack(w as usize, h as usize, &mask_pixels(gray, options))
}

/// Load an image from disk and pack it with the given options.
pub fn load_mask(path: impl AsRef<Path>, options: &MaskOptions) -> BitmapResult<PackedBitmap> {
    let path = path.as_ref();
    debug!("Loading {}", path.display());
    let image = image::open(path)?;
    debug!(
        "Image size: {} x {}, threshold={}, invert={}",
        image.width(),
        image.height(),
        options.threshold,
        options.invert
    );
    pack_mask(&to_luma(&image), options)
}

/// Render a packed bitmap as a black-on-white grayscale image.
pub fn bitmap_to_gray_image(bitmap: &PackedBitmap) -> BitmapResult<GrayImage> {
    if bitmap.is_released() {
        return Err(BitmapError::Released);
    }
    let overflow = || BitmapError::ImageDimensions {
        width: bitmap.width(),
        height: bitmap.height(),
    };
    let w = u32::try_from(bitmap.width()).map_err(|_| overflow())?;
    let h = u32::try_from(bitmap.height()).map_err(|_| overflow())?;
    let raw = bitmap
        .unpack()
        .into_iter()
        .map(|set| if set != 0 { 0 } else { 255 })
        .collect();
    GrayImage::from_raw(w, h, raw).ok_or_else(overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn gray_image(w: u32, h: u32, value: u8) -> GrayImage {
        GrayImage::from_pixel(w, h, Luma([value]))
    }

    mod mask_pixels {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn dark_pixels_are_set() {
                let mut input = GrayImage::new(3, 1);
                input.put_pixel(0, 0, Luma([0]));
                input.put_pixel(1, 0, Luma([127]));
                input.put_pixel(2, 0, Luma([128]));

                let pixels = mask_pixels(&input, &MaskOptions::default());

                assert_eq!(pixels, vec![1, 1, 0]);
            }

            #[test]
            fn threshold_value_itself_is_set() {
                let mut input = GrayImage::new(3, 1);
                input.put_pixel(0, 0, Luma([127]));
                input.put_pixel(1, 0, Luma([128]));
                input.put_pixel(2, 0, Luma([129]));

                let options = MaskOptions::default().with_threshold(128);
                assert_eq!(mask_pixels(&input, &options), vec![1, 1, 0]);
                let inverted = options.with_invert(true);
                assert_eq!(mask_pixels(&input, &inverted), vec![0, 0, 1]);
            }

            #[test]
            fn invert_traces_light_pixels() {
                let mut input = GrayImage::new(2, 1);
                input.put_pixel(0, 0, Luma([10]));
                input.put_pixel(1, 0, Luma([250]));

                let options = MaskOptions::default().with_invert(true);
                assert_eq!(mask_pixels(&input, &options), vec![0, 1]);
            }

            #[test]
            fn row_major_order() {
                let mut input = gray_image(2, 2, 255);
                input.put_pixel(1, 0, Luma([0]));

                assert_eq!(mask_pixels(&input, &MaskOptions::default()), vec![0, 1, 0, 0]);
            }
        }

        mod prop {
            use super::*;
            use proptest::prelude::*;

            proptest! {
                /// mask_pixels: invert flips every pixel
                #[test]
                fn invert_is_complement(
                    w in 1u32..12,
                    h in 1u32..12,
                    fill_value in proptest::num::u8::ANY,
                    threshold in proptest::num::u8::ANY
                ) {
                    let input = GrayImage::from_pixel(w, h, Luma([fill_value]));
                    let options = MaskOptions::default().with_threshold(threshold);
                    let plain = mask_pixels(&input, &options);
                    let inverted = mask_pixels(&input, &options.with_invert(true));

                    prop_assert_eq!(plain.len(), (w * h) as usize);
                    for (a, b) in plain.iter().zip(&inverted) {
                        prop_assert_eq!(a + b, 1);
                    }
                }
            }
        }
    }

    mod to_luma {
        use super::*;

        #[test]
        fn transparent_pixels_become_white() {
            let mut rgba = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 255]));
            rgba.put_pixel(1, 0, Rgba([0, 0, 0, 0]));

            let gray = to_luma(&DynamicImage::ImageRgba8(rgba));

            assert_eq!(gray.get_pixel(0, 0).0[0], 0);
            assert_eq!(gray.get_pixel(1, 0).0[0], 255);
        }

        #[test]
        fn opaque_gray_passes_through() {
            let gray = to_luma(&DynamicImage::ImageLuma8(gray_image(3, 2, 42)));
            assert_eq!(gray.dimensions(), (3, 2));
            assert!(gray.pixels().all(|p| p.0[0] == 42));
        }
    }

    mod pack_mask {
        use super::*;

        #[test]
        fn packs_thresholded_pixels() {
            let mut input = gray_image(3, 2, 255);
            input.put_pixel(0, 0, Luma([0]));
            input.put_pixel(2, 0, Luma([0]));
            input.put_pixel(1, 1, Luma([0]));

            let bitmap = pack_mask(&input, &MaskOptions::default()).unwrap();

            assert_eq!((bitmap.width(), bitmap.height()), (3, 2));
            assert_eq!(bitmap.unpack(), vec![1, 0, 1, 0, 1, 0]);
        }

        #[test]
        fn preview_round_trips_the_mask() {
            let mut input = gray_image(4, 3, 255);
            input.put_pixel(3, 2, Luma([0]));
            input.put_pixel(0, 1, Luma([0]));

            let bitmap = pack_mask(&input, &MaskOptions::default()).unwrap();
            let preview = bitmap_to_gray_image(&bitmap).unwrap();

            assert_eq!(preview.as_raw(), threshold_mask(&input, 127).as_raw());
        }

        #[test]
        #[cfg(target_pointer_width = "64")]
        fn preview_rejects_widths_beyond_u32() {
            let width = u32::MAX as usize + 1;
            let bitmap = PackedBitmap::pack(width, 0, &[]).unwrap();
            match bitmap_to_gray_image(&bitmap) {
                Err(BitmapError::ImageDimensions { width: w, height: 0 }) => assert_eq!(w, width),
                other => panic!("unexpected {other:?}"),
            }
        }

        #[test]
        fn released_bitmap_has_no_preview() {
            let mut bitmap = pack_mask(&gray_image(1, 1, 0), &MaskOptions::default()).unwrap();
            bitmap.release();
            assert!(matches!(
                bitmap_to_gray_image(&bitmap),
                Err(BitmapError::Released)
            ));
        }
    }
}
