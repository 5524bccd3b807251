use potrace_bitmap::{BitmapError, WORD_BITS};

pub fn report_error(err: &BitmapError) {
    match err {
        BitmapError::SizeOverflow { .. }
        | BitmapError::DescriptorOverflow { .. }
        | BitmapError::ImageDimensions { .. } => {
            eprintln!("{err}");
            eprintln!();
            eprintln!("Scale the input down before packing it.");
        }
        BitmapError::OutOfMemory { bytes } => {
            eprintln!("{err}");
            eprintln!();
            eprintln!(
                "The packed bitmap needs {bytes} bytes ({WORD_BITS} pixels per word); free memory or use a smaller image."
            );
        }
        _ => {
            eprintln!("{err}");
        }
    }
}
