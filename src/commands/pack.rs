use potrace_bitmap::{BitmapResult, MaskOptions, WORD_BITS, bitmap_to_gray_image, load_mask};

use crate::cli::PackCommand;

use super::utils::derive_variant_path;

/// The main function to run the pack command.
pub fn run(cmd: PackCommand) -> BitmapResult<()> {
    let options = MaskOptions::from(&cmd.mask);
    let mut bitmap = load_mask(&cmd.input, &options)?;

    println!(
        "{}x{} pixels, {} words of {} bits per row, {} pixels set",
        bitmap.width(),
        bitmap.height(),
        bitmap.row_stride_words(),
        WORD_BITS,
        bitmap.count_set()
    );

    let preview_path = match &cmd.preview {
        Some(Some(path)) => Some(path.clone()),
        Some(None) => Some(derive_variant_path(&cmd.input, "packed", "png")),
        None => None,
    };

    if let Some(path) = &preview_path {
        bitmap_to_gray_image(&bitmap)?.save(path)?;
        println!("Packed bitmap PNG saved to {}", path.display());
    }

    bitmap.release();
    Ok(())
}
