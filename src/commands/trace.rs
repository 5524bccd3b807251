use potrace_bitmap::potrace::{self, Segment};
use potrace_bitmap::{BitmapResult, MaskOptions, TraceParams, load_mask};

use crate::cli::TraceCommand;

/// The main function to run the trace command.
pub fn run(cmd: TraceCommand) -> BitmapResult<()> {
    let options = MaskOptions::from(&cmd.mask);
    let params = TraceParams::from(&cmd.trace_params);
    let mut bitmap = load_mask(&cmd.input, &options)?;

    println!("{}", potrace::version());
    let result = potrace::trace(&bitmap, &params)?;
    bitmap.release();

    for (index, path) in result.paths().enumerate() {
        let curves = path
            .segments
            .iter()
            .filter(|s| matches!(s, Segment::CurveTo { .. }))
            .count();
        let (x, y) = path.start_point().unwrap_or_default();
        println!(
            "path {index}: {} area={} segments={} curves={} points={} start=({x:.2}, {y:.2})",
            if path.is_hole() { "hole" } else { "fill" },
            path.area,
            path.segments.len(),
            curves,
            path.to_points(cmd.resolution).len()
        );
    }

    Ok(())
}
