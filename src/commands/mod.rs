mod pack;
#[cfg(feature = "potrace")]
mod trace;
mod utils;

use crate::cli::{Cli, Commands};
use potrace_bitmap::BitmapResult;

/// The main function to run the command based on CLI input.
pub fn run(cli: Cli) -> BitmapResult<()> {
    dispatch(cli.command)
}

/// Dispatch the command to the appropriate handler.
fn dispatch(command: Commands) -> BitmapResult<()> {
    match command {
        Commands::Pack(cmd) => pack::run(cmd),
        #[cfg(feature = "potrace")]
        Commands::Trace(cmd) => trace::run(cmd),
    }
}
