use std::path::PathBuf;

#[cfg(feature = "potrace")]
use clap::ValueEnum;
use clap::{Args, Parser, Subcommand};
use potrace_bitmap::MaskOptions;
#[cfg(feature = "potrace")]
use potrace_bitmap::{TraceParams, TurnPolicy};

/// Command line interface definition.
#[derive(Parser, Debug)]
#[command(author, version, about, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Threshold an image and pack it into a potrace bitmap
    Pack(PackCommand),
    /// Trace an image with potrace and list the resulting paths
    #[cfg(feature = "potrace")]
    Trace(TraceCommand),
}

#[derive(Args, Debug)]
pub struct PackCommand {
    /// Input image path
    pub input: PathBuf,
    /// Save the packed bitmap as a PNG (defaults to `<name>-packed.png`)
    #[arg(long = "preview", value_name = "PATH", num_args = 0..=1)]
    pub preview: Option<Option<PathBuf>>,
    #[command(flatten)]
    pub mask: MaskArgs,
}

#[cfg(feature = "potrace")]
#[derive(Args, Debug)]
pub struct TraceCommand {
    /// Input image path
    pub input: PathBuf,
    #[command(flatten)]
    pub mask: MaskArgs,
    #[command(flatten)]
    pub trace_params: TraceParamsArgs,
    /// Maximum distance between a curve and its flattened polyline
    #[arg(long, default_value_t = 0.25)]
    pub resolution: f64,
}

#[derive(Args, Debug)]
pub struct MaskArgs {
    /// Luma threshold; brighter pixels are background (0-255 or 0.0-1.0)
    #[arg(long, default_value_t = 127, value_parser = parse_threshold)]
    pub threshold: u8,
    /// Trace light pixels instead of dark ones
    #[arg(long)]
    pub invert: bool,
}

impl From<&MaskArgs> for MaskOptions {
    fn from(args: &MaskArgs) -> Self {
        Self {
            threshold: args.threshold,
            invert: args.invert,
        }
    }
}

fn parse_threshold(value: &str) -> Result<u8, String> {
    if let Ok(int_value) = value.parse::<u8>() {
        return Ok(int_value);
    }

    let float_value = value
        .parse::<f32>()
        .map_err(|_| format!("threshold must be numeric (0-255 or 0.0-1.0), got `{value}`"))?;

    if (0.0..=1.0).contains(&float_value) {
        let scaled = (float_value * 255.0).round() as i32;
        return Ok(scaled.clamp(0, 255) as u8);
    }

    if float_value.fract().abs() <= f32::EPSILON && (0.0..=255.0).contains(&float_value) {
        return Ok(float_value as u8);
    }

    Err(format!(
        "threshold {value} is out of range; expected 0-255 or 0.0-1.0"
    ))
}

/// Turn policies accepted on the command line.
#[cfg(feature = "potrace")]
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TurnPolicyArg {
    Black,
    White,
    Left,
    Right,
    Minority,
    Majority,
    Random,
}

#[cfg(feature = "potrace")]
impl From<TurnPolicyArg> for TurnPolicy {
    fn from(value: TurnPolicyArg) -> Self {
        match value {
            TurnPolicyArg::Black => TurnPolicy::Black,
            TurnPolicyArg::White => TurnPolicy::White,
            TurnPolicyArg::Left => TurnPolicy::Left,
            TurnPolicyArg::Right => TurnPolicy::Right,
            TurnPolicyArg::Minority => TurnPolicy::Minority,
            TurnPolicyArg::Majority => TurnPolicy::Majority,
            TurnPolicyArg::Random => TurnPolicy::Random,
        }
    }
}

#[cfg(feature = "potrace")]
#[derive(Args, Debug)]
pub struct TraceParamsArgs {
    /// Suppress speckles of up to this many pixels
    #[arg(long, default_value_t = 2)]
    pub turdsize: i32,
    /// How to resolve ambiguous turns
    #[arg(long = "turn-policy", value_enum, default_value_t = TurnPolicyArg::Minority)]
    pub turn_policy: TurnPolicyArg,
    /// Corner threshold
    #[arg(long, default_value_t = 1.0)]
    pub alphamax: f64,
    /// Do not join adjacent curve segments
    #[arg(long = "no-opticurve")]
    pub no_opticurve: bool,
    /// Tolerance used when joining curve segments
    #[arg(long, default_value_t = 0.2)]
    pub opttolerance: f64,
}

#[cfg(feature = "potrace")]
impl From<&TraceParamsArgs> for TraceParams {
    fn from(args: &TraceParamsArgs) -> Self {
        Self {
            turdsize: args.turdsize,
            turn_policy: args.turn_policy.into(),
            alphamax: args.alphamax,
            opticurve: !args.no_opticurve,
            opttolerance: args.opttolerance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_accepts_bytes_and_fractions() {
        assert_eq!(parse_threshold("127"), Ok(127));
        assert_eq!(parse_threshold("0.5"), Ok(128));
        assert_eq!(parse_threshold("1.0"), Ok(255));
        assert_eq!(parse_threshold("200.0"), Ok(200));
    }

    #[test]
    fn threshold_rejects_garbage() {
        assert!(parse_threshold("dark").is_err());
        assert!(parse_threshold("300").is_err());
        assert!(parse_threshold("-1").is_err());
    }

    #[test]
    fn pack_command_parses() {
        let args = ["potrace-bitmap", "pack", "in.png", "--invert", "--preview"];
        let cli = Cli::try_parse_from(args).unwrap();
        let cmd = match cli.command {
            Commands::Pack(cmd) => cmd,
            #[allow(unreachable_patterns)]
            _ => panic!("expected pack command"),
        };
        assert_eq!(cmd.input, PathBuf::from("in.png"));
        assert_eq!(cmd.preview, Some(None));
        let options = MaskOptions::from(&cmd.mask);
        assert_eq!(options, MaskOptions::default().with_invert(true));
    }
}
