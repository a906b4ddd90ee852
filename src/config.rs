use clap::Parser;
use std::path::PathBuf;

/// Name of the output directory created under the input when none is given
pub const DEFAULT_OUTPUT_DIR: &str = "transparent";

#[derive(Parser, Debug)]
#[command(name = "bgremove")]
#[command(about = "Make the border-connected background of PNG images transparent")]
#[command(version)]
pub struct Args {
    /// Directory containing the PNG files to process
    #[arg(long, env = "BGREMOVE_INPUT", default_value = ".")]
    pub input: PathBuf,

    /// Directory to write results to (default: <input>/transparent)
    #[arg(long, env = "BGREMOVE_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Maximum per-channel difference from the background color (0-255)
    #[arg(long, env = "BGREMOVE_TOLERANCE", default_value = "30")]
    pub tolerance: u8,

    /// Text inserted before the trailing digits of output file names
    #[arg(long, env = "BGREMOVE_SEPARATOR", default_value = "_")]
    pub separator: String,

    /// Also process PNG files in subdirectories
    #[arg(long, env = "BGREMOVE_RECURSIVE")]
    pub recursive: bool,

    /// Number of worker threads (default: one per CPU)
    #[arg(long, env = "BGREMOVE_JOBS")]
    pub jobs: Option<usize>,

    /// Write a JSON report of the run to this file
    #[arg(long, env = "BGREMOVE_REPORT")]
    pub report: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

/// Batch configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub tolerance: u8,
    pub separator: String,
    pub recursive: bool,
    pub jobs: Option<usize>,
    pub report: Option<PathBuf>,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let output_dir = args
            .output
            .unwrap_or_else(|| args.input.join(DEFAULT_OUTPUT_DIR));

        Self {
            input_dir: args.input,
            output_dir,
            tolerance: args.tolerance,
            separator: args.separator,
            recursive: args.recursive,
            jobs: args.jobs,
            report: args.report,
        }
    }
}
