//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// vramslot - single-slot accelerator runner cache
///
/// Inspects and provisions the model variants that share one accelerator.
#[derive(Parser, Debug)]
#[command(name = "vramslot")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "VRAMSLOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format (defaults to general.log_format)
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered model variants
    Variants(VariantsArgs),

    /// Verify every variant can be constructed
    Check,

    /// Print the normalized runner configuration of a variant
    Describe(DescribeArgs),

    /// Download missing artifacts into the local cache
    Fetch(FetchArgs),

    /// Copy the source audio track onto a generated video
    Mux(MuxArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the variants command
#[derive(Parser, Debug)]
pub struct VariantsArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the describe command
#[derive(Parser, Debug)]
pub struct DescribeArgs {
    /// Variant id
    pub variant: String,
}

/// Arguments for the fetch command
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Download artifacts even if already present
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the mux command
#[derive(Parser, Debug)]
pub struct MuxArgs {
    /// Source media carrying the audio track
    pub source: PathBuf,

    /// Generated video without audio
    pub video: PathBuf,

    /// Output file
    pub output: PathBuf,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for list commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// Interpret `general.log_format`; anything but "json" is text
    pub fn from_config(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}
