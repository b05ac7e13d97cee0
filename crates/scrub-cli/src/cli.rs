//! Command-line arguments for `scrub`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use scrub_cli::config::Preset;

#[derive(Parser)]
#[command(
    name = "scrub",
    version,
    about = "Clean customer CSV exports",
    long_about = "Clean customer CSV exports.\n\n\
                  Splits and drops columns, removes duplicate and irrelevant rows,\n\
                  trims and canonicalizes text, normalizes phone numbers to\n\
                  DDD-DDD-DDDD and fills missing values."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v info, -vv debug, -q errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include raw customer values in logs and reports.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Clean a CSV file.
    Clean(CleanArgs),

    /// Print a configuration as TOML.
    Config(ConfigArgs),

    /// Normalize phone numbers given on the command line.
    Phone(PhoneArgs),
}

#[derive(Parser)]
pub struct CleanArgs {
    /// Raw CSV file with a header row.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// TOML configuration file.
    #[arg(long, short = 'c', value_name = "FILE", conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Built-in configuration.
    #[arg(long, value_enum)]
    pub preset: Option<PresetArg>,

    /// Output CSV (default: <INPUT stem>_clean.csv next to the input).
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the stage report as JSON.
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Run the pipeline and print the summary without writing the output.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct ConfigArgs {
    /// Built-in configuration to print (default: empty configuration).
    #[arg(long, value_enum)]
    pub preset: Option<PresetArg>,
}

#[derive(Parser)]
pub struct PhoneArgs {
    #[arg(value_name = "VALUE", required = true)]
    pub values: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PresetArg {
    /// Customer call-list export.
    Customer,
}

impl From<PresetArg> for Preset {
    fn from(value: PresetArg) -> Self {
        match value {
            PresetArg::Customer => Preset::CustomerCallList,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn arguments_are_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn config_and_preset_conflict() {
        let parsed = Cli::try_parse_from([
            "scrub", "clean", "in.csv", "--config", "a.toml", "--preset", "customer",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from(["scrub", "phone", "555 123 4567", "--log-data"])
            .expect("parse");
        assert!(cli.log_data);
        assert!(matches!(cli.command, Command::Phone(ref args) if args.values.len() == 1));
    }
}
