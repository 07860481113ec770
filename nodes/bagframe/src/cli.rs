//! Command line arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Convert ROS1 bag files into one time-aligned CSV table.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resample every selected stream onto the reference stream and write
    /// the table and image files.
    Convert(ConvertArgs),

    /// List the topics of a bag file.
    Info(InfoArgs),
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Bag file to convert.
    pub bag: PathBuf,

    /// Output directory. Overrides `output` in the config file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// YAML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Topic to keep. Repeatable; takes precedence over --exclude.
    #[arg(long = "include", value_name = "TOPIC")]
    pub include: Vec<String>,

    /// Topic to drop. Repeatable.
    #[arg(long = "exclude", value_name = "TOPIC")]
    pub exclude: Vec<String>,

    /// Field key to keep, e.g. `/imu/data/linear_acceleration/x`. The
    /// topics that may own the key are added to the included topics.
    #[arg(long = "keys", value_name = "KEY")]
    pub keys: Vec<String>,

    /// Stream key whose timestamps become the table rows.
    #[arg(long, value_name = "KEY")]
    pub reference: Option<String>,

    /// Header of the reference value column. Defaults to the reference key
    /// when --reference is given.
    #[arg(long, value_name = "NAME")]
    pub reference_column: Option<String>,

    /// Compute header timestamps as `secs + nsecs * 1e-9`.
    #[arg(long)]
    pub exact_timestamps: bool,

    /// File name of the table inside the output directory.
    #[arg(long, value_name = "NAME")]
    pub table_name: Option<String>,
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Bag file to inspect.
    pub bag: PathBuf,
}
