//! bagframe command line entry point.

mod cli;
mod config;
mod report;

use bagframe_core::{RecordSource, convert};
use bagframe_rosbag::RosbagSource;
use clap::Parser;
use cli::{Cli, Command, ConvertArgs, InfoArgs};
use config::Config;
use eyre::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Convert(args) => run_convert(args),
        Command::Info(args) => run_info(args),
    }
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    let file_config = match &args.config {
        Some(path) => {
            info!(config_file = %path.display(), "Loading configuration");
            Config::load(path)?
        }
        None => Config::default(),
    };
    let config = file_config.to_convert_config(&args)?;

    info!(
        bag = %args.bag.display(),
        output = %config.output.display(),
        reference = %config.classifier.reference,
        timestamp_mode = ?config.timestamp_mode,
        "Configuration loaded"
    );

    let mut source = RosbagSource::open(&args.bag)?;
    let summary = convert(&mut source, &config)?;

    info!(
        rows = summary.rows,
        columns = summary.columns,
        images = summary.images,
        table = %summary.table_path.display(),
        "Conversion finished"
    );
    Ok(())
}

fn run_info(args: InfoArgs) -> Result<()> {
    let mut source = RosbagSource::open(&args.bag)?;
    let topics = source.topics()?;

    println!("path:     {}", source.path().display());
    print!("{}", report::render(&topics));
    Ok(())
}
