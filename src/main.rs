use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use tokio::runtime::Runtime;

use bucket_uploader::cli::{Args, Commands};
use bucket_uploader::cloud::S3Putter;
use bucket_uploader::config::{UploadConfig, UploadSettings};
use bucket_uploader::pipeline::UploadPipeline;
use bucket_uploader::summary::BatchReport;

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = initialize_logging(args.verbose) {
        eprintln!("{:#}", e);
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging with the specified verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(log_level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)
        .context("Failed to initialize logger")?;
    Ok(())
}

/// Returns whether the batch succeeded
fn run(args: &Args) -> Result<bool> {
    if let Some(cmd) = &args.command {
        handle_subcommand(cmd)?;
        return Ok(true);
    }

    let settings = load_settings(args)?;
    let config = UploadConfig::from_settings(settings).context("Invalid configuration")?;
    let putter = S3Putter::from_config(&config).context("Failed to create S3 client")?;
    let pipeline = UploadPipeline::new(config, std::sync::Arc::new(putter));

    let runtime = Runtime::new().context("Failed to create async runtime")?;
    let result = runtime.block_on(pipeline.run())?;

    info!("{}", result.report.tally());
    if let Some(path) = &args.report {
        write_report(&result.report, path)?;
    }

    match result.into_result() {
        Ok(_) => Ok(true),
        Err(e) => {
            error!("Upload failed: {}", e);
            Ok(false)
        }
    }
}

/// Handle subcommands (init-config)
fn handle_subcommand(cmd: &Commands) -> Result<()> {
    match cmd {
        Commands::InitConfig { path } => {
            info!("Creating default configuration file at {}", path.display());
            UploadSettings::template().save_to_yaml_file(path)?;
            Ok(())
        }
    }
}

/// YAML settings, if any, overridden by command-line flags
fn load_settings(args: &Args) -> Result<UploadSettings> {
    let file_settings = match &args.config {
        Some(path) => UploadSettings::from_yaml_file(path)?,
        None => UploadSettings::default(),
    };
    Ok(file_settings.merge(args.to_settings()))
}

fn write_report(report: &BatchReport, path: &Path) -> Result<()> {
    let json = report.to_json()?;
    fs::write(path, json).context(format!("Failed to write report to {}", path.display()))?;
    info!("Report written to {}", path.display());
    Ok(())
}
