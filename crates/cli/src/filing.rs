//! `gstrecon filing` — config-driven multi-channel filing run.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use gstrecon_io::FileFormat;
use gstrecon_recon::report::{write_channel_csv, write_consolidated_csv};
use gstrecon_recon::{process_channels, record_runs, ChannelStatus, FilingConfig, FilingReport, SummaryBook};

use crate::exit_codes::{EXIT_CHANNEL_FAILED, EXIT_INVALID_CONFIG};
use crate::output::write_to;
use crate::CliError;

#[derive(Subcommand)]
pub enum FilingCommands {
    /// Process every channel in a filing config and merge the results
    #[command(after_help = "\
Examples:
  gstrecon filing run oct.filing.toml
  gstrecon filing run oct.filing.toml --consolidated out/oct.csv --per-channel-dir out/channels
  gstrecon filing run oct.filing.toml --json
  gstrecon filing run oct.filing.toml --output report.json")]
    Run {
        /// Path to the .filing.toml config file
        config: PathBuf,

        /// Output the JSON report to stdout instead of the consolidated CSV
        #[arg(long)]
        json: bool,

        /// Write the JSON report to a file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Consolidated CSV path (overrides [output].consolidated)
        #[arg(long)]
        consolidated: Option<PathBuf>,

        /// Directory for one CSV per channel (overrides [output].per_channel_dir)
        #[arg(long)]
        per_channel_dir: Option<PathBuf>,
    },

    /// Validate a filing config and its input paths without running
    #[command(after_help = "\
Examples:
  gstrecon filing validate oct.filing.toml")]
    Validate {
        /// Path to the .filing.toml config file
        config: PathBuf,
    },
}

pub fn cmd_filing(cmd: FilingCommands) -> Result<(), CliError> {
    match cmd {
        FilingCommands::Run { config, json, output, consolidated, per_channel_dir } => {
            cmd_filing_run(config, json, output, consolidated, per_channel_dir)
        }
        FilingCommands::Validate { config } => cmd_filing_validate(config),
    }
}

fn load_config(config_path: &Path) -> Result<FilingConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path)
        .map_err(|e| CliError::io(format!("cannot read config: {e}")))?;
    Ok(FilingConfig::from_toml(&config_str)?)
}

/// Relative paths in a config resolve against the config file's directory.
fn base_dir(config_path: &Path) -> &Path {
    config_path.parent().unwrap_or_else(|| Path::new("."))
}

fn cmd_filing_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    consolidated: Option<PathBuf>,
    per_channel_dir: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    let base_dir = base_dir(&config_path);
    log::info!(
        "filing '{}': {} channel(s), inputs relative to {}",
        config.name,
        config.channels.len(),
        base_dir.display()
    );

    let mut book = SummaryBook::new();
    let statuses = record_runs(&mut book, process_channels(&config, base_dir));
    let report = FilingReport::build(&config, statuses, &book);

    let consolidated = consolidated.or_else(|| config.output.consolidated.as_ref().map(|p| base_dir.join(p)));
    let per_channel_dir =
        per_channel_dir.or_else(|| config.output.per_channel_dir.as_ref().map(|p| base_dir.join(p)));

    match &consolidated {
        Some(path) => write_to(Some(path.as_path()), |out| write_consolidated_csv(&report.consolidated, out))?,
        None if !json_output => write_to(None, |out| write_consolidated_csv(&report.consolidated, out))?,
        None => {}
    }

    if let Some(dir) = &per_channel_dir {
        for summary in book.summaries() {
            let path = dir.join(format!("{}.csv", summary.channel));
            write_to(Some(path.as_path()), |out| write_channel_csv(summary, out))?;
        }
    }

    if json_output || output_file.is_some() {
        let json = report.to_json_pretty()?;
        if let Some(ref path) = output_file {
            std::fs::write(path, &json).map_err(|e| CliError::io(format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }
        if json_output {
            println!("{json}");
        }
    }

    // Human summary to stderr
    for channel in &report.channels {
        match channel.status {
            ChannelStatus::Processed => {
                eprintln!("  channel '{}': {} jurisdiction(s)", channel.channel, channel.jurisdictions)
            }
            ChannelStatus::Failed => eprintln!(
                "  channel '{}': failed: {}",
                channel.channel,
                channel.error.as_deref().unwrap_or_default()
            ),
        }
    }
    let (taxable_value, quantity, tax) = report.consolidated.totals();
    eprintln!(
        "filing '{}': {} jurisdiction(s), taxable {:.2}, quantity {}, tax {:.2}",
        report.name,
        report.consolidated.rows.len(),
        taxable_value,
        quantity,
        tax.total(),
    );

    let failed = report.failed();
    if failed > 0 {
        return Err(CliError {
            code: EXIT_CHANNEL_FAILED,
            message: format!("{failed} of {} channel(s) failed", report.channels.len()),
            hint: Some("fix the failed channel's inputs and re-run; other channels were written".to_string()),
        });
    }

    Ok(())
}

fn cmd_filing_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    let base_dir = base_dir(&config_path);

    let mut problems = Vec::new();
    for channel in &config.channels {
        for file in channel.files() {
            let path = base_dir.join(file);
            if let Err(e) = FileFormat::from_path(&path) {
                problems.push(format!("channel '{}': {e}", channel.name()));
            } else if !path.is_file() {
                problems.push(format!("channel '{}': {} not found", channel.name(), path.display()));
            }
        }
    }

    if !problems.is_empty() {
        for problem in &problems {
            eprintln!("  {problem}");
        }
        return Err(CliError {
            code: EXIT_INVALID_CONFIG,
            message: format!("{} problem(s) in {}", problems.len(), config_path.display()),
            hint: None,
        });
    }

    eprintln!("ok: '{}': {} channel(s)", config.name, config.channels.len());
    Ok(())
}
