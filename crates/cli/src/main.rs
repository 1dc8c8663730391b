// gstrecon CLI - multi-channel GST filing reconciliation

mod channel;
mod exit_codes;
mod filing;
mod output;
mod picklist;

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use gstrecon_io::HeaderLayout;
use gstrecon_recon::jurisdiction::canonical_names;
use gstrecon_recon::{JurisdictionResolver, ReconError, ResolverStrategy};

use exit_codes::{recon_exit_code, EXIT_ERROR, EXIT_LOAD_IO, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "gstrecon")]
#[command(about = "Reconcile marketplace sales exports into a GST filing summary")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). GSTRECON_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run or check a multi-channel filing config
    Filing {
        #[command(subcommand)]
        command: filing::FilingCommands,
    },

    /// Summarize a single channel's exports without a config
    Channel {
        #[command(subcommand)]
        command: channel::ChannelCommands,
    },

    /// Consolidate picklists into master SKU quantities
    #[command(after_help = "\
Examples:
  gstrecon picklist --mapping master.xlsx day1.csv day2.csv
  gstrecon picklist --mapping master.csv picks/*.xlsx --with-variants -o totals.csv
  gstrecon picklist --mapping master.csv picks.csv --json")]
    Picklist(picklist::PicklistArgs),

    /// Show the canonical jurisdiction name for raw state labels
    #[command(after_help = "\
Examples:
  gstrecon resolve ORISSA 'tamil nadu' 'New Delhi'
  gstrecon resolve --strategy truncate 'MADHYA PRADESH'
  gstrecon resolve --list")]
    Resolve {
        /// Raw labels as they appear in an export
        labels: Vec<String>,

        /// Resolver to apply
        #[arg(long, value_enum, default_value = "synonym-map")]
        strategy: StrategyArg,

        /// Print every canonical jurisdiction name instead
        #[arg(long, conflicts_with = "labels")]
        list: bool,
    },
}

/// Header layout of an export template.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LayoutArg {
    /// One header row, data follows
    SingleHeader,
    /// Header row, then a description row that is skipped
    HeaderWithAnnotation,
}

impl From<LayoutArg> for HeaderLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::SingleHeader => HeaderLayout::SingleHeader,
            LayoutArg::HeaderWithAnnotation => HeaderLayout::HeaderWithAnnotation,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StrategyArg {
    /// Full synonym table with title-case fallback
    SynonymMap,
    /// Legacy prefix grouping (compatibility only)
    Truncate,
}

impl From<StrategyArg> for ResolverStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::SynonymMap => ResolverStrategy::SynonymMap,
            StrategyArg::Truncate => ResolverStrategy::Truncate,
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_env("GSTRECON_LOG").unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Filing { command } => filing::cmd_filing(command),
        Commands::Channel { command } => channel::cmd_channel(command),
        Commands::Picklist(args) => picklist::cmd_picklist(args),
        Commands::Resolve { labels, strategy, list } => cmd_resolve(labels, strategy, list),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_LOAD_IO, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::MissingColumn { .. } => {
                Some("check the export template; column names are matched exactly".to_string())
            }
            ReconError::Load(load @ gstrecon_io::LoadError::UnsupportedFormat { .. }) => {
                Some(format!("export {} as csv or xlsx", load.file()))
            }
            _ => None,
        };
        Self { code: recon_exit_code(&err), message: err.to_string(), hint }
    }
}

impl From<gstrecon_io::LoadError> for CliError {
    fn from(err: gstrecon_io::LoadError) -> Self {
        ReconError::from(err).into()
    }
}

// ============================================================================
// resolve
// ============================================================================

fn cmd_resolve(labels: Vec<String>, strategy: StrategyArg, list: bool) -> Result<(), CliError> {
    if list {
        for name in canonical_names() {
            println!("{name}");
        }
        return Ok(());
    }

    if labels.is_empty() {
        return Err(CliError::args("no labels given").with_hint("gstrecon resolve ORISSA, or --list"));
    }

    let resolver = ResolverStrategy::from(strategy).build();
    for label in &labels {
        println!("{}\t{}", label, resolver.resolve(label));
    }
    Ok(())
}
