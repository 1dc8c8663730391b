//! `gstrecon channel` — summarize one channel's exports straight from the command line.

use std::path::PathBuf;

use clap::Subcommand;

use gstrecon_io::HeaderLayout;
use gstrecon_recon::config::{InvoiceColumns, SplitColumns, ALL_ACCOUNTS};
use gstrecon_recon::report::write_channel_csv;
use gstrecon_recon::{
    AccountFilter, ChannelInput, ChannelNormalizer, ChannelSummary, InvoiceLevelNormalizer, ResolverStrategy,
    SalesReturnsNormalizer,
};

use crate::output::{emit_json, load_tables, write_to};
use crate::{CliError, LayoutArg, StrategyArg};

#[derive(Subcommand)]
pub enum ChannelCommands {
    /// Invoice-level export with IGST/CGST/SGST columns per line
    #[command(after_help = "\
Examples:
  gstrecon channel invoice fk-oct.xlsx fk-late.csv
  gstrecon channel invoice fk-oct.xlsx --list-accounts
  gstrecon channel invoice fk-oct.xlsx --account 06AAACX1234A1Z5 -o flipkart.csv")]
    Invoice {
        /// Export files, concatenated row-wise
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Channel name used in output
        #[arg(long, default_value = "flipkart")]
        name: String,

        /// Seller account to keep, or ALL
        #[arg(long, default_value = ALL_ACCOUNTS)]
        account: String,

        /// Print the account choices found in the files and exit
        #[arg(long)]
        list_accounts: bool,

        #[arg(long, value_enum, default_value = "header-with-annotation")]
        layout: LayoutArg,

        #[arg(long, value_enum, default_value = "synonym-map")]
        strategy: StrategyArg,

        /// Write the summary CSV here instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Output the summary as JSON
        #[arg(long, conflicts_with = "output")]
        json: bool,
    },

    /// Sales and returns exports with one combined tax column
    #[command(after_help = "\
Examples:
  gstrecon channel split --sales sales.xlsx --returns returns.xlsx
  gstrecon channel split --sales s1.csv s2.csv --home KARNATAKA --json")]
    Split {
        /// Sales export files
        #[arg(long, required = true, num_args = 1..)]
        sales: Vec<PathBuf>,

        /// Returns export files, subtracted from sales
        #[arg(long, num_args = 1..)]
        returns: Vec<PathBuf>,

        /// Seller's registered state; sales into it split tax into CGST/SGST
        #[arg(long, env = "GSTRECON_HOME", default_value = "HARYANA")]
        home: String,

        /// Channel name used in output
        #[arg(long, default_value = "meesho")]
        name: String,

        #[arg(long, value_enum, default_value = "single-header")]
        layout: LayoutArg,

        #[arg(long, value_enum, default_value = "synonym-map")]
        strategy: StrategyArg,

        /// Write the summary CSV here instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Output the summary as JSON
        #[arg(long, conflicts_with = "output")]
        json: bool,
    },
}

pub fn cmd_channel(cmd: ChannelCommands) -> Result<(), CliError> {
    match cmd {
        ChannelCommands::Invoice { files, name, account, list_accounts, layout, strategy, output, json } => {
            let layout = HeaderLayout::from(layout);
            let tables = load_tables(&files, layout)?;
            let normalizer = InvoiceLevelNormalizer::new(&name, InvoiceColumns::default())
                .with_account(AccountFilter::parse(&account))
                .with_layout(layout);

            if list_accounts {
                for account in normalizer.accounts(&tables) {
                    println!("{account}");
                }
                return Ok(());
            }

            let input = ChannelInput { sales: tables, returns: Vec::new() };
            let summary = normalizer.summarize(&input, ResolverStrategy::from(strategy).build().as_ref())?;
            finish(&summary, output, json)
        }
        ChannelCommands::Split { sales, returns, home, name, layout, strategy, output, json } => {
            let layout = HeaderLayout::from(layout);
            let input = ChannelInput {
                sales: load_tables(&sales, layout)?,
                returns: load_tables(&returns, layout)?,
            };
            let normalizer = SalesReturnsNormalizer::new(&name, SplitColumns::default(), &home).with_layout(layout);
            let summary = normalizer.summarize(&input, ResolverStrategy::from(strategy).build().as_ref())?;
            finish(&summary, output, json)
        }
    }
}

fn finish(summary: &ChannelSummary, output: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    if json {
        emit_json(summary)?;
    } else {
        write_to(output.as_deref(), |out| write_channel_csv(summary, out))?;
    }

    eprintln!(
        "{}: {} jurisdiction(s), taxable {:.2}, quantity {}",
        summary.channel,
        summary.rows.len(),
        summary.taxable_value(),
        summary.quantity(),
    );
    Ok(())
}
