//! `gstrecon picklist` — roll picklists up to master SKU quantities.

use std::path::PathBuf;

use clap::Args;

use gstrecon_io::HeaderLayout;
use gstrecon_recon::report::write_picklist_csv;
use gstrecon_recon::{PicklistColumns, PicklistConsolidator, SkuKey};

use crate::output::{emit_json, load_tables, write_to};
use crate::{CliError, LayoutArg};

#[derive(Args)]
pub struct PicklistArgs {
    /// Picklist files (at most 10 per run)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Mapping sheet from SKU to master SKU
    #[arg(long)]
    mapping: PathBuf,

    /// Key items on SKU + Color + Size instead of SKU alone
    #[arg(long)]
    with_variants: bool,

    #[arg(long, value_enum, default_value = "single-header")]
    layout: LayoutArg,

    /// Write the totals CSV here instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Output totals and skipped files as JSON
    #[arg(long, conflicts_with = "output")]
    json: bool,
}

pub fn cmd_picklist(args: PicklistArgs) -> Result<(), CliError> {
    let layout = HeaderLayout::from(args.layout);
    let key = if args.with_variants { SkuKey::SkuColorSize } else { SkuKey::Sku };

    let mapping = gstrecon_io::load(&args.mapping, layout)?;
    let picklists = load_tables(&args.files, layout)?;

    let outcome = PicklistConsolidator::new(PicklistColumns::default(), key).consolidate(&picklists, &mapping)?;

    if args.json {
        emit_json(&outcome)?;
    } else {
        write_to(args.output.as_deref(), |out| write_picklist_csv(&outcome.totals, out))?;
    }

    eprintln!(
        "picklist: {} master SKU(s) from {} file(s), {} skipped",
        outcome.totals.len(),
        outcome.files_used,
        outcome.skipped.len(),
    );
    Ok(())
}
