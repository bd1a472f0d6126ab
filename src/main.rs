//! undoc — report public library symbols missing from the reference docs.
//!
//! 1. Discover documented modules from the preview server's library index
//!    (or take a single module from the command line).
//! 2. Load the prebuilt documentation inventory.
//! 3. Compare each module's public symbols against the inventory, subtract
//!    the curated allow-list, and print one line per module with gaps.
//!
//! Missing symbols are informational: the run exits non-zero only when it
//! cannot compare at all (no inventory, unreachable preview server).

mod allow;
mod check;
mod extract;
mod inventory;
mod modindex;
mod report;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "undoc",
    about = "Report public library symbols missing from the reference documentation"
)]
struct Cli {
    /// Base URL of the running docs preview server
    #[arg(short = 'u', long, default_value = "http://localhost:3000")]
    url: String,

    /// Root of the documentation tree; the inventory is read from
    /// build/inventory.json beneath it
    #[arg(short = 'd', long, default_value = "docs")]
    doc_root: PathBuf,

    /// Root directory of the library modules to audit
    #[arg(short = 'l', long, default_value = "libraries")]
    lib_root: PathBuf,

    /// Check a single module instead of discovering the module index
    #[arg(short = 'm', long)]
    module: Option<String>,

    /// Process modules in sorted order instead of discovery order
    #[arg(short = 's', long)]
    sorted: bool,

    /// Report every undocumented symbol, ignoring the curated allow-list
    #[arg(long)]
    no_allowlist: bool,
}

fn main() -> Result<()> {
    run(&Cli::parse())
}

fn run(cli: &Cli) -> Result<()> {
    let mut modules = match &cli.module {
        Some(module) => vec![module.clone()],
        None => {
            let markup = modindex::fetch_index(&cli.url)?;
            modindex::discover(&markup, &cli.doc_root)
        }
    };
    if cli.sorted {
        modules.sort();
    }

    let index = inventory::load(&cli.doc_root.join(inventory::INVENTORY_SUBPATH))?;
    let allow_table = (!cli.no_allowlist).then(|| allow::build(&cli.lib_root));

    println!("{}", report::HEADING);
    println!();
    for module in &modules {
        if let Some(found) = check::check(&cli.lib_root, module, &index, allow_table.as_ref()) {
            println!("{}", found.render(report::WRAP_WIDTH));
        }
    }
    Ok(())
}
