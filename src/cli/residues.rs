use clap::Parser;
use plipscan::{export_chain_residues, write_residue_map, Result};
use std::path::PathBuf;
use tracing::{info, trace, warn};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// Prefix of the interaction tables, e.g. plip_csv/PLIP_6M0J
    #[arg(short, long)]
    prefix: String,

    /// Chain to export
    #[arg(short, long)]
    chain: char,

    /// Output file [default: <prefix>_chain<CHAIN>_residues.txt]
    #[arg(short, long)]
    out: Option<PathBuf>,
}

pub(crate) fn run(args: &Args) -> Result<()> {
    trace!("{args:?}");

    let chain = args.chain.to_ascii_uppercase();
    let mut df = export_chain_residues(&args.prefix, chain)?;
    if df.height() == 0 {
        warn!("No residues found on chain {chain}, nothing written");
        return Ok(());
    }

    let out = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}_chain{chain}_residues.txt", args.prefix)));
    write_residue_map(&mut df, &out)?;
    info!("Wrote {} residues of chain {chain} to {}", df.height(), out.display());
    Ok(())
}
