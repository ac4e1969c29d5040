use clap::Parser;
use plipscan::{ddg_matrix, get_ddg_by_position, write_df_to_file, DataFrameFileType, Result};
use std::path::PathBuf;
use tracing::{debug, info, trace, warn};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// FoldX summary of the wild-type complex
    #[arg(long)]
    wt: PathBuf,

    /// Directory of mutant FoldX summaries
    #[arg(long, default_value = ".")]
    indir: PathBuf,

    /// Extension of the FoldX summary files
    #[arg(long, default_value_t = String::from("fxout"))]
    extension: String,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    outdir: PathBuf,

    /// Name prefix of the output files
    #[arg(short, long)]
    name: String,
}

pub(crate) fn run(args: &Args) -> Result<()> {
    trace!("{args:?}");

    let entries = get_ddg_by_position(&args.wt, &args.indir, &args.extension)?;
    if entries.is_empty() {
        warn!("No mutant summaries found in {}", args.indir.display());
    }
    debug!("Read {} substitutions", entries.len());

    let mut binding = ddg_matrix(&entries, |e| e.binding_ddg)?;
    let mut stability = ddg_matrix(&entries, |e| e.stability_ddg)?;

    let binding_file = args.outdir.join(format!("{}_binding_ddg.csv", args.name));
    let stability_file = args.outdir.join(format!("{}_stability_ddg.csv", args.name));
    write_df_to_file(&mut binding, &binding_file, DataFrameFileType::Csv)?;
    write_df_to_file(&mut stability, &stability_file, DataFrameFileType::Csv)?;
    info!(
        "Results saved to {} and {}",
        binding_file.display(),
        stability_file.display()
    );
    Ok(())
}
