use clap::Parser;
use plipscan::{summarize_mutations, summary_to_df, write_df_to_file, DataFrameFileType, ResidueMap, Result};
use std::path::PathBuf;
use tracing::{debug, info, trace};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// Directory of per-category interaction tables
    #[arg(short, long)]
    plip_dir: PathBuf,

    /// Rosetta score file with dG_separated in its SCORE lines
    #[arg(short, long)]
    score_file: PathBuf,

    /// Structure name of the wild type
    #[arg(short = 'n', long, default_value_t = String::from("6M0J"))]
    wt_name: String,

    /// Wild-type residue map with `position,code` lines
    #[arg(short = 'm', long)]
    wt_residue_map: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "interaction_dG_summary.csv")]
    out: PathBuf,

    /// Output file type
    #[arg(short = 't', long, default_value_t = DataFrameFileType::Csv)]
    output_format: DataFrameFileType,
}

pub(crate) fn run(args: &Args) -> Result<()> {
    trace!("{args:?}");

    let wt = ResidueMap::from_file(&args.wt_residue_map)?;
    let rows = summarize_mutations(&args.plip_dir, &args.score_file, &args.wt_name, &wt)?;

    let mut df = summary_to_df(&rows)?;
    debug!("Summary of {} structures\n{df}", df.height());

    write_df_to_file(&mut df, &args.out, args.output_format)?;
    info!("Results saved to {}", args.out.display());
    Ok(())
}
