use clap::Parser;
use plipscan::{extract_interactions, write_interaction_tables, DataFrameFileType, Result};
use std::path::PathBuf;
use tracing::{debug, info, trace};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// Path to the PLIP XML report to be parsed
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory, created if missing
    #[arg(short, long, default_value = "plip_csv")]
    outdir: PathBuf,

    /// Output file type
    #[arg(short = 't', long, default_value_t = DataFrameFileType::Csv)]
    output_format: DataFrameFileType,
}

pub(crate) fn run(args: &Args) -> Result<()> {
    trace!("{args:?}");

    let input_path = args.input.canonicalize()?;
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("report");
    debug!("Parsing {}", input_path.display());

    let mut tables = extract_interactions(&input_path)?;
    for (interaction, df) in &tables {
        debug!("{interaction}\n{df}");
    }

    let written = write_interaction_tables(&mut tables, &args.outdir, stem, args.output_format)?;
    info!(
        "Results saved to {} ({} tables)",
        args.outdir.display(),
        written.len()
    );
    Ok(())
}
