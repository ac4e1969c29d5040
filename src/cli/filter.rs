use clap::Parser;
use plipscan::{filter_mutations, find_table, read_csv, write_df_to_file, DataFrameFileType, FilterSettings, Result};
use std::path::PathBuf;
use tracing::{debug, info, trace, warn};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// Directory holding the binding and stability ddG matrices
    #[arg(short, long)]
    dir: PathBuf,

    /// Chain label written to the output
    #[arg(short, long)]
    chain: String,

    /// Output file name, placed in `dir`
    #[arg(short, long, default_value_t = String::from("filtered_ddg_mutations.csv"))]
    outname: String,

    /// Keep mutations with binding ddG above this
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    bind_threshold: f64,

    /// Keep mutations with stability ddG below this
    #[arg(long, default_value_t = 1.5, allow_negative_numbers = true)]
    stab_threshold: f64,

    /// Weight of the binding z-score
    #[arg(long, default_value_t = 0.5)]
    w_binding: f64,

    /// Weight of the stability z-score
    #[arg(long, default_value_t = 0.5)]
    w_stability: f64,
}

pub(crate) fn run(args: &Args) -> Result<()> {
    trace!("{args:?}");

    let binding_file = find_table(&args.dir, "binding_ddg")?;
    let stability_file = find_table(&args.dir, "stability_ddg")?;
    debug!(
        "Using {} and {}",
        binding_file.display(),
        stability_file.display()
    );

    let settings = FilterSettings {
        bind_threshold: args.bind_threshold,
        stab_threshold: args.stab_threshold,
        w_binding: args.w_binding,
        w_stability: args.w_stability,
    };
    let mut df = filter_mutations(
        &read_csv(&binding_file, false)?,
        &read_csv(&stability_file, false)?,
        &args.chain,
        &settings,
    )?;
    if df.height() == 0 {
        warn!("No mutations pass the thresholds, nothing written");
        return Ok(());
    }

    let output_file = args.dir.join(&args.outname);
    write_df_to_file(&mut df, &output_file, DataFrameFileType::Csv)?;
    info!("Kept {} mutations, results saved to {}", df.height(), output_file.display());
    Ok(())
}
