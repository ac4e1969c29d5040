mod cli;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity of the program:
    /// -v for debug and -vv for trace messages
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only report errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract per-category interaction tables from a PLIP XML report
    Extract(cli::extract::Args),

    /// Summarise interaction counts and dG_separated per mutation
    Summary(cli::summary::Args),

    /// Export the residues of a chain seen in interaction tables
    Residues(cli::residues::Args),

    /// Tabulate FoldX binding and stability ddG by position
    Ddg(cli::ddg::Args),

    /// Select mutations that improve binding without destabilising the fold
    Filter(cli::filter::Args),
}

fn setup_logging(verbosity: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::ERROR
    } else {
        match verbosity {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = Cli::parse();
    setup_logging(args.verbose, args.quiet);

    let res = match &args.command {
        Commands::Extract(args) => cli::extract::run(args),
        Commands::Summary(args) => cli::summary::run(args),
        Commands::Residues(args) => cli::residues::run(args),
        Commands::Ddg(args) => cli::ddg::run(args),
        Commands::Filter(args) => cli::filter::run(args),
    };
    if let Err(e) = res {
        error!("{e}");
        std::process::exit(1);
    }
}
