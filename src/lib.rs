#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

//! # plipscan Library
//!
//! This library turns the outputs of a saturation mutagenesis run into
//! tables: per-category interaction tables from PLIP XML reports, a
//! per-mutation summary of interaction counts and Rosetta `dG_separated`,
//! wild-type residue maps, FoldX ddG matrices, and a ranked selection of
//! promising substitutions.
//!
//! Results are returned as Polars DataFrames, which can be written to any of
//! the formats of [`DataFrameFileType`] or used directly.

mod chains;
mod ddg;
mod error;
mod filter;
mod interactions;
mod mutations;
mod plip;
mod residues;
mod summary;
mod utils;

// Re-export key public types
pub use chains::{collect_chain_residues, export_chain_residues, read_interaction_tables, write_residue_map};
pub use ddg::{ddg_matrix, get_ddg_by_position, parse_foldx_summary, DdgEntry, FoldxEnergies};
pub use error::{Error, Result};
pub use filter::{filter_mutations, find_table, melt_ddg_matrix, FilterSettings};
pub use interactions::{Attribute, Interaction, InteractionRecord};
pub use mutations::{normalize_mutation, ResidueMap};
pub use plip::{collect_interactions, extract_interactions, read_report, records_to_df, write_interaction_tables};
pub use residues::{residue_label, three_to_one, three_to_one_seq, ResidueLabel, AMINO_ACIDS, MISSING_LABEL};
pub use summary::{
    build_summary, collect_interaction_counts, parse_score_file, summarize_mutations, summary_to_df,
    InteractionCounts, MutationRecord,
};
pub use utils::{read_csv, write_df_to_file, DataFrameFileType};
