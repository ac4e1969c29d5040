use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type used across the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that abort a run.
///
/// Per-record problems (a noisy score line, a mutation token in an
/// unexpected shape) are not errors; they are logged and skipped where they
/// occur.
#[derive(Debug, Error)]
pub enum Error {
    /// A three-letter residue code outside the standard amino acid table.
    #[error("Unknown three-letter amino acid code: {0}")]
    UnknownResidue(String),

    /// The interaction report is not well-formed XML.
    #[error("Failed to parse interaction report '{path}': {source}", path = path.display())]
    Xml {
        /// Report location
        path: PathBuf,
        /// Underlying parser error
        #[source]
        source: roxmltree::Error,
    },

    /// The interaction report has no entries in any category.
    #[error("No interactions found in report '{}'", .0.display())]
    EmptyReport(PathBuf),

    /// The residue map yielded no usable `position,code` lines.
    #[error("Residue map '{}' is empty or invalid", .0.display())]
    EmptyResidueMap(PathBuf),

    /// An energy report lacks its energy record or has unreadable fields.
    #[error("Malformed energy record in '{path}': {reason}", path = path.display())]
    MalformedEnergy {
        /// Report location
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// A required input file could not be located.
    #[error("No CSV file containing '{keyword}' found in '{dir}'", dir = dir.display())]
    MissingInput {
        /// Directory searched
        dir: PathBuf,
        /// File name fragment looked for
        keyword: String,
    },

    /// None of the per-category interaction tables exist or are usable.
    #[error("No interaction tables found with prefix '{0}'")]
    NoInteractionTables(String),

    /// File system failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Table construction, reading or writing failure.
    #[error("DataFrame error: {0}")]
    Polars(#[from] PolarsError),
}
