//! Binding and stability ddG per position from FoldX `AnalyseComplex` summaries.

use crate::error::{Error, Result};
use crate::residues::AMINO_ACIDS;
use crate::utils::{file_name, round_to, sorted_dir_files};
use polars::prelude::*;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, trace};

static MUTANT_SUMMARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Summary_([A-Z]{3})(\d+)_").unwrap());

/// Decimals kept in ddG values.
const DDG_DECIMALS: i32 = 2;

/// Energies of one FoldX summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoldxEnergies {
    /// Interaction energy between the two groups
    pub interaction: f64,
    /// Stability of the second group
    pub stability: f64,
}

/// ddG of a single substitution.
#[derive(Debug, Clone, PartialEq)]
pub struct DdgEntry {
    /// Residue number of the substituted site
    pub position: u32,
    /// Three-letter code of the mutant residue
    pub mut_aa: String,
    /// Change in interaction energy relative to the wild type
    pub binding_ddg: f64,
    /// Change in stability relative to the wild type
    pub stability_ddg: f64,
}

/// Read the energies of a FoldX summary.
///
/// The energies sit on the first line starting with `./`, the interaction
/// energy in field 5 and the stability in field 7.
pub fn parse_foldx_summary(text: &str, path: &Path) -> Result<FoldxEnergies> {
    let malformed = |reason: &str| Error::MalformedEnergy {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };
    let line = text
        .lines()
        .find(|l| l.starts_with("./"))
        .ok_or_else(|| malformed("no energy line"))?;
    let fields: Vec<&str> = line.split_whitespace().collect();
    let field = |idx: usize| -> Result<f64> {
        fields
            .get(idx)
            .and_then(|f| f.parse().ok())
            .ok_or_else(|| malformed(&format!("cannot read energy field {idx}")))
    };
    Ok(FoldxEnergies {
        interaction: field(5)?,
        stability: field(7)?,
    })
}

fn read_foldx_summary(path: &Path) -> Result<FoldxEnergies> {
    parse_foldx_summary(&std::fs::read_to_string(path)?, path)
}

/// Substitution encoded in a summary file name, e.g. `Summary_ALA24_...`.
///
/// Only the 20 standard residues are accepted.
fn parse_mutant_name(name: &str) -> Option<(String, u32)> {
    let caps = MUTANT_SUMMARY.captures(name)?;
    let aa = &caps[1];
    if !AMINO_ACIDS.contains(&aa) {
        return None;
    }
    Some((aa.to_string(), caps[2].parse().ok()?))
}

/// Compute binding and stability ddG of every mutant summary in `dir`.
///
/// Files with the given extension other than the wild type itself are
/// considered, in name order; files whose names don't encode a substitution
/// are skipped.
pub fn get_ddg_by_position(wt_file: &Path, dir: &Path, extension: &str) -> Result<Vec<DdgEntry>> {
    let wt = read_foldx_summary(wt_file)?;
    debug!("Wild-type energies: {wt:?}");
    let wt_abs = std::path::absolute(wt_file)?;

    let mut entries = Vec::new();
    for path in sorted_dir_files(dir)? {
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        if std::path::absolute(&path)? == wt_abs {
            continue;
        }
        let Some((mut_aa, position)) = parse_mutant_name(file_name(&path)) else {
            trace!("Skipping {}", path.display());
            continue;
        };
        let mutant = read_foldx_summary(&path)?;
        entries.push(DdgEntry {
            position,
            mut_aa,
            binding_ddg: round_to(mutant.interaction - wt.interaction, DDG_DECIMALS),
            stability_ddg: round_to(mutant.stability - wt.stability, DDG_DECIMALS),
        });
    }
    Ok(entries)
}

/// Pivot ddG entries into a `Position` × residue matrix.
///
/// Rows are sorted by position and columns follow [`AMINO_ACIDS`]; missing
/// substitutions are null.
pub fn ddg_matrix(entries: &[DdgEntry], value: impl Fn(&DdgEntry) -> f64) -> Result<DataFrame> {
    let mut by_position: BTreeMap<u32, HashMap<&str, f64>> = BTreeMap::new();
    for entry in entries {
        by_position
            .entry(entry.position)
            .or_default()
            .insert(entry.mut_aa.as_str(), value(entry));
    }

    let mut columns = vec![Column::new(
        "Position".into(),
        by_position.keys().copied().collect::<Vec<u32>>(),
    )];
    for aa in AMINO_ACIDS {
        columns.push(Column::new(
            aa.into(),
            by_position
                .values()
                .map(|row| row.get(aa).copied())
                .collect::<Vec<Option<f64>>>(),
        ));
    }
    Ok(DataFrame::new(columns)?)
}
