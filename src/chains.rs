//! Wild-type residue maps of a chain, recovered from interaction tables.

use crate::error::{Error, Result};
use crate::interactions::Interaction;
use crate::residues::ResidueLabel;
use crate::utils::read_csv;
use polars::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Path of the table of `interaction` for a table prefix such as `out/PLIP_6M0J`.
fn table_path(prefix: &str, interaction: Interaction) -> PathBuf {
    PathBuf::from(format!("{prefix}_{interaction}.csv"))
}

/// Load the `rec`/`lig` columns of every interaction table sharing `prefix`.
///
/// Missing tables, unreadable tables and tables without both label columns
/// are skipped. Having no usable table at all is an error.
pub fn read_interaction_tables(prefix: &str) -> Result<Vec<(Interaction, DataFrame)>> {
    let mut tables = Vec::new();
    for interaction in Interaction::SUMMARIZED {
        let path = table_path(prefix, interaction);
        if !path.exists() {
            debug!("{interaction}: missing {}, skipped", path.display());
            continue;
        }
        let df = match read_csv(&path, true) {
            Ok(df) => df,
            Err(e) => {
                warn!("{interaction}: failed to read {}: {e}", path.display());
                continue;
            }
        };
        match df.select(["rec", "lig"]) {
            Ok(labels) => {
                debug!("{interaction}: {} interactions", labels.height());
                tables.push((interaction, labels));
            }
            Err(_) => warn!(
                "{interaction}: skipped {} (needs columns: rec, lig)",
                path.display()
            ),
        }
    }
    if tables.is_empty() {
        return Err(Error::NoInteractionTables(prefix.to_string()));
    }
    Ok(tables)
}

/// Distinct residues of `chain` among the receptor and ligand labels of `tables`.
pub fn collect_chain_residues(tables: &[(Interaction, DataFrame)], chain: char) -> Result<BTreeSet<ResidueLabel>> {
    let chain = chain.to_ascii_uppercase();
    let mut found = BTreeSet::new();
    for (_, df) in tables {
        for name in ["rec", "lig"] {
            for label in df.column(name)?.str()?.into_iter().flatten() {
                if let Some(res) = ResidueLabel::parse(label) {
                    if res.chain == chain {
                        found.insert(res);
                    }
                }
            }
        }
    }
    Ok(found)
}

/// Residue map of `chain` as a (`position`, `aa`) table sorted by position.
///
/// # Example
///
/// ```no_run
/// use plipscan::export_chain_residues;
///
/// let df = export_chain_residues("plip_csv/PLIP_6M0J", 'A').unwrap();
/// println!("Chain A has {} interface residues", df.height());
/// ```
pub fn export_chain_residues(prefix: &str, chain: char) -> Result<DataFrame> {
    let tables = read_interaction_tables(prefix)?;
    let mut residues: Vec<(u32, char)> = collect_chain_residues(&tables, chain)?
        .into_iter()
        .map(|res| (res.resnum, res.aa))
        .collect();
    residues.sort();
    residues.dedup();

    Ok(df!(
        "position" => residues.iter().map(|(pos, _)| *pos).collect::<Vec<u32>>(),
        "aa" => residues.iter().map(|(_, aa)| aa.to_string()).collect::<Vec<String>>(),
    )?)
}

/// Write a residue map as headerless `position,aa` lines, the format read by
/// [`crate::ResidueMap::from_file`].
pub fn write_residue_map(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::File::create(path)?;
    CsvWriter::new(&mut file).include_header(false).finish(df)?;
    Ok(())
}
