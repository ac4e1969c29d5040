//! Per-mutation summaries of interface contacts and binding energies.
//!
//! Interaction counts come from the per-category tables written by the
//! extractor, one set of tables per mutant structure, named
//! `PLIP_<structure>[_<mutation>]_<category>.csv`. Binding energies come from
//! a Rosetta score file, where the `dG_separated` term sits in the sixth
//! column of every `SCORE:` line and the structure is named in the last one.
//! Every value is reported both as-is and relative to the wild type.

use crate::error::Result;
use crate::interactions::Interaction;
use crate::mutations::{normalize_mutation, ResidueMap};
use crate::utils::{file_name, first_integer, read_csv, round_to, sorted_dir_files};
use polars::prelude::*;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, trace, warn};

/// Prefix of score file lines holding per-structure energies.
const SCORE_MARKER: &str = "SCORE:";
/// Column of the `dG_separated` term in score lines.
const DG_SEPARATED_FIELD: usize = 5;
/// Decimals kept in energy deltas.
const ENERGY_DECIMALS: i32 = 3;

const N_CATEGORIES: usize = Interaction::SUMMARIZED.len();

/// Interaction counts per mutation, by category.
pub type InteractionCounts = BTreeMap<String, [usize; N_CATEGORIES]>;

/// Counts, energy and wild-type deltas of a single mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationRecord {
    /// Wild-type-qualified mutation (`Q24R`) or the wild-type structure name
    pub mutation: String,
    /// Contacts per category, in [`Interaction::SUMMARIZED`] order
    pub counts: [usize; N_CATEGORIES],
    /// Separated binding free energy, if scored
    pub dg_separated: Option<f64>,
    /// `counts` minus the wild-type counts
    pub delta_counts: [i64; N_CATEGORIES],
    /// `dg_separated` minus the wild-type energy, if both are known
    pub delta_dg_separated: Option<f64>,
}

/// Mutation named by the file name of a count table or a score description.
///
/// The name is split on `_`: a single part is a structure name taken
/// verbatim, otherwise the second part is the mutation token.
fn mutation_from_name(name: &str, wt: &ResidueMap) -> String {
    let parts: Vec<&str> = name.split('_').collect();
    match parts.as_slice() {
        [single] => single.to_string(),
        [_, token, ..] => normalize_mutation(token, wt),
        [] => String::new(),
    }
}

/// Count table category and mutation for a file name, if it is a count table.
fn classify_table(name: &str, wt: &ResidueMap) -> Option<(usize, String)> {
    if !name.ends_with(".csv") {
        return None;
    }
    Interaction::SUMMARIZED
        .iter()
        .position(|intxn| name.ends_with(&format!("{}.csv", intxn.tag())))
        .map(|idx| {
            let tag = Interaction::SUMMARIZED[idx].tag();
            let core = name
                .replace("PLIP_", "")
                .replace(&format!("_{tag}.csv"), "");
            (idx, mutation_from_name(&core, wt))
        })
}

/// Number of data rows in a table, header excluded.
fn count_rows(path: &Path) -> Result<usize> {
    if std::fs::metadata(path)?.len() == 0 {
        return Ok(0);
    }
    Ok(read_csv(path, true)?.height())
}

/// Count the interactions of every mutation from the tables in `dir`.
///
/// Tables are visited in name order; if two tables resolve to the same
/// mutation and category the later one wins. Unreadable tables are skipped.
pub fn collect_interaction_counts(dir: &Path, wt: &ResidueMap) -> Result<InteractionCounts> {
    let mut counts = InteractionCounts::new();
    for path in sorted_dir_files(dir)? {
        let Some((idx, mutation)) = classify_table(file_name(&path), wt) else {
            continue;
        };
        let n = match count_rows(&path) {
            Ok(n) => n,
            Err(e) => {
                warn!("Skipping unreadable table {}: {e}", path.display());
                continue;
            }
        };
        trace!(
            "{mutation}: {n} {} from {}",
            Interaction::SUMMARIZED[idx],
            path.display()
        );
        counts.entry(mutation).or_insert([0; N_CATEGORIES])[idx] = n;
    }
    Ok(counts)
}

/// Parse one score file line into a mutation and its `dG_separated`.
///
/// Returns `None` for lines that are not scores, the header, and any line
/// with missing or unparsable fields. Non-finite energies (`nan`, `inf`)
/// count as unparsable.
fn parse_score_line(line: &str, wt: &ResidueMap) -> Option<(String, f64)> {
    if !line.starts_with(SCORE_MARKER) {
        return None;
    }
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 2 || fields[1] == "total_score" {
        return None;
    }
    let dg_separated: f64 = fields
        .get(DG_SEPARATED_FIELD)?
        .parse::<f64>()
        .ok()
        .filter(|dg| dg.is_finite())?;
    let description = fields.last()?;
    let parts: Vec<&str> = description.split('_').collect();
    let mutation = match parts.as_slice() {
        [structure, _] => structure.to_string(),
        [_, token, _, ..] => normalize_mutation(token, wt),
        _ => return None,
    };
    Some((mutation, dg_separated))
}

/// Read `dG_separated` per mutation from a Rosetta score file.
///
/// Malformed lines are skipped. Later lines overwrite earlier ones for the
/// same mutation.
pub fn parse_score_file(text: &str, wt: &ResidueMap) -> HashMap<String, f64> {
    let mut energies = HashMap::new();
    for line in text.lines() {
        match parse_score_line(line, wt) {
            Some((mutation, dg)) => {
                energies.insert(mutation, dg);
            }
            None if line.starts_with(SCORE_MARKER) => debug!("Skipped score line: {line}"),
            None => {}
        }
    }
    energies
}

/// Ordering of non wild-type rows: largest energy delta first (missing deltas
/// count as zero), then by residue position, rows without one last.
fn compare_rows(a: &MutationRecord, b: &MutationRecord) -> Ordering {
    let delta = |r: &MutationRecord| r.delta_dg_separated.unwrap_or(0.0);
    let site = |r: &MutationRecord| first_integer(&r.mutation).unwrap_or(u64::MAX);
    delta(b)
        .partial_cmp(&delta(a))
        .unwrap_or(Ordering::Equal)
        .then_with(|| site(a).cmp(&site(b)))
}

/// Combine interaction counts and energies into one record per mutation.
///
/// The wild-type row is always first, even when neither source mentions it
/// (zero counts, no energy). Remaining rows are sorted by [`compare_rows`].
pub fn build_summary(
    counts: &InteractionCounts,
    energies: &HashMap<String, f64>,
    wt_name: &str,
) -> Vec<MutationRecord> {
    let make_row = |mutation: &str| MutationRecord {
        mutation: mutation.to_string(),
        counts: counts.get(mutation).copied().unwrap_or([0; N_CATEGORIES]),
        dg_separated: energies.get(mutation).copied(),
        delta_counts: [0; N_CATEGORIES],
        delta_dg_separated: None,
    };

    let mut energy_only: Vec<&String> = energies
        .keys()
        .filter(|m| m.as_str() != wt_name && !counts.contains_key(*m))
        .collect();
    energy_only.sort();

    let mut rows: Vec<MutationRecord> = std::iter::once(wt_name)
        .chain(counts.keys().map(String::as_str).filter(|m| *m != wt_name))
        .chain(energy_only.into_iter().map(String::as_str))
        .map(make_row)
        .collect();

    let wt_counts = rows[0].counts;
    let wt_dg = rows[0].dg_separated;
    for row in rows.iter_mut() {
        for (i, delta) in row.delta_counts.iter_mut().enumerate() {
            *delta = row.counts[i] as i64 - wt_counts[i] as i64;
        }
        row.delta_dg_separated = match (row.dg_separated, wt_dg) {
            (Some(dg), Some(wt)) => Some(round_to(dg - wt, ENERGY_DECIMALS)),
            _ => None,
        };
    }

    rows[1..].sort_by(compare_rows);
    rows
}

/// Convert summary records into a table.
///
/// Columns: `mutation`, one count per category, `dG_separated`, one
/// `delta_<category>` per category, `delta_dG_separated`.
pub fn summary_to_df(rows: &[MutationRecord]) -> Result<DataFrame> {
    let mut columns = vec![Column::new(
        "mutation".into(),
        rows.iter().map(|r| r.mutation.clone()).collect::<Vec<String>>(),
    )];
    for (i, intxn) in Interaction::SUMMARIZED.iter().enumerate() {
        columns.push(Column::new(
            intxn.tag().into(),
            rows.iter().map(|r| r.counts[i] as u32).collect::<Vec<u32>>(),
        ));
    }
    columns.push(Column::new(
        "dG_separated".into(),
        rows.iter().map(|r| r.dg_separated).collect::<Vec<Option<f64>>>(),
    ));
    for (i, intxn) in Interaction::SUMMARIZED.iter().enumerate() {
        columns.push(Column::new(
            format!("delta_{}", intxn.tag()).into(),
            rows.iter().map(|r| r.delta_counts[i]).collect::<Vec<i64>>(),
        ));
    }
    columns.push(Column::new(
        "delta_dG_separated".into(),
        rows.iter()
            .map(|r| r.delta_dg_separated)
            .collect::<Vec<Option<f64>>>(),
    ));
    Ok(DataFrame::new(columns)?)
}

/// Summarise interaction counts and binding energies of every mutation.
///
/// # Arguments
///
/// * `plip_dir` - Directory of per-category interaction tables
/// * `score_file` - Rosetta score file with `dG_separated` energies
/// * `wt_name` - Structure name of the wild type, e.g. `6M0J`
/// * `wt` - Wild-type residues used to name mutations
///
/// # Example
///
/// ```no_run
/// use plipscan::{summarize_mutations, ResidueMap};
/// use std::path::Path;
///
/// let wt = ResidueMap::from_file(Path::new("6M0J_chainA_residues.txt")).unwrap();
/// let rows = summarize_mutations(Path::new("plip_csv"), Path::new("score.sc"), "6M0J", &wt).unwrap();
/// println!("Wild-type dG_separated: {:?}", rows[0].dg_separated);
/// ```
pub fn summarize_mutations(
    plip_dir: &Path,
    score_file: &Path,
    wt_name: &str,
    wt: &ResidueMap,
) -> Result<Vec<MutationRecord>> {
    let counts = collect_interaction_counts(plip_dir, wt)?;
    debug!("Collected interaction counts for {} structures", counts.len());

    let energies = parse_score_file(&std::fs::read_to_string(score_file)?, wt);
    debug!("Collected dG_separated for {} structures", energies.len());

    if !counts.contains_key(wt_name) && !energies.contains_key(wt_name) {
        warn!("No data found for wild type {wt_name}; its row will be empty");
    }
    Ok(build_summary(&counts, &energies, wt_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wt_map() -> ResidueMap {
        [(24, 'Q'), (31, 'K'), (353, 'K')].into_iter().collect()
    }

    fn write_table(dir: &Path, name: &str, n_rows: usize) {
        let mut text = String::from("rec,lig,distance\n");
        for i in 0..n_rows {
            text.push_str(&format!("QA{i},RB{i},3.{i}\n"));
        }
        std::fs::write(dir.join(name), text).unwrap();
    }

    #[test]
    fn test_classify_table() {
        let wt = wt_map();
        assert_eq!(
            classify_table("PLIP_6M0J_hydrogen_bonds.csv", &wt),
            Some((0, "6M0J".to_string()))
        );
        assert_eq!(
            classify_table("PLIP_6M0J_A24R_salt_bridges.csv", &wt),
            Some((2, "Q24R".to_string()))
        );
        assert_eq!(
            classify_table("PLIP_6M0J_Z99Q_halogen_bonds.csv", &wt),
            Some((5, "Z99Q".to_string()))
        );
        assert_eq!(classify_table("PLIP_6M0J_metal_complexes.csv", &wt), None);
        assert_eq!(classify_table("PLIP_6M0J_hydrogen_bonds.tsv", &wt), None);
    }

    #[test]
    fn test_parse_score_file_skips_noise() {
        let text = "\
SEQUENCE:
SCORE: total_score complex_normalized dG_cross dG_cross/dSASAx100 dG_separated description
SCORE: -812.3 -1.2 -40.1 -1.9 -45.678 6M0J_0001
SCORE: -810.0 -1.1 -38.0 -1.7 -40.123 6M0J_A24R_0001
SCORE: -809.0 -1.1 -38.0 -1.7 nan_ish 6M0J_A31E_0001
SCORE: -809.0 -1.1
SCORE: -805.0 -1.0 -30.0 -1.5 -39.5 lonely
SCORE: -805.0 -1.0 -30.0 -1.5 -50.25 6M0J_Z99Q_0001
REMARK something else
";
        let energies = parse_score_file(text, &wt_map());
        assert_eq!(energies.len(), 3);
        assert_eq!(energies["6M0J"], -45.678);
        assert_eq!(energies["Q24R"], -40.123);
        assert_eq!(energies["Z99Q"], -50.25);
        assert!(!energies.contains_key("K31E"));
    }

    #[test]
    fn test_wild_type_row_without_data() {
        let mut counts = InteractionCounts::new();
        counts.insert("Q24R".to_string(), [1, 2, 0, 0, 0, 0]);
        let energies = HashMap::from([("Q24R".to_string(), -3.0)]);

        let rows = build_summary(&counts, &energies, "6M0J");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].mutation, "6M0J");
        assert_eq!(rows[0].counts, [0; N_CATEGORIES]);
        assert_eq!(rows[0].dg_separated, None);
        assert_eq!(rows[0].delta_dg_separated, None);
        assert_eq!(rows[1].delta_counts, [1, 2, 0, 0, 0, 0]);
        assert_eq!(rows[1].delta_dg_separated, None);
    }

    #[test]
    fn test_deltas_and_ordering() {
        let mut counts = InteractionCounts::new();
        counts.insert("6M0J".to_string(), [5, 3, 1, 0, 0, 0]);
        counts.insert("Q24R".to_string(), [4, 3, 2, 0, 0, 0]);
        counts.insert("K31E".to_string(), [5, 1, 0, 0, 0, 0]);
        counts.insert("K353A".to_string(), [6, 3, 1, 1, 0, 0]);
        let energies = HashMap::from([
            ("6M0J".to_string(), -50.0),
            ("Q24R".to_string(), -45.5),
            ("K31E".to_string(), -48.0),
            ("K353A".to_string(), -45.5),
            ("WTX".to_string(), -52.25),
        ]);

        let rows = build_summary(&counts, &energies, "6M0J");
        let order: Vec<&str> = rows.iter().map(|r| r.mutation.as_str()).collect();
        // Equal deltas fall back to residue position; no position sorts last
        assert_eq!(order, vec!["6M0J", "Q24R", "K353A", "K31E", "WTX"]);

        assert_eq!(rows[0].delta_counts, [0; N_CATEGORIES]);
        assert_eq!(rows[0].delta_dg_separated, Some(0.0));
        assert_eq!(rows[1].delta_counts, [-1, 0, 1, 0, 0, 0]);
        assert_eq!(rows[1].delta_dg_separated, Some(4.5));
        assert_eq!(rows[3].delta_dg_separated, Some(2.0));
        assert_eq!(rows[4].counts, [0; N_CATEGORIES]);
        assert_eq!(rows[4].delta_counts, [-5, -3, -1, 0, 0, 0]);
        assert_eq!(rows[4].delta_dg_separated, Some(-2.25));

        let deltas: Vec<f64> = rows[1..]
            .iter()
            .map(|r| r.delta_dg_separated.unwrap_or(0.0))
            .collect();
        assert!(deltas.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_summarize_directory() {
        let dir = tempfile::tempdir().unwrap();
        let plip_dir = dir.path().join("plip");
        std::fs::create_dir_all(&plip_dir).unwrap();
        write_table(&plip_dir, "PLIP_6M0J_hydrogen_bonds.csv", 3);
        write_table(&plip_dir, "PLIP_6M0J_salt_bridges.csv", 1);
        write_table(&plip_dir, "PLIP_6M0J_A24R_hydrogen_bonds.csv", 2);
        write_table(&plip_dir, "PLIP_6M0J_A24R_pi_stacks.csv", 0);
        write_table(&plip_dir, "PLIP_6M0J_A31E_hydrophobic_interactions.csv", 4);
        write_table(&plip_dir, "PLIP_6M0J_metal_complexes.csv", 2);
        std::fs::write(plip_dir.join("notes.txt"), "ignored").unwrap();

        let score_file = dir.path().join("score.sc");
        std::fs::write(
            &score_file,
            "SCORE: total_score a b c dG_separated description\n\
             SCORE: 0 0 0 0 -10.0 6M0J_0001\n\
             SCORE: 0 0 0 0 -8.5 6M0J_A24R_0001\n\
             SCORE: 0 0 0 0 -12.0 6M0J_A31E_0001\n",
        )
        .unwrap();

        let rows = summarize_mutations(&plip_dir, &score_file, "6M0J", &wt_map()).unwrap();
        let order: Vec<&str> = rows.iter().map(|r| r.mutation.as_str()).collect();
        assert_eq!(order, vec!["6M0J", "Q24R", "K31E"]);
        assert_eq!(rows[0].counts, [3, 0, 1, 0, 0, 0]);
        assert_eq!(rows[1].counts, [2, 0, 0, 0, 0, 0]);
        assert_eq!(rows[1].delta_counts, [-1, 0, -1, 0, 0, 0]);
        assert_eq!(rows[1].delta_dg_separated, Some(1.5));
        assert_eq!(rows[2].counts, [0, 4, 0, 0, 0, 0]);
        assert_eq!(rows[2].delta_dg_separated, Some(-2.0));

        let df = summary_to_df(&rows).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 15);
        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(columns[0], "mutation");
        assert_eq!(columns[7], "dG_separated");
        assert_eq!(columns[8], "delta_hydrogen_bonds");
        assert_eq!(columns[14], "delta_dG_separated");
    }

    #[test]
    fn test_non_finite_energies_are_skipped() {
        let text = "\
SCORE: 0 0 0 0 -10.0 6M0J_0001
SCORE: 0 0 0 0 -9.0 6M0J_A24R_0001
SCORE: 0 0 0 0 nan 6M0J_A31E_0001
SCORE: 0 0 0 0 -5.0 6M0J_A40W_0001
SCORE: 0 0 0 0 -nan 6M0J_A41W_0001
SCORE: 0 0 0 0 inf 6M0J_A42W_0001
";
        let wt: ResidueMap = [(24, 'Q'), (31, 'K'), (40, 'L')].into_iter().collect();
        let energies = parse_score_file(text, &wt);
        assert_eq!(energies.len(), 3);
        assert!(!energies.contains_key("K31E"));
        assert!(!energies.contains_key("A41W"));
        assert!(!energies.contains_key("A42W"));

        let rows = build_summary(&InteractionCounts::new(), &energies, "6M0J");
        let order: Vec<&str> = rows.iter().map(|r| r.mutation.as_str()).collect();
        assert_eq!(order, vec!["6M0J", "L40W", "Q24R"]);
        assert_eq!(rows[1].delta_dg_separated, Some(5.0));
        assert_eq!(rows[2].delta_dg_separated, Some(1.0));
    }

    #[test]
    fn test_empty_and_unreadable_tables_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_table(dir.path(), "PLIP_6M0J_hydrogen_bonds.csv", 2);
        std::fs::write(dir.path().join("PLIP_6M0J_A24R_salt_bridges.csv"), "").unwrap();
        std::fs::write(
            dir.path().join("PLIP_6M0J_A31E_hydrogen_bonds.csv"),
            b"rec,lig\n\xff\xfe,RB1,x,y,z\n",
        )
        .unwrap();

        let counts = collect_interaction_counts(dir.path(), &wt_map()).unwrap();
        assert_eq!(counts["6M0J"], [2, 0, 0, 0, 0, 0]);
        assert_eq!(counts["Q24R"], [0; N_CATEGORIES]);
        assert!(!counts.contains_key("K31E"));
    }
}
