//! Extraction of residue-residue interactions from PLIP XML reports.
//!
//! A PLIP report nests every contact under a section named after its
//! category (`<hydrogen_bonds>`, `<salt_bridges>`, ...). Each entry lists the
//! receptor residue (`resnr`, `restype`, `reschain`), the ligand residue
//! (`resnr_lig`, `restype_lig`, `reschain_lig`) and category-specific
//! geometry. This module flattens those entries into one table per category.

use crate::error::{Error, Result};
use crate::interactions::{Attribute, Interaction, InteractionRecord};
use crate::residues::residue_label;
use crate::utils::{write_df_to_file, DataFrameFileType};
use polars::prelude::*;
use roxmltree::{Document, Node};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Text of the first child element named `tag`, if it is present and not empty.
fn child_text<'a>(node: &Node<'a, '_>, tag: &str) -> Option<&'a str> {
    node.children()
        .find(|c| c.has_tag_name(tag))
        .and_then(|c| c.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Build a record from a single report entry of the given category.
fn parse_entry(interaction: Interaction, entry: &Node) -> Result<InteractionRecord> {
    let receptor = residue_label(
        child_text(entry, "restype"),
        child_text(entry, "reschain"),
        child_text(entry, "resnr"),
    )?;
    let ligand = residue_label(
        child_text(entry, "restype_lig"),
        child_text(entry, "reschain_lig"),
        child_text(entry, "resnr_lig"),
    )?;

    let mut record = InteractionRecord {
        interaction,
        receptor,
        ligand,
        distance: None,
        angle: None,
        offset: None,
    };
    for (attr, aliases) in interaction.schema() {
        let value = aliases
            .iter()
            .find_map(|alias| child_text(entry, alias))
            .map(str::to_string);
        match attr {
            Attribute::Distance => record.distance = value,
            Attribute::Angle => record.angle = value,
            Attribute::Offset => record.offset = value,
        }
    }
    Ok(record)
}

/// Collect every interaction entry of a parsed report, grouped by category.
///
/// Entries are the element children of any element named after a category
/// tag, wherever it sits in the document. Categories without entries are
/// absent from the returned map.
pub fn collect_interactions(doc: &Document) -> Result<BTreeMap<Interaction, Vec<InteractionRecord>>> {
    let mut found: BTreeMap<Interaction, Vec<InteractionRecord>> = BTreeMap::new();
    for interaction in Interaction::ALL {
        let records = doc
            .descendants()
            .filter(|n| n.has_tag_name(interaction.tag()))
            .flat_map(|section| section.children().filter(|c| c.is_element()))
            .map(|entry| parse_entry(interaction, &entry))
            .collect::<Result<Vec<_>>>()?;
        if !records.is_empty() {
            debug!("Found {} {interaction} entries", records.len());
            found.insert(interaction, records);
        }
    }
    Ok(found)
}

/// Read a PLIP XML report from disk and collect its interactions.
pub fn read_report(path: &Path) -> Result<BTreeMap<Interaction, Vec<InteractionRecord>>> {
    let text = std::fs::read_to_string(path)?;
    let doc = Document::parse(&text).map_err(|source| Error::Xml {
        path: path.to_path_buf(),
        source,
    })?;
    let found = collect_interactions(&doc)?;
    if found.is_empty() {
        return Err(Error::EmptyReport(path.to_path_buf()));
    }
    Ok(found)
}

/// Convert records of a single category into a table with that category's header.
pub fn records_to_df(interaction: Interaction, records: &[InteractionRecord]) -> Result<DataFrame> {
    let mut columns = vec![
        Column::new(
            "rec".into(),
            records.iter().map(|r| r.receptor.clone()).collect::<Vec<String>>(),
        ),
        Column::new(
            "lig".into(),
            records.iter().map(|r| r.ligand.clone()).collect::<Vec<String>>(),
        ),
    ];
    for (attr, _) in interaction.schema() {
        columns.push(Column::new(
            attr.name().into(),
            records
                .iter()
                .map(|r| r.attribute(*attr).map(str::to_string))
                .collect::<Vec<Option<String>>>(),
        ));
    }
    Ok(DataFrame::new(columns)?)
}

/// Extract the interactions of a PLIP report into one table per category.
///
/// Only categories with at least one entry get a table.
///
/// # Example
///
/// ```no_run
/// use plipscan::extract_interactions;
/// use std::path::Path;
///
/// let tables = extract_interactions(Path::new("path/to/report.xml")).unwrap();
/// for (interaction, df) in &tables {
///     println!("{interaction}: {} rows", df.height());
/// }
/// ```
pub fn extract_interactions(report: &Path) -> Result<BTreeMap<Interaction, DataFrame>> {
    read_report(report)?
        .iter()
        .map(|(interaction, records)| Ok((*interaction, records_to_df(*interaction, records)?)))
        .collect()
}

/// Write per-category tables as `PLIP_<prefix>_<category>.<ext>` in `output_dir`.
///
/// Returns the paths written, in category order.
pub fn write_interaction_tables(
    tables: &mut BTreeMap<Interaction, DataFrame>,
    output_dir: &Path,
    prefix: &str,
    file_type: DataFrameFileType,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;
    let mut written = Vec::with_capacity(tables.len());
    for (interaction, df) in tables.iter_mut() {
        if df.height() == 0 {
            continue;
        }
        let output_file = output_dir.join(format!("PLIP_{prefix}_{interaction}.{file_type}"));
        write_df_to_file(df, &output_file, file_type)?;
        info!(
            "Wrote {} {interaction} rows to {}",
            df.height(),
            output_file.display()
        );
        written.push(output_file);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_path() -> PathBuf {
        let root = env!("CARGO_MANIFEST_DIR");
        Path::new(root).join("test-data/plip/6M0J_A24R.xml")
    }

    fn parse_str(xml: &str) -> Result<BTreeMap<Interaction, Vec<InteractionRecord>>> {
        let doc = Document::parse(xml).unwrap();
        collect_interactions(&doc)
    }

    #[test]
    fn test_single_hydrogen_bond() {
        let xml = r#"<report><bindingsite><interactions>
            <hydrogen_bonds>
                <hydrogen_bond id="1">
                    <resnr>24</resnr><restype>GLN</restype><reschain>A</reschain>
                    <resnr_lig>10</resnr_lig><restype_lig>ARG</restype_lig><reschain_lig>B</reschain_lig>
                    <dist_h-a>2.9</dist_h-a><dist_d-a>3.8</dist_d-a><don_angle>160</don_angle>
                </hydrogen_bond>
            </hydrogen_bonds>
            <salt_bridges/>
        </interactions></bindingsite></report>"#;
        let found = parse_str(xml).unwrap();
        assert_eq!(found.len(), 1);

        let hbonds = &found[&Interaction::HydrogenBond];
        assert_eq!(hbonds.len(), 1);
        assert_eq!(hbonds[0].receptor, "QA24");
        assert_eq!(hbonds[0].ligand, "RB10");
        assert_eq!(hbonds[0].distance.as_deref(), Some("2.9"));
        assert_eq!(hbonds[0].angle.as_deref(), Some("160"));
        assert_eq!(hbonds[0].offset, None);

        let df = records_to_df(Interaction::HydrogenBond, hbonds).unwrap();
        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(columns, vec!["rec", "lig", "distance", "angle"]);
        assert_eq!(df.height(), 1);
        assert_eq!(
            df.column("distance").unwrap().str().unwrap().get(0),
            Some("2.9")
        );
    }

    #[test]
    fn test_missing_fields_give_placeholder() {
        let xml = r#"<report><hydrophobic_interactions>
            <hydrophobic_interaction id="1">
                <resnr>24</resnr><restype>LEU</restype>
                <resnr_lig>10</resnr_lig><restype_lig>PHE</restype_lig><reschain_lig>B</reschain_lig>
                <dist>3.7</dist>
            </hydrophobic_interaction>
        </hydrophobic_interactions></report>"#;
        let found = parse_str(xml).unwrap();
        let record = &found[&Interaction::Hydrophobic][0];
        assert_eq!(record.receptor, "NA");
        assert_eq!(record.ligand, "FB10");
        assert_eq!(record.distance.as_deref(), Some("3.7"));
    }

    #[test]
    fn test_unknown_residue_is_fatal() {
        let xml = r#"<report><salt_bridges><salt_bridge id="1">
            <resnr>5</resnr><restype>HOH</restype><reschain>A</reschain>
            <resnr_lig>10</resnr_lig><restype_lig>ASP</restype_lig><reschain_lig>B</reschain_lig>
            <dist>4.1</dist>
        </salt_bridge></salt_bridges></report>"#;
        match parse_str(xml) {
            Err(Error::UnknownResidue(code)) => assert_eq!(code, "HOH"),
            other => panic!("Expected unknown residue error, got {other:?}"),
        }
    }

    #[test]
    fn test_pi_stack_aliases() {
        let xml = r#"<report><pi_stacks><pi_stack id="1">
            <resnr>41</resnr><restype>TYR</restype><reschain>A</reschain>
            <resnr_lig>505</resnr_lig><restype_lig>TYR</restype_lig><reschain_lig>B</reschain_lig>
            <centdist>5.2</centdist><angle>12.5</angle><offset>1.1</offset>
        </pi_stack></pi_stacks></report>"#;
        let found = parse_str(xml).unwrap();
        let record = &found[&Interaction::PiStack][0];
        assert_eq!(record.receptor, "YA41");
        assert_eq!(record.distance.as_deref(), Some("5.2"));
        assert_eq!(record.angle.as_deref(), Some("12.5"));
        assert_eq!(record.offset.as_deref(), Some("1.1"));
    }

    #[test]
    fn test_report_file() {
        let found = read_report(&report_path()).unwrap();
        assert_eq!(found[&Interaction::HydrogenBond].len(), 2);
        assert_eq!(found[&Interaction::Hydrophobic].len(), 1);
        assert_eq!(found[&Interaction::SaltBridge].len(), 1);
        assert!(!found.contains_key(&Interaction::PiStack));
        assert!(!found.contains_key(&Interaction::MetalComplex));
    }

    #[test]
    fn test_empty_report_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xml");
        std::fs::write(&path, "<report><hydrogen_bonds/></report>").unwrap();
        assert!(matches!(read_report(&path), Err(Error::EmptyReport(_))));

        std::fs::write(&path, "<report><hydrogen_bonds>").unwrap();
        assert!(matches!(read_report(&path), Err(Error::Xml { .. })));
    }

    #[test]
    fn test_empty_categories_write_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut tables = extract_interactions(&report_path()).unwrap();
        let written =
            write_interaction_tables(&mut tables, dir.path(), "6M0J_A24R", DataFrameFileType::Csv)
                .unwrap();
        assert_eq!(written.len(), 3);

        let hbond_file = dir.path().join("PLIP_6M0J_A24R_hydrogen_bonds.csv");
        assert!(hbond_file.exists());
        let text = std::fs::read_to_string(hbond_file).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("rec,lig,distance,angle"));
        assert_eq!(lines.next(), Some("QA24,RB10,2.9,160"));

        for absent in ["pi_stacks", "pi_cation_interactions", "halogen_bonds", "metal_complexes"] {
            let path = dir.path().join(format!("PLIP_6M0J_A24R_{absent}.csv"));
            assert!(!path.exists(), "{} should not exist", path.display());
        }
    }
}
