//! Selection of mutations that strengthen binding without destabilising the fold.

use crate::error::{Error, Result};
use crate::utils::{file_name, round_column, sorted_dir_files};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Thresholds and weights for [`filter_mutations`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSettings {
    /// Keep mutations with binding ddG strictly above this
    pub bind_threshold: f64,
    /// Keep mutations with stability ddG strictly below this
    pub stab_threshold: f64,
    /// Weight of the binding z-score
    pub w_binding: f64,
    /// Weight of the stability z-score (subtracted)
    pub w_stability: f64,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            bind_threshold: 0.0,
            stab_threshold: 1.5,
            w_binding: 0.5,
            w_stability: 0.5,
        }
    }
}

/// First CSV file in `dir` (by name) whose name contains `keyword`.
pub fn find_table(dir: &Path, keyword: &str) -> Result<PathBuf> {
    let mut matches = sorted_dir_files(dir)?
        .into_iter()
        .filter(|p| {
            let name = file_name(p);
            name.ends_with(".csv") && name.contains(keyword)
        })
        .collect::<Vec<_>>();
    if matches.len() > 1 {
        warn!(
            "Found {} files containing '{keyword}', using {}",
            matches.len(),
            matches[0].display()
        );
    }
    if matches.is_empty() {
        return Err(Error::MissingInput {
            dir: dir.to_path_buf(),
            keyword: keyword.to_string(),
        });
    }
    Ok(matches.swap_remove(0))
}

/// Turn a `Position` × residue matrix into (`resi`, `mut_aa`, value) rows.
///
/// Values that are not numbers become null.
pub fn melt_ddg_matrix(df: &DataFrame, value_name: &str) -> Result<DataFrame> {
    let positions = df.column("Position")?.cast(&DataType::Int64)?;
    let positions = positions.i64()?;

    let mut resi: Vec<Option<i64>> = Vec::new();
    let mut mut_aa: Vec<String> = Vec::new();
    let mut values: Vec<Option<f64>> = Vec::new();
    for column in df.get_columns() {
        if column.name().as_str() == "Position" {
            continue;
        }
        let numeric = column.cast(&DataType::Float64)?;
        for (pos, value) in positions.into_iter().zip(numeric.f64()?.into_iter()) {
            resi.push(pos);
            mut_aa.push(column.name().to_string());
            values.push(value);
        }
    }
    Ok(df!(
        "resi" => resi,
        "mut_aa" => mut_aa,
        value_name => values,
    )?)
}

/// Filter substitutions by binding and stability ddG and rank them.
///
/// Both matrices are melted and joined on position and residue. Rows with
/// `binding_ddg > bind_threshold` and `stability_ddg < stab_threshold` are
/// kept and scored as `w_binding * z(binding) - w_stability * z(stability)`,
/// using population z-scores over the kept rows.
///
/// # Returns
///
/// A DataFrame with columns `chain`, `resi`, `mut_aa`, `binding_ddg`,
/// `stability_ddg`, `score`, rounded to two decimals and sorted by `resi`.
/// It is empty when nothing passes the thresholds.
pub fn filter_mutations(
    binding: &DataFrame,
    stability: &DataFrame,
    chain: &str,
    settings: &FilterSettings,
) -> Result<DataFrame> {
    let bind_long = melt_ddg_matrix(binding, "binding_ddg")?;
    let stab_long = melt_ddg_matrix(stability, "stability_ddg")?;
    let join_cols = [col("resi"), col("mut_aa")];

    let mut filtered = bind_long
        .lazy()
        .join(
            stab_long.lazy(),
            &join_cols,
            &join_cols,
            JoinArgs::new(JoinType::Inner),
        )
        .filter(
            col("binding_ddg")
                .gt(lit(settings.bind_threshold))
                .and(col("stability_ddg").lt(lit(settings.stab_threshold))),
        )
        .with_columns([
            ((col("binding_ddg") - col("binding_ddg").mean()) / col("binding_ddg").std(0))
                .alias("z_binding"),
            ((col("stability_ddg") - col("stability_ddg").mean())
                / col("stability_ddg").std(0))
            .alias("z_stability"),
        ])
        .with_column(
            (lit(settings.w_binding) * col("z_binding")
                - lit(settings.w_stability) * col("z_stability"))
            .alias("score"),
        )
        .with_column(lit(chain).alias("chain"))
        .select([
            col("chain"),
            col("resi"),
            col("mut_aa"),
            col("binding_ddg"),
            col("stability_ddg"),
            col("score"),
        ])
        .sort(
            ["resi"],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()?;
    debug!("{} substitutions pass the thresholds", filtered.height());

    for name in ["binding_ddg", "stability_ddg", "score"] {
        round_column(&mut filtered, name, 2)?;
    }
    Ok(filtered)
}
