use crate::error::Result;
use polars::prelude::*;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static FIRST_INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// The first run of digits embedded in `s`, e.g. `42` for `QA42` or `Q42R`.
pub fn first_integer(s: &str) -> Option<u64> {
    FIRST_INTEGER.find(s).and_then(|m| m.as_str().parse().ok())
}

/// Round half away from zero to a fixed number of decimals.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Round a floating point column of `df` in place.
pub fn round_column(df: &mut DataFrame, name: &str, decimals: i32) -> Result<()> {
    let rounded: Float64Chunked = df
        .column(name)?
        .f64()?
        .into_iter()
        .map(|v| v.map(|x| round_to(x, decimals)))
        .collect();
    df.with_column(rounded.with_name(name.into()).into_series())?;
    Ok(())
}

/// Read a CSV file with a header row.
///
/// With `as_strings` every column is read as text, which never fails on
/// mixed-type columns; otherwise column types are inferred.
pub fn read_csv(path: &Path, as_strings: bool) -> Result<DataFrame> {
    let options = CsvReadOptions::default().with_has_header(true);
    let options = if as_strings {
        options.with_infer_schema_length(Some(0))
    } else {
        options
    };
    let df = options
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

/// Files directly inside `dir`, sorted by name.
pub fn sorted_dir_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// File name of `path` as UTF-8, or an empty string.
pub fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|f| f.to_str()).unwrap_or("")
}

/// Write a DataFrame to `file_path` in the given format.
pub fn write_df_to_file(df: &mut DataFrame, file_path: &Path, file_type: DataFrameFileType) -> Result<()> {
    if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::File::create(file_path)?;
    match file_type {
        DataFrameFileType::Csv => {
            CsvWriter::new(&mut file).finish(df)?;
        }
        DataFrameFileType::Parquet => {
            ParquetWriter::new(&mut file).finish(df)?;
        }
        DataFrameFileType::Json => {
            JsonWriter::new(&mut file)
                .with_json_format(JsonFormat::Json)
                .finish(df)?;
        }
        DataFrameFileType::NDJson => {
            JsonWriter::new(&mut file)
                .with_json_format(JsonFormat::JsonLines)
                .finish(df)?;
        }
    }
    Ok(())
}

/// File format for writing DataFrames.
#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum DataFrameFileType {
    /// Comma-separated values
    Csv,
    /// Parquet columnar storage
    Parquet,
    /// Standard JSON
    Json,
    /// Newline-delimited JSON
    NDJson,
}

impl std::fmt::Display for DataFrameFileType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DataFrameFileType::Csv => write!(f, "csv"),
            DataFrameFileType::Parquet => write!(f, "parquet"),
            DataFrameFileType::Json => write!(f, "json"),
            DataFrameFileType::NDJson => write!(f, "ndjson"),
        }
    }
}
