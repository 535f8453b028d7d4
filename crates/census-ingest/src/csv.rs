//! CSV reading with every column kept as a string.
//!
//! Reference files carry codes such as `301011001` or `03`; reading them as
//! strings keeps leading zeros and avoids numeric coercion.

use std::path::Path;

use polars::prelude::{CsvReadOptions, DataFrame, SerReader};

use census_model::CaseInsensitiveSet;

use crate::error::{IngestError, Result};
use crate::parquet::open_source;

/// Reads a CSV file with all columns typed as strings.
///
/// When `keep` is given, only those columns are returned, in that order and
/// with that spelling; header matching is case-insensitive.
pub fn read_csv_strings(path: &Path, keep: Option<&[&str]>) -> Result<DataFrame> {
    // Surface a missing file as FileNotFound rather than a parse error.
    drop(open_source(path)?);

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    clean_column_names(&mut df)?;

    match keep {
        Some(columns) => prune_columns(&df, columns, path),
        None => Ok(df),
    }
}

/// Strips a byte-order mark and surrounding whitespace from headers.
fn clean_column_names(df: &mut DataFrame) -> Result<()> {
    let cleaned: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    df.set_column_names(cleaned)?;
    Ok(())
}

fn prune_columns(df: &DataFrame, columns: &[&str], path: &Path) -> Result<DataFrame> {
    let lookup = CaseInsensitiveSet::new(df.get_column_names_owned());
    let mut kept = Vec::with_capacity(columns.len());
    for wanted in columns {
        let actual = lookup
            .get(wanted)
            .ok_or_else(|| IngestError::MissingColumn {
                column: (*wanted).to_string(),
                path: path.to_path_buf(),
            })?;
        let mut column = df.column(actual)?.clone();
        column.rename((*wanted).into());
        kept.push(column);
    }
    Ok(DataFrame::new(kept)?)
}
