//! DataFrame helpers shared by the transformation stages.

use std::collections::BTreeSet;

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};

use census_common::{column_string_values, string_column};
use census_model::columns::CODE_COLUMNS;

use crate::error::{Result, TransformError};

/// Fails with `MissingColumn` unless every name is a column of `df`.
pub fn require_columns(df: &DataFrame, columns: &[&str], table: &str) -> Result<()> {
    for column in columns {
        if df.column(column).is_err() {
            return Err(TransformError::MissingColumn {
                column: (*column).to_string(),
                table: table.to_string(),
            });
        }
    }
    Ok(())
}

/// Extracts a column as trimmed optional strings.
pub fn string_values(df: &DataFrame, column: &str, table: &str) -> Result<Vec<Option<String>>> {
    column_string_values(df, column).ok_or_else(|| TransformError::MissingColumn {
        column: column.to_string(),
        table: table.to_string(),
    })
}

/// Copies `df` with every code column present rewritten as trimmed strings.
///
/// Parquet sources may store codes such as `state` or `sex` as integers
/// while lookups store them as text. Predicates run against this copy.
pub fn normalize_code_columns(df: &DataFrame) -> Result<DataFrame> {
    let mut out = df.clone();
    for name in CODE_COLUMNS {
        let Some(values) = column_string_values(df, name) else {
            continue;
        };
        out.with_column(string_column(name, values))?;
    }
    Ok(out)
}

/// Keeps the first row for each key value.
///
/// Rows whose key is null or blank are dropped. Returns the deduplicated
/// frame and the number of rows removed as duplicates.
pub fn dedupe_by_key(df: &DataFrame, key: &str, table: &str) -> Result<(DataFrame, usize)> {
    let keys = string_values(df, key, table)?;
    let mut seen = BTreeSet::new();
    let mut keep = Vec::with_capacity(keys.len());
    let mut duplicates = 0usize;
    for value in &keys {
        match value {
            Some(value) => {
                let first = seen.insert(value.as_str());
                if !first {
                    duplicates += 1;
                }
                keep.push(first);
            }
            None => keep.push(false),
        }
    }
    let mask = BooleanChunked::from_slice("dedupe".into(), &keep);
    Ok((df.filter(&mask)?, duplicates))
}
