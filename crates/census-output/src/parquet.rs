//! Parquet artifact writing.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{DataFrame, ParquetWriter};

/// Writes `df` to `path` and returns the number of rows written.
pub fn write_parquet(df: &DataFrame, path: &Path) -> Result<usize> {
    let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut df = df.clone();
    ParquetWriter::new(&mut file)
        .finish(&mut df)
        .with_context(|| format!("write parquet {}", path.display()))?;
    Ok(df.height())
}
