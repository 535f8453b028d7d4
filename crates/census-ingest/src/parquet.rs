//! Parquet table reading.

use std::fs::File;
use std::path::Path;

use polars::prelude::{DataFrame, ParquetReader, SerReader};

use crate::error::{IngestError, Result};

/// Opens a file, mapping a missing file to `FileNotFound`.
pub(crate) fn open_source(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Reads a Parquet file with its native column types.
pub fn read_parquet_table(path: &Path) -> Result<DataFrame> {
    let file = open_source(path)?;
    ParquetReader::new(file)
        .finish()
        .map_err(|e| IngestError::Parquet {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}
