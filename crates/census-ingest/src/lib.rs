//! Census source loading.
//!
//! This crate reads the declared census inputs into Polars DataFrames.
//!
//! # Features
//!
//! - **Source Catalog**: Fixed file names under a data directory, with a
//!   presence check
//! - **Parquet Loading**: Fact and lookup tables with native column types
//! - **CSV Loading**: Reference files with every column read as a string,
//!   optionally pruned to named columns
//!
//! # Example
//!
//! ```ignore
//! use census_ingest::{SourceCatalog, load_sources};
//!
//! let catalog = SourceCatalog::new("data");
//! let sources = load_sources(&catalog)?;
//! println!("{} health rows", sources.health_conditions.height());
//! ```

mod catalog;
mod csv;
mod error;
mod loader;
mod parquet;

// === Error Types ===
pub use error::{IngestError, Result};

// === Catalog ===
pub use catalog::{SourceCatalog, SourceFormat, SourceStatus, SourceTable};

// === Readers ===
pub use csv::read_csv_strings;
pub use parquet::read_parquet_table;

// === Loading ===
pub use loader::{SourceTables, load_sources, read_source};
