//! Loads every declared source table into memory.

use std::collections::BTreeMap;
use std::time::Instant;

use polars::prelude::DataFrame;
use tracing::info;

use census_model::LookupRole;

use crate::catalog::{SourceCatalog, SourceFormat, SourceTable};
use crate::csv::read_csv_strings;
use crate::error::{IngestError, Result};
use crate::parquet::read_parquet_table;

/// All source tables of one run.
#[derive(Debug, Clone)]
pub struct SourceTables {
    pub population: DataFrame,
    pub health_conditions: DataFrame,
    pub lookups: BTreeMap<LookupRole, DataFrame>,
    pub geo_correspondence: DataFrame,
    pub phn_mapping: DataFrame,
}

impl SourceTables {
    pub fn lookup(&self, role: LookupRole) -> Option<&DataFrame> {
        self.lookups.get(&role)
    }
}

/// Reads one declared table in its declared format.
pub fn read_source(catalog: &SourceCatalog, table: SourceTable) -> Result<DataFrame> {
    let path = catalog.path(table);
    let df = match table.format() {
        SourceFormat::Parquet => read_parquet_table(&path)?,
        SourceFormat::Csv => read_csv_strings(&path, table.pruned_columns())?,
    };
    info!(
        table = %table,
        file = table.file_name(),
        rows = df.height(),
        columns = df.width(),
        "loaded table"
    );
    Ok(df)
}

/// Loads every declared table. The first missing or unreadable file aborts.
pub fn load_sources(catalog: &SourceCatalog) -> Result<SourceTables> {
    if !catalog.data_dir().is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: catalog.data_dir().to_path_buf(),
        });
    }
    let start = Instant::now();
    let population = read_source(catalog, SourceTable::PopulationFact)?;
    let health_conditions = read_source(catalog, SourceTable::HealthConditionFact)?;
    let mut lookups = BTreeMap::new();
    for role in LookupRole::ALL {
        lookups.insert(role, read_source(catalog, SourceTable::Lookup(role))?);
    }
    let geo_correspondence = read_source(catalog, SourceTable::GeoCorrespondence)?;
    let phn_mapping = read_source(catalog, SourceTable::PhnMapping)?;
    info!(
        tables = SourceTable::all().len(),
        duration_ms = start.elapsed().as_millis(),
        "sources loaded"
    );
    Ok(SourceTables {
        population,
        health_conditions,
        lookups,
        geo_correspondence,
        phn_mapping,
    })
}
