//! Declared source files and where they live under the data directory.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use census_model::LookupRole;
use census_model::columns::{PHN_CODE, PHN_NAME, PHN_SA2_CODE};

/// Storage format of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    /// Columnar binary; native column types are preserved.
    Parquet,
    /// Delimited text; every column is read as a string.
    Csv,
}

/// A table the pipeline reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SourceTable {
    PopulationFact,
    HealthConditionFact,
    Lookup(LookupRole),
    GeoCorrespondence,
    PhnMapping,
}

impl SourceTable {
    /// Every declared table, in load order.
    pub fn all() -> Vec<SourceTable> {
        let mut tables = vec![SourceTable::PopulationFact, SourceTable::HealthConditionFact];
        tables.extend(LookupRole::ALL.into_iter().map(SourceTable::Lookup));
        tables.push(SourceTable::GeoCorrespondence);
        tables.push(SourceTable::PhnMapping);
        tables
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            SourceTable::PopulationFact => "fact_population.parquet",
            SourceTable::HealthConditionFact => "fact_health_conditions.parquet",
            SourceTable::Lookup(role) => match role {
                LookupRole::Age => "lookup_age.parquet",
                LookupRole::Sex => "lookup_sex.parquet",
                LookupRole::State => "lookup_state.parquet",
                LookupRole::GeogType => "lookup_geog_type.parquet",
                LookupRole::HealthCondition => "lookup_lthc.parquet",
                LookupRole::CommonHealthCondition => "lookup_common_lthc.parquet",
                LookupRole::Geography => "lookup_geography.parquet",
            },
            SourceTable::GeoCorrespondence => "geo_correspondence.csv",
            SourceTable::PhnMapping => "phn_sa2_mapping.csv",
        }
    }

    pub fn format(&self) -> SourceFormat {
        match self {
            SourceTable::GeoCorrespondence | SourceTable::PhnMapping => SourceFormat::Csv,
            _ => SourceFormat::Parquet,
        }
    }

    /// Columns kept at read time; `None` keeps every column.
    pub fn pruned_columns(&self) -> Option<&'static [&'static str]> {
        match self {
            SourceTable::PhnMapping => Some(&[PHN_SA2_CODE, PHN_CODE, PHN_NAME]),
            _ => None,
        }
    }
}

impl fmt::Display for SourceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceTable::PopulationFact => write!(f, "population"),
            SourceTable::HealthConditionFact => write!(f, "health_conditions"),
            SourceTable::Lookup(role) => write!(f, "lookup:{role}"),
            SourceTable::GeoCorrespondence => write!(f, "geo_correspondence"),
            SourceTable::PhnMapping => write!(f, "phn_mapping"),
        }
    }
}

/// Presence of one declared file.
#[derive(Debug, Clone, Serialize)]
pub struct SourceStatus {
    pub table: SourceTable,
    pub path: PathBuf,
    pub format: SourceFormat,
    pub exists: bool,
}

/// Resolves declared tables against a data directory.
#[derive(Debug, Clone)]
pub struct SourceCatalog {
    data_dir: PathBuf,
}

impl SourceCatalog {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path(&self, table: SourceTable) -> PathBuf {
        self.data_dir.join(table.file_name())
    }

    /// Reports which declared files are present.
    pub fn check(&self) -> Vec<SourceStatus> {
        SourceTable::all()
            .into_iter()
            .map(|table| {
                let path = self.path(table);
                SourceStatus {
                    table,
                    exists: path.is_file(),
                    format: table.format(),
                    path,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_eleven_tables() {
        let tables = SourceTable::all();
        assert_eq!(tables.len(), 11);
        let csv = tables
            .iter()
            .filter(|table| table.format() == SourceFormat::Csv)
            .count();
        assert_eq!(csv, 2);
    }

    #[test]
    fn only_phn_mapping_is_pruned() {
        assert_eq!(
            SourceTable::PhnMapping.pruned_columns(),
            Some(&["SA2_CODE_2021", "PHN_CODE_2023", "PHN_NAME_2023"][..])
        );
        assert!(SourceTable::GeoCorrespondence.pruned_columns().is_none());
    }

    #[test]
    fn check_reports_missing_files() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("lookup_sex.parquet"), b"").unwrap();
        let catalog = SourceCatalog::new(dir.path());
        let status = catalog.check();
        let present: Vec<_> = status.iter().filter(|s| s.exists).collect();
        assert_eq!(present.len(), 1);
        assert_eq!(present[0].table, SourceTable::Lookup(LookupRole::Sex));
    }
}
