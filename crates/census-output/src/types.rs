//! Artifact descriptions.

use std::path::PathBuf;

use polars::prelude::DataFrame;
use serde::Serialize;

use census_transform::LookupSet;

/// Denormalized health-condition table.
pub const HEALTH_ANALYSIS_FILE: &str = "qld_health_analysis.parquet";
/// Denormalized population table, written on request.
pub const POPULATION_ANALYSIS_FILE: &str = "qld_population_analysis.parquet";
/// Long-form geography reference.
pub const GEO_REFERENCE_FILE: &str = "qld_geo_reference.parquet";
/// Named lookup bundle.
pub const LOOKUP_BUNDLE_FILE: &str = "qld_lookups.json";

/// Tables handed to the writer.
#[derive(Debug, Clone, Copy)]
pub struct OutputTables<'a> {
    pub health: &'a DataFrame,
    pub population: Option<&'a DataFrame>,
    pub geo_reference: &'a DataFrame,
    pub lookups: &'a LookupSet,
}

/// A written (or, for dry runs, planned) artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSummary {
    pub name: String,
    pub path: PathBuf,
    /// Table rows, or the total record count for the lookup bundle.
    pub rows: usize,
    /// SHA-256 of the file bytes; `None` when nothing was written.
    pub sha256: Option<String>,
}
