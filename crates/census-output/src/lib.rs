//! Output generation for the census analysis tables.
//!
//! Writes the denormalized fact tables and the geography reference as
//! Parquet, plus a JSON bundle of every prepared lookup. Each artifact is
//! reported with its row count and SHA-256 so re-runs can be compared.

pub mod bundle;
pub mod common;
pub mod parquet;
pub mod types;

use std::path::Path;

use anyhow::Result;
use tracing::info;

pub use bundle::{frame_records, lookup_bundle_bytes, write_lookup_bundle};
pub use common::{ensure_output_dir, file_sha256, sha256_hex};
pub use parquet::write_parquet;
pub use types::{
    ArtifactSummary, GEO_REFERENCE_FILE, HEALTH_ANALYSIS_FILE, LOOKUP_BUNDLE_FILE, OutputTables,
    POPULATION_ANALYSIS_FILE,
};

/// Writes every artifact under `output_dir`.
///
/// With `dry_run` nothing is created; the returned summaries carry the
/// planned paths and row counts without digests. Writes are not atomic as a
/// group: a failure leaves earlier artifacts in place.
pub fn write_outputs(
    tables: &OutputTables<'_>,
    output_dir: &Path,
    dry_run: bool,
) -> Result<Vec<ArtifactSummary>> {
    if !dry_run {
        ensure_output_dir(output_dir)?;
    }

    let mut frames = vec![(HEALTH_ANALYSIS_FILE, tables.health)];
    if let Some(population) = tables.population {
        frames.push((POPULATION_ANALYSIS_FILE, population));
    }
    frames.push((GEO_REFERENCE_FILE, tables.geo_reference));

    let mut summaries = Vec::with_capacity(frames.len() + 1);
    for (name, df) in frames {
        let path = output_dir.join(name);
        let sha256 = if dry_run {
            None
        } else {
            write_parquet(df, &path)?;
            Some(file_sha256(&path)?)
        };
        summaries.push(ArtifactSummary {
            name: name.to_string(),
            path,
            rows: df.height(),
            sha256,
        });
    }

    let path = output_dir.join(LOOKUP_BUNDLE_FILE);
    let rows = tables.lookups.iter().map(|(_, df)| df.height()).sum();
    let sha256 = if dry_run {
        None
    } else {
        Some(write_lookup_bundle(tables.lookups.iter(), &path)?)
    };
    summaries.push(ArtifactSummary {
        name: LOOKUP_BUNDLE_FILE.to_string(),
        path,
        rows,
        sha256,
    });

    for summary in &summaries {
        info!(
            artifact = %summary.name,
            rows = summary.rows,
            sha256 = summary.sha256.as_deref().unwrap_or("-"),
            dry_run,
            "output artifact"
        );
    }
    Ok(summaries)
}
