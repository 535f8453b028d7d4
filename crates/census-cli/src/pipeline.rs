//! Preprocessing pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Load**: Read every declared source table
//! 2. **Resolve**: Resolve and prepare the dimension lookups
//! 3. **Filter**: Scope facts and geography to the target state
//! 4. **Hierarchy**: Derive SA codes, build name tables, check consistency
//! 5. **Denormalize**: Apply the join plan to each fact table
//! 6. **Write**: Write Parquet outputs and the lookup bundle
//!
//! Any failure aborts the run before the write stage.

use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{debug, info, info_span};

use census_ingest::{SourceCatalog, SourceTables, load_sources};
use census_model::{FactKind, LookupRole, PipelineOptions};
use census_output::{ArtifactSummary, OutputTables, write_outputs};
use census_transform::{
    GeoNameTables, HierarchyCheck, JoinPlan, LookupSet, add_hierarchy_columns,
    build_geo_reference, build_name_tables, build_sa2_hierarchy, check_hierarchy,
    count_inconsistent_geog_ids, denormalize, filter_facts, filter_geography,
    filter_sa2_geography, prepare_lookups,
};

use crate::types::{FactJoinSummary, RunResult};

// ============================================================================
// Stage 1: Load
// ============================================================================

pub fn load(options: &PipelineOptions) -> Result<SourceTables> {
    let span = info_span!("load", data_dir = %options.data_dir.display());
    span.in_scope(|| {
        let catalog = SourceCatalog::new(&options.data_dir);
        load_sources(&catalog)
            .with_context(|| format!("load sources from {}", options.data_dir.display()))
    })
}

// ============================================================================
// Stage 2: Resolve
// ============================================================================

pub fn resolve(sources: &SourceTables) -> Result<LookupSet> {
    let span = info_span!("resolve");
    span.in_scope(|| {
        let start = Instant::now();
        let lookups =
            prepare_lookups(&sources.lookups, &sources.phn_mapping).context("prepare lookups")?;
        info!(
            lookups = lookups.len(),
            duration_ms = start.elapsed().as_millis(),
            "lookups resolved"
        );
        Ok(lookups)
    })
}

// ============================================================================
// Stage 3: Filter
// ============================================================================

/// State-scoped facts and geography.
#[derive(Debug)]
pub struct FilteredTables {
    pub health: DataFrame,
    pub population: Option<DataFrame>,
    /// Geography rows of every level in the state.
    pub geography: DataFrame,
    /// SA2 geography rows in the state.
    pub sa2_geography: DataFrame,
}

pub fn filter(sources: &SourceTables, options: &PipelineOptions) -> Result<FilteredTables> {
    let state = options.target_state.as_str();
    let span = info_span!("filter", state);
    span.in_scope(|| {
        let geography_lookup = sources
            .lookup(LookupRole::Geography)
            .context("geography lookup not loaded")?;
        let health =
            filter_facts(&sources.health_conditions, state).context("filter health facts")?;
        let population = if options.include_population {
            Some(filter_facts(&sources.population, state).context("filter population facts")?)
        } else {
            None
        };
        let geography =
            filter_geography(geography_lookup, state).context("filter geography lookup")?;
        let sa2_geography =
            filter_sa2_geography(geography_lookup, state).context("filter SA2 geography")?;
        info!(
            health_rows = health.height(),
            population_rows = population.as_ref().map(DataFrame::height),
            geography_rows = geography.height(),
            sa2_rows = sa2_geography.height(),
            "filtered to state"
        );
        Ok(FilteredTables {
            health,
            population,
            geography,
            sa2_geography,
        })
    })
}

// ============================================================================
// Stage 4: Hierarchy
// ============================================================================

#[derive(Debug)]
pub struct HierarchyResult {
    pub health: DataFrame,
    pub population: Option<DataFrame>,
    pub names: GeoNameTables,
    pub sa2_hierarchy: DataFrame,
    pub geo_reference: DataFrame,
    pub check: HierarchyCheck,
    pub inconsistent_geog_ids: usize,
}

pub fn hierarchy(filtered: &FilteredTables, correspondence: &DataFrame) -> Result<HierarchyResult> {
    let span = info_span!("hierarchy");
    span.in_scope(|| {
        let start = Instant::now();
        let health = add_hierarchy_columns(&filtered.health).context("derive health hierarchy")?;
        let population = filtered
            .population
            .as_ref()
            .map(add_hierarchy_columns)
            .transpose()
            .context("derive population hierarchy")?;
        let mut inconsistent_geog_ids = count_inconsistent_geog_ids(&health)?;
        if let Some(population) = &population {
            inconsistent_geog_ids += count_inconsistent_geog_ids(population)?;
        }

        let names = build_name_tables(&filtered.geography).context("build name tables")?;
        let sa2_hierarchy =
            build_sa2_hierarchy(&filtered.sa2_geography).context("build SA2 hierarchy")?;
        let geo_reference = build_geo_reference(&names).context("build geography reference")?;
        let check = check_hierarchy(&health, &names, correspondence)?;
        info!(
            reference_rows = geo_reference.height(),
            sa2_hierarchy_rows = sa2_hierarchy.height(),
            clean = check.is_clean(),
            duration_ms = start.elapsed().as_millis(),
            "hierarchy derived"
        );
        Ok(HierarchyResult {
            health,
            population,
            names,
            sa2_hierarchy,
            geo_reference,
            check,
            inconsistent_geog_ids,
        })
    })
}

// ============================================================================
// Stage 5: Denormalize
// ============================================================================

pub fn denormalize_fact(
    facts: &DataFrame,
    kind: FactKind,
    lookups: &LookupSet,
) -> Result<(DataFrame, FactJoinSummary)> {
    let span = info_span!("denormalize", fact = kind.as_str());
    span.in_scope(|| {
        let start = Instant::now();
        let plan = JoinPlan::for_fact(kind);
        debug!(plan = %plan.describe(), "join plan");
        let result = denormalize(facts, lookups, &plan)
            .with_context(|| format!("denormalize {} facts", kind.as_str()))?;
        info!(
            rows = result.frame.height(),
            duration_ms = start.elapsed().as_millis(),
            "denormalize complete"
        );
        let summary = FactJoinSummary {
            kind,
            rows: facts.height(),
            steps: result.reports,
        };
        Ok((result.frame, summary))
    })
}

// ============================================================================
// Stage 6: Write
// ============================================================================

pub fn write(
    tables: &OutputTables<'_>,
    options: &PipelineOptions,
) -> Result<Vec<ArtifactSummary>> {
    let output_dir = options.output_dir();
    let span = info_span!(
        "write",
        output_dir = %output_dir.display(),
        dry_run = options.dry_run
    );
    span.in_scope(|| {
        write_outputs(tables, &output_dir, options.dry_run)
            .with_context(|| format!("write outputs to {}", output_dir.display()))
    })
}

/// Runs every stage for `options`.
pub fn run_pipeline(options: &PipelineOptions) -> Result<RunResult> {
    debug!(
        options = %serde_json::to_string(options).unwrap_or_default(),
        "pipeline options"
    );
    let start = Instant::now();
    let sources = load(options)?;
    let mut lookups = resolve(&sources)?;
    let filtered = filter(&sources, options)?;
    let derived = hierarchy(&filtered, &sources.geo_correspondence)?;
    lookups.insert_geography(&derived.names, derived.sa2_hierarchy.clone());

    let mut facts = Vec::new();
    let (health, health_summary) =
        denormalize_fact(&derived.health, FactKind::HealthConditions, &lookups)?;
    facts.push(health_summary);
    let population = match &derived.population {
        Some(frame) => {
            let (population, summary) =
                denormalize_fact(frame, FactKind::Population, &lookups)?;
            facts.push(summary);
            Some(population)
        }
        None => None,
    };

    let tables = OutputTables {
        health: &health,
        population: population.as_ref(),
        geo_reference: &derived.geo_reference,
        lookups: &lookups,
    };
    let artifacts = write(&tables, options)?;
    info!(
        artifacts = artifacts.len(),
        duration_ms = start.elapsed().as_millis(),
        "pipeline complete"
    );

    Ok(RunResult {
        options: options.clone(),
        output_dir: options.output_dir(),
        lookups: lookups.resolutions().to_vec(),
        facts,
        hierarchy: derived.check,
        inconsistent_geog_ids: derived.inconsistent_geog_ids,
        artifacts,
    })
}
