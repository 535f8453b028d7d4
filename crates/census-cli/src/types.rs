use std::path::PathBuf;

use census_model::{FactKind, PipelineOptions};
use census_output::ArtifactSummary;
use census_transform::{HierarchyCheck, JoinStepReport, LookupResolution};

/// Join diagnostics for one denormalized fact table.
#[derive(Debug, Clone)]
pub struct FactJoinSummary {
    pub kind: FactKind,
    /// Fact rows after state filtering; equal to the output rows.
    pub rows: usize,
    pub steps: Vec<JoinStepReport>,
}

#[derive(Debug, Clone)]
pub struct RunResult {
    pub options: PipelineOptions,
    pub output_dir: PathBuf,
    pub lookups: Vec<LookupResolution>,
    pub facts: Vec<FactJoinSummary>,
    pub hierarchy: HierarchyCheck,
    /// Fact rows whose `geog_id` width disagrees with their `geog_type`.
    pub inconsistent_geog_ids: usize,
    pub artifacts: Vec<ArtifactSummary>,
}
