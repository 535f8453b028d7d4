//! Census table transformations.
//!
//! This crate turns the loaded census tables into the denormalized analysis
//! table and its lookups:
//!
//! - **resolver**: picks key and label columns of loosely named lookups
//! - **filter**: scopes facts and geography to one state
//! - **hierarchy**: derives SA2/SA3/SA4 codes from `geog_id`
//! - **geography**: per-level name tables, geography reference, hierarchy check
//! - **lookups**: label clean-up, sentinel codes, PHN mapping
//! - **denormalize**: the ordered left-join plan

mod error;
pub mod denormalize;
pub mod filter;
pub mod frame;
pub mod geography;
pub mod hierarchy;
pub mod lookups;
pub mod resolver;

pub use error::{Result, TransformError};

// Re-export the pipeline entry points
pub use denormalize::{Denormalized, JoinPlan, JoinStep, JoinStepReport, denormalize};
pub use filter::{filter_facts, filter_geography, filter_sa2_geography};
pub use geography::{
    GeoNameTables, HierarchyCheck, build_geo_reference, build_name_tables, build_sa2_hierarchy,
    check_hierarchy,
};
pub use hierarchy::{add_hierarchy_columns, count_inconsistent_geog_ids, derive_codes};
pub use lookups::{
    LookupSet, extend_health_conditions, prepare_lookups, prepare_phn_lookup,
    standardize_age_labels,
};
pub use resolver::{LookupResolution, ResolvedLookup, resolve_columns, resolve_lookup};
