//! Key and label column detection for lookup tables.
//!
//! Source lookups do not share a naming convention: the sex lookup may call
//! its label `sex_name`, the geography type lookup `description`, and so on.
//! Resolution is deterministic and never fails on a non-empty column list.
//!
//! Key: the first of the role's key candidates present in the table
//! (case-insensitive), else the first column.
//!
//! Label, in order of preference:
//! 1. the first non-key column whose name matches `name|label`
//!    (case-insensitive); for the geography lookup, columns describing a
//!    structural column (`state_name`, `geog_type_label`) are passed over;
//! 2. the first column that is neither the key nor structural
//!    (`geog_id`, `geog_type`, `state`), with the same geography exclusion;
//! 3. the key column itself.

use std::sync::LazyLock;

use polars::prelude::DataFrame;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use census_common::string_column;
use census_model::{CaseInsensitiveSet, LabelSource, LookupRole, ResolvedColumns, STRUCTURAL_COLUMNS};

use crate::error::{Result, TransformError};
use crate::frame::{dedupe_by_key, string_values};

static LABEL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)name|label").expect("label pattern is valid"));

fn is_structural(name: &str) -> bool {
    STRUCTURAL_COLUMNS
        .iter()
        .any(|structural| structural.eq_ignore_ascii_case(name))
}

/// `state_name` for `state`, `geog_type_label` for `geog_type`.
fn describes_structural(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    STRUCTURAL_COLUMNS.iter().any(|structural| {
        lower
            .strip_prefix(structural)
            .is_some_and(|rest| rest.starts_with('_'))
    })
}

fn is_passed_over(name: &str, role: LookupRole) -> bool {
    is_structural(name) || (role == LookupRole::Geography && describes_structural(name))
}

/// Resolves the key and label columns of a lookup from its column names.
///
/// Returns `None` only for an empty column list.
pub fn resolve_columns<S: AsRef<str>>(columns: &[S], role: LookupRole) -> Option<ResolvedColumns> {
    let names: Vec<&str> = columns.iter().map(AsRef::as_ref).collect();
    let lookup = CaseInsensitiveSet::new(&names);

    let (key, key_matched) = match role
        .key_candidates()
        .iter()
        .find_map(|candidate| lookup.get(candidate))
    {
        Some(key) => (key.to_string(), true),
        None => (names.first()?.to_string(), false),
    };

    let mut others = names.iter().copied().filter(|name| *name != key);
    let (label, label_source) = if let Some(name) = others
        .clone()
        .find(|name| LABEL_PATTERN.is_match(name) && !is_passed_over(name, role))
    {
        (name.to_string(), LabelSource::Pattern)
    } else if let Some(name) = others.find(|name| !is_passed_over(name, role)) {
        (name.to_string(), LabelSource::Positional)
    } else {
        (key.clone(), LabelSource::KeyOnly)
    };

    Some(ResolvedColumns {
        key,
        label,
        label_source,
        key_matched,
    })
}

/// A lookup reduced to its key and label, renamed for joining.
#[derive(Debug, Clone)]
pub struct ResolvedLookup {
    pub role: LookupRole,
    pub columns: ResolvedColumns,
    /// Two columns: `role.fact_key()` and `role.label_column()`.
    pub frame: DataFrame,
    /// Rows dropped because their key repeated an earlier row.
    pub duplicates: usize,
}

impl ResolvedLookup {
    pub fn summary(&self) -> LookupResolution {
        LookupResolution {
            name: self.role.as_str().to_string(),
            key: self.columns.key.clone(),
            label: self.columns.label.clone(),
            label_source: self.columns.label_source,
            rows: self.frame.height(),
            duplicates: self.duplicates,
        }
    }
}

/// Report line for one resolved lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupResolution {
    pub name: String,
    pub key: String,
    pub label: String,
    pub label_source: LabelSource,
    pub rows: usize,
    pub duplicates: usize,
}

/// Resolves a lookup table and projects it to `(fact key, label)`.
///
/// Keys are rendered as trimmed strings and deduplicated keep-first so the
/// lookup can never multiply fact rows in a join.
pub fn resolve_lookup(df: &DataFrame, role: LookupRole) -> Result<ResolvedLookup> {
    let names = df.get_column_names_owned();
    let columns = resolve_columns(&names, role)
        .ok_or_else(|| TransformError::EmptyLookup(role.as_str().to_string()))?;

    if !columns.key_matched {
        warn!(
            lookup = %role,
            key = %columns.key,
            candidates = ?role.key_candidates(),
            "no key candidate found, using first column"
        );
    }
    match columns.label_source {
        LabelSource::KeyOnly => warn!(
            lookup = %role,
            key = %columns.key,
            "no label column found, using key as label"
        ),
        source => debug!(
            lookup = %role,
            key = %columns.key,
            label = %columns.label,
            label_source = ?source,
            "resolved lookup columns"
        ),
    }

    let table = format!("lookup:{role}");
    let keys = string_values(df, &columns.key, &table)?;
    let labels = string_values(df, &columns.label, &table)?;
    let frame = DataFrame::new(vec![
        string_column(role.fact_key(), keys),
        string_column(role.label_column(), labels),
    ])?;
    let (frame, duplicates) = dedupe_by_key(&frame, role.fact_key(), &table)?;
    if duplicates > 0 {
        warn!(lookup = %role, duplicates, "dropped duplicate lookup keys, kept first");
    }

    Ok(ResolvedLookup {
        role,
        columns,
        frame,
        duplicates,
    })
}
