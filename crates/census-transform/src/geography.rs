//! Per-level geography name tables, the long-form geography reference, and
//! the hierarchy consistency check.

use std::collections::BTreeSet;

use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{info, warn};

use census_common::string_column;
use census_model::columns::{
    CORR_SA2_CODE, CORR_SA3_CODE, CORR_SA4_CODE, GEOG_CODE, GEOG_NAME, GEOG_TYPE,
};
use census_model::{CaseInsensitiveSet, GeogLevel, LookupRole, ResolvedColumns};

use crate::error::{Result, TransformError};
use crate::frame::{dedupe_by_key, require_columns, string_values};
use crate::hierarchy::derive_codes;
use crate::resolver::resolve_columns;

const TABLE: &str = "geography lookup";

/// `(code, name)` tables for each SA level.
#[derive(Debug, Clone)]
pub struct GeoNameTables {
    pub sa2: DataFrame,
    pub sa3: DataFrame,
    pub sa4: DataFrame,
}

impl GeoNameTables {
    pub fn get(&self, level: GeogLevel) -> &DataFrame {
        match level {
            GeogLevel::Sa2 => &self.sa2,
            GeogLevel::Sa3 => &self.sa3,
            GeogLevel::Sa4 => &self.sa4,
        }
    }

    /// Lookup name the table is registered under.
    pub fn lookup_name(level: GeogLevel) -> &'static str {
        match level {
            GeogLevel::Sa2 => "sa2_names",
            GeogLevel::Sa3 => "sa3_names",
            GeogLevel::Sa4 => "sa4_names",
        }
    }

    /// Total number of coded areas across the three levels.
    pub fn total_rows(&self) -> usize {
        GeogLevel::ALL
            .into_iter()
            .map(|level| self.get(level).height())
            .sum()
    }
}

struct GeographyRows {
    levels: Vec<Option<GeogLevel>>,
    codes: Vec<Option<String>>,
    names: Vec<Option<String>>,
}

fn geography_rows(df: &DataFrame) -> Result<GeographyRows> {
    require_columns(df, &[GEOG_TYPE], TABLE)?;
    let names = df.get_column_names_owned();
    let ResolvedColumns { key, label, .. } = resolve_columns(&names, LookupRole::Geography)
        .ok_or_else(|| TransformError::EmptyLookup(LookupRole::Geography.as_str().to_string()))?;
    let levels = string_values(df, GEOG_TYPE, TABLE)?
        .into_iter()
        .map(|value| value.and_then(|v| v.parse::<GeogLevel>().ok()))
        .collect();
    Ok(GeographyRows {
        levels,
        codes: string_values(df, &key, TABLE)?,
        names: string_values(df, &label, TABLE)?,
    })
}

/// Builds the SA2, SA3 and SA4 name tables from a state-scoped geography
/// lookup.
///
/// A level only gets rows the lookup itself carries at that level; parent
/// names are never synthesized from SA2 rows.
pub fn build_name_tables(state_geography: &DataFrame) -> Result<GeoNameTables> {
    let rows = geography_rows(state_geography)?;
    let build = |level: GeogLevel| -> Result<DataFrame> {
        let mut codes = Vec::new();
        let mut names = Vec::new();
        for ((row_level, code), name) in rows.levels.iter().zip(&rows.codes).zip(&rows.names) {
            if *row_level == Some(level) {
                codes.push(code.clone());
                names.push(name.clone());
            }
        }
        let df = DataFrame::new(vec![
            string_column(level.code_column(), codes),
            string_column(level.name_column(), names),
        ])?;
        let (df, duplicates) = dedupe_by_key(&df, level.code_column(), TABLE)?;
        if duplicates > 0 {
            warn!(level = %level, duplicates, "dropped duplicate geography codes");
        }
        Ok(df)
    };
    let tables = GeoNameTables {
        sa2: build(GeogLevel::Sa2)?,
        sa3: build(GeogLevel::Sa3)?,
        sa4: build(GeogLevel::Sa4)?,
    };
    info!(
        sa2 = tables.sa2.height(),
        sa3 = tables.sa3.height(),
        sa4 = tables.sa4.height(),
        "built geography name tables"
    );
    Ok(tables)
}

/// Builds `sa2_code, sa2_name, sa3_code, sa4_code` from SA2 geography rows.
pub fn build_sa2_hierarchy(sa2_geography: &DataFrame) -> Result<DataFrame> {
    let rows = geography_rows(sa2_geography)?;
    let mut sa2 = Vec::new();
    let mut names = Vec::new();
    let mut sa3 = Vec::new();
    let mut sa4 = Vec::new();
    for ((level, code), name) in rows.levels.iter().zip(&rows.codes).zip(&rows.names) {
        if *level != Some(GeogLevel::Sa2) {
            continue;
        }
        let codes = derive_codes(*level, code.as_deref());
        sa2.push(codes.sa2);
        names.push(name.clone());
        sa3.push(codes.sa3);
        sa4.push(codes.sa4);
    }
    let df = DataFrame::new(vec![
        string_column(GeogLevel::Sa2.code_column(), sa2),
        string_column(GeogLevel::Sa2.name_column(), names),
        string_column(GeogLevel::Sa3.code_column(), sa3),
        string_column(GeogLevel::Sa4.code_column(), sa4),
    ])?;
    let (df, _) = dedupe_by_key(&df, GeogLevel::Sa2.code_column(), TABLE)?;
    Ok(df)
}

/// Concatenates the name tables into one long-form table tagged by level.
///
/// Columns: `geog_type, geog_code, geog_name, sa3_code, sa4_code`, where the
/// parent codes follow the prefix rule and are null above the row's level.
pub fn build_geo_reference(tables: &GeoNameTables) -> Result<DataFrame> {
    let capacity = tables.total_rows();
    let mut types = Vec::with_capacity(capacity);
    let mut codes = Vec::with_capacity(capacity);
    let mut names = Vec::with_capacity(capacity);
    let mut sa3 = Vec::with_capacity(capacity);
    let mut sa4 = Vec::with_capacity(capacity);
    for level in GeogLevel::ALL {
        let df = tables.get(level);
        let level_codes = string_values(df, level.code_column(), GeoNameTables::lookup_name(level))?;
        let level_names = string_values(df, level.name_column(), GeoNameTables::lookup_name(level))?;
        for (code, name) in level_codes.into_iter().zip(level_names) {
            let derived = derive_codes(Some(level), code.as_deref());
            types.push(Some(level.as_str().to_string()));
            codes.push(code);
            names.push(name);
            sa3.push(derived.sa3);
            sa4.push(derived.sa4);
        }
    }
    Ok(DataFrame::new(vec![
        string_column(GEOG_TYPE, types),
        string_column(GEOG_CODE, codes),
        string_column(GEOG_NAME, names),
        string_column(GeogLevel::Sa3.code_column(), sa3),
        string_column(GeogLevel::Sa4.code_column(), sa4),
    ])?)
}

/// Findings of the hierarchy consistency check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HierarchyCheck {
    /// Distinct derived SA2 codes in the facts with no name row.
    pub sa2_without_name: usize,
    /// Distinct derived SA3 codes in the facts with no name row.
    pub sa3_without_name: usize,
    /// Distinct derived SA4 codes in the facts with no name row.
    pub sa4_without_name: usize,
    /// Correspondence rows checked; `None` when its columns are absent.
    pub correspondence_rows: Option<usize>,
    /// Correspondence rows whose SA3/SA4 codes break the prefix rule.
    pub correspondence_mismatches: usize,
}

impl HierarchyCheck {
    pub fn is_clean(&self) -> bool {
        self.sa2_without_name == 0
            && self.sa3_without_name == 0
            && self.sa4_without_name == 0
            && self.correspondence_mismatches == 0
    }
}

fn distinct_codes(df: &DataFrame, column: &str, table: &str) -> Result<BTreeSet<String>> {
    Ok(string_values(df, column, table)?.into_iter().flatten().collect())
}

/// Checks that derived codes have names and that the correspondence file
/// agrees with the prefix rule. Findings are reported, never enforced.
pub fn check_hierarchy(
    facts: &DataFrame,
    names: &GeoNameTables,
    correspondence: &DataFrame,
) -> Result<HierarchyCheck> {
    let mut check = HierarchyCheck::default();
    for level in GeogLevel::ALL {
        let derived = distinct_codes(facts, level.code_column(), "fact table")?;
        let named = distinct_codes(
            names.get(level),
            level.code_column(),
            GeoNameTables::lookup_name(level),
        )?;
        let missing = derived.difference(&named).count();
        match level {
            GeogLevel::Sa2 => check.sa2_without_name = missing,
            GeogLevel::Sa3 => check.sa3_without_name = missing,
            GeogLevel::Sa4 => check.sa4_without_name = missing,
        }
        if missing > 0 {
            warn!(level = %level, codes = missing, "derived codes have no name row");
        }
    }

    let lookup = CaseInsensitiveSet::new(correspondence.get_column_names_owned());
    if let (Some(sa2_col), Some(sa3_col), Some(sa4_col)) = (
        lookup.get(CORR_SA2_CODE),
        lookup.get(CORR_SA3_CODE),
        lookup.get(CORR_SA4_CODE),
    ) {
        let sa2 = string_values(correspondence, sa2_col, "geo correspondence")?;
        let sa3 = string_values(correspondence, sa3_col, "geo correspondence")?;
        let sa4 = string_values(correspondence, sa4_col, "geo correspondence")?;
        let mut mismatches = 0usize;
        for ((sa2, sa3), sa4) in sa2.iter().zip(&sa3).zip(&sa4) {
            let Some(code) = sa2.as_deref() else {
                continue;
            };
            let derived = derive_codes(Some(GeogLevel::Sa2), Some(code));
            if derived.sa3 != *sa3 || derived.sa4 != *sa4 {
                mismatches += 1;
            }
        }
        check.correspondence_rows = Some(correspondence.height());
        check.correspondence_mismatches = mismatches;
        if mismatches > 0 {
            warn!(rows = mismatches, "correspondence rows break the SA prefix rule");
        }
    } else {
        warn!("geo correspondence lacks SA2/SA3/SA4 code columns, prefix check skipped");
    }
    Ok(check)
}
