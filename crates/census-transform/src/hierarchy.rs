//! SA2 → SA3 → SA4 code derivation.
//!
//! Codes nest by prefix, so parents are truncations of the child code:
//! an SA2 code's leading 5 characters are its SA3 code and its leading 3
//! characters are its SA4 code. Fact rows published at SA3 or SA4 level use
//! their own `geog_id` at that level and derive only the levels above it.

use polars::prelude::DataFrame;
use tracing::warn;

use census_common::string_column;
use census_model::columns::{GEOG_ID, GEOG_TYPE};
use census_model::{GeogLevel, HierarchyCodes};

use crate::error::Result;
use crate::frame::{require_columns, string_values};

/// Derives the SA2/SA3/SA4 codes of a row from its level and code.
///
/// Rows with an unknown level or no code derive nothing.
pub fn derive_codes(level: Option<GeogLevel>, geog_id: Option<&str>) -> HierarchyCodes {
    let (Some(level), Some(id)) = (level, geog_id) else {
        return HierarchyCodes::default();
    };
    match level {
        GeogLevel::Sa2 => HierarchyCodes {
            sa2: Some(id.to_string()),
            sa3: Some(GeogLevel::Sa3.prefix_of(id).to_string()),
            sa4: Some(GeogLevel::Sa4.prefix_of(id).to_string()),
        },
        GeogLevel::Sa3 => HierarchyCodes {
            sa2: None,
            sa3: Some(id.to_string()),
            sa4: Some(GeogLevel::Sa4.prefix_of(id).to_string()),
        },
        GeogLevel::Sa4 => HierarchyCodes {
            sa2: None,
            sa3: None,
            sa4: Some(id.to_string()),
        },
    }
}

fn row_levels(df: &DataFrame) -> Result<(Vec<Option<GeogLevel>>, Vec<Option<String>>)> {
    require_columns(df, &[GEOG_TYPE, GEOG_ID], "fact table")?;
    let levels = string_values(df, GEOG_TYPE, "fact table")?
        .into_iter()
        .map(|value| value.and_then(|v| v.parse::<GeogLevel>().ok()))
        .collect();
    let ids = string_values(df, GEOG_ID, "fact table")?;
    Ok((levels, ids))
}

/// Appends `sa2_code`, `sa3_code` and `sa4_code` to a fact frame.
pub fn add_hierarchy_columns(df: &DataFrame) -> Result<DataFrame> {
    let (levels, ids) = row_levels(df)?;
    let mut sa2 = Vec::with_capacity(ids.len());
    let mut sa3 = Vec::with_capacity(ids.len());
    let mut sa4 = Vec::with_capacity(ids.len());
    for (level, id) in levels.into_iter().zip(ids.iter()) {
        let codes = derive_codes(level, id.as_deref());
        sa2.push(codes.sa2);
        sa3.push(codes.sa3);
        sa4.push(codes.sa4);
    }
    let mut out = df.clone();
    out.with_column(string_column(GeogLevel::Sa2.code_column(), sa2))?;
    out.with_column(string_column(GeogLevel::Sa3.code_column(), sa3))?;
    out.with_column(string_column(GeogLevel::Sa4.code_column(), sa4))?;
    Ok(out)
}

/// Counts rows whose `geog_id` width disagrees with their `geog_type`.
///
/// Rows with an unrecognized level are not counted.
pub fn count_inconsistent_geog_ids(df: &DataFrame) -> Result<usize> {
    let (levels, ids) = row_levels(df)?;
    let count = levels
        .iter()
        .zip(ids.iter())
        .filter(|(level, id)| match (level, id) {
            (Some(level), Some(id)) => !level.is_valid_code(id),
            (Some(_), None) => true,
            _ => false,
        })
        .count();
    if count > 0 {
        warn!(rows = count, "geog_id width does not match geog_type");
    }
    Ok(count)
}
