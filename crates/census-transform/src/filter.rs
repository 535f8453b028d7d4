//! Jurisdiction filters.
//!
//! Predicates run against a copy with normalized code columns, so a state
//! stored as the integer `3` and a state stored as the string `"3"` both
//! match `"3"`. The returned rows keep their source dtypes. Dimension
//! lookups are global and never filtered.

use polars::prelude::{DataFrame, Expr, IntoLazy, col, lit};
use tracing::debug;

use census_model::GeogLevel;
use census_model::columns::{GEOG_TYPE, STATE};

use crate::error::Result;
use crate::frame::{normalize_code_columns, require_columns};

const MASK: &str = "__keep";

/// Rows of `df` for which `predicate` holds on the normalized codes.
fn matching_rows(df: &DataFrame, predicate: Expr) -> Result<DataFrame> {
    let mask = normalize_code_columns(df)?
        .lazy()
        .select([predicate.alias(MASK)])
        .collect()?;
    let mask = mask.column(MASK)?.bool()?.clone();
    Ok(df.filter(&mask)?)
}

fn in_state(state: &str) -> Expr {
    col(STATE).eq(lit(state.to_string()))
}

/// Keeps fact rows whose `state` equals `state`.
pub fn filter_facts(df: &DataFrame, state: &str) -> Result<DataFrame> {
    require_columns(df, &[STATE], "fact table")?;
    let filtered = matching_rows(df, in_state(state))?;
    debug!(
        state,
        before = df.height(),
        after = filtered.height(),
        "filtered fact rows"
    );
    Ok(filtered)
}

/// Keeps geography lookup rows of every level that belong to `state`.
pub fn filter_geography(df: &DataFrame, state: &str) -> Result<DataFrame> {
    require_columns(df, &[STATE, GEOG_TYPE], "geography lookup")?;
    matching_rows(df, in_state(state))
}

/// Keeps SA2 geography rows that belong to `state`.
///
/// SA3 and SA4 parents are derived from these codes rather than loaded.
pub fn filter_sa2_geography(df: &DataFrame, state: &str) -> Result<DataFrame> {
    require_columns(df, &[STATE, GEOG_TYPE], "geography lookup")?;
    matching_rows(
        df,
        in_state(state).and(col(GEOG_TYPE).eq(lit(GeogLevel::Sa2.as_str()))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{DataType, IntoColumn, NamedFrom, Series};

    #[test]
    fn missing_state_column_is_an_error() {
        let df = DataFrame::new(vec![Series::new("sex".into(), &["1"]).into_column()]).unwrap();
        assert!(filter_facts(&df, "3").is_err());
    }

    #[test]
    fn null_state_rows_are_dropped() {
        let df = DataFrame::new(vec![
            Series::new("state".into(), &[Some("3"), None]).into_column(),
        ])
        .unwrap();
        let out = filter_facts(&df, "3").unwrap();
        assert_eq!(out.height(), 1);
    }

    #[test]
    fn integer_codes_match_and_keep_their_dtype() {
        let df = DataFrame::new(vec![
            Series::new("state".into(), &[3i64, 4, 3]).into_column(),
            Series::new("sex".into(), &[1i64, 2, 2]).into_column(),
        ])
        .unwrap();
        let out = filter_facts(&df, "3").unwrap();
        assert_eq!(out.height(), 2);
        assert_eq!(out.column("state").unwrap().dtype(), &DataType::Int64);
        assert_eq!(out.column("sex").unwrap().dtype(), &DataType::Int64);
        let sexes: Vec<Option<i64>> = out.column("sex").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(sexes, vec![Some(1), Some(2)]);
    }
}
