//! Ordered left-join plan that turns a fact table into the wide analysis
//! table.

use std::fmt::Write as _;

use polars::prelude::{DataFrame, IntoLazy, JoinArgs, JoinType, SortMultipleOptions, col, lit};
use serde::Serialize;
use tracing::{debug, info, warn};

use census_common::string_column;
use census_model::FactKind;
use census_model::columns::{
    AGE_GROUP, AGE_GROUP_LABEL, GEOG_TYPE, GEOG_TYPE_NAME, LONG_TERM_HEALTH_CONDITION, LTHC,
    PHN_NAME, SA2_CODE, SA2_NAME, SA3_CODE, SA3_NAME, SA4_CODE, SA4_NAME, SEX, SEX_NAME, STATE,
    STATE_NAME,
};

use crate::error::{Result, TransformError};
use crate::frame::{require_columns, string_values};
use crate::lookups::{LookupSet, PHN_LOOKUP};

const ROW_INDEX: &str = "__row_index";
const JOIN_KEY: &str = "__join_key";
const MATCHED: &str = "__matched";

/// One left join: `columns` of lookup `source`, matched on `key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JoinStep {
    pub name: &'static str,
    pub source: &'static str,
    pub key: &'static str,
    pub columns: &'static [&'static str],
}

const fn step(
    name: &'static str,
    source: &'static str,
    key: &'static str,
    columns: &'static [&'static str],
) -> JoinStep {
    JoinStep {
        name,
        source,
        key,
        columns,
    }
}

const SEX_STEP: JoinStep = step("sex", "sex", SEX, &[SEX_NAME]);
const HEALTH_STEP: JoinStep = step(
    "health_condition",
    "long_term_health_condition",
    LTHC,
    &[LONG_TERM_HEALTH_CONDITION],
);
const AGE_STEP: JoinStep = step("age", "age", AGE_GROUP, &[AGE_GROUP_LABEL]);
const STATE_STEP: JoinStep = step("state", "state", STATE, &[STATE_NAME]);
const GEOG_TYPE_STEP: JoinStep = step("geog_type", "geog_type", GEOG_TYPE, &[GEOG_TYPE_NAME]);
const SA2_STEP: JoinStep = step("sa2_name", "sa2_names", SA2_CODE, &[SA2_NAME]);
const SA3_STEP: JoinStep = step("sa3_name", "sa3_names", SA3_CODE, &[SA3_NAME]);
const SA4_STEP: JoinStep = step("sa4_name", "sa4_names", SA4_CODE, &[SA4_NAME]);
const PHN_STEP: JoinStep = step("phn", PHN_LOOKUP, SA2_CODE, &[PHN_NAME]);

/// The join chain for one fact table, applied in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinPlan {
    kind: FactKind,
    steps: Vec<JoinStep>,
}

impl JoinPlan {
    /// Builds the fixed plan. The population table skips the
    /// health-condition join.
    pub fn for_fact(kind: FactKind) -> Self {
        let steps = [
            SEX_STEP,
            HEALTH_STEP,
            AGE_STEP,
            STATE_STEP,
            GEOG_TYPE_STEP,
            SA2_STEP,
            SA3_STEP,
            SA4_STEP,
            PHN_STEP,
        ]
        .into_iter()
        .filter(|step| kind.has_health_condition() || step.key != LTHC)
        .collect();
        Self { kind, steps }
    }

    pub fn kind(&self) -> FactKind {
        self.kind
    }

    pub fn steps(&self) -> &[JoinStep] {
        &self.steps
    }

    /// Lookup that supplies `column`, if any step adds it.
    pub fn provenance(&self, column: &str) -> Option<&JoinStep> {
        self.steps
            .iter()
            .find(|step| step.columns.contains(&column))
    }

    /// One line per step: `"{n}. {source} [{key}] -> {columns}"`.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for (idx, step) in self.steps.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}. {} [{}] -> {}",
                idx + 1,
                step.source,
                step.key,
                step.columns.join(", ")
            );
        }
        out
    }
}

/// Join diagnostics for one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinStepReport {
    pub name: String,
    pub key: String,
    /// Fact rows after the join.
    pub rows: usize,
    /// Fact rows whose key was null.
    pub null_keys: usize,
    /// Fact rows with a key but no lookup match.
    pub unmatched: usize,
}

/// Output of [`denormalize`].
#[derive(Debug, Clone)]
pub struct Denormalized {
    pub frame: DataFrame,
    pub reports: Vec<JoinStepReport>,
}

/// Applies `plan` to `facts` and orders the result columns.
///
/// `facts` must already carry the derived `sa2_code`/`sa3_code`/`sa4_code`
/// columns. Each step joins on the trimmed string form of its key, so the
/// fact columns keep their source dtypes. Unmatched keys produce nulls and
/// are reported, not rejected.
pub fn denormalize(facts: &DataFrame, lookups: &LookupSet, plan: &JoinPlan) -> Result<Denormalized> {
    let expected = facts.height();
    let mut frame = facts.with_row_index(ROW_INDEX.into(), None)?;
    let mut reports = Vec::with_capacity(plan.steps().len());

    for step in plan.steps() {
        let lookup = lookups
            .get(step.source)
            .ok_or_else(|| TransformError::MissingLookup(step.source.to_string()))?;
        let keys = string_values(&frame, step.key, "fact table")?;
        frame.with_column(string_column(JOIN_KEY, keys))?;

        let mut wanted = vec![step.key];
        wanted.extend_from_slice(step.columns);
        require_columns(lookup, &wanted, step.source)?;
        let mut right = lookup.select(wanted)?;
        right.rename(step.key, JOIN_KEY.into())?;

        let joined = frame
            .lazy()
            .join(
                right.lazy().with_column(lit(true).alias(MATCHED)),
                [col(JOIN_KEY)],
                [col(JOIN_KEY)],
                JoinArgs::new(JoinType::Left),
            )
            .collect()?;
        if joined.height() != expected {
            return Err(TransformError::CardinalityChanged {
                step: step.name.to_string(),
                before: expected,
                after: joined.height(),
            });
        }
        let report = step_report(&joined, step)?;
        if report.unmatched > 0 {
            warn!(
                step = %report.name,
                key = %report.key,
                unmatched = report.unmatched,
                "fact keys without lookup match"
            );
        } else {
            debug!(step = %report.name, null_keys = report.null_keys, "join complete");
        }
        reports.push(report);
        frame = joined.drop(JOIN_KEY)?.drop(MATCHED)?;
    }

    let frame = frame.sort([ROW_INDEX], SortMultipleOptions::default())?;
    let columns = plan.kind().output_columns();
    require_columns(&frame, &columns, "denormalized table")?;
    let frame = frame.select(columns)?;
    info!(
        fact = plan.kind().as_str(),
        rows = frame.height(),
        columns = frame.width(),
        "denormalized fact table"
    );
    Ok(Denormalized { frame, reports })
}

/// Counts null keys and keys with no lookup row.
///
/// A key that matched a row with a null label still counts as matched.
fn step_report(joined: &DataFrame, step: &JoinStep) -> Result<JoinStepReport> {
    let null_keys = joined.column(JOIN_KEY)?.null_count();
    let missing = col(JOIN_KEY).is_not_null().and(col(MATCHED).is_null());
    let unmatched = joined.clone().lazy().filter(missing).collect()?.height();
    Ok(JoinStepReport {
        name: step.name.to_string(),
        key: step.key.to_string(),
        rows: joined.height(),
        null_keys,
        unmatched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn population_plan_skips_health_condition() {
        let plan = JoinPlan::for_fact(FactKind::Population);
        assert_eq!(plan.steps().len(), 8);
        assert!(plan.steps().iter().all(|step| step.key != LTHC));
        assert_eq!(JoinPlan::for_fact(FactKind::HealthConditions).steps().len(), 9);
    }

    #[test]
    fn provenance_names_source_lookup() {
        let plan = JoinPlan::for_fact(FactKind::HealthConditions);
        assert_eq!(plan.provenance(PHN_NAME).map(|s| s.source), Some("phn"));
        assert_eq!(plan.provenance(SA3_NAME).map(|s| s.key), Some(SA3_CODE));
        assert!(plan.provenance("persons").is_none());
    }
}
