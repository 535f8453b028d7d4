//! Column names shared by the fact tables, lookups and outputs.

use serde::{Deserialize, Serialize};

pub const YEAR: &str = "year";
pub const STATE: &str = "state";
pub const GEOG_TYPE: &str = "geog_type";
pub const GEOG_ID: &str = "geog_id";
pub const SEX: &str = "sex";
pub const AGE_GROUP: &str = "age_group";
pub const LTHC: &str = "lthc";
pub const PERSONS: &str = "persons";

pub const STATE_NAME: &str = "state_name";
pub const GEOG_TYPE_NAME: &str = "geog_type_name";
pub const GEOG_NAME: &str = "geog_name";
pub const GEOG_CODE: &str = "geog_code";
pub const SEX_NAME: &str = "sex_name";
pub const AGE_GROUP_LABEL: &str = "age_group_label";
pub const LONG_TERM_HEALTH_CONDITION: &str = "long_term_health_condition";

pub const SA2_CODE: &str = "sa2_code";
pub const SA2_NAME: &str = "sa2_name";
pub const SA3_CODE: &str = "sa3_code";
pub const SA3_NAME: &str = "sa3_name";
pub const SA4_CODE: &str = "sa4_code";
pub const SA4_NAME: &str = "sa4_name";

/// PHN mapping columns, spelled as in the source CSV.
pub const PHN_SA2_CODE: &str = "SA2_CODE_2021";
pub const PHN_CODE: &str = "PHN_CODE_2023";
pub const PHN_NAME: &str = "PHN_NAME_2023";

/// Geographic correspondence columns, spelled as in the source CSV.
pub const CORR_SA2_CODE: &str = "SA2_CODE_2021";
pub const CORR_SA3_CODE: &str = "SA3_CODE_2021";
pub const CORR_SA4_CODE: &str = "SA4_CODE_2021";

/// Code columns normalized to trimmed strings before filtering and joining.
pub const CODE_COLUMNS: [&str; 6] = [STATE, GEOG_TYPE, GEOG_ID, SEX, AGE_GROUP, LTHC];

/// Column order of the denormalized health-condition table.
pub const HEALTH_ANALYSIS_COLUMNS: [&str; 20] = [
    YEAR,
    STATE_NAME,
    GEOG_TYPE_NAME,
    GEOG_ID,
    SA4_CODE,
    SA4_NAME,
    SA3_CODE,
    SA3_NAME,
    SA2_CODE,
    SA2_NAME,
    PHN_NAME,
    SEX_NAME,
    AGE_GROUP,
    AGE_GROUP_LABEL,
    LONG_TERM_HEALTH_CONDITION,
    PERSONS,
    STATE,
    GEOG_TYPE,
    SEX,
    LTHC,
];

/// Fact table being denormalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FactKind {
    /// Population counts by geography, sex and age group.
    Population,
    /// Counts additionally split by long-term health condition.
    HealthConditions,
}

impl FactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactKind::Population => "population",
            FactKind::HealthConditions => "health_conditions",
        }
    }

    /// Whether rows carry an `lthc` code.
    pub fn has_health_condition(&self) -> bool {
        matches!(self, FactKind::HealthConditions)
    }

    /// Final column order for the denormalized table.
    ///
    /// The population table has no health-condition dimension, so its order
    /// is the health order without `long_term_health_condition` and `lthc`.
    pub fn output_columns(&self) -> Vec<&'static str> {
        HEALTH_ANALYSIS_COLUMNS
            .into_iter()
            .filter(|name| {
                self.has_health_condition() || (*name != LONG_TERM_HEALTH_CONDITION && *name != LTHC)
            })
            .collect()
    }
}
