//! Lookup table roles and resolved key/label columns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::columns;
use crate::error::CensusError;

/// Columns that describe a geography row rather than label it.
pub const STRUCTURAL_COLUMNS: [&str; 3] = [columns::GEOG_ID, columns::GEOG_TYPE, columns::STATE];

/// Role a lookup table plays in the pipeline.
///
/// Each role knows which column names may hold its key in the source file,
/// which fact column the key joins against, and the label column name it
/// contributes to the denormalized table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LookupRole {
    Age,
    Sex,
    State,
    GeogType,
    HealthCondition,
    CommonHealthCondition,
    Geography,
}

impl LookupRole {
    pub const ALL: [LookupRole; 7] = [
        LookupRole::Age,
        LookupRole::Sex,
        LookupRole::State,
        LookupRole::GeogType,
        LookupRole::HealthCondition,
        LookupRole::CommonHealthCondition,
        LookupRole::Geography,
    ];

    /// Short name used in logs and in the lookup bundle.
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupRole::Age => "age",
            LookupRole::Sex => "sex",
            LookupRole::State => "state",
            LookupRole::GeogType => "geog_type",
            LookupRole::HealthCondition => "long_term_health_condition",
            LookupRole::CommonHealthCondition => "common_health_condition",
            LookupRole::Geography => "geography",
        }
    }

    /// Source column names that may hold the key, in order of preference.
    pub fn key_candidates(&self) -> &'static [&'static str] {
        match self {
            LookupRole::Age => &["age_group_code", "age_group", "age", "code"],
            LookupRole::Sex => &["sex_code", "sex", "code"],
            LookupRole::State => &["state_code", "ste_code", "state", "code"],
            LookupRole::GeogType => &["geog_type_code", "geog_type", "code"],
            LookupRole::HealthCondition | LookupRole::CommonHealthCondition => {
                &["lthc_code", "long_term_health_condition_code", "lthc", "code"]
            }
            LookupRole::Geography => &["geog_id", "geog_code", "code"],
        }
    }

    /// Fact column the key is renamed to before joining.
    pub fn fact_key(&self) -> &'static str {
        match self {
            LookupRole::Age => columns::AGE_GROUP,
            LookupRole::Sex => columns::SEX,
            LookupRole::State => columns::STATE,
            LookupRole::GeogType => columns::GEOG_TYPE,
            LookupRole::HealthCondition | LookupRole::CommonHealthCondition => columns::LTHC,
            LookupRole::Geography => columns::GEOG_ID,
        }
    }

    /// Label column name after resolution.
    pub fn label_column(&self) -> &'static str {
        match self {
            LookupRole::Age => columns::AGE_GROUP_LABEL,
            LookupRole::Sex => columns::SEX_NAME,
            LookupRole::State => columns::STATE_NAME,
            LookupRole::GeogType => columns::GEOG_TYPE_NAME,
            LookupRole::HealthCondition | LookupRole::CommonHealthCondition => {
                columns::LONG_TERM_HEALTH_CONDITION
            }
            LookupRole::Geography => columns::GEOG_NAME,
        }
    }
}

impl fmt::Display for LookupRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LookupRole {
    type Err = CensusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        LookupRole::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| CensusError::UnknownLookupRole(s.to_string()))
    }
}

/// Rule that produced a resolved label column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelSource {
    /// Column name matched the name/label pattern.
    Pattern,
    /// First column that is neither the key nor structural.
    Positional,
    /// No candidate; the key column doubles as the label.
    KeyOnly,
}

/// Key and label columns found in a lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedColumns {
    pub key: String,
    pub label: String,
    pub label_source: LabelSource,
    /// False when no key candidate matched and the first column was used.
    pub key_matched: bool,
}
