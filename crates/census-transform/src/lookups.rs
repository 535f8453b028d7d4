//! Lookup preparation: label clean-up, sentinel codes, PHN mapping and the
//! named lookup set used by the join plan and the lookup bundle.

use std::collections::BTreeMap;

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use tracing::{info, warn};

use census_common::string_column;
use census_model::columns::{AGE_GROUP_LABEL, LONG_TERM_HEALTH_CONDITION, LTHC, PHN_CODE, PHN_NAME, PHN_SA2_CODE};
use census_model::{CaseInsensitiveSet, GeogLevel, LookupRole};

use crate::error::{Result, TransformError};
use crate::frame::{dedupe_by_key, string_values};
use crate::geography::GeoNameTables;
use crate::resolver::{LookupResolution, resolve_lookup};

/// Literal prefix some age-group labels carry in the source catalogue.
pub const AGE_LABEL_PREFIX: &str = "Age groups: ";

/// Health-condition codes the standard catalogue omits.
pub const HEALTH_CONDITION_SENTINELS: [(&str, &str); 2] =
    [("_T", "Total Persons"), ("_N", "Not Stated")];

/// Lookup name of the PHN mapping.
pub const PHN_LOOKUP: &str = "phn";

/// Lookup name of the SA2 hierarchy table.
pub const SA2_HIERARCHY_LOOKUP: &str = "sa2_hierarchy";

/// Lookups prepared from the dimension tables, in preparation order.
const DIMENSION_ROLES: [LookupRole; 6] = [
    LookupRole::Age,
    LookupRole::Sex,
    LookupRole::State,
    LookupRole::GeogType,
    LookupRole::HealthCondition,
    LookupRole::CommonHealthCondition,
];

/// Removes the `"Age groups: "` prefix from a label.
///
/// # Examples
///
/// ```
/// use census_transform::lookups::strip_age_prefix;
///
/// assert_eq!(strip_age_prefix("Age groups: 25-34 years"), "25-34 years");
/// assert_eq!(strip_age_prefix("0-14 years"), "0-14 years");
/// ```
pub fn strip_age_prefix(label: &str) -> &str {
    label.strip_prefix(AGE_LABEL_PREFIX).unwrap_or(label)
}

/// Applies [`strip_age_prefix`] to the `age_group_label` column.
pub fn standardize_age_labels(df: &DataFrame) -> Result<DataFrame> {
    let labels: Vec<Option<String>> = string_values(df, AGE_GROUP_LABEL, "lookup:age")?
        .into_iter()
        .map(|label| label.map(|label| strip_age_prefix(&label).to_string()))
        .collect();
    let mut out = df.clone();
    out.with_column(string_column(AGE_GROUP_LABEL, labels))?;
    Ok(out)
}

/// Appends the `_T`/`_N` sentinel rows to a resolved health-condition lookup.
///
/// Keys are deduplicated keep-first, so a code the standard catalogue
/// already defines keeps its catalogue label.
pub fn extend_health_conditions(standard: &DataFrame) -> Result<DataFrame> {
    let sentinels = DataFrame::new(vec![
        Series::new(
            LTHC.into(),
            HEALTH_CONDITION_SENTINELS.map(|(code, _)| code),
        )
        .into_column(),
        Series::new(
            LONG_TERM_HEALTH_CONDITION.into(),
            HEALTH_CONDITION_SENTINELS.map(|(_, label)| label),
        )
        .into_column(),
    ])?;
    let combined = standard.vstack(&sentinels)?;
    let (extended, _) = dedupe_by_key(&combined, LTHC, "lookup:long_term_health_condition")?;
    Ok(extended)
}

/// Projects the PHN mapping to `sa2_code, PHN_CODE_2023, PHN_NAME_2023`,
/// one row per SA2 (first occurrence wins).
pub fn prepare_phn_lookup(phn: &DataFrame) -> Result<(DataFrame, usize)> {
    let lookup = CaseInsensitiveSet::new(phn.get_column_names_owned());
    let column = |name: &str| -> Result<Vec<Option<String>>> {
        let actual = lookup.get(name).ok_or_else(|| TransformError::MissingColumn {
            column: name.to_string(),
            table: "phn mapping".to_string(),
        })?;
        string_values(phn, actual, "phn mapping")
    };
    let df = DataFrame::new(vec![
        string_column(GeogLevel::Sa2.code_column(), column(PHN_SA2_CODE)?),
        string_column(PHN_CODE, column(PHN_CODE)?),
        string_column(PHN_NAME, column(PHN_NAME)?),
    ])?;
    let (df, duplicates) = dedupe_by_key(&df, GeogLevel::Sa2.code_column(), "phn mapping")?;
    if duplicates > 0 {
        warn!(duplicates, "SA2 codes mapped to several PHNs, kept first");
    }
    Ok((df, duplicates))
}

/// Every prepared lookup, addressed by name.
#[derive(Debug, Clone, Default)]
pub struct LookupSet {
    tables: BTreeMap<String, DataFrame>,
    resolutions: Vec<LookupResolution>,
}

impl LookupSet {
    pub fn get(&self, name: &str) -> Option<&DataFrame> {
        self.tables.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, df: DataFrame) {
        self.tables.insert(name.into(), df);
    }

    /// Lookups in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataFrame)> {
        self.tables.iter().map(|(name, df)| (name.as_str(), df))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// How each dimension lookup's columns were resolved.
    pub fn resolutions(&self) -> &[LookupResolution] {
        &self.resolutions
    }

    /// Registers the per-level name tables and the SA2 hierarchy.
    pub fn insert_geography(&mut self, names: &GeoNameTables, sa2_hierarchy: DataFrame) {
        for level in GeogLevel::ALL {
            self.insert(GeoNameTables::lookup_name(level), names.get(level).clone());
        }
        self.insert(SA2_HIERARCHY_LOOKUP, sa2_hierarchy);
    }
}

/// Resolves every dimension lookup and the PHN mapping.
///
/// Age labels are standardized and the health-condition lookup gains its
/// sentinel codes. The geography lookup is handled by
/// [`crate::geography`] and registered with [`LookupSet::insert_geography`].
pub fn prepare_lookups(
    raw: &BTreeMap<LookupRole, DataFrame>,
    phn_mapping: &DataFrame,
) -> Result<LookupSet> {
    let mut set = LookupSet::default();
    for role in DIMENSION_ROLES {
        let df = raw
            .get(&role)
            .ok_or_else(|| TransformError::MissingLookup(role.as_str().to_string()))?;
        let resolved = resolve_lookup(df, role)?;
        set.resolutions.push(resolved.summary());
        let frame = match role {
            LookupRole::Age => standardize_age_labels(&resolved.frame)?,
            LookupRole::HealthCondition => extend_health_conditions(&resolved.frame)?,
            _ => resolved.frame,
        };
        set.insert(role.as_str(), frame);
    }
    let (phn, _) = prepare_phn_lookup(phn_mapping)?;
    set.insert(PHN_LOOKUP, phn);
    info!(lookups = set.len(), "prepared lookups");
    Ok(set)
}
