//! Tests for the join plan and denormalization.

use std::collections::BTreeMap;

use polars::prelude::*;

use census_model::{FactKind, LookupRole};
use census_transform::{
    JoinPlan, LookupSet, TransformError, add_hierarchy_columns, build_name_tables,
    build_sa2_hierarchy, denormalize, filter_facts, filter_geography, filter_sa2_geography,
    prepare_lookups,
};

fn pair(key: &str, label: &str, keys: &[&str], labels: &[&str]) -> DataFrame {
    DataFrame::new(vec![
        Series::new(key.into(), keys).into(),
        Series::new(label.into(), labels).into(),
    ])
    .unwrap()
}

fn raw_lookups() -> BTreeMap<LookupRole, DataFrame> {
    let mut raw = BTreeMap::new();
    raw.insert(
        LookupRole::Age,
        pair(
            "age_group",
            "age_group_label",
            &["A25", "A0"],
            &["Age groups: 25-34 years", "0-14 years"],
        ),
    );
    raw.insert(
        LookupRole::Sex,
        pair("sex", "sex_name", &["1", "2"], &["Male", "Female"]),
    );
    raw.insert(
        LookupRole::State,
        pair("state_code", "state_name", &["3", "4"], &["Queensland", "South Australia"]),
    );
    raw.insert(
        LookupRole::GeogType,
        pair("geog_type", "geog_type_name", &["SA2", "SA3"], &["Statistical Area 2", "Statistical Area 3"]),
    );
    raw.insert(
        LookupRole::HealthCondition,
        pair("lthc", "lthc_name", &["ARTH", "ASTH"], &["Arthritis", "Asthma"]),
    );
    raw.insert(
        LookupRole::CommonHealthCondition,
        pair("lthc", "lthc_name", &["ARTH"], &["Arthritis"]),
    );
    raw
}

fn phn_mapping() -> DataFrame {
    DataFrame::new(vec![
        Series::new("SA2_CODE_2021".into(), &["301011001"]).into(),
        Series::new("PHN_CODE_2023".into(), &["PHN301"]).into(),
        Series::new("PHN_NAME_2023".into(), &["Brisbane South"]).into(),
    ])
    .unwrap()
}

fn geography() -> DataFrame {
    DataFrame::new(vec![
        Series::new("geog_id".into(), &["301011001", "301011002", "30101", "301", "401011001"])
            .into(),
        Series::new("geog_type".into(), &["SA2", "SA2", "SA3", "SA4", "SA2"]).into(),
        Series::new("state".into(), &[3i64, 3, 3, 3, 4]).into(),
        Series::new(
            "geog_name".into(),
            &["Alexandra Hills", "Belmont", "Capalaba", "Brisbane - East", "Adelaide"],
        )
        .into(),
    ])
    .unwrap()
}

fn health_facts() -> DataFrame {
    DataFrame::new(vec![
        Series::new("year".into(), &[2021i64, 2021, 2021, 2021]).into(),
        Series::new("state".into(), &[3i64, 3, 3, 4]).into(),
        Series::new("geog_type".into(), &["SA2", "SA2", "SA3", "SA2"]).into(),
        Series::new("geog_id".into(), &["301011001", "301011002", "30101", "401011001"]).into(),
        Series::new("sex".into(), &[1i64, 2, 1, 1]).into(),
        Series::new("age_group".into(), &["A25", "A0", "A25", "A25"]).into(),
        Series::new("lthc".into(), &["ARTH", "ZZZZ", "_T", "ARTH"]).into(),
        Series::new("persons".into(), &[10i64, 5, 20, 7]).into(),
    ])
    .unwrap()
}

fn lookup_set() -> LookupSet {
    let mut set = prepare_lookups(&raw_lookups(), &phn_mapping()).unwrap();
    let state_geography = filter_geography(&geography(), "3").unwrap();
    let names = build_name_tables(&state_geography).unwrap();
    let hierarchy = build_sa2_hierarchy(&filter_sa2_geography(&geography(), "3").unwrap()).unwrap();
    set.insert_geography(&names, hierarchy);
    set
}

fn prepared_facts(df: &DataFrame) -> DataFrame {
    add_hierarchy_columns(&filter_facts(df, "3").unwrap()).unwrap()
}

fn strings(df: &DataFrame, column: &str) -> Vec<Option<String>> {
    df.column(column)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect()
}

#[test]
fn test_row_count_matches_filtered_facts() {
    let facts = prepared_facts(&health_facts());
    let plan = JoinPlan::for_fact(FactKind::HealthConditions);
    let result = denormalize(&facts, &lookup_set(), &plan).unwrap();

    assert_eq!(result.frame.height(), 3);
    assert_eq!(result.reports.len(), 9);
    assert!(result.reports.iter().all(|report| report.rows == 3));
}

#[test]
fn test_columns_follow_output_order() {
    let facts = prepared_facts(&health_facts());
    let plan = JoinPlan::for_fact(FactKind::HealthConditions);
    let result = denormalize(&facts, &lookup_set(), &plan).unwrap();

    let names: Vec<String> = result
        .frame
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    let expected: Vec<String> = FactKind::HealthConditions
        .output_columns()
        .into_iter()
        .map(str::to_string)
        .collect();
    assert_eq!(names, expected);
}

#[test]
fn test_fact_row_order_is_preserved() {
    let facts = prepared_facts(&health_facts());
    let plan = JoinPlan::for_fact(FactKind::HealthConditions);
    let result = denormalize(&facts, &lookup_set(), &plan).unwrap();

    assert_eq!(
        strings(&result.frame, "geog_id"),
        vec![
            Some("301011001".to_string()),
            Some("301011002".to_string()),
            Some("30101".to_string()),
        ]
    );
}

#[test]
fn test_labels_are_joined() {
    let facts = prepared_facts(&health_facts());
    let plan = JoinPlan::for_fact(FactKind::HealthConditions);
    let frame = denormalize(&facts, &lookup_set(), &plan).unwrap().frame;

    assert_eq!(strings(&frame, "sex_name")[1].as_deref(), Some("Female"));
    assert_eq!(strings(&frame, "state_name")[0].as_deref(), Some("Queensland"));
    assert_eq!(strings(&frame, "age_group_label")[0].as_deref(), Some("25-34 years"));
    assert_eq!(strings(&frame, "age_group_label")[1].as_deref(), Some("0-14 years"));
    assert_eq!(strings(&frame, "sa2_name")[0].as_deref(), Some("Alexandra Hills"));
    assert_eq!(strings(&frame, "sa3_name")[2].as_deref(), Some("Capalaba"));
    assert_eq!(strings(&frame, "sa4_name")[0].as_deref(), Some("Brisbane - East"));
    assert_eq!(strings(&frame, "PHN_NAME_2023")[0].as_deref(), Some("Brisbane South"));
    assert_eq!(
        strings(&frame, "long_term_health_condition")[2].as_deref(),
        Some("Total Persons")
    );
}

#[test]
fn test_unknown_health_condition_becomes_null() {
    let facts = prepared_facts(&health_facts());
    let plan = JoinPlan::for_fact(FactKind::HealthConditions);
    let result = denormalize(&facts, &lookup_set(), &plan).unwrap();

    assert_eq!(strings(&result.frame, "long_term_health_condition")[1], None);
    let report = result
        .reports
        .iter()
        .find(|report| report.key == "lthc")
        .unwrap();
    assert_eq!(report.unmatched, 1);
    assert_eq!(report.null_keys, 0);
}

#[test]
fn test_sa3_rows_report_null_sa2_keys() {
    let facts = prepared_facts(&health_facts());
    let plan = JoinPlan::for_fact(FactKind::HealthConditions);
    let result = denormalize(&facts, &lookup_set(), &plan).unwrap();

    let sa2 = result.reports.iter().find(|r| r.name == "sa2_name").unwrap();
    assert_eq!(sa2.null_keys, 1);
    assert_eq!(sa2.unmatched, 0);

    let phn = result.reports.iter().find(|r| r.name == "phn").unwrap();
    assert_eq!(phn.null_keys, 1);
    assert_eq!(phn.unmatched, 1);
}

#[test]
fn test_population_plan_output() {
    let facts = health_facts().drop("lthc").unwrap();
    let facts = prepared_facts(&facts);
    let plan = JoinPlan::for_fact(FactKind::Population);
    let result = denormalize(&facts, &lookup_set(), &plan).unwrap();

    assert_eq!(result.frame.height(), 3);
    assert_eq!(result.frame.width(), 18);
    assert!(result.frame.column("lthc").is_err());
}

#[test]
fn test_duplicate_lookup_keys_are_rejected() {
    let facts = prepared_facts(&health_facts());
    let mut lookups = lookup_set();
    lookups.insert(
        "sex",
        pair("sex", "sex_name", &["1", "1", "2"], &["Male", "Man", "Female"]),
    );
    let plan = JoinPlan::for_fact(FactKind::HealthConditions);

    let err = denormalize(&facts, &lookups, &plan).unwrap_err();
    assert!(matches!(
        err,
        TransformError::CardinalityChanged { before: 3, after: 5, .. }
    ));
}

#[test]
fn test_missing_lookup_is_an_error() {
    let facts = prepared_facts(&health_facts());
    let plan = JoinPlan::for_fact(FactKind::HealthConditions);

    let err = denormalize(&facts, &LookupSet::default(), &plan).unwrap_err();
    assert!(matches!(err, TransformError::MissingLookup(ref name) if name == "sex"));
}

#[test]
fn test_health_lookup_carries_sentinels_once() {
    let lookups = lookup_set();
    let extended = lookups.get("long_term_health_condition").unwrap();
    let codes = strings(extended, "lthc");
    assert_eq!(codes.iter().filter(|c| c.as_deref() == Some("_T")).count(), 1);
    assert_eq!(codes.iter().filter(|c| c.as_deref() == Some("_N")).count(), 1);
    assert_eq!(extended.height(), 4);
}

#[test]
fn test_join_plan_description() {
    let plan = JoinPlan::for_fact(FactKind::HealthConditions);
    insta::assert_snapshot!(plan.describe().trim_end(), @r"
    1. sex [sex] -> sex_name
    2. long_term_health_condition [lthc] -> long_term_health_condition
    3. age [age_group] -> age_group_label
    4. state [state] -> state_name
    5. geog_type [geog_type] -> geog_type_name
    6. sa2_names [sa2_code] -> sa2_name
    7. sa3_names [sa3_code] -> sa3_name
    8. sa4_names [sa4_code] -> sa4_name
    9. phn [sa2_code] -> PHN_NAME_2023
    ");
}

#[test]
fn test_source_dtypes_survive_denormalization() {
    let facts = prepared_facts(&health_facts());
    let plan = JoinPlan::for_fact(FactKind::HealthConditions);
    let frame = denormalize(&facts, &lookup_set(), &plan).unwrap().frame;

    assert_eq!(frame.column("state").unwrap().dtype(), &DataType::Int64);
    assert_eq!(frame.column("sex").unwrap().dtype(), &DataType::Int64);
    let sexes: Vec<Option<i64>> = frame.column("sex").unwrap().i64().unwrap().into_iter().collect();
    assert_eq!(sexes, vec![Some(1), Some(2), Some(1)]);
    assert_eq!(strings(&frame, "sex_name")[0].as_deref(), Some("Male"));
}

#[test]
fn test_blank_label_is_still_a_match() {
    let mut raw = raw_lookups();
    raw.insert(
        LookupRole::Sex,
        pair("sex", "sex_name", &["1", "2"], &["  Male  ", ""]),
    );
    let mut lookups = prepare_lookups(&raw, &phn_mapping()).unwrap();
    let state_geography = filter_geography(&geography(), "3").unwrap();
    let names = build_name_tables(&state_geography).unwrap();
    let hierarchy = build_sa2_hierarchy(&filter_sa2_geography(&geography(), "3").unwrap()).unwrap();
    lookups.insert_geography(&names, hierarchy);

    let facts = prepared_facts(&health_facts());
    let plan = JoinPlan::for_fact(FactKind::HealthConditions);
    let result = denormalize(&facts, &lookups, &plan).unwrap();

    let sex_names = strings(&result.frame, "sex_name");
    assert_eq!(sex_names[0].as_deref(), Some("Male"));
    assert_eq!(sex_names[1], None);
    let report = result.reports.iter().find(|r| r.key == "sex").unwrap();
    assert_eq!(report.unmatched, 0);
    assert_eq!(report.null_keys, 0);
}
