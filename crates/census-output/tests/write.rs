//! Tests for artifact writing.

use polars::prelude::*;
use tempfile::TempDir;

use census_output::{
    GEO_REFERENCE_FILE, HEALTH_ANALYSIS_FILE, LOOKUP_BUNDLE_FILE, OutputTables,
    POPULATION_ANALYSIS_FILE, write_outputs,
};
use census_transform::LookupSet;

fn frame(name: &str, values: &[&str]) -> DataFrame {
    DataFrame::new(vec![Series::new(name.into(), values).into()]).unwrap()
}

fn lookups() -> LookupSet {
    let mut set = LookupSet::default();
    set.insert("sex", frame("sex", &["1", "2"]));
    set.insert("age", frame("age_group", &["A0"]));
    set
}

#[test]
fn test_writes_all_artifacts() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("processed");
    let health = frame("geog_id", &["301011001", "301011002"]);
    let reference = frame("geog_code", &["301011001", "30101", "301"]);
    let lookups = lookups();
    let tables = OutputTables {
        health: &health,
        population: None,
        geo_reference: &reference,
        lookups: &lookups,
    };

    let summaries = write_outputs(&tables, &out, false).unwrap();

    let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec![HEALTH_ANALYSIS_FILE, GEO_REFERENCE_FILE, LOOKUP_BUNDLE_FILE]);
    assert!(summaries.iter().all(|s| s.path.exists()));
    assert!(summaries.iter().all(|s| s.sha256.as_ref().is_some_and(|d| d.len() == 64)));
    assert_eq!(summaries[1].rows, 3);
    assert_eq!(summaries[2].rows, 3);

    let bundle: serde_json::Value =
        serde_json::from_slice(&std::fs::read(out.join(LOOKUP_BUNDLE_FILE)).unwrap()).unwrap();
    assert_eq!(bundle["sex"][1]["sex"], "2");
    assert_eq!(bundle["age"].as_array().map(Vec::len), Some(1));
}

#[test]
fn test_population_is_optional() {
    let dir = TempDir::new().unwrap();
    let health = frame("geog_id", &["301011001"]);
    let population = frame("geog_id", &["301011001", "301011002"]);
    let reference = frame("geog_code", &["301011001"]);
    let lookups = lookups();
    let tables = OutputTables {
        health: &health,
        population: Some(&population),
        geo_reference: &reference,
        lookups: &lookups,
    };

    let summaries = write_outputs(&tables, dir.path(), false).unwrap();
    let population = summaries
        .iter()
        .find(|s| s.name == POPULATION_ANALYSIS_FILE)
        .unwrap();
    assert_eq!(population.rows, 2);
    assert!(dir.path().join(POPULATION_ANALYSIS_FILE).exists());
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("processed");
    let health = frame("geog_id", &["301011001"]);
    let reference = frame("geog_code", &["301011001"]);
    let lookups = lookups();
    let tables = OutputTables {
        health: &health,
        population: None,
        geo_reference: &reference,
        lookups: &lookups,
    };

    let summaries = write_outputs(&tables, &out, true).unwrap();
    assert_eq!(summaries.len(), 3);
    assert!(summaries.iter().all(|s| s.sha256.is_none()));
    assert!(!out.exists());
}

#[test]
fn test_rewrites_are_byte_identical() {
    let dir = TempDir::new().unwrap();
    let health = frame("geog_id", &["301011001", "301011002"]);
    let reference = frame("geog_code", &["301011001"]);
    let lookups = lookups();
    let tables = OutputTables {
        health: &health,
        population: None,
        geo_reference: &reference,
        lookups: &lookups,
    };

    let first = write_outputs(&tables, dir.path(), false).unwrap();
    let second = write_outputs(&tables, dir.path(), false).unwrap();
    assert_eq!(first, second);
}
