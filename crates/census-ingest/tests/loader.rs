use std::fs::{self, File};
use std::path::Path;

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, ParquetWriter, Series};
use tempfile::TempDir;

use census_ingest::{IngestError, SourceCatalog, SourceTable, load_sources};
use census_model::LookupRole;

fn str_col(name: &str, values: &[&str]) -> Column {
    Series::new(name.into(), values).into_column()
}

fn write_parquet(dir: &Path, table: SourceTable, columns: Vec<Column>) {
    let mut df = DataFrame::new(columns).unwrap();
    let mut file = File::create(dir.join(table.file_name())).unwrap();
    ParquetWriter::new(&mut file).finish(&mut df).unwrap();
}

fn write_all_sources(dir: &Path) {
    let fact = || {
        vec![
            Series::new("year".into(), &[2021i64, 2021]).into_column(),
            Series::new("state".into(), &[3i64, 4]).into_column(),
            str_col("geog_type", &["SA2", "SA2"]),
            str_col("geog_id", &["301011001", "401011001"]),
            Series::new("sex".into(), &[1i64, 2]).into_column(),
            str_col("age_group", &["A15", "A25"]),
            Series::new("persons".into(), &[10i64, 20]).into_column(),
        ]
    };
    write_parquet(dir, SourceTable::PopulationFact, fact());
    let mut health = fact();
    health.push(str_col("lthc", &["ARTH", "_T"]));
    write_parquet(dir, SourceTable::HealthConditionFact, health);
    for role in LookupRole::ALL {
        write_parquet(
            dir,
            SourceTable::Lookup(role),
            vec![str_col("code", &["1"]), str_col("label", &["One"])],
        );
    }
    fs::write(
        dir.join(SourceTable::GeoCorrespondence.file_name()),
        "SA2_CODE_2021,SA3_CODE_2021,SA4_CODE_2021,LGA_CODE_2021\n301011001,30101,301,31000\n",
    )
    .unwrap();
    fs::write(
        dir.join(SourceTable::PhnMapping.file_name()),
        "SA2_CODE_2021,SA2_NAME_2021,PHN_CODE_2023,PHN_NAME_2023,RATIO\n\
         301011001,Alexandra Hills,PHN301,Brisbane South,1.0\n",
    )
    .unwrap();
}

#[test]
fn loads_every_declared_table() {
    let dir = TempDir::new().unwrap();
    write_all_sources(dir.path());

    let sources = load_sources(&SourceCatalog::new(dir.path())).expect("load sources");

    assert_eq!(sources.population.height(), 2);
    assert_eq!(sources.health_conditions.width(), 8);
    assert_eq!(sources.lookups.len(), LookupRole::ALL.len());
    assert!(sources.lookup(LookupRole::Geography).is_some());
    assert_eq!(sources.geo_correspondence.width(), 4);
    // PHN mapping is pruned to the three named fields.
    assert_eq!(sources.phn_mapping.width(), 3);
    assert!(sources.phn_mapping.column("RATIO").is_err());
}

#[test]
fn missing_file_aborts_the_load() {
    let dir = TempDir::new().unwrap();
    write_all_sources(dir.path());
    fs::remove_file(dir.path().join("lookup_age.parquet")).unwrap();

    let result = load_sources(&SourceCatalog::new(dir.path()));

    match result {
        Err(IngestError::FileNotFound { path }) => {
            assert!(path.ends_with("lookup_age.parquet"));
        }
        other => panic!("expected FileNotFound, got {other:?}"),
    }
}

#[test]
fn missing_directory_is_reported() {
    let dir = TempDir::new().unwrap();
    let result = load_sources(&SourceCatalog::new(dir.path().join("nope")));
    assert!(matches!(result, Err(IngestError::DirectoryNotFound { .. })));
}
