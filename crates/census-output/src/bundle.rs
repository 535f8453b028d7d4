//! JSON bundle of named lookup tables.
//!
//! The bundle is `{ name: [ { column: value, ... }, ... ] }` with names and
//! column keys in sorted order, so identical lookups serialize to identical
//! bytes.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{AnyValue, DataFrame};
use serde_json::{Map, Number, Value};

use census_common::any_to_string;

fn json_value(value: AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(b),
        AnyValue::String(s) => Value::String(s.to_string()),
        AnyValue::StringOwned(s) => Value::String(s.to_string()),
        AnyValue::Int8(v) => Value::from(v),
        AnyValue::Int16(v) => Value::from(v),
        AnyValue::Int32(v) => Value::from(v),
        AnyValue::Int64(v) => Value::from(v),
        AnyValue::UInt8(v) => Value::from(v),
        AnyValue::UInt16(v) => Value::from(v),
        AnyValue::UInt32(v) => Value::from(v),
        AnyValue::UInt64(v) => Value::from(v),
        AnyValue::Float32(v) => Number::from_f64(f64::from(v)).map_or(Value::Null, Value::Number),
        AnyValue::Float64(v) => Number::from_f64(v).map_or(Value::Null, Value::Number),
        other => Value::String(any_to_string(other)),
    }
}

/// Converts a frame to one JSON object per row.
pub fn frame_records(df: &DataFrame) -> Result<Vec<Value>> {
    let columns = df.get_columns();
    let mut records = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let mut record = Map::new();
        for column in columns {
            let value = column
                .get(idx)
                .with_context(|| format!("read row {idx} of {}", column.name()))?;
            record.insert(column.name().to_string(), json_value(value));
        }
        records.push(Value::Object(record));
    }
    Ok(records)
}

/// Serializes named lookups to pretty-printed JSON bytes.
pub fn lookup_bundle_bytes<'a, I>(lookups: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = (&'a str, &'a DataFrame)>,
{
    let mut bundle = BTreeMap::new();
    for (name, df) in lookups {
        let records = frame_records(df).with_context(|| format!("serialize lookup {name}"))?;
        bundle.insert(name.to_string(), records);
    }
    let mut bytes = serde_json::to_vec_pretty(&bundle).context("encode lookup bundle")?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Writes the lookup bundle and returns its bytes' SHA-256.
pub fn write_lookup_bundle<'a, I>(lookups: I, path: &Path) -> Result<String>
where
    I: IntoIterator<Item = (&'a str, &'a DataFrame)>,
{
    let bytes = lookup_bundle_bytes(lookups)?;
    fs::write(path, &bytes).with_context(|| format!("write {}", path.display()))?;
    Ok(crate::common::sha256_hex(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    #[test]
    fn records_keep_nulls_and_numbers() {
        let df = DataFrame::new(vec![
            Series::new("sex".into(), &[Some("1"), None]).into_column(),
            Series::new("persons".into(), &[10i64, 20]).into_column(),
        ])
        .unwrap();
        let records = frame_records(&df).unwrap();
        assert_eq!(records[0], serde_json::json!({"persons": 10, "sex": "1"}));
        assert_eq!(records[1], serde_json::json!({"persons": 20, "sex": null}));
    }

    #[test]
    fn bundle_names_are_sorted() {
        let sex = DataFrame::new(vec![
            Series::new("sex".into(), &["1"]).into_column(),
            Series::new("sex_name".into(), &["Male"]).into_column(),
        ])
        .unwrap();
        let age = DataFrame::new(vec![
            Series::new("age_group".into(), &["A0"]).into_column(),
        ])
        .unwrap();
        let bytes = lookup_bundle_bytes([("sex", &sex), ("age", &age)]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let age_at = text.find("\"age\"").unwrap();
        let sex_at = text.find("\"sex\"").unwrap();
        assert!(age_at < sex_at);
        assert!(text.contains("\"sex_name\": \"Male\""));
    }
}
