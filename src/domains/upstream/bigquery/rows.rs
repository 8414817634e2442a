//! Materialization of BigQuery REST rows into JSON objects.
//!
//! The REST API encodes every scalar cell as a string; the schema says how to
//! read it back. Column order follows the schema.

use chrono::{DateTime, Utc};
use serde_json::{Map, Number, Value};

use super::model::{TableFieldSchema, TableRow};
use crate::domains::upstream::UpstreamError;

static NULL: Value = Value::Null;

/// Convert one row into a column-name -> value object.
pub fn row_to_object(
    fields: &[TableFieldSchema],
    row: &TableRow,
) -> Result<Map<String, Value>, UpstreamError> {
    let cells: Vec<&Value> = row.f.iter().map(|c| &c.v).collect();
    cells_to_object(fields, &cells)
}

fn cells_to_object(
    fields: &[TableFieldSchema],
    cells: &[&Value],
) -> Result<Map<String, Value>, UpstreamError> {
    if cells.len() != fields.len() {
        return Err(UpstreamError::invalid_response(format!(
            "row has {} cells but schema declares {} fields",
            cells.len(),
            fields.len()
        )));
    }

    fields
        .iter()
        .zip(cells)
        .map(|(field, raw)| Ok((field.name.clone(), convert_cell(field, raw)?)))
        .collect()
}

fn convert_cell(field: &TableFieldSchema, raw: &Value) -> Result<Value, UpstreamError> {
    if raw.is_null() {
        return Ok(Value::Null);
    }

    if field.is_repeated() {
        let items = raw.as_array().ok_or_else(|| {
            UpstreamError::invalid_response(format!("REPEATED field '{}' is not an array", field.name))
        })?;
        return items
            .iter()
            .map(|item| convert_single(field, item.get("v").unwrap_or(&NULL)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array);
    }

    convert_single(field, raw)
}

fn convert_single(field: &TableFieldSchema, raw: &Value) -> Result<Value, UpstreamError> {
    if raw.is_null() {
        return Ok(Value::Null);
    }

    if field.is_record() {
        let cells: Vec<&Value> = raw
            .get("f")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                UpstreamError::invalid_response(format!("RECORD field '{}' has no cells", field.name))
            })?
            .iter()
            .map(|c| c.get("v").unwrap_or(&NULL))
            .collect();
        return cells_to_object(&field.fields, &cells).map(Value::Object);
    }

    match raw.as_str() {
        Some(text) => Ok(convert_scalar(&field.field_type, text)),
        // Already typed; pass through.
        None => Ok(raw.clone()),
    }
}

/// Read a scalar cell according to its declared type.
pub fn convert_scalar(field_type: &str, text: &str) -> Value {
    let keep = || Value::String(text.to_string());

    match field_type.to_ascii_uppercase().as_str() {
        "INTEGER" | "INT64" => text.parse::<i64>().map(Value::from).unwrap_or_else(|_| keep()),
        "FLOAT" | "FLOAT64" => text
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(keep),
        "BOOLEAN" | "BOOL" => match text.to_ascii_lowercase().as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => keep(),
        },
        "TIMESTAMP" => parse_timestamp(text)
            .map(|ts| Value::String(ts.to_rfc3339()))
            .unwrap_or_else(keep),
        "JSON" => serde_json::from_str(text).unwrap_or_else(|_| keep()),
        _ => keep(),
    }
}

/// Parse a TIMESTAMP cell: integer microseconds (int64 timestamp format) or
/// floating-point seconds (legacy format).
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(micros) = text.parse::<i64>() {
        return DateTime::from_timestamp_micros(micros);
    }

    let seconds = text.parse::<f64>().ok().filter(|s| s.is_finite())?;
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9).round() as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
}

/// Parse an epoch-milliseconds string (table metadata timestamps).
pub fn parse_epoch_millis(text: &str) -> Option<DateTime<Utc>> {
    text.parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(name: &str, field_type: &str, mode: Option<&str>) -> TableFieldSchema {
        TableFieldSchema {
            name: name.to_string(),
            field_type: field_type.to_string(),
            mode: mode.map(str::to_string),
            description: None,
            fields: Vec::new(),
        }
    }

    fn row(value: Value) -> TableRow {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(convert_scalar("INTEGER", "42"), json!(42));
        assert_eq!(convert_scalar("INT64", "-7"), json!(-7));
        assert_eq!(convert_scalar("FLOAT", "2.5"), json!(2.5));
        assert_eq!(convert_scalar("FLOAT64", "NaN"), json!("NaN"));
        assert_eq!(convert_scalar("BOOLEAN", "true"), json!(true));
        assert_eq!(convert_scalar("BOOL", "false"), json!(false));
        assert_eq!(convert_scalar("NUMERIC", "123.4500"), json!("123.4500"));
        assert_eq!(convert_scalar("STRING", "hola"), json!("hola"));
        assert_eq!(convert_scalar("DATE", "2024-03-01"), json!("2024-03-01"));
        assert_eq!(convert_scalar("JSON", r#"{"a":1}"#), json!({"a": 1}));
    }

    #[test]
    fn test_timestamp_formats() {
        assert_eq!(
            convert_scalar("TIMESTAMP", "1700000000000000"),
            json!("2023-11-14T22:13:20+00:00")
        );
        assert_eq!(
            convert_scalar("TIMESTAMP", "1.7E9"),
            json!("2023-11-14T22:13:20+00:00")
        );
        assert_eq!(convert_scalar("TIMESTAMP", "soon"), json!("soon"));
    }

    #[test]
    fn test_row_preserves_column_order() {
        let fields = vec![
            field("zeta", "STRING", None),
            field("alpha", "INTEGER", Some("REQUIRED")),
        ];
        let object = row_to_object(&fields, &row(json!({"f": [{"v": "z"}, {"v": "1"}]}))).unwrap();
        let keys: Vec<_> = object.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(object["alpha"], json!(1));
    }

    #[test]
    fn test_null_repeated_and_record() {
        let mut address = field("address", "RECORD", None);
        address.fields = vec![field("city", "STRING", None), field("zip", "INTEGER", None)];
        let fields = vec![
            field("nickname", "STRING", None),
            field("scores", "INTEGER", Some("REPEATED")),
            address,
        ];
        let object = row_to_object(
            &fields,
            &row(json!({"f": [
                {"v": null},
                {"v": [{"v": "1"}, {"v": "2"}]},
                {"v": {"f": [{"v": "Lima"}, {"v": "15001"}]}}
            ]})),
        )
        .unwrap();

        assert_eq!(object["nickname"], Value::Null);
        assert_eq!(object["scores"], json!([1, 2]));
        assert_eq!(object["address"], json!({"city": "Lima", "zip": 15001}));
    }

    #[test]
    fn test_cell_count_mismatch_is_rejected() {
        let fields = vec![field("a", "STRING", None)];
        let result = row_to_object(&fields, &row(json!({"f": []})));
        assert!(matches!(result, Err(UpstreamError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_epoch_millis() {
        let ts = parse_epoch_millis("1700000000123").unwrap();
        assert_eq!(ts.to_rfc3339(), "2023-11-14T22:13:20.123+00:00");
        assert!(parse_epoch_millis("yesterday").is_none());
    }
}
