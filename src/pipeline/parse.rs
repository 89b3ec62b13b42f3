//! Input loading.
//!
//! Reads JSON documents and shapes them into records, collections or groups.

use crate::error::{OrdDiffError, Result as OrdResult};
use crate::model::{NameRule, Record};
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

/// Read and parse one JSON document
pub fn load_value(path: &Path, quiet: bool) -> Result<Value> {
    if !quiet {
        tracing::info!("Reading {}", path.display());
    }

    let raw_content = std::fs::read_to_string(path)
        .map_err(|e| OrdDiffError::io(path, e))
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    let value = serde_json::from_str(&raw_content)
        .map_err(OrdDiffError::from)
        .with_context(|| format!("Failed to parse JSON: {}", path.display()))?;
    Ok(value)
}

/// Load a single record
pub fn load_record(path: &Path, rule: &NameRule, quiet: bool) -> Result<Record> {
    let value = load_value(path, quiet)?;
    record_from_value(value, rule).with_context(|| format!("In {}", path.display()))
}

/// Load a flat collection of records
pub fn load_collection(path: &Path, rule: &NameRule, quiet: bool) -> Result<Vec<Record>> {
    let value = load_value(path, quiet)?;
    let records =
        records_from_value(value, rule).with_context(|| format!("In {}", path.display()))?;
    if !quiet {
        tracing::info!("Loaded {} records", records.len());
    }
    Ok(records)
}

/// Load a partition of records into groups
pub fn load_groups(path: &Path, rule: &NameRule, quiet: bool) -> Result<Vec<Vec<Record>>> {
    let value = load_value(path, quiet)?;
    let groups =
        groups_from_value(value, rule).with_context(|| format!("In {}", path.display()))?;
    if !quiet {
        tracing::info!(
            "Loaded {} groups holding {} records",
            groups.len(),
            groups.iter().map(Vec::len).sum::<usize>()
        );
    }
    Ok(groups)
}

/// A record is any JSON object.
pub fn record_from_value(value: Value, rule: &NameRule) -> OrdResult<Record> {
    match value {
        Value::Object(_) => Ok(Record::with_name_rule(value, rule)),
        other => Err(OrdDiffError::unexpected_shape("object", value_kind(&other))),
    }
}

/// A collection is a JSON array of objects.
pub fn records_from_value(value: Value, rule: &NameRule) -> OrdResult<Vec<Record>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| record_from_value(item, rule))
            .collect(),
        other => Err(OrdDiffError::unexpected_shape(
            "array of objects",
            value_kind(&other),
        )),
    }
}

/// A partition is a JSON array of arrays of objects.
pub fn groups_from_value(value: Value, rule: &NameRule) -> OrdResult<Vec<Vec<Record>>> {
    match value {
        Value::Array(groups) => groups
            .into_iter()
            .map(|group| match group {
                Value::Array(_) => records_from_value(group, rule),
                other => Err(OrdDiffError::unexpected_shape(
                    "array of arrays",
                    format!("array of {}", value_kind(&other)),
                )),
            })
            .collect(),
        other => Err(OrdDiffError::unexpected_shape(
            "array of arrays",
            value_kind(&other),
        )),
    }
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_records_from_array() {
        let value = json!([
            {"identifiers": [{"type": "NAME", "value": "water"}]},
            {"identifiers": [{"type": "SMILES", "value": "O"}]}
        ]);
        let records = records_from_value(value, &NameRule::default()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name(), Some("water"));
        assert_eq!(records[1].name(), None);
    }

    #[test]
    fn test_wrong_shapes_are_reported() {
        let rule = NameRule::default();
        let err = records_from_value(json!({"a": 1}), &rule).unwrap_err();
        assert!(matches!(
            err,
            OrdDiffError::Parse {
                source: ParseErrorKind::UnexpectedShape { .. },
                ..
            }
        ));
        assert!(record_from_value(json!([1]), &rule).is_err());
        assert!(groups_from_value(json!([{"a": 1}]), &rule).is_err());
        assert!(groups_from_value(json!([[1]]), &rule).is_err());
    }

    #[test]
    fn test_groups_keep_empty_groups() {
        let groups = groups_from_value(json!([[{"a": 1}], []]), &NameRule::default()).unwrap();
        assert_eq!(groups.len(), 2);
        assert!(groups[1].is_empty());
    }

    #[test]
    fn test_load_collection_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"identifiers": [{{"type": "NAME", "value": "x"}}]}}]"#).unwrap();
        let records = load_collection(file.path(), &NameRule::default(), true).unwrap();
        assert_eq!(records[0].name(), Some("x"));
    }

    #[test]
    fn test_load_value_reports_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        let err = load_value(file.path(), true).unwrap_err();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}
