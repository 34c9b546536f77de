//! JSON Records - a batch of JSON objects viewed as a table

use crate::error::{NodeGroupError, Result};
use crate::ingestion::table::IdentifierTable;
use serde_json::Value;

/// One JSON object per row; object keys are columns.
///
/// Missing keys and `null` are absent cells. Strings are taken verbatim,
/// numbers and booleans by their JSON text. Arrays and objects cannot be
/// identifier values and fail at read time.
#[derive(Debug, Clone)]
pub struct JsonRecords {
    records: Vec<Value>,
    columns: Vec<String>,
}

impl JsonRecords {
    /// Wrap records; columns are every key in the order first encountered
    pub fn new(records: Vec<Value>) -> Result<Self> {
        let mut columns: Vec<String> = Vec::new();
        for (row, record) in records.iter().enumerate() {
            let object = record.as_object().ok_or_else(|| NodeGroupError::InvalidRecord {
                row,
                reason: format!("expected a JSON object, found {}", json_type(record)),
            })?;
            for key in object.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
        Ok(Self { records, columns })
    }

    /// Wrap records with an explicit column order
    pub fn with_columns(records: Vec<Value>, columns: Vec<String>) -> Result<Self> {
        let mut table = Self::new(records)?;
        table.columns = columns;
        Ok(table)
    }

    /// Parse a JSON array of objects
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        match value {
            Value::Array(records) => Self::new(records),
            other => Err(NodeGroupError::InvalidRecord {
                row: 0,
                reason: format!("expected a JSON array of records, found {}", json_type(&other)),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl IdentifierTable for JsonRecords {
    fn column_names(&self) -> Vec<String> {
        self.columns.clone()
    }

    fn column_cells(&self, column: &str) -> Result<Vec<Option<String>>> {
        if !self.columns.iter().any(|c| c == column) {
            return Err(NodeGroupError::ColumnNotFound(column.to_string()));
        }

        self.records
            .iter()
            .enumerate()
            .map(|(row, record)| match record.get(column) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::String(s)) => Ok(Some(s.clone())),
                Some(Value::Number(n)) => Ok(Some(n.to_string())),
                Some(Value::Bool(b)) => Ok(Some(b.to_string())),
                Some(nested) => Err(NodeGroupError::UnsupportedCell {
                    column: column.to_string(),
                    row,
                    kind: json_type(nested).to_string(),
                }),
            })
            .collect()
    }

    fn row_count(&self) -> usize {
        self.records.len()
    }
}

fn json_type(value: &Value) -> &'static str {
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
    use serde_json::json;

    #[test]
    fn test_cells_from_records() {
        let table = JsonRecords::new(vec![
            json!({"email": "a@b.com", "user_id": 7}),
            json!({"email": null, "active": true}),
            json!({"user_id": 9}),
        ])
        .unwrap();

        assert_eq!(table.len(), 3);
        let columns = table.column_names();
        assert_eq!(columns.len(), 3);
        assert!(columns.contains(&"active".to_string()));

        assert_eq!(
            table.column_cells("email").unwrap(),
            vec![Some("a@b.com".to_string()), None, None]
        );
        assert_eq!(
            table.column_cells("user_id").unwrap(),
            vec![Some("7".to_string()), None, Some("9".to_string())]
        );
        assert_eq!(
            table.column_cells("active").unwrap(),
            vec![None, Some("true".to_string()), None]
        );
    }

    #[test]
    fn test_rejects_non_objects() {
        let err = JsonRecords::new(vec![json!({"a": 1}), json!([1, 2])]).unwrap_err();
        assert!(matches!(err, NodeGroupError::InvalidRecord { row: 1, .. }));

        assert!(JsonRecords::from_json_str(r#"{"a": 1}"#).is_err());
    }

    #[test]
    fn test_nested_cell_is_error() {
        let table = JsonRecords::new(vec![json!({"tags": ["x"]})]).unwrap();
        assert!(matches!(
            table.column_cells("tags"),
            Err(NodeGroupError::UnsupportedCell { row: 0, ref kind, .. }) if kind == "array"
        ));
    }

    #[test]
    fn test_explicit_column_order() {
        let table = JsonRecords::with_columns(
            vec![json!({"b": "1", "a": "2"})],
            vec!["b".to_string(), "a".to_string()],
        )
        .unwrap();
        assert_eq!(table.column_names(), vec!["b", "a"]);
        assert!(matches!(
            table.column_cells("c"),
            Err(NodeGroupError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_from_json_str() {
        let table = JsonRecords::from_json_str(r#"[{"email": "a"}, {"email": "b"}]"#).unwrap();
        assert_eq!(table.row_count(), 2);
        assert!(!table.is_empty());
    }
}
