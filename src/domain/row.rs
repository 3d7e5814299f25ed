//! Rows and draft edits.

use super::{CellValue, RowId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the identity field in serialized rows
pub const ID_FIELD: &str = "id";

/// One record of data, keyed by a stable unique id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    #[serde(flatten)]
    pub fields: BTreeMap<String, CellValue>,
}

impl Row {
    pub fn new(id: impl Into<RowId>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter
    pub fn with(mut self, field: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Value of a field, if present
    pub fn get(&self, field: &str) -> Option<&CellValue> {
        self.fields.get(field)
    }

    /// Copy of this row with `changes` laid over its fields.
    /// The id never changes, even if `changes` carries an "id" entry.
    pub fn overlaid(&self, changes: &BTreeMap<String, CellValue>) -> Self {
        let mut row = self.clone();
        for (field, value) in changes {
            if field == ID_FIELD {
                continue;
            }
            row.fields.insert(field.clone(), value.clone());
        }
        row
    }
}

/// A pending set of field changes for one row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftEdit {
    pub id: RowId,
    #[serde(flatten)]
    pub fields: BTreeMap<String, CellValue>,
}

impl DraftEdit {
    pub fn new(id: impl Into<RowId>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter
    pub fn with(mut self, field: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<CellValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&CellValue> {
        self.fields.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_keeps_untouched_fields() {
        let row = Row::new(2)
            .with("name", "Jane Smith")
            .with("email", "jane.smith@example.com");
        let draft = DraftEdit::new(2).with("email", "jane.new@example.com");

        let updated = row.overlaid(&draft.fields);
        assert_eq!(updated.get("name"), Some(&CellValue::from("Jane Smith")));
        assert_eq!(
            updated.get("email"),
            Some(&CellValue::from("jane.new@example.com"))
        );
        // Source row untouched
        assert_eq!(
            row.get("email"),
            Some(&CellValue::from("jane.smith@example.com"))
        );
    }

    #[test]
    fn test_overlay_never_changes_id() {
        let row = Row::new(1).with("name", "John Doe");
        let draft = DraftEdit::new(1).with(ID_FIELD, 42i64);
        let updated = row.overlaid(&draft.fields);
        assert_eq!(updated.id, RowId::Int(1));
        assert!(updated.get(ID_FIELD).is_none());
    }

    #[test]
    fn test_row_json_shape() {
        let row: Row = serde_json::from_str(
            r#"{ "id": 1, "name": "John Doe", "phone": "555-1234" }"#,
        )
        .unwrap();
        assert_eq!(row.id, RowId::Int(1));
        assert_eq!(row.fields.len(), 2);
        assert_eq!(row.get("phone"), Some(&CellValue::from("555-1234")));
    }
}
