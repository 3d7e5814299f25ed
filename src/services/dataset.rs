//! Dataset loading from JSON files.
//!
//! Files use the same column vocabulary as the sample tables:
//!
//! ```json
//! {
//!   "title": "Contacts",
//!   "columns": [
//!     { "label": "Name", "fieldName": "name", "sortable": true },
//!     { "label": "Action", "type": "button",
//!       "typeAttributes": { "label": "View", "name": "view", "variant": "brand" } }
//!   ],
//!   "rows": [ { "id": 1, "name": "John Doe" } ]
//! }
//! ```

use crate::domain::{ButtonAction, Column, ColumnKind, Row, Table};
use crate::error::{DatasetError, DatasetResult};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Column type as written in dataset files
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ColumnType {
    #[default]
    Text,
    Button,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypeAttributes {
    label: String,
    name: String,
    #[serde(default)]
    variant: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColumnDef {
    label: String,
    #[serde(default)]
    field_name: Option<String>,
    #[serde(rename = "type", default)]
    column_type: ColumnType,
    #[serde(default)]
    type_attributes: Option<TypeAttributes>,
    #[serde(default)]
    editable: bool,
    #[serde(default)]
    sortable: bool,
}

impl ColumnDef {
    fn into_column(self) -> DatasetResult<Column> {
        let kind = match (self.column_type, self.type_attributes) {
            (ColumnType::Text, _) => ColumnKind::Text,
            (ColumnType::Button, Some(attrs)) => ColumnKind::Button(ButtonAction {
                label: attrs.label,
                name: attrs.name,
                variant: attrs.variant,
            }),
            (ColumnType::Button, None) => {
                return Err(DatasetError::InvalidColumn {
                    label: self.label,
                    reason: "button columns need typeAttributes".to_string(),
                })
            }
        };

        let field_name = match (self.field_name, &kind) {
            (Some(field), _) => field,
            (None, ColumnKind::Button(action)) => action.name.clone(),
            (None, ColumnKind::Text) => {
                return Err(DatasetError::InvalidColumn {
                    label: self.label,
                    reason: "text columns need a fieldName".to_string(),
                })
            }
        };

        Ok(Column {
            label: self.label,
            field_name,
            kind,
            editable: self.editable,
            sortable: self.sortable,
        })
    }
}

#[derive(Debug, Deserialize)]
struct DatasetFile {
    #[serde(default)]
    title: Option<String>,
    columns: Vec<ColumnDef>,
    #[serde(default)]
    rows: Vec<Row>,
}

/// A table loaded from disk
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Display name (file title, or the file stem)
    pub title: String,
    /// Where the dataset came from
    pub path: PathBuf,
    pub table: Table,
}

/// Parse dataset JSON into a title and table
pub fn parse_dataset(json: &str) -> DatasetResult<(Option<String>, Table)> {
    let file: DatasetFile = serde_json::from_str(json)?;
    let columns = file
        .columns
        .into_iter()
        .map(ColumnDef::into_column)
        .collect::<DatasetResult<Vec<_>>>()?;
    let table = Table::new(columns, file.rows)?;
    Ok((file.title, table))
}

/// Load a dataset file
pub fn load_dataset(path: &Path) -> DatasetResult<Dataset> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }

    let json = fs::read_to_string(path)?;
    let (title, table) = parse_dataset(&json)?;
    let title = title.unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Dataset".to_string())
    });

    tracing::info!(
        "Loaded dataset {:?}: {} columns, {} rows",
        path,
        table.columns().len(),
        table.len()
    );

    Ok(Dataset {
        title,
        path: path.to_path_buf(),
        table,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CellValue, RowId};
    use crate::error::TableError;
    use tempfile::TempDir;

    const CONTACTS: &str = r#"{
        "columns": [
            { "label": "Name", "fieldName": "name", "sortable": true },
            { "label": "Email", "fieldName": "email", "editable": true },
            {
                "label": "Action",
                "type": "button",
                "typeAttributes": { "label": "View", "name": "view", "variant": "brand" }
            }
        ],
        "rows": [
            { "id": 1, "name": "John Doe", "email": "john.doe@example.com" },
            { "id": "b-2", "name": "Jane Smith", "email": null }
        ]
    }"#;

    #[test]
    fn test_parse_original_column_vocabulary() {
        let (title, table) = parse_dataset(CONTACTS).unwrap();
        assert!(title.is_none());

        let columns = table.columns();
        assert_eq!(columns.len(), 3);
        assert!(columns[0].sortable);
        assert!(columns[1].editable);
        assert_eq!(columns[2].field_name, "view");
        assert_eq!(
            columns[2].action().and_then(|a| a.variant.as_deref()),
            Some("brand")
        );

        assert_eq!(table.rows()[1].id, RowId::from("b-2"));
        assert_eq!(table.rows()[1].get("email"), Some(&CellValue::Null));
    }

    #[test]
    fn test_button_without_attributes_is_invalid() {
        let json = r#"{ "columns": [ { "label": "Go", "type": "button" } ] }"#;
        let err = parse_dataset(json).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidColumn { ref label, .. } if label == "Go"));
    }

    #[test]
    fn test_text_column_needs_field_name() {
        let json = r#"{ "columns": [ { "label": "Name" } ] }"#;
        assert!(matches!(
            parse_dataset(json),
            Err(DatasetError::InvalidColumn { .. })
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"{
            "columns": [ { "label": "Name", "fieldName": "name" } ],
            "rows": [ { "id": 1 }, { "id": 1 } ]
        }"#;
        assert!(matches!(
            parse_dataset(json),
            Err(DatasetError::Table(TableError::DuplicateRowId(RowId::Int(1))))
        ));
    }

    #[test]
    fn test_load_dataset_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("contacts.json");
        fs::write(&path, CONTACTS).unwrap();

        let dataset = load_dataset(&path).unwrap();
        assert_eq!(dataset.title, "contacts");
        assert_eq!(dataset.table.len(), 2);
        assert_eq!(dataset.path, path);
    }

    #[test]
    fn test_load_missing_dataset() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.json");
        assert!(matches!(load_dataset(&path), Err(DatasetError::NotFound(_))));
    }
}
