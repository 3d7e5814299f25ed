//! Built-in sample tables.

use super::{ButtonAction, Column, Row, Table};
use crate::error::TableResult;
use serde::{Deserialize, Serialize};

/// The four sample table configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Demo {
    /// Read-only display
    Basic,
    /// A "View" button column
    CustomCells,
    /// Every column editable
    InlineEdit,
    /// Every column sortable
    Sortable,
}

impl Demo {
    pub const ALL: [Demo; 4] = [
        Demo::Basic,
        Demo::CustomCells,
        Demo::InlineEdit,
        Demo::Sortable,
    ];

    /// Display name for UI
    pub fn title(&self) -> &'static str {
        match self {
            Self::Basic => "Basic Table",
            Self::CustomCells => "Custom Cell Rendering",
            Self::InlineEdit => "Inline Editing",
            Self::Sortable => "Sortable Columns",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Basic => "Plain text columns",
            Self::CustomCells => "Action button per row",
            Self::InlineEdit => "Edit cells, then save or cancel the drafts",
            Self::Sortable => "Sort by any column, either direction",
        }
    }

    /// Column schema for this demo
    pub fn columns(&self) -> Vec<Column> {
        let base = [("Name", "name"), ("Email", "email"), ("Phone", "phone")];
        let mut columns: Vec<Column> = base
            .iter()
            .map(|(label, field)| {
                let column = Column::text(*label, *field);
                match self {
                    Self::InlineEdit => column.editable(),
                    Self::Sortable => column.sortable(),
                    Self::Basic | Self::CustomCells => column,
                }
            })
            .collect();

        if *self == Self::CustomCells {
            columns.push(Column::button(
                "Action",
                ButtonAction::new("View", "view").variant("brand"),
            ));
        }

        columns
    }

    /// Build a fresh table for this demo
    pub fn table(&self) -> TableResult<Table> {
        Table::new(self.columns(), sample_rows())
    }
}

impl std::fmt::Display for Demo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// The contact records every demo starts from
pub fn sample_rows() -> Vec<Row> {
    vec![
        Row::new(1)
            .with("name", "John Doe")
            .with("email", "john.doe@example.com")
            .with("phone", "555-1234"),
        Row::new(2)
            .with("name", "Jane Smith")
            .with("email", "jane.smith@example.com")
            .with("phone", "555-5678"),
        Row::new(3)
            .with("name", "Bob Johnson")
            .with("email", "bob.johnson@example.com")
            .with("phone", "555-9012"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_demo_builds() {
        for demo in Demo::ALL {
            let table = demo.table().unwrap();
            assert_eq!(table.len(), 3);
            assert_eq!(table.revision(), 0);
        }
    }

    #[test]
    fn test_demo_capabilities() {
        let basic = Demo::Basic.table().unwrap();
        assert!(!basic.has_editable_columns());
        assert!(!basic.has_sortable_columns());

        assert!(Demo::InlineEdit.table().unwrap().has_editable_columns());
        assert!(Demo::Sortable.table().unwrap().has_sortable_columns());

        let custom = Demo::CustomCells.table().unwrap();
        assert_eq!(custom.columns().len(), 4);
        assert!(custom.columns()[3].is_button());
    }
}
