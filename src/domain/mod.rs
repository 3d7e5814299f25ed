//! Domain entities for datatable-tui.
//!
//! This module contains the table view-model:
//! - Column: schema entry for one displayed field
//! - Row / DraftEdit: records and pending changes to them
//! - Table: immutable snapshot with edit and sort operations
//! - Demo: the built-in sample tables

mod column;
mod row;
mod sample;
mod table;
mod value;

pub use column::{ButtonAction, Column, ColumnKind};
pub use row::{DraftEdit, Row, ID_FIELD};
pub use sample::{sample_rows, Demo};
pub use table::{
    apply_edits, merge_edits, sort_by, EditOutcome, EditPolicy, RowAction, SortDirection,
    SortKey, Table, UnknownIdPolicy,
};
pub use value::{CellValue, RowId};
