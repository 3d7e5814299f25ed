//! Table view-model: the column schema plus an immutable row snapshot.
//!
//! The two row operations are free functions so hosts can use them without
//! a [`Table`]:
//! - [`apply_edits`]: overlay draft edits onto rows by id
//! - [`sort_by`]: stable single-column sort
//!
//! [`Table`] wraps them with the checks a host applies before accepting a
//! request (sortable/editable columns, unknown ids) and stamps each result
//! with a new revision.

use super::{CellValue, Column, DraftEdit, Row, RowId};
use crate::error::{TableError, TableResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Header arrow for UI
    pub fn indicator(&self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ascending => write!(f, "ascending"),
            Self::Descending => write!(f, "descending"),
        }
    }
}

/// The column and direction a table is currently sorted by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field_name: String,
    pub direction: SortDirection,
}

/// Overlay `drafts` onto `rows` by id.
///
/// Rows keep their order and ids. Several drafts for the same id are laid
/// over in input order, so later drafts win on the fields they share.
/// Drafts whose id matches no row are dropped.
pub fn apply_edits(rows: &[Row], drafts: &[DraftEdit]) -> Vec<Row> {
    merge_edits(rows, drafts).0
}

/// Same as [`apply_edits`], also returning the ids of drafts that matched
/// no row (deduplicated, in first-seen order).
pub fn merge_edits(rows: &[Row], drafts: &[DraftEdit]) -> (Vec<Row>, Vec<RowId>) {
    let known: HashSet<&RowId> = rows.iter().map(|row| &row.id).collect();

    let mut merged: HashMap<&RowId, BTreeMap<String, CellValue>> = HashMap::new();
    let mut ignored = Vec::new();
    for draft in drafts {
        if !known.contains(&draft.id) {
            if !ignored.contains(&draft.id) {
                ignored.push(draft.id.clone());
            }
            continue;
        }
        let fields = merged.entry(&draft.id).or_default();
        for (field, value) in &draft.fields {
            fields.insert(field.clone(), value.clone());
        }
    }

    let rows = rows
        .iter()
        .map(|row| match merged.get(&row.id) {
            Some(changes) => row.overlaid(changes),
            None => row.clone(),
        })
        .collect();

    (rows, ignored)
}

/// Compare two rows on one field. Missing fields sort first.
fn compare_field(a: &Row, b: &Row, field_name: &str) -> Ordering {
    match (a.get(field_name), b.get(field_name)) {
        (Some(x), Some(y)) => x.compare(y),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort of `rows` on `field_name`, returned as a new sequence.
pub fn sort_by(rows: &[Row], field_name: &str, direction: SortDirection) -> Vec<Row> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        let ord = compare_field(a, b, field_name);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    sorted
}

/// What to do with drafts that reference rows the table does not have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownIdPolicy {
    /// Drop them and report the ids
    #[default]
    Ignore,
    /// Refuse the whole submission
    Reject,
}

/// Host-side checks applied before edits are merged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditPolicy {
    pub unknown_ids: UnknownIdPolicy,
    /// Only fields of editable columns may be changed
    pub require_editable: bool,
}

impl Default for EditPolicy {
    fn default() -> Self {
        Self {
            unknown_ids: UnknownIdPolicy::Ignore,
            require_editable: true,
        }
    }
}

/// Result of merging edits into a table
#[derive(Debug, Clone)]
pub struct EditOutcome {
    pub table: Table,
    /// Ids of drafts that matched no row
    pub ignored: Vec<RowId>,
}

/// A button press resolved against a table snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowAction {
    pub action_name: String,
    pub action_label: String,
    pub row_id: RowId,
}

/// Immutable `(columns, rows)` snapshot.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Arc<[Column]>,
    rows: Vec<Row>,
    sort: Option<SortKey>,
    revision: u64,
}

impl Table {
    /// Build the first revision of a table. Row ids must be unique.
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> TableResult<Self> {
        let mut seen = HashSet::new();
        for row in &rows {
            if !seen.insert(&row.id) {
                return Err(TableError::DuplicateRowId(row.id.clone()));
            }
        }

        let mut fields = HashSet::new();
        for column in &columns {
            if !fields.insert(column.field_name.as_str()) {
                tracing::warn!("Duplicate column field name: {}", column.field_name);
            }
        }

        Ok(Self {
            columns: columns.into(),
            rows,
            sort: None,
            revision: 0,
        })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn sort(&self) -> Option<&SortKey> {
        self.sort.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, field_name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.field_name == field_name)
    }

    pub fn row(&self, id: &RowId) -> Option<&Row> {
        self.rows.iter().find(|r| &r.id == id)
    }

    pub fn has_editable_columns(&self) -> bool {
        self.columns.iter().any(Column::accepts_edits)
    }

    pub fn has_sortable_columns(&self) -> bool {
        self.columns.iter().any(|c| c.sortable)
    }

    /// Next revision sharing this table's columns
    fn next(&self, rows: Vec<Row>, sort: Option<SortKey>) -> Self {
        Self {
            columns: Arc::clone(&self.columns),
            rows,
            sort,
            revision: self.revision + 1,
        }
    }

    /// Merge drafts into a new revision, subject to `policy`.
    pub fn with_edits(&self, drafts: &[DraftEdit], policy: &EditPolicy) -> TableResult<EditOutcome> {
        if policy.require_editable {
            for draft in drafts {
                for field in draft.fields.keys() {
                    match self.column(field) {
                        Some(column) if column.accepts_edits() => {}
                        _ => return Err(TableError::NotEditable(field.clone())),
                    }
                }
            }
        }

        let (rows, ignored) = merge_edits(&self.rows, drafts);
        if !ignored.is_empty() && policy.unknown_ids == UnknownIdPolicy::Reject {
            return Err(TableError::UnknownRowIds(ignored));
        }

        Ok(EditOutcome {
            table: self.next(rows, self.sort.clone()),
            ignored,
        })
    }

    /// Sort into a new revision. Only declared sortable columns are accepted.
    pub fn sorted_by(&self, field_name: &str, direction: SortDirection) -> TableResult<Self> {
        let column = self
            .column(field_name)
            .ok_or_else(|| TableError::UnknownColumn(field_name.to_string()))?;
        if !column.sortable {
            return Err(TableError::NotSortable(field_name.to_string()));
        }

        let rows = sort_by(&self.rows, field_name, direction);
        Ok(self.next(
            rows,
            Some(SortKey {
                field_name: field_name.to_string(),
                direction,
            }),
        ))
    }

    /// Direction a header click on `field_name` should request: flips the
    /// current direction when already sorted by it, ascending otherwise.
    pub fn next_direction(&self, field_name: &str) -> SortDirection {
        match &self.sort {
            Some(key) if key.field_name == field_name => key.direction.toggled(),
            _ => SortDirection::Ascending,
        }
    }

    /// Resolve a press on the button in `column_index` for row `row_id`.
    pub fn action(&self, column_index: usize, row_id: &RowId) -> TableResult<RowAction> {
        let column = self
            .columns
            .get(column_index)
            .ok_or_else(|| TableError::UnknownColumn(format!("#{}", column_index)))?;
        let action = column
            .action()
            .ok_or_else(|| TableError::NotAnAction(column.label.clone()))?;
        if self.row(row_id).is_none() {
            return Err(TableError::RowNotFound(row_id.clone()));
        }

        Ok(RowAction {
            action_name: action.name.clone(),
            action_label: action.label.clone(),
            row_id: row_id.clone(),
        })
    }
}
