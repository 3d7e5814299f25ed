//! State container for the current table snapshot.
//!
//! The store is the only owner that replaces the snapshot. Each accepted
//! request swaps in the new `Arc<Table>` and pushes a [`TableEvent`] to every
//! subscriber, which is what drives a re-render on the host side.

use crate::domain::{DraftEdit, EditPolicy, RowAction, RowId, SortDirection, SortKey, Table};
use crate::error::TableResult;
use std::sync::Arc;
use tokio::sync::mpsc;

/// What changed in a new revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Drafts were merged; `rows` is how many rows they touched
    Edited { rows: usize },
    /// Rows were re-sorted
    Sorted(SortKey),
}

/// Notification pushed to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    /// A new snapshot replaced the previous one
    Updated { revision: u64, change: Change },
    /// Drafts for these ids matched no row and were dropped
    EditsIgnored(Vec<RowId>),
    /// A button was pressed
    Action(RowAction),
}

/// Owner of the current snapshot
pub struct TableStore {
    current: Arc<Table>,
    policy: EditPolicy,
    subscribers: Vec<mpsc::UnboundedSender<TableEvent>>,
}

impl TableStore {
    /// Create a store holding `table`
    pub fn new(table: Table, policy: EditPolicy) -> Self {
        Self {
            current: Arc::new(table),
            policy,
            subscribers: Vec::new(),
        }
    }

    /// Current snapshot. Holders keep a consistent view even after later updates.
    pub fn snapshot(&self) -> Arc<Table> {
        Arc::clone(&self.current)
    }

    pub fn policy(&self) -> &EditPolicy {
        &self.policy
    }

    /// Register for change notifications
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<TableEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Merge drafts into the current snapshot
    pub fn submit_edits(&mut self, drafts: &[DraftEdit]) -> TableResult<Arc<Table>> {
        let outcome = self.current.with_edits(drafts, &self.policy)?;

        if !outcome.ignored.is_empty() {
            tracing::warn!("Ignored drafts for unknown rows: {:?}", outcome.ignored);
            self.publish(TableEvent::EditsIgnored(outcome.ignored));
        }

        let touched = drafts
            .iter()
            .filter(|d| outcome.table.row(&d.id).is_some())
            .map(|d| &d.id)
            .collect::<std::collections::HashSet<_>>()
            .len();
        Ok(self.replace(outcome.table, Change::Edited { rows: touched }))
    }

    /// Re-sort the current snapshot
    pub fn request_sort(
        &mut self,
        field_name: &str,
        direction: SortDirection,
    ) -> TableResult<Arc<Table>> {
        let table = self.current.sorted_by(field_name, direction)?;
        let key = SortKey {
            field_name: field_name.to_string(),
            direction,
        };
        Ok(self.replace(table, Change::Sorted(key)))
    }

    /// Report a button press on `row_id` in `column_index`
    pub fn fire_action(&mut self, column_index: usize, row_id: &RowId) -> TableResult<RowAction> {
        let action = self.current.action(column_index, row_id)?;
        tracing::debug!("Action '{}' on row {}", action.action_name, action.row_id);
        self.publish(TableEvent::Action(action.clone()));
        Ok(action)
    }

    fn replace(&mut self, table: Table, change: Change) -> Arc<Table> {
        let revision = table.revision();
        self.current = Arc::new(table);
        tracing::debug!("Table revision {} ({:?})", revision, change);
        self.publish(TableEvent::Updated { revision, change });
        self.snapshot()
    }

    fn publish(&mut self, event: TableEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CellValue, Demo, UnknownIdPolicy};
    use crate::error::TableError;

    fn store(demo: Demo) -> TableStore {
        TableStore::new(demo.table().unwrap(), EditPolicy::default())
    }

    #[test]
    fn test_sort_publishes_update() {
        let mut store = store(Demo::Sortable);
        let mut rx = store.subscribe();

        let before = store.snapshot();
        let after = store.request_sort("name", SortDirection::Ascending).unwrap();

        assert_eq!(after.revision(), 1);
        assert_eq!(after.rows()[0].id, RowId::Int(3));
        // Old snapshot is untouched
        assert_eq!(before.rows()[0].id, RowId::Int(1));

        let event = tokio_test::block_on(rx.recv()).unwrap();
        assert_eq!(
            event,
            TableEvent::Updated {
                revision: 1,
                change: Change::Sorted(SortKey {
                    field_name: "name".to_string(),
                    direction: SortDirection::Ascending,
                }),
            }
        );
    }

    #[test]
    fn test_failed_request_publishes_nothing() {
        let mut store = store(Demo::Basic);
        let mut rx = store.subscribe();

        let err = store
            .request_sort("name", SortDirection::Ascending)
            .unwrap_err();
        assert_eq!(err, TableError::NotSortable("name".to_string()));
        assert_eq!(store.snapshot().revision(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_edits_report_ignored_ids() {
        let mut store = store(Demo::InlineEdit);
        let mut rx = store.subscribe();

        let drafts = vec![
            DraftEdit::new(2).with("email", "jane.new@example.com"),
            DraftEdit::new(99).with("email", "ghost@example.com"),
        ];
        let table = store.submit_edits(&drafts).unwrap();
        assert_eq!(
            table.rows()[1].get("email"),
            Some(&CellValue::from("jane.new@example.com"))
        );

        assert_eq!(
            rx.try_recv().unwrap(),
            TableEvent::EditsIgnored(vec![RowId::Int(99)])
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            TableEvent::Updated {
                revision: 1,
                change: Change::Edited { rows: 1 },
            }
        );
    }

    #[test]
    fn test_strict_policy_rejects_unknown_ids() {
        let policy = EditPolicy {
            unknown_ids: UnknownIdPolicy::Reject,
            ..EditPolicy::default()
        };
        let mut store = TableStore::new(Demo::InlineEdit.table().unwrap(), policy);
        let drafts = vec![DraftEdit::new(99).with("email", "ghost@example.com")];

        assert!(store.submit_edits(&drafts).is_err());
        assert_eq!(store.snapshot().revision(), 0);
    }

    #[test]
    fn test_action_event() {
        let mut store = store(Demo::CustomCells);
        let mut rx = store.subscribe();

        let action = store.fire_action(3, &RowId::Int(1)).unwrap();
        assert_eq!(action.action_name, "view");
        assert_eq!(rx.try_recv().unwrap(), TableEvent::Action(action));
        // Actions never create a revision
        assert_eq!(store.snapshot().revision(), 0);
    }

    #[test]
    fn test_closed_subscribers_are_dropped() {
        let mut store = store(Demo::Sortable);
        let rx = store.subscribe();
        let mut live = store.subscribe();
        drop(rx);

        store
            .request_sort("phone", SortDirection::Descending)
            .unwrap();
        assert_eq!(store.subscribers.len(), 1);
        assert!(live.try_recv().is_ok());
    }
}
