//! Infrastructure services for datatable-tui.
//!
//! This module contains:
//! - TableStore: snapshot owner that notifies subscribers of changes
//! - dataset: JSON dataset loading

pub mod dataset;
mod store;

pub use dataset::{load_dataset, Dataset};
pub use store::{Change, TableEvent, TableStore};
