//! Reusable UI widgets for datatable-tui.

pub mod data_table;
pub mod gallery;
pub mod help;
pub mod text_input;
