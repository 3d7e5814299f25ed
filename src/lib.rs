//! datatable-tui: a generic tabular view-model with a terminal host
//!
//! The [`domain`] module holds the pure table model: column schema, rows,
//! draft edits, merge and stable sort. [`services::TableStore`] owns the
//! current snapshot and notifies subscribers when it changes. The [`ui`] and
//! [`app`] modules drive it from the keyboard.

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod ui;

pub use app::App;
pub use config::AppConfig;
pub use error::{AppError, Result};
