//! Application state and main event loop.

use crate::config::AppConfig;
use crate::domain::{Demo, RowId, Table};
use crate::error::{AppError, Result};
use crate::services::{load_dataset, Change, Dataset, TableEvent, TableStore};
use crate::ui::input::{Action, InputHandler, InputMode};
use crate::ui::widgets::data_table::DataTableState;
use crate::ui::widgets::help::HelpViewState;
use crate::ui::widgets::text_input::TextInputAction;
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use ratatui::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Action name that opens the row detail popup
pub const VIEW_ACTION: &str = "view";

/// Application view state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppView {
    /// List of tables to open
    #[default]
    Gallery,
    /// An open table
    Table,
    /// Help view showing keybindings
    Help,
}

/// Where a gallery entry came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOrigin {
    Sample(Demo),
    Dataset(PathBuf),
}

/// A table that can be opened from the gallery
#[derive(Debug, Clone)]
pub struct TableSource {
    pub title: String,
    pub description: String,
    pub origin: SourceOrigin,
    /// First revision, copied into a store on open
    pub table: Table,
}

impl TableSource {
    /// Gallery entry for a built-in sample
    pub fn sample(demo: Demo) -> crate::error::TableResult<Self> {
        Ok(Self {
            title: demo.title().to_string(),
            description: demo.description().to_string(),
            origin: SourceOrigin::Sample(demo),
            table: demo.table()?,
        })
    }

    /// Gallery entry for a loaded dataset
    pub fn dataset(dataset: Dataset) -> Self {
        Self {
            title: dataset.title,
            description: dataset.path.display().to_string(),
            origin: SourceOrigin::Dataset(dataset.path),
            table: dataset.table,
        }
    }
}

/// A table opened in the table view
pub struct OpenTable {
    pub title: String,
    /// Owner of the snapshot; requests go through here
    pub store: TableStore,
    /// Change notifications from the store
    events: mpsc::UnboundedReceiver<TableEvent>,
    /// Snapshot currently rendered, replaced when the store notifies
    pub snapshot: Arc<Table>,
    /// Cursor, drafts and editor
    pub state: DataTableState,
    /// Row shown in the detail popup
    pub detail_row: Option<RowId>,
}

impl OpenTable {
    fn new(source: &TableSource, config: &AppConfig) -> Self {
        let mut store = TableStore::new(source.table.clone(), config.table.edit_policy());
        let events = store.subscribe();
        let snapshot = store.snapshot();
        Self {
            title: source.title.clone(),
            store,
            events,
            snapshot,
            state: DataTableState::new(),
            detail_row: None,
        }
    }

    /// Label of the column under the cursor
    fn focused_column_label(&self) -> Option<&str> {
        self.snapshot
            .columns()
            .get(self.state.selected_column)
            .map(|c| c.label.as_str())
    }
}

/// Main application state
pub struct App {
    /// Loaded configuration
    pub config: AppConfig,
    /// Tables listed in the gallery
    pub sources: Vec<TableSource>,
    /// Selected gallery index
    pub selected_source_index: usize,
    /// Table open in the table view
    pub open_table: Option<OpenTable>,

    // UI State
    /// Current view
    pub view: AppView,
    /// View to return to when help closes
    previous_view: AppView,
    /// Current input mode
    pub input_mode: InputMode,
    /// Error message to display
    pub error_message: Option<String>,
    /// Non-blocking status message
    pub status_message: Option<String>,
    /// State for help view (scroll position)
    pub help_view_state: HelpViewState,

    // Input handler
    input_handler: InputHandler,

    /// Should quit the application
    pub should_quit: bool,
}

impl App {
    /// Create a new application instance.
    ///
    /// `dataset` overrides the configured dataset path. A dataset that fails
    /// to load is reported in the UI rather than aborting startup.
    pub fn new(config: AppConfig, dataset: Option<PathBuf>) -> Result<Self> {
        let mut sources = Demo::ALL
            .iter()
            .map(|demo| TableSource::sample(*demo))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut error_message = None;
        if let Some(path) = dataset.or_else(|| config.table.dataset.clone()) {
            match load_dataset(&path) {
                Ok(dataset) => sources.push(TableSource::dataset(dataset)),
                Err(e) => {
                    tracing::warn!("Failed to load dataset {:?}: {}", path, e);
                    error_message = Some(format!("Failed to load dataset: {}", e));
                }
            }
        }

        let input_handler = InputHandler::new(config.ui.vim_navigation);

        Ok(Self {
            config,
            sources,
            selected_source_index: 0,
            open_table: None,
            view: AppView::Gallery,
            previous_view: AppView::Gallery,
            input_mode: InputMode::Normal,
            error_message,
            status_message: None,
            help_view_state: HelpViewState::new(),
            input_handler,
            should_quit: false,
        })
    }

    /// Get the currently selected gallery entry
    pub fn selected_source(&self) -> Option<&TableSource> {
        self.sources.get(self.selected_source_index)
    }

    /// Open the gallery entry at `index`
    pub fn open_source(&mut self, index: usize) {
        let Some(source) = self.sources.get(index) else {
            return;
        };
        tracing::info!("Opening table '{}'", source.title);
        self.selected_source_index = index;
        self.open_table = Some(OpenTable::new(source, &self.config));
        self.input_mode = InputMode::Normal;
        self.view = AppView::Table;
    }

    /// Open a built-in sample directly
    pub fn open_demo(&mut self, demo: Demo) {
        if let Some(index) = self
            .sources
            .iter()
            .position(|s| s.origin == SourceOrigin::Sample(demo))
        {
            self.open_source(index);
        }
    }

    /// Close the open table and return to the gallery
    pub fn close_table(&mut self) {
        if let Some(open) = self.open_table.take() {
            if open.state.has_drafts() {
                self.status_message = Some(format!(
                    "Discarded {} unsaved draft(s)",
                    open.state.drafts().len()
                ));
            }
        }
        self.input_mode = InputMode::Normal;
        self.view = AppView::Gallery;
    }

    /// Open help view
    pub fn open_help(&mut self) {
        self.previous_view = self.view;
        self.help_view_state = HelpViewState::new();
        self.view = AppView::Help;
    }

    /// Close help view
    pub fn close_help(&mut self) {
        self.view = self.previous_view;
    }

    /// Press the button, or open the editor, under the cursor
    pub fn activate_cell(&mut self) {
        let Some(open) = self.open_table.as_mut() else {
            return;
        };
        let column_index = open.state.selected_column;
        let Some(column) = open.snapshot.columns().get(column_index) else {
            return;
        };
        let Some(row_id) = open.state.selected(&open.snapshot).map(|r| r.id.clone()) else {
            return;
        };

        if column.is_button() {
            if let Err(e) = open.store.fire_action(column_index, &row_id) {
                self.error_message = Some(e.to_string());
            }
        } else if column.accepts_edits() {
            self.begin_edit();
        }
    }

    /// Open the cell editor on the focused cell
    pub fn begin_edit(&mut self) {
        let Some(open) = self.open_table.as_mut() else {
            return;
        };
        let snapshot = Arc::clone(&open.snapshot);
        if open.state.begin_edit(&snapshot) {
            self.input_mode = InputMode::Insert;
        } else {
            let label = open.focused_column_label().unwrap_or("This column");
            self.status_message = Some(format!("{} is read-only", label));
        }
    }

    /// Sort by the focused column, flipping direction on repeat
    pub fn sort_focused_column(&mut self) {
        let Some(open) = self.open_table.as_mut() else {
            return;
        };
        let Some(column) = open.snapshot.columns().get(open.state.selected_column) else {
            return;
        };
        let field_name = column.field_name.clone();
        let direction = open.snapshot.next_direction(&field_name);

        if let Err(e) = open.store.request_sort(&field_name, direction) {
            self.error_message = Some(e.to_string());
        }
    }

    /// Submit pending drafts to the store
    pub fn save_drafts(&mut self) {
        let Some(open) = self.open_table.as_mut() else {
            return;
        };
        if !open.state.has_drafts() {
            self.status_message = Some("No pending drafts".to_string());
            return;
        }

        match open.store.submit_edits(open.state.drafts()) {
            Ok(_) => open.state.discard_drafts(),
            Err(e) => self.error_message = Some(format!("Save failed: {}", e)),
        }
    }

    /// Drop pending drafts
    pub fn discard_drafts(&mut self) {
        if let Some(open) = self.open_table.as_mut() {
            if open.state.has_drafts() {
                open.state.discard_drafts();
                self.status_message = Some("Drafts discarded".to_string());
            }
        }
    }

    /// Drain store notifications (call this in the event loop)
    pub fn poll_table_events(&mut self) {
        let Some(open) = self.open_table.as_mut() else {
            return;
        };

        while let Ok(event) = open.events.try_recv() {
            match event {
                TableEvent::Updated { revision, change } => {
                    let selected_id = open.state.selected(&open.snapshot).map(|r| r.id.clone());
                    open.snapshot = open.store.snapshot();
                    tracing::debug!("Rendering revision {}", revision);

                    // Keep the cursor on the same record across re-sorts
                    if let Some(idx) = selected_id
                        .and_then(|id| open.snapshot.rows().iter().position(|r| r.id == id))
                    {
                        open.state.selected_row = idx;
                    }
                    open.state
                        .clamp(open.snapshot.len(), open.snapshot.columns().len());

                    self.status_message = Some(match change {
                        Change::Sorted(key) => {
                            let label = open
                                .snapshot
                                .column(&key.field_name)
                                .map(|c| c.label.clone())
                                .unwrap_or(key.field_name);
                            format!("Sorted by {} ({})", label, key.direction)
                        }
                        Change::Edited { rows } => format!("Saved changes to {} row(s)", rows),
                    });
                }
                TableEvent::EditsIgnored(ids) => {
                    let ids = ids.iter().map(|id| id.to_string()).collect::<Vec<_>>();
                    self.error_message =
                        Some(format!("Ignored drafts for unknown rows: {}", ids.join(", ")));
                }
                TableEvent::Action(action) => {
                    if action.action_name == VIEW_ACTION {
                        open.detail_row = Some(action.row_id);
                    } else {
                        self.status_message = Some(format!(
                            "{} pressed on row {}",
                            action.action_label, action.row_id
                        ));
                    }
                }
            }
        }
    }

    /// Move selection up
    pub fn select_previous(&mut self) {
        if self.selected_source_index > 0 {
            self.selected_source_index -= 1;
        }
    }

    /// Move selection down
    pub fn select_next(&mut self) {
        if self.selected_source_index < self.sources.len().saturating_sub(1) {
            self.selected_source_index += 1;
        }
    }

    /// Handle keyboard input and return true if should quit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Clear messages on any key press
        self.error_message = None;
        self.status_message = None;

        let quit = match self.view {
            AppView::Gallery => self.handle_gallery_key(key),
            AppView::Table => self.handle_table_key(key),
            AppView::Help => self.handle_help_key(key),
        };

        // Surface store notifications triggered by this key right away
        self.poll_table_events();
        quit
    }

    /// Handle keys in the gallery
    fn handle_gallery_key(&mut self, key: KeyEvent) -> bool {
        if let Some(action) = self.input_handler.handle_key(key, InputMode::Normal) {
            match action {
                Action::MoveUp => self.select_previous(),
                Action::MoveDown => self.select_next(),
                Action::Home => self.selected_source_index = 0,
                Action::End => self.selected_source_index = self.sources.len().saturating_sub(1),
                Action::Select => self.open_source(self.selected_source_index),
                Action::Help => self.open_help(),
                Action::Back | Action::Quit => return true,
                _ => {}
            }
        }
        false
    }

    /// Handle keys in the table view
    fn handle_table_key(&mut self, key: KeyEvent) -> bool {
        let Some(open) = self.open_table.as_mut() else {
            self.view = AppView::Gallery;
            return false;
        };

        // Row detail popup swallows everything but close
        if open.detail_row.is_some() {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char(' ')
            ) {
                open.detail_row = None;
            }
            return false;
        }

        // Cell editor
        if open.state.editor.is_some() {
            if let Some(Action::Back) = self.input_handler.handle_key(key, InputMode::Insert) {
                open.state.cancel_edit();
                self.input_mode = InputMode::Normal;
                return false;
            }
            let action = match open.state.editor.as_mut() {
                Some(editor) => editor.input.handle_key(key),
                None => TextInputAction::None,
            };
            match action {
                TextInputAction::Submit => {
                    let snapshot = Arc::clone(&open.snapshot);
                    open.state.commit_edit(&snapshot);
                    self.input_mode = InputMode::Normal;
                }
                TextInputAction::Cancel => {
                    open.state.cancel_edit();
                    self.input_mode = InputMode::Normal;
                }
                TextInputAction::Changed | TextInputAction::None => {}
            }
            return false;
        }

        let rows = open.snapshot.len();
        let columns = open.snapshot.columns().len();

        if let Some(action) = self.input_handler.handle_key(key, self.input_mode) {
            match action {
                Action::MoveUp => open.state.select_previous(),
                Action::MoveDown => open.state.select_next(rows),
                Action::MoveLeft => open.state.column_left(),
                Action::MoveRight => open.state.column_right(columns),
                Action::Home => open.state.select_first(),
                Action::End => open.state.select_last(rows),
                Action::Select => self.activate_cell(),
                Action::EditCell => self.begin_edit(),
                Action::Sort => self.sort_focused_column(),
                Action::SaveDrafts => self.save_drafts(),
                Action::DiscardDrafts => self.discard_drafts(),
                Action::Back => self.close_table(),
                Action::Help => self.open_help(),
                Action::Quit => return true,
            }
        }

        false
    }

    /// Handle keys in help view
    fn handle_help_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
                self.close_help();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.help_view_state.scroll_up(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.help_view_state.scroll_down(1);
            }
            KeyCode::PageUp | KeyCode::Char('b') => {
                self.help_view_state.page_up();
            }
            KeyCode::PageDown | KeyCode::Char('f') => {
                self.help_view_state.page_down();
            }
            _ => {}
        }
        false
    }

    /// Main event loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let tick_rate = Duration::from_millis(self.config.ui.refresh_rate_ms);
        let mut last_tick = Instant::now();

        loop {
            self.poll_table_events();

            terminal.draw(|f| crate::ui::layout::draw(f, self))?;

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());

            if event::poll(timeout).map_err(|e| AppError::Terminal(e.to_string()))? {
                match event::read().map_err(|e| AppError::Terminal(e.to_string()))? {
                    Event::Key(key) => {
                        if self.handle_key(key) {
                            self.should_quit = true;
                        }
                    }
                    Event::Resize(width, height) => {
                        tracing::debug!("Terminal resized to {}x{}", width, height);
                    }
                    Event::FocusGained | Event::FocusLost | Event::Mouse(_) | Event::Paste(_) => {}
                }
            }

            if self.should_quit {
                break;
            }

            if last_tick.elapsed() >= tick_rate {
                last_tick = Instant::now();
            }
        }

        Ok(())
    }
}
