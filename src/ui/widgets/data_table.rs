//! Data table widget: renders a table snapshot with cursor, sort arrows,
//! button cells and pending drafts.

use super::text_input::TextInputState;
use crate::domain::{CellValue, Column, ColumnKind, DraftEdit, Row, RowId, Table};
use ratatui::{
    prelude::*,
    widgets::{
        Block, Borders, Cell, Clear, Paragraph, Row as GridRow, Table as GridTable, TableState,
        Wrap,
    },
};

/// Cell being edited in the popup editor
#[derive(Debug, Clone)]
pub struct CellEditor {
    pub row_id: RowId,
    pub column_index: usize,
    pub input: TextInputState,
}

/// Cursor, pending drafts and editor state for one open table
#[derive(Debug, Default, Clone)]
pub struct DataTableState {
    /// Selected row index (display order)
    pub selected_row: usize,
    /// Selected column index
    pub selected_column: usize,
    /// At most one draft per row, in order of first edit
    drafts: Vec<DraftEdit>,
    /// Open cell editor, if any
    pub editor: Option<CellEditor>,
}

impl DataTableState {
    /// Create new state
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_previous(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    pub fn select_next(&mut self, row_count: usize) {
        if self.selected_row < row_count.saturating_sub(1) {
            self.selected_row += 1;
        }
    }

    pub fn select_first(&mut self) {
        self.selected_row = 0;
    }

    pub fn select_last(&mut self, row_count: usize) {
        self.selected_row = row_count.saturating_sub(1);
    }

    pub fn column_left(&mut self) {
        self.selected_column = self.selected_column.saturating_sub(1);
    }

    pub fn column_right(&mut self, column_count: usize) {
        if self.selected_column < column_count.saturating_sub(1) {
            self.selected_column += 1;
        }
    }

    /// Keep the cursor inside a table of the given shape
    pub fn clamp(&mut self, row_count: usize, column_count: usize) {
        self.selected_row = self.selected_row.min(row_count.saturating_sub(1));
        self.selected_column = self.selected_column.min(column_count.saturating_sub(1));
    }

    /// Row under the cursor
    pub fn selected<'t>(&self, table: &'t Table) -> Option<&'t Row> {
        table.rows().get(self.selected_row)
    }

    /// Record a draft value, replacing any earlier draft for the same cell
    pub fn set_draft(&mut self, row_id: &RowId, field_name: &str, value: CellValue) {
        match self.drafts.iter_mut().find(|d| &d.id == row_id) {
            Some(draft) => draft.set(field_name, value),
            None => self
                .drafts
                .push(DraftEdit::new(row_id.clone()).with(field_name, value)),
        }
    }

    /// Pending draft value for a cell
    pub fn draft_value(&self, row_id: &RowId, field_name: &str) -> Option<&CellValue> {
        self.drafts
            .iter()
            .find(|d| &d.id == row_id)
            .and_then(|d| d.get(field_name))
    }

    pub fn drafts(&self) -> &[DraftEdit] {
        &self.drafts
    }

    pub fn has_drafts(&self) -> bool {
        !self.drafts.is_empty()
    }

    pub fn discard_drafts(&mut self) {
        self.drafts.clear();
    }

    /// Open the editor on the selected cell. Returns false when the cell is
    /// not editable.
    pub fn begin_edit(&mut self, table: &Table) -> bool {
        let (Some(row), Some(column)) = (
            self.selected(table),
            table.columns().get(self.selected_column),
        ) else {
            return false;
        };
        if !column.accepts_edits() {
            return false;
        }

        let current = self
            .draft_value(&row.id, &column.field_name)
            .or_else(|| row.get(&column.field_name))
            .map(CellValue::display)
            .unwrap_or_default();
        self.editor = Some(CellEditor {
            row_id: row.id.clone(),
            column_index: self.selected_column,
            input: TextInputState::with_value(current),
        });
        true
    }

    /// Close the editor, turning its input into a draft
    pub fn commit_edit(&mut self, table: &Table) {
        let Some(editor) = self.editor.take() else {
            return;
        };
        let Some(column) = table.columns().get(editor.column_index) else {
            return;
        };
        let original = table
            .row(&editor.row_id)
            .and_then(|row| row.get(&column.field_name));
        let value = CellValue::from_input(original, editor.input.value());

        // Typing the saved value back clears that cell's draft
        if original.map_or(value.is_null(), |o| o == &value) {
            self.clear_draft_field(&editor.row_id, &column.field_name);
        } else {
            self.set_draft(&editor.row_id, &column.field_name, value);
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editor = None;
    }

    fn clear_draft_field(&mut self, row_id: &RowId, field_name: &str) {
        if let Some(draft) = self.drafts.iter_mut().find(|d| &d.id == row_id) {
            draft.fields.remove(field_name);
        }
        self.drafts.retain(|d| !d.is_empty());
    }
}

/// Widget for displaying a table snapshot
pub struct DataTableWidget<'a> {
    table: &'a Table,
    state: &'a DataTableState,
    title: &'a str,
}

impl<'a> DataTableWidget<'a> {
    /// Create a new data table widget
    pub fn new(table: &'a Table, state: &'a DataTableState, title: &'a str) -> Self {
        Self {
            table,
            state,
            title,
        }
    }

    /// Header text, with the sort arrow on the sorted column
    fn header_label(&self, column: &Column) -> String {
        match self.table.sort() {
            Some(key) if key.field_name == column.field_name => {
                format!("{} {}", column.label, key.direction.indicator())
            }
            _ => column.label.clone(),
        }
    }

    fn column_width(column: &Column) -> Constraint {
        match &column.kind {
            ColumnKind::Button(action) => {
                let width = action.label.chars().count().max(column.label.chars().count()) + 4;
                Constraint::Length(width as u16)
            }
            ColumnKind::Text => Constraint::Fill(1),
        }
    }

    fn button_style(variant: Option<&str>) -> Style {
        match variant {
            Some("brand") => Style::default().fg(Color::White).bg(Color::Blue),
            Some("destructive") => Style::default().fg(Color::White).bg(Color::Red),
            _ => Style::default().fg(Color::Cyan),
        }
    }

    fn build_cell(&self, row: &Row, column: &Column, is_cursor: bool) -> Cell<'a> {
        let (content, style) = match &column.kind {
            ColumnKind::Button(action) => (
                format!("[ {} ]", action.label),
                Self::button_style(action.variant.as_deref()),
            ),
            ColumnKind::Text => match self.state.draft_value(&row.id, &column.field_name) {
                Some(draft) => (
                    draft.display(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::ITALIC),
                ),
                None => (
                    row.get(&column.field_name)
                        .map(CellValue::display)
                        .unwrap_or_default(),
                    Style::default(),
                ),
            },
        };

        let style = if is_cursor {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style
        };
        Cell::from(content).style(style)
    }

    fn build_rows(&self) -> Vec<GridRow<'a>> {
        self.table
            .rows()
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                let cells = self
                    .table
                    .columns()
                    .iter()
                    .enumerate()
                    .map(|(col_idx, column)| {
                        let is_cursor = row_idx == self.state.selected_row
                            && col_idx == self.state.selected_column;
                        self.build_cell(row, column, is_cursor)
                    })
                    .collect::<Vec<_>>();
                GridRow::new(cells)
            })
            .collect()
    }
}

impl Widget for DataTableWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let columns = self.table.columns();

        let header = GridRow::new(columns.iter().enumerate().map(|(idx, column)| {
            let style = if idx == self.state.selected_column {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            Cell::from(self.header_label(column)).style(style)
        }))
        .bottom_margin(1);

        let widths: Vec<Constraint> = columns.iter().map(Self::column_width).collect();

        let mut title = format!(" {} ", self.title);
        if self.state.has_drafts() {
            title.push_str(&format!("({} unsaved) ", self.state.drafts().len()));
        }

        let grid = GridTable::new(self.build_rows(), widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(title))
            .row_highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ");

        let mut state = TableState::default();
        if !self.table.is_empty() {
            state.select(Some(self.state.selected_row));
        }

        StatefulWidget::render(grid, area, buf, &mut state);
    }
}

/// Popup listing every field of one row
pub struct RowDetailWidget<'a> {
    table: &'a Table,
    row: &'a Row,
}

impl<'a> RowDetailWidget<'a> {
    pub fn new(table: &'a Table, row: &'a Row) -> Self {
        Self { table, row }
    }

    fn build_lines(&self) -> Vec<Line<'a>> {
        let mut lines = vec![Line::from(vec![
            Span::styled("id: ", Style::default().fg(Color::DarkGray)),
            Span::raw(self.row.id.to_string()),
        ])];

        for column in self.table.columns().iter().filter(|c| !c.is_button()) {
            let value = self
                .row
                .get(&column.field_name)
                .map(CellValue::display)
                .unwrap_or_default();
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{}: ", column.label),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(value),
            ]));
        }

        lines
    }
}

impl Widget for RowDetailWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let paragraph = Paragraph::new(self.build_lines())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(" Row Details (Esc to close) "),
            );
        paragraph.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Demo, SortDirection};

    fn render_text(widget: impl Widget, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_cursor_movement_is_bounded() {
        let mut state = DataTableState::new();
        state.select_previous();
        assert_eq!(state.selected_row, 0);

        state.select_next(3);
        state.select_next(3);
        state.select_next(3);
        assert_eq!(state.selected_row, 2);

        state.column_right(2);
        state.column_right(2);
        assert_eq!(state.selected_column, 1);

        state.clamp(1, 1);
        assert_eq!((state.selected_row, state.selected_column), (0, 0));
    }

    #[test]
    fn test_one_draft_per_row() {
        let mut state = DataTableState::new();
        let id = RowId::Int(2);
        state.set_draft(&id, "email", CellValue::from("a@example.com"));
        state.set_draft(&id, "phone", CellValue::from("555-0000"));
        state.set_draft(&id, "email", CellValue::from("b@example.com"));

        assert_eq!(state.drafts().len(), 1);
        assert_eq!(
            state.draft_value(&id, "email"),
            Some(&CellValue::from("b@example.com"))
        );
        assert_eq!(
            state.draft_value(&id, "phone"),
            Some(&CellValue::from("555-0000"))
        );

        state.discard_drafts();
        assert!(!state.has_drafts());
    }

    #[test]
    fn test_edit_flow_creates_draft() {
        let table = Demo::InlineEdit.table().unwrap();
        let mut state = DataTableState::new();
        state.selected_row = 1;
        state.selected_column = 1;

        assert!(state.begin_edit(&table));
        let editor = state.editor.as_mut().unwrap();
        assert_eq!(editor.input.value(), "jane.smith@example.com");
        editor.input = TextInputState::with_value("jane.new@example.com".to_string());

        state.commit_edit(&table);
        assert!(state.editor.is_none());
        assert_eq!(
            state.draft_value(&RowId::Int(2), "email"),
            Some(&CellValue::from("jane.new@example.com"))
        );
    }

    #[test]
    fn test_restoring_value_clears_draft() {
        let table = Demo::InlineEdit.table().unwrap();
        let mut state = DataTableState::new();
        state.set_draft(&RowId::Int(1), "name", CellValue::from("Johnny"));

        assert!(state.begin_edit(&table));
        state.editor.as_mut().unwrap().input = TextInputState::with_value("John Doe".to_string());
        state.commit_edit(&table);
        assert!(!state.has_drafts());
    }

    #[test]
    fn test_confirming_empty_text_cell_adds_no_draft() {
        let table = Table::new(
            vec![Column::text("Note", "note").editable()],
            vec![Row::new(1).with("note", "")],
        )
        .unwrap();
        let mut state = DataTableState::new();

        assert!(state.begin_edit(&table));
        state.editor.as_mut().unwrap().input = TextInputState::with_value("  ".to_string());
        state.commit_edit(&table);
        assert!(!state.has_drafts());

        assert!(state.begin_edit(&table));
        state.editor.as_mut().unwrap().input = TextInputState::with_value(" memo ".to_string());
        state.commit_edit(&table);
        assert_eq!(
            state.draft_value(&RowId::Int(1), "note"),
            Some(&CellValue::from("memo"))
        );
    }

    #[test]
    fn test_read_only_columns_refuse_editing() {
        let table = Demo::Basic.table().unwrap();
        let mut state = DataTableState::new();
        assert!(!state.begin_edit(&table));
        assert!(state.editor.is_none());
    }

    #[test]
    fn test_render_shows_sort_arrow_and_buttons() {
        let table = Demo::Sortable
            .table()
            .unwrap()
            .sorted_by("name", SortDirection::Ascending)
            .unwrap();
        let state = DataTableState::new();
        let text = render_text(DataTableWidget::new(&table, &state, "Sortable"), 90, 10);
        assert!(text.contains("Name ▲"));
        assert!(text.contains("Bob Johnson"));

        let table = Demo::CustomCells.table().unwrap();
        let text = render_text(DataTableWidget::new(&table, &state, "Custom"), 90, 10);
        assert!(text.contains("[ View ]"));
    }

    #[test]
    fn test_render_marks_unsaved_drafts() {
        let table = Demo::InlineEdit.table().unwrap();
        let mut state = DataTableState::new();
        state.set_draft(&RowId::Int(3), "name", CellValue::from("Robert"));
        let text = render_text(DataTableWidget::new(&table, &state, "Edit"), 90, 10);
        assert!(text.contains("(1 unsaved)"));
        assert!(text.contains("Robert"));
    }

    #[test]
    fn test_row_detail_lists_fields() {
        let table = Demo::CustomCells.table().unwrap();
        let row = &table.rows()[0];
        let lines = RowDetailWidget::new(&table, row).build_lines();
        // id plus three text columns; the button column is skipped
        assert_eq!(lines.len(), 4);
    }
}
