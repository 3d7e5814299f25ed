//! Main layout rendering for the TUI.

use crate::app::{App, AppView, OpenTable};
use crate::ui::widgets::data_table::{DataTableWidget, RowDetailWidget};
use crate::ui::widgets::gallery::GalleryWidget;
use crate::ui::widgets::help::HelpWidget;
use crate::ui::widgets::text_input::CellEditorDialog;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Draw the main application UI
pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    match app.view {
        AppView::Gallery => draw_gallery(frame, app, area),
        AppView::Table => draw_table(frame, app, area),
        AppView::Help => draw_help(frame, app, area),
    }

    // Draw error message overlay if present
    if let Some(ref error) = app.error_message {
        draw_error_overlay(frame, error, area);
    } else if let Some(ref msg) = app.status_message {
        draw_status_message(frame, msg, area);
    }
}

/// Split into header, content and footer
fn frame_chunks(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(area)
}

fn draw_header(frame: &mut Frame, text: String, area: Rect) {
    let header = Paragraph::new(text)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn draw_footer(frame: &mut Frame, text: &str, area: Rect) {
    let footer = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, area);
}

/// Draw the list of openable tables
fn draw_gallery(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = frame_chunks(area);

    draw_header(frame, "datatable-tui - Table Gallery".to_string(), chunks[0]);

    if app.sources.is_empty() {
        let empty_msg = Paragraph::new("No tables available.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Tables"))
            .alignment(Alignment::Center);
        frame.render_widget(empty_msg, chunks[1]);
    } else {
        let gallery = GalleryWidget::new(&app.sources, app.selected_source_index);
        frame.render_widget(gallery, chunks[1]);
    }

    draw_footer(
        frame,
        " j/k: Navigate | Enter: Open | q: Quit | ?: Help ",
        chunks[2],
    );
}

/// Draw the open table with any popup on top
fn draw_table(frame: &mut Frame, app: &App, area: Rect) {
    let Some(open) = app.open_table.as_ref() else {
        draw_gallery(frame, app, area);
        return;
    };
    let chunks = frame_chunks(area);

    let table = &open.snapshot;
    let mut header = format!("{} - {} rows", open.title, table.len());
    if let Some(key) = table.sort() {
        header.push_str(&format!(" | sorted by {} {}", key.field_name, key.direction));
    }
    draw_header(frame, header, chunks[0]);

    let widget = DataTableWidget::new(table, &open.state, &open.title);
    frame.render_widget(widget, chunks[1]);

    draw_footer(frame, &table_footer(open), chunks[2]);

    if let Some(editor) = open.state.editor.as_ref() {
        let column_label = table
            .columns()
            .get(editor.column_index)
            .map(|c| c.label.as_str())
            .unwrap_or("");
        let popup_area = centered_rect(60, 30, area);
        let dialog = CellEditorDialog::new(&editor.input, column_label, editor.row_id.to_string());
        frame.render_widget(dialog, popup_area);
    }

    if let Some(row) = open.detail_row.as_ref().and_then(|id| table.row(id)) {
        let popup_area = centered_rect(60, 50, area);
        frame.render_widget(RowDetailWidget::new(table, row), popup_area);
    }
}

/// Key hints for what the open table supports
fn table_footer(open: &OpenTable) -> String {
    if open.state.editor.is_some() {
        return " Enter: Keep as draft | Esc: Cancel ".to_string();
    }
    if open.detail_row.is_some() {
        return " Esc: Close ".to_string();
    }

    let table = &open.snapshot;
    let mut hints = vec!["hjkl: Move", "Enter: Select"];
    if table.has_editable_columns() {
        hints.push("e: Edit");
    }
    if table.has_sortable_columns() {
        hints.push("s: Sort");
    }
    if open.state.has_drafts() {
        hints.push("Ctrl+S: Save");
        hints.push("x: Discard");
    }
    hints.extend(["Esc: Back", "?: Help"]);
    format!(" {} ", hints.join(" | "))
}

/// Draw help view showing all keybindings
fn draw_help(frame: &mut Frame, app: &mut App, area: Rect) {
    let table = app.open_table.as_ref().map(|open| open.snapshot.as_ref());
    let help_widget = HelpWidget::new(&mut app.help_view_state).for_table(table);
    frame.render_widget(help_widget, area);
}

/// Draw a status message at the bottom of the screen
fn draw_status_message(frame: &mut Frame, message: &str, area: Rect) {
    let msg_area = Rect {
        x: area.x + 2,
        y: area.y + area.height.saturating_sub(4),
        width: area
            .width
            .saturating_sub(4)
            .min(message.chars().count() as u16 + 4),
        height: 3.min(area.height),
    };

    frame.render_widget(Clear, msg_area);

    let status = Paragraph::new(message)
        .style(Style::default().fg(Color::Green))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        );

    frame.render_widget(status, msg_area);
}

/// Draw error overlay
fn draw_error_overlay(frame: &mut Frame, error: &str, area: Rect) {
    let popup_area = centered_rect(60, 20, area);

    frame.render_widget(Clear, popup_area);

    let error_widget = Paragraph::new(error)
        .style(Style::default().fg(Color::Red))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title("Error"),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(error_widget, popup_area);
}

/// Create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
