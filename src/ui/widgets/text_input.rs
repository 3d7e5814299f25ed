//! Cell editor popup and its line-editing state.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

/// Result of feeding a key to [`TextInputState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInputAction {
    None,
    Changed,
    /// Enter
    Submit,
    /// Esc
    Cancel,
}

/// Single-line buffer with a character cursor
#[derive(Debug, Default, Clone)]
pub struct TextInputState {
    value: String,
    /// Cursor position in chars, `0..=len`
    cursor: usize,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from `value` with the cursor after the last char
    pub fn with_value(value: String) -> Self {
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    /// Byte offset of char `at`
    fn offset(&self, at: usize) -> usize {
        self.value
            .char_indices()
            .nth(at)
            .map_or(self.value.len(), |(idx, _)| idx)
    }

    fn remove_range(&mut self, from: usize, to: usize) -> TextInputAction {
        if from >= to {
            return TextInputAction::None;
        }
        let range = self.offset(from)..self.offset(to);
        self.value.replace_range(range, "");
        self.cursor = from;
        TextInputAction::Changed
    }

    /// Start of the word before the cursor
    fn word_start(&self) -> usize {
        let chars: Vec<char> = self.value.chars().take(self.cursor).collect();
        let trimmed = chars.iter().rposition(|c| !c.is_whitespace()).map_or(0, |i| i + 1);
        chars[..trimmed]
            .iter()
            .rposition(|c| c.is_whitespace())
            .map_or(0, |i| i + 1)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> TextInputAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('u') => self.remove_range(0, self.cursor),
                KeyCode::Char('w') => self.remove_range(self.word_start(), self.cursor),
                KeyCode::Char('a') => {
                    self.cursor = 0;
                    TextInputAction::None
                }
                KeyCode::Char('e') => {
                    self.cursor = self.len();
                    TextInputAction::None
                }
                _ => TextInputAction::None,
            };
        }

        match key.code {
            KeyCode::Char(c) => {
                let at = self.offset(self.cursor);
                self.value.insert(at, c);
                self.cursor += 1;
                TextInputAction::Changed
            }
            KeyCode::Backspace => self.remove_range(self.cursor.saturating_sub(1), self.cursor),
            KeyCode::Delete => {
                let cursor = self.cursor;
                self.remove_range(cursor, (cursor + 1).min(self.len()))
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                TextInputAction::None
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.len());
                TextInputAction::None
            }
            KeyCode::Home => {
                self.cursor = 0;
                TextInputAction::None
            }
            KeyCode::End => {
                self.cursor = self.len();
                TextInputAction::None
            }
            KeyCode::Enter => TextInputAction::Submit,
            KeyCode::Esc => TextInputAction::Cancel,
            _ => TextInputAction::None,
        }
    }

    /// Text split around the cursor, with the cursor cell highlighted
    fn spans(&self) -> Line<'static> {
        let cursor_style = Style::default().fg(Color::Black).bg(Color::White);
        if self.value.is_empty() {
            return Line::from(vec![
                Span::styled(" ", cursor_style),
                Span::styled("(empty)", Style::default().fg(Color::DarkGray)),
            ]);
        }

        let before: String = self.value.chars().take(self.cursor).collect();
        let under = self
            .value
            .chars()
            .nth(self.cursor)
            .map_or_else(|| " ".to_string(), String::from);
        let after: String = self.value.chars().skip(self.cursor + 1).collect();
        Line::from(vec![
            Span::raw(before),
            Span::styled(under, cursor_style),
            Span::raw(after),
        ])
    }
}

/// Popup for editing one cell
pub struct CellEditorDialog<'a> {
    input: &'a TextInputState,
    column_label: &'a str,
    row_label: String,
}

impl<'a> CellEditorDialog<'a> {
    pub fn new(input: &'a TextInputState, column_label: &'a str, row_label: String) -> Self {
        Self {
            input,
            column_label,
            row_label,
        }
    }
}

impl Widget for CellEditorDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let outer = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" Edit row {} ", self.row_label));
        let inner = outer.inner(area);
        outer.render(area, buf);

        let [field, _, hint] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(inner);

        Paragraph::new(self.input.spans())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", self.column_label)),
            )
            .render(field, buf);

        Paragraph::new("Enter: Keep as draft | Esc: Cancel | Ctrl+U: Clear")
            .style(Style::default().fg(Color::DarkGray))
            .render(hint, buf);
    }
}
