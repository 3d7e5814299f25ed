//! Keybinding reference, dimmed where the open table lacks the feature.

use crate::domain::Table;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};

/// Table feature a group of keys depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Feature {
    Always,
    Buttons,
    Sorting,
    Editing,
}

impl Feature {
    fn available(self, table: Option<&Table>) -> bool {
        let Some(table) = table else {
            return true;
        };
        match self {
            Feature::Always => true,
            Feature::Buttons => table.columns().iter().any(|c| c.is_button()),
            Feature::Sorting => table.has_sortable_columns(),
            Feature::Editing => table.has_editable_columns(),
        }
    }
}

struct KeyGroup {
    title: &'static str,
    feature: Feature,
    keys: &'static [(&'static str, &'static str)],
}

const KEY_GROUPS: &[KeyGroup] = &[
    KeyGroup {
        title: "Moving around",
        feature: Feature::Always,
        keys: &[
            ("k / ↑", "Row above"),
            ("j / ↓", "Row below"),
            ("h / ←", "Column left"),
            ("l / →", "Column right"),
            ("g / Home", "First row"),
            ("G / End", "Last row"),
            ("Enter", "Open the selected table"),
            ("Esc", "Back to the gallery"),
            ("q", "Quit"),
        ],
    },
    KeyGroup {
        title: "Row actions",
        feature: Feature::Buttons,
        keys: &[("Enter / Space", "Press the button under the cursor")],
    },
    KeyGroup {
        title: "Sorting",
        feature: Feature::Sorting,
        keys: &[("s", "Sort by the focused column; again to reverse")],
    },
    KeyGroup {
        title: "Editing",
        feature: Feature::Editing,
        keys: &[
            ("e / Enter", "Edit the focused cell"),
            ("Enter", "Keep the edit as a draft"),
            ("Esc", "Drop the edit"),
            ("Ctrl+S", "Save every draft"),
            ("x", "Discard every draft"),
        ],
    },
];

/// Scroll position of the help view
#[derive(Debug, Default, Clone)]
pub struct HelpViewState {
    pub scroll_offset: usize,
    /// Updated on render
    pub total_lines: usize,
    /// Updated on render
    pub visible_height: usize,
}

impl HelpViewState {
    pub fn new() -> Self {
        Self::default()
    }

    fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.visible_height)
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.scroll_offset = (self.scroll_offset + n).min(self.max_offset());
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.visible_height.saturating_sub(2));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.visible_height.saturating_sub(2));
    }
}

/// Help view widget
pub struct HelpWidget<'a> {
    state: &'a mut HelpViewState,
    table: Option<&'a Table>,
}

impl<'a> HelpWidget<'a> {
    pub fn new(state: &'a mut HelpViewState) -> Self {
        Self { state, table: None }
    }

    /// Dim the groups `table` has no use for
    pub fn for_table(mut self, table: Option<&'a Table>) -> Self {
        self.table = table;
        self
    }

    fn build_lines(&self) -> Vec<Line<'static>> {
        let dim = Style::default().fg(Color::DarkGray);
        let mut lines = vec![
            Line::from(Span::styled(
                "datatable-tui keys",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        for group in KEY_GROUPS {
            let available = group.feature.available(self.table);
            let (title_style, key_style, text_style) = if available {
                (
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    Style::default().fg(Color::Green),
                    Style::default(),
                )
            } else {
                (dim, dim, dim)
            };

            let mut title = vec![Span::styled(group.title, title_style)];
            if !available {
                title.push(Span::styled(" (not available in this table)", dim));
            }
            lines.push(Line::from(title));

            lines.extend(group.keys.iter().map(|(key, text)| {
                Line::from(vec![
                    Span::styled(format!("  {:<14}", key), key_style),
                    Span::styled(*text, text_style),
                ])
            }));
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled("Esc, q or ? closes this view", dim)));
        lines
    }
}

impl Widget for HelpWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let lines = self.build_lines();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Help ");
        let inner = block.inner(area);

        self.state.total_lines = lines.len();
        self.state.visible_height = inner.height as usize;
        self.state.scroll_offset = self.state.scroll_offset.min(self.state.max_offset());

        Paragraph::new(lines)
            .block(block)
            .scroll((self.state.scroll_offset as u16, 0))
            .render(area, buf);

        if self.state.total_lines > self.state.visible_height {
            let mut scrollbar_state = ScrollbarState::new(self.state.max_offset())
                .position(self.state.scroll_offset);
            Scrollbar::new(ScrollbarOrientation::VerticalRight).render(
                area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                buf,
                &mut scrollbar_state,
            );
        }
    }
}
