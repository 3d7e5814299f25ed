//! Gallery widget listing the tables that can be opened.

use crate::app::{SourceOrigin, TableSource};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState},
};

/// Widget for choosing a table
pub struct GalleryWidget<'a> {
    sources: &'a [TableSource],
    selected_index: usize,
}

impl<'a> GalleryWidget<'a> {
    /// Create a new gallery widget
    pub fn new(sources: &'a [TableSource], selected_index: usize) -> Self {
        Self {
            sources,
            selected_index,
        }
    }

    /// Capability badges for a table
    fn badges(source: &TableSource) -> String {
        let table = &source.table;
        let mut badges = Vec::new();
        if table.has_sortable_columns() {
            badges.push("[SORT]");
        }
        if table.has_editable_columns() {
            badges.push("[EDIT]");
        }
        if table.columns().iter().any(|c| c.is_button()) {
            badges.push("[ACTION]");
        }
        badges.join(" ")
    }

    /// Build list items from sources
    fn build_items(&self) -> Vec<ListItem<'a>> {
        self.sources
            .iter()
            .enumerate()
            .map(|(idx, source)| {
                let color = match source.origin {
                    SourceOrigin::Sample(_) => Color::Cyan,
                    SourceOrigin::Dataset(_) => Color::Green,
                };
                let style = if idx == self.selected_index {
                    Style::default().fg(color).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(color)
                };

                let line = Line::from(vec![
                    Span::styled(source.title.clone(), style),
                    Span::raw(" "),
                    Span::styled(Self::badges(source), Style::default().fg(Color::Yellow)),
                    Span::raw("  "),
                    Span::styled(
                        source.description.clone(),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]);
                ListItem::new(line)
            })
            .collect()
    }
}

impl Widget for GalleryWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let items = self.build_items();

        let mut state = ListState::default();
        state.select(Some(self.selected_index));

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Tables"))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        StatefulWidget::render(list, area, buf, &mut state);
    }
}
