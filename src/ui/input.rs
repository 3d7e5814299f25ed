//! Key-to-action mapping for the gallery and table views.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Whether keys drive the table or go to the cell editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Cell editor open; only cancel keys are mapped
    Insert,
}

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Home,
    End,

    /// Open a table, press a button or edit a cell
    Select,
    Back,

    EditCell,
    Sort,
    SaveDrafts,
    DiscardDrafts,

    Help,
    Quit,
}

/// Translates key events into [`Action`]s
pub struct InputHandler {
    vim_navigation: bool,
}

impl InputHandler {
    pub fn new(vim_navigation: bool) -> Self {
        Self { vim_navigation }
    }

    pub fn handle_key(&self, key: KeyEvent, mode: InputMode) -> Option<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match (mode, ctrl, key.code) {
            (_, true, KeyCode::Char('c')) => match mode {
                InputMode::Normal => Some(Action::Quit),
                InputMode::Insert => Some(Action::Back),
            },
            (InputMode::Insert, _, KeyCode::Esc) => Some(Action::Back),
            (InputMode::Insert, _, _) => None,
            (InputMode::Normal, true, KeyCode::Char('s')) => Some(Action::SaveDrafts),
            (InputMode::Normal, true, _) => None,
            (InputMode::Normal, false, code) => self
                .movement(code)
                .or_else(|| Self::command(code)),
        }
    }

    fn movement(&self, code: KeyCode) -> Option<Action> {
        let action = match code {
            KeyCode::Up => Action::MoveUp,
            KeyCode::Down => Action::MoveDown,
            KeyCode::Left => Action::MoveLeft,
            KeyCode::Right => Action::MoveRight,
            KeyCode::Home => Action::Home,
            KeyCode::End => Action::End,
            KeyCode::Char(c) if self.vim_navigation => match c {
                'k' => Action::MoveUp,
                'j' => Action::MoveDown,
                'h' => Action::MoveLeft,
                'l' => Action::MoveRight,
                'g' => Action::Home,
                'G' => Action::End,
                _ => return None,
            },
            _ => return None,
        };
        Some(action)
    }

    fn command(code: KeyCode) -> Option<Action> {
        let action = match code {
            KeyCode::Enter | KeyCode::Char(' ') => Action::Select,
            KeyCode::Esc => Action::Back,
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('e') => Action::EditCell,
            KeyCode::Char('s') => Action::Sort,
            KeyCode::Char('x') => Action::DiscardDrafts,
            KeyCode::Char('?') => Action::Help,
            _ => return None,
        };
        Some(action)
    }
}
