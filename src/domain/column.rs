//! Column schema entries.

/// Opaque metadata for a button column. The table never interprets the
/// action; it only hands `name` back to the host when the button is pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonAction {
    /// Text on the button
    pub label: String,
    /// Action name reported to the host
    pub name: String,
    /// Presentation hint (e.g. "brand")
    pub variant: Option<String>,
}

impl ButtonAction {
    pub fn new(label: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            name: name.into(),
            variant: None,
        }
    }

    pub fn variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }
}

/// How a column's cells are rendered
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnKind {
    /// Plain text of the row's field value
    #[default]
    Text,
    /// An actionable control
    Button(ButtonAction),
}

/// Schema entry describing one displayable field of a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Header text
    pub label: String,
    /// Row field this column reads
    pub field_name: String,
    pub kind: ColumnKind,
    pub editable: bool,
    pub sortable: bool,
}

impl Column {
    /// Create a plain text column
    pub fn text(label: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            field_name: field_name.into(),
            kind: ColumnKind::Text,
            editable: false,
            sortable: false,
        }
    }

    /// Create a button column. The action name doubles as the field name.
    pub fn button(label: impl Into<String>, action: ButtonAction) -> Self {
        Self {
            label: label.into(),
            field_name: action.name.clone(),
            kind: ColumnKind::Button(action),
            editable: false,
            sortable: false,
        }
    }

    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Button metadata, if this is a button column
    pub fn action(&self) -> Option<&ButtonAction> {
        match &self.kind {
            ColumnKind::Button(action) => Some(action),
            ColumnKind::Text => None,
        }
    }

    pub fn is_button(&self) -> bool {
        matches!(self.kind, ColumnKind::Button(_))
    }

    /// Whether the cell editor may open on this column
    pub fn accepts_edits(&self) -> bool {
        self.editable && !self.is_button()
    }
}
