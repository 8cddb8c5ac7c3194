//! Widget specifications.
//!
//! A grid cell's text is classified into a [`WidgetSpec`]: the widget kind
//! with its parameters, a control id unique within the form, the visible
//! text and optional choices.
//!
//! - [`grammar`]: pattern matching of cell text
//! - [`id`]: control-id derivation and uniqueness
//! - [`menu`]: menu definitions
//! - [`shortcut`]: keyboard shortcut specs of menu commands

pub mod grammar;
pub mod id;
pub mod menu;
pub mod shortcut;

use std::fmt;

pub use grammar::{classify, Classifier};
pub use id::{derive_id, IdResolver};
pub use menu::{parse_menu, MenuEntry, MenuItem};
pub use shortcut::Shortcut;

// ---------------------------------------------------------------------------
// SpecError
// ---------------------------------------------------------------------------

/// Errors produced while turning cell or menu text into specifications.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    #[error("duplicate control id `{id}` at row {row}, column {col}")]
    DuplicateId { id: String, row: usize, col: usize },
    #[error("malformed widget {text:?} at row {row}, column {col}: {reason}")]
    WidgetSpec {
        text: String,
        row: usize,
        col: usize,
        reason: String,
    },
    #[error("malformed menu entry {text:?}: {reason}")]
    Menu { text: String, reason: String },
}

// ---------------------------------------------------------------------------
// Number
// ---------------------------------------------------------------------------

/// A numeric slider bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Parse an integer, falling back to a float.
    pub fn parse(text: &str) -> Option<Self> {
        if let Ok(i) = text.parse::<i64>() {
            return Some(Number::Int(i));
        }
        match text.parse::<f64>() {
            Ok(f) if f.is_finite() => Some(Number::Float(f)),
            _ => None,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(x) => write!(f, "{x}"),
        }
    }
}

// ---------------------------------------------------------------------------
// WidgetKind / WidgetSpec
// ---------------------------------------------------------------------------

/// A list view column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListColumn {
    pub id: String,
    pub text: String,
    pub editable: bool,
}

/// The kind of widget a cell describes, with kind-specific parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetKind {
    Label,
    Button,
    TextField { multiline: bool },
    Dropdown,
    Combobox,
    Checkbox { checked: bool },
    Radio { checked: bool },
    Slider { min: Number, max: Number },
    ListView {
        columns: Vec<ListColumn>,
        /// The unnamed text column is editable.
        first_column_editable: bool,
    },
    /// An empty panel for user content; framed placeholders draw a titled
    /// border.
    Placeholder { framed: bool },
}

impl WidgetKind {
    /// Short lowercase name, used in logs and dumps.
    pub fn name(&self) -> &'static str {
        match self {
            WidgetKind::Label => "label",
            WidgetKind::Button => "button",
            WidgetKind::TextField { multiline: false } => "textfield",
            WidgetKind::TextField { multiline: true } => "multiline",
            WidgetKind::Dropdown => "dropdown",
            WidgetKind::Combobox => "combobox",
            WidgetKind::Checkbox { .. } => "checkbox",
            WidgetKind::Radio { .. } => "radio",
            WidgetKind::Slider { .. } => "slider",
            WidgetKind::ListView { .. } => "listview",
            WidgetKind::Placeholder { .. } => "placeholder",
        }
    }

    /// Whether the widget fires value-changed or click events.
    pub fn has_events(&self) -> bool {
        !matches!(self, WidgetKind::Label | WidgetKind::Placeholder { .. })
    }
}

/// A classified cell.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetSpec {
    pub kind: WidgetKind,
    pub id: String,
    pub text: String,
    /// Dropdown and combobox choices, if given in the cell.
    pub choices: Option<Vec<String>>,
}

impl WidgetSpec {
    pub fn new(kind: WidgetKind, id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            text: text.into(),
            choices: None,
        }
    }

    /// Set the choices (builder).
    pub fn with_choices(mut self, choices: Vec<String>) -> Self {
        self.choices = Some(choices);
        self
    }
}
