//! Form-level error type.

use crate::grid::LayoutError;
use crate::model::ModelError;
use crate::spec::SpecError;
use crate::toolkit::ToolkitError;
use crate::value::ValueError;

/// Any error a form operation can report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Spec(#[from] SpecError),
    #[error(transparent)]
    Value(#[from] ValueError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Toolkit(#[from] ToolkitError),
    #[error("no control `{0}` in this form")]
    UnknownControl(String),
    #[error("menu command `{0}` has no handler")]
    MissingHandler(String),
}
