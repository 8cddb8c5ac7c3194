//! The native toolkit collaborator.
//!
//! The form builder never touches native widgets directly. It talks to a
//! [`Toolkit`]: create a widget for a [`WidgetSpec`] under a container,
//! place it on the container's grid, read and write its value and get called
//! back on user events.
//!
//! Toolkits are handle types: methods take `&self`, and an implementation
//! must not hold internal borrows while it runs a callback, so handlers can
//! call back into the form.
//!
//! [`headless`] is an in-memory implementation used for tests and
//! snapshot rendering.

pub mod headless;

use std::rc::Rc;

use slotmap::new_key_type;

use crate::geometry::Placement;
use crate::model::ModelError;
use crate::spec::{Shortcut, WidgetSpec};
use crate::value::Value;

new_key_type! {
    /// Handle of a native widget, window or menu.
    pub struct WidgetId;
}

/// Event handler. Buttons and menu commands pass [`Value::None`], other
/// controls their new value.
pub type Callback = Rc<dyn Fn(&Value)>;

/// Errors reported by a toolkit.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolkitError {
    #[error("unknown widget {0:?}")]
    UnknownWidget(WidgetId),
    #[error("{kind} does not support {operation}")]
    Unsupported {
        kind: &'static str,
        operation: &'static str,
    },
    #[error("{value:?} is not one of the choices")]
    NoSuchChoice { value: String },
    #[error("layout failed: {0}")]
    Layout(String),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Primitives the form builder needs from a GUI toolkit.
pub trait Toolkit {
    /// Create a top-level window.
    fn create_window(&self, title: &str) -> Result<WidgetId, ToolkitError>;

    /// Create the widget described by `spec` as a child of `parent`. The
    /// widget starts with the spec's initial value.
    fn create(&self, parent: WidgetId, spec: &WidgetSpec) -> Result<WidgetId, ToolkitError>;

    /// Position `widget` on its parent's grid.
    fn place(&self, widget: WidgetId, placement: Placement) -> Result<(), ToolkitError>;

    /// Set the stretch weights of a container's columns and rows, replacing
    /// earlier ones.
    fn set_stretch(
        &self,
        container: WidgetId,
        columns: &[u32],
        rows: &[u32],
    ) -> Result<(), ToolkitError>;

    /// Destroy `widget` and its children.
    fn destroy(&self, widget: WidgetId) -> Result<(), ToolkitError>;

    /// Move `widget` into `parent`. Its placement must be set again.
    fn reparent(&self, widget: WidgetId, parent: WidgetId) -> Result<(), ToolkitError>;

    fn get_value(&self, widget: WidgetId) -> Result<Value, ToolkitError>;

    /// Set the value of `widget`. The value has already been checked against
    /// the widget kind. Does not fire callbacks.
    fn set_value(&self, widget: WidgetId, value: Value) -> Result<(), ToolkitError>;

    /// Call `callback` on the widget's click or value-changed event.
    fn connect(&self, widget: WidgetId, callback: Callback) -> Result<(), ToolkitError>;

    /// Make the radio buttons mutually exclusive.
    fn group_radios(&self, _radios: &[WidgetId]) -> Result<(), ToolkitError> {
        Ok(())
    }

    /// Add a menu to a window's menu bar (`parent` is a window) or a submenu
    /// to a menu.
    fn create_menu(&self, parent: WidgetId, text: &str) -> Result<WidgetId, ToolkitError>;

    /// Add a command to `menu`.
    fn add_menu_command(
        &self,
        menu: WidgetId,
        id: &str,
        text: &str,
        shortcut: Option<&Shortcut>,
        callback: Callback,
    ) -> Result<WidgetId, ToolkitError>;

    fn show(&self, window: WidgetId) -> Result<(), ToolkitError>;

    fn close(&self, window: WidgetId) -> Result<(), ToolkitError>;
}
