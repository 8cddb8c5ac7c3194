//! Forms: a window built from an ASCII layout, with its controls bound to
//! host handlers and readable/writable by id.
//!
//! - [`config`]: [`FormConfig`], the title, layout, menu and translations
//! - [`handlers`]: [`Handlers`], named host callbacks
//! - [`builder`]: [`build`], layout text to live widgets

pub mod builder;
pub mod config;
pub mod handlers;

use std::cell::RefCell;
use std::collections::BTreeMap;

use tracing::debug;

use crate::error::FormError;
use crate::geometry::Placement;
use crate::i18n::Translations;
use crate::spec::{WidgetKind, WidgetSpec};
use crate::toolkit::{Toolkit, WidgetId};
use crate::value::{coerce, Value, ValueError};

pub use builder::build;
pub use config::FormConfig;
pub use handlers::Handlers;

/// A control of a built form.
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    pub spec: WidgetSpec,
    pub widget: WidgetId,
    /// The window or placeholder the widget sits in.
    pub container: WidgetId,
    pub placement: Placement,
    /// Name of the connected host handler.
    pub handler: Option<String>,
}

impl Control {
    fn is_placeholder(&self) -> bool {
        matches!(self.spec.kind, WidgetKind::Placeholder { .. })
    }
}

/// A built form.
///
/// Controls are addressed by id. [`Form::value`] and [`Form::set_value`]
/// work for every control whether or not a handler is connected.
pub struct Form<T: Toolkit> {
    toolkit: T,
    window: WidgetId,
    title: String,
    ids: RefCell<Vec<String>>,
    controls: RefCell<BTreeMap<String, Control>>,
    menu_items: BTreeMap<String, WidgetId>,
    translations: Translations,
}

impl<T: Toolkit> Form<T> {
    pub fn toolkit(&self) -> &T {
        &self.toolkit
    }

    pub fn window(&self) -> WidgetId {
        self.window
    }

    /// The translated title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Control ids in creation order: main grid row-major, then subgrids.
    pub fn ids(&self) -> Vec<String> {
        self.ids.borrow().clone()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.controls.borrow().contains_key(id)
    }

    pub fn control(&self, id: &str) -> Result<Control, FormError> {
        self.controls
            .borrow()
            .get(id)
            .cloned()
            .ok_or_else(|| FormError::UnknownControl(id.to_owned()))
    }

    /// The native widget of control `id`.
    pub fn widget(&self, id: &str) -> Result<WidgetId, FormError> {
        self.control(id).map(|c| c.widget)
    }

    pub fn spec(&self, id: &str) -> Result<WidgetSpec, FormError> {
        self.control(id).map(|c| c.spec)
    }

    /// Name of the handler connected to control `id`, if any.
    pub fn handler(&self, id: &str) -> Option<String> {
        self.controls.borrow().get(id).and_then(|c| c.handler.clone())
    }

    /// The widget of menu command `id`.
    pub fn menu_item(&self, id: &str) -> Option<WidgetId> {
        self.menu_items.get(id).copied()
    }

    /// The translations after building; with recording on, every key the
    /// form looked up is present.
    pub fn translations(&self) -> &Translations {
        &self.translations
    }

    pub fn show(&self) -> Result<(), FormError> {
        Ok(self.toolkit.show(self.window)?)
    }

    pub fn close(&self) -> Result<(), FormError> {
        Ok(self.toolkit.close(self.window)?)
    }

    // -----------------------------------------------------------------------
    // Values
    // -----------------------------------------------------------------------

    /// Current value of control `id`. Placeholders yield their current
    /// widget.
    pub fn value(&self, id: &str) -> Result<Value, FormError> {
        let control = self.control(id)?;
        if control.is_placeholder() {
            return Ok(Value::Widget(control.widget));
        }
        Ok(self.toolkit.get_value(control.widget)?)
    }

    /// Current value of control `id`, converted to `V`.
    pub fn get<V>(&self, id: &str) -> Result<V, FormError>
    where
        V: TryFrom<Value, Error = ValueError>,
    {
        let value = self.value(id)?;
        V::try_from(value).map_err(|e| e.for_control(id).into())
    }

    /// Set the value of control `id`. No handler is called.
    ///
    /// Setting a placeholder to a widget destroys the placeholder's current
    /// widget (and the controls inside it) and puts the new one in its
    /// grid cell.
    pub fn set_value(&self, id: &str, value: impl Into<Value>) -> Result<(), FormError> {
        let control = self.control(id)?;
        let value = coerce(&control.spec, value.into())?;
        match value {
            Value::Widget(widget) if control.is_placeholder() => {
                self.replace_widget(id, &control, widget)
            }
            value => Ok(self.toolkit.set_value(control.widget, value)?),
        }
    }

    fn replace_widget(&self, id: &str, control: &Control, widget: WidgetId) -> Result<(), FormError> {
        if widget == control.widget {
            return Ok(());
        }
        let old = control.widget;
        self.toolkit.destroy(old)?;
        self.toolkit.reparent(widget, control.container)?;
        self.toolkit.place(widget, control.placement)?;

        let mut controls = self.controls.borrow_mut();
        if let Some(c) = controls.get_mut(id) {
            c.widget = widget;
        }
        let mut gone = vec![old];
        while let Some(container) = gone.pop() {
            let inside: Vec<String> = controls
                .iter()
                .filter(|(_, c)| c.container == container)
                .map(|(id, _)| id.clone())
                .collect();
            for inner in inside {
                if let Some(c) = controls.remove(&inner) {
                    debug!(id = %inner, "dropped control of replaced widget");
                    gone.push(c.widget);
                }
            }
        }
        self.ids.borrow_mut().retain(|id| controls.contains_key(id));
        debug!(id, ?old, new = ?widget, "replaced placeholder widget");
        Ok(())
    }
}

impl<T: Toolkit> std::fmt::Debug for Form<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form")
            .field("title", &self.title)
            .field("window", &self.window)
            .field("ids", &self.ids.borrow())
            .finish_non_exhaustive()
    }
}
