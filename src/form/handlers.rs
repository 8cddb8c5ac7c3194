//! Host handlers, looked up by control id.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::toolkit::Callback;
use crate::value::Value;

/// Named event handlers of the host.
///
/// A control `name` is connected to the handler called exactly `name`, or
/// failing that to `on_name`. Buttons and menu commands receive
/// [`Value::None`], other controls their new value.
#[derive(Clone, Default)]
pub struct Handlers {
    map: BTreeMap<String, Callback>,
}

impl Handlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler (builder).
    pub fn on(mut self, name: impl Into<String>, handler: impl Fn(&Value) + 'static) -> Self {
        self.insert(name, handler);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, handler: impl Fn(&Value) + 'static) {
        self.map.insert(name.into(), Rc::new(handler));
    }

    pub fn get(&self, name: &str) -> Option<Callback> {
        self.map.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    /// The handler for control `id` with the name it was found under.
    pub fn for_control(&self, id: &str) -> Option<(String, Callback)> {
        if let Some(handler) = self.get(id) {
            return Some((id.to_owned(), handler));
        }
        let prefixed = format!("on_{id}");
        self.get(&prefixed).map(|handler| (prefixed, handler))
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.map.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_name_wins_over_prefixed() {
        let handlers = Handlers::new().on("ok", |_| {}).on("on_ok", |_| {}).on("on_cancel", |_| {});
        assert_eq!(handlers.for_control("ok").map(|(n, _)| n).as_deref(), Some("ok"));
        assert_eq!(handlers.for_control("cancel").map(|(n, _)| n).as_deref(), Some("on_cancel"));
        assert!(handlers.for_control("help").is_none());
        assert_eq!(handlers.names().collect::<Vec<_>>(), vec!["ok", "on_cancel", "on_ok"]);
    }
}
