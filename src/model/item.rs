//! List items.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::value::Value;

/// An object displayed as one row of a list or tree view.
///
/// `attr` and `key` correspond to the two ways a column can read an item:
/// by attribute name or by subscript key. The setters return `false` if the
/// item does not accept the value.
pub trait ListItem: fmt::Debug {
    /// Text of the default (unnamed) column.
    fn text(&self) -> String;

    fn attr(&self, _name: &str) -> Option<Value> {
        None
    }

    fn key(&self, _key: &str) -> Option<Value> {
        None
    }

    fn set_attr(&self, _name: &str, _value: Value) -> bool {
        false
    }

    fn set_key(&self, _key: &str, _value: Value) -> bool {
        false
    }
}

/// Shared handle to a list item. Items are compared by identity.
pub type Item = Rc<dyn ListItem>;

impl ListItem for String {
    fn text(&self) -> String {
        self.clone()
    }
}

impl ListItem for &'static str {
    fn text(&self) -> String {
        (*self).to_owned()
    }
}

impl ListItem for i64 {
    fn text(&self) -> String {
        self.to_string()
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// A ready-made item with a display text and named fields.
///
/// Fields are readable and writable both as attributes and as keys.
#[derive(Debug, Default)]
pub struct Record {
    text: RefCell<String>,
    fields: RefCell<BTreeMap<String, Value>>,
}

impl Record {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: RefCell::new(text.into()),
            fields: RefCell::new(BTreeMap::new()),
        }
    }

    /// Set a field (builder).
    pub fn with(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.borrow_mut().insert(name.into(), value.into());
        self
    }

    /// Wrap into a shared [`Item`].
    pub fn into_item(self) -> Item {
        Rc::new(self)
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.fields.borrow().get(name).cloned()
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.borrow_mut().insert(name.into(), value.into());
    }

    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.borrow_mut() = text.into();
    }
}

impl ListItem for Record {
    fn text(&self) -> String {
        self.text.borrow().clone()
    }

    fn attr(&self, name: &str) -> Option<Value> {
        self.get(name)
    }

    fn key(&self, key: &str) -> Option<Value> {
        self.get(key)
    }

    fn set_attr(&self, name: &str, value: Value) -> bool {
        self.set(name, value);
        true
    }

    fn set_key(&self, key: &str, value: Value) -> bool {
        self.set(key, value);
        true
    }
}

/// Wrap plain strings into items.
pub fn items_from<I, S>(texts: I) -> Vec<Item>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    texts
        .into_iter()
        .map(|s| Rc::new(s.into()) as Item)
        .collect()
}
