//! The list a list view displays, and the view-side operations on it.

use std::rc::Weak;

use tracing::{debug, warn};

use super::item::Item;
use super::list::{ListListener, ObsList};
use super::ModelError;
use crate::value::Value;

/// Owned by a list view: the column keys, the current list and sorting
/// policy.
#[derive(Debug)]
pub struct ListBinding {
    keys: Vec<String>,
    list: ObsList,
    /// Heading clicks sort the list.
    pub allow_sorting: bool,
    /// The unnamed column showing the item text is displayed.
    pub text_column: bool,
}

impl ListBinding {
    /// A binding showing an empty, detached list with the given column keys.
    pub fn new(keys: Vec<String>) -> Self {
        let list = ObsList::new().with_keys(keys.clone());
        Self {
            keys,
            list,
            allow_sorting: true,
            text_column: true,
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn list(&self) -> &ObsList {
        &self.list
    }

    /// Display `list`. The previous list is detached if it still reports to
    /// `listener`, and returned.
    pub fn bind(&mut self, list: ObsList, listener: Weak<dyn ListListener>) -> ObsList {
        if !list.ptr_eq(&self.list) && self.list.is_attached_to(&listener) {
            self.list.detach();
        }
        let mut keys = list.keys();
        if keys.is_empty() {
            keys = self.keys.clone();
        }
        let list = list.with_keys(keys);
        list.attach(listener);
        debug!(len = list.len(), "list bound to view");
        std::mem::replace(&mut self.list, list)
    }

    /// Display plain items. The new list inherits the children source and
    /// column sources of the previous one.
    pub fn bind_items(&mut self, items: Vec<Item>, listener: Weak<dyn ListListener>) -> ObsList {
        let list = ObsList::from_items(items).with_keys(self.keys.clone());
        list.set_children_source(self.list.children_source_config());
        list.set_column_sources(self.list.column_sources());
        if let Some(info) = self.list.sort_info() {
            if let Err(err) = list.sort_by_column(&info.column, info.ascending) {
                warn!(column = %info.column, %err, "inherited sort not applied");
            }
        }
        self.bind(list, listener)
    }

    /// Handle a click on the heading of `column`: sort ascending, or toggle
    /// the direction if the list is already sorted by it.
    pub fn heading_clicked(&self, column: &str) -> Result<(), ModelError> {
        if !self.allow_sorting {
            return Ok(());
        }
        let ascending = match self.list.sort_info() {
            Some(info) if info.column == column => !info.ascending,
            _ => true,
        };
        self.list.sort_by_column(column, ascending)
    }

    pub fn sort_restore(&self) -> Result<bool, ModelError> {
        self.list.sort_restore()
    }

    /// Texts of all displayed columns of `item`, the unnamed column first.
    pub fn row_texts(&self, list: &ObsList, item: &Item) -> Vec<String> {
        self.text_column
            .then_some("")
            .into_iter()
            .chain(self.keys.iter().map(String::as_str))
            .map(|column| match list.retrieve(item, column) {
                Ok(value) => value.to_string(),
                Err(_) => String::new(),
            })
            .collect()
    }

    /// Store an edited cell and refresh the row.
    pub fn store(&self, item: &Item, column: &str, value: Value) -> Result<(), ModelError> {
        let (list, _) = self.list.find(item)?;
        list.store(item, column, value)?;
        list.item_mutated(item)
    }

    /// Items selected in the view.
    pub fn selection(&self) -> Result<Vec<Item>, ModelError> {
        self.list.selection()
    }
}

/// Upcast helper for views built with [`std::rc::Rc::new_cyclic`].
pub fn listener_of<L: ListListener + 'static>(view: &Weak<L>) -> Weak<dyn ListListener> {
    view.clone() as Weak<dyn ListListener>
}
