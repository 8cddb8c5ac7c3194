//! Headless list and tree view: a [`ListListener`] keeping rows in sync
//! with an [`ObsList`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, Key, KeyData, SlotMap};
use tracing::{debug, warn};

use crate::model::{listener_of, Item, ListBinding, ListListener, ObsList, ToolkitId};
use crate::spec::ListColumn;
use crate::toolkit::ToolkitError;
use crate::value::Value;

new_key_type! {
    /// A displayed row.
    pub struct RowId;
}

fn toolkit_id(row: RowId) -> ToolkitId {
    ToolkitId(row.data().as_ffi())
}

fn row_id(id: ToolkitId) -> RowId {
    KeyData::from_ffi(id.0).into()
}

struct Row {
    item: Item,
    texts: Vec<String>,
    children: Vec<RowId>,
    expandable: bool,
    expanded: bool,
}

#[derive(Default)]
struct Rows {
    arena: SlotMap<RowId, Row>,
    roots: Vec<RowId>,
    selected: Vec<RowId>,
}

impl Rows {
    fn siblings_mut(&mut self, parent: Option<RowId>) -> Option<&mut Vec<RowId>> {
        match parent {
            None => Some(&mut self.roots),
            Some(p) => self.arena.get_mut(p).map(|row| &mut row.children),
        }
    }

    /// Remove the descendants of `id`, keeping the row.
    fn clear_children(&mut self, id: RowId) {
        let children = match self.arena.get_mut(id) {
            Some(row) => std::mem::take(&mut row.children),
            None => return,
        };
        for child in children {
            self.remove_subtree(child);
        }
    }

    fn remove_subtree(&mut self, id: RowId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(row) = self.arena.remove(current) {
                stack.extend(row.children);
            }
            self.selected.retain(|&s| s != current);
        }
    }

    fn detach(&mut self, id: RowId) {
        self.roots.retain(|&r| r != id);
        for row in self.arena.values_mut() {
            row.children.retain(|&c| c != id);
        }
    }
}

/// One visible row, as returned by [`HeadlessListView::visible_rows`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: ToolkitId,
    pub depth: usize,
    /// `Some(expanded)` for rows that can be expanded.
    pub expander: Option<bool>,
    /// Texts of the unnamed column and each named column.
    pub texts: Vec<String>,
    pub selected: bool,
}

/// A list or tree view displaying one [`ObsList`].
pub struct HeadlessListView {
    me: Weak<HeadlessListView>,
    columns: Vec<ListColumn>,
    first_column_editable: bool,
    binding: RefCell<ListBinding>,
    rows: RefCell<Rows>,
}

impl HeadlessListView {
    pub fn new(columns: Vec<ListColumn>, first_column_editable: bool) -> Rc<Self> {
        let keys = columns.iter().map(|c| c.id.clone()).collect();
        Rc::new_cyclic(|me| Self {
            me: me.clone(),
            columns,
            first_column_editable,
            binding: RefCell::new(ListBinding::new(keys)),
            rows: RefCell::new(Rows::default()),
        })
    }

    pub fn columns(&self) -> &[ListColumn] {
        &self.columns
    }

    /// The displayed list.
    pub fn list(&self) -> ObsList {
        self.binding.borrow().list().clone()
    }

    pub fn set_allow_sorting(&self, allow: bool) {
        self.binding.borrow_mut().allow_sorting = allow;
    }

    /// Show or hide the unnamed column with the item text.
    pub fn set_text_column(&self, shown: bool) {
        self.binding.borrow_mut().text_column = shown;
    }

    pub fn has_text_column(&self) -> bool {
        self.binding.borrow().text_column
    }

    /// Display a list or plain items and rebuild all rows.
    pub fn set_value(&self, value: Value) -> Result<(), ToolkitError> {
        let me = listener_of(&self.me);
        {
            let mut binding = self.binding.borrow_mut();
            match value {
                Value::List(list) => binding.bind(list, me),
                Value::Items(items) => binding.bind_items(items, me),
                _ => {
                    return Err(ToolkitError::Unsupported {
                        kind: "list view",
                        operation: "non-list values",
                    })
                }
            };
        }
        self.rebuild();
        Ok(())
    }

    fn rebuild(&self) {
        let list = self.list();
        let rows: Vec<(Item, Vec<String>, bool)> = list
            .items()
            .into_iter()
            .map(|item| {
                let texts = self.row_texts(&list, &item);
                let expandable = list.has_children(&item);
                (item, texts, expandable)
            })
            .collect();

        // Cleared keys are never reused, so stale toolkit ids stay dead.
        list.unload_children();
        let mut state = self.rows.borrow_mut();
        state.arena.clear();
        state.roots.clear();
        state.selected.clear();
        for (index, (item, texts, expandable)) in rows.into_iter().enumerate() {
            let id = state.arena.insert(Row {
                item,
                texts,
                children: Vec::new(),
                expandable,
                expanded: false,
            });
            state.roots.push(id);
            list.set_toolkit_id(index, Some(toolkit_id(id)));
        }
        debug!(rows = state.roots.len(), "list view rebuilt");
    }

    fn row_texts(&self, list: &ObsList, item: &Item) -> Vec<String> {
        match self.binding.try_borrow() {
            Ok(binding) => binding.row_texts(list, item),
            Err(_) => vec![item.text()],
        }
    }

    // ── Inspection ───────────────────────────────────────────────────

    /// Visible rows in display order; children of collapsed rows are
    /// skipped.
    pub fn visible_rows(&self) -> Vec<RowView> {
        let rows = self.rows.borrow();
        let mut out = Vec::new();
        let mut stack: Vec<(RowId, usize)> = rows.roots.iter().rev().map(|&r| (r, 0)).collect();
        while let Some((id, depth)) = stack.pop() {
            let Some(row) = rows.arena.get(id) else { continue };
            out.push(RowView {
                id: toolkit_id(id),
                depth,
                expander: row.expandable.then_some(row.expanded),
                texts: row.texts.clone(),
                selected: rows.selected.contains(&id),
            });
            if row.expanded {
                stack.extend(row.children.iter().rev().map(|&c| (c, depth + 1)));
            }
        }
        out
    }

    /// Id of the first visible row whose text is `text`.
    pub fn row_by_text(&self, text: &str) -> Option<ToolkitId> {
        self.visible_rows()
            .into_iter()
            .find(|r| r.texts.first().is_some_and(|t| t == text))
            .map(|r| r.id)
    }

    // ── User actions ─────────────────────────────────────────────────

    /// Expand a row, (re)loading its children.
    pub fn expand(&self, row: ToolkitId) -> Result<(), ToolkitError> {
        let (list, index) = self.list().find_by_toolkit_id(row)?;
        list.load_children(index)?;
        Ok(())
    }

    pub fn collapse(&self, row: ToolkitId) {
        let mut rows = self.rows.borrow_mut();
        let id = row_id(row);
        rows.clear_children(id);
        if let Some(r) = rows.arena.get_mut(id) {
            r.expanded = false;
        }
    }

    /// Replace the selection. Returns the selected items.
    pub fn select(&self, selection: &[ToolkitId]) -> Vec<Item> {
        let mut rows = self.rows.borrow_mut();
        let selected: Vec<RowId> = selection
            .iter()
            .map(|&t| row_id(t))
            .filter(|&r| rows.arena.contains_key(r))
            .collect();
        rows.selected = selected;
        rows.selected
            .iter()
            .filter_map(|&r| rows.arena.get(r).map(|row| row.item.clone()))
            .collect()
    }

    pub fn click_heading(&self, column: &str) -> Result<(), ToolkitError> {
        let binding = self.binding.borrow();
        binding.heading_clicked(column)?;
        Ok(())
    }

    /// Edit a cell of an editable column, storing `text` into the item.
    pub fn edit_cell(&self, row: ToolkitId, column: &str, text: &str) -> Result<(), ToolkitError> {
        let editable = if column.is_empty() {
            self.first_column_editable && self.has_text_column()
        } else {
            self.columns.iter().any(|c| c.id == column && c.editable)
        };
        if !editable {
            return Err(ToolkitError::Unsupported {
                kind: "read-only column",
                operation: "cell editing",
            });
        }
        let (list, index) = self.list().find_by_toolkit_id(row)?;
        let item = list.get(index).ok_or_else(|| {
            ToolkitError::Model(crate::model::ModelError::NotFound(format!("row {}", row.0)))
        })?;
        let binding = self.binding.borrow();
        binding.store(&item, column, Value::Text(text.to_owned()))?;
        Ok(())
    }
}

impl ListListener for HeadlessListView {
    fn on_insert(&self, list: &ObsList, index: usize, item: &Item) -> Option<ToolkitId> {
        let texts = self.row_texts(list, item);
        let expandable = list.has_children(item);
        let parent = list.parent_toolkit_id().map(row_id);
        let Ok(mut rows) = self.rows.try_borrow_mut() else {
            warn!(index, "list view busy, insert dropped");
            return None;
        };
        let id = rows.arena.insert(Row {
            item: item.clone(),
            texts,
            children: Vec::new(),
            expandable,
            expanded: false,
        });
        match rows.siblings_mut(parent) {
            Some(siblings) => {
                let at = index.min(siblings.len());
                siblings.insert(at, id);
                Some(toolkit_id(id))
            }
            None => {
                warn!(index, "parent row is gone, insert dropped");
                rows.arena.remove(id);
                None
            }
        }
    }

    fn on_replace(&self, list: &ObsList, toolkit_id: Option<ToolkitId>, item: &Item) {
        let Some(id) = toolkit_id.map(row_id) else { return };
        let texts = self.row_texts(list, item);
        let expandable = list.has_children(item);
        let collapsed = list
            .index_of(item)
            .and_then(|i| list.loaded_children(i))
            .is_none();
        let Ok(mut rows) = self.rows.try_borrow_mut() else {
            warn!("list view busy, replace dropped");
            return;
        };
        if collapsed {
            rows.clear_children(id);
        }
        if let Some(row) = rows.arena.get_mut(id) {
            row.item = item.clone();
            row.texts = texts;
            row.expandable = expandable;
            row.expanded &= !collapsed;
        }
    }

    fn on_remove(&self, _list: &ObsList, toolkit_id: Option<ToolkitId>) {
        let Some(id) = toolkit_id.map(row_id) else { return };
        let Ok(mut rows) = self.rows.try_borrow_mut() else {
            warn!("list view busy, remove dropped");
            return;
        };
        rows.detach(id);
        rows.remove_subtree(id);
    }

    fn on_sort(&self, list: &ObsList) {
        let parent = list.parent_toolkit_id().map(row_id);
        let order: Vec<RowId> = (0..list.len())
            .filter_map(|i| list.toolkit_id(i))
            .map(row_id)
            .collect();
        let Ok(mut rows) = self.rows.try_borrow_mut() else {
            warn!("list view busy, sort dropped");
            return;
        };
        let order: Vec<RowId> = order.into_iter().filter(|&r| rows.arena.contains_key(r)).collect();
        if let Some(siblings) = rows.siblings_mut(parent) {
            *siblings = order;
        }
    }

    fn on_load_children(&self, children: &ObsList) {
        let Some(parent) = children.parent_toolkit_id().map(row_id) else {
            warn!("children loaded for a row that is not displayed");
            return;
        };
        let new_rows: Vec<(Item, Vec<String>, bool)> = children
            .items()
            .into_iter()
            .map(|item| {
                let texts = self.row_texts(children, &item);
                let expandable = children.has_children(&item);
                (item, texts, expandable)
            })
            .collect();
        let Ok(mut rows) = self.rows.try_borrow_mut() else {
            warn!("list view busy, children dropped");
            return;
        };
        if !rows.arena.contains_key(parent) {
            return;
        }
        rows.clear_children(parent);
        let mut ids = Vec::with_capacity(new_rows.len());
        for (index, (item, texts, expandable)) in new_rows.into_iter().enumerate() {
            let id = rows.arena.insert(Row {
                item,
                texts,
                children: Vec::new(),
                expandable,
                expanded: false,
            });
            children.set_toolkit_id(index, Some(toolkit_id(id)));
            ids.push(id);
        }
        if let Some(row) = rows.arena.get_mut(parent) {
            row.children = ids;
            row.expanded = true;
        }
    }

    fn on_get_selection(&self) -> Vec<Item> {
        let rows = self.rows.borrow();
        rows.selected
            .iter()
            .filter_map(|&r| rows.arena.get(r).map(|row| row.item.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{items_from, Record};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    fn texts(view: &HeadlessListView) -> Vec<String> {
        view.visible_rows()
            .iter()
            .map(|r| format!("{}{}", "  ".repeat(r.depth), r.texts.join("|")))
            .collect()
    }

    fn age_column() -> Vec<ListColumn> {
        vec![ListColumn { id: "age".into(), text: "Age".into(), editable: true }]
    }

    #[test]
    fn mutations_update_rows() {
        let view = HeadlessListView::new(Vec::new(), false);
        view.set_value(Value::Items(items_from(["a", "b"]))).unwrap();
        let list = view.list();
        list.push(Rc::new(String::from("c")));
        list.set(0, Rc::new(String::from("x"))).unwrap();
        list.remove(1).unwrap();
        assert_eq!(texts(&view), vec!["x", "c"]);
    }

    #[test]
    fn rebinding_moves_list_between_views() {
        let first = HeadlessListView::new(Vec::new(), false);
        let second = HeadlessListView::new(Vec::new(), false);
        let list = ObsList::from_items(items_from(["a"]));
        first.set_value(Value::List(list.clone())).unwrap();
        second.set_value(Value::List(list.clone())).unwrap();
        first.set_value(Value::Items(Vec::new())).unwrap();
        list.push(Rc::new(String::from("b")));
        assert_eq!(texts(&second), vec!["a", "b"]);
        assert!(texts(&first).is_empty());
    }

    #[test]
    fn expand_and_collapse_tree() {
        let calls = Rc::new(Cell::new(0));
        let view = HeadlessListView::new(Vec::new(), false);
        let list = ObsList::from_items(items_from(["root"]));
        let counter = calls.clone();
        list.children_source(move |item| {
            counter.set(counter.get() + 1);
            items_from([format!("{}/a", item.text())])
        });
        view.set_value(Value::List(list)).unwrap();
        let root = view.row_by_text("root").unwrap();
        assert_eq!(view.visible_rows()[0].expander, Some(false));

        view.expand(root).unwrap();
        assert_eq!(texts(&view), vec!["root", "  root/a"]);
        let child = view.row_by_text("root/a").unwrap();
        view.expand(child).unwrap();
        assert_eq!(texts(&view), vec!["root", "  root/a", "    root/a/a"]);
        assert_eq!(calls.get(), 2);

        view.collapse(root);
        assert_eq!(texts(&view), vec!["root"]);
        view.expand(root).unwrap();
        assert_eq!(calls.get(), 3);
        assert_eq!(texts(&view), vec!["root", "  root/a"]);
    }

    #[test]
    fn rebinding_forgets_expanded_children() {
        let view = HeadlessListView::new(Vec::new(), false);
        let list = ObsList::from_items(items_from(["a", "b"]));
        list.children_source(|item| items_from([format!("{}/x", item.text())]));
        view.set_value(Value::List(list.clone())).unwrap();
        let old_a = view.row_by_text("a").unwrap();
        view.expand(old_a).unwrap();
        let old_child = view.row_by_text("a/x").unwrap();

        view.set_value(Value::List(list.clone())).unwrap();
        assert!(list.loaded_children(0).is_none());
        assert!(list.find_by_toolkit_id(old_child).is_err());
        assert!(view.expand(old_a).is_err());

        let b = view.row_by_text("b").unwrap();
        view.expand(b).unwrap();
        let child = view.row_by_text("b/x").unwrap();
        let (found, index) = list.find_by_toolkit_id(child).unwrap();
        assert_eq!(found.get(index).unwrap().text(), "b/x");
        assert_eq!(texts(&view), vec!["a", "b", "  b/x"]);
    }

    #[test]
    fn heading_click_sorts_rows() {
        let view = HeadlessListView::new(age_column(), false);
        let items = vec![
            Record::new("Ann").with("age", 40_i64).into_item(),
            Record::new("Bob").with("age", 20_i64).into_item(),
        ];
        view.set_value(Value::Items(items)).unwrap();
        view.click_heading("age").unwrap();
        assert_eq!(texts(&view), vec!["Bob|20", "Ann|40"]);
        view.click_heading("age").unwrap();
        assert_eq!(texts(&view), vec!["Ann|40", "Bob|20"]);
    }

    #[test]
    fn edit_cell_stores_and_refreshes() {
        let view = HeadlessListView::new(age_column(), false);
        let ann = Record::new("Ann").with("age", 40_i64).into_item();
        view.set_value(Value::Items(vec![ann.clone()])).unwrap();
        let row = view.row_by_text("Ann").unwrap();
        view.edit_cell(row, "age", "41").unwrap();
        assert_eq!(ann.attr("age"), Some(Value::Text("41".into())));
        assert_eq!(texts(&view), vec!["Ann|41"]);
        assert!(view.edit_cell(row, "", "x").is_err());
    }

    #[test]
    fn hidden_text_column() {
        let view = HeadlessListView::new(age_column(), true);
        view.set_text_column(false);
        let ann = Record::new("Ann").with("age", 40_i64).into_item();
        view.set_value(Value::Items(vec![ann])).unwrap();
        assert_eq!(texts(&view), vec!["40"]);
        let row = view.row_by_text("40").unwrap();
        assert!(view.edit_cell(row, "", "x").is_err());
    }

    #[test]
    fn selection_round_trips_through_list() {
        let view = HeadlessListView::new(Vec::new(), false);
        view.set_value(Value::Items(items_from(["a", "b"]))).unwrap();
        let b = view.row_by_text("b").unwrap();
        let selected = view.select(&[b]);
        assert_eq!(selected[0].text(), "b");
        assert_eq!(view.list().selection().unwrap()[0].text(), "b");
        assert!(view.visible_rows()[1].selected);
    }
}
