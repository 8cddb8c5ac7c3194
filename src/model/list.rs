//! ObsList: the observable sequence behind list and tree views.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Bound, RangeBounds};
use std::rc::{Rc, Weak};

use tracing::{trace, warn};

use crate::value::Value;

use super::item::Item;
use super::source::ColumnSource;
use super::{ModelError, ToolkitId};

// ---------------------------------------------------------------------------
// Listener
// ---------------------------------------------------------------------------

/// Receiver of list notifications, implemented by list views.
///
/// Notifications are sent after the list has been updated and while no
/// borrow of it is held, so a listener may read the list freely.
pub trait ListListener {
    /// An item was inserted at `index`. Returns the id of the new row.
    fn on_insert(&self, list: &ObsList, index: usize, item: &Item) -> Option<ToolkitId>;

    /// The item of row `toolkit_id` was replaced or mutated.
    fn on_replace(&self, list: &ObsList, toolkit_id: Option<ToolkitId>, item: &Item);

    /// Row `toolkit_id` was removed.
    fn on_remove(&self, list: &ObsList, toolkit_id: Option<ToolkitId>);

    /// The list was reordered; see [`ObsList::sort_info`].
    fn on_sort(&self, list: &ObsList);

    /// The children of a row were (re)loaded into `children`.
    fn on_load_children(&self, children: &ObsList);

    /// Items currently selected in the view.
    fn on_get_selection(&self) -> Vec<Item>;
}

/// The column a list was last sorted by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortInfo {
    pub column: String,
    pub ascending: bool,
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

type ChildrenFn = Rc<dyn Fn(&Item) -> Vec<Item>>;
type HasChildrenFn = Rc<dyn Fn(&Item) -> bool>;

#[derive(Clone)]
pub(crate) struct ChildrenSource {
    children: ChildrenFn,
    has_children: Option<HasChildrenFn>,
}

/// Metadata shared by a list and all of its loaded child lists.
#[derive(Default)]
struct ListMeta {
    keys: Vec<String>,
    sources: BTreeMap<String, ColumnSource>,
    children: Option<ChildrenSource>,
    sort: Option<SortInfo>,
    listener: Option<Weak<dyn ListListener>>,
}

struct Node {
    item: Item,
    toolkit_id: Option<ToolkitId>,
    /// Loaded children; `None` until the node is expanded.
    children: Option<ObsList>,
}

impl Node {
    fn new(item: Item) -> Self {
        Self {
            item,
            toolkit_id: None,
            children: None,
        }
    }
}

struct ListInner {
    nodes: Vec<Node>,
    parent_id: Option<ToolkitId>,
    sorted: bool,
    meta: Rc<RefCell<ListMeta>>,
}

/// Identity comparison of items.
pub(crate) fn same_item(a: &Item, b: &Item) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

// ---------------------------------------------------------------------------
// ObsList
// ---------------------------------------------------------------------------

/// An ordered, observable sequence of items.
///
/// `ObsList` is a shared handle: clones refer to the same list.
#[derive(Clone)]
pub struct ObsList {
    inner: Rc<RefCell<ListInner>>,
}

impl ObsList {
    /// An empty, detached list.
    pub fn new() -> Self {
        Self::from_items(Vec::new())
    }

    /// A detached list holding `items`.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        Self::with_meta(items, Rc::new(RefCell::new(ListMeta::default())), None)
    }

    fn with_meta(
        items: impl IntoIterator<Item = Item>,
        meta: Rc<RefCell<ListMeta>>,
        parent_id: Option<ToolkitId>,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ListInner {
                nodes: items.into_iter().map(Node::new).collect(),
                parent_id,
                sorted: false,
                meta,
            })),
        }
    }

    /// Declare the named columns of this list (builder).
    pub fn with_keys<S: Into<String>>(self, keys: impl IntoIterator<Item = S>) -> Self {
        self.meta().borrow_mut().keys = keys.into_iter().map(Into::into).collect();
        self
    }

    fn meta(&self) -> Rc<RefCell<ListMeta>> {
        self.inner.borrow().meta.clone()
    }

    /// Whether both handles refer to the same list.
    pub fn ptr_eq(&self, other: &ObsList) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // ── Sequence access ──────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.inner.borrow().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Item> {
        self.inner.borrow().nodes.get(index).map(|n| n.item.clone())
    }

    /// A snapshot of the items.
    pub fn items(&self) -> Vec<Item> {
        self.inner.borrow().nodes.iter().map(|n| n.item.clone()).collect()
    }

    /// Position of `item` (by identity) in this list, not searching children.
    pub fn index_of(&self, item: &Item) -> Option<usize> {
        self.inner
            .borrow()
            .nodes
            .iter()
            .position(|n| same_item(&n.item, item))
    }

    /// Keys of the named columns.
    pub fn keys(&self) -> Vec<String> {
        self.meta().borrow().keys.clone()
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Insert `item` at `index`, clamped to the list length. Returns the
    /// actual index.
    pub fn insert(&self, index: usize, item: Item) -> usize {
        let index = {
            let mut inner = self.inner.borrow_mut();
            let index = index.min(inner.nodes.len());
            inner.nodes.insert(index, Node::new(item.clone()));
            inner.sorted = false;
            index
        };
        if let Some(listener) = self.listener() {
            trace!(index, "list insert");
            let toolkit_id = listener.on_insert(self, index, &item);
            let mut inner = self.inner.borrow_mut();
            if let Some(node) = inner.nodes.get_mut(index) {
                if same_item(&node.item, &item) {
                    node.toolkit_id = toolkit_id;
                }
            }
        }
        index
    }

    pub fn push(&self, item: Item) {
        self.insert(usize::MAX, item);
    }

    pub fn extend(&self, items: impl IntoIterator<Item = Item>) {
        for item in items {
            self.push(item);
        }
    }

    /// Replace the item at `index`, collapsing its children. Returns the old
    /// item.
    pub fn set(&self, index: usize, item: Item) -> Result<Item, ModelError> {
        let (old, toolkit_id) = {
            let mut inner = self.inner.borrow_mut();
            let len = inner.nodes.len();
            let node = inner
                .nodes
                .get_mut(index)
                .ok_or(ModelError::IndexOutOfRange { index, len })?;
            let old = std::mem::replace(&mut node.item, item.clone());
            node.children = None;
            let toolkit_id = node.toolkit_id;
            inner.sorted = false;
            (old, toolkit_id)
        };
        if let Some(listener) = self.listener() {
            trace!(index, "list replace");
            listener.on_replace(self, toolkit_id, &item);
        }
        Ok(old)
    }

    /// Remove and return the item at `index`.
    pub fn remove(&self, index: usize) -> Result<Item, ModelError> {
        let node = {
            let mut inner = self.inner.borrow_mut();
            let len = inner.nodes.len();
            if index >= len {
                return Err(ModelError::IndexOutOfRange { index, len });
            }
            inner.nodes.remove(index)
        };
        if let Some(listener) = self.listener() {
            trace!(index, "list remove");
            listener.on_remove(self, node.toolkit_id);
        }
        Ok(node.item)
    }

    /// Replace the items in `range` with `items` (slice assignment). Returns
    /// the removed items.
    pub fn splice(
        &self,
        range: impl RangeBounds<usize>,
        items: impl IntoIterator<Item = Item>,
    ) -> Result<Vec<Item>, ModelError> {
        let len = self.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s + 1,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e + 1,
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        };
        if start > end || end > len {
            return Err(ModelError::IndexOutOfRange { index: end.max(start), len });
        }

        let mut removed = Vec::with_capacity(end - start);
        for _ in start..end {
            removed.push(self.remove(start)?);
        }
        for (offset, item) in items.into_iter().enumerate() {
            self.insert(start + offset, item);
        }
        Ok(removed)
    }

    /// Remove all items.
    pub fn clear(&self) {
        while let Some(last) = self.len().checked_sub(1) {
            let _ = self.remove(last);
        }
    }

    /// Report that `item` (which must be in this list) changed in place. Its
    /// children stay loaded.
    pub fn item_mutated(&self, item: &Item) -> Result<(), ModelError> {
        let (index, toolkit_id) = {
            let mut inner = self.inner.borrow_mut();
            let index = inner
                .nodes
                .iter()
                .position(|n| same_item(&n.item, item))
                .ok_or_else(|| ModelError::NotFound(format!("item {:?}", item.text())))?;
            inner.sorted = false;
            (index, inner.nodes[index].toolkit_id)
        };
        if let Some(listener) = self.listener() {
            trace!(index, "list item mutated");
            listener.on_replace(self, toolkit_id, item);
        }
        Ok(())
    }

    // ── Toolkit ids ──────────────────────────────────────────────────

    pub fn toolkit_id(&self, index: usize) -> Option<ToolkitId> {
        self.inner.borrow().nodes.get(index).and_then(|n| n.toolkit_id)
    }

    /// Record the row id of the item at `index`, for views populating rows
    /// of an existing list.
    pub fn set_toolkit_id(&self, index: usize, toolkit_id: Option<ToolkitId>) {
        if let Some(node) = self.inner.borrow_mut().nodes.get_mut(index) {
            node.toolkit_id = toolkit_id;
        }
    }

    /// Row id of the parent node, for child lists.
    pub fn parent_toolkit_id(&self) -> Option<ToolkitId> {
        self.inner.borrow().parent_id
    }

    // ── Columns ──────────────────────────────────────────────────────

    /// Set column sources. `default` applies to the unnamed text column;
    /// every other column must be one of the list's keys.
    pub fn sources<S: Into<String>>(
        &self,
        default: Option<ColumnSource>,
        columns: impl IntoIterator<Item = (S, ColumnSource)>,
    ) -> Result<(), ModelError> {
        let meta = self.meta();
        let mut meta = meta.borrow_mut();
        let columns: Vec<(String, ColumnSource)> =
            columns.into_iter().map(|(k, s)| (k.into(), s)).collect();
        if let Some((unknown, _)) = columns.iter().find(|(k, _)| !meta.keys.contains(k)) {
            return Err(ModelError::UnknownColumn(unknown.clone()));
        }
        if let Some(default) = default {
            meta.sources.insert(String::new(), default);
        }
        meta.sources.extend(columns);
        Ok(())
    }

    /// Source of `column`: the configured one or the default for the name.
    pub fn source(&self, column: &str) -> Result<ColumnSource, ModelError> {
        let meta = self.meta();
        let meta = meta.borrow();
        if let Some(source) = meta.sources.get(column) {
            return Ok(source.clone());
        }
        if column.is_empty() || meta.keys.iter().any(|k| k == column) {
            Ok(ColumnSource::for_column(column))
        } else {
            Err(ModelError::UnknownColumn(column.to_owned()))
        }
    }

    pub fn retrieve(&self, item: &Item, column: &str) -> Result<Value, ModelError> {
        self.source(column)?.retrieve(item)
    }

    pub fn store(&self, item: &Item, column: &str, value: Value) -> Result<(), ModelError> {
        self.source(column)?.store(item, value, column)
    }

    // ── Tree ─────────────────────────────────────────────────────────

    /// Turn the list into a tree: `children` is called for an item when its
    /// node is expanded. Already loaded children are dropped.
    pub fn children_source(&self, children: impl Fn(&Item) -> Vec<Item> + 'static) {
        self.set_children_source(Some(ChildrenSource {
            children: Rc::new(children),
            has_children: None,
        }));
    }

    /// Decide per item whether it can be expanded. Without it, every item of
    /// a tree is expandable.
    pub fn has_children_source(&self, has_children: impl Fn(&Item) -> bool + 'static) {
        let meta = self.meta();
        if let Some(source) = meta.borrow_mut().children.as_mut() {
            source.has_children = Some(Rc::new(has_children));
        };
    }

    pub(crate) fn children_source_config(&self) -> Option<ChildrenSource> {
        self.meta().borrow().children.clone()
    }

    pub(crate) fn set_children_source(&self, source: Option<ChildrenSource>) {
        self.meta().borrow_mut().children = source;
        self.unload_children();
    }

    pub(crate) fn column_sources(&self) -> BTreeMap<String, ColumnSource> {
        self.meta().borrow().sources.clone()
    }

    pub(crate) fn set_column_sources(&self, sources: BTreeMap<String, ColumnSource>) {
        let meta = self.meta();
        let mut meta = meta.borrow_mut();
        let keys = meta.keys.clone();
        meta.sources = sources
            .into_iter()
            .filter(|(k, _)| k.is_empty() || keys.contains(k))
            .collect();
    }

    /// Whether the node for `item` shows an expander.
    pub fn has_children(&self, item: &Item) -> bool {
        let source = self.children_source_config();
        match source {
            None => false,
            Some(ChildrenSource { has_children: None, .. }) => true,
            Some(ChildrenSource { has_children: Some(f), .. }) => f(item),
        }
    }

    /// (Re)load the children of the item at `index`. The children function
    /// is called on every load; earlier children are discarded.
    ///
    /// Returns `None` if the list has no children source.
    pub fn load_children(&self, index: usize) -> Result<Option<ObsList>, ModelError> {
        let (item, toolkit_id, meta) = {
            let inner = self.inner.borrow();
            let len = inner.nodes.len();
            let node = inner
                .nodes
                .get(index)
                .ok_or(ModelError::IndexOutOfRange { index, len })?;
            (node.item.clone(), node.toolkit_id, inner.meta.clone())
        };
        let Some(source) = meta.borrow().children.clone() else {
            return Ok(None);
        };

        let children = ObsList::with_meta((source.children)(&item), meta, toolkit_id);
        {
            let mut inner = self.inner.borrow_mut();
            match inner.nodes.get_mut(index) {
                Some(node) if same_item(&node.item, &item) => node.children = Some(children.clone()),
                _ => return Err(ModelError::NotFound(format!("item {:?}", item.text()))),
            }
        }
        if let Some(listener) = self.listener() {
            trace!(index, len = children.len(), "list children loaded");
            listener.on_load_children(&children);
        }
        Ok(Some(children))
    }

    /// Children of the item at `index`, loading them if needed.
    pub fn get_children(&self, index: usize) -> Result<Option<ObsList>, ModelError> {
        match self.loaded_children(index) {
            Some(children) => Ok(Some(children)),
            None => self.load_children(index),
        }
    }

    /// Drop all loaded children, so every node is collapsed again.
    pub fn unload_children(&self) {
        for node in &mut self.inner.borrow_mut().nodes {
            node.children = None;
        }
    }

    /// Children of the item at `index` if they are loaded.
    pub fn loaded_children(&self, index: usize) -> Option<ObsList> {
        self.inner
            .borrow()
            .nodes
            .get(index)
            .and_then(|n| n.children.clone())
    }

    // ── Sorting ──────────────────────────────────────────────────────

    /// Sort by the values of `column` and remember the sorting.
    pub fn sort_by_column(&self, column: &str, ascending: bool) -> Result<(), ModelError> {
        let source = self.source(column)?;
        let keys: Vec<Value> = {
            let inner = self.inner.borrow();
            inner
                .nodes
                .iter()
                .map(|n| source.retrieve(&n.item).unwrap_or(Value::None))
                .collect()
        };
        self.reorder(|a, b| {
            let ord = keys[a].sort_cmp(&keys[b]);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });
        self.inner.borrow_mut().sorted = true;
        self.meta().borrow_mut().sort = Some(SortInfo {
            column: column.to_owned(),
            ascending,
        });
        self.notify_sort();
        Ok(())
    }

    /// Sort with a comparison function. Forgets remembered column sorting.
    pub fn sort_by(&self, mut compare: impl FnMut(&Item, &Item) -> Ordering) {
        let items = self.items();
        self.reorder(|a, b| compare(&items[a], &items[b]));
        self.inner.borrow_mut().sorted = false;
        self.meta().borrow_mut().sort = None;
        self.notify_sort();
    }

    /// Re-apply the remembered column sorting. Returns `false` if there is
    /// none.
    pub fn sort_restore(&self) -> Result<bool, ModelError> {
        let info = self.sort_info();
        match info {
            Some(SortInfo { column, ascending }) => {
                self.sort_by_column(&column, ascending)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// The remembered column sorting.
    pub fn sort_info(&self) -> Option<SortInfo> {
        self.meta().borrow().sort.clone()
    }

    /// Whether the list is currently ordered by a column. Any mutation
    /// clears the flag.
    pub fn is_sorted(&self) -> bool {
        self.inner.borrow().sorted
    }

    /// Stable reorder by comparing original positions.
    fn reorder(&self, mut compare: impl FnMut(usize, usize) -> Ordering) {
        let mut inner = self.inner.borrow_mut();
        let mut order: Vec<usize> = (0..inner.nodes.len()).collect();
        order.sort_by(|&a, &b| compare(a, b));
        let mut slots: Vec<Option<Node>> = inner.nodes.drain(..).map(Some).collect();
        inner.nodes = order.into_iter().filter_map(|i| slots[i].take()).collect();
    }

    fn notify_sort(&self) {
        if let Some(listener) = self.listener() {
            trace!("list sorted");
            listener.on_sort(self);
        }
    }

    // ── Lookup ───────────────────────────────────────────────────────

    /// Find `item` by identity in this list and its loaded children.
    pub fn find(&self, item: &Item) -> Result<(ObsList, usize), ModelError> {
        self.find_where(&|n: &Node| same_item(&n.item, item))
            .ok_or_else(|| ModelError::NotFound(format!("item {:?}", item.text())))
    }

    /// Find the item displayed in row `toolkit_id`.
    pub fn find_by_toolkit_id(&self, toolkit_id: ToolkitId) -> Result<(ObsList, usize), ModelError> {
        self.find_where(&|n: &Node| n.toolkit_id == Some(toolkit_id))
            .ok_or_else(|| ModelError::NotFound(format!("toolkit id {}", toolkit_id.0)))
    }

    fn find_where(&self, pred: &dyn Fn(&Node) -> bool) -> Option<(ObsList, usize)> {
        let children: Vec<ObsList> = {
            let inner = self.inner.borrow();
            if let Some(index) = inner.nodes.iter().position(pred) {
                return Some((self.clone(), index));
            }
            inner.nodes.iter().filter_map(|n| n.children.clone()).collect()
        };
        children.iter().find_map(|child| child.find_where(pred))
    }

    // ── View attachment ──────────────────────────────────────────────

    /// Items selected in the attached view.
    pub fn selection(&self) -> Result<Vec<Item>, ModelError> {
        let listener = self.listener().ok_or(ModelError::Detached)?;
        Ok(listener.on_get_selection())
    }

    /// Attach the list (and its loaded children) to `listener`, replacing any
    /// previous one.
    pub fn attach(&self, listener: Weak<dyn ListListener>) {
        self.meta().borrow_mut().listener = Some(listener);
    }

    pub fn detach(&self) {
        self.meta().borrow_mut().listener = None;
    }

    pub fn is_attached(&self) -> bool {
        self.listener().is_some()
    }

    /// Whether `listener` is the one this list reports to.
    pub fn is_attached_to(&self, listener: &Weak<dyn ListListener>) -> bool {
        self.meta()
            .borrow()
            .listener
            .as_ref()
            .is_some_and(|l| Weak::ptr_eq(l, listener))
    }

    fn listener(&self) -> Option<Rc<dyn ListListener>> {
        let meta = self.meta();
        let weak = meta.borrow().listener.clone()?;
        match weak.upgrade() {
            Some(listener) => Some(listener),
            None => {
                warn!("list view is gone, detaching list");
                meta.borrow_mut().listener = None;
                None
            }
        }
    }
}

impl Default for ObsList {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObsList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ObsList")
            .field("items", &inner.nodes.iter().map(|n| n.item.text()).collect::<Vec<_>>())
            .field("sorted", &inner.sorted)
            .finish()
    }
}

impl FromIterator<Item> for ObsList {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self::from_items(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::{items_from, Record};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    /// Records notifications as text.
    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<String>>,
        next_id: Cell<u64>,
        selection: RefCell<Vec<Item>>,
    }

    impl Recorder {
        fn attach(list: &ObsList) -> Rc<Recorder> {
            let recorder = Rc::new(Recorder::default());
            let weak: Weak<dyn ListListener> = Rc::downgrade(&recorder) as Weak<dyn ListListener>;
            list.attach(weak);
            recorder
        }

        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.events.borrow_mut())
        }
    }

    impl ListListener for Recorder {
        fn on_insert(&self, list: &ObsList, index: usize, item: &Item) -> Option<ToolkitId> {
            let id = self.next_id.get() + 1;
            self.next_id.set(id);
            let parent = list.parent_toolkit_id().map(|p| p.0);
            self.events
                .borrow_mut()
                .push(format!("insert {index} {} parent={parent:?} -> {id}", item.text()));
            Some(ToolkitId(id))
        }

        fn on_replace(&self, _list: &ObsList, toolkit_id: Option<ToolkitId>, item: &Item) {
            let id = toolkit_id.map(|t| t.0);
            self.events.borrow_mut().push(format!("replace {id:?} {}", item.text()));
        }

        fn on_remove(&self, _list: &ObsList, toolkit_id: Option<ToolkitId>) {
            let id = toolkit_id.map(|t| t.0);
            self.events.borrow_mut().push(format!("remove {id:?}"));
        }

        fn on_sort(&self, list: &ObsList) {
            let texts: Vec<String> = list.items().iter().map(|i| i.text()).collect();
            self.events.borrow_mut().push(format!("sort {}", texts.join(",")));
        }

        fn on_load_children(&self, children: &ObsList) {
            let parent = children.parent_toolkit_id().map(|p| p.0);
            self.events
                .borrow_mut()
                .push(format!("children of {parent:?}: {}", children.len()));
        }

        fn on_get_selection(&self) -> Vec<Item> {
            self.selection.borrow().clone()
        }
    }

    fn texts(list: &ObsList) -> Vec<String> {
        list.items().iter().map(|i| i.text()).collect()
    }

    // ── Notifications ────────────────────────────────────────────────

    #[test]
    fn push_emits_exactly_one_insert() {
        let list = ObsList::from_items(items_from(["a", "b"]));
        let rec = Recorder::attach(&list);
        list.push(Rc::new(String::from("c")));
        assert_eq!(rec.take(), vec!["insert 2 c parent=None -> 1"]);
        assert_eq!(list.toolkit_id(2), Some(ToolkitId(1)));
    }

    #[test]
    fn detached_list_is_silent() {
        let list = ObsList::new();
        let rec = Recorder::attach(&list);
        list.detach();
        list.push(Rc::new(String::from("a")));
        list.remove(0).unwrap();
        assert!(rec.take().is_empty());
        assert!(!list.is_attached());
    }

    #[test]
    fn dropped_listener_detaches() {
        let list = ObsList::new();
        drop(Recorder::attach(&list));
        list.push(Rc::new(String::from("a")));
        assert!(!list.is_attached());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn insert_is_clamped() {
        let list = ObsList::from_items(items_from(["a"]));
        assert_eq!(list.insert(10, Rc::new(String::from("b"))), 1);
        assert_eq!(texts(&list), vec!["a", "b"]);
    }

    #[test]
    fn set_remove_and_mutate() {
        let list = ObsList::new();
        let rec = Recorder::attach(&list);
        list.extend(items_from(["a", "b"]));
        rec.take();

        let old = list.set(0, Rc::new(String::from("x"))).unwrap();
        assert_eq!(old.text(), "a");
        let removed = list.remove(1).unwrap();
        assert_eq!(removed.text(), "b");
        let x = list.get(0).unwrap();
        list.item_mutated(&x).unwrap();
        assert_eq!(
            rec.take(),
            vec!["replace Some(1) x", "remove Some(2)", "replace Some(1) x"]
        );
    }

    #[test]
    fn out_of_range() {
        let list = ObsList::new();
        assert_eq!(
            list.remove(0).unwrap_err(),
            ModelError::IndexOutOfRange { index: 0, len: 0 }
        );
        assert!(list.set(3, Rc::new(String::from("x"))).is_err());
    }

    #[test]
    fn splice_replaces_range() {
        let list = ObsList::from_items(items_from(["a", "b", "c", "d"]));
        let rec = Recorder::attach(&list);
        let removed = list.splice(1..3, items_from(["x"])).unwrap();
        assert_eq!(removed.iter().map(|i| i.text()).collect::<Vec<_>>(), vec!["b", "c"]);
        assert_eq!(texts(&list), vec!["a", "x", "d"]);
        assert_eq!(
            rec.take(),
            vec!["remove None", "remove None", "insert 1 x parent=None -> 1"]
        );
        assert!(list.splice(2..9, Vec::new()).is_err());
    }

    #[test]
    fn clear_removes_all() {
        let list = ObsList::from_items(items_from(["a", "b"]));
        let rec = Recorder::attach(&list);
        list.clear();
        assert!(list.is_empty());
        assert_eq!(rec.take().len(), 2);
    }

    // ── Columns ──────────────────────────────────────────────────────

    #[test]
    fn sources_validate_columns() {
        let list = ObsList::new().with_keys(["age"]);
        assert!(list.sources(None, [("age", ColumnSource::key("years"))]).is_ok());
        assert_eq!(
            list.sources(None, [("height", ColumnSource::Text)]).unwrap_err(),
            ModelError::UnknownColumn("height".into())
        );
        let item = Record::new("Ann").with("years", 7_i64).into_item();
        assert_eq!(list.retrieve(&item, "age").unwrap(), Value::Int(7));
        assert_eq!(list.retrieve(&item, "").unwrap(), Value::Text("Ann".into()));
        assert!(list.retrieve(&item, "nope").is_err());
    }

    // ── Tree ─────────────────────────────────────────────────────────

    #[test]
    fn children_are_loaded_lazily_every_time() {
        let calls = Rc::new(Cell::new(0));
        let list = ObsList::from_items(items_from(["root"]));
        let counter = calls.clone();
        list.children_source(move |item| {
            counter.set(counter.get() + 1);
            items_from([format!("{}.1", item.text()), format!("{}.2", item.text())])
        });
        let rec = Recorder::attach(&list);
        list.set_toolkit_id(0, Some(ToolkitId(42)));
        assert_eq!(calls.get(), 0);

        let children = list.load_children(0).unwrap().unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(texts(&children), vec!["root.1", "root.2"]);
        assert_eq!(children.parent_toolkit_id(), Some(ToolkitId(42)));
        assert_eq!(rec.take(), vec!["children of Some(42): 2"]);

        assert!(list.get_children(0).unwrap().unwrap().ptr_eq(&children));
        assert_eq!(calls.get(), 1);

        let again = list.load_children(0).unwrap().unwrap();
        assert_eq!(calls.get(), 2);
        assert!(!again.ptr_eq(&children));
    }

    #[test]
    fn has_children_defaults() {
        let list = ObsList::from_items(items_from(["a", "bb"]));
        let a = list.get(0).unwrap();
        assert!(!list.has_children(&a));
        list.children_source(|_| Vec::new());
        assert!(list.has_children(&a));
        list.has_children_source(|item| item.text().len() > 1);
        assert!(!list.has_children(&a));
        assert!(list.has_children(&list.get(1).unwrap()));
        assert_eq!(ObsList::new().load_children(0).unwrap_err(), ModelError::IndexOutOfRange { index: 0, len: 0 });
    }

    #[test]
    fn child_lists_share_listener() {
        let list = ObsList::from_items(items_from(["a"]));
        list.children_source(|_| items_from(["c"]));
        let rec = Recorder::attach(&list);
        let children = list.load_children(0).unwrap().unwrap();
        rec.take();
        children.push(Rc::new(String::from("d")));
        assert_eq!(rec.take(), vec!["insert 1 d parent=None -> 1"]);
    }

    #[test]
    fn replacing_collapses_children() {
        let list = ObsList::from_items(items_from(["a"]));
        list.children_source(|_| items_from(["c"]));
        list.load_children(0).unwrap();
        assert!(list.loaded_children(0).is_some());
        list.set(0, Rc::new(String::from("b"))).unwrap();
        assert!(list.loaded_children(0).is_none());
    }

    // ── Find ─────────────────────────────────────────────────────────

    #[test]
    fn find_searches_loaded_children() {
        let list = ObsList::from_items(items_from(["a", "b"]));
        list.children_source(|_| items_from(["child"]));
        let children = list.load_children(1).unwrap().unwrap();
        children.set_toolkit_id(0, Some(ToolkitId(7)));

        let child = children.get(0).unwrap();
        let (found, index) = list.find(&child).unwrap();
        assert!(found.ptr_eq(&children));
        assert_eq!(index, 0);

        let (found, index) = list.find_by_toolkit_id(ToolkitId(7)).unwrap();
        assert!(found.ptr_eq(&children));
        assert_eq!(index, 0);

        let stranger: Item = Rc::new(String::from("a"));
        assert!(matches!(list.find(&stranger), Err(ModelError::NotFound(_))));
        assert!(list.find_by_toolkit_id(ToolkitId(99)).is_err());
    }

    // ── Sorting ──────────────────────────────────────────────────────

    #[test]
    fn sort_by_column_reorders_and_notifies_once() {
        let list = ObsList::from_items(items_from(["b", "c", "a"]));
        let rec = Recorder::attach(&list);
        let a = list.get(2).unwrap();

        list.sort_by_column("", true).unwrap();
        assert_eq!(rec.take(), vec!["sort a,b,c"]);
        assert!(list.is_sorted());
        assert_eq!(list.find(&a).unwrap().1, 0);
        assert_eq!(list.sort_info(), Some(SortInfo { column: String::new(), ascending: true }));

        list.sort_by_column("", false).unwrap();
        assert_eq!(texts(&list), vec!["c", "b", "a"]);
        assert_eq!(list.find(&a).unwrap().1, 2);
    }

    #[test]
    fn sort_keeps_toolkit_ids_with_items() {
        let list = ObsList::new();
        let _rec = Recorder::attach(&list);
        list.extend(items_from(["b", "a"]));
        list.sort_by_column("", true).unwrap();
        assert_eq!(list.toolkit_id(0), Some(ToolkitId(2)));
        assert_eq!(list.find_by_toolkit_id(ToolkitId(1)).unwrap().1, 1);
    }

    #[test]
    fn sort_by_function_forgets_column() {
        let list = ObsList::from_items(items_from(["bb", "a", "ccc"]));
        list.sort_by_column("", true).unwrap();
        list.sort_by(|x, y| y.text().len().cmp(&x.text().len()));
        assert_eq!(texts(&list), vec!["ccc", "bb", "a"]);
        assert!(!list.is_sorted());
        assert_eq!(list.sort_info(), None);
        assert!(!list.sort_restore().unwrap());
    }

    #[test]
    fn sort_restore_reapplies() {
        let list = ObsList::from_items(items_from(["b", "a"]));
        list.sort_by_column("", false).unwrap();
        list.push(Rc::new(String::from("c")));
        assert!(!list.is_sorted());
        assert!(list.sort_restore().unwrap());
        assert_eq!(texts(&list), vec!["c", "b", "a"]);
    }

    // ── Selection ────────────────────────────────────────────────────

    #[test]
    fn selection_requires_view() {
        let list = ObsList::from_items(items_from(["a"]));
        assert_eq!(list.selection().unwrap_err(), ModelError::Detached);
        let rec = Recorder::attach(&list);
        rec.selection.borrow_mut().push(list.get(0).unwrap());
        assert_eq!(list.selection().unwrap().len(), 1);
    }
}
