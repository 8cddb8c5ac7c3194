//! Observable list and tree model.
//!
//! An [`ObsList`] behaves like an ordered sequence of [`Item`]s and reports
//! every mutation to at most one [`ListListener`], normally the list view
//! that displays it. A list without a listener is *detached*: it still works
//! as a plain sequence and drops its notifications.
//!
//! Column values are projected from items through [`ColumnSource`]s. Setting
//! a children source turns the list into a lazily loaded tree whose child
//! lists share the parent's metadata and listener.

mod binding;
mod item;
mod list;
mod source;

pub use binding::{listener_of, ListBinding};
pub use item::{items_from, Item, ListItem, Record};
pub use list::{ListListener, ObsList, SortInfo};
pub use source::ColumnSource;

pub(crate) use list::same_item;

/// Opaque identifier of a displayed row, handed out by the list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToolkitId(pub u64);

/// Errors produced by list model operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("{0} not found in the list or its loaded children")]
    NotFound(String),
    #[error("list is not displayed by any view")]
    Detached,
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("no column `{0}`")]
    UnknownColumn(String),
    #[error("item has no attribute or key `{0}`")]
    MissingAttribute(String),
    #[error("column `{0}` is read-only")]
    ReadOnlyColumn(String),
    #[error("cannot store into `{name}` of this item")]
    StoreFailed { name: String },
}
