//! Column sources: how a column value is read from (and written to) an item.

use std::fmt;
use std::rc::Rc;

use crate::value::Value;

use super::item::Item;
use super::ModelError;

type Getter = Rc<dyn Fn(&Item) -> Value>;
type Setter = Rc<dyn Fn(&Item, Value) -> bool>;

/// Data source of one list column.
#[derive(Clone)]
pub enum ColumnSource {
    /// The item's display text.
    Text,
    /// An attribute by name, falling back to a key of the same name.
    Attr(String),
    /// A subscript key.
    Key(String),
    /// A computed, read-only value.
    Getter(Getter),
    /// A computed value with a setter, for editable columns.
    Editable { get: Getter, set: Setter },
}

impl ColumnSource {
    pub fn attr(name: impl Into<String>) -> Self {
        ColumnSource::Attr(name.into())
    }

    pub fn key(key: impl Into<String>) -> Self {
        ColumnSource::Key(key.into())
    }

    pub fn getter(f: impl Fn(&Item) -> Value + 'static) -> Self {
        ColumnSource::Getter(Rc::new(f))
    }

    pub fn editable(
        get: impl Fn(&Item) -> Value + 'static,
        set: impl Fn(&Item, Value) -> bool + 'static,
    ) -> Self {
        ColumnSource::Editable {
            get: Rc::new(get),
            set: Rc::new(set),
        }
    }

    /// Default source of a column: the display text for the unnamed column,
    /// the attribute of the same name otherwise.
    pub fn for_column(column: &str) -> Self {
        if column.is_empty() {
            ColumnSource::Text
        } else {
            ColumnSource::Attr(column.to_owned())
        }
    }

    /// Read the value of this source from `item`.
    pub fn retrieve(&self, item: &Item) -> Result<Value, ModelError> {
        match self {
            ColumnSource::Text => Ok(Value::Text(item.text())),
            ColumnSource::Attr(name) => item
                .attr(name)
                .or_else(|| item.key(name))
                .ok_or_else(|| ModelError::MissingAttribute(name.clone())),
            ColumnSource::Key(key) => item
                .key(key)
                .ok_or_else(|| ModelError::MissingAttribute(key.clone())),
            ColumnSource::Getter(get) | ColumnSource::Editable { get, .. } => Ok(get(item)),
        }
    }

    /// Write `value` into `item`; `column` names the column for errors.
    pub fn store(&self, item: &Item, value: Value, column: &str) -> Result<(), ModelError> {
        let stored = match self {
            ColumnSource::Text | ColumnSource::Getter(_) => {
                return Err(ModelError::ReadOnlyColumn(column.to_owned()))
            }
            ColumnSource::Attr(name) => {
                item.set_attr(name, value.clone()) || item.set_key(name, value)
            }
            ColumnSource::Key(key) => item.set_key(key, value),
            ColumnSource::Editable { set, .. } => set(item, value),
        };
        if stored {
            Ok(())
        } else {
            Err(ModelError::StoreFailed { name: column.to_owned() })
        }
    }
}

impl fmt::Debug for ColumnSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSource::Text => f.write_str("Text"),
            ColumnSource::Attr(name) => f.debug_tuple("Attr").field(name).finish(),
            ColumnSource::Key(key) => f.debug_tuple("Key").field(key).finish(),
            ColumnSource::Getter(_) => f.write_str("Getter(..)"),
            ColumnSource::Editable { .. } => f.write_str("Editable(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::Record;

    fn person() -> Item {
        Record::new("Bob").with("age", 40_i64).into_item()
    }

    #[test]
    fn retrieve_variants() {
        let item = person();
        assert_eq!(ColumnSource::Text.retrieve(&item).unwrap(), Value::Text("Bob".into()));
        assert_eq!(ColumnSource::attr("age").retrieve(&item).unwrap(), Value::Int(40));
        assert_eq!(ColumnSource::key("age").retrieve(&item).unwrap(), Value::Int(40));
        let upper = ColumnSource::getter(|item| Value::Text(item.text().to_uppercase()));
        assert_eq!(upper.retrieve(&item).unwrap(), Value::Text("BOB".into()));
    }

    #[test]
    fn missing_attribute() {
        let err = ColumnSource::attr("height").retrieve(&person()).unwrap_err();
        assert_eq!(err, ModelError::MissingAttribute("height".into()));
    }

    #[test]
    fn default_sources() {
        assert!(matches!(ColumnSource::for_column(""), ColumnSource::Text));
        assert!(matches!(ColumnSource::for_column("age"), ColumnSource::Attr(n) if n == "age"));
    }

    #[test]
    fn store_variants() {
        let item = person();
        ColumnSource::attr("age").store(&item, Value::Int(41), "age").unwrap();
        assert_eq!(item.attr("age"), Some(Value::Int(41)));
        let err = ColumnSource::Text.store(&item, Value::Int(1), "").unwrap_err();
        assert_eq!(err, ModelError::ReadOnlyColumn(String::new()));

        let plain: Item = Rc::new(String::from("x"));
        let err = ColumnSource::attr("a").store(&plain, Value::Int(1), "a").unwrap_err();
        assert_eq!(err, ModelError::StoreFailed { name: "a".into() });
    }
}
