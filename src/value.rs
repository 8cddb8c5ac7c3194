//! Control values and their per-kind coercion.
//!
//! Every control exposes one [`Value`]. Which variants a control accepts
//! depends on its [`WidgetKind`]; [`coerce`] checks (and where harmless,
//! converts) a value before it reaches the toolkit.

use std::cmp::Ordering;
use std::fmt;

use crate::model::{Item, ObsList};
use crate::spec::{WidgetKind, WidgetSpec};
use crate::toolkit::WidgetId;

/// The value of a control or of a list column.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// An observable list, displayed by a list view.
    List(ObsList),
    /// Plain items; a list view wraps them in a new [`ObsList`].
    Items(Vec<Item>),
    /// A native widget handle, the value of a placeholder.
    Widget(WidgetId),
}

impl Value {
    /// Name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Items(_) => "items",
            Value::Widget(_) => "widget",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Total order used for column sorting: none, bools, numbers, texts,
    /// then everything else as equal.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        fn rank(v: &Value) -> u8 {
            match v {
                Value::None => 0,
                Value::Bool(_) => 1,
                Value::Int(_) | Value::Float(_) => 2,
                Value::Text(_) => 3,
                _ => 4,
            }
        }
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => rank(a).cmp(&rank(b)),
            },
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::List(a), Value::List(b)) => a.ptr_eq(b),
            (Value::Items(a), Value::Items(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|(x, y)| crate::model::same_item(x, y))
            }
            (Value::Widget(a), Value::Widget(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(i) => write!(f, "Int({i})"),
            Value::Float(x) => write!(f, "Float({x})"),
            Value::Text(s) => write!(f, "Text({s:?})"),
            Value::List(list) => write!(f, "List({} items)", list.len()),
            Value::Items(items) => write!(f, "Items({} items)", items.len()),
            Value::Widget(id) => write!(f, "Widget({id:?})"),
        }
    }
}

/// Display text of a value, as shown in list cells.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
            Value::List(list) => write!(f, "[{} items]", list.len()),
            Value::Items(items) => write!(f, "[{} items]", items.len()),
            Value::Widget(_) => f.write_str("<widget>"),
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<ObsList> for Value {
    fn from(list: ObsList) -> Self {
        Value::List(list)
    }
}

impl From<Vec<Item>> for Value {
    fn from(items: Vec<Item>) -> Self {
        Value::Items(items)
    }
}

impl From<WidgetId> for Value {
    fn from(id: WidgetId) -> Self {
        Value::Widget(id)
    }
}

/// An incompatible value for a control.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("control `{id}` expects {expected}, got {got}")]
pub struct ValueError {
    /// The control id; empty when the value was not yet tied to a control.
    pub id: String,
    pub expected: &'static str,
    pub got: &'static str,
}

impl ValueError {
    fn new(expected: &'static str, value: &Value) -> Self {
        Self {
            id: String::new(),
            expected,
            got: value.type_name(),
        }
    }

    /// Name the control the value was meant for.
    pub fn for_control(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

macro_rules! try_from_value {
    ($ty:ty, $expected:literal, $($pat:pat => $out:expr),+ $(,)?) => {
        impl TryFrom<Value> for $ty {
            type Error = ValueError;

            fn try_from(value: Value) -> Result<Self, Self::Error> {
                match value {
                    $($pat => Ok($out),)+
                    other => Err(ValueError::new($expected, &other)),
                }
            }
        }
    };
}

try_from_value!(bool, "bool", Value::Bool(b) => b);
try_from_value!(i64, "int", Value::Int(i) => i);
try_from_value!(f64, "number", Value::Float(f) => f, Value::Int(i) => i as f64);
try_from_value!(String, "text", Value::Text(s) => s);
try_from_value!(WidgetId, "widget", Value::Widget(id) => id);
try_from_value!(ObsList, "list", Value::List(list) => list);
try_from_value!(Option<String>, "text or none", Value::Text(s) => Some(s), Value::None => None);

// ---------------------------------------------------------------------------
// Coercion per widget kind
// ---------------------------------------------------------------------------

/// Check `value` against the control described by `spec`.
///
/// Text-like controls also take numbers, which are converted to text.
/// Dropdowns take one of their choices or `None` (no selection).
pub fn coerce(spec: &WidgetSpec, value: Value) -> Result<Value, ValueError> {
    let err = |expected, value: &Value| ValueError::new(expected, value).for_control(&spec.id);
    match &spec.kind {
        WidgetKind::Label
        | WidgetKind::Button
        | WidgetKind::TextField { .. }
        | WidgetKind::Combobox => match value {
            Value::Text(_) => Ok(value),
            Value::Int(_) | Value::Float(_) => Ok(Value::Text(value.to_string())),
            other => Err(err("text", &other)),
        },
        WidgetKind::Dropdown => match &value {
            Value::None => Ok(value),
            Value::Text(text) => match &spec.choices {
                Some(choices) if !choices.contains(text) => Err(err("one of the choices", &value)),
                _ => Ok(value),
            },
            other => Err(err("text or none", other)),
        },
        WidgetKind::Checkbox { .. } | WidgetKind::Radio { .. } => match value {
            Value::Bool(_) => Ok(value),
            other => Err(err("bool", &other)),
        },
        WidgetKind::Slider { .. } => match value {
            Value::Int(_) | Value::Float(_) => Ok(value),
            other => Err(err("number", &other)),
        },
        WidgetKind::ListView { .. } => match value {
            Value::List(_) | Value::Items(_) => Ok(value),
            other => Err(err("list or items", &other)),
        },
        WidgetKind::Placeholder { .. } => match value {
            Value::Widget(_) => Ok(value),
            other => Err(err("widget", &other)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::items_from;
    use crate::spec::Number;

    fn spec(kind: WidgetKind) -> WidgetSpec {
        WidgetSpec::new(kind, "ctl", "")
    }

    #[test]
    fn text_controls_stringify_numbers() {
        let field = spec(WidgetKind::TextField { multiline: false });
        assert_eq!(coerce(&field, Value::Int(3)).unwrap(), Value::Text("3".into()));
        assert_eq!(coerce(&field, "x".into()).unwrap(), Value::Text("x".into()));
        let err = coerce(&field, Value::Bool(true)).unwrap_err();
        assert_eq!(
            err,
            ValueError { id: "ctl".into(), expected: "text", got: "bool" }
        );
        assert_eq!(err.to_string(), "control `ctl` expects text, got bool");
    }

    #[test]
    fn dropdown_takes_choices_or_none() {
        let dropdown = spec(WidgetKind::Dropdown).with_choices(vec!["a".into(), "b".into()]);
        assert!(coerce(&dropdown, "a".into()).is_ok());
        assert!(coerce(&dropdown, Value::None).is_ok());
        assert_eq!(coerce(&dropdown, "z".into()).unwrap_err().expected, "one of the choices");
    }

    #[test]
    fn flags_sliders_lists_placeholders() {
        let check = spec(WidgetKind::Checkbox { checked: false });
        assert!(coerce(&check, Value::Bool(true)).is_ok());
        assert!(coerce(&check, Value::Int(1)).is_err());

        let slider = spec(WidgetKind::Slider { min: Number::Int(0), max: Number::Int(9) });
        assert!(coerce(&slider, Value::Float(2.5)).is_ok());
        assert!(coerce(&slider, "2".into()).is_err());

        let list = spec(WidgetKind::ListView { columns: Vec::new(), first_column_editable: false });
        assert!(coerce(&list, Value::Items(items_from(["a"]))).is_ok());
        assert_eq!(coerce(&list, Value::None).unwrap_err().got, "none");

        let panel = spec(WidgetKind::Placeholder { framed: false });
        assert_eq!(coerce(&panel, Value::Bool(true)).unwrap_err().expected, "widget");
    }

    #[test]
    fn typed_conversions() {
        assert!(bool::try_from(Value::Bool(true)).unwrap());
        assert_eq!(f64::try_from(Value::Int(2)).unwrap(), 2.0);
        assert_eq!(Option::<String>::try_from(Value::None).unwrap(), None);
        assert_eq!(String::try_from(Value::Int(1)).unwrap_err().expected, "text");
    }

    #[test]
    fn sort_order() {
        let mut values = vec![
            Value::Text("b".into()),
            Value::Int(3),
            Value::None,
            Value::Float(1.5),
            Value::Text("a".into()),
        ];
        values.sort_by(Value::sort_cmp);
        assert_eq!(
            values,
            vec![
                Value::None,
                Value::Float(1.5),
                Value::Int(3),
                Value::Text("a".into()),
                Value::Text("b".into()),
            ]
        );
    }

    #[test]
    fn list_equality_is_identity() {
        let a = ObsList::new();
        assert_eq!(Value::List(a.clone()), Value::List(a));
        assert_ne!(Value::List(ObsList::new()), Value::List(ObsList::new()));
    }
}
