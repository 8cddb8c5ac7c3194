//! Widget grammar: classification of cell text.
//!
//! Patterns are tried in this order, the first match wins:
//!
//! | text                          | widget                    |
//! |-------------------------------|---------------------------|
//! | `[= Text (col1, col2_)]`      | list view                 |
//! | `[Text_ (a, b) v]`            | combobox                  |
//! | `[Text (a, b) v]`             | dropdown                  |
//! | `[id: 0 -+- 100]`             | slider                    |
//! | `[Text__]`                    | multi-line text field     |
//! | `[Text_]`                     | text field                |
//! | `[ ] Text`, `[x] Text`        | checkbox                  |
//! | `( ) Text`, `(x) Text`        | radio button              |
//! | `[Text]`                      | button                    |
//! | `<name>`, `<name: Text>`      | placeholder (framed)      |
//! | `Text`, `.Text`, `id: Text`   | label                     |
//!
//! Except for sliders and labels, the text part may be preceded by an
//! explicit `id:`.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::grid::GridCell;
use crate::i18n::Translations;

use super::id::{derive_id, IdResolver};
use super::{ListColumn, Number, SpecError, WidgetKind, WidgetSpec};

/// Optional `id:` followed by the text, which stops at an opening paren.
const ID_TEXT: &str = r"(?:\s*(?P<id>[a-zA-Z0-9_]+)\s*:)?\s*(?P<text>[^(]*?)\s*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    ListView,
    Combobox,
    Dropdown,
    Slider,
    Multiline,
    TextField,
    Checkbox,
    Radio,
    Button,
    Placeholder,
}

struct Grammar {
    rules: Vec<(Rule, Regex)>,
    label_with_id: Regex,
}

impl Grammar {
    fn new() -> Self {
        let patterns = [
            (Rule::ListView, format!(r"^\[\s*={ID_TEXT}(?:\((?P<columns>.*?)\))?\s*\]")),
            (Rule::Combobox, format!(r"^\[{ID_TEXT}_\s*(?:\((?P<values>.*?)\))?\s+v\s*\]")),
            (Rule::Dropdown, format!(r"^\[{ID_TEXT}(?:\((?P<values>.*?)\))?\s+v\s*\]")),
            (
                Rule::Slider,
                r"^\[\s*(?P<id>[a-zA-Z0-9_]+)\s*:\s*(?P<min>\S+?)\s*-\+-\s*(?P<max>\S+?)\s*\]"
                    .to_owned(),
            ),
            (Rule::Multiline, format!(r"^\[{ID_TEXT}__\s*\]")),
            (Rule::TextField, format!(r"^\[{ID_TEXT}_\s*\]")),
            (Rule::Checkbox, format!(r"^\[(?P<checked> |x)\]\s+{ID_TEXT}$")),
            (Rule::Radio, format!(r"^\((?P<checked> |x)\)\s+{ID_TEXT}$")),
            (Rule::Button, format!(r"^\[{ID_TEXT}\]")),
            (Rule::Placeholder, format!(r"^<{ID_TEXT}>")),
        ];
        let rules = patterns
            .into_iter()
            .map(|(rule, pattern)| {
                let re = Regex::new(&format!("(?s){pattern}"))
                    .expect("widget grammar patterns are valid");
                (rule, re)
            })
            .collect();
        let label_with_id = Regex::new(r"(?s)^\s*(?P<id>[a-zA-Z0-9_]+)\s*:(?P<text>.+)$")
            .expect("label pattern is valid");
        Self { rules, label_with_id }
    }
}

fn grammar() -> &'static Grammar {
    static GRAMMAR: OnceLock<Grammar> = OnceLock::new();
    GRAMMAR.get_or_init(Grammar::new)
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Classifies the cells of one form, sharing id namespace and translations.
pub struct Classifier<'t> {
    ids: IdResolver,
    translations: &'t mut Translations,
    prefix: String,
}

impl<'t> Classifier<'t> {
    pub fn new(translations: &'t mut Translations, prefix: impl Into<String>) -> Self {
        Self {
            ids: IdResolver::new(),
            translations,
            prefix: prefix.into(),
        }
    }

    /// The id resolver, for ids handed out outside the grid (menus).
    pub fn ids(&mut self) -> &mut IdResolver {
        &mut self.ids
    }

    /// Translate `default` under `<prefix><key>`.
    pub fn translate(&mut self, key: &str, default: &str) -> String {
        self.translations.get_prefixed(&self.prefix, key, default)
    }

    /// Classify one non-spacer cell.
    pub fn classify(&mut self, cell: &GridCell) -> Result<WidgetSpec, SpecError> {
        let text = cell.text.as_str();
        let matched = grammar()
            .rules
            .iter()
            .find_map(|(rule, re)| re.captures(text).map(|caps| (*rule, caps)));
        let spec = match matched {
            Some((rule, caps)) => self.build(rule, &caps, cell)?,
            None => self.label(cell)?,
        };
        debug!(
            row = cell.row,
            col = cell.col,
            kind = spec.kind.name(),
            id = %spec.id,
            "classified {:?}",
            text
        );
        Ok(spec)
    }

    fn build(&mut self, rule: Rule, caps: &Captures<'_>, cell: &GridCell) -> Result<WidgetSpec, SpecError> {
        let explicit = caps.name("id").map(|m| m.as_str());
        let text = caps.name("text").map_or("", |m| m.as_str().trim());
        let (row, col) = (cell.row, cell.col);

        let spec = match rule {
            Rule::Slider => {
                let min = bound(caps, "min", cell)?;
                let max = bound(caps, "max", cell)?;
                let id = self.ids.resolve(explicit, "", row, col)?;
                WidgetSpec::new(WidgetKind::Slider { min, max }, id, "")
            }
            Rule::ListView => {
                let (text, first_column_editable) = match text.strip_suffix('_') {
                    Some(stripped) => (stripped.trim_end(), true),
                    None => (text, false),
                };
                let id = self.ids.resolve(explicit, text, row, col)?;
                let columns = caps
                    .name("columns")
                    .map(|m| self.columns(m.as_str(), &id))
                    .unwrap_or_default();
                let text = self.translate(&id, text);
                let kind = WidgetKind::ListView { columns, first_column_editable };
                WidgetSpec::new(kind, id, text)
            }
            Rule::Combobox | Rule::Dropdown => {
                let id = self.ids.resolve(explicit, text, row, col)?;
                let kind = if rule == Rule::Combobox {
                    WidgetKind::Combobox
                } else {
                    WidgetKind::Dropdown
                };
                let text = self.translate(&id, text);
                let spec = WidgetSpec::new(kind, id, text);
                match caps.name("values") {
                    Some(values) => spec.with_choices(split_choices(values.as_str())),
                    None => spec,
                }
            }
            Rule::Placeholder => {
                let framed = explicit.is_some() && !text.is_empty();
                let id = self.ids.resolve(explicit, text, row, col)?;
                let text = self.translate(&id, text);
                WidgetSpec::new(WidgetKind::Placeholder { framed }, id, text)
            }
            Rule::Checkbox | Rule::Radio => {
                let checked = caps.name("checked").is_some_and(|m| m.as_str() == "x");
                let kind = if rule == Rule::Checkbox {
                    WidgetKind::Checkbox { checked }
                } else {
                    WidgetKind::Radio { checked }
                };
                let id = self.ids.resolve(explicit, text, row, col)?;
                let text = self.translate(&id, text);
                WidgetSpec::new(kind, id, text)
            }
            Rule::Multiline | Rule::TextField | Rule::Button => {
                let kind = match rule {
                    Rule::Multiline => WidgetKind::TextField { multiline: true },
                    Rule::TextField => WidgetKind::TextField { multiline: false },
                    _ => WidgetKind::Button,
                };
                let id = self.ids.resolve(explicit, text, row, col)?;
                let text = self.translate(&id, text);
                WidgetSpec::new(kind, id, text)
            }
        };
        Ok(spec)
    }

    fn label(&mut self, cell: &GridCell) -> Result<WidgetSpec, SpecError> {
        let raw = cell.text.as_str();
        let (explicit, text) = match grammar().label_with_id.captures(raw) {
            Some(caps) => (
                caps.name("id").map(|m| m.as_str()),
                caps.name("text").map_or("", |m| m.as_str().trim()),
            ),
            None => (None, raw.strip_prefix('.').unwrap_or(raw).trim()),
        };
        let id = self.ids.resolve_label(explicit, text, cell.row, cell.col)?;
        let text = self.translate(&id, text);
        Ok(WidgetSpec::new(WidgetKind::Label, id, text))
    }

    fn columns(&mut self, raw: &str, list_id: &str) -> Vec<ListColumn> {
        raw.split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                let (text, editable) = match segment.strip_suffix('_') {
                    Some(stripped) => (stripped.trim_end(), true),
                    None => (segment, false),
                };
                let id = derive_id(text);
                let text = self.translate(&format!("{list_id}.{id}"), text);
                ListColumn { id, text, editable }
            })
            .collect()
    }
}

/// Classify a single cell text with a fresh id namespace and no translations.
pub fn classify(text: &str) -> Result<WidgetSpec, SpecError> {
    let mut translations = Translations::new();
    let cell = GridCell {
        row: 0,
        col: 0,
        rowspan: 1,
        colspan: 1,
        row_stretch: 0,
        col_stretch: 0,
        h_align: Default::default(),
        text: crate::grid::cell::normalize(text),
        raw: text.to_owned(),
    };
    Classifier::new(&mut translations, "").classify(&cell)
}

fn split_choices(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|choice| !choice.is_empty())
        .map(str::to_owned)
        .collect()
}

fn bound(caps: &Captures<'_>, name: &str, cell: &GridCell) -> Result<Number, SpecError> {
    let raw = caps.name(name).map_or("", |m| m.as_str());
    Number::parse(raw).ok_or_else(|| SpecError::WidgetSpec {
        text: cell.text.clone(),
        row: cell.row,
        col: cell.col,
        reason: format!("slider bound {raw:?} is not a number"),
    })
}
