//! Headless toolkit.
//!
//! Widgets live in a slotmap arena with parent/child maps, the way a
//! retained DOM keeps its nodes. Nothing is drawn; instead tests simulate
//! user input ([`Headless::click`], [`Headless::enter_text`], ...) which
//! updates widget state and fires the connected callbacks, and inspect the
//! result through [`Headless::display_lines`] and
//! [`Headless::compute_layout`].
//!
//! `Headless` is a cheap handle; clones share the arena.

mod layout;
mod list_view;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use slotmap::{SecondaryMap, SlotMap};
use tracing::debug;

use crate::geometry::Placement;
use crate::model::ToolkitId;
use crate::spec::{Number, Shortcut, WidgetKind, WidgetSpec};
use crate::value::Value;

use super::{Callback, Toolkit, ToolkitError, WidgetId};

pub use list_view::{HeadlessListView, RowId, RowView};

// ---------------------------------------------------------------------------
// Widget state
// ---------------------------------------------------------------------------

#[derive(Clone)]
enum State {
    Window { visible: bool },
    Label,
    Button,
    TextField { multiline: bool, content: String },
    Choice {
        choices: Vec<String>,
        selected: Option<String>,
        editable: bool,
    },
    Checkbox(bool),
    Radio { checked: bool, group: Option<usize> },
    Slider { min: Number, max: Number, value: Value },
    List(Rc<HeadlessListView>),
    Panel { framed: bool },
    Menu,
    MenuCommand { id: String, shortcut: Option<Shortcut> },
}

impl State {
    fn name(&self) -> &'static str {
        match self {
            State::Window { .. } => "window",
            State::Label => "label",
            State::Button => "button",
            State::TextField { .. } => "text field",
            State::Choice { editable: false, .. } => "dropdown",
            State::Choice { editable: true, .. } => "combobox",
            State::Checkbox(_) => "checkbox",
            State::Radio { .. } => "radio button",
            State::Slider { .. } => "slider",
            State::List(_) => "list view",
            State::Panel { .. } => "placeholder",
            State::Menu => "menu",
            State::MenuCommand { .. } => "menu command",
        }
    }

    fn from_spec(spec: &WidgetSpec) -> Self {
        match &spec.kind {
            WidgetKind::Label => State::Label,
            WidgetKind::Button => State::Button,
            WidgetKind::TextField { multiline } => State::TextField {
                multiline: *multiline,
                content: spec.text.clone(),
            },
            WidgetKind::Dropdown => State::Choice {
                choices: spec.choices.clone().unwrap_or_default(),
                selected: None,
                editable: false,
            },
            WidgetKind::Combobox => State::Choice {
                choices: spec.choices.clone().unwrap_or_default(),
                selected: Some(spec.text.clone()),
                editable: true,
            },
            WidgetKind::Checkbox { checked } => State::Checkbox(*checked),
            WidgetKind::Radio { checked } => State::Radio {
                checked: *checked,
                group: None,
            },
            WidgetKind::Slider { min, max } => State::Slider {
                min: *min,
                max: *max,
                value: number_value(*min),
            },
            WidgetKind::ListView {
                columns,
                first_column_editable,
            } => {
                let view = HeadlessListView::new(columns.clone(), *first_column_editable);
                view.set_text_column(!spec.text.is_empty());
                State::List(view)
            }
            WidgetKind::Placeholder { framed } => State::Panel { framed: *framed },
        }
    }
}

fn number_value(n: Number) -> Value {
    match n {
        Number::Int(i) => Value::Int(i),
        Number::Float(f) => Value::Float(f),
    }
}

struct HeadlessWidget {
    text: String,
    state: State,
    placement: Option<Placement>,
    col_stretch: Vec<u32>,
    row_stretch: Vec<u32>,
    callbacks: Vec<Callback>,
}

impl HeadlessWidget {
    fn new(text: impl Into<String>, state: State) -> Self {
        Self {
            text: text.into(),
            state,
            placement: None,
            col_stretch: Vec::new(),
            row_stretch: Vec::new(),
            callbacks: Vec::new(),
        }
    }

    fn unsupported(&self, operation: &'static str) -> ToolkitError {
        ToolkitError::Unsupported {
            kind: self.state.name(),
            operation,
        }
    }
}

// ---------------------------------------------------------------------------
// Arena
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Arena {
    widgets: SlotMap<WidgetId, HeadlessWidget>,
    children: SecondaryMap<WidgetId, Vec<WidgetId>>,
    parent: SecondaryMap<WidgetId, WidgetId>,
    radio_groups: usize,
}

impl Arena {
    fn insert(&mut self, widget: HeadlessWidget) -> WidgetId {
        let id = self.widgets.insert(widget);
        self.children.insert(id, Vec::new());
        id
    }

    fn insert_child(&mut self, parent: WidgetId, widget: HeadlessWidget) -> Result<WidgetId, ToolkitError> {
        if !self.widgets.contains_key(parent) {
            return Err(ToolkitError::UnknownWidget(parent));
        }
        let id = self.insert(widget);
        self.parent.insert(id, parent);
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(id);
        }
        Ok(id)
    }

    fn get(&self, id: WidgetId) -> Result<&HeadlessWidget, ToolkitError> {
        self.widgets.get(id).ok_or(ToolkitError::UnknownWidget(id))
    }

    fn get_mut(&mut self, id: WidgetId) -> Result<&mut HeadlessWidget, ToolkitError> {
        self.widgets.get_mut(id).ok_or(ToolkitError::UnknownWidget(id))
    }

    fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    fn detach(&mut self, id: WidgetId) {
        if let Some(parent) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(parent) {
                siblings.retain(|&c| c != id);
            }
        }
    }

    /// Remove `id` and its descendants.
    fn remove(&mut self, id: WidgetId) -> Result<(), ToolkitError> {
        if !self.widgets.contains_key(id) {
            return Err(ToolkitError::UnknownWidget(id));
        }
        self.detach(id);
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                queue.extend(kids);
            }
            self.parent.remove(current);
            self.widgets.remove(current);
        }
        Ok(())
    }

    fn reparent(&mut self, id: WidgetId, parent: WidgetId) -> Result<(), ToolkitError> {
        self.get(id)?;
        self.get(parent)?;
        self.detach(id);
        self.parent.insert(id, parent);
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(id);
        }
        self.get_mut(id)?.placement = None;
        Ok(())
    }

    /// Check `id` and uncheck the other radios of its group.
    fn select_radio(&mut self, id: WidgetId) {
        let group = match self.widgets.get(id).map(|w| &w.state) {
            Some(State::Radio { group, .. }) => *group,
            _ => return,
        };
        for (other, widget) in self.widgets.iter_mut() {
            if let State::Radio { checked, group: g } = &mut widget.state {
                if other == id {
                    *checked = true;
                } else if group.is_some() && *g == group {
                    *checked = false;
                }
            }
        }
    }

    /// Depth-first search below `root`.
    fn find(&self, root: WidgetId, pred: impl Fn(&HeadlessWidget) -> bool) -> Option<WidgetId> {
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            if self.widgets.get(current).is_some_and(&pred) {
                return Some(current);
            }
            stack.extend(self.children(current).iter().rev());
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Headless
// ---------------------------------------------------------------------------

/// In-memory toolkit.
#[derive(Clone, Default)]
pub struct Headless {
    arena: Rc<RefCell<Arena>>,
}

impl Headless {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Inspection ───────────────────────────────────────────────────

    pub fn contains(&self, id: WidgetId) -> bool {
        self.arena.borrow().widgets.contains_key(id)
    }

    /// Number of live widgets, windows and menus.
    pub fn widget_count(&self) -> usize {
        self.arena.borrow().widgets.len()
    }

    /// Widget type name, e.g. `"button"`.
    pub fn kind(&self, id: WidgetId) -> Result<&'static str, ToolkitError> {
        Ok(self.arena.borrow().get(id)?.state.name())
    }

    /// The caption: label and button text, window title, frame title.
    pub fn text(&self, id: WidgetId) -> Result<String, ToolkitError> {
        Ok(self.arena.borrow().get(id)?.text.clone())
    }

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.arena.borrow().parent.get(id).copied()
    }

    pub fn children(&self, id: WidgetId) -> Vec<WidgetId> {
        self.arena.borrow().children(id).to_vec()
    }

    pub fn placement(&self, id: WidgetId) -> Result<Option<Placement>, ToolkitError> {
        Ok(self.arena.borrow().get(id)?.placement)
    }

    /// Column and row stretch weights of a container.
    pub fn stretch(&self, id: WidgetId) -> Result<(Vec<u32>, Vec<u32>), ToolkitError> {
        let arena = self.arena.borrow();
        let widget = arena.get(id)?;
        Ok((widget.col_stretch.clone(), widget.row_stretch.clone()))
    }

    pub fn is_visible(&self, window: WidgetId) -> Result<bool, ToolkitError> {
        match &self.arena.borrow().get(window)?.state {
            State::Window { visible } => Ok(*visible),
            _ => Ok(true),
        }
    }

    /// Whether a callback is connected to the widget.
    pub fn is_connected(&self, id: WidgetId) -> Result<bool, ToolkitError> {
        Ok(!self.arena.borrow().get(id)?.callbacks.is_empty())
    }

    pub fn list_view(&self, id: WidgetId) -> Result<Rc<HeadlessListView>, ToolkitError> {
        let arena = self.arena.borrow();
        let widget = arena.get(id)?;
        match &widget.state {
            State::List(view) => Ok(view.clone()),
            _ => Err(widget.unsupported("row operations")),
        }
    }

    /// The menu command with `id` below `window`.
    pub fn menu_command(&self, window: WidgetId, id: &str) -> Option<WidgetId> {
        self.arena.borrow().find(window, |w| {
            matches!(&w.state, State::MenuCommand { id: cmd, .. } if cmd == id)
        })
    }

    /// The menu tree below `window`, one line per entry.
    pub fn menu_lines(&self, window: WidgetId) -> Vec<String> {
        let arena = self.arena.borrow();
        let mut lines = Vec::new();
        let mut stack: Vec<(WidgetId, usize)> =
            arena.children(window).iter().rev().map(|&c| (c, 0)).collect();
        while let Some((id, depth)) = stack.pop() {
            let Some(widget) = arena.widgets.get(id) else { continue };
            let indent = "  ".repeat(depth);
            match &widget.state {
                State::Menu => {
                    lines.push(format!("{indent}{} >", widget.text));
                    stack.extend(arena.children(id).iter().rev().map(|&c| (c, depth + 1)));
                }
                State::MenuCommand { shortcut, .. } => match shortcut {
                    Some(s) => lines.push(format!("{indent}{} ({s})", widget.text)),
                    None => lines.push(format!("{indent}{}", widget.text)),
                },
                _ => {}
            }
        }
        lines
    }

    /// What the widget shows, line by line. Containers show nothing except
    /// the title of a framed placeholder.
    pub fn display_lines(&self, id: WidgetId) -> Result<Vec<String>, ToolkitError> {
        Ok(widget_lines(self.arena.borrow().get(id)?))
    }

    // ── User input ───────────────────────────────────────────────────

    fn fire(&self, id: WidgetId, value: Value) {
        let callbacks = match self.arena.borrow().widgets.get(id) {
            Some(widget) => widget.callbacks.clone(),
            None => return,
        };
        debug!(?id, ?value, handlers = callbacks.len(), "event");
        for callback in callbacks {
            callback(&value);
        }
    }

    /// Click a button, menu command, checkbox or radio button.
    pub fn click(&self, id: WidgetId) -> Result<(), ToolkitError> {
        let value = {
            let mut arena = self.arena.borrow_mut();
            if matches!(arena.get(id)?.state, State::Radio { .. }) {
                arena.select_radio(id);
                Value::Bool(true)
            } else {
                let widget = arena.get_mut(id)?;
                match &mut widget.state {
                    State::Button | State::MenuCommand { .. } => Value::None,
                    State::Checkbox(checked) => {
                        *checked = !*checked;
                        Value::Bool(*checked)
                    }
                    _ => return Err(widget.unsupported("clicks")),
                }
            }
        };
        self.fire(id, value);
        Ok(())
    }

    /// Type into a text field or combobox, replacing its text.
    pub fn enter_text(&self, id: WidgetId, text: &str) -> Result<(), ToolkitError> {
        {
            let mut arena = self.arena.borrow_mut();
            let widget = arena.get_mut(id)?;
            match &mut widget.state {
                State::TextField { content, .. } => *content = text.to_owned(),
                State::Choice { selected, editable: true, .. } => *selected = Some(text.to_owned()),
                _ => return Err(widget.unsupported("typing")),
            }
        }
        self.fire(id, Value::Text(text.to_owned()));
        Ok(())
    }

    /// Pick one of the choices of a dropdown or combobox.
    pub fn select_choice(&self, id: WidgetId, choice: &str) -> Result<(), ToolkitError> {
        {
            let mut arena = self.arena.borrow_mut();
            let widget = arena.get_mut(id)?;
            match &mut widget.state {
                State::Choice { choices, selected, .. } => {
                    if !choices.iter().any(|c| c == choice) {
                        return Err(ToolkitError::NoSuchChoice { value: choice.to_owned() });
                    }
                    *selected = Some(choice.to_owned());
                }
                _ => return Err(widget.unsupported("choices")),
            }
        }
        self.fire(id, Value::Text(choice.to_owned()));
        Ok(())
    }

    /// Drag a slider to `position`, clamped to its range.
    pub fn slide(&self, id: WidgetId, position: f64) -> Result<(), ToolkitError> {
        let value = {
            let mut arena = self.arena.borrow_mut();
            let widget = arena.get_mut(id)?;
            match &mut widget.state {
                State::Slider { min, max, value } => {
                    *value = clamp(*min, *max, position);
                    value.clone()
                }
                _ => return Err(widget.unsupported("sliding")),
            }
        };
        self.fire(id, value);
        Ok(())
    }

    pub fn expand_row(&self, list: WidgetId, row: ToolkitId) -> Result<(), ToolkitError> {
        self.list_view(list)?.expand(row)
    }

    pub fn collapse_row(&self, list: WidgetId, row: ToolkitId) -> Result<(), ToolkitError> {
        self.list_view(list)?.collapse(row);
        Ok(())
    }

    /// Select rows; the list's callbacks get the selected items.
    pub fn select_rows(&self, list: WidgetId, rows: &[ToolkitId]) -> Result<(), ToolkitError> {
        let items = self.list_view(list)?.select(rows);
        self.fire(list, Value::Items(items));
        Ok(())
    }

    pub fn click_heading(&self, list: WidgetId, column: &str) -> Result<(), ToolkitError> {
        self.list_view(list)?.click_heading(column)
    }

    pub fn edit_cell(
        &self,
        list: WidgetId,
        row: ToolkitId,
        column: &str,
        text: &str,
    ) -> Result<(), ToolkitError> {
        self.list_view(list)?.edit_cell(row, column, text)
    }
}

fn widget_lines(widget: &HeadlessWidget) -> Vec<String> {
    let text = widget.text.as_str();
    match &widget.state {
        State::Window { .. } | State::Menu | State::MenuCommand { .. } => Vec::new(),
        State::Panel { framed: false } => Vec::new(),
        State::Panel { framed: true } => vec![format!("-- {text} --")],
        State::Label => text.lines().map(str::to_owned).collect(),
        State::Button => vec![format!("[{text}]")],
        State::TextField { multiline: false, content } => vec![format!("[{content}_]")],
        State::TextField { multiline: true, content } => {
            let mut lines: Vec<String> = content.lines().map(|l| format!("[{l}]")).collect();
            while lines.len() < 2 {
                lines.push("[]".to_owned());
            }
            lines
        }
        State::Choice { selected, editable: false, .. } => {
            vec![format!("[{} v]", selected.as_deref().unwrap_or(text))]
        }
        State::Choice { selected, editable: true, .. } => {
            vec![format!("[{}_ v]", selected.as_deref().unwrap_or(""))]
        }
        State::Checkbox(checked) => vec![format!("[{}] {text}", mark(*checked))],
        State::Radio { checked, .. } => vec![format!("({}) {text}", mark(*checked))],
        State::Slider { min, max, value } => vec![format!("[{min} -+- {max}: {value}]")],
        State::List(view) => {
            let mut headings = Vec::new();
            if view.has_text_column() {
                headings.push(text.to_owned());
            }
            headings.extend(view.columns().iter().map(|c| c.text.clone()));
            let mut lines = vec![headings.join(" | ")];
            for row in view.visible_rows() {
                let expander = match row.expander {
                    Some(true) => "- ",
                    Some(false) => "+ ",
                    None => "  ",
                };
                let selected = if row.selected { "*" } else { " " };
                lines.push(format!(
                    "{selected}{}{expander}{}",
                    "  ".repeat(row.depth),
                    row.texts.join(" | ")
                ));
            }
            lines
        }
    }
}

fn mark(checked: bool) -> char {
    if checked {
        'x'
    } else {
        ' '
    }
}

/// Clamp `position` into the slider range. The bounds may be reversed.
fn clamp(min: Number, max: Number, position: f64) -> Value {
    let (a, b) = (min.as_f64(), max.as_f64());
    let clamped = position.clamp(a.min(b), a.max(b));
    match (min, max) {
        (Number::Int(_), Number::Int(_)) => Value::Int(clamped.round() as i64),
        _ => Value::Float(clamped),
    }
}

// ---------------------------------------------------------------------------
// Toolkit
// ---------------------------------------------------------------------------

impl Toolkit for Headless {
    fn create_window(&self, title: &str) -> Result<WidgetId, ToolkitError> {
        let id = self
            .arena
            .borrow_mut()
            .insert(HeadlessWidget::new(title, State::Window { visible: false }));
        debug!(?id, title, "window created");
        Ok(id)
    }

    fn create(&self, parent: WidgetId, spec: &WidgetSpec) -> Result<WidgetId, ToolkitError> {
        let widget = HeadlessWidget::new(spec.text.clone(), State::from_spec(spec));
        let id = self.arena.borrow_mut().insert_child(parent, widget)?;
        debug!(?id, kind = spec.kind.name(), spec_id = %spec.id, "widget created");
        Ok(id)
    }

    fn place(&self, widget: WidgetId, placement: Placement) -> Result<(), ToolkitError> {
        self.arena.borrow_mut().get_mut(widget)?.placement = Some(placement);
        Ok(())
    }

    fn set_stretch(&self, container: WidgetId, columns: &[u32], rows: &[u32]) -> Result<(), ToolkitError> {
        let mut arena = self.arena.borrow_mut();
        let widget = arena.get_mut(container)?;
        match widget.state {
            State::Window { .. } | State::Panel { .. } => {
                widget.col_stretch = columns.to_vec();
                widget.row_stretch = rows.to_vec();
                Ok(())
            }
            _ => Err(widget.unsupported("grid stretch")),
        }
    }

    fn destroy(&self, widget: WidgetId) -> Result<(), ToolkitError> {
        self.arena.borrow_mut().remove(widget)
    }

    fn reparent(&self, widget: WidgetId, parent: WidgetId) -> Result<(), ToolkitError> {
        self.arena.borrow_mut().reparent(widget, parent)
    }

    fn get_value(&self, id: WidgetId) -> Result<Value, ToolkitError> {
        let arena = self.arena.borrow();
        let widget = arena.get(id)?;
        let value = match &widget.state {
            State::Window { .. }
            | State::Label
            | State::Button
            | State::Menu
            | State::MenuCommand { .. } => Value::Text(widget.text.clone()),
            State::TextField { content, .. } => Value::Text(content.clone()),
            State::Choice { selected, .. } => selected.clone().map_or(Value::None, Value::Text),
            State::Checkbox(checked) | State::Radio { checked, .. } => Value::Bool(*checked),
            State::Slider { value, .. } => value.clone(),
            State::List(view) => Value::List(view.list()),
            State::Panel { .. } => Value::Widget(id),
        };
        Ok(value)
    }

    fn set_value(&self, id: WidgetId, value: Value) -> Result<(), ToolkitError> {
        let mut arena = self.arena.borrow_mut();
        let (view, is_radio) = match &arena.get(id)?.state {
            State::List(view) => (Some(view.clone()), false),
            State::Radio { .. } => (None, true),
            _ => (None, false),
        };
        if is_radio && value == Value::Bool(true) {
            arena.select_radio(id);
            return Ok(());
        }
        if let Some(view) = view {
            drop(arena);
            return view.set_value(value);
        }
        let widget = arena.get_mut(id)?;
        match (&mut widget.state, value) {
            (State::Window { .. } | State::Label | State::Button, Value::Text(text)) => {
                widget.text = text;
            }
            (State::TextField { content, .. }, Value::Text(text)) => *content = text,
            (State::Choice { selected, .. }, Value::None) => *selected = None,
            (State::Choice { choices, selected, editable }, Value::Text(text)) => {
                if !*editable && !choices.is_empty() && !choices.contains(&text) {
                    return Err(ToolkitError::NoSuchChoice { value: text });
                }
                *selected = Some(text);
            }
            (State::Checkbox(checked), Value::Bool(b)) => *checked = b,
            (State::Radio { checked, .. }, Value::Bool(b)) => *checked = b,
            (State::Slider { min, max, value }, v @ (Value::Int(_) | Value::Float(_))) => {
                let position = v.as_f64().unwrap_or_default();
                *value = clamp(*min, *max, position);
            }
            _ => return Err(widget.unsupported("this value")),
        }
        Ok(())
    }

    fn connect(&self, id: WidgetId, callback: Callback) -> Result<(), ToolkitError> {
        let mut arena = self.arena.borrow_mut();
        let widget = arena.get_mut(id)?;
        match widget.state {
            State::Window { .. } | State::Label | State::Panel { .. } | State::Menu => {
                Err(widget.unsupported("events"))
            }
            _ => {
                widget.callbacks.push(callback);
                Ok(())
            }
        }
    }

    fn group_radios(&self, radios: &[WidgetId]) -> Result<(), ToolkitError> {
        let mut arena = self.arena.borrow_mut();
        let group = arena.radio_groups;
        arena.radio_groups += 1;
        let mut last_checked = None;
        for &id in radios {
            let widget = arena.get_mut(id)?;
            match &mut widget.state {
                State::Radio { checked, group: g } => {
                    *g = Some(group);
                    if *checked {
                        last_checked = Some(id);
                    }
                }
                _ => return Err(widget.unsupported("radio groups")),
            }
        }
        if let Some(id) = last_checked {
            arena.select_radio(id);
        }
        Ok(())
    }

    fn create_menu(&self, parent: WidgetId, text: &str) -> Result<WidgetId, ToolkitError> {
        let mut arena = self.arena.borrow_mut();
        let host = arena.get(parent)?;
        if !matches!(host.state, State::Window { .. } | State::Menu) {
            return Err(host.unsupported("menus"));
        }
        arena.insert_child(parent, HeadlessWidget::new(text, State::Menu))
    }

    fn add_menu_command(
        &self,
        menu: WidgetId,
        id: &str,
        text: &str,
        shortcut: Option<&Shortcut>,
        callback: Callback,
    ) -> Result<WidgetId, ToolkitError> {
        let mut arena = self.arena.borrow_mut();
        let host = arena.get(menu)?;
        if !matches!(host.state, State::Menu) {
            return Err(host.unsupported("menu commands"));
        }
        let mut command = HeadlessWidget::new(
            text,
            State::MenuCommand {
                id: id.to_owned(),
                shortcut: shortcut.copied(),
            },
        );
        command.callbacks.push(callback);
        arena.insert_child(menu, command)
    }

    fn show(&self, window: WidgetId) -> Result<(), ToolkitError> {
        self.set_visible(window, true)
    }

    fn close(&self, window: WidgetId) -> Result<(), ToolkitError> {
        self.set_visible(window, false)
    }
}

impl Headless {
    fn set_visible(&self, window: WidgetId, visible: bool) -> Result<(), ToolkitError> {
        let mut arena = self.arena.borrow_mut();
        let widget = arena.get_mut(window)?;
        match &mut widget.state {
            State::Window { visible: v } => {
                *v = visible;
                Ok(())
            }
            _ => Err(widget.unsupported("show and close")),
        }
    }
}
