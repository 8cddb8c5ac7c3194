//! Building a form: layout text to live widgets.
//!
//! Everything that can fail on user input (layout parsing, classification,
//! subgrid targets, menu definitions, missing menu handlers) is checked
//! before the first widget is created.

use std::cell::RefCell;
use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::FormError;
use crate::geometry::Placement;
use crate::grid::{self, LayoutError, ParsedGrid};
use crate::spec::{parse_menu, Classifier, MenuEntry, WidgetKind, WidgetSpec};
use crate::toolkit::{Toolkit, WidgetId};

use super::{Control, Form, FormConfig, Handlers};

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

struct PlannedControl {
    spec: WidgetSpec,
    placement: Placement,
}

/// One grid section and the container it goes into.
struct PlannedGrid {
    /// `None` for the window, else the placeholder id.
    target: Option<String>,
    col_stretch: Vec<u32>,
    row_stretch: Vec<u32>,
    controls: Vec<PlannedControl>,
}

fn plan_grid(
    classifier: &mut Classifier<'_>,
    target: Option<String>,
    grid: &ParsedGrid,
) -> Result<PlannedGrid, FormError> {
    let controls = grid
        .controls()
        .map(|cell| {
            Ok(PlannedControl {
                spec: classifier.classify(cell)?,
                placement: cell.placement(),
            })
        })
        .collect::<Result<Vec<_>, FormError>>()?;
    Ok(PlannedGrid {
        target,
        col_stretch: grid.col_stretch.clone(),
        row_stretch: grid.row_stretch.clone(),
        controls,
    })
}

/// Check that subgrid `name` has a placeholder to go into.
fn check_target(planned: &[PlannedGrid], name: &str) -> Result<(), LayoutError> {
    let target = planned
        .iter()
        .flat_map(|g| &g.controls)
        .find(|c| c.spec.id == name);
    match target {
        Some(c) if matches!(c.spec.kind, WidgetKind::Placeholder { .. }) => Ok(()),
        Some(c) => Err(LayoutError::SubgridTarget {
            name: name.to_owned(),
            reason: format!("`{name}` is a {}, not a placeholder", c.spec.kind.name()),
        }),
        None => Err(LayoutError::SubgridTarget {
            name: name.to_owned(),
            reason: "no placeholder with this id".into(),
        }),
    }
}

fn check_menu_handlers(entries: &[MenuEntry], handlers: &Handlers) -> Result<(), FormError> {
    match MenuEntry::command_ids(entries)
        .into_iter()
        .find(|id| handlers.for_control(id).is_none())
    {
        Some(id) => Err(FormError::MissingHandler(id.to_owned())),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

/// Build the form described by `config` on `toolkit`.
///
/// Controls are connected to `handlers` by id (see [`Handlers`]); every
/// menu command needs a handler. Radio buttons of the form form one
/// exclusive group.
pub fn build<T: Toolkit>(
    toolkit: T,
    config: FormConfig,
    handlers: &Handlers,
) -> Result<Form<T>, FormError> {
    let FormConfig {
        title,
        body,
        menu,
        mut translations,
        translation_prefix: prefix,
    } = config;

    let title = translations.get_prefixed(&prefix, "title", &title);
    let layout = grid::parse(&body)?;

    let mut planned = Vec::with_capacity(layout.subgrids.len() + 1);
    {
        let mut classifier = Classifier::new(&mut translations, prefix.as_str());
        planned.push(plan_grid(&mut classifier, None, &layout.main)?);
        for subgrid in &layout.subgrids {
            check_target(&planned, &subgrid.name)?;
            let grid = plan_grid(&mut classifier, Some(subgrid.name.clone()), &subgrid.grid)?;
            planned.push(grid);
        }
    }

    let menu = parse_menu(&menu, &mut translations, &prefix)?;
    check_menu_handlers(&menu, handlers)?;

    // Create
    let window = toolkit.create_window(&title)?;
    let mut ids = Vec::new();
    let mut controls: BTreeMap<String, Control> = BTreeMap::new();
    for grid in planned {
        let container = match &grid.target {
            None => window,
            Some(name) => controls
                .get(name)
                .map(|c| c.widget)
                .ok_or_else(|| FormError::UnknownControl(name.clone()))?,
        };
        toolkit.set_stretch(container, &grid.col_stretch, &grid.row_stretch)?;
        for PlannedControl { spec, placement } in grid.controls {
            let widget = toolkit.create(container, &spec)?;
            toolkit.place(widget, placement)?;
            debug!(id = %spec.id, kind = spec.kind.name(), ?widget, "created widget");
            ids.push(spec.id.clone());
            controls.insert(
                spec.id.clone(),
                Control {
                    spec,
                    widget,
                    container,
                    placement,
                    handler: None,
                },
            );
        }
    }

    let radios: Vec<WidgetId> = ids
        .iter()
        .filter_map(|id| controls.get(id))
        .filter(|c| matches!(c.spec.kind, WidgetKind::Radio { .. }))
        .map(|c| c.widget)
        .collect();
    if !radios.is_empty() {
        toolkit.group_radios(&radios)?;
    }

    for (id, control) in controls.iter_mut() {
        let Some((name, callback)) = handlers.for_control(id) else {
            continue;
        };
        if control.spec.kind.has_events() {
            toolkit.connect(control.widget, callback)?;
            control.handler = Some(name);
        } else {
            warn!(id = %id, handler = %name, kind = control.spec.kind.name(), "handler ignored: control has no events");
        }
    }

    let mut menu_items = BTreeMap::new();
    create_menus(&toolkit, window, &menu, handlers, &mut menu_items)?;

    debug!(title = %title, controls = ids.len(), menu_items = menu_items.len(), "form built");
    Ok(Form {
        toolkit,
        window,
        title,
        ids: RefCell::new(ids),
        controls: RefCell::new(controls),
        menu_items,
        translations,
    })
}

fn create_menus<T: Toolkit>(
    toolkit: &T,
    parent: WidgetId,
    entries: &[MenuEntry],
    handlers: &Handlers,
    items: &mut BTreeMap<String, WidgetId>,
) -> Result<(), FormError> {
    for entry in entries {
        match entry {
            MenuEntry::Submenu { text, entries, .. } => {
                let menu = toolkit.create_menu(parent, text)?;
                create_menus(toolkit, menu, entries, handlers, items)?;
            }
            MenuEntry::Command { id, text, shortcut } => {
                let (_, callback) = handlers
                    .for_control(id)
                    .ok_or_else(|| FormError::MissingHandler(id.clone()))?;
                let widget = toolkit.add_menu_command(parent, id, text, shortcut.as_ref(), callback)?;
                items.insert(id.clone(), widget);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::i18n::Translations;
    use crate::spec::{MenuItem, SpecError};
    use crate::toolkit::headless::Headless;
    use crate::value::Value;

    const LOGIN: &str = "
        |           |             |
         User:       [user_      ]
         ( ) Guest    (x) Member
                     [ Login ]
        ";

    // ── Creation ────────────────────────────────────────────────────

    #[test]
    fn creates_controls_in_row_major_order() {
        let form = build(Headless::new(), FormConfig::new(LOGIN), &Handlers::new()).unwrap();
        assert_eq!(
            form.ids(),
            vec!["label_user", "user", "guest", "member", "login"]
        );
        let kit = form.toolkit();
        assert_eq!(kit.kind(form.widget("login").unwrap()).unwrap(), "button");
        assert_eq!(
            kit.placement(form.widget("login").unwrap()).unwrap(),
            Some(Placement::cell(2, 1).with_align(crate::geometry::HAlign::Fill))
        );
    }

    #[test]
    fn radios_share_one_group() {
        let form = build(Headless::new(), FormConfig::new(LOGIN), &Handlers::new()).unwrap();
        form.set_value("guest", true).unwrap();
        assert!(form.get::<bool>("guest").unwrap());
        assert!(!form.get::<bool>("member").unwrap());
    }

    // ── Handlers ────────────────────────────────────────────────────

    #[test]
    fn handlers_bind_by_exact_or_prefixed_name() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (log.clone(), log.clone());
        let handlers = Handlers::new()
            .on("login", move |_| a.borrow_mut().push("login".to_owned()))
            .on("on_user", move |v: &Value| b.borrow_mut().push(format!("user={v}")))
            .on("label_user", |_| {});
        let form = build(Headless::new(), FormConfig::new(LOGIN), &handlers).unwrap();

        assert_eq!(form.handler("login").as_deref(), Some("login"));
        assert_eq!(form.handler("user").as_deref(), Some("on_user"));
        assert_eq!(form.handler("label_user"), None);

        let kit = form.toolkit();
        kit.enter_text(form.widget("user").unwrap(), "bob").unwrap();
        kit.click(form.widget("login").unwrap()).unwrap();
        assert_eq!(*log.borrow(), vec!["user=bob", "login"]);
    }

    // ── Subgrids ────────────────────────────────────────────────────

    #[test]
    fn subgrid_goes_into_its_placeholder() {
        let body = "
            |               |
             <opts: Options>
            :opts:
            |     |      |
             [ ] A  [ ] B
            ";
        let form = build(Headless::new(), FormConfig::new(body), &Handlers::new()).unwrap();
        let panel = form.widget("opts").unwrap();
        assert_eq!(form.control("a").unwrap().container, panel);
        assert_eq!(form.toolkit().parent(form.widget("b").unwrap()), Some(panel));
        assert_eq!(form.toolkit().stretch(panel).unwrap(), (vec![0, 0], vec![0]));
    }

    #[test]
    fn subgrid_target_must_be_a_placeholder() {
        let body = "
            |       |
             [opts]
            :opts:
            |   |
             a
            ";
        let err = build(Headless::new(), FormConfig::new(body), &Handlers::new()).unwrap_err();
        assert!(matches!(err, FormError::Layout(LayoutError::SubgridTarget { ref name, .. }) if name == "opts"));

        let body = "|   |\n a\n:nowhere:\n|   |\n b";
        let err = build(Headless::new(), FormConfig::new(body), &Handlers::new()).unwrap_err();
        assert!(matches!(err, FormError::Layout(LayoutError::SubgridTarget { .. })));
    }

    // ── Errors ──────────────────────────────────────────────────────

    #[test]
    fn errors_leave_the_toolkit_untouched() {
        let kit = Headless::new();
        let err = build(kit.clone(), FormConfig::new("|    |    |\n [a]  a:x"), &Handlers::new())
            .unwrap_err();
        assert!(matches!(err, FormError::Spec(SpecError::DuplicateId { .. })));

        let config = FormConfig::new("|   |\n a").with_menu(vec![MenuItem::command("Quit")]);
        let err = build(kit.clone(), config, &Handlers::new()).unwrap_err();
        assert_eq!(err, FormError::MissingHandler("quit".into()));
        assert_eq!(kit.widget_count(), 0);
    }

    // ── Menus and translations ──────────────────────────────────────

    #[test]
    fn menus_connect_to_handlers() {
        let quit = Rc::new(RefCell::new(0));
        let counter = quit.clone();
        let handlers = Handlers::new()
            .on("open", |_| {})
            .on("on_quit", move |_| *counter.borrow_mut() += 1);
        let config = FormConfig::new("|   |\n a").with_menu(vec![MenuItem::submenu(
            "File >",
            vec![MenuItem::command("Open #C-O"), MenuItem::command("Quit")],
        )]);
        let form = build(Headless::new(), config, &handlers).unwrap();
        let kit = form.toolkit();
        assert_eq!(
            kit.menu_lines(form.window()),
            vec!["File >", "  Open (Ctrl+O)", "  Quit"]
        );
        kit.click(form.menu_item("quit").unwrap()).unwrap();
        assert_eq!(*quit.borrow(), 1);
    }

    #[test]
    fn translations_cover_title_controls_and_menus() {
        let mut translations = Translations::new();
        translations.insert("F.title", "Titel");
        translations.insert("F.ok", "Gut");
        let config = FormConfig::new("|    |\n [OK]")
            .with_title("Title")
            .with_translation_prefix("F.")
            .with_translations(translations.with_recording(true))
            .with_menu(vec![MenuItem::command("Help")]);
        let form = build(Headless::new(), config, &Handlers::new().on("help", |_| {})).unwrap();
        assert_eq!(form.title(), "Titel");
        assert_eq!(form.get::<String>("ok").unwrap(), "Gut");
        assert!(form.translations().contains_key("F.help"));
    }
}
