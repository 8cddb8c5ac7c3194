//! Menu definitions.
//!
//! A menu is a list of [`MenuItem`]s. A command is written
//! `[id:] Text [#shortcut]`, a submenu `[id:] Text >` followed by its items:
//!
//! ```
//! use ascii_forms::spec::MenuItem;
//!
//! let menu = vec![
//!     MenuItem::submenu("File >", vec![
//!         MenuItem::command("Open #C-O"),
//!         MenuItem::command("quit: Exit"),
//!     ]),
//! ];
//! # assert_eq!(menu.len(), 1);
//! ```
//!
//! Ids follow the derived-id rules without the form's uniqueness check: a
//! menu command and a button with the same id share one handler.

use std::sync::OnceLock;

use regex::Regex;

use crate::i18n::Translations;

use super::id::derive_id;
use super::shortcut::Shortcut;
use super::SpecError;

/// A menu definition entry, as written by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Command(String),
    Submenu(String, Vec<MenuItem>),
}

impl MenuItem {
    pub fn command(text: impl Into<String>) -> Self {
        MenuItem::Command(text.into())
    }

    pub fn submenu(text: impl Into<String>, items: Vec<MenuItem>) -> Self {
        MenuItem::Submenu(text.into(), items)
    }
}

/// A parsed menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Command {
        id: String,
        text: String,
        shortcut: Option<Shortcut>,
    },
    Submenu {
        id: String,
        text: String,
        entries: Vec<MenuEntry>,
    },
}

impl MenuEntry {
    pub fn id(&self) -> &str {
        match self {
            MenuEntry::Command { id, .. } | MenuEntry::Submenu { id, .. } => id,
        }
    }

    /// Ids of all commands, depth first.
    pub fn command_ids(entries: &[MenuEntry]) -> Vec<&str> {
        let mut ids = Vec::new();
        for entry in entries {
            match entry {
                MenuEntry::Command { id, .. } => ids.push(id.as_str()),
                MenuEntry::Submenu { entries, .. } => ids.extend(Self::command_ids(entries)),
            }
        }
        ids
    }
}

fn command_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(?:(?P<id>[a-zA-Z0-9_]+)\s*:)?(?P<text>[^#]+)(?:#(?P<shortcut>[a-zA-Z0-9-]*))?$")
            .expect("menu pattern is valid")
    })
}

/// Parse menu items, translating texts under `<prefix><id>`.
pub fn parse_menu(
    items: &[MenuItem],
    translations: &mut Translations,
    prefix: &str,
) -> Result<Vec<MenuEntry>, SpecError> {
    items
        .iter()
        .map(|item| match item {
            MenuItem::Command(raw) => {
                let (id, text, shortcut) = split_entry(raw)?;
                let text = translations.get_prefixed(prefix, &id, &text);
                Ok(MenuEntry::Command { id, text, shortcut })
            }
            MenuItem::Submenu(raw, children) => {
                let label = raw.trim_end();
                let label = label.strip_suffix('>').unwrap_or(label);
                let (id, text, shortcut) = split_entry(label)?;
                if shortcut.is_some() {
                    return Err(SpecError::Menu {
                        text: raw.clone(),
                        reason: "submenus take no shortcut".into(),
                    });
                }
                let text = translations.get_prefixed(prefix, &id, &text);
                let entries = parse_menu(children, translations, prefix)?;
                Ok(MenuEntry::Submenu { id, text, entries })
            }
        })
        .collect()
}

fn split_entry(raw: &str) -> Result<(String, String, Option<Shortcut>), SpecError> {
    let fail = |reason: &str| SpecError::Menu {
        text: raw.to_owned(),
        reason: reason.to_owned(),
    };
    let caps = command_pattern()
        .captures(raw)
        .ok_or_else(|| fail("expected `[id:] text [#shortcut]`"))?;

    let text = caps.name("text").map_or("", |m| m.as_str()).trim().to_owned();
    let id = match caps.name("id") {
        Some(m) => m.as_str().to_owned(),
        None => derive_id(&text),
    };
    if id.is_empty() {
        return Err(fail("cannot derive an id from the text"));
    }
    let shortcut = match caps.name("shortcut").map(|m| m.as_str()) {
        Some(spec) if !spec.is_empty() => Some(spec.parse::<Shortcut>()?),
        _ => None,
    };
    Ok((id, text, shortcut))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::shortcut::Key;

    fn parse(items: &[MenuItem]) -> Vec<MenuEntry> {
        parse_menu(items, &mut Translations::new(), "").unwrap()
    }

    #[test]
    fn commands_with_ids_and_shortcuts() {
        let entries = parse(&[
            MenuItem::command("Open #C-O"),
            MenuItem::command("quit: Exit"),
            MenuItem::command("Save as..."),
        ]);
        assert_eq!(
            entries[0],
            MenuEntry::Command {
                id: "open".into(),
                text: "Open".into(),
                shortcut: Some(Shortcut { ctrl: true, shift: false, alt: false, key: Key::Char('O') }),
            }
        );
        assert_eq!(entries[1].id(), "quit");
        assert_eq!(entries[2].id(), "save_as");
    }

    #[test]
    fn submenus_nest() {
        let entries = parse(&[MenuItem::submenu(
            "File >",
            vec![MenuItem::command("New"), MenuItem::submenu("Recent>", vec![MenuItem::command("a")])],
        )]);
        let MenuEntry::Submenu { id, text, entries: children } = &entries[0] else {
            panic!("not a submenu");
        };
        assert_eq!((id.as_str(), text.as_str()), ("file", "File"));
        assert_eq!(children.len(), 2);
        assert_eq!(MenuEntry::command_ids(&entries), vec!["new", "a"]);
    }

    #[test]
    fn empty_shortcut_is_none() {
        let entries = parse(&[MenuItem::command("Help #")]);
        assert!(matches!(&entries[0], MenuEntry::Command { shortcut: None, .. }));
    }

    #[test]
    fn invalid_entries() {
        let mut tr = Translations::new();
        assert!(parse_menu(&[MenuItem::command("#C-O")], &mut tr, "").is_err());
        assert!(parse_menu(&[MenuItem::command("$$$")], &mut tr, "").is_err());
        assert!(parse_menu(&[MenuItem::command("Open #C-")], &mut tr, "").is_err());
    }

    #[test]
    fn menu_texts_are_translated() {
        let mut tr: Translations = [("M.open", "Öffnen")].into_iter().collect();
        let entries = parse_menu(&[MenuItem::command("Open")], &mut tr, "M.").unwrap();
        assert!(matches!(&entries[0], MenuEntry::Command { text, .. } if text == "Öffnen"));
    }
}
