//! Form configuration.

use crate::i18n::Translations;
use crate::spec::MenuItem;

/// Everything needed to build a form, apart from the toolkit and handlers.
#[derive(Debug, Clone, Default)]
pub struct FormConfig {
    /// Window title; translated under `<prefix>title`.
    pub title: String,
    /// The ASCII layout.
    pub body: String,
    pub menu: Vec<MenuItem>,
    pub translations: Translations,
    /// Prepended to every translation key.
    pub translation_prefix: String,
}

impl FormConfig {
    /// A config for `body` with no title.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }

    /// A config named after the type `T`: `MyNiceForm` gets the title
    /// `"My Nice Form"` and the translation prefix `"MyNiceForm."`.
    pub fn for_type<T: ?Sized>() -> Self {
        let name = short_type_name(std::any::type_name::<T>());
        Self {
            title: title_from_type_name(name),
            translation_prefix: format!("{name}."),
            ..Self::default()
        }
    }

    /// Set the title (builder).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the layout (builder).
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Set the menu (builder).
    pub fn with_menu(mut self, menu: Vec<MenuItem>) -> Self {
        self.menu = menu;
        self
    }

    /// Set the translations (builder).
    pub fn with_translations(mut self, translations: Translations) -> Self {
        self.translations = translations;
        self
    }

    /// Set the translation key prefix (builder).
    pub fn with_translation_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.translation_prefix = prefix.into();
        self
    }
}

/// `my_app::forms::MyNiceForm<u8>` -> `MyNiceForm`.
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Split a CamelCase name into words.
pub fn title_from_type_name(name: &str) -> String {
    let mut title = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for c in name.chars() {
        if let Some(p) = prev {
            if c.is_uppercase() && (p.is_lowercase() || p.is_ascii_digit()) {
                title.push(' ');
            }
        }
        title.push(c);
        prev = Some(c);
    }
    title
}
