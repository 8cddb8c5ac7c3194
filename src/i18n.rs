//! Translations of form texts.
//!
//! [`Translations`] is a plain string map with two switches that help while
//! collecting texts:
//!
//! - `recording`: [`get`](Translations::get) stores missing keys with their
//!   default, so opening every form once yields a complete key set.
//! - `mark_missing`: missing keys return their default prefixed with `$`.
//!
//! Keys used by forms are `<prefix><id>` for control and menu texts,
//! `<prefix><id>.<column>` for list column headers and `<prefix>title` for
//! the window title. Loading and saving files is left to the caller.

use std::collections::BTreeMap;

/// Marker prepended to defaults of missing keys when `mark_missing` is set.
pub const MISSING_MARK: char = '$';

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translations {
    entries: BTreeMap<String, String>,
    pub recording: bool,
    pub mark_missing: bool,
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable recording of missing keys (builder).
    pub fn with_recording(mut self, recording: bool) -> Self {
        self.recording = recording;
        self
    }

    /// Enable marking of missing keys (builder).
    pub fn with_mark_missing(mut self, mark_missing: bool) -> Self {
        self.mark_missing = mark_missing;
        self
    }

    /// Look up `key`, falling back to `default`.
    pub fn get(&mut self, key: &str, default: &str) -> String {
        if let Some(text) = self.entries.get(key) {
            return text.clone();
        }
        if self.recording {
            self.entries.insert(key.to_owned(), default.to_owned());
            return default.to_owned();
        }
        if self.mark_missing {
            format!("{MISSING_MARK}{default}")
        } else {
            default.to_owned()
        }
    }

    /// Look up `prefix + key`.
    pub fn get_prefixed(&mut self, prefix: &str, key: &str, default: &str) -> String {
        self.get(&format!("{prefix}{key}"), default)
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), text.into())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Translations {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            ..Self::default()
        }
    }
}
