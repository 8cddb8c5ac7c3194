//! Control-id resolution.
//!
//! Ids are resolved in this order:
//!
//! 1. an explicit `id:` prefix, used verbatim; a second use is an error
//! 2. the id derived from the visible text (see [`derive_id`]); labels get a
//!    `label_` prefix
//! 3. for non-labels: the derived id of a label directly to the left in the
//!    same row
//! 4. `x<N>` from a counter local to one resolver
//!
//! Derived and automatic ids never collide: an id already in use falls
//! through to the next rule.

use std::collections::HashSet;

use super::SpecError;

/// Derive an id from visible text: lowercase, spaces to `_`, only
/// `[a-z0-9_]` kept, `x` prepended if the result starts with a digit.
pub fn derive_id(text: &str) -> String {
    let mut id: String = text
        .trim()
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect();
    if id.starts_with(|c: char| c.is_ascii_digit()) {
        id.insert(0, 'x');
    }
    id
}

#[derive(Debug, Clone)]
struct LastLabel {
    row: usize,
    id: String,
}

/// Hands out unique control ids for one form build.
#[derive(Debug, Default)]
pub struct IdResolver {
    used: HashSet<String>,
    counter: usize,
    last_label: Option<LastLabel>,
}

impl IdResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` has been handed out.
    pub fn is_used(&self, id: &str) -> bool {
        self.used.contains(id)
    }

    /// Resolve the id of a label cell.
    ///
    /// The label's own id is `label_<derived>` (or the explicit id); the
    /// un-prefixed id is remembered for the control to its right.
    pub fn resolve_label(
        &mut self,
        explicit: Option<&str>,
        text: &str,
        row: usize,
        col: usize,
    ) -> Result<String, SpecError> {
        if let Some(id) = explicit {
            self.claim(id, row, col)?;
            self.last_label = Some(LastLabel { row, id: id.to_owned() });
            return Ok(id.to_owned());
        }

        let derived = derive_id(text);
        let prefixed = format!("label_{derived}");
        let id = if !derived.is_empty() && !self.is_used(&prefixed) {
            self.used.insert(prefixed.clone());
            prefixed
        } else {
            format!("label_{}", self.next_auto())
        };
        self.last_label = (!derived.is_empty()).then(|| LastLabel { row, id: derived });
        Ok(id)
    }

    /// Resolve the id of a non-label cell.
    pub fn resolve(
        &mut self,
        explicit: Option<&str>,
        text: &str,
        row: usize,
        col: usize,
    ) -> Result<String, SpecError> {
        let last_label = self.last_label.take();

        if let Some(id) = explicit {
            self.claim(id, row, col)?;
            return Ok(id.to_owned());
        }

        let derived = derive_id(text);
        if !derived.is_empty() && !self.is_used(&derived) {
            self.used.insert(derived.clone());
            return Ok(derived);
        }

        if derived.is_empty() {
            if let Some(label) = last_label.filter(|l| l.row == row && !self.is_used(&l.id)) {
                self.used.insert(label.id.clone());
                return Ok(label.id);
            }
        }

        Ok(self.next_auto())
    }

    fn claim(&mut self, id: &str, row: usize, col: usize) -> Result<(), SpecError> {
        if !self.used.insert(id.to_owned()) {
            return Err(SpecError::DuplicateId {
                id: id.to_owned(),
                row,
                col,
            });
        }
        Ok(())
    }

    fn next_auto(&mut self) -> String {
        loop {
            self.counter += 1;
            let id = format!("x{}", self.counter);
            if self.used.insert(id.clone()) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── derive_id ────────────────────────────────────────────────────

    #[test]
    fn derive_from_text() {
        assert_eq!(derive_id("Hello"), "hello");
        assert_eq!(derive_id(" Hello World! "), "hello_world");
        assert_eq!(derive_id("$%&§§%"), "");
        assert_eq!(derive_id("2nd try"), "x2nd_try");
        assert_eq!(derive_id(": abc"), "_abc");
    }

    // ── Resolver ─────────────────────────────────────────────────────

    #[test]
    fn explicit_id_is_verbatim() {
        let mut ids = IdResolver::new();
        assert_eq!(ids.resolve(Some("MyId"), "Text", 0, 0).unwrap(), "MyId");
    }

    #[test]
    fn explicit_duplicate_fails() {
        let mut ids = IdResolver::new();
        ids.resolve(Some("a"), "", 0, 0).unwrap();
        let err = ids.resolve(Some("a"), "", 1, 2).unwrap_err();
        assert_eq!(
            err,
            SpecError::DuplicateId { id: "a".into(), row: 1, col: 2 }
        );
    }

    #[test]
    fn label_then_unnamed_control() {
        let mut ids = IdResolver::new();
        assert_eq!(
            ids.resolve_label(None, "Hello World:", 0, 0).unwrap(),
            "label_hello_world"
        );
        assert_eq!(ids.resolve(None, "", 0, 1).unwrap(), "hello_world");
    }

    #[test]
    fn label_id_only_reused_in_same_row() {
        let mut ids = IdResolver::new();
        ids.resolve_label(None, "Name", 0, 0).unwrap();
        assert_eq!(ids.resolve(None, "", 1, 0).unwrap(), "x1");
    }

    #[test]
    fn label_id_only_reused_once() {
        let mut ids = IdResolver::new();
        ids.resolve_label(None, "Name", 0, 0).unwrap();
        assert_eq!(ids.resolve(None, "", 0, 1).unwrap(), "name");
        assert_eq!(ids.resolve(None, "", 0, 2).unwrap(), "x1");
    }

    #[test]
    fn explicit_label_id_is_remembered() {
        let mut ids = IdResolver::new();
        assert_eq!(ids.resolve_label(Some("lbl"), "Name", 0, 0).unwrap(), "lbl");
        assert_eq!(ids.resolve(None, "", 0, 1).unwrap(), "x1");
    }

    #[test]
    fn auto_ids_count_up_and_skip_used() {
        let mut ids = IdResolver::new();
        ids.resolve(Some("x2"), "", 0, 0).unwrap();
        assert_eq!(ids.resolve(None, "$%&", 0, 1).unwrap(), "x1");
        assert_eq!(ids.resolve(None, "", 0, 2).unwrap(), "x3");
    }

    #[test]
    fn derived_collision_falls_through() {
        let mut ids = IdResolver::new();
        assert_eq!(ids.resolve(None, "Ok", 0, 0).unwrap(), "ok");
        assert_eq!(ids.resolve(None, "Ok", 0, 1).unwrap(), "x1");
    }

    #[test]
    fn resolvers_are_independent() {
        let mut a = IdResolver::new();
        let mut b = IdResolver::new();
        assert_eq!(a.resolve(None, "", 0, 0).unwrap(), "x1");
        assert_eq!(b.resolve(None, "", 0, 0).unwrap(), "x1");
    }
}
