//! Headless testing helpers.
//!
//! Build a form on [`Headless`](crate::toolkit::headless::Headless), drive
//! it with the toolkit's simulated input (`click`, `enter_text`, ...) and
//! capture it as plain text with [`render_form`] for snapshot assertions.

pub mod snapshot;

pub use snapshot::{blocks_to_string, render_form, render_window};
