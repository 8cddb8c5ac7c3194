//! # ascii-forms
//!
//! Grid forms from ASCII-art layouts.
//!
//! A form is drawn as text: a ruler line of `|` marks the columns, each
//! following line is a row, and the text in a cell says which widget goes
//! there (`[OK]` is a button, `[name_]` a text field, `[x] Remember me` a
//! checkbox, ...). The form builder parses the layout, derives a unique id
//! for every control, creates the widgets through a [`Toolkit`] and binds
//! them to host handlers by id. Controls are then read and written by id.
//!
//! ```
//! use ascii_forms::toolkit::headless::Headless;
//! use ascii_forms::{build, FormConfig, Handlers};
//!
//! let body = "
//!     |            |                 |
//!      Name:        [name_          ]
//!                   [ ] Remember me
//! ";
//! let form = build(Headless::new(), FormConfig::new(body), &Handlers::new()).unwrap();
//! form.set_value("name", "Alice").unwrap();
//! assert_eq!(form.get::<String>("name").unwrap(), "Alice");
//! assert!(!form.get::<bool>("remember_me").unwrap());
//! ```
//!
//! ## Core Systems
//!
//! - **[`grid`]**: layout text to cells with spans, stretch and alignment
//! - **[`spec`]**: cell text to widget specifications and control ids
//! - **[`form`]**: building, handler binding, value access
//! - **[`model`]**: observable list/tree model with column sources and sorting
//! - **[`toolkit`]**: the widget toolkit contract and a headless implementation
//! - **[`value`]**: control values and their conversions
//! - **[`i18n`]**: translation tables
//! - **[`testing`]**: text rendering of headless forms
//! - **[`geometry`]**: placement and region primitives

// Foundation
pub mod error;
pub mod geometry;
pub mod i18n;
pub mod value;

// Layout and classification
pub mod grid;
pub mod spec;

// Models and toolkits
pub mod model;
pub mod toolkit;

// Forms
pub mod form;

// Test support
pub mod testing;

pub use error::FormError;
pub use form::{build, Form, FormConfig, Handlers};
pub use toolkit::Toolkit;
pub use value::Value;
