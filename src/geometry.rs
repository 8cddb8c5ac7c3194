//! Core geometry types: Region, HAlign, Placement.
//!
//! These are the coordinate and placement types shared by the grid parser,
//! the layout builder and the toolkit collaborators.

// ---------------------------------------------------------------------------
// HAlign
// ---------------------------------------------------------------------------

/// Horizontal alignment of a widget inside its grid cell.
///
/// Derived from the whitespace surrounding the cell text in the ASCII layout:
///
/// | leading | trailing | alignment |
/// |---------|----------|-----------|
/// | no      | no       | `Fill`    |
/// | yes     | no       | `Right`   |
/// | no      | yes      | `Left`    |
/// | yes     | yes      | `Center`  |
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum HAlign {
    #[default]
    Fill,
    Left,
    Right,
    Center,
}

impl HAlign {
    /// Compute the alignment from the presence of leading/trailing whitespace.
    #[inline]
    pub const fn from_padding(leading: bool, trailing: bool) -> Self {
        match (leading, trailing) {
            (false, false) => HAlign::Fill,
            (true, false) => HAlign::Right,
            (false, true) => HAlign::Left,
            (true, true) => HAlign::Center,
        }
    }
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

/// Grid position of a widget inside its container.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Placement {
    pub row: usize,
    pub col: usize,
    pub rowspan: usize,
    pub colspan: usize,
    pub align: HAlign,
}

impl Placement {
    /// A single-cell placement with fill alignment.
    #[inline]
    pub const fn cell(row: usize, col: usize) -> Self {
        Self { row, col, rowspan: 1, colspan: 1, align: HAlign::Fill }
    }

    /// Set the spans (builder).
    #[inline]
    pub const fn with_span(mut self, rowspan: usize, colspan: usize) -> Self {
        self.rowspan = rowspan;
        self.colspan = colspan;
        self
    }

    /// Set the alignment (builder).
    #[inline]
    pub const fn with_align(mut self, align: HAlign) -> Self {
        self.align = align;
        self
    }
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// A rectangular region in character cells defined by position and size.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    /// Create a new region.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }
}
