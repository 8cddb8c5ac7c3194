//! Final grid cells: merged areas with stretch weights, alignment and
//! normalized text.

use crate::geometry::{HAlign, Placement};

use super::merge::MergedCell;
use super::slice::SlicedGrid;

/// Stand-in for a literal space inside cell text.
pub const HARD_SPACE: char = '~';

/// One cell of a parsed grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
    pub rowspan: usize,
    pub colspan: usize,
    /// Sum of the row weights over the spanned rows.
    pub row_stretch: u32,
    /// Sum of the column weights over the spanned columns.
    pub col_stretch: u32,
    pub h_align: HAlign,
    /// Normalized text: `~` turned into spaces, surrounding whitespace removed.
    pub text: String,
    /// Merged text as found in the layout.
    pub raw: String,
}

impl GridCell {
    pub(super) fn from_merged(cell: MergedCell, grid: &SlicedGrid) -> Self {
        let col_weights = grid.col_stretch();
        let row_weights = grid.row_stretch();
        let col_stretch = col_weights[cell.col..cell.col + cell.colspan].iter().sum();
        let row_stretch = row_weights[cell.row..cell.row + cell.rowspan].iter().sum();

        let text = normalize(&cell.text);
        let h_align = if text.is_empty() {
            HAlign::Fill
        } else {
            alignment(&cell.text)
        };

        GridCell {
            row: cell.row,
            col: cell.col,
            rowspan: cell.rowspan,
            colspan: cell.colspan,
            row_stretch,
            col_stretch,
            h_align,
            text,
            raw: cell.text,
        }
    }

    /// Whether the cell holds no text; spacers occupy space but get no widget.
    pub fn is_spacer(&self) -> bool {
        self.text.is_empty()
    }

    /// Grid placement of this cell.
    pub fn placement(&self) -> Placement {
        Placement::cell(self.row, self.col)
            .with_span(self.rowspan, self.colspan)
            .with_align(self.h_align)
    }
}

/// `~` to space, then trim.
pub fn normalize(raw: &str) -> String {
    raw.replace(HARD_SPACE, " ").trim().to_owned()
}

/// Alignment from the whitespace at the very start and end of the raw text.
pub fn alignment(raw: &str) -> HAlign {
    let text = raw.replace(HARD_SPACE, " ");
    HAlign::from_padding(
        text.starts_with(char::is_whitespace),
        text.ends_with(char::is_whitespace),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Alignment ────────────────────────────────────────────────────

    #[test]
    fn alignment_from_padding() {
        assert_eq!(alignment(" x "), HAlign::Center);
        assert_eq!(alignment("x "), HAlign::Left);
        assert_eq!(alignment(" x"), HAlign::Right);
        assert_eq!(alignment("x"), HAlign::Fill);
    }

    #[test]
    fn tilde_counts_as_space_for_alignment() {
        assert_eq!(alignment("~x"), HAlign::Right);
        assert_eq!(alignment("x~"), HAlign::Left);
    }

    #[test]
    fn multi_line_alignment() {
        assert_eq!(alignment("abc \ndef"), HAlign::Fill);
        assert_eq!(alignment(" abc\ndef "), HAlign::Center);
    }

    // ── Text ─────────────────────────────────────────────────────────

    #[test]
    fn normalize_strips_and_converts_tilde() {
        assert_eq!(normalize("  a~b  "), "a b");
        assert_eq!(normalize("~~"), "");
        assert_eq!(normalize("   "), "");
    }
}
