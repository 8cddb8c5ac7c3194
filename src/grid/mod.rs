//! ASCII grid parsing.
//!
//! Turns a layout text block into [`GridCell`]s with span, stretch and
//! alignment information:
//!
//! ```text
//!     |    -    |    |
//!      Name:     [name_]
//!     I{[= Items]
//!      {
//! ```
//!
//! Parsing runs in three steps: [`slice`] cuts lines at the ruler positions,
//! [`merge`] joins slices into row- and column-spanning areas, [`cell`]
//! computes weights, alignment and final text.

pub mod cell;
pub mod merge;
pub mod slice;

use crate::geometry::HAlign;

pub use cell::GridCell;

// ---------------------------------------------------------------------------
// LayoutError
// ---------------------------------------------------------------------------

/// Errors produced for malformed layout text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("row span opened at row {row}, column {col} has no aligned `{{` below it")]
    UnmatchedRowSpan { row: usize, col: usize },
    #[error("merge area starting at row {row}, column {col} overlaps another merged cell")]
    OverlappingMerge { row: usize, col: usize },
    #[error("invalid subgrid header on line {line}: {text:?}")]
    InvalidSubgridHeader { line: usize, text: String },
    #[error("subgrid `{name}` is defined twice")]
    DuplicateSubgrid { name: String },
    #[error("subgrid `{name}` cannot be placed: {reason}")]
    SubgridTarget { name: String, reason: String },
}

// ---------------------------------------------------------------------------
// ParsedGrid
// ---------------------------------------------------------------------------

/// A fully parsed grid section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedGrid {
    /// Cells in row-major order, spacers included.
    pub cells: Vec<GridCell>,
    pub col_stretch: Vec<u32>,
    pub row_stretch: Vec<u32>,
}

impl ParsedGrid {
    pub fn column_count(&self) -> usize {
        self.col_stretch.len()
    }

    pub fn row_count(&self) -> usize {
        self.row_stretch.len()
    }

    /// Cells that produce widgets.
    pub fn controls(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.iter().filter(|c| !c.is_spacer())
    }

    /// Text dump of the grid, one line per cell, for assertions and snapshots.
    ///
    /// ```text
    /// cols [1, 0] rows [0]
    /// 0,0 1x1 fill c1 r0 "stretches"
    /// ```
    pub fn dump(&self) -> String {
        let mut lines = vec![format!("cols {:?} rows {:?}", self.col_stretch, self.row_stretch)];
        for c in &self.cells {
            let align = match c.h_align {
                HAlign::Fill => "fill",
                HAlign::Left => "left",
                HAlign::Right => "right",
                HAlign::Center => "center",
            };
            lines.push(format!(
                "{},{} {}x{} {} c{} r{} {:?}",
                c.row, c.col, c.rowspan, c.colspan, align, c.col_stretch, c.row_stretch, c.text
            ));
        }
        lines.join("\n")
    }
}

/// A named subgrid, laid out inside the placeholder of the same id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subgrid {
    pub name: String,
    pub grid: ParsedGrid,
}

/// A layout text parsed into its main grid and subgrids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    pub main: ParsedGrid,
    pub subgrids: Vec<Subgrid>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse a layout text block.
///
/// Any malformed section aborts the whole parse.
pub fn parse(text: &str) -> Result<Layout, LayoutError> {
    let sections = slice::slice_grids(text)?;
    let main = parse_section(&sections.main)?;
    let subgrids = sections
        .subgrids
        .iter()
        .map(|(name, grid)| {
            Ok(Subgrid {
                name: name.clone(),
                grid: parse_section(grid)?,
            })
        })
        .collect::<Result<Vec<_>, LayoutError>>()?;
    Ok(Layout { main, subgrids })
}

fn parse_section(sliced: &slice::SlicedGrid) -> Result<ParsedGrid, LayoutError> {
    let cells = merge::merged_cells(sliced)?
        .into_iter()
        .map(|m| GridCell::from_merged(m, sliced))
        .collect();
    Ok(ParsedGrid {
        cells,
        col_stretch: sliced.col_stretch(),
        row_stretch: sliced.row_stretch(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Stretch ──────────────────────────────────────────────────────

    #[test]
    fn stretch_scenario() {
        let layout = parse("|    -    |    |\n stretches  fixed").unwrap();
        let grid = &layout.main;
        assert_eq!(grid.column_count(), 2);
        assert_eq!(grid.col_stretch, vec![1, 0]);
        assert_eq!(grid.cells[0].text, "stretches");
        assert_eq!(grid.cells[0].h_align, HAlign::Fill);
        assert_eq!(grid.cells[1].text, "fixed");
        assert_eq!(grid.cells[1].h_align, HAlign::Right);
    }

    #[test]
    fn stretch_is_summed_over_span() {
        let layout = parse("|-- |-  |\n  abcdefg\nI {x\nI {y").unwrap();
        let grid = &layout.main;
        assert_eq!(grid.cells[0].colspan, 2);
        assert_eq!(grid.cells[0].col_stretch, 3);
        let tall = grid.cells.iter().find(|c| c.rowspan == 2).unwrap();
        assert_eq!(tall.row_stretch, 2);
    }

    // ── Cells ────────────────────────────────────────────────────────

    #[test]
    fn spacers_are_kept_but_not_controls() {
        let layout = parse("|   |   |\n     x").unwrap();
        assert_eq!(layout.main.cells.len(), 2);
        assert!(layout.main.cells[0].is_spacer());
        assert_eq!(layout.main.controls().count(), 1);
    }

    #[test]
    fn row_span_of_two() {
        let layout = parse("|     |\n {abc\n {def").unwrap();
        let cell = &layout.main.cells[0];
        assert_eq!((cell.rowspan, cell.colspan), (2, 1));
        assert_eq!(cell.text, "abc\ndef");
    }

    #[test]
    fn misaligned_braces_fail() {
        let err = parse("|     |\n {abc\n  {def").unwrap_err();
        assert_eq!(err, LayoutError::UnmatchedRowSpan { row: 0, col: 0 });
    }

    #[test]
    fn subgrid_sections() {
        let layout = parse(
            "
            |   -   |
             <frame>
            :frame:
            |  |  |
             a  b
            ",
        )
        .unwrap();
        assert_eq!(layout.subgrids.len(), 1);
        assert_eq!(layout.subgrids[0].name, "frame");
        assert_eq!(layout.subgrids[0].grid.cells.len(), 2);
    }

    // ── Dump ─────────────────────────────────────────────────────────

    #[test]
    fn dump_snapshot() {
        let layout = parse(
            "
            |  -   |   -    |     |
             Name:  [name_]
             ~Ok~     [x] cb
            ",
        )
        .unwrap();
        insta::assert_snapshot!(layout.main.dump(), @r#"
        cols [1, 1, 0] rows [0, 0]
        0,0 1x1 left c1 r0 "Name:"
        0,1 1x1 left c1 r0 "[name_]"
        0,2 1x1 fill c0 r0 ""
        1,0 1x1 center c1 r0 "Ok"
        1,1 1x1 right c1 r0 "[x] cb"
        1,2 1x1 fill c0 r0 ""
        "#);
    }
}
