//! Merging of raw slices into spanning cells.
//!
//! - **Row spans**: a slice whose first non-blank character is `{` is merged
//!   with the slices below it as long as they carry a `{` at the same text
//!   column with only whitespace before it. A `{` with no aligned
//!   continuation is an error.
//! - **Column spans**: a slice is merged with its right neighbour when the
//!   character under the separating boundary is anything other than `|`,
//!   space or `~`. The boundary character is kept in the merged text.
//!
//! Merge areas must not overlap.

use super::slice::SlicedGrid;
use super::LayoutError;

/// Characters under a boundary that keep two slices apart.
const CUT_CHARS: [char; 3] = ['|', ' ', '~'];

/// An area of one or more raw slices, with its merged raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedCell {
    pub row: usize,
    pub col: usize,
    pub rowspan: usize,
    pub colspan: usize,
    /// Merged text; rows of a row span are joined with `'\n'`.
    pub text: String,
}

struct Slot {
    boundary: char,
    content: Vec<char>,
}

/// Merge the sliced grid into cells, in row-major order.
pub fn merged_cells(grid: &SlicedGrid) -> Result<Vec<MergedCell>, LayoutError> {
    let mut slots: Vec<Vec<Option<Slot>>> = grid
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| {
                    Some(Slot {
                        boundary: cell.boundary,
                        content: cell.text.chars().collect(),
                    })
                })
                .collect()
        })
        .collect();

    let nrows = grid.row_count();
    let ncols = grid.column_count();
    let mut cells = Vec::new();

    for row in 0..nrows {
        for col in 0..ncols {
            let brace = match &slots[row][col] {
                None => continue,
                Some(slot) => brace_offset(&slot.content),
            };

            // Row span
            let mut rowspan = 1;
            if let Some(ofs) = brace {
                while row + rowspan < nrows {
                    match &slots[row + rowspan][col] {
                        Some(below) if continues_span(&below.content, ofs) => rowspan += 1,
                        _ => break,
                    }
                }
                if rowspan == 1 {
                    return Err(LayoutError::UnmatchedRowSpan { row, col });
                }
                for slot in slots[row..row + rowspan].iter_mut().filter_map(|r| r[col].as_mut()) {
                    slot.content.drain(..ofs);
                }
            }

            // Column span: the widest run over all spanned rows.
            let mut colspan = 1;
            for line in &slots[row..row + rowspan] {
                let mut span = 1;
                while col + span < ncols {
                    match &line[col + span] {
                        Some(right) if !CUT_CHARS.contains(&right.boundary) => span += 1,
                        _ => break,
                    }
                }
                colspan = colspan.max(span);
            }

            // Collect text
            let mut lines = Vec::with_capacity(rowspan);
            for line in &slots[row..row + rowspan] {
                let mut text = String::new();
                for c in col..col + colspan {
                    let slot = line[c]
                        .as_ref()
                        .ok_or(LayoutError::OverlappingMerge { row, col })?;
                    if c > col {
                        text.push(slot.boundary);
                    }
                    text.extend(slot.content.iter());
                }
                lines.push(text);
            }

            // White-out the merge area
            for line in &mut slots[row..row + rowspan] {
                for slot in &mut line[col..col + colspan] {
                    *slot = None;
                }
            }

            cells.push(MergedCell {
                row,
                col,
                rowspan,
                colspan,
                text: lines.join("\n"),
            });
        }
    }

    Ok(cells)
}

/// If the first non-blank character is `{`, the offset just past it.
fn brace_offset(content: &[char]) -> Option<usize> {
    let first = content.iter().position(|c| !c.is_whitespace())?;
    (content[first] == '{').then_some(first + 1)
}

/// Whether a slice continues a row span whose brace sits at `ofs - 1`.
fn continues_span(content: &[char], ofs: usize) -> bool {
    content.get(ofs - 1) == Some(&'{') && content[..ofs - 1].iter().all(|c| c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::slice::slice_grids;
    use pretty_assertions::assert_eq;

    fn merge(text: &str) -> Result<Vec<MergedCell>, LayoutError> {
        merged_cells(&slice_grids(text)?.main)
    }

    fn cell(row: usize, col: usize, rowspan: usize, colspan: usize, text: &str) -> MergedCell {
        MergedCell { row, col, rowspan, colspan, text: text.into() }
    }

    // ── Plain slicing ────────────────────────────────────────────────

    #[test]
    fn simple_grid() {
        let cells = merge(
            "
            |   |   |
             A   Bb
             C   D
            ",
        )
        .unwrap();
        assert_eq!(
            cells,
            vec![
                cell(0, 0, 1, 1, "A  "),
                cell(0, 1, 1, 1, "Bb"),
                cell(1, 0, 1, 1, "C  "),
                cell(1, 1, 1, 1, "D"),
            ]
        );
    }

    // ── Column merge ─────────────────────────────────────────────────

    #[test]
    fn column_merge_keeps_separator() {
        let cells = merge("| | |\n A B\n CxD").unwrap();
        assert_eq!(
            cells,
            vec![
                cell(0, 0, 1, 1, "A"),
                cell(0, 1, 1, 1, "B"),
                cell(1, 0, 1, 2, "CxD"),
            ]
        );
    }

    #[test]
    fn tilde_and_bar_cut() {
        let cells = merge("| | |\n A~B\n C|D").unwrap();
        assert_eq!(cells.len(), 4);
        assert!(cells.iter().all(|c| c.colspan == 1));
    }

    #[test]
    fn column_merge_over_three_columns() {
        let cells = merge("|  |  |  |\n [Long-text-here]").unwrap();
        assert_eq!(cells, vec![cell(0, 0, 1, 3, "[Long-text-here]")]);
    }

    // ── Row merge ────────────────────────────────────────────────────

    #[test]
    fn row_merge_by_indentation() {
        let cells = merge(
            "
            |
             {abc
             {def
              {ghi
              {jkl
             {mno
             {pqr
            ",
        )
        .unwrap();
        assert_eq!(
            cells,
            vec![
                cell(0, 0, 2, 1, "abc\ndef"),
                cell(2, 0, 2, 1, "ghi\njkl"),
                cell(4, 0, 2, 1, "mno\npqr"),
            ]
        );
    }

    #[test]
    fn aligned_braces_span_two_rows() {
        let cells = merge("|    |    |\n {ab  x\n {cd  y").unwrap();
        assert_eq!(cells[0], cell(0, 0, 2, 1, "ab \ncd "));
        assert_eq!(cells[1], cell(0, 1, 1, 1, "x"));
        assert_eq!(cells[2], cell(1, 1, 1, 1, "y"));
    }

    #[test]
    fn misaligned_brace_is_an_error() {
        let err = merge("|    |\n {ab\n  {cd").unwrap_err();
        assert_eq!(err, LayoutError::UnmatchedRowSpan { row: 0, col: 0 });
    }

    #[test]
    fn lone_brace_in_last_row_is_an_error() {
        let err = merge("|    |    |\n a    b\n c    {d").unwrap_err();
        assert_eq!(err, LayoutError::UnmatchedRowSpan { row: 1, col: 1 });
    }

    #[test]
    fn overlapping_merge_is_an_error() {
        let err = merge(
            "
            |   |   |
             abc {de fgh
             {jk {lm nop
             {rstuvw xyz
            ",
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::OverlappingMerge { .. }));
    }
}
