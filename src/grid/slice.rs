//! Slicing: dedent the layout text, split it into sections and cut every
//! body line at the ruler's `|` positions.
//!
//! The first non-blank line of a section is the *ruler*. Each `|` in the ruler
//! marks a column boundary. The character found under a boundary in a body line
//! decides later whether the two neighbouring slices are merged (see
//! [`merge`](super::merge)).
//!
//! A ruler starting with `|` reserves text column 0 as the row-marker column;
//! an `I` there makes the row vertically stretchable. A ruler without a leading
//! `|` behaves as if one were there and every body line had a blank marker.
//!
//! A section header `:name:` (at the ruler's indentation) ends the current grid
//! and starts a subgrid named `name`.

use super::LayoutError;

/// Character positions at which a body line is cut into cells.
const BOUNDARY: char = '|';

// ---------------------------------------------------------------------------
// RawCell / SlicedGrid
// ---------------------------------------------------------------------------

/// A slice of one body line, as cut at the ruler positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCell {
    pub row: usize,
    pub col: usize,
    /// Character found under the column's left boundary.
    pub boundary: char,
    /// Slice content after the boundary, padded with spaces to the column
    /// width except in the last column.
    pub text: String,
}

/// A grid section cut into raw cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlicedGrid {
    /// Ruler text between the boundaries, one entry per column.
    pub column_heads: Vec<String>,
    /// Character in the row-marker column, one entry per body row.
    pub row_markers: Vec<char>,
    /// Body rows; every row has exactly `column_heads.len()` cells.
    pub rows: Vec<Vec<RawCell>>,
}

impl SlicedGrid {
    /// Number of columns defined by the ruler.
    pub fn column_count(&self) -> usize {
        self.column_heads.len()
    }

    /// Number of body rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Stretch weight per column: the number of `-` in the column's ruler text.
    pub fn col_stretch(&self) -> Vec<u32> {
        self.column_heads
            .iter()
            .map(|head| head.chars().filter(|&c| c == '-').count() as u32)
            .collect()
    }

    /// Stretch weight per row: 1 if the row marker is `I`, else 0.
    pub fn row_stretch(&self) -> Vec<u32> {
        self.row_markers
            .iter()
            .map(|&marker| u32::from(marker == 'I'))
            .collect()
    }
}

/// The main grid plus its named subgrids, in definition order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlicedSections {
    pub main: SlicedGrid,
    pub subgrids: Vec<(String, SlicedGrid)>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Slice the layout text into the main grid and its subgrids.
pub fn slice_grids(text: &str) -> Result<SlicedSections, LayoutError> {
    let lines = dedent(text);

    let mut sections: Vec<(Option<String>, Vec<&str>)> = vec![(None, Vec::new())];
    for (index, line) in lines.iter().enumerate() {
        if let Some(name) = section_header(line) {
            if name.is_empty() {
                return Err(LayoutError::InvalidSubgridHeader {
                    line: index,
                    text: line.clone(),
                });
            }
            if sections.iter().any(|(n, _)| n.as_deref() == Some(name)) {
                return Err(LayoutError::DuplicateSubgrid { name: name.to_owned() });
            }
            sections.push((Some(name.to_owned()), Vec::new()));
        } else if let Some((_, body)) = sections.last_mut() {
            body.push(line.as_str());
        }
    }

    let mut result = SlicedSections::default();
    for (name, body) in sections {
        let grid = slice_section(&body);
        match name {
            None => result.main = grid,
            Some(name) => result.subgrids.push((name, grid)),
        }
    }
    Ok(result)
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

/// Strip the common leading-whitespace prefix from all non-blank lines.
/// Blank lines come back empty.
fn dedent(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let mut prefix: Option<&str> = None;
    for line in &lines {
        if line.trim().is_empty() {
            continue;
        }
        let indent_len = line.len() - line.trim_start_matches([' ', '\t']).len();
        let indent = &line[..indent_len];
        prefix = Some(match prefix {
            None => indent,
            Some(p) => common_prefix(p, indent),
        });
    }
    let cut = prefix.map_or(0, str::len);
    lines
        .iter()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                line[cut..].to_owned()
            }
        })
        .collect()
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    &a[..len]
}

/// `:name:` on a line of its own.
fn section_header(line: &str) -> Option<&str> {
    let line = line.trim_end();
    if line.len() >= 2 && line.starts_with(':') && line.ends_with(':') {
        Some(line[1..line.len() - 1].trim())
    } else {
        None
    }
}

/// Cut one section. Leading and trailing blank lines are ignored.
fn slice_section(lines: &[&str]) -> SlicedGrid {
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());
    let (first, last) = match (first, last) {
        (Some(f), Some(l)) => (f, l),
        _ => return SlicedGrid::default(),
    };

    let mut ruler: Vec<char> = lines[first].chars().collect();
    let mut body: Vec<Vec<char>> = lines[first + 1..=last]
        .iter()
        .map(|l| l.chars().collect())
        .collect();

    if ruler.first() != Some(&BOUNDARY) {
        ruler.insert(0, BOUNDARY);
        for line in &mut body {
            line.insert(0, ' ');
        }
    }

    let bars: Vec<usize> = ruler
        .iter()
        .enumerate()
        .filter_map(|(i, &c)| (c == BOUNDARY).then_some(i))
        .collect();

    // Column starts are boundary positions. The text after the last bar only
    // forms a column of its own if there is any, or if it is the only column.
    let last_bar = bars[bars.len() - 1];
    let mut starts: Vec<usize> = bars[..bars.len() - 1].to_vec();
    let ruler_end = if last_bar + 1 < ruler.len() || starts.is_empty() {
        starts.push(last_bar);
        ruler.len()
    } else {
        last_bar
    };

    let mut column_heads = Vec::with_capacity(starts.len());
    let mut widths = Vec::with_capacity(starts.len());
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(ruler_end);
        column_heads.push(ruler[start + 1..end].iter().collect::<String>());
        widths.push(end - start - 1);
    }

    // The last column absorbs anything reaching past the ruler.
    let last_start = starts[starts.len() - 1];
    let longest = body.iter().map(Vec::len).max().unwrap_or(0);
    if let Some(w) = widths.last_mut() {
        *w = (*w).max(longest.saturating_sub(last_start + 1));
    }

    let mut row_markers = Vec::with_capacity(body.len());
    let mut rows = Vec::with_capacity(body.len());
    for (row, line) in body.iter().enumerate() {
        row_markers.push(line.first().copied().unwrap_or(' '));
        let cells = starts
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(col, (&start, &width))| {
                let boundary = line.get(start).copied().unwrap_or(' ');
                let mut text: String = line
                    .iter()
                    .skip(start + 1)
                    .take(width)
                    .collect();
                // The last column ends with the line.
                if col + 1 < starts.len() {
                    let len = text.chars().count();
                    text.extend(std::iter::repeat(' ').take(width - len));
                }
                RawCell { row, col, boundary, text }
            })
            .collect();
        rows.push(cells);
    }

    SlicedGrid { column_heads, row_markers, rows }
}
