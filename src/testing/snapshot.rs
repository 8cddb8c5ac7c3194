//! Snapshot rendering of headless forms.
//!
//! A form is laid out with [`Headless::compute_layout`] and every widget's
//! [`Headless::display_lines`] are drawn at its region, giving a plain-text
//! picture suitable for snapshot assertions.

use crate::error::FormError;
use crate::form::Form;
use crate::geometry::Region;
use crate::toolkit::headless::Headless;
use crate::toolkit::{ToolkitError, WidgetId};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Render a form's window to text in a `width` x `height` cell area.
///
/// Each row becomes one line with trailing spaces trimmed; lines are joined
/// with `'\n'`.
///
/// # Examples
///
/// ```
/// use ascii_forms::testing::render_form;
/// use ascii_forms::toolkit::headless::Headless;
/// use ascii_forms::{build, FormConfig, Handlers};
///
/// let form = build(Headless::new(), FormConfig::new("|     |\n [OK]"), &Handlers::new()).unwrap();
/// assert_eq!(render_form(&form, 10, 1).unwrap(), "[OK]");
/// ```
pub fn render_form(form: &Form<Headless>, width: u16, height: u16) -> Result<String, FormError> {
    Ok(render_window(form.toolkit(), form.window(), width, height)?)
}

/// Render any headless window to text. See [`render_form`].
pub fn render_window(
    kit: &Headless,
    window: WidgetId,
    width: u16,
    height: u16,
) -> Result<String, ToolkitError> {
    let regions = kit.compute_layout(window, width, height)?;

    // Parents before children, so nested widgets draw on top.
    let mut blocks = Vec::with_capacity(regions.len());
    let mut stack = vec![window];
    while let Some(id) = stack.pop() {
        if let Some(&region) = regions.get(&id) {
            blocks.push((region, kit.display_lines(id)?));
        }
        stack.extend(kit.children(id).into_iter().rev());
    }
    Ok(blocks_to_string(&blocks, i32::from(width), i32::from(height)))
}

/// Overlay text blocks on a blank `width` x `height` grid.
///
/// Each block's lines start at its region's origin and are clipped to the
/// region and to the grid.
pub fn blocks_to_string(blocks: &[(Region, Vec<String>)], width: i32, height: i32) -> String {
    if width <= 0 || height <= 0 {
        return String::new();
    }

    let mut grid: Vec<Vec<char>> = vec![vec![' '; width as usize]; height as usize];

    for (region, lines) in blocks {
        for (dy, line) in lines.iter().enumerate().take(region.height.max(0) as usize) {
            let y = region.y + dy as i32;
            if y < 0 || y >= height {
                continue;
            }
            for (dx, ch) in line.chars().enumerate().take(region.width.max(0) as usize) {
                let x = region.x + dx as i32;
                if x < 0 || x >= width {
                    continue;
                }
                grid[y as usize][x as usize] = ch;
            }
        }
    }

    let lines: Vec<String> = grid
        .into_iter()
        .map(|row| {
            let s: String = row.into_iter().collect();
            s.trim_end().to_owned()
        })
        .collect();

    lines.join("\n")
}

// ===========================================================================
// Tests
// ===========================================================================
