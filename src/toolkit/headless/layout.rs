//! Geometry of a headless window, computed with a taffy CSS grid.
//!
//! Every container (window or placeholder) becomes a grid whose tracks are
//! `fr(weight)` for stretchable columns/rows and `auto` otherwise. Placed
//! children span grid lines per their [`Placement`]; their intrinsic size
//! is the size of their [`Headless::display_lines`].

use std::collections::BTreeMap;

use taffy::prelude::*;
use taffy::style::TrackSizingFunction;

use crate::geometry::{HAlign, Placement, Region};
use crate::toolkit::{ToolkitError, WidgetId};

use super::{widget_lines, Arena, Headless, State};

fn layout_error(err: taffy::TaffyError) -> ToolkitError {
    ToolkitError::Layout(err.to_string())
}

fn track(weight: u32) -> TrackSizingFunction {
    if weight > 0 {
        fr(weight as f32)
    } else {
        auto()
    }
}

fn justify(align: HAlign) -> JustifySelf {
    match align {
        HAlign::Fill => JustifySelf::Stretch,
        HAlign::Left => JustifySelf::Start,
        HAlign::Right => JustifySelf::End,
        HAlign::Center => JustifySelf::Center,
    }
}

fn place(style: &mut Style, placement: Placement) {
    style.grid_row = Line {
        start: line(placement.row as i16 + 1),
        end: span(placement.rowspan as u16),
    };
    style.grid_column = Line {
        start: line(placement.col as i16 + 1),
        end: span(placement.colspan as u16),
    };
    style.justify_self = Some(justify(placement.align));
}

/// Widgets that take the full height of their cell.
fn fills_height(state: &State) -> bool {
    matches!(
        state,
        State::List(_) | State::Panel { .. } | State::TextField { multiline: true, .. }
    )
}

fn extent(lines: &[String]) -> (f32, f32) {
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    (width as f32, lines.len() as f32)
}

/// Build the taffy node of `id` and, for containers, of its placed children.
fn build(tree: &mut TaffyTree<WidgetId>, arena: &Arena, id: WidgetId) -> Result<NodeId, ToolkitError> {
    let widget = arena.get(id)?;
    let mut style = Style::default();
    if let Some(placement) = widget.placement {
        place(&mut style, placement);
    }

    let is_container = matches!(widget.state, State::Window { .. } | State::Panel { .. });
    if is_container {
        style.display = Display::Grid;
        style.grid_template_columns = widget
            .col_stretch
            .iter()
            .map(|&w| GridTemplateComponent::Single(track(w)))
            .collect();
        style.grid_template_rows = widget
            .row_stretch
            .iter()
            .map(|&w| GridTemplateComponent::Single(track(w)))
            .collect();
        style.gap = Size {
            width: length(1.0),
            height: zero(),
        };
        if matches!(widget.state, State::Panel { framed: true }) {
            style.padding = Rect {
                left: zero(),
                right: zero(),
                top: length(1.0),
                bottom: zero(),
            };
        }
    }

    let (width, height) = extent(&widget_lines(widget));
    style.min_size = Size {
        width: length(width),
        height: length(height),
    };
    if !is_container {
        let stretches = widget.placement.is_some_and(|p| p.align == HAlign::Fill);
        if !stretches {
            style.size.width = length(width);
        }
        if !fills_height(&widget.state) {
            style.size.height = length(height);
        }
    }
    style.align_self = Some(if fills_height(&widget.state) {
        AlignSelf::Stretch
    } else {
        AlignSelf::Start
    });

    let node = tree.new_leaf_with_context(style, id).map_err(layout_error)?;
    if is_container {
        let kids = arena
            .children(id)
            .iter()
            .filter(|&&child| arena.get(child).is_ok_and(|w| w.placement.is_some()))
            .map(|&child| build(tree, arena, child))
            .collect::<Result<Vec<_>, _>>()?;
        tree.set_children(node, &kids).map_err(layout_error)?;
    }
    Ok(node)
}

/// Absolute regions of `node` and its descendants.
fn collect(
    tree: &TaffyTree<WidgetId>,
    node: NodeId,
    origin: (f32, f32),
    out: &mut BTreeMap<WidgetId, Region>,
) -> Result<(), ToolkitError> {
    let layout = tree.layout(node).map_err(layout_error)?;
    let x = origin.0 + layout.location.x;
    let y = origin.1 + layout.location.y;
    if let Some(&id) = tree.get_node_context(node) {
        out.insert(
            id,
            Region::new(
                x.round() as i32,
                y.round() as i32,
                layout.size.width.round() as i32,
                layout.size.height.round() as i32,
            ),
        );
    }
    for child in tree.children(node).map_err(layout_error)? {
        collect(tree, child, (x, y), out)?;
    }
    Ok(())
}

impl Headless {
    /// Lay out `window` in a `width` x `height` cell area. Returns the
    /// absolute region of the window and of every placed widget below it.
    pub fn compute_layout(
        &self,
        window: WidgetId,
        width: u16,
        height: u16,
    ) -> Result<BTreeMap<WidgetId, Region>, ToolkitError> {
        let arena = self.arena.borrow();
        let mut tree: TaffyTree<WidgetId> = TaffyTree::new();
        let root = build(&mut tree, &arena, window)?;
        let (w, h) = (f32::from(width), f32::from(height));
        tree.set_style(
            root,
            Style {
                size: Size {
                    width: length(w),
                    height: length(h),
                },
                ..tree.style(root).map_err(layout_error)?.clone()
            },
        )
        .map_err(layout_error)?;
        tree.compute_layout(
            root,
            Size {
                width: AvailableSpace::Definite(w),
                height: AvailableSpace::Definite(h),
            },
        )
        .map_err(layout_error)?;

        let mut regions = BTreeMap::new();
        collect(&tree, root, (0.0, 0.0), &mut regions)?;
        Ok(regions)
    }
}
