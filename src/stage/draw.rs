// Canvas drawing for the ladder and the traced path.
use web_sys::CanvasRenderingContext2d;

use crate::ladder::RungGrid;
use crate::layout::{LadderLayout, Segment};

const RAIL_COLOR: &str = "#111827";
const RUNG_COLOR: &str = "#475569";
const PATH_COLOR: &str = "#ef4444";

/// Vertical rails and every rung, on a cleared canvas.
pub(super) fn draw_base_ladder(
    ctx: &CanvasRenderingContext2d,
    layout: &LadderLayout,
    grid: &RungGrid,
) {
    ctx.clear_rect(0.0, 0.0, layout.width, layout.height);

    ctx.set_line_width(2.0);
    ctx.set_stroke_style_str(RAIL_COLOR);
    for &x in &layout.line_x {
        line(ctx, x, layout.top_y(), x, layout.bottom_y());
    }

    ctx.set_stroke_style_str(RUNG_COLOR);
    for (row, &y) in grid.rows().iter().zip(layout.row_y.iter()) {
        for (i, &connected) in row.iter().enumerate() {
            if !connected {
                continue;
            }
            if let (Some(&x1), Some(&x2)) = (layout.line_x.get(i), layout.line_x.get(i + 1)) {
                line(ctx, x1, y, x2, y);
            }
        }
    }
}

/// Base ladder with the already-traced part of a path on top.
pub(super) fn draw_path(
    ctx: &CanvasRenderingContext2d,
    layout: &LadderLayout,
    grid: &RungGrid,
    visible: &[Segment],
) {
    draw_base_ladder(ctx, layout, grid);
    ctx.set_stroke_style_str(PATH_COLOR);
    ctx.set_line_width(4.0);
    for s in visible {
        line(ctx, s.x1, s.y1, s.x2, s.y2);
    }
}

fn line(ctx: &CanvasRenderingContext2d, x1: f64, y1: f64, x2: f64, y2: f64) {
    ctx.begin_path();
    ctx.move_to(x1, y1);
    ctx.line_to(x2, y2);
    ctx.stroke();
}
