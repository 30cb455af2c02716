use std::f64::consts::PI;

use web_sys::{CanvasGradient, CanvasRenderingContext2d};

use super::style;
use super::types::{ColorStop, Fill, Frame, LinkSprite, NodeSprite, Tooltip};

const TOOLTIP_FONT: &str = "12px sans-serif";
const TOOLTIP_LINE: f64 = 16.0;
const TOOLTIP_PAD: f64 = 6.0;

/// Draws one frame. Reads the frame only; never touches layout state.
pub fn render(frame: &Frame, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(style::BACKGROUND);
	ctx.fill_rect(0.0, 0.0, frame.width, frame.height);
	ctx.save();
	let _ = ctx.translate(frame.transform.x, frame.transform.y);
	let _ = ctx.scale(frame.transform.k, frame.transform.k);
	for link in &frame.links {
		draw_link(link, ctx);
	}
	for node in &frame.nodes {
		draw_node(node, frame.transform.k, ctx);
	}
	ctx.restore();
	if let Some(tooltip) = &frame.tooltip {
		draw_tooltip(tooltip, ctx);
	}
}

fn gradient(
	ctx: &CanvasRenderingContext2d,
	(x1, y1, x2, y2): (f64, f64, f64, f64),
	stops: &[ColorStop],
) -> CanvasGradient {
	let gradient = ctx.create_linear_gradient(x1, y1, x2, y2);
	for &(offset, color) in stops {
		let _ = gradient.add_color_stop(offset as f32, color);
	}
	gradient
}

#[allow(deprecated)]
fn draw_link(link: &LinkSprite, ctx: &CanvasRenderingContext2d) {
	let (dx, dy) = (link.x2 - link.x1, link.y2 - link.y1);
	if dx * dx + dy * dy < 1e-6 {
		return;
	}
	let stroke = gradient(ctx, (link.x1, link.y1, link.x2, link.y2), link.stops);
	ctx.set_global_alpha(link.opacity);
	ctx.set_stroke_style(&stroke);
	ctx.set_line_width(link.width);
	ctx.begin_path();
	ctx.move_to(link.x1, link.y1);
	ctx.line_to(link.x2, link.y2);
	ctx.stroke();
	ctx.set_global_alpha(1.0);
}

fn draw_node(node: &NodeSprite, k: f64, ctx: &CanvasRenderingContext2d) {
	let (x, y, r) = (node.x, node.y, node.radius);
	ctx.begin_path();
	let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
	match &node.fill {
		Fill::Solid(color) => ctx.set_fill_style_str(color),
		Fill::Gradient(stops) => {
			let fill = gradient(ctx, (x - r, y, x + r, y), stops);
			#[allow(deprecated)]
			ctx.set_fill_style(&fill);
		}
	}
	ctx.fill();
	ctx.set_stroke_style_str(node.stroke);
	ctx.set_line_width(node.stroke_width);
	ctx.stroke();

	if node.hovered {
		ctx.begin_path();
		let _ = ctx.arc(x, y, r + 3.0 / k, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str("rgba(52, 73, 94, 0.7)");
		ctx.set_line_width(1.5 / k);
		ctx.stroke();
	}

	ctx.set_fill_style_str(style::LABEL_COLOR);
	ctx.set_font(node.font);
	let _ = ctx.fill_text(&node.label, x + r + style::LABEL_OFFSET, y + 3.0);
}

fn draw_tooltip(tooltip: &Tooltip, ctx: &CanvasRenderingContext2d) {
	ctx.set_font(TOOLTIP_FONT);
	let width = tooltip
		.lines
		.iter()
		.filter_map(|line| ctx.measure_text(line).ok())
		.map(|m| m.width())
		.fold(0.0, f64::max);
	let (w, h) = (
		width + 2.0 * TOOLTIP_PAD,
		tooltip.lines.len() as f64 * TOOLTIP_LINE + 2.0 * TOOLTIP_PAD,
	);

	ctx.set_fill_style_str("rgba(255, 255, 255, 0.95)");
	ctx.fill_rect(tooltip.x, tooltip.y, w, h);
	ctx.set_stroke_style_str("#ccc");
	ctx.set_line_width(1.0);
	ctx.stroke_rect(tooltip.x, tooltip.y, w, h);

	ctx.set_fill_style_str(style::LABEL_COLOR);
	for (i, line) in tooltip.lines.iter().enumerate() {
		let baseline = tooltip.y + TOOLTIP_PAD + (i as f64 + 1.0) * TOOLTIP_LINE - 4.0;
		let _ = ctx.fill_text(line, tooltip.x + TOOLTIP_PAD, baseline);
	}
}
