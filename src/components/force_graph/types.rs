//! Render model: everything one canvas pass needs, detached from the simulation.

use super::transform::ZoomTransform;

/// Gradient stop: offset in `[0, 1]` and CSS color.
pub type ColorStop = (f64, &'static str);

/// How a node circle is filled.
#[derive(Clone, Debug, PartialEq)]
pub enum Fill {
	/// One CSS color.
	Solid(&'static str),
	/// Linear gradient across the shape, left to right.
	Gradient(&'static [ColorStop]),
}

/// A node circle with its label, in graph coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSprite {
	/// Center x.
	pub x: f64,
	/// Center y.
	pub y: f64,
	/// Circle radius.
	pub radius: f64,
	/// Circle fill.
	pub fill: Fill,
	/// Outline color.
	pub stroke: &'static str,
	/// Outline width.
	pub stroke_width: f64,
	/// Text drawn to the right of the circle.
	pub label: String,
	/// Canvas font for the label.
	pub font: &'static str,
	/// Draws a highlight ring.
	pub hovered: bool,
}

/// A link drawn from `(x1, y1)` to `(x2, y2)` with its gradient oriented the same way.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkSprite {
	/// Source x.
	pub x1: f64,
	/// Source y.
	pub y1: f64,
	/// Target x.
	pub x2: f64,
	/// Target y.
	pub y2: f64,
	/// Gradient stops from source to target.
	pub stops: &'static [ColorStop],
	/// Stroke alpha.
	pub opacity: f64,
	/// Stroke width.
	pub width: f64,
}

/// Hover card, positioned in screen space.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
	/// Left edge.
	pub x: f64,
	/// Top edge.
	pub y: f64,
	/// Text lines, top to bottom.
	pub lines: Vec<String>,
}

/// One complete drawing of the view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
	/// Surface width to clear.
	pub width: f64,
	/// Surface height to clear.
	pub height: f64,
	/// View transform applied to links and nodes.
	pub transform: ZoomTransform,
	/// Drawn first, under the nodes.
	pub links: Vec<LinkSprite>,
	/// Drawn in order; later nodes are on top.
	pub nodes: Vec<NodeSprite>,
	/// Drawn last, in screen space.
	pub tooltip: Option<Tooltip>,
}
