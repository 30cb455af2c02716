use std::collections::HashMap;

use log::{debug, info};

use crate::dataset::CanonicalGraph;

use super::scale::SqrtScale;
use super::simulation::{Centering, ForceConfig, Simulation};
use super::style::{self, LinkStyleCache};
use super::transform::{Bounds, ZoomConfig, ZoomTransform};
use super::types::{Frame, LinkSprite, NodeSprite, Tooltip};

/// Minimum pick radius in graph space, so small nodes stay easy to grab.
pub const HIT_RADIUS: f64 = 12.0;

/// Rough glyph advance as a fraction of font size, for label extents.
const GLYPH_WIDTH: f64 = 0.6;

/// Lifecycle of one mounted view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewPhase {
	/// No nodes to lay out.
	Idle,
	/// Simulation built, loop not yet started.
	Initializing,
	/// Loop attached; the simulation steps while it has energy.
	Running,
	/// Torn down; no further steps.
	Stopped,
}

/// Layout options fixed for the lifetime of one state.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutOptions {
	/// Fix the graph's root account at the surface center.
	pub anchor_root: bool,
	/// Simulation tuning.
	pub forces: ForceConfig,
	/// Zoom limits and fit behaviour.
	pub zoom: ZoomConfig,
}

impl Default for LayoutOptions {
	fn default() -> Self {
		Self {
			anchor_root: true,
			forces: ForceConfig::default(),
			zoom: ZoomConfig::default(),
		}
	}
}

#[derive(Clone, Debug, Default)]
pub(crate) struct DragState {
	pub active: bool,
	pub node_idx: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// What a pointer press turned into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerAction {
	/// Started dragging the node at this index.
	Drag(usize),
	/// Started panning the view.
	Pan,
	/// Pressed on the anchored root, which cannot be moved.
	Ignored,
}

/// Layout, interaction and view state of one mounted graph.
pub struct ForceGraphState {
	/// The graph being laid out.
	pub graph: CanonicalGraph,
	/// Current pan and zoom.
	pub transform: ZoomTransform,
	pub(crate) drag: DragState,
	pub(crate) pan: PanState,
	/// Index of the node under the pointer.
	pub hover: Option<usize>,
	/// Surface width in pixels.
	pub width: f64,
	/// Surface height in pixels.
	pub height: f64,
	sim: Simulation,
	index: HashMap<String, usize>,
	radii: Vec<f64>,
	anchor: Option<usize>,
	link_styles: LinkStyleCache,
	/// Link index in the canonical graph, with resolved body indices.
	links: Vec<(usize, (usize, usize))>,
	zoom: ZoomConfig,
	phase: ViewPhase,
	fit_pending: bool,
}

impl ForceGraphState {
	/// Builds the simulation for `graph` on a `width` by `height` surface.
	pub fn new(graph: &CanonicalGraph, width: f64, height: f64, options: LayoutOptions) -> Self {
		let LayoutOptions { anchor_root, forces, zoom } = options;
		let index: HashMap<String, usize> = graph
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| (node.id.clone(), i))
			.collect();

		let scale = SqrtScale::new((0.0, graph.max_followers() as f64), forces.radius_range);
		let radii: Vec<f64> = graph
			.nodes
			.iter()
			.map(|n| scale.scale(n.followers_count as f64))
			.collect();

		// links whose endpoints are unknown cannot be laid out
		let links: Vec<(usize, (usize, usize))> = graph
			.links
			.iter()
			.enumerate()
			.filter_map(|(i, l)| Some((i, (*index.get(&l.source)?, *index.get(&l.target)?))))
			.collect();
		let pairs: Vec<(usize, usize)> = links.iter().map(|&(_, pair)| pair).collect();

		let anchor = if anchor_root {
			graph.root.as_ref().and_then(|id| index.get(id).copied())
		} else {
			None
		};
		let (cx, cy) = (width / 2.0, height / 2.0);
		let centering = if anchor.is_some() {
			Centering::Axes {
				x: cx,
				y: cy,
				strength: forces.axis_strength,
			}
		} else {
			Centering::Point { x: cx, y: cy }
		};
		let margin = forces.collision_margin;
		let mut sim = Simulation::new(
			graph.nodes.len(),
			&pairs,
			radii.iter().map(|r| r + margin).collect(),
			centering,
			forces,
		);
		if let Some(idx) = anchor {
			sim.pin(idx, cx, cy);
		}

		let mut link_styles = LinkStyleCache::default();
		link_styles.sync(&graph.links);

		let phase = if graph.is_empty() {
			ViewPhase::Idle
		} else {
			ViewPhase::Initializing
		};
		info!(
			"layout built: {} nodes, {} links, anchor {:?}",
			graph.nodes.len(),
			links.len(),
			anchor.map(|i| &graph.nodes[i].id)
		);

		Self {
			graph: graph.clone(),
			transform: ZoomTransform::IDENTITY,
			drag: DragState::default(),
			pan: PanState::default(),
			hover: None,
			width,
			height,
			sim,
			index,
			radii,
			anchor,
			link_styles,
			links,
			zoom,
			phase,
			fit_pending: true,
		}
	}

	/// Current lifecycle phase.
	pub fn phase(&self) -> ViewPhase {
		self.phase
	}

	/// Attaches the loop. An empty graph stays idle.
	pub fn start(&mut self) {
		if self.phase == ViewPhase::Initializing {
			self.phase = ViewPhase::Running;
		}
	}

	/// Halts stepping for good and drops derived render state.
	pub fn stop(&mut self) {
		if self.phase != ViewPhase::Stopped {
			debug!("layout stopped at alpha {:.4}", self.sim.alpha());
		}
		self.phase = ViewPhase::Stopped;
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.hover = None;
		self.link_styles.clear();
	}

	/// The underlying simulation.
	pub fn simulation(&self) -> &Simulation {
		&self.sim
	}

	/// Surface center in graph coordinates at rest.
	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}

	/// Id of the anchored root, if any.
	pub fn anchor_id(&self) -> Option<&str> {
		self.anchor.map(|i| self.graph.nodes[i].id.as_str())
	}

	/// Index of a node by id.
	pub fn node_index(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Graph-space position of a node.
	pub fn node_position(&self, id: &str) -> Option<(f64, f64)> {
		let body = self.sim.body(self.node_index(id)?)?;
		Some((body.x, body.y))
	}

	/// Rendered radius of a node.
	pub fn node_radius(&self, idx: usize) -> f64 {
		self.radii.get(idx).copied().unwrap_or(0.0)
	}

	/// Advances the simulation by one step if it still has energy.
	///
	/// Returns whether further frames are needed.
	pub fn step(&mut self) -> bool {
		if self.phase != ViewPhase::Running || !self.sim.step() {
			return false;
		}
		self.hold_anchor();
		if self.fit_pending && self.sim.alpha() < self.sim.config().fit_alpha {
			self.fit_to_view();
		}
		if self.sim.is_settled() {
			debug!("layout settled");
			return false;
		}
		true
	}

	fn hold_anchor(&mut self) {
		if let Some(idx) = self.anchor {
			let (cx, cy) = self.center();
			self.sim.pin(idx, cx, cy);
		}
	}

	/// Whether more frames are needed: the layout still has energy or a drag is live.
	pub fn is_active(&self) -> bool {
		self.phase == ViewPhase::Running && (self.drag.active || !self.sim.is_settled())
	}

	/// Inverse of the current view transform.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		self.transform.invert(sx, sy)
	}

	/// Nearest node whose hit area contains a screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.sim
			.bodies()
			.iter()
			.enumerate()
			.filter_map(|(i, body)| {
				let d = (body.x - gx).hypot(body.y - gy);
				(d <= self.node_radius(i).max(HIT_RADIUS)).then_some((i, d))
			})
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(i, _)| i)
	}

	/// Sets the hovered node.
	pub fn set_hover(&mut self, node: Option<usize>) {
		self.hover = node;
	}

	/// Starts a drag on a node or a pan on the background.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) -> PointerAction {
		match self.node_at_position(sx, sy) {
			Some(idx) if Some(idx) == self.anchor => PointerAction::Ignored,
			Some(idx) => {
				self.begin_drag(idx, sx, sy);
				PointerAction::Drag(idx)
			}
			None => {
				self.pan = PanState {
					active: true,
					start_x: sx,
					start_y: sy,
					transform_start_x: self.transform.x,
					transform_start_y: self.transform.y,
				};
				self.fit_pending = false;
				PointerAction::Pan
			}
		}
	}

	fn begin_drag(&mut self, idx: usize, sx: f64, sy: f64) {
		let Some(body) = self.sim.body(idx) else {
			return;
		};
		let (x, y) = (body.x, body.y);
		self.drag = DragState {
			active: true,
			node_idx: Some(idx),
			start_x: sx,
			start_y: sy,
			node_start_x: x,
			node_start_y: y,
		};
		let target = self.sim.config().drag_alpha_target;
		self.sim.set_alpha_target(target);
		self.sim.pin(idx, x, y);
		self.fit_pending = false;
	}

	/// Follows the pointer: moves the dragged node, pans, or updates hover.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if self.drag.active {
			if let Some(idx) = self.drag.node_idx {
				let k = self.transform.k;
				let x = self.drag.node_start_x + (sx - self.drag.start_x) / k;
				let y = self.drag.node_start_y + (sy - self.drag.start_y) / k;
				self.sim.pin(idx, x, y);
			}
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		} else {
			let hovered = self.node_at_position(sx, sy);
			self.set_hover(hovered);
		}
	}

	/// Ends any drag or pan. A dragged node is released back to the simulation.
	pub fn pointer_up(&mut self) {
		if self.drag.active {
			if let Some(idx) = self.drag.node_idx {
				self.sim.unpin(idx);
			}
			self.sim.set_alpha_target(0.0);
		}
		self.drag = DragState::default();
		self.pan.active = false;
	}

	/// Pointer left the surface: ends drag or pan and clears hover.
	pub fn pointer_leave(&mut self) {
		self.pointer_up();
		self.set_hover(None);
	}

	/// Zooms around the pointer; positive `delta_y` zooms out.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = 2f64.powf(-delta_y * self.zoom.wheel_sensitivity);
		self.transform.scale_by(factor, sx, sy, self.zoom.scale_extent);
		self.fit_pending = false;
	}

	/// Moves the centering forces and anchored root to the new surface center.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		let (cx, cy) = self.center();
		let centering = self.sim.centering().recentered(cx, cy);
		self.sim.set_centering(centering);
		self.hold_anchor();
	}

	/// Box around every node circle and its label, in graph coordinates.
	pub fn content_bounds(&self) -> Option<Bounds> {
		self.sim
			.bodies()
			.iter()
			.zip(&self.graph.nodes)
			.enumerate()
			.map(|(i, (body, node))| {
				let is_root = self.anchor == Some(i);
				let r = self.radii[i];
				let label_len = style::label_text(node, is_root).chars().count() as f64;
				let font = style::label_font_size(is_root);
				let circle = Bounds::around(body.x, body.y, r);
				let label = Bounds {
					min_x: body.x + r + style::LABEL_OFFSET,
					min_y: body.y + 3.0 - font,
					max_x: body.x + r + style::LABEL_OFFSET + label_len * font * GLYPH_WIDTH,
					max_y: body.y + 3.0,
				};
				circle.union(label)
			})
			.reduce(Bounds::union)
	}

	/// Centers and scales the view on the current layout.
	pub fn fit_to_view(&mut self) {
		self.fit_pending = false;
		let Some(bounds) = self.content_bounds() else {
			return;
		};
		self.transform = ZoomTransform::fit(bounds, self.width, self.height, &self.zoom);
		info!(
			"fitted view: scale {:.3}, translate ({:.1}, {:.1})",
			self.transform.k, self.transform.x, self.transform.y
		);
	}

	/// Snapshot of the current positions as drawable sprites.
	pub fn frame(&self) -> Frame {
		let mut frame = Frame {
			width: self.width,
			height: self.height,
			transform: self.transform,
			..Default::default()
		};
		if self.phase == ViewPhase::Stopped {
			return frame;
		}
		let bodies = self.sim.bodies();

		frame.links = self
			.links
			.iter()
			.filter_map(|&(i, (s, t))| {
				Some(LinkSprite {
					x1: bodies[s].x,
					y1: bodies[s].y,
					x2: bodies[t].x,
					y2: bodies[t].y,
					stops: self.link_styles.stops(i)?,
					opacity: style::LINK_OPACITY,
					width: style::LINK_WIDTH,
				})
			})
			.collect();

		frame.nodes = self
			.graph
			.nodes
			.iter()
			.zip(bodies)
			.enumerate()
			.map(|(i, (node, body))| {
				let is_root = self.anchor == Some(i);
				let (stroke, stroke_width) = style::node_stroke(is_root);
				NodeSprite {
					x: body.x,
					y: body.y,
					radius: self.radii[i],
					fill: style::node_fill(node, is_root),
					stroke,
					stroke_width,
					label: style::label_text(node, is_root),
					font: style::label_font(is_root),
					hovered: self.hover == Some(i),
				}
			})
			.collect();

		frame.tooltip = self.hover.and_then(|i| {
			let body = bodies.get(i)?;
			let (sx, sy) = self.transform.apply(body.x, body.y);
			let offset = self.radii[i] * self.transform.k + 8.0;
			Some(Tooltip {
				x: sx + offset,
				y: sy + offset,
				lines: style::tooltip_lines(&self.graph.nodes[i]),
			})
		});
		frame
	}
}
