//! Iterative force simulation with a decaying energy parameter ("alpha").
//!
//! Each [`Simulation::tick`] decays alpha toward its target, applies the link,
//! repulsion, centering and collision forces to body velocities, then
//! integrates. Pinned bodies (`fx`/`fy`) ignore their velocity and sit on the
//! pin. Once alpha drops below `alpha_min` the simulation reports itself
//! settled and stops advancing until something raises the target again.
//!
//! All pairwise forces are evaluated directly; this is meant for graphs of a
//! few hundred nodes, not thousands.

use std::f64::consts::PI;

/// Tuning for every force, with each force independently adjustable.
#[derive(Clone, Debug, PartialEq)]
pub struct ForceConfig {
	/// Rest length of a link.
	pub link_distance: f64,
	/// Many-body strength; negative repels.
	pub charge_strength: f64,
	/// Pull toward the horizontal and vertical target when a root is anchored.
	pub axis_strength: f64,
	/// Extra separation added to each rendered radius for collisions.
	pub collision_margin: f64,
	/// How much of an overlap is resolved per tick, in `[0, 1]`.
	pub collision_strength: f64,
	/// Rendered node radius range, fed by follower count.
	pub radius_range: (f64, f64),
	/// Energy below which the simulation counts as settled.
	pub alpha_min: f64,
	/// Fraction of the gap to the alpha target closed each tick.
	pub alpha_decay: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Alpha target held while a node is being dragged.
	pub drag_alpha_target: f64,
	/// Alpha below which the layout is considered presentable for the initial fit.
	pub fit_alpha: f64,
}

impl Default for ForceConfig {
	fn default() -> Self {
		let alpha_min = 0.001;
		Self {
			link_distance: 100.0,
			charge_strength: -300.0,
			axis_strength: 0.1,
			collision_margin: 5.0,
			collision_strength: 1.0,
			radius_range: (5.0, 30.0),
			alpha_min,
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			drag_alpha_target: 0.3,
			fit_alpha: 0.3,
		}
	}
}

/// How bodies are kept near the middle of the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Centering {
	/// Translate the whole layout so its mean sits on the point.
	Point {
		/// Target x.
		x: f64,
		/// Target y.
		y: f64,
	},
	/// Weak independent pulls toward `x` and `y`.
	Axes {
		/// Target x.
		x: f64,
		/// Target y.
		y: f64,
		/// Pull per tick as a fraction of the offset.
		strength: f64,
	},
}

impl Centering {
	/// The point bodies are drawn toward.
	pub fn target(&self) -> (f64, f64) {
		match *self {
			Centering::Point { x, y } | Centering::Axes { x, y, .. } => (x, y),
		}
	}

	/// Same kind of centering, moved to a new point.
	pub fn recentered(self, x: f64, y: f64) -> Self {
		match self {
			Centering::Point { .. } => Centering::Point { x, y },
			Centering::Axes { strength, .. } => Centering::Axes { x, y, strength },
		}
	}
}

/// Position, velocity and optional pin of one node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Body {
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
	/// Horizontal velocity.
	pub vx: f64,
	/// Vertical velocity.
	pub vy: f64,
	/// Pinned x; a pinned body ignores its velocity.
	pub fx: Option<f64>,
	/// Pinned y.
	pub fy: Option<f64>,
}

/// Deterministic linear congruential source for jiggling coincident bodies.
#[derive(Clone, Debug)]
struct Lcg(u64);

impl Lcg {
	const A: u64 = 1_664_525;
	const C: u64 = 1_013_904_223;
	const M: u64 = 1 << 32;

	fn next(&mut self) -> f64 {
		self.0 = (Self::A * self.0 + Self::C) % Self::M;
		self.0 as f64 / Self::M as f64
	}

	fn jiggle(&mut self) -> f64 {
		(self.next() - 0.5) * 1e-6
	}
}

/// A link resolved to body indices, with its precomputed strength and bias.
#[derive(Clone, Debug)]
struct Spring {
	source: usize,
	target: usize,
	strength: f64,
	bias: f64,
}

/// Bodies, springs and the energy schedule that drives them.
pub struct Simulation {
	bodies: Vec<Body>,
	springs: Vec<Spring>,
	radii: Vec<f64>,
	centering: Centering,
	config: ForceConfig,
	alpha: f64,
	alpha_target: f64,
	rng: Lcg,
}

impl Simulation {
	/// Builds a simulation over `count` bodies.
	///
	/// `links` are index pairs into the bodies; `radii` are the collision radii
	/// (rendered radius plus margin) and must have one entry per body.
	pub fn new(
		count: usize,
		links: &[(usize, usize)],
		radii: Vec<f64>,
		centering: Centering,
		config: ForceConfig,
	) -> Self {
		debug_assert_eq!(radii.len(), count);
		let (cx, cy) = centering.target();
		let golden = PI * (3.0 - 5f64.sqrt());
		let bodies = (0..count)
			.map(|i| {
				let radius = 10.0 * (0.5 + i as f64).sqrt();
				let angle = i as f64 * golden;
				Body {
					x: cx + radius * angle.cos(),
					y: cy + radius * angle.sin(),
					..Default::default()
				}
			})
			.collect();

		let mut degree = vec![0usize; count];
		for &(s, t) in links {
			degree[s] += 1;
			degree[t] += 1;
		}
		let springs = links
			.iter()
			.filter(|(s, t)| s != t)
			.map(|&(source, target)| Spring {
				source,
				target,
				strength: 1.0 / degree[source].min(degree[target]) as f64,
				bias: degree[source] as f64 / (degree[source] + degree[target]) as f64,
			})
			.collect();

		Self {
			bodies,
			springs,
			radii,
			centering,
			config,
			alpha: 1.0,
			alpha_target: 0.0,
			rng: Lcg(1),
		}
	}

	/// Bodies in node order.
	pub fn bodies(&self) -> &[Body] {
		&self.bodies
	}

	/// One body by node index.
	pub fn body(&self, idx: usize) -> Option<&Body> {
		self.bodies.get(idx)
	}

	/// Tuning this simulation was built with.
	pub fn config(&self) -> &ForceConfig {
		&self.config
	}

	/// Current energy.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Energy alpha is decaying toward.
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Energy that alpha decays toward; raising it wakes a settled layout.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	/// Active centering force.
	pub fn centering(&self) -> Centering {
		self.centering
	}

	/// Replaces the centering force, e.g. after a resize.
	pub fn set_centering(&mut self, centering: Centering) {
		self.centering = centering;
	}

	/// Whether the energy has decayed below the rest threshold.
	pub fn is_settled(&self) -> bool {
		self.alpha < self.config.alpha_min
	}

	/// Fixes a body at `(x, y)` until [`Simulation::unpin`].
	pub fn pin(&mut self, idx: usize, x: f64, y: f64) {
		if let Some(body) = self.bodies.get_mut(idx) {
			body.fx = Some(x);
			body.fy = Some(y);
			body.x = x;
			body.y = y;
		}
	}

	/// Returns a body to the simulation.
	pub fn unpin(&mut self, idx: usize) {
		if let Some(body) = self.bodies.get_mut(idx) {
			body.fx = None;
			body.fy = None;
		}
	}

	/// Advances one tick if not settled. Returns whether a tick happened.
	pub fn step(&mut self) -> bool {
		if self.is_settled() && self.alpha_target < self.config.alpha_min {
			return false;
		}
		self.tick();
		true
	}

	/// Advances the physics by one increment, unconditionally.
	pub fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
		let alpha = self.alpha;

		self.apply_links(alpha);
		self.apply_charge(alpha);
		self.apply_centering(alpha);
		self.apply_collisions();

		let keep = 1.0 - self.config.velocity_decay;
		for body in &mut self.bodies {
			match body.fx {
				Some(fx) => {
					body.x = fx;
					body.vx = 0.0;
				}
				None => {
					body.vx *= keep;
					body.x += body.vx;
				}
			}
			match body.fy {
				Some(fy) => {
					body.y = fy;
					body.vy = 0.0;
				}
				None => {
					body.vy *= keep;
					body.y += body.vy;
				}
			}
		}
	}

	fn apply_links(&mut self, alpha: f64) {
		let distance = self.config.link_distance;
		for spring in &self.springs {
			let (s, t) = (&self.bodies[spring.source], &self.bodies[spring.target]);
			let mut dx = t.x + t.vx - s.x - s.vx;
			let mut dy = t.y + t.vy - s.y - s.vy;
			if dx == 0.0 {
				dx = self.rng.jiggle();
			}
			if dy == 0.0 {
				dy = self.rng.jiggle();
			}
			let len = (dx * dx + dy * dy).sqrt();
			let l = (len - distance) / len * alpha * spring.strength;
			let (dx, dy) = (dx * l, dy * l);

			let t = &mut self.bodies[spring.target];
			t.vx -= dx * spring.bias;
			t.vy -= dy * spring.bias;
			let s = &mut self.bodies[spring.source];
			s.vx += dx * (1.0 - spring.bias);
			s.vy += dy * (1.0 - spring.bias);
		}
	}

	fn apply_charge(&mut self, alpha: f64) {
		let strength = self.config.charge_strength;
		if strength == 0.0 {
			return;
		}
		let n = self.bodies.len();
		for i in 0..n {
			let (xi, yi) = (self.bodies[i].x, self.bodies[i].y);
			let (mut ax, mut ay) = (0.0, 0.0);
			for j in 0..n {
				if i == j {
					continue;
				}
				let mut dx = self.bodies[j].x - xi;
				let mut dy = self.bodies[j].y - yi;
				let mut l = dx * dx + dy * dy;
				if dx == 0.0 {
					dx = self.rng.jiggle();
					l += dx * dx;
				}
				if dy == 0.0 {
					dy = self.rng.jiggle();
					l += dy * dy;
				}
				// distanceMin of 1
				if l < 1.0 {
					l = l.sqrt();
				}
				let w = strength * alpha / l;
				ax += dx * w;
				ay += dy * w;
			}
			self.bodies[i].vx += ax;
			self.bodies[i].vy += ay;
		}
	}

	fn apply_centering(&mut self, alpha: f64) {
		match self.centering {
			Centering::Axes { x, y, strength } => {
				for body in &mut self.bodies {
					body.vx += (x - body.x) * strength * alpha;
					body.vy += (y - body.y) * strength * alpha;
				}
			}
			Centering::Point { x, y } => {
				if self.bodies.is_empty() {
					return;
				}
				let n = self.bodies.len() as f64;
				let (sx, sy) = self
					.bodies
					.iter()
					.fold((0.0, 0.0), |(sx, sy), b| (sx + b.x, sy + b.y));
				let (sx, sy) = (sx / n - x, sy / n - y);
				for body in &mut self.bodies {
					body.x -= sx;
					body.y -= sy;
				}
			}
		}
	}

	fn apply_collisions(&mut self) {
		let strength = self.config.collision_strength;
		let n = self.bodies.len();
		for i in 0..n {
			let ri = self.radii[i];
			let ri2 = ri * ri;
			let xi = self.bodies[i].x + self.bodies[i].vx;
			let yi = self.bodies[i].y + self.bodies[i].vy;
			for j in (i + 1)..n {
				let rj = self.radii[j];
				let r = ri + rj;
				let mut dx = xi - self.bodies[j].x - self.bodies[j].vx;
				let mut dy = yi - self.bodies[j].y - self.bodies[j].vy;
				let mut l = dx * dx + dy * dy;
				if l >= r * r {
					continue;
				}
				if dx == 0.0 {
					dx = self.rng.jiggle();
					l += dx * dx;
				}
				if dy == 0.0 {
					dy = self.rng.jiggle();
					l += dy * dy;
				}
				let len = l.sqrt();
				let push = (r - len) / len * strength;
				let (dx, dy) = (dx * push, dy * push);
				let share = (rj * rj) / (ri2 + rj * rj);

				self.bodies[i].vx += dx * share;
				self.bodies[i].vy += dy * share;
				self.bodies[j].vx -= dx * (1.0 - share);
				self.bodies[j].vy -= dy * (1.0 - share);
			}
		}
	}
}
