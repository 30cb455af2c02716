//! Pan/zoom affine transform applied to the whole drawing layer.

/// Zoom limits and fitting behaviour.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoomConfig {
	/// Smallest and largest allowed scale.
	pub scale_extent: (f64, f64),
	/// Largest scale the initial fit may choose.
	pub max_fit_scale: f64,
	/// Fraction of the viewport the fitted content may occupy.
	pub fit_padding: f64,
	/// Wheel delta to log2 scale factor.
	pub wheel_sensitivity: f64,
}

impl Default for ZoomConfig {
	fn default() -> Self {
		Self {
			scale_extent: (0.1, 4.0),
			max_fit_scale: 0.8,
			fit_padding: 0.8,
			wheel_sensitivity: 0.002,
		}
	}
}

/// Axis-aligned box in graph coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	/// Left edge.
	pub min_x: f64,
	/// Top edge.
	pub min_y: f64,
	/// Right edge.
	pub max_x: f64,
	/// Bottom edge.
	pub max_y: f64,
}

impl Bounds {
	/// Square around a circle.
	pub fn around(x: f64, y: f64, r: f64) -> Self {
		Self {
			min_x: x - r,
			min_y: y - r,
			max_x: x + r,
			max_y: y + r,
		}
	}

	/// Smallest box containing both.
	pub fn union(self, other: Bounds) -> Self {
		Self {
			min_x: self.min_x.min(other.min_x),
			min_y: self.min_y.min(other.min_y),
			max_x: self.max_x.max(other.max_x),
			max_y: self.max_y.max(other.max_y),
		}
	}

	/// Horizontal extent.
	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	/// Vertical extent.
	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}
}

/// `screen = graph * k + (x, y)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomTransform {
	/// Horizontal translation in screen pixels.
	pub x: f64,
	/// Vertical translation in screen pixels.
	pub y: f64,
	/// Scale factor.
	pub k: f64,
}

impl Default for ZoomTransform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl ZoomTransform {
	/// No pan, unit scale.
	pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, k: 1.0 };

	/// Graph point to screen point.
	pub fn apply(&self, gx: f64, gy: f64) -> (f64, f64) {
		(gx * self.k + self.x, gy * self.k + self.y)
	}

	/// Screen point to graph point.
	pub fn invert(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Multiplies the scale by `factor`, clamped to `extent`, keeping the
	/// graph point under the screen point `(sx, sy)` fixed.
	pub fn scale_by(&mut self, factor: f64, sx: f64, sy: f64, extent: (f64, f64)) {
		let k = (self.k * factor).clamp(extent.0, extent.1);
		let (gx, gy) = self.invert(sx, sy);
		self.x = sx - gx * k;
		self.y = sy - gy * k;
		self.k = k;
	}

	/// Transform that centers `bounds` in a `width` x `height` viewport,
	/// scaled to fit but never past `max_fit_scale`.
	pub fn fit(bounds: Bounds, width: f64, height: f64, config: &ZoomConfig) -> Self {
		let (bw, bh) = (bounds.width(), bounds.height());
		let fit = if bw > 0.0 && bh > 0.0 {
			config.fit_padding * (width / bw).min(height / bh)
		} else {
			config.max_fit_scale
		};
		let k = fit
			.min(config.max_fit_scale)
			.clamp(config.scale_extent.0, config.scale_extent.1);
		Self {
			x: (width - bw * k) / 2.0 - bounds.min_x * k,
			y: (height - bh * k) / 2.0 - bounds.min_y * k,
			k,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const EXTENT: (f64, f64) = (0.1, 4.0);

	#[test]
	fn zoom_in_then_out_restores_scale() {
		let mut t = ZoomTransform { x: 30.0, y: -12.0, k: 1.0 };
		t.scale_by(2.0, 200.0, 150.0, EXTENT);
		assert_eq!(t.k, 2.0);
		t.scale_by(0.5, 200.0, 150.0, EXTENT);
		assert_eq!(t.k, 1.0);
		assert!((t.x - 30.0).abs() < 1e-9 && (t.y + 12.0).abs() < 1e-9);
	}

	#[test]
	fn zoom_keeps_anchor_fixed() {
		let mut t = ZoomTransform { x: 10.0, y: 20.0, k: 1.5 };
		let before = t.invert(320.0, 240.0);
		t.scale_by(1.7, 320.0, 240.0, EXTENT);
		let after = t.invert(320.0, 240.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn zoom_is_clamped() {
		let mut t = ZoomTransform::IDENTITY;
		t.scale_by(100.0, 0.0, 0.0, EXTENT);
		assert_eq!(t.k, 4.0);
		t.scale_by(1e-6, 0.0, 0.0, EXTENT);
		assert_eq!(t.k, 0.1);
	}

	#[test]
	fn apply_and_invert_agree() {
		let t = ZoomTransform { x: -40.0, y: 7.5, k: 0.25 };
		let (sx, sy) = t.apply(123.0, -456.0);
		let (gx, gy) = t.invert(sx, sy);
		assert!((gx - 123.0).abs() < 1e-9 && (gy + 456.0).abs() < 1e-9);
	}

	#[test]
	fn small_graphs_are_not_over_magnified() {
		let bounds = Bounds { min_x: 0.0, min_y: 0.0, max_x: 200.0, max_y: 100.0 };
		let t = ZoomTransform::fit(bounds, 800.0, 600.0, &ZoomConfig::default());
		assert_eq!(t.k, 0.8);
		assert_eq!((t.x, t.y), (320.0, 260.0));
	}

	#[test]
	fn large_graphs_are_scaled_to_fit() {
		let bounds = Bounds { min_x: -1000.0, min_y: -500.0, max_x: 1000.0, max_y: 500.0 };
		let t = ZoomTransform::fit(bounds, 800.0, 600.0, &ZoomConfig::default());
		assert!((t.k - 0.32).abs() < 1e-12);
		let (cx, cy) = t.apply(0.0, 0.0);
		assert!((cx - 400.0).abs() < 1e-9 && (cy - 300.0).abs() < 1e-9);
	}
}
