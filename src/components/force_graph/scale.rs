//! Radius scale for follower counts.

/// Square-root scale: maps `[0, domain_max]` onto a range so that the
/// *area* of a circle of the output radius grows linearly with the input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SqrtScale {
	domain: (f64, f64),
	range: (f64, f64),
}

impl SqrtScale {
	/// Scale from `domain` onto `range`.
	pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
		Self { domain, range }
	}

	/// Maps `value`. A degenerate domain maps everything to the middle of the range.
	pub fn scale(&self, value: f64) -> f64 {
		let (d0, d1) = (signed_sqrt(self.domain.0), signed_sqrt(self.domain.1));
		let t = if d1 == d0 {
			0.5
		} else {
			(signed_sqrt(value) - d0) / (d1 - d0)
		};
		self.range.0 + (self.range.1 - self.range.0) * t
	}
}

fn signed_sqrt(x: f64) -> f64 {
	x.signum() * x.abs().sqrt()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn endpoints_map_to_range() {
		let scale = SqrtScale::new((0.0, 400.0), (5.0, 30.0));
		assert_eq!(scale.scale(0.0), 5.0);
		assert_eq!(scale.scale(400.0), 30.0);
		// sqrt(100) / sqrt(400) = 0.5
		assert_eq!(scale.scale(100.0), 17.5);
	}

	#[test]
	fn area_grows_linearly() {
		let scale = SqrtScale::new((0.0, 10_000.0), (0.0, 50.0));
		let area = |v: f64| scale.scale(v).powi(2);
		assert!((area(5_000.0) * 2.0 - area(10_000.0)).abs() < 1e-6);
	}

	#[test]
	fn empty_domain_uses_midpoint() {
		let scale = SqrtScale::new((0.0, 0.0), (5.0, 30.0));
		assert_eq!(scale.scale(0.0), 17.5);
	}
}
