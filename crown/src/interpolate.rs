use std::f64::consts::TAU;

/// Periodic piecewise-linear interpolation over azimuth.
///
/// Samples are sorted by angle and the loop is closed by repeating the last
/// sample one period below the first and the first sample one period above
/// the last, so every query angle has a bracketing pair.
#[derive(Debug, Clone, PartialEq)]
pub struct CircularInterpolator {
	angles: Vec<f64>,
	values: Vec<f64>,
}

impl CircularInterpolator {
	/// `samples` are `(angle, value)` pairs with angles in radians, any range.
	/// Without samples every query evaluates to 0.
	pub fn new(samples: &[(f64, f64)]) -> Self {
		let mut sorted = samples
			.iter()
			.map(|&(angle, value)| (angle.rem_euclid(TAU), value))
			.collect::<Vec<_>>();
		sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

		let (Some(&first), Some(&last)) = (sorted.first(), sorted.last()) else {
			return Self { angles: Vec::new(), values: Vec::new() };
		};

		let mut angles = Vec::with_capacity(sorted.len() + 2);
		let mut values = Vec::with_capacity(sorted.len() + 2);
		angles.push(last.0 - TAU);
		values.push(last.1);
		for (angle, value) in sorted {
			angles.push(angle);
			values.push(value);
		}
		angles.push(first.0 + TAU);
		values.push(first.1);

		Self { angles, values }
	}

	pub fn at(&self, angle: f64) -> f64 {
		if self.angles.is_empty() {
			return 0.0;
		}
		let angle = angle.rem_euclid(TAU);

		// angles[0] < 0 <= angle < TAU <= angles[last]
		let upper = self
			.angles
			.partition_point(|&a| a <= angle)
			.clamp(1, self.angles.len() - 1);
		let lower = upper - 1;

		let span = self.angles[upper] - self.angles[lower];
		if span <= 0.0 {
			return self.values[lower];
		}
		let t = (angle - self.angles[lower]) / span;
		self.values[lower] + t * (self.values[upper] - self.values[lower])
	}
}
