use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::{check_lengths, validate, Error};

/// Lean of a stem away from vertical, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Lean {
	/// Direction the tree leans toward, 0 = east, 90 = north, 180 = west.
	pub direction: f64,
	/// Angle from vertical, 0 = upright. Must stay below 90.
	pub severity: f64,
}

impl Lean {
	pub const UPRIGHT: Self = Self { direction: 0.0, severity: 0.0 };

	pub fn new(direction: f64, severity: f64) -> Self {
		Self { direction, severity }
	}

	/// Horizontal displacement of the point `height` above the stem base.
	pub fn offset(self, height: f64) -> na::Vector2<f64> {
		let reach = height * self.severity.to_radians().tan();
		let direction = self.direction.to_radians();
		na::vector![reach * direction.cos(), reach * direction.sin()]
	}
}

/// Translation that places a crown modeled about the origin onto its stem.
///
/// The horizontal part follows the lean of the stem up to `top_height`, the
/// vertical part is the stem base elevation. The height of the crown itself
/// is carried by the hull apex.
pub fn treetop_location(
	stem_base: na::Point3<f64>,
	top_height: f64,
	lean: Lean,
) -> Result<na::Point3<f64>, Error> {
	validate::point("stem base", &stem_base)?;
	validate::top_height(top_height)?;
	validate::lean(lean)?;

	let offset = lean.offset(top_height);
	Ok(na::point![stem_base.x + offset.x, stem_base.y + offset.y, stem_base.z])
}

/// Stems as equal-length columns for batched treetop computation.
///
/// Missing lean columns count as upright stems.
#[derive(Debug, Clone, Copy)]
pub struct StemColumns<'a> {
	pub x: &'a [f64],
	pub y: &'a [f64],
	pub z: &'a [f64],
	pub top_height: &'a [f64],
	pub lean_direction: Option<&'a [f64]>,
	pub lean_severity: Option<&'a [f64]>,
}

impl<'a> StemColumns<'a> {
	pub fn new(x: &'a [f64], y: &'a [f64], z: &'a [f64], top_height: &'a [f64]) -> Self {
		Self {
			x,
			y,
			z,
			top_height,
			lean_direction: None,
			lean_severity: None,
		}
	}

	pub fn with_lean(self, direction: &'a [f64], severity: &'a [f64]) -> Self {
		Self {
			lean_direction: Some(direction),
			lean_severity: Some(severity),
			..self
		}
	}

	pub fn len(&self) -> usize {
		self.x.len()
	}

	pub fn is_empty(&self) -> bool {
		self.x.is_empty()
	}

	/// Treetop translation for every stem, see [`treetop_location`].
	///
	/// Column lengths are compared before anything is computed.
	pub fn treetops(&self) -> Result<Vec<na::Point3<f64>>, Error> {
		let mut lengths = vec![
			self.x.len(),
			self.y.len(),
			self.z.len(),
			self.top_height.len(),
		];
		lengths.extend(self.lean_direction.map(<[f64]>::len));
		lengths.extend(self.lean_severity.map(<[f64]>::len));
		check_lengths(&lengths)?;

		(0..self.len())
			.map(|idx| {
				let lean = Lean {
					direction: self.lean_direction.map_or(0.0, |column| column[idx]),
					severity: self.lean_severity.map_or(0.0, |column| column[idx]),
				};
				treetop_location(
					na::point![self.x[idx], self.y[idx], self.z[idx]],
					self.top_height[idx],
					lean,
				)
			})
			.collect()
	}
}
