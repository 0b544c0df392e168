use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::{validate, CrownEdgeHeights, CrownRadii, Directions, Error};

/// Vertical extent of the live crown above the stem base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrownExtent {
	pub base: f64,
	pub length: f64,
}

impl CrownExtent {
	pub fn new(top_height: f64, crown_ratio: f64) -> Self {
		Self {
			base: top_height * (1.0 - crown_ratio),
			length: crown_ratio * top_height,
		}
	}

	/// Elevation at `proportion` of the crown length above the crown base.
	pub fn at(&self, proportion: f64) -> f64 {
		self.base + proportion * self.length
	}
}

/// Points of maximum crown width east, north, west and south of the stem,
/// relative to the stem base.
pub fn peripheral_points(
	radii: &CrownRadii,
	edge_heights: &CrownEdgeHeights,
	top_height: f64,
	crown_ratio: f64,
) -> Result<Directions<na::Point3<f64>>, Error> {
	validate::radii(radii)?;
	validate::edge_heights(edge_heights)?;
	validate::top_height(top_height)?;
	validate::crown_ratio(crown_ratio)?;

	let extent = CrownExtent::new(top_height, crown_ratio);
	Ok(Directions::from_fn(|direction| {
		let offset = direction.unit() * radii.get(direction);
		na::point![offset.x, offset.y, extent.at(edge_heights.get(direction))]
	}))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{DomainError, Direction};

	#[test]
	fn points_sit_on_their_axis() {
		let radii = CrownRadii::new(1.0, 2.0, 3.0, 4.0);
		let edges = CrownEdgeHeights::new(0.0, 0.25, 0.5, 1.0);
		let points = peripheral_points(&radii, &edges, 40.0, 0.5).unwrap();

		assert_eq!(points.get(Direction::East), na::point![1.0, 0.0, 20.0]);
		assert_eq!(points.get(Direction::North), na::point![0.0, 2.0, 25.0]);
		assert_eq!(points.get(Direction::West), na::point![-3.0, 0.0, 30.0]);
		assert_eq!(points.get(Direction::South), na::point![0.0, -4.0, 40.0]);
	}

	#[test]
	fn full_crown_starts_at_ground() {
		let extent = CrownExtent::new(30.0, 1.0);
		assert_eq!(extent.base, 0.0);
		assert_eq!(extent.length, 30.0);
		assert!((extent.at(0.3) - 9.0).abs() < 1e-12);
	}

	#[test]
	fn rejects_invalid_inputs() {
		let edges = CrownEdgeHeights::uniform(0.3);
		let result = peripheral_points(&CrownRadii::new(1.0, -1.0, 1.0, 1.0), &edges, 10.0, 0.5);
		assert_eq!(result, Err(Error::Domain(DomainError::NegativeRadius(-1.0))));

		let radii = CrownRadii::uniform(2.0);
		let result = peripheral_points(&radii, &CrownEdgeHeights::uniform(1.5), 10.0, 0.5);
		assert_eq!(result, Err(Error::Domain(DomainError::EdgeHeight(1.5))));

		let result = peripheral_points(&radii, &edges, 10.0, 1.2);
		assert_eq!(result, Err(Error::Domain(DomainError::CrownRatio(1.2))));
	}
}
