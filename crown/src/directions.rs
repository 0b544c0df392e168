use nalgebra as na;
use serde::{Deserialize, Serialize};

/// Cardinal direction of a crown measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
	East,
	North,
	West,
	South,
}

impl Direction {
	/// Canonical measurement order.
	pub const ALL: [Self; 4] = [Self::East, Self::North, Self::West, Self::South];

	/// Horizontal unit vector, x = east and y = north.
	pub fn unit(self) -> na::Vector2<f64> {
		match self {
			Self::East => na::vector![1.0, 0.0],
			Self::North => na::vector![0.0, 1.0],
			Self::West => na::vector![-1.0, 0.0],
			Self::South => na::vector![0.0, -1.0],
		}
	}
}

/// One value per cardinal direction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Directions<T> {
	pub east: T,
	pub north: T,
	pub west: T,
	pub south: T,
}

/// Horizontal distance from the stem axis to the point of maximum crown width.
pub type CrownRadii = Directions<f64>;

/// Proportion of crown length, measured from the crown base, at which the
/// maximum crown width occurs.
pub type CrownEdgeHeights = Directions<f64>;

impl<T: Copy> Directions<T> {
	pub const fn new(east: T, north: T, west: T, south: T) -> Self {
		Self { east, north, west, south }
	}

	pub const fn uniform(value: T) -> Self {
		Self::new(value, value, value, value)
	}

	pub fn from_fn(mut f: impl FnMut(Direction) -> T) -> Self {
		Self::new(
			f(Direction::East),
			f(Direction::North),
			f(Direction::West),
			f(Direction::South),
		)
	}

	pub fn get(&self, direction: Direction) -> T {
		match direction {
			Direction::East => self.east,
			Direction::North => self.north,
			Direction::West => self.west,
			Direction::South => self.south,
		}
	}

	pub fn map<U: Copy>(self, mut f: impl FnMut(T) -> U) -> Directions<U> {
		Directions::from_fn(|direction| f(self.get(direction)))
	}

	pub fn to_array(self) -> [T; 4] {
		[self.east, self.north, self.west, self.south]
	}

	pub fn iter(&self) -> impl Iterator<Item = (Direction, T)> + '_ {
		Direction::ALL.into_iter().map(|direction| (direction, self.get(direction)))
	}
}

impl<T: Copy> From<[T; 4]> for Directions<T> {
	fn from([east, north, west, south]: [T; 4]) -> Self {
		Self::new(east, north, west, south)
	}
}

/// Exponents of the crown profile above (`top`) and below (`bottom`) the
/// peripheral line.
///
/// 1.0 gives a cone, values below 1 concave and values above 1 convex
/// profiles, 2.0 an ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrownShapes {
	pub top: Directions<f64>,
	pub bottom: Directions<f64>,
}

impl CrownShapes {
	pub const CONE: Self = Self::uniform(1.0);

	pub const fn uniform(value: f64) -> Self {
		Self {
			top: Directions::uniform(value),
			bottom: Directions::uniform(value),
		}
	}

	/// Row 0 is the top profile, row 1 the bottom profile, both in E, N, W, S order.
	pub fn from_rows([top, bottom]: [[f64; 4]; 2]) -> Self {
		Self { top: top.into(), bottom: bottom.into() }
	}

	pub fn to_rows(self) -> [[f64; 4]; 2] {
		[self.top.to_array(), self.bottom.to_array()]
	}
}

impl Default for CrownShapes {
	fn default() -> Self {
		Self::CONE
	}
}
