use std::f64::consts::TAU;

use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::{
	hull_apex_and_base, peripheral_points, treetop_location, validate, CircularInterpolator,
	CrownEdgeHeights, CrownRadii, CrownShapes, Direction, Directions, Error, HullAxis, Lean,
};

/// Azimuth samples around the crown, 0 and 2π both included.
pub const AZIMUTH_SAMPLES: usize = 32;
/// Height samples from hull base to hull apex, both included.
pub const HEIGHT_SAMPLES: usize = 50;
/// Points in one sub-grid of a crown.
pub const SUBGRID_LEN: usize = AZIMUTH_SAMPLES * HEIGHT_SAMPLES;

/// Everything needed to build a crown hull.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrownParams {
	pub stem_base: na::Point3<f64>,
	pub top_height: f64,
	pub crown_ratio: f64,
	pub lean: Lean,
	pub crown_radii: CrownRadii,
	pub crown_edge_heights: CrownEdgeHeights,
	pub crown_shapes: CrownShapes,
	pub top_only: bool,
}

impl CrownParams {
	pub fn validate(&self) -> Result<(), Error> {
		validate::point("stem base", &self.stem_base)?;
		validate::top_height(self.top_height)?;
		validate::crown_ratio(self.crown_ratio)?;
		validate::lean(self.lean)?;
		validate::radii(&self.crown_radii)?;
		validate::edge_heights(&self.crown_edge_heights)?;
		validate::shapes(&self.crown_shapes)?;
		Ok(())
	}
}

/// Crown surface points in world coordinates.
///
/// The points form one (top only) or two (top, then bottom) sub-grids of
/// [`SUBGRID_LEN`] points. Each sub-grid is stored row-major with
/// [`HEIGHT_SAMPLES`] rows of [`AZIMUTH_SAMPLES`] points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Crown {
	pub xs: Vec<f64>,
	pub ys: Vec<f64>,
	pub zs: Vec<f64>,
}

impl Crown {
	fn with_capacity(capacity: usize) -> Self {
		Self {
			xs: Vec::with_capacity(capacity),
			ys: Vec::with_capacity(capacity),
			zs: Vec::with_capacity(capacity),
		}
	}

	fn push(&mut self, point: na::Point3<f64>) {
		self.xs.push(point.x);
		self.ys.push(point.y);
		self.zs.push(point.z);
	}

	pub fn len(&self) -> usize {
		self.xs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.xs.is_empty()
	}

	pub fn sub_grids(&self) -> usize {
		self.len() / SUBGRID_LEN
	}

	pub fn point(&self, index: usize) -> na::Point3<f64> {
		na::point![self.xs[index], self.ys[index], self.zs[index]]
	}

	/// Point at `row` (height sample) and `column` (azimuth sample) of a sub-grid.
	pub fn grid_point(&self, sub_grid: usize, row: usize, column: usize) -> Option<na::Point3<f64>> {
		if row >= HEIGHT_SAMPLES || column >= AZIMUTH_SAMPLES {
			return None;
		}
		let index = sub_grid * SUBGRID_LEN + row * AZIMUTH_SAMPLES + column;
		(index < self.len()).then(|| self.point(index))
	}

	pub fn points(&self) -> impl Iterator<Item = na::Point3<f64>> + '_ {
		(0..self.len()).map(|index| self.point(index))
	}

	/// Axis-aligned bounding box as `(min, max)`.
	pub fn bounds(&self) -> Option<(na::Point3<f64>, na::Point3<f64>)> {
		let mut points = self.points();
		let first = points.next()?;
		Some(points.fold((first, first), |(min, max), p| (min.inf(&p), max.sup(&p))))
	}
}

/// Intermediate geometry of a crown: where it sits and what shapes it.
///
/// Peripheral points and the hull axis are relative to the stem base,
/// `treetop` is the translation into world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HullFrame {
	pub treetop: na::Point3<f64>,
	pub peripheral_points: Directions<na::Point3<f64>>,
	pub axis: HullAxis,
}

impl HullFrame {
	pub fn new(params: &CrownParams) -> Result<Self, Error> {
		params.validate()?;
		Ok(Self {
			treetop: treetop_location(params.stem_base, params.top_height, params.lean)?,
			peripheral_points: peripheral_points(
				&params.crown_radii,
				&params.crown_edge_heights,
				params.top_height,
				params.crown_ratio,
			)?,
			axis: hull_apex_and_base(&params.crown_radii, params.top_height, params.crown_ratio)?,
		})
	}

	pub fn crown(&self, shapes: &CrownShapes, top_only: bool) -> Crown {
		let surface = Surface::new(&self.peripheral_points, self.axis, shapes);
		surface.crown(self.treetop, top_only)
	}
}

/// Build the crown hull described by `params`.
///
/// All inputs are validated before any grid computation.
pub fn compute_crown(params: &CrownParams) -> Result<Crown, Error> {
	let frame = HullFrame::new(params)?;
	Ok(frame.crown(&params.crown_shapes, params.top_only))
}

/// Crown hull about the stem base, evaluated one azimuth column at a time.
struct Surface {
	axis: HullAxis,
	columns: Vec<Column>,
	heights: Vec<f64>,
}

/// Peripheral line and profile exponents at one azimuth.
#[derive(Debug, Clone, Copy)]
struct Column {
	/// Azimuth about the apex.
	theta: f64,
	/// Widest point of the crown at this azimuth.
	edge: na::Point3<f64>,
	top_radius: f64,
	top_shape: f64,
	/// Azimuth of `edge` about the base.
	bottom_theta: f64,
	bottom_radius: f64,
	bottom_shape: f64,
}

/// Peripheral line, radii and shape coefficients interpolated over azimuth.
struct PeripheralLine {
	axis: HullAxis,
	radius: CircularInterpolator,
	drop: CircularInterpolator,
	top_shape: CircularInterpolator,
	bottom_shape: CircularInterpolator,
}

impl PeripheralLine {
	fn new(peripheral: &Directions<na::Point3<f64>>, axis: HullAxis, shapes: &CrownShapes) -> Self {
		let from_apex = peripheral.map(|p| polar(axis.apex.xy(), p.xy()));
		let from_base = peripheral.map(|p| polar(axis.base.xy(), p.xy()));

		Self {
			axis,
			radius: around(&from_apex, |d| from_apex.get(d).1),
			drop: around(&from_apex, |d| axis.apex.z - peripheral.get(d).z),
			top_shape: around(&from_apex, |d| shapes.top.get(d)),
			bottom_shape: around(&from_base, |d| shapes.bottom.get(d)),
		}
	}

	/// Column at azimuth `theta` about the apex.
	fn column(&self, theta: f64) -> Column {
		let apex = self.axis.apex;
		let top_radius = self.radius.at(theta);
		let (sin, cos) = theta.sin_cos();
		let edge = na::point![
			apex.x + top_radius * cos,
			apex.y + top_radius * sin,
			apex.z - self.drop.at(theta)
		];
		let (bottom_theta, bottom_radius) = polar(self.axis.base.xy(), edge.xy());
		Column {
			theta,
			edge,
			top_radius,
			top_shape: self.top_shape.at(theta),
			bottom_theta,
			bottom_radius,
			bottom_shape: self.bottom_shape.at(bottom_theta),
		}
	}
}

impl Surface {
	fn new(peripheral: &Directions<na::Point3<f64>>, axis: HullAxis, shapes: &CrownShapes) -> Self {
		let line = PeripheralLine::new(peripheral, axis, shapes);
		Self {
			axis,
			columns: linspace(0.0, TAU, AZIMUTH_SAMPLES)
				.map(|theta| line.column(theta))
				.collect(),
			heights: linspace(axis.base.z, axis.apex.z, HEIGHT_SAMPLES).collect(),
		}
	}

	fn crown(&self, translation: na::Point3<f64>, top_only: bool) -> Crown {
		let top_cells = self
			.heights
			.iter()
			.map(|&z| self.columns.iter().filter(|column| z >= column.edge.z).count())
			.sum::<usize>();
		log::debug!(
			"crown grid: {} of {} cells above the peripheral line",
			top_cells,
			SUBGRID_LEN
		);

		let offset = translation.coords;
		let sub_grids = if top_only { 1 } else { 2 };
		let mut crown = Crown::with_capacity(sub_grids * SUBGRID_LEN);
		for &z in &self.heights {
			for column in &self.columns {
				crown.push(column.top(&self.axis, z) + offset);
			}
		}
		if !top_only {
			for &z in &self.heights {
				for column in &self.columns {
					crown.push(column.bottom(&self.axis, z) + offset);
				}
			}
		}
		crown
	}
}

impl Column {
	/// Hull point at height `z` on the profile between peripheral line and apex.
	///
	/// Heights below the peripheral line collapse onto it.
	fn top(&self, axis: &HullAxis, z: f64) -> na::Point3<f64> {
		let z = within(z, self.edge.z, axis.apex.z);
		let f = normalized(z - self.edge.z, axis.apex.z - self.edge.z);
		let r = profile(f, self.top_radius, self.top_shape);
		let (sin, cos) = self.theta.sin_cos();
		na::point![axis.apex.x + r * cos, axis.apex.y + r * sin, z]
	}

	/// Hull point at height `z` on the profile between peripheral line and base.
	///
	/// Heights above the peripheral line collapse onto it.
	fn bottom(&self, axis: &HullAxis, z: f64) -> na::Point3<f64> {
		let z = within(z, axis.base.z, self.edge.z);
		let f = normalized(self.edge.z - z, self.edge.z - axis.base.z);
		let r = profile(f, self.bottom_radius, self.bottom_shape);
		let (sin, cos) = self.bottom_theta.sin_cos();
		na::point![axis.base.x + r * cos, axis.base.y + r * sin, z]
	}
}

/// Radius of a superellipse profile at normalized distance `f` in [0, 1]
/// from the peripheral line, where the radius is `radius`.
fn profile(f: f64, radius: f64, shape: f64) -> f64 {
	((1.0 - f.powf(shape)) * radius.powf(shape)).powf(shape.recip())
}

/// `distance / span` in [0, 1], 0 for an empty span.
fn normalized(distance: f64, span: f64) -> f64 {
	if span > 0.0 {
		(distance / span).clamp(0.0, 1.0)
	} else {
		0.0
	}
}

/// Clamp that tolerates `lower > upper` from rounding, `upper` wins.
fn within(value: f64, lower: f64, upper: f64) -> f64 {
	value.max(lower).min(upper)
}

/// `(angle, distance)` of `point` about `center`.
fn polar(center: na::Point2<f64>, point: na::Point2<f64>) -> (f64, f64) {
	let d = point - center;
	(d.y.atan2(d.x), d.norm())
}

/// Interpolator over the azimuths in `polar`, one sample per direction.
fn around(polar: &Directions<(f64, f64)>, value: impl Fn(Direction) -> f64) -> CircularInterpolator {
	let samples = Direction::ALL.map(|d| (polar.get(d).0, value(d)));
	CircularInterpolator::new(&samples)
}

/// `count` evenly spaced values from `start` to `end`, both included.
fn linspace(start: f64, end: f64, count: usize) -> impl Iterator<Item = f64> {
	let step = if count > 1 { (end - start) / (count - 1) as f64 } else { 0.0 };
	(0..count).map(move |idx| {
		if idx + 1 == count && count > 1 {
			end
		} else {
			start + idx as f64 * step
		}
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn params() -> CrownParams {
		CrownParams {
			stem_base: na::Point3::origin(),
			top_height: 80.0,
			crown_ratio: 0.5,
			lean: Lean::UPRIGHT,
			crown_radii: CrownRadii::uniform(10.0),
			crown_edge_heights: CrownEdgeHeights::uniform(0.3),
			crown_shapes: CrownShapes::CONE,
			top_only: false,
		}
	}

	#[test]
	fn linspace_includes_ends() {
		let values = linspace(2.0, 7.0, 6).collect::<Vec<_>>();
		assert_eq!(values, vec![2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
		assert_eq!(linspace(1.0, 3.0, 1).collect::<Vec<_>>(), vec![1.0]);
		assert_eq!(linspace(0.0, TAU, AZIMUTH_SAMPLES).last(), Some(TAU));
	}

	#[test]
	fn profile_shapes() {
		for shape in [0.5, 1.0, 2.0, 3.5] {
			assert!((profile(0.0, 4.0, shape) - 4.0).abs() < 1e-12);
			assert_eq!(profile(1.0, 4.0, shape), 0.0);
		}
		// cone
		assert!((profile(0.25, 4.0, 1.0) - 3.0).abs() < 1e-12);
		// ellipse
		assert!((profile(0.6, 5.0, 2.0) - 4.0).abs() < 1e-12);
		// convex profiles stay wider than the cone, concave narrower
		assert!(profile(0.5, 1.0, 3.0) > 0.5);
		assert!(profile(0.5, 1.0, 0.5) < 0.5);
	}

	#[test]
	fn degenerate_span_stays_on_peripheral_line() {
		assert_eq!(normalized(0.0, 0.0), 0.0);
		assert_eq!(normalized(3.0, 2.0), 1.0);
		assert_eq!(normalized(-1.0, 2.0), 0.0);
		assert_eq!(within(5.0, 3.0, 2.9), 2.9);
	}

	#[test]
	fn output_lengths() {
		let crown = compute_crown(&params()).unwrap();
		assert_eq!(crown.len(), 2 * SUBGRID_LEN);
		assert_eq!(crown.ys.len(), crown.len());
		assert_eq!(crown.zs.len(), crown.len());
		assert_eq!(crown.sub_grids(), 2);

		let crown = compute_crown(&CrownParams { top_only: true, ..params() }).unwrap();
		assert_eq!(crown.len(), SUBGRID_LEN);
		assert_eq!(crown.sub_grids(), 1);
		assert_eq!(crown.grid_point(1, 0, 0), None);
	}

	#[test]
	fn sub_grids_meet_at_peripheral_line() {
		let frame = HullFrame::new(&params()).unwrap();
		let surface = Surface::new(&frame.peripheral_points, frame.axis, &CrownShapes::CONE);
		for column in &surface.columns {
			let top = column.top(&frame.axis, column.edge.z);
			let bottom = column.bottom(&frame.axis, column.edge.z);
			assert!((top - column.edge).norm() < 1e-9);
			assert!((bottom - column.edge).norm() < 1e-9);
		}
	}

	#[test]
	fn peripheral_line_passes_through_peripheral_points() {
		let frame = HullFrame::new(&CrownParams {
			crown_radii: CrownRadii::new(3.0, 5.0, 8.0, 2.0),
			crown_edge_heights: CrownEdgeHeights::new(0.2, 0.4, 0.6, 0.1),
			..params()
		})
		.unwrap();
		// eccentric axis, the apex is not above the base
		assert_ne!(frame.axis.apex.xy(), frame.axis.base.xy());

		let line = PeripheralLine::new(&frame.peripheral_points, frame.axis, &CrownShapes::CONE);
		for direction in Direction::ALL {
			let point = frame.peripheral_points.get(direction);
			let (theta, _) = polar(frame.axis.apex.xy(), point.xy());
			let column = line.column(theta);
			assert!((column.edge - point).norm() < 1e-9, "{:?}", direction);
			assert!((column.top(&frame.axis, point.z) - point).norm() < 1e-9, "{:?}", direction);
			assert!((column.bottom(&frame.axis, point.z) - point).norm() < 1e-9, "{:?}", direction);
		}
	}

	#[test]
	fn apex_row_converges_and_base_row_converges() {
		let crown = compute_crown(&params()).unwrap();
		for column in 0..AZIMUTH_SAMPLES {
			let apex = crown.grid_point(0, HEIGHT_SAMPLES - 1, column).unwrap();
			assert!((apex - na::point![0.0, 0.0, 80.0]).norm() < 1e-9);
			let base = crown.grid_point(1, 0, column).unwrap();
			assert!((base - na::point![0.0, 0.0, 40.0]).norm() < 1e-9);
		}
	}

	#[test]
	fn first_and_last_columns_coincide() {
		let crown = compute_crown(&CrownParams {
			crown_radii: CrownRadii::new(3.0, 5.0, 8.0, 2.0),
			crown_edge_heights: CrownEdgeHeights::new(0.2, 0.4, 0.6, 0.1),
			..params()
		})
		.unwrap();
		for sub_grid in 0..2 {
			for row in 0..HEIGHT_SAMPLES {
				let first = crown.grid_point(sub_grid, row, 0).unwrap();
				let last = crown.grid_point(sub_grid, row, AZIMUTH_SAMPLES - 1).unwrap();
				assert!((first - last).norm() < 1e-6, "sub grid {} row {}", sub_grid, row);
			}
		}
	}

	#[test]
	fn invalid_shape_fails_before_grid() {
		let mut shapes = CrownShapes::CONE;
		shapes.bottom.north = 0.0;
		let result = compute_crown(&CrownParams { crown_shapes: shapes, ..params() });
		assert_eq!(
			result,
			Err(Error::Domain(crate::DomainError::ShapeCoefficient(0.0)))
		);
	}

	#[test]
	fn zero_crown_ratio_is_finite() {
		let crown = compute_crown(&CrownParams { crown_ratio: 0.0, ..params() }).unwrap();
		assert!(crown.points().all(|p| p.iter().all(|v| v.is_finite())));
		assert!(crown.zs.iter().all(|&z| z == 80.0));
	}

	#[test]
	fn zero_radii_collapse_to_axis() {
		let crown = compute_crown(&CrownParams {
			crown_radii: CrownRadii::uniform(0.0),
			..params()
		})
		.unwrap();
		for p in crown.points() {
			assert!(p.x.abs() < 1e-12 && p.y.abs() < 1e-12);
		}
	}
}
