use std::f64::consts::TAU;

use nalgebra as na;

use crate::{Elevation, Error};

/// Points along a plot boundary. The first and last coincide.
pub const BOUNDARY_POINTS: usize = 32;

/// Points on the circumference of a circular plot.
///
/// Without `dem` every point has elevation 0.
pub fn circular_plot_boundary(
	center: na::Point2<f64>,
	radius: f64,
	dem: Option<&dyn Elevation>,
) -> Result<Vec<na::Point3<f64>>, Error> {
	if !radius.is_finite() || radius < 0.0 {
		return Err(Error::PlotRadius(radius));
	}
	let step = TAU / (BOUNDARY_POINTS - 1) as f64;
	(0..BOUNDARY_POINTS)
		.map(|idx| {
			let (sin, cos) = (idx as f64 * step).sin_cos();
			let (x, y) = (center.x + radius * cos, center.y + radius * sin);
			let z = match dem {
				Some(dem) => dem.elevation(x, y)?,
				None => 0.0,
			};
			Ok(na::point![x, y, z])
		})
		.collect()
}
