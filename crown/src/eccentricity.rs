use std::f64::consts::FRAC_2_PI;

use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::{validate, CrownRadii, Error};

/// Center of the horizontal crown projection relative to the stem,
/// `((W - E) / 2, (S - N) / 2)`.
pub fn hull_center(radii: &CrownRadii) -> na::Point2<f64> {
	na::point![
		(radii.west - radii.east) / 2.0,
		(radii.south - radii.north) / 2.0
	]
}

/// Eccentricity indices of the crown apex and base.
///
/// The index is the offset of the crown center relative to the mean crown
/// radius on that axis (Koop 1989), squashed into (-1, 1) with `atan` and
/// scaled by the crown ratio. Apex and base lean to opposite sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Eccentricity {
	pub top: na::Vector2<f64>,
	pub bottom: na::Vector2<f64>,
}

pub fn hull_eccentricity(radii: &CrownRadii, crown_ratio: f64) -> Result<Eccentricity, Error> {
	validate::radii(radii)?;
	validate::crown_ratio(crown_ratio)?;

	let center = hull_center(radii);
	let eccentricity = na::vector![
		relative(center.x, radii.east, radii.west),
		relative(center.y, radii.north, radii.south)
	];
	let index = eccentricity.map(|e| FRAC_2_PI * e.atan() * crown_ratio);
	Ok(Eccentricity { top: -index, bottom: index })
}

/// `offset` relative to the mean of a radius pair, 0 for a crown without
/// width on that axis.
fn relative(offset: f64, a: f64, b: f64) -> f64 {
	let mean = (a + b) / 2.0;
	if mean > 0.0 {
		offset / mean
	} else {
		0.0
	}
}
