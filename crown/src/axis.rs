use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::{hull_center, hull_eccentricity, validate, CrownExtent, CrownRadii, Error};

/// Apex and base of the crown hull, relative to the stem base.
///
/// Neither has to sit above the stem, the axis through them is shifted by
/// the crown eccentricity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HullAxis {
	pub apex: na::Point3<f64>,
	pub base: na::Point3<f64>,
}

pub fn hull_apex_and_base(
	radii: &CrownRadii,
	top_height: f64,
	crown_ratio: f64,
) -> Result<HullAxis, Error> {
	validate::top_height(top_height)?;
	let eccentricity = hull_eccentricity(radii, crown_ratio)?;

	let center = hull_center(radii);
	let spread = na::vector![radii.west - radii.east, radii.south - radii.north];
	let apex = center + spread.component_mul(&eccentricity.top);
	let base = center + spread.component_mul(&eccentricity.bottom);

	Ok(HullAxis {
		apex: na::point![apex.x, apex.y, top_height],
		base: na::point![base.x, base.y, CrownExtent::new(top_height, crown_ratio).base],
	})
}
