use nalgebra as na;

use crate::{CrownEdgeHeights, CrownRadii, CrownShapes, DomainError, Lean};

pub fn finite(name: &'static str, value: f64) -> Result<f64, DomainError> {
	if value.is_finite() {
		Ok(value)
	} else {
		Err(DomainError::NotFinite(name))
	}
}

pub fn point(name: &'static str, point: &na::Point3<f64>) -> Result<(), DomainError> {
	for &value in point.iter() {
		finite(name, value)?;
	}
	Ok(())
}

pub fn top_height(height: f64) -> Result<(), DomainError> {
	if finite("top height", height)? < 0.0 {
		return Err(DomainError::NegativeHeight(height));
	}
	Ok(())
}

pub fn lean(lean: Lean) -> Result<(), DomainError> {
	finite("lean direction", lean.direction)?;
	let severity = finite("lean severity", lean.severity)?;
	if !(0.0..90.0).contains(&severity) {
		return Err(DomainError::LeanSeverity(severity));
	}
	Ok(())
}

pub fn crown_ratio(ratio: f64) -> Result<(), DomainError> {
	if !(0.0..=1.0).contains(&finite("crown ratio", ratio)?) {
		return Err(DomainError::CrownRatio(ratio));
	}
	Ok(())
}

pub fn radii(radii: &CrownRadii) -> Result<(), DomainError> {
	for (_, radius) in radii.iter() {
		if finite("crown radius", radius)? < 0.0 {
			return Err(DomainError::NegativeRadius(radius));
		}
	}
	Ok(())
}

pub fn edge_heights(edge_heights: &CrownEdgeHeights) -> Result<(), DomainError> {
	for (_, proportion) in edge_heights.iter() {
		if !(0.0..=1.0).contains(&finite("crown edge height", proportion)?) {
			return Err(DomainError::EdgeHeight(proportion));
		}
	}
	Ok(())
}

pub fn shapes(shapes: &CrownShapes) -> Result<(), DomainError> {
	for (_, coefficient) in shapes.top.iter().chain(shapes.bottom.iter()) {
		if finite("crown shape coefficient", coefficient)? <= 0.0 {
			return Err(DomainError::ShapeCoefficient(coefficient));
		}
	}
	Ok(())
}

pub fn dbh(dbh: f64) -> Result<(), DomainError> {
	if finite("dbh", dbh)? <= 0.0 {
		return Err(DomainError::Dbh(dbh));
	}
	Ok(())
}
