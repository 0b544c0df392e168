//! Crown hulls for individual trees.
//!
//! A crown is modeled as an asymmetric solid between a hull base and a hull
//! apex, widest along a "peripheral line" through four measured points of
//! maximum crown width (east, north, west and south of the stem). Above and
//! below that line the radius tapers with a superellipse profile whose
//! exponent varies with azimuth.
//!
//! The pipeline for one tree is
//! [`treetop_location`] → [`peripheral_points`] → [`hull_apex_and_base`] →
//! [`compute_crown`], bundled by [`Tree`].

mod axis;
mod directions;
mod eccentricity;
mod interpolate;
mod peripheral;
mod stand;
mod surface;
mod tree;
mod treetop;
mod validate;

pub use axis::{hull_apex_and_base, HullAxis};
pub use directions::{CrownEdgeHeights, CrownRadii, CrownShapes, Direction, Directions};
pub use eccentricity::{hull_center, hull_eccentricity, Eccentricity};
pub use interpolate::CircularInterpolator;
pub use peripheral::{peripheral_points, CrownExtent};
pub use stand::{build_stand, compute_crowns};
pub use surface::{
	compute_crown, Crown, CrownParams, HullFrame, AZIMUTH_SAMPLES, HEIGHT_SAMPLES, SUBGRID_LEN,
};
pub use tree::{Tree, TreeBuilder};
pub use treetop::{treetop_location, Lean, StemColumns};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
	#[error("Input shapes mismatch: {lengths:?}")]
	ShapeMismatch { lengths: Vec<usize> },

	#[error(transparent)]
	Domain(#[from] DomainError),
}

/// Input outside the range where the crown geometry is defined.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum DomainError {
	#[error("height must be >= 0, got {0}")]
	NegativeHeight(f64),

	#[error("lean severity must be in [0, 90) degrees from vertical, got {0}")]
	LeanSeverity(f64),

	#[error("crown ratio must be in [0, 1], got {0}")]
	CrownRatio(f64),

	#[error("crown radius must be >= 0, got {0}")]
	NegativeRadius(f64),

	#[error("crown edge height must be a proportion in [0, 1], got {0}")]
	EdgeHeight(f64),

	#[error("crown shape coefficient must be > 0, got {0}")]
	ShapeCoefficient(f64),

	#[error("dbh must be > 0, got {0}")]
	Dbh(f64),

	#[error("{0} must be finite")]
	NotFinite(&'static str),
}

/// Fails unless every length is equal.
pub(crate) fn check_lengths(lengths: &[usize]) -> Result<(), Error> {
	match lengths.split_first() {
		Some((first, rest)) if rest.iter().any(|l| l != first) => {
			Err(Error::ShapeMismatch { lengths: lengths.to_vec() })
		},
		_ => Ok(()),
	}
}
