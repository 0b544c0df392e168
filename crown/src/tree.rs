use nalgebra as na;

use crate::{
	validate, Crown, CrownEdgeHeights, CrownParams, CrownRadii, CrownShapes, Directions, Error,
	HullFrame, Lean,
};

/// Share of the tree height used as crown radius when none is measured.
const DEFAULT_RADIUS_SHARE: f64 = 0.25;
const DEFAULT_EDGE_HEIGHT: f64 = 0.3;
const DEFAULT_CROWN_RATIO: f64 = 0.65;

/// A tree with field-measured attributes and the crown derived from them.
///
/// Trees are immutable. To change a measurement, go through
/// [`Tree::to_builder`] and build a new tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
	species: String,
	dbh: f64,
	params: CrownParams,
	frame: HullFrame,
	crown: Crown,
}

impl Tree {
	/// Start a tree from the attributes without a sensible default.
	pub fn builder(
		species: impl Into<String>,
		dbh: f64,
		top_height: f64,
		stem_x: f64,
		stem_y: f64,
	) -> TreeBuilder {
		TreeBuilder {
			species: species.into(),
			dbh,
			top_height,
			stem_x,
			stem_y,
			stem_z: 0.0,
			lean: Lean::UPRIGHT,
			crown_ratio: DEFAULT_CROWN_RATIO,
			crown_radius: None,
			crown_radii: None,
			crown_edge_heights: CrownEdgeHeights::uniform(DEFAULT_EDGE_HEIGHT),
			crown_shapes: CrownShapes::CONE,
			top_only: false,
		}
	}

	/// Builder holding this tree's measurements.
	pub fn to_builder(&self) -> TreeBuilder {
		let stem = self.params.stem_base;
		TreeBuilder {
			species: self.species.clone(),
			dbh: self.dbh,
			top_height: self.params.top_height,
			stem_x: stem.x,
			stem_y: stem.y,
			stem_z: stem.z,
			lean: self.params.lean,
			crown_ratio: self.params.crown_ratio,
			crown_radius: None,
			crown_radii: Some(self.params.crown_radii),
			crown_edge_heights: self.params.crown_edge_heights,
			crown_shapes: self.params.crown_shapes,
			top_only: self.params.top_only,
		}
	}

	pub fn species(&self) -> &str {
		&self.species
	}

	pub fn dbh(&self) -> f64 {
		self.dbh
	}

	pub fn top_height(&self) -> f64 {
		self.params.top_height
	}

	pub fn stem_base(&self) -> na::Point3<f64> {
		self.params.stem_base
	}

	pub fn lean(&self) -> Lean {
		self.params.lean
	}

	pub fn crown_ratio(&self) -> f64 {
		self.params.crown_ratio
	}

	pub fn crown_radii(&self) -> CrownRadii {
		self.params.crown_radii
	}

	pub fn crown_edge_heights(&self) -> CrownEdgeHeights {
		self.params.crown_edge_heights
	}

	pub fn crown_shapes(&self) -> CrownShapes {
		self.params.crown_shapes
	}

	pub fn top_only(&self) -> bool {
		self.params.top_only
	}

	pub fn params(&self) -> &CrownParams {
		&self.params
	}

	/// Translation from the crown model into world coordinates.
	pub fn treetop(&self) -> na::Point3<f64> {
		self.frame.treetop
	}

	/// Points of maximum crown width, relative to the stem base.
	pub fn peripheral_points(&self) -> Directions<na::Point3<f64>> {
		self.frame.peripheral_points
	}

	/// Apex of the crown hull, relative to the stem base.
	pub fn hull_apex(&self) -> na::Point3<f64> {
		self.frame.axis.apex
	}

	/// Base of the crown hull, relative to the stem base.
	pub fn hull_base(&self) -> na::Point3<f64> {
		self.frame.axis.base
	}

	pub fn crown(&self) -> &Crown {
		&self.crown
	}
}

/// Measurements for a [`Tree`], with defaults applied on [`build`](Self::build).
///
/// | attribute            | default                      |
/// |----------------------|------------------------------|
/// | `stem_z`             | 0                            |
/// | `lean`               | upright                      |
/// | `crown_ratio`        | 0.65                         |
/// | `crown_radii`        | 25% of `top_height`, uniform |
/// | `crown_edge_heights` | 0.3, uniform                 |
/// | `crown_shapes`       | 1.0 (cones)                  |
/// | `top_only`           | false                        |
#[derive(Debug, Clone, PartialEq)]
pub struct TreeBuilder {
	species: String,
	dbh: f64,
	top_height: f64,
	stem_x: f64,
	stem_y: f64,
	stem_z: f64,
	lean: Lean,
	crown_ratio: f64,
	crown_radius: Option<f64>,
	crown_radii: Option<CrownRadii>,
	crown_edge_heights: CrownEdgeHeights,
	crown_shapes: CrownShapes,
	top_only: bool,
}

impl TreeBuilder {
	pub fn stem_z(self, stem_z: f64) -> Self {
		Self { stem_z, ..self }
	}

	pub fn lean(self, lean: Lean) -> Self {
		Self { lean, ..self }
	}

	/// Ratio of live crown length to tree height. Values above 1 are read as
	/// percent.
	pub fn crown_ratio(self, crown_ratio: f64) -> Self {
		Self { crown_ratio, ..self }
	}

	/// Same radius in every direction. Ignored when [`crown_radii`](Self::crown_radii) is set.
	pub fn crown_radius(self, crown_radius: f64) -> Self {
		Self { crown_radius: Some(crown_radius), ..self }
	}

	pub fn crown_radii(self, crown_radii: CrownRadii) -> Self {
		Self { crown_radii: Some(crown_radii), ..self }
	}

	pub fn crown_edge_heights(self, crown_edge_heights: CrownEdgeHeights) -> Self {
		Self { crown_edge_heights, ..self }
	}

	pub fn crown_shapes(self, crown_shapes: CrownShapes) -> Self {
		Self { crown_shapes, ..self }
	}

	pub fn top_only(self, top_only: bool) -> Self {
		Self { top_only, ..self }
	}

	pub fn species(&self) -> &str {
		&self.species
	}

	pub fn stem(&self) -> na::Point2<f64> {
		na::point![self.stem_x, self.stem_y]
	}

	/// Apply defaults, validate and derive the crown.
	pub fn build(self) -> Result<Tree, Error> {
		validate::dbh(self.dbh)?;

		let crown_ratio = if self.crown_ratio > 1.0 {
			self.crown_ratio / 100.0
		} else {
			self.crown_ratio
		};
		let crown_radii = self
			.crown_radii
			.or(self.crown_radius.map(CrownRadii::uniform))
			.unwrap_or_else(|| CrownRadii::uniform(DEFAULT_RADIUS_SHARE * self.top_height));

		let params = CrownParams {
			stem_base: na::point![self.stem_x, self.stem_y, self.stem_z],
			top_height: self.top_height,
			crown_ratio,
			lean: self.lean,
			crown_radii,
			crown_edge_heights: self.crown_edge_heights,
			crown_shapes: self.crown_shapes,
			top_only: self.top_only,
		};
		let frame = HullFrame::new(&params)?;
		let crown = frame.crown(&params.crown_shapes, params.top_only);
		log::debug!(
			"built {} crown at ({}, {}) with {} points",
			self.species,
			self.stem_x,
			self.stem_y,
			crown.len()
		);

		Ok(Tree {
			species: self.species,
			dbh: self.dbh,
			params,
			frame,
			crown,
		})
	}
}
