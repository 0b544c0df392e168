use std::path::Path;

use crown::{CrownEdgeHeights, CrownRadii, CrownShapes, Lean, Tree, TreeBuilder};
use serde::{Deserialize, Serialize};

use crate::Error;

/// One entry of a tree list. Unknown fields are ignored.
///
/// Four-valued fields are ordered east, north, west, south. Crown shapes are
/// two such rows, top then bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeRecord {
	pub species: String,
	pub dbh: f64,
	pub top_height: f64,
	pub stem_x: f64,
	pub stem_y: f64,
	#[serde(default)]
	pub stem_z: Option<f64>,
	#[serde(default)]
	pub lean_direction: f64,
	#[serde(default)]
	pub lean_severity: f64,
	#[serde(default)]
	pub crown_ratio: Option<f64>,
	#[serde(default)]
	pub crown_radius: Option<f64>,
	#[serde(default)]
	pub crown_radii: Option<[f64; 4]>,
	#[serde(default)]
	pub crown_edge_heights: Option<[f64; 4]>,
	#[serde(default)]
	pub crown_shapes: Option<[[f64; 4]; 2]>,
	#[serde(default)]
	pub top_only: bool,
}

impl TreeRecord {
	pub fn builder(&self) -> TreeBuilder {
		let mut builder = Tree::builder(
			self.species.clone(),
			self.dbh,
			self.top_height,
			self.stem_x,
			self.stem_y,
		)
		.lean(Lean::new(self.lean_direction, self.lean_severity))
		.top_only(self.top_only);

		if let Some(stem_z) = self.stem_z {
			builder = builder.stem_z(stem_z);
		}
		if let Some(crown_ratio) = self.crown_ratio {
			builder = builder.crown_ratio(crown_ratio);
		}
		if let Some(crown_radius) = self.crown_radius {
			builder = builder.crown_radius(crown_radius);
		}
		if let Some(crown_radii) = self.crown_radii {
			builder = builder.crown_radii(CrownRadii::from(crown_radii));
		}
		if let Some(edge_heights) = self.crown_edge_heights {
			builder = builder.crown_edge_heights(CrownEdgeHeights::from(edge_heights));
		}
		if let Some(shapes) = self.crown_shapes {
			builder = builder.crown_shapes(CrownShapes::from_rows(shapes));
		}
		builder
	}
}

/// Read a JSON array of [`TreeRecord`]s.
pub fn read_tree_list(path: &Path) -> Result<Vec<TreeRecord>, Error> {
	let file = std::fs::File::open(path)?;
	let records: Vec<TreeRecord> = serde_json::from_reader(std::io::BufReader::new(file))?;
	if records.is_empty() {
		return Err(Error::EmptyTreeList);
	}
	log::info!("read {} trees from {}", records.len(), path.display());
	Ok(records)
}
