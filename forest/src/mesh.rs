use std::{
	io::Write,
	path::Path,
	process::{Command, Stdio},
};

use crate::Error;

const PDAL: &str = "pdal";

/// PDAL pipeline turning a point cloud into a Poisson surface mesh.
///
/// `depth` is the maximum octree depth, deeper trees give finer meshes.
pub fn poisson_pipeline(input: &Path, output: &Path, depth: u32) -> serde_json::Value {
	serde_json::json!({
		"pipeline": [
			input.display().to_string(),
			{ "type": "filters.normal" },
			{ "type": "filters.poisson", "depth": depth, "density": "true" },
			{ "type": "filters.normal" },
			{
				"type": "writers.ply",
				"filename": output.display().to_string(),
				"storage_mode": "default",
				"faces": "true"
			}
		]
	})
}

/// Run [`poisson_pipeline`] through `pdal pipeline --stdin`.
pub fn poisson_mesh(input: &Path, output: &Path, depth: u32) -> Result<(), Error> {
	let pipeline = serde_json::to_vec(&poisson_pipeline(input, output, depth))?;
	log::debug!("running {} pipeline for {}", PDAL, input.display());

	let mut child = Command::new(PDAL)
		.args(["pipeline", "--stdin"])
		.stdin(Stdio::piped())
		.stdout(Stdio::piped())
		.stderr(Stdio::piped())
		.spawn()
		.map_err(Error::PdalUnavailable)?;
	if let Some(mut stdin) = child.stdin.take() {
		stdin.write_all(&pipeline)?;
	}
	let result = child.wait_with_output()?;
	if !result.status.success() {
		return Err(Error::Pdal(String::from_utf8_lossy(&result.stderr).trim().to_string()));
	}
	log::info!("wrote mesh to {}", output.display());
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stage_order() {
		let pipeline = poisson_pipeline(Path::new("trees.las"), Path::new("mesh.ply"), 10);
		let stages = pipeline["pipeline"].as_array().unwrap();
		assert_eq!(stages.len(), 5);
		assert_eq!(stages[0], "trees.las");
		let types = stages[1..]
			.iter()
			.map(|stage| stage["type"].as_str().unwrap())
			.collect::<Vec<_>>();
		assert_eq!(
			types,
			["filters.normal", "filters.poisson", "filters.normal", "writers.ply"]
		);
		assert_eq!(stages[2]["depth"], 10);
		assert_eq!(stages[2]["density"], "true");
		assert_eq!(stages[4]["filename"], "mesh.ply");
		assert_eq!(stages[4]["faces"], "true");
	}
}
