mod mesh;
mod progress;
mod record;
mod writer;

use std::path::PathBuf;

use crown::Tree;
use nalgebra as na;
use progress::{Progress, Stage};
use rayon::prelude::*;
use terrain::{Elevation, Raster};

pub use mesh::{poisson_mesh, poisson_pipeline};
pub use record::{read_tree_list, TreeRecord};
pub use writer::{write_points, Writer, SUMMARY_FILE};

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("Tree list is empty")]
	EmptyTreeList,

	#[error("Output folder is file")]
	OutputFolderIsFile,

	#[error("Output folder is not empty")]
	OutputFolderIsNotEmpty,

	#[error("At least two threads are required")]
	NotEnoughThreads,

	#[error(transparent)]
	ThreadPool(#[from] rayon::ThreadPoolBuildError),

	#[error(transparent)]
	Terrain(#[from] terrain::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error("Could not start pdal: {0}")]
	PdalUnavailable(std::io::Error),

	#[error("pdal failed: {0}")]
	Pdal(String),
}

#[derive(clap::Subcommand)]
pub enum Command {
	/// Build crown hulls for a tree list
	Crowns(CrownsCommand),
	/// Print the boundary of a circular plot
	Boundary(BoundaryCommand),
	/// Build a Poisson surface mesh from a point cloud with PDAL
	Mesh(MeshCommand),
}

#[derive(clap::Parser)]
pub struct CrownsCommand {
	/// Tree list as a JSON array of tree records.
	input_file: PathBuf,

	/// Output folder for the crown files and the summary.
	#[arg(long, short)]
	output: PathBuf,

	/// Elevation raster (ESRI ASCII grid) to place the stems on.
	#[arg(long)]
	dem: Option<PathBuf>,

	/// Only build the crown above the peripheral line for every tree.
	#[arg(long)]
	top_only: bool,

	/// Maximal thread count for multithreading. 0 for the amount of logical cores.
	#[arg(long, default_value_t = 0)]
	max_threads: usize,
}

#[derive(clap::Parser)]
pub struct BoundaryCommand {
	/// X coordinate of the plot center.
	#[arg(allow_negative_numbers = true)]
	x: f64,
	/// Y coordinate of the plot center.
	#[arg(allow_negative_numbers = true)]
	y: f64,
	/// Plot radius.
	radius: f64,

	/// Elevation raster (ESRI ASCII grid) for the boundary heights.
	#[arg(long)]
	dem: Option<PathBuf>,
}

#[derive(clap::Parser)]
pub struct MeshCommand {
	/// Point cloud readable by PDAL.
	input_file: PathBuf,

	/// PLY file for the mesh.
	output_file: PathBuf,

	/// Maximum octree depth. Deeper trees give finer meshes and take longer.
	#[arg(long, default_value_t = 8)]
	depth: u32,

	/// Print the pipeline instead of running it.
	#[arg(long)]
	dry_run: bool,
}

/// Content of `summary.json` in the output folder.
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Summary {
	pub input: String,
	pub trees: usize,
	pub points: usize,
	pub written: Vec<WrittenTree>,
	pub failed: Vec<FailedTree>,
	pub times: Times,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct WrittenTree {
	pub index: usize,
	pub species: String,
	pub file: String,
	pub points: usize,
	pub treetop: na::Point3<f64>,
	pub hull_apex: na::Point3<f64>,
	pub hull_base: na::Point3<f64>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct FailedTree {
	pub index: usize,
	pub species: String,
	pub error: String,
}

#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Times {
	pub setup: f32,
	pub crowns: f32,
}

pub fn run(command: Command) -> Result<(), Error> {
	match command {
		Command::Crowns(command) => crowns(command).map(|_| ()),
		Command::Boundary(command) => {
			let dem = command.dem.map(Raster::read_ascii_grid).transpose()?;
			let boundary = terrain::circular_plot_boundary(
				na::point![command.x, command.y],
				command.radius,
				dem.as_ref().map(|dem| dem as &dyn Elevation),
			)?;
			write_points(&mut std::io::stdout().lock(), boundary)?;
			Ok(())
		},
		Command::Mesh(command) => {
			if command.dry_run {
				let pipeline =
					poisson_pipeline(&command.input_file, &command.output_file, command.depth);
				println!("{}", serde_json::to_string_pretty(&pipeline)?);
				return Ok(());
			}
			poisson_mesh(&command.input_file, &command.output_file, command.depth)
		},
	}
}

/// Index and species of a tree with its build result.
type Built = (usize, String, Result<Tree, crown::Error>);

/// Build and write the crowns of every tree in the tree list.
pub fn crowns(command: CrownsCommand) -> Result<Summary, Error> {
	if command.max_threads == 1 {
		return Err(Error::NotEnoughThreads);
	}
	let pool = rayon::ThreadPoolBuilder::new()
		.num_threads(command.max_threads)
		.build()?;
	// the writer blocks on a worker thread while the others build trees
	if pool.current_num_threads() < 2 {
		return Err(Error::NotEnoughThreads);
	}
	pool.install(|| build(command))
}

fn build(command: CrownsCommand) -> Result<Summary, Error> {
	let mut summary = Summary {
		input: command.input_file.display().to_string(),
		..Default::default()
	};
	let stage = Stage::new("Setup");

	let records = read_tree_list(&command.input_file)?;
	let stem_z = match &command.dem {
		Some(path) => {
			let dem = Raster::read_ascii_grid(path)?;
			let xs = records.iter().map(|r| r.stem_x).collect::<Vec<_>>();
			let ys = records.iter().map(|r| r.stem_y).collect::<Vec<_>>();
			Some(dem.elevations(&xs, &ys)?)
		},
		None => None,
	};
	let builders = records
		.iter()
		.enumerate()
		.map(|(index, record)| {
			let builder = record.builder();
			let builder = match &stem_z {
				Some(stem_z) => builder.stem_z(stem_z[index]),
				None => builder,
			};
			if command.top_only {
				builder.top_only(true)
			} else {
				builder
			}
		})
		.collect::<Vec<_>>();
	summary.trees = builders.len();

	Writer::setup(&command.output)?;
	let writer = Writer::new(command.output.clone());
	summary.times.setup = stage.finish();

	let mut progress = Progress::new("Crowns", builders.len());
	let (sender, receiver) = crossbeam::channel::bounded::<Built>(4);
	let (_, written) = rayon::join(
		|| {
			builders
				.into_par_iter()
				.enumerate()
				.for_each(|(index, builder)| {
					let species = builder.species().to_string();
					// the writer only hangs up after a write error, which is reported there
					sender.send((index, species, builder.build())).ok();
				});
			drop(sender);
		},
		|| -> Result<Vec<(usize, Result<WrittenTree, FailedTree>)>, Error> {
			let mut written = Vec::new();
			for (index, species, tree) in receiver {
				let entry = match tree {
					Ok(tree) => Ok(WrittenTree {
						index,
						file: writer.save_tree(index, &tree)?,
						species,
						points: tree.crown().len(),
						treetop: tree.treetop(),
						hull_apex: tree.hull_apex(),
						hull_base: tree.hull_base(),
					}),
					Err(err) => {
						log::warn!("tree {} ({}): {}", index, species, err);
						Err(FailedTree { index, species, error: err.to_string() })
					},
				};
				written.push((index, entry));
				progress.step();
			}
			Ok(written)
		},
	);
	let mut written = written?;
	summary.times.crowns = progress.finish();

	written.sort_by_key(|(index, _)| *index);
	for (_, entry) in written {
		match entry {
			Ok(tree) => {
				summary.points += tree.points;
				summary.written.push(tree);
			},
			Err(tree) => summary.failed.push(tree),
		}
	}
	log::info!(
		"wrote {} of {} crowns ({} points)",
		summary.written.len(),
		summary.trees,
		summary.points
	);
	writer.save_summary(&summary)?;
	Ok(summary)
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::Parser;

	#[test]
	fn not_enough_threads_message() {
		assert_eq!(Error::NotEnoughThreads.to_string(), "At least two threads are required");
	}

	#[test]
	fn boundary_accepts_negative_coordinates() {
		let command = BoundaryCommand::try_parse_from(["boundary", "-10.5", "-3", "5"]).unwrap();
		assert_eq!((command.x, command.y, command.radius), (-10.5, -3.0, 5.0));
		assert_eq!(command.dem, None);
	}

	#[test]
	fn mesh_defaults() {
		let command = MeshCommand::try_parse_from(["mesh", "in.las", "out.ply"]).unwrap();
		assert_eq!(command.depth, 8);
		assert!(!command.dry_run);
		assert!(run(Command::Mesh(MeshCommand { dry_run: true, ..command })).is_ok());
	}

	#[test]
	fn crowns_options() {
		let command =
			CrownsCommand::try_parse_from(["crowns", "trees.json", "-o", "out", "--top-only"]).unwrap();
		assert_eq!(command.output, PathBuf::from("out"));
		assert!(command.top_only);
		assert_eq!(command.max_threads, 0);
		assert!(CrownsCommand::try_parse_from(["crowns", "trees.json"]).is_err());

		let long = CrownsCommand::try_parse_from(["crowns", "trees.json", "--output", "out"]).unwrap();
		assert_eq!(long.output, PathBuf::from("out"));
		assert!(
			CrownsCommand::try_parse_from(["crowns", "trees.json", "--output-folder", "out"]).is_err()
		);
	}
}
