use std::{
	fs::File,
	io::{BufWriter, Write},
	path::{Path, PathBuf},
};

use crown::Tree;

use crate::{Error, Summary};

pub const SUMMARY_FILE: &str = "summary.json";

/// Output folder of the `crowns` command.
pub struct Writer {
	path: PathBuf,
}

impl Writer {
	/// Create `path`, replacing a previous output folder but nothing else.
	pub fn setup(path: &Path) -> Result<(), Error> {
		if path.is_file() {
			return Err(Error::OutputFolderIsFile);
		}
		if path.is_dir() {
			let previous = path.join(SUMMARY_FILE);
			if path.read_dir()?.next().is_some() && !previous.exists() {
				return Err(Error::OutputFolderIsNotEmpty);
			}
			std::fs::remove_dir_all(path)?;
		}
		std::fs::create_dir_all(path)?;
		Ok(())
	}

	pub fn new(path: PathBuf) -> Self {
		Self { path }
	}

	/// Write the crown points of tree `index` as `X,Y,Z` lines and return
	/// the file name.
	pub fn save_tree(&self, index: usize, tree: &Tree) -> Result<String, Error> {
		let name = format!("tree_{:05}.csv", index);
		let mut file = BufWriter::new(File::create(self.path.join(&name))?);
		write_points(&mut file, tree.crown().points())?;
		file.flush()?;
		Ok(name)
	}

	pub fn save_summary(&self, summary: &Summary) -> Result<(), Error> {
		let file = BufWriter::new(File::create(self.path.join(SUMMARY_FILE))?);
		serde_json::to_writer_pretty(file, summary)?;
		Ok(())
	}
}

/// `X,Y,Z` header followed by one line per point.
pub fn write_points(
	out: &mut impl Write,
	points: impl IntoIterator<Item = nalgebra::Point3<f64>>,
) -> std::io::Result<()> {
	writeln!(out, "X,Y,Z")?;
	for point in points {
		writeln!(out, "{},{},{}", point.x, point.y, point.z)?;
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use nalgebra as na;

	#[test]
	fn setup_checks_folder() {
		let dir = tempfile::tempdir().unwrap();

		let file = dir.path().join("file");
		std::fs::write(&file, "").unwrap();
		assert!(matches!(Writer::setup(&file), Err(Error::OutputFolderIsFile)));

		let foreign = dir.path().join("foreign");
		std::fs::create_dir(&foreign).unwrap();
		std::fs::write(foreign.join("keep.txt"), "").unwrap();
		assert!(matches!(Writer::setup(&foreign), Err(Error::OutputFolderIsNotEmpty)));
		assert!(foreign.join("keep.txt").exists());

		let previous = dir.path().join("previous");
		std::fs::create_dir(&previous).unwrap();
		std::fs::write(previous.join(SUMMARY_FILE), "{}").unwrap();
		std::fs::write(previous.join("tree_00000.csv"), "").unwrap();
		Writer::setup(&previous).unwrap();
		assert_eq!(previous.read_dir().unwrap().count(), 0);

		let fresh = dir.path().join("a").join("b");
		Writer::setup(&fresh).unwrap();
		assert!(fresh.is_dir());
	}

	#[test]
	fn points_as_lines() {
		let mut out = Vec::new();
		write_points(&mut out, [na::point![1.0, 2.5, -3.0], na::point![0.0, 0.0, 10.0]]).unwrap();
		assert_eq!(String::from_utf8(out).unwrap(), "X,Y,Z\n1,2.5,-3\n0,0,10\n");
	}
}
