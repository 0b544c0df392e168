use std::{fs, path::Path};

use crate::{Error, Raster};

/// Header of an ESRI ASCII grid.
#[derive(Debug, Default)]
struct Header {
	ncols: Option<usize>,
	nrows: Option<usize>,
	xll: Option<Corner>,
	yll: Option<Corner>,
	cellsize: Option<f64>,
	nodata: Option<f64>,
}

/// Lower-left reference, either the outer corner or the center of the cell.
#[derive(Debug, Clone, Copy)]
enum Corner {
	Edge(f64),
	Center(f64),
}

impl Corner {
	fn edge(self, cellsize: f64) -> f64 {
		match self {
			Self::Edge(value) => value,
			Self::Center(value) => value - cellsize / 2.0,
		}
	}
}

impl Raster {
	/// Read an ESRI ASCII grid (`.asc`) from disk.
	pub fn read_ascii_grid(path: impl AsRef<Path>) -> Result<Self, Error> {
		let path = path.as_ref();
		let raster = Self::parse_ascii_grid(&fs::read_to_string(path)?)?;
		log::info!(
			"read {}x{} elevation raster from {}",
			raster.nrow,
			raster.ncol,
			path.display()
		);
		Ok(raster)
	}

	/// Parse the text of an ESRI ASCII grid.
	///
	/// Header keys are case insensitive. Values follow the header row by row
	/// from north to south and may wrap over any number of lines.
	pub fn parse_ascii_grid(text: &str) -> Result<Self, Error> {
		let mut header = Header::default();
		let mut lines = text.lines().enumerate().peekable();

		while let Some((idx, line)) = lines.peek().copied() {
			let mut tokens = line.split_whitespace();
			let Some(key) = tokens.next() else {
				lines.next();
				continue;
			};
			if key.parse::<f64>().is_ok() {
				break;
			}
			let value = tokens.next().ok_or_else(|| parse_error(idx, "missing header value"))?;
			match key.to_ascii_lowercase().as_str() {
				"ncols" => header.ncols = Some(parse(idx, value)?),
				"nrows" => header.nrows = Some(parse(idx, value)?),
				"xllcorner" => header.xll = Some(Corner::Edge(parse(idx, value)?)),
				"xllcenter" => header.xll = Some(Corner::Center(parse(idx, value)?)),
				"yllcorner" => header.yll = Some(Corner::Edge(parse(idx, value)?)),
				"yllcenter" => header.yll = Some(Corner::Center(parse(idx, value)?)),
				"cellsize" => header.cellsize = Some(parse(idx, value)?),
				"nodata_value" => header.nodata = Some(parse(idx, value)?),
				other => return Err(parse_error(idx, &format!("unknown header key '{}'", other))),
			}
			lines.next();
		}

		let header_end = lines.peek().map_or(0, |&(idx, _)| idx);
		let missing = |key: &str| parse_error(header_end, &format!("missing '{}' in header", key));
		let ncols = header.ncols.ok_or_else(|| missing("ncols"))?;
		let nrows = header.nrows.ok_or_else(|| missing("nrows"))?;
		let cellsize = header.cellsize.ok_or_else(|| missing("cellsize"))?;
		let xll = header.xll.ok_or_else(|| missing("xllcorner"))?;
		let yll = header.yll.ok_or_else(|| missing("yllcorner"))?;
		if cellsize.is_nan() || cellsize <= 0.0 {
			return Err(parse_error(header_end, "cellsize must be > 0"));
		}

		let cells = nrows
			.checked_mul(ncols)
			.ok_or_else(|| parse_error(header_end, "grid size overflows"))?;

		// grows with the values actually present, the header may lie
		let mut data = Vec::new();
		let mut last_line = header_end;
		for (idx, line) in lines {
			last_line = idx;
			for token in line.split_whitespace() {
				data.push(parse::<f64>(idx, token)?);
			}
		}
		if data.len() != cells {
			return Err(parse_error(
				last_line,
				&format!("expected {} values, found {}", cells, data.len()),
			));
		}

		let xmin = xll.edge(cellsize);
		let ymin = yll.edge(cellsize);
		let raster = Self::from_vec(nrows, ncols, data)?.with_extent(
			xmin,
			xmin + ncols as f64 * cellsize,
			ymin,
			ymin + nrows as f64 * cellsize,
		);
		Ok(match header.nodata {
			Some(nodata) => raster.with_nodata(nodata),
			None => raster,
		})
	}
}

fn parse<T: std::str::FromStr>(idx: usize, token: &str) -> Result<T, Error> {
	token
		.parse()
		.map_err(|_| parse_error(idx, &format!("invalid number '{}'", token)))
}

fn parse_error(idx: usize, message: &str) -> Error {
	Error::Parse { line: idx + 1, message: message.into() }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Elevation;

	const GRID: &str = "ncols 3
nrows 2
xllcorner 500.0
yllcorner 1000.0
cellsize 5
NODATA_value -9999
10 11 12
13 -9999 15
";

	#[test]
	fn reads_header_and_values() {
		let raster = Raster::parse_ascii_grid(GRID).unwrap();
		assert_eq!((raster.nrow, raster.ncol), (2, 3));
		assert_eq!(raster.bounds().west, 500.0);
		assert_eq!(raster.bounds().east, 515.0);
		assert_eq!(raster.bounds().south, 1000.0);
		assert_eq!(raster.bounds().north, 1010.0);
		// first row is the northern one
		assert_eq!(raster.elevation(501.0, 1009.0).unwrap(), 10.0);
		assert_eq!(raster.elevation(514.0, 1001.0).unwrap(), 15.0);
		assert!(matches!(raster.elevation(507.0, 1001.0), Err(Error::NoData { .. })));
	}

	#[test]
	fn center_reference_and_wrapped_rows() {
		let text = "NCOLS 2\nNROWS 2\nXLLCENTER 0.5\nYLLCENTER 0.5\nCELLSIZE 1\n1 2 3\n4\n";
		let raster = Raster::parse_ascii_grid(text).unwrap();
		assert_eq!(raster.bounds().west, 0.0);
		assert_eq!(raster.bounds().north, 2.0);
		assert_eq!(raster.data, vec![1.0, 2.0, 3.0, 4.0]);
		assert_eq!(raster.nodata, None);
	}

	#[test]
	fn rejects_bad_grids() {
		let missing = "ncols 2\nnrows 1\nxllcorner 0\nyllcorner 0\n1 2\n";
		assert!(matches!(
			Raster::parse_ascii_grid(missing),
			Err(Error::Parse { line: 5, .. })
		));

		let short = "ncols 2\nnrows 2\nxllcorner 0\nyllcorner 0\ncellsize 1\n1 2 3\n";
		assert!(matches!(Raster::parse_ascii_grid(short), Err(Error::Parse { .. })));

		let garbage = "ncols 2\nnrows 1\nxllcorner 0\nyllcorner 0\ncellsize 1\n1 x\n";
		assert!(matches!(
			Raster::parse_ascii_grid(garbage),
			Err(Error::Parse { line: 6, .. })
		));
	}

	#[test]
	fn oversized_header() {
		let overflow = "ncols 4294967296\nnrows 4294967296\nxllcorner 0\nyllcorner 0\ncellsize 1\n1 2\n";
		assert!(matches!(
			Raster::parse_ascii_grid(overflow),
			Err(Error::Parse { .. })
		));

		let huge = "ncols 100000000\nnrows 100000000\nxllcorner 0\nyllcorner 0\ncellsize 1\n1 2\n";
		match Raster::parse_ascii_grid(huge) {
			Err(Error::Parse { line, message }) => {
				assert_eq!(line, 6);
				assert!(message.contains("found 2"), "{}", message);
			},
			other => panic!("expected parse error, got {:?}", other),
		}

		let usize_max = format!(
			"ncols {}\nnrows 2\nxllcorner 0\nyllcorner 0\ncellsize 1\n1\n",
			usize::MAX
		);
		assert!(matches!(
			Raster::parse_ascii_grid(&usize_max),
			Err(Error::Parse { line: 6, .. })
		));
	}

	#[test]
	fn reads_from_disk() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("dem.asc");
		std::fs::write(&path, GRID).unwrap();
		let raster = Raster::read_ascii_grid(&path).unwrap();
		assert_eq!(raster.len(), 6);

		let result = Raster::read_ascii_grid(dir.path().join("missing.asc"));
		assert!(matches!(result, Err(Error::Io(_))));
	}
}
