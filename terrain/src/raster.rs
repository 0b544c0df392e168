use std::fmt;

use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::{Elevation, Error};

/// Geographic extent of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
	pub west: f64,
	pub south: f64,
	pub east: f64,
	pub north: f64,
}

impl Bounds {
	pub fn contains(&self, x: f64, y: f64) -> bool {
		(self.west..=self.east).contains(&x) && (self.south..=self.north).contains(&y)
	}

	/// Corners of the bounding box, counterclockwise from lower left.
	pub fn corners(&self) -> [na::Point2<f64>; 4] {
		[
			na::point![self.west, self.south],
			na::point![self.east, self.south],
			na::point![self.east, self.north],
			na::point![self.west, self.north],
		]
	}
}

impl fmt::Display for Bounds {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"[west {}, south {}, east {}, north {}]",
			self.west, self.south, self.east, self.north
		)
	}
}

/// A 2D raster (row-major) with its origin at the top-left.
///
/// Cell (r, c) is centered on
///   x = xmin + (c + 0.5) * res_x
///   y = ymax - (r + 0.5) * res_y
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
	pub nrow: usize,
	pub ncol: usize,
	pub data: Vec<f64>,
	pub res_x: f64,
	pub res_y: f64,
	pub xmin: f64,
	pub xmax: f64,
	pub ymin: f64,
	pub ymax: f64,
	/// Marker for cells without data. NaN cells never hold data.
	pub nodata: Option<f64>,
}

impl Raster {
	/// Raster filled with `fill`, one unit per cell.
	pub fn new(nrow: usize, ncol: usize, fill: f64) -> Self {
		Self {
			nrow,
			ncol,
			data: vec![fill; nrow * ncol],
			res_x: 1.0,
			res_y: 1.0,
			xmin: 0.0,
			xmax: ncol as f64,
			ymin: 0.0,
			ymax: nrow as f64,
			nodata: None,
		}
	}

	/// Raster from row-major `data`, one unit per cell.
	pub fn from_vec(nrow: usize, ncol: usize, data: Vec<f64>) -> Result<Self, Error> {
		if data.len() != nrow * ncol {
			return Err(Error::ShapeMismatch { lengths: vec![data.len(), nrow * ncol] });
		}
		Ok(Self { data, ..Self::new(nrow, ncol, 0.0) })
	}

	/// Place the raster on `[xmin, xmax] x [ymin, ymax]`.
	pub fn with_extent(mut self, xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
		self.xmin = xmin;
		self.xmax = xmax;
		self.ymin = ymin;
		self.ymax = ymax;
		self.res_x = (xmax - xmin) / self.ncol as f64;
		self.res_y = (ymax - ymin) / self.nrow as f64;
		self
	}

	pub fn with_nodata(self, nodata: f64) -> Self {
		Self { nodata: Some(nodata), ..self }
	}

	pub fn len(&self) -> usize {
		self.nrow * self.ncol
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn bounds(&self) -> Bounds {
		Bounds {
			west: self.xmin,
			south: self.ymin,
			east: self.xmax,
			north: self.ymax,
		}
	}

	/// Value at (row, col), `None` outside the grid or without data.
	pub fn get(&self, row: usize, col: usize) -> Option<f64> {
		if row >= self.nrow || col >= self.ncol {
			return None;
		}
		let value = self.data[row * self.ncol + col];
		let missing = value.is_nan() || self.nodata == Some(value);
		(!missing).then_some(value)
	}

	/// Cell containing `(x, y)`. Points on the east or south edge belong to
	/// the last column or row.
	pub fn xy_to_rc(&self, x: f64, y: f64) -> Option<(usize, usize)> {
		if self.is_empty() || !self.bounds().contains(x, y) {
			return None;
		}
		let col = ((x - self.xmin) / self.res_x).floor() as usize;
		let row = ((self.ymax - y) / self.res_y).floor() as usize;
		Some((row.min(self.nrow - 1), col.min(self.ncol - 1)))
	}

	/// Center of cell (row, col).
	pub fn rc_to_xy(&self, row: usize, col: usize) -> na::Point2<f64> {
		na::point![
			self.xmin + (col as f64 + 0.5) * self.res_x,
			self.ymax - (row as f64 + 0.5) * self.res_y
		]
	}
}

impl Elevation for Raster {
	fn elevation(&self, x: f64, y: f64) -> Result<f64, Error> {
		let (row, col) = self
			.xy_to_rc(x, y)
			.ok_or(Error::OutOfBounds { x, y, bounds: self.bounds() })?;
		self.get(row, col).ok_or(Error::NoData { x, y })
	}
}
