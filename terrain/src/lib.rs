//! Terrain elevation for placing stems and plot boundaries.

mod ascii;
mod plot;
mod raster;

pub use plot::{circular_plot_boundary, BOUNDARY_POINTS};
pub use raster::{Bounds, Raster};

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("({x}, {y}) is outside the elevation raster {bounds}")]
	OutOfBounds { x: f64, y: f64, bounds: Bounds },

	#[error("No elevation data at ({x}, {y})")]
	NoData { x: f64, y: f64 },

	#[error("Input shapes mismatch: {lengths:?}")]
	ShapeMismatch { lengths: Vec<usize> },

	#[error("Plot radius must be finite and >= 0, got {0}")]
	PlotRadius(f64),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error("Invalid ASCII grid, line {line}: {message}")]
	Parse { line: usize, message: String },
}

/// Source of terrain heights.
pub trait Elevation {
	/// Elevation at `(x, y)`, failing with [`Error::OutOfBounds`] outside the
	/// data extent.
	fn elevation(&self, x: f64, y: f64) -> Result<f64, Error>;

	/// Elevation for each `(xs[i], ys[i])`. Lengths are compared before any
	/// lookup.
	fn elevations(&self, xs: &[f64], ys: &[f64]) -> Result<Vec<f64>, Error> {
		if xs.len() != ys.len() {
			return Err(Error::ShapeMismatch { lengths: vec![xs.len(), ys.len()] });
		}
		xs.iter()
			.zip(ys)
			.map(|(&x, &y)| self.elevation(x, y))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Slope;

	impl Elevation for Slope {
		fn elevation(&self, x: f64, y: f64) -> Result<f64, Error> {
			Ok(x + 2.0 * y)
		}
	}

	#[test]
	fn batch_uses_single_lookup() {
		let elevations = Slope.elevations(&[0.0, 1.0, 2.0], &[1.0, 1.0, 0.5]).unwrap();
		assert_eq!(elevations, vec![2.0, 3.0, 3.0]);
	}

	#[test]
	fn batch_checks_lengths() {
		let result = Slope.elevations(&[0.0, 1.0], &[1.0]);
		assert!(matches!(result, Err(Error::ShapeMismatch { lengths }) if lengths == vec![2, 1]));
	}
}
