use nalgebra as na;
use terrain::{circular_plot_boundary, Elevation, Error, Raster, BOUNDARY_POINTS};

fn write_dem(dir: &std::path::Path) -> std::path::PathBuf {
	// plane rising 1 m per 10 m to the east, 10 m cells
	let mut text = String::from(
		"ncols 10\nnrows 10\nxllcorner 1000\nyllcorner 5000\ncellsize 10\nnodata_value -9999\n",
	);
	for _ in 0..10 {
		let row = (0..10)
			.map(|col| (100 + col).to_string())
			.collect::<Vec<_>>()
			.join(" ");
		text.push_str(&row);
		text.push('\n');
	}
	let path = dir.join("dem.asc");
	std::fs::write(&path, text).unwrap();
	path
}

#[test]
fn plot_on_dem() {
	let dir = tempfile::tempdir().unwrap();
	let dem = Raster::read_ascii_grid(write_dem(dir.path())).unwrap();

	let boundary = circular_plot_boundary(na::point![1050.0, 5050.0], 20.0, Some(&dem)).unwrap();
	assert_eq!(boundary.len(), BOUNDARY_POINTS);
	for point in &boundary {
		assert_eq!(point.z, dem.elevation(point.x, point.y).unwrap());
		assert!((100.0..110.0).contains(&point.z));
	}
	// east side sits higher than the west side
	let east = boundary[0];
	let west = boundary[BOUNDARY_POINTS / 2];
	assert!(east.z > west.z);
}

#[test]
fn stems_outside_dem_fail() {
	let dir = tempfile::tempdir().unwrap();
	let dem = Raster::read_ascii_grid(write_dem(dir.path())).unwrap();

	let result = dem.elevations(&[1005.0, 2000.0], &[5005.0, 5005.0]);
	match result {
		Err(Error::OutOfBounds { x, bounds, .. }) => {
			assert_eq!(x, 2000.0);
			assert_eq!(bounds.east, 1100.0);
		},
		other => panic!("expected out of bounds, got {:?}", other),
	}
}
