use rayon::prelude::*;

use crate::{compute_crown, Crown, CrownParams, Error, Tree, TreeBuilder};

/// Build every tree of a stand in parallel.
///
/// Results keep the input order. A failing tree does not stop the others.
pub fn build_stand(builders: Vec<TreeBuilder>) -> Vec<Result<Tree, Error>> {
	let results = builders
		.into_par_iter()
		.map(TreeBuilder::build)
		.collect::<Vec<_>>();
	let failed = results.iter().filter(|result| result.is_err()).count();
	if failed > 0 {
		log::warn!("{} of {} trees could not be built", failed, results.len());
	}
	results
}

/// [`compute_crown`] for many parameter sets, in parallel and in input order.
pub fn compute_crowns(params: &[CrownParams]) -> Vec<Result<Crown, Error>> {
	params.par_iter().map(compute_crown).collect()
}
