use ndarray::{Array2, Axis};
use num_complex::Complex64;
use rayon::prelude::*;

use super::{Projection, ProjectionPlan};
use crate::config::ProjectionConfig;
use crate::error::Result;
use crate::neighborhood::Neighborhood;

/// Holograms of a batch: row `i` belongs to neighborhood `i`, column `j` to
/// the `j`-th term of the plan's support.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionBatch {
    pub coefficients: Array2<Complex64>,
    pub excluded: Vec<usize>,
}

impl ProjectionBatch {
    pub fn total_excluded(&self) -> usize {
        self.excluded.iter().sum()
    }
}

/// Projects every neighborhood in parallel with a shared plan.
///
/// Fails the whole batch on the first error, wrapped in
/// `ZernikeError::Neighborhood` with the index of the offending neighborhood.
pub fn project_batch(
    neighborhoods: &[Neighborhood],
    plan: &ProjectionPlan,
    config: &ProjectionConfig,
) -> Result<ProjectionBatch> {
    config.validate()?;
    let mut coefficients = Array2::<Complex64>::zeros((neighborhoods.len(), plan.len()));
    let mut excluded = vec![0usize; neighborhoods.len()];

    coefficients
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .zip(excluded.par_iter_mut())
        .enumerate()
        .try_for_each(|(i, (mut row, excluded))| -> Result<()> {
            let projection = plan
                .project(&neighborhoods[i], config)
                .map_err(|e| e.in_neighborhood(i))?;
            row.assign(&projection.coefficients);
            *excluded = projection.excluded;
            Ok(())
        })?;

    let batch = ProjectionBatch {
        coefficients,
        excluded,
    };
    log_exclusions(batch.total_excluded(), neighborhoods.len(), config);
    Ok(batch)
}

/// Like [`project_batch`], but a failing neighborhood only fails its own
/// entry. Errors carry the neighborhood index.
pub fn project_batch_isolated(
    neighborhoods: &[Neighborhood],
    plan: &ProjectionPlan,
    config: &ProjectionConfig,
) -> Vec<Result<Projection>> {
    let results: Vec<Result<Projection>> = neighborhoods
        .par_iter()
        .enumerate()
        .map(|(i, neighborhood)| {
            plan.project(neighborhood, config)
                .map_err(|e| e.in_neighborhood(i))
        })
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        log::warn!("{} of {} neighborhoods failed to project", failed, neighborhoods.len());
    }
    let total: usize = results.iter().flatten().map(|p| p.excluded).sum();
    log_exclusions(total, neighborhoods.len(), config);
    results
}

fn log_exclusions(total: usize, batch_size: usize, config: &ProjectionConfig) {
    if total > 0 {
        log::warn!(
            "excluded {} points at or beyond r_max={} across {} neighborhoods",
            total,
            config.r_max,
            batch_size
        );
    }
}
