use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

use crate::config::ExperimentConfig;

/// Draws standard-normal vectors whose components share a common pairwise
/// correlation.
///
/// Uses a one-factor model: `x_j = sqrt(rho) * z_0 + sqrt(1 - rho) * z_j`.
pub struct CorrelatedSampler {
    n_data: usize,
    corr: f64,
    rng: StdRng,
}

impl CorrelatedSampler {
    pub fn new(cfg: &ExperimentConfig) -> Self {
        Self {
            n_data: cfg.n_data,
            corr: cfg.corr.clamp(0.0, 1.0),
            rng: StdRng::seed_from_u64(cfg.seed),
        }
    }

    /// `n_data` samples of dimension `dims`
    pub fn sample(&mut self, dims: usize) -> Vec<Vec<f64>> {
        let common = self.corr.sqrt();
        let own = (1.0 - self.corr).sqrt();
        (0..self.n_data)
            .map(|_| {
                let shared: f64 = StandardNormal.sample(&mut self.rng);
                (0..dims)
                    .map(|_| {
                        let z: f64 = StandardNormal.sample(&mut self.rng);
                        common * shared + own * z
                    })
                    .collect()
            })
            .collect()
    }
}
