use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{error::Result, gradient::RbmGradient, rbm::Rbm};

fn default_gibbs_steps() -> usize {
    1
}

/// The configuration of a contrastive divergence estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CdConfig {
    /// The amount of Gibbs sampling rounds per estimate, the `k` in CD-k.
    #[serde(default = "default_gibbs_steps")]
    pub gibbs_steps: usize,
    /// A seed for reproducible estimates.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for CdConfig {
    fn default() -> Self {
        Self {
            gibbs_steps: default_gibbs_steps(),
            seed: None,
        }
    }
}

impl CdConfig {
    /// Parses a `CdConfig` from a json document, missing fields take their default.
    ///
    /// # Returns
    /// An `InvalidConfig` error if the document is malformed.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Computes CD-k gradients with a fixed configuration.
#[derive(Debug, Clone, Copy)]
pub struct Estimator {
    config: CdConfig,
}

impl Estimator {
    pub fn new(config: CdConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CdConfig {
        &self.config
    }

    /// Estimates the gradient of the log likelihood of `batch` with the given random source.
    ///
    /// See [`Rbm::log_likelihood_gradient`].
    pub fn estimate<R, B>(&self, rbm: &Rbm, rng: &mut R, batch: &[B]) -> Result<RbmGradient>
    where
        R: Rng + ?Sized,
        B: AsRef<[bool]>,
    {
        rbm.log_likelihood_gradient(rng, batch, self.config.gibbs_steps)
    }

    /// Estimates the gradient of the log likelihood of `batch` with a random source built from
    /// the configured seed, or from the thread local generator when there is none.
    pub fn estimate_seeded<B: AsRef<[bool]>>(&self, rbm: &Rbm, batch: &[B]) -> Result<RbmGradient> {
        match self.config.seed {
            Some(seed) => self.estimate(rbm, &mut StdRng::seed_from_u64(seed), batch),
            None => self.estimate(rbm, &mut rand::rng(), batch),
        }
    }
}
