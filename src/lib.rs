//! Contrastive divergence (CD-k) estimation of the log likelihood gradient of binary Restricted
//! Boltzmann Machines.

mod activation;
mod chain;
mod config;
mod error;
mod gradient;
mod params;
mod rbm;

pub use activation::sigmoid;
pub use chain::GibbsChain;
pub use config::{CdConfig, Estimator};
pub use error::{RbmErr, Result};
pub use gradient::RbmGradient;
pub use params::Params;
pub use rbm::Rbm;
