use log::trace;
use rand::Rng;

use crate::{error::Result, rbm::Rbm};

/// The state of a block Gibbs sampling chain over an RBM.
///
/// The same pair of buffers is reused for every step, each step resampling the hidden layer from
/// the visible one and then the visible layer from the new hidden one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GibbsChain {
    visible: Vec<bool>,
    hidden: Vec<bool>,
}

impl GibbsChain {
    /// Returns a new `GibbsChain` with every unit off.
    ///
    /// # Arguments
    /// * `visible` - The amount of visible units.
    /// * `hidden` - The amount of hidden units.
    pub fn new(visible: usize, hidden: usize) -> Self {
        Self {
            visible: vec![false; visible],
            hidden: vec![false; hidden],
        }
    }

    /// Returns a new `GibbsChain` starting from the given visible state, with every hidden unit
    /// off.
    pub fn from_visible(visible: Vec<bool>, hidden: usize) -> Self {
        Self {
            visible,
            hidden: vec![false; hidden],
        }
    }

    pub fn visible(&self) -> &[bool] {
        &self.visible
    }

    pub fn hidden(&self) -> &[bool] {
        &self.hidden
    }

    /// Fails if the chain's buffers don't match the layers of `rbm`.
    pub fn check_fits(&self, rbm: &Rbm) -> Result<()> {
        rbm.check_visible("chain visible state", self.visible.len())?;
        rbm.check_hidden("chain hidden state", self.hidden.len())
    }

    /// Runs `steps` rounds of alternating hidden and visible sampling.
    ///
    /// # Arguments
    /// * `rbm` - The model to sample from.
    /// * `rng` - The random source.
    /// * `steps` - The amount of rounds, zero leaves the chain untouched.
    pub fn run<R: Rng + ?Sized>(&mut self, rbm: &Rbm, rng: &mut R, steps: usize) -> Result<()> {
        self.check_fits(rbm)?;

        for step in 0..steps {
            rbm.sample_hidden(rng, &mut self.hidden, &self.visible)?;
            rbm.sample_visible(rng, &mut self.visible, &self.hidden)?;
            trace!("gibbs step {step}: visible={:?} hidden={:?}", self.visible, self.hidden);
        }

        Ok(())
    }
}
