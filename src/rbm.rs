use ndarray::prelude::*;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{
    activation::{sigmoid, units},
    error::{RbmErr, Result},
    params::Params,
};

/// A binary Restricted Boltzmann Machine.
///
/// Every visible unit is connected to every hidden unit and there are no connections inside a
/// layer, so each layer is conditionally independent given the other one.
#[derive(Debug, Clone, PartialEq)]
pub struct Rbm {
    params: Params,
}

impl Rbm {
    /// Returns a new `Rbm` with every bias and weight set to zero.
    ///
    /// # Arguments
    /// * `visible` - The amount of visible units.
    /// * `hidden` - The amount of hidden units.
    pub fn new(visible: usize, hidden: usize) -> Self {
        Self::from_params(Params::zeros(visible, hidden))
    }

    /// Returns a new `Rbm` that uses the given parameters.
    pub fn from_params(params: Params) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    pub fn visible_size(&self) -> usize {
        self.params.visible_size()
    }

    pub fn hidden_size(&self) -> usize {
        self.params.hidden_size()
    }

    /// Resets the biases to zero and draws every weight from `N(0, std_dev)`.
    ///
    /// # Arguments
    /// * `rng` - The random source.
    /// * `std_dev` - The standard deviation of the weights.
    ///
    /// # Returns
    /// An error if `std_dev` is negative or not finite.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, std_dev: f64) -> Result<()> {
        if !std_dev.is_finite() || std_dev < 0. {
            return Err(RbmErr::InvalidStdDev(std_dev));
        }

        let normal = Normal::new(0., std_dev).map_err(|_| RbmErr::InvalidStdDev(std_dev))?;

        self.params.visible_biases_mut().fill(0.);
        self.params.hidden_biases_mut().fill(0.);
        self.params
            .weights_mut()
            .iter_mut()
            .for_each(|w| *w = normal.sample(rng));

        Ok(())
    }

    /// Computes the energy of a joint configuration, `-(b_v·v + b_h·h + hᵀWv)`.
    ///
    /// # Arguments
    /// * `visible` - The visible layer state.
    /// * `hidden` - The hidden layer state.
    pub fn energy(&self, visible: &[bool], hidden: &[bool]) -> Result<f64> {
        self.check_visible("visible state", visible.len())?;
        self.check_hidden("hidden state", hidden.len())?;

        let v = units(visible);
        let h = units(hidden);
        let p = &self.params;

        let bias_term = p.visible_biases().dot(&v) + p.hidden_biases().dot(&h);
        let interaction = h.dot(&p.weights().dot(&v));
        Ok(-(bias_term + interaction))
    }

    /// Computes the probability of every hidden unit being on given the visible layer state.
    ///
    /// # Arguments
    /// * `visible` - The visible layer state.
    ///
    /// # Returns
    /// A vector of length `hidden_size` with values in `[0, 1]`.
    pub fn expected_hidden(&self, visible: &[bool]) -> Result<Array1<f64>> {
        self.check_visible("visible state", visible.len())?;

        let z = self.params.weights().dot(&units(visible)) + &self.params.hidden_biases();
        Ok(z.mapv_into(sigmoid))
    }

    /// Computes the probability of every visible unit being on given the hidden layer state.
    ///
    /// # Arguments
    /// * `hidden` - The hidden layer state.
    ///
    /// # Returns
    /// A vector of length `visible_size` with values in `[0, 1]`.
    pub fn expected_visible(&self, hidden: &[bool]) -> Result<Array1<f64>> {
        self.check_hidden("hidden state", hidden.len())?;

        let z = self.params.weights().t().dot(&units(hidden)) + &self.params.visible_biases();
        Ok(z.mapv_into(sigmoid))
    }

    /// Draws a hidden layer state given the visible one, writing it into `hidden`.
    ///
    /// Units are drawn in order, each one on if a uniform draw in `[0, 1)` falls below its
    /// probability.
    ///
    /// # Arguments
    /// * `rng` - The random source.
    /// * `hidden` - The buffer for the drawn hidden state.
    /// * `visible` - The visible state to condition on.
    pub fn sample_hidden<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        hidden: &mut [bool],
        visible: &[bool],
    ) -> Result<()> {
        self.check_hidden("hidden buffer", hidden.len())?;
        let probs = self.expected_hidden(visible)?;
        bernoulli_into(rng, hidden, probs.view());
        Ok(())
    }

    /// Draws a visible layer state given the hidden one, writing it into `visible`.
    ///
    /// # Arguments
    /// * `rng` - The random source.
    /// * `visible` - The buffer for the drawn visible state.
    /// * `hidden` - The hidden state to condition on.
    pub fn sample_visible<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        visible: &mut [bool],
        hidden: &[bool],
    ) -> Result<()> {
        self.check_visible("visible buffer", visible.len())?;
        let probs = self.expected_visible(hidden)?;
        bernoulli_into(rng, visible, probs.view());
        Ok(())
    }

    pub(crate) fn check_visible(&self, what: &'static str, got: usize) -> Result<()> {
        RbmErr::check_size(what, "visible layer", got, self.visible_size())
    }

    pub(crate) fn check_hidden(&self, what: &'static str, got: usize) -> Result<()> {
        RbmErr::check_size(what, "hidden layer", got, self.hidden_size())
    }
}

fn bernoulli_into<R: Rng + ?Sized>(rng: &mut R, out: &mut [bool], probs: ArrayView1<f64>) {
    for (unit, &p) in out.iter_mut().zip(probs) {
        *unit = rng.random::<f64>() < p;
    }
}
