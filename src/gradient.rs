use log::debug;
use ndarray::{linalg, prelude::*};
use rand::Rng;

use crate::{activation::units, chain::GibbsChain, error::Result, params::Params, rbm::Rbm};

/// The partial derivatives of some function with respect to the parameters of an [`Rbm`].
///
/// It is shaped exactly like the model it was computed for, but it holds derivatives, not biases
/// and weights, so it can't be used as one.
#[derive(Debug, Clone, PartialEq)]
pub struct RbmGradient {
    params: Params,
}

impl RbmGradient {
    fn zeros(visible: usize, hidden: usize) -> Self {
        Self {
            params: Params::zeros(visible, hidden),
        }
    }

    pub fn visible_size(&self) -> usize {
        self.params.visible_size()
    }

    pub fn hidden_size(&self) -> usize {
        self.params.hidden_size()
    }

    /// The partials with respect to the visible biases.
    pub fn visible_biases(&self) -> ArrayView1<'_, f64> {
        self.params.visible_biases()
    }

    /// The partials with respect to the hidden biases.
    pub fn hidden_biases(&self) -> ArrayView1<'_, f64> {
        self.params.hidden_biases()
    }

    /// The partials with respect to the weights, as a `hidden x visible` matrix.
    pub fn weights(&self) -> ArrayView2<'_, f64> {
        self.params.weights()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn into_params(self) -> Params {
        self.params
    }

    /// Adds the data statistics of every example in `batch`: its visible state, the expected
    /// hidden activations given it, and their outer product.
    ///
    /// Every example is checked before anything is accumulated.
    fn accumulate_positive<B: AsRef<[bool]>>(&mut self, rbm: &Rbm, batch: &[B]) -> Result<()> {
        for example in batch {
            rbm.check_visible("batch example", example.as_ref().len())?;
        }

        for example in batch {
            let example = example.as_ref();
            let visible = units(example);
            let hidden = rbm.expected_hidden(example)?;

            self.params.visible_biases_mut().scaled_add(1., &visible);
            self.params.hidden_biases_mut().scaled_add(1., &hidden);
            add_outer(&mut self.params.weights_mut(), 1., hidden.view(), visible.view());
        }

        Ok(())
    }

    /// Subtracts the statistics of the final state of a `steps` long Gibbs chain, scaled by
    /// `samples` so they weigh as much as the summed data statistics.
    fn contrastive_divergence<R: Rng + ?Sized>(
        &mut self,
        rbm: &Rbm,
        rng: &mut R,
        mut chain: GibbsChain,
        samples: usize,
        steps: usize,
    ) -> Result<()> {
        chain.run(rbm, rng, steps)?;

        let scaler = samples as f64;
        let visible = units(chain.visible());
        let hidden = units(chain.hidden());

        self.params.hidden_biases_mut().scaled_add(-scaler, &hidden);
        self.params.visible_biases_mut().scaled_add(-scaler, &visible);
        add_outer(&mut self.params.weights_mut(), -scaler, hidden.view(), visible.view());

        Ok(())
    }
}

/// `weights += alpha * hidden ⊗ visible`
fn add_outer(
    weights: &mut ArrayViewMut2<f64>,
    alpha: f64,
    hidden: ArrayView1<f64>,
    visible: ArrayView1<f64>,
) {
    let h = hidden.insert_axis(Axis(1));
    let v = visible.insert_axis(Axis(0));
    linalg::general_mat_mul(alpha, &h, &v, 1., weights);
}

impl Rbm {
    /// Approximates the gradient of the log likelihood of `batch` using contrastive divergence.
    ///
    /// The data statistics are summed over the whole batch. The model statistics come from a
    /// single Gibbs chain that starts with every unit off and runs `gibbs_steps` rounds; they are
    /// scaled by the batch size before being subtracted. The result is therefore a sum over the
    /// batch, not a mean.
    ///
    /// # Arguments
    /// * `rng` - The random source for the Gibbs chain.
    /// * `batch` - The visible states to maximize the likelihood of.
    /// * `gibbs_steps` - The amount of Gibbs sampling rounds.
    ///
    /// # Returns
    /// The gradient, or an error if an example doesn't match the visible layer.
    pub fn log_likelihood_gradient<R, B>(
        &self,
        rng: &mut R,
        batch: &[B],
        gibbs_steps: usize,
    ) -> Result<RbmGradient>
    where
        R: Rng + ?Sized,
        B: AsRef<[bool]>,
    {
        let chain = GibbsChain::new(self.visible_size(), self.hidden_size());
        self.log_likelihood_gradient_from(rng, batch, gibbs_steps, chain)
    }

    /// Same as [`Rbm::log_likelihood_gradient`] but the Gibbs chain starts from `chain`.
    ///
    /// # Returns
    /// The gradient, or an error if an example or the chain doesn't match the model.
    pub fn log_likelihood_gradient_from<R, B>(
        &self,
        rng: &mut R,
        batch: &[B],
        gibbs_steps: usize,
        chain: GibbsChain,
    ) -> Result<RbmGradient>
    where
        R: Rng + ?Sized,
        B: AsRef<[bool]>,
    {
        chain.check_fits(self)?;

        debug!(
            "estimating gradient: visible={} hidden={} batch={} gibbs_steps={gibbs_steps}",
            self.visible_size(),
            self.hidden_size(),
            batch.len()
        );

        let mut grad = RbmGradient::zeros(self.visible_size(), self.hidden_size());
        grad.accumulate_positive(self, batch)?;
        grad.contrastive_divergence(self, rng, chain, batch.len(), gibbs_steps)?;
        Ok(grad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RbmErr, activation::sigmoid};
    use ndarray::array;
    use rand::{SeedableRng, rngs::StdRng};

    fn small_rbm() -> Rbm {
        let mut rbm = Rbm::new(3, 2);
        let p = rbm.params_mut();
        p.weights_mut().assign(&array![[0.5, -0.25, 1.], [-1.5, 0.75, 0.25]]);
        p.visible_biases_mut().assign(&array![0.25, 0., -0.5]);
        p.hidden_biases_mut().assign(&array![-0.5, 0.125]);
        rbm
    }

    fn positive(rbm: &Rbm, batch: &[Vec<bool>]) -> RbmGradient {
        let mut grad = RbmGradient::zeros(rbm.visible_size(), rbm.hidden_size());
        grad.accumulate_positive(rbm, batch).unwrap();
        grad
    }

    #[test]
    fn positive_phase_of_one_example() {
        let rbm = small_rbm();
        let grad = positive(&rbm, &[vec![true, false, true]]);
        let e = [sigmoid(0.5 + 1. - 0.5), sigmoid(-1.5 + 0.25 + 0.125)];

        assert_eq!(grad.visible_biases(), array![1., 0., 1.]);
        assert_eq!(grad.hidden_biases(), array![e[0], e[1]]);
        assert_eq!(grad.weights(), array![[e[0], 0., e[0]], [e[1], 0., e[1]]]);
    }

    #[test]
    fn positive_phase_is_linear_in_repeats() {
        let rbm = small_rbm();
        let example = vec![false, true, true];
        let once = positive(&rbm, &[example.clone()]);
        let thrice = positive(&rbm, &vec![example; 3]);

        let expected = once.params().visible_biases().mapv(|x| 3. * x);
        assert_eq!(thrice.visible_biases(), expected);
        for (t, o) in thrice.hidden_biases().iter().zip(once.hidden_biases()) {
            assert!((t - 3. * o).abs() < 1e-12);
        }
        for (t, o) in thrice.weights().iter().zip(once.weights()) {
            assert!((t - 3. * o).abs() < 1e-12);
        }
    }

    #[test]
    fn positive_phase_checks_every_example_first() {
        let rbm = small_rbm();
        let mut grad = RbmGradient::zeros(3, 2);
        let batch = [vec![true, true, true], vec![true]];

        let res = grad.accumulate_positive(&rbm, &batch);
        assert!(matches!(
            res,
            Err(RbmErr::SizeMismatch {
                got: 1,
                expected: 3,
                ..
            })
        ));
        assert_eq!(grad, RbmGradient::zeros(3, 2));
    }

    #[test]
    fn negative_phase_scales_by_samples() {
        let mut rbm = Rbm::new(2, 2);
        rbm.params_mut().hidden_biases_mut().assign(&array![1e3, -1e3]);
        rbm.params_mut().visible_biases_mut().assign(&array![1e3, 1e3]);

        let mut grad = RbmGradient::zeros(2, 2);
        let mut rng = StdRng::seed_from_u64(3);
        let chain = GibbsChain::new(2, 2);
        grad.contrastive_divergence(&rbm, &mut rng, chain, 4, 2)
            .unwrap();

        assert_eq!(grad.hidden_biases(), array![-4., 0.]);
        assert_eq!(grad.visible_biases(), array![-4., -4.]);
        assert_eq!(grad.weights(), array![[-4., -4.], [0., 0.]]);
    }

    #[test]
    fn zero_steps_use_the_seed_state() {
        let rbm = small_rbm();
        let mut grad = RbmGradient::zeros(3, 2);
        let mut rng = StdRng::seed_from_u64(3);
        let chain = GibbsChain::from_visible(vec![true, true, false], 2);
        grad.contrastive_divergence(&rbm, &mut rng, chain, 2, 0)
            .unwrap();

        assert_eq!(grad.visible_biases(), array![-2., -2., 0.]);
        assert_eq!(grad.hidden_biases(), array![0., 0.]);
        assert!(grad.weights().iter().all(|&w| w == 0.));
    }

    #[test]
    fn estimate_rejects_mismatched_chain() {
        let rbm = small_rbm();
        let mut rng = StdRng::seed_from_u64(3);
        let chain = GibbsChain::new(3, 5);

        let res = rbm.log_likelihood_gradient_from(&mut rng, &[[true, false, true]], 1, chain);
        assert!(matches!(
            res,
            Err(RbmErr::SizeMismatch {
                got: 5,
                expected: 2,
                ..
            })
        ));
    }
}
