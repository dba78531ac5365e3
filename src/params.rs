use ndarray::prelude::*;

/// The values shaped like an RBM: a bias per visible unit, a bias per hidden unit and a weight
/// per (hidden, visible) pair.
///
/// The weight matrix always has one row per hidden unit and one column per visible unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    visible_biases: Array1<f64>,
    hidden_biases: Array1<f64>,
    weights: Array2<f64>,
}

impl Params {
    /// Returns a new zeroed `Params`.
    ///
    /// # Arguments
    /// * `visible` - The amount of visible units.
    /// * `hidden` - The amount of hidden units.
    pub fn zeros(visible: usize, hidden: usize) -> Self {
        Self {
            visible_biases: Array1::zeros(visible),
            hidden_biases: Array1::zeros(hidden),
            weights: Array2::zeros((hidden, visible)),
        }
    }

    /// Returns the amount of visible units.
    pub fn visible_size(&self) -> usize {
        self.visible_biases.len()
    }

    /// Returns the amount of hidden units.
    pub fn hidden_size(&self) -> usize {
        self.hidden_biases.len()
    }

    pub fn visible_biases(&self) -> ArrayView1<'_, f64> {
        self.visible_biases.view()
    }

    pub fn hidden_biases(&self) -> ArrayView1<'_, f64> {
        self.hidden_biases.view()
    }

    /// Returns the `hidden x visible` weight matrix.
    pub fn weights(&self) -> ArrayView2<'_, f64> {
        self.weights.view()
    }

    pub fn visible_biases_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        self.visible_biases.view_mut()
    }

    pub fn hidden_biases_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        self.hidden_biases.view_mut()
    }

    pub fn weights_mut(&mut self) -> ArrayViewMut2<'_, f64> {
        self.weights.view_mut()
    }

    /// Returns the weight connecting hidden unit `hidden` and visible unit `visible`.
    ///
    /// # Panics
    /// If either index is out of bounds.
    pub fn weight(&self, hidden: usize, visible: usize) -> f64 {
        self.weights[[hidden, visible]]
    }

    /// Adds `delta` to the bias of the visible unit `idx`.
    ///
    /// # Panics
    /// If `idx` is out of bounds.
    pub fn add_visible_bias(&mut self, idx: usize, delta: f64) {
        self.visible_biases[idx] += delta;
    }

    /// Adds `delta` to the bias of the hidden unit `idx`.
    ///
    /// # Panics
    /// If `idx` is out of bounds.
    pub fn add_hidden_bias(&mut self, idx: usize, delta: f64) {
        self.hidden_biases[idx] += delta;
    }

    /// Adds `delta` to the weight connecting `hidden` and `visible`.
    ///
    /// # Panics
    /// If either index is out of bounds.
    pub fn add_weight(&mut self, hidden: usize, visible: usize, delta: f64) {
        self.weights[[hidden, visible]] += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn zeros_has_hidden_rows_and_visible_cols() {
        let params = Params::zeros(3, 2);

        assert_eq!(params.visible_size(), 3);
        assert_eq!(params.hidden_size(), 2);
        assert_eq!(params.weights().dim(), (2, 3));
        assert!(params.weights().iter().all(|&w| w == 0.));
    }

    #[test]
    fn add_in_place() {
        let mut params = Params::zeros(3, 2);
        params.add_visible_bias(2, 0.5);
        params.add_hidden_bias(1, -1.5);
        params.add_weight(1, 2, 2.);
        params.add_weight(1, 2, 0.25);

        assert_eq!(params.visible_biases(), array![0., 0., 0.5]);
        assert_eq!(params.hidden_biases(), array![0., -1.5]);
        assert_eq!(params.weight(1, 2), 2.25);
        assert_eq!(params.weight(0, 2), 0.);
    }
}
