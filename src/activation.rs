use ndarray::Array1;

/// The logistic function, `1 / (1 + e^-z)`.
pub fn sigmoid(z: f64) -> f64 {
    1. / (1. + (-z).exp())
}

/// Turns a binary layer state into a vector of `0.` and `1.` values.
pub fn units(states: &[bool]) -> Array1<f64> {
    states.iter().map(|&on| if on { 1. } else { 0. }).collect()
}
