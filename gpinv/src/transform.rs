//! Maps from latent sample space to the argument space of a
//! likelihood's log density.

use ndarray::{Array, Dimension};

/// Built-in latent-to-observation transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Real-valued observations, e.g., Gaussian
    Identity,
    /// Non-negative rates, e.g., Poisson with the `exp` link
    Exp,
}

impl Transform {
    /// Apply the transform elementwise.
    ///
    /// # Arguments
    /// * `ff` - Latent samples of any shape, typically `[S, ..., N, M]`
    ///
    /// # Returns
    /// Transformed samples of the same shape
    pub fn apply<D: Dimension>(&self, ff: &Array<f64, D>) -> Array<f64, D> {
        match self {
            Transform::Identity => ff.clone(),
            Transform::Exp => ff.mapv(f64::exp),
        }
    }
}
