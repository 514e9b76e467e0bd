//! Empirical moments over the sample axis.

use crate::error::{LikelihoodError, Result};
use ndarray::{Array, Axis, Dimension, RemoveAxis};

/// Estimate mean and variance across samples.
///
/// ```text
/// Gmu  = mean_s G[s, ...]
/// Gvar = mean_s (G[s, ...] - Gmu)^2
/// ```
///
/// The variance divides by S, so a single sample gives `Gvar = 0`.
///
/// # Arguments
/// * `gg` - Samples, shape `[S, N', M']` (any rank >= 1)
///
/// # Returns
/// `(Gmu, Gvar)`, each with the sample axis removed
pub fn estimate_mu_var<D>(
    gg: &Array<f64, D>,
) -> Result<(Array<f64, D::Smaller>, Array<f64, D::Smaller>)>
where
    D: Dimension + RemoveAxis,
{
    let gmu = gg.mean_axis(Axis(0)).ok_or_else(|| {
        LikelihoodError::ShapeMismatch("cannot take moments over zero samples".into())
    })?;

    let num_samples = gg.len_of(Axis(0)) as f64;
    let mut gvar = Array::<f64, D::Smaller>::zeros(gmu.raw_dim());
    for g_s in gg.axis_iter(Axis(0)) {
        ndarray::Zip::from(&mut gvar)
            .and(&g_s)
            .and(&gmu)
            .for_each(|v, &g, &mu| *v += (g - mu) * (g - mu));
    }
    gvar /= num_samples;

    Ok((gmu, gvar))
}
