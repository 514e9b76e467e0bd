//! Correlated Gaussian sampling of latent function values.
//!
//! For every output `m`, the latent values over the `N` points follow
//! `N(Fmu[:, m], L[:, :, m] L[:, :, m]^T)`. A draw is obtained by
//! pushing standard-normal innovations through the Cholesky factor:
//!
//! ```text
//! X[s, :, m] = Fmu[:, m] + L[:, :, m] z[s, m, :],   z ~ N(0, I)
//! ```

use crate::error::{LikelihoodError, Result};
use log::debug;
use matrix_util::traits::{CholeskyBlockOps, SampleOps};
use ndarray::prelude::*;
use rand::RngCore;

/// Check that `Fmu [N, M]` and `L [N, N, M]` describe the same latent
/// functions.
///
/// # Returns
/// `(N, M)`
pub fn check_latent_shapes(fmu: &Array2<f64>, chol: &Array3<f64>) -> Result<(usize, usize)> {
    let (nn, mm) = fmu.dim();
    let (l0, l1, l2) = chol.dim();

    if l0 != l1 {
        return Err(LikelihoodError::ShapeMismatch(format!(
            "L must be square in its first two axes, got [{}, {}, {}]",
            l0, l1, l2
        )));
    }

    if l0 != nn || l2 != mm {
        return Err(LikelihoodError::ShapeMismatch(format!(
            "Fmu [{}, {}] is inconsistent with L [{}, {}, {}]",
            nn, mm, l0, l1, l2
        )));
    }

    Ok((nn, mm))
}

/// Marginal variance of the latent values, `Fvar[n, m] = (L_m L_m^T)[n, n]`.
///
/// # Arguments
/// * `chol` - Cholesky factors, shape `[N, N, M]`
///
/// # Returns
/// Variance matrix, shape `[N, M]`
pub fn latent_marginal_variance(chol: &Array3<f64>) -> Array2<f64> {
    chol.block_diag_llt()
}

/// Draw correlated samples of the latent functions.
///
/// Innovations of shape `[S, M, N]` are consumed from `rng` in
/// row-major order, so a fixed seed reproduces the draws exactly. The
/// per-sample products run in parallel.
///
/// # Arguments
/// * `fmu` - Mean, shape `[N, M]`
/// * `chol` - Cholesky factors, shape `[N, N, M]`
/// * `num_samples` - Number of draws S
/// * `rng` - Random number generator
///
/// # Returns
/// Samples, shape `[S, N, M]`
pub fn sample_correlated(
    fmu: &Array2<f64>,
    chol: &Array3<f64>,
    num_samples: usize,
    rng: &mut dyn RngCore,
) -> Result<Array3<f64>> {
    let (nn, mm) = check_latent_shapes(fmu, chol)?;

    if num_samples < 1 {
        return Err(LikelihoodError::InvalidParameter(
            "num_samples must be at least 1".into(),
        ));
    }

    let innovations = Array3::<f64>::rnorm_using(Ix3(num_samples, mm, nn), rng);

    let noise = chol
        .block_matvec(&innovations)
        .map_err(|e| LikelihoodError::ShapeMismatch(e.to_string()))?;

    debug!(
        "drew {} correlated samples over {} points x {} outputs",
        num_samples, nn, mm
    );

    // [S, N, M] + [N, M] broadcasts over the sample axis
    Ok(noise + fmu)
}
