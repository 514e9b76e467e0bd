//! Likelihoods whose variational expectation is taken under a
//! correlated Gaussian posterior of the latent functions.
//!
//! A likelihood must supply `transform` and `logp`. It may override
//! `variational_expectations` with a closed form (the default integrates
//! `logp` by Gauss-Hermite quadrature) and may provide
//! `exact_expectations`. The shared driver `stochastic_expectations`
//! picks one of two strategies:
//!
//! - **exact**: a closed form taking `Fmu`, `L`, `Y` directly;
//! - **stochastic**: draw `S` correlated samples, transform them,
//!   reduce to mean and variance, and evaluate the moment-matched
//!   expectation against `Y`.
//!
//! A capability that is not provided fails with
//! [`LikelihoodError::UnimplementedCapability`] on first use.

mod gaussian;
mod poisson;

pub use gaussian::GaussianLikelihood;
pub use poisson::{InvLink, PoissonLikelihood};

use crate::config::{ExpectationMethod, StochasticConfig};
use crate::error::{LikelihoodError, Result};
use crate::moments;
use crate::quadrature::{GaussHermite, DEFAULT_NUM_GAUSS_HERMITE_POINTS};
use crate::sampler::{check_latent_shapes, sample_correlated};
use log::debug;
use ndarray::prelude::*;
use rand::RngCore;

/// Likelihood `p(Y | g(f))` with a stochastic estimate of
/// `E_q[log p(Y | f)]` for `q(f) = N(Fmu, L L^T)`.
pub trait StochasticLikelihood: Send + Sync {
    /// Short name used in logs and errors
    fn name(&self) -> &'static str;

    fn config(&self) -> &StochasticConfig;

    /// Map latent samples to the argument of `logp`.
    ///
    /// # Arguments
    /// * `ff` - Latent samples, shape `[S, N, M]`
    ///
    /// # Returns
    /// Samples for the observed values, shape `[S, N', M']`
    fn transform(&self, _ff: &Array3<f64>) -> Result<Array3<f64>> {
        Err(LikelihoodError::unimplemented(self.name(), "transform"))
    }

    /// Elementwise `log p(Y | F)`, shape `[N', M']`
    fn logp(&self, _ff: &Array2<f64>, _yy: &Array2<f64>) -> Result<Array2<f64>> {
        Err(LikelihoodError::unimplemented(self.name(), "logp"))
    }

    /// Moment-based plug-in of `E[log p(Y | g)]` for `g ~ N(Gmu, Gvar)`.
    ///
    /// The default integrates `logp` elementwise with Gauss-Hermite
    /// quadrature; likelihoods with a closed form override it.
    ///
    /// # Returns
    /// Expectation with the shape of `Y`
    fn variational_expectations(
        &self,
        gmu: &Array2<f64>,
        gvar: &Array2<f64>,
        yy: &Array2<f64>,
    ) -> Result<Array2<f64>> {
        check_dims("Y", yy.dim(), gmu.dim())?;
        let quad = GaussHermite::new(DEFAULT_NUM_GAUSS_HERMITE_POINTS)?;
        quad.expectation(gmu, gvar, |gg| self.logp(gg, yy))
    }

    /// Closed-form `E_q[log p(Y | f)]`, bypassing sampling
    fn exact_expectations(
        &self,
        _fmu: &Array2<f64>,
        _chol: &Array3<f64>,
        _yy: &Array2<f64>,
    ) -> Result<Array2<f64>> {
        Err(LikelihoodError::unimplemented(
            self.name(),
            "exact_expectations",
        ))
    }

    /// Mean around which the stochastic path samples
    fn stochastic_mean(&self, fmu: &Array2<f64>) -> Array2<f64> {
        fmu.clone()
    }

    /// Shape of `Y` implied by latent functions of shape `[N, M]`, if
    /// the transform fixes it. Lets the driver reject a bad `Y` before
    /// drawing any samples.
    fn observation_dims(&self, _latent_dims: (usize, usize)) -> Option<(usize, usize)> {
        None
    }

    /// Mean and variance over the sample axis
    fn estimate_mu_var(&self, gg: &Array3<f64>) -> Result<(Array2<f64>, Array2<f64>)> {
        moments::estimate_mu_var(gg)
    }

    /// Estimate `E_q[log p(Y | f)]`.
    ///
    /// # Arguments
    /// * `fmu` - Mean of the latent functions, shape `[N, M]`
    /// * `chol` - Cholesky factors of the covariance, shape `[N, N, M]`
    /// * `yy` - Observations, shape `[N', M']`
    /// * `rng` - Random stream consumed by the stochastic path
    ///
    /// # Returns
    /// Expectation with the shape of `Y`
    fn stochastic_expectations(
        &self,
        fmu: &Array2<f64>,
        chol: &Array3<f64>,
        yy: &Array2<f64>,
        rng: &mut dyn RngCore,
    ) -> Result<Array2<f64>> {
        let latent_dims = check_latent_shapes(fmu, chol)?;

        if let Some(obs_dims) = self.observation_dims(latent_dims) {
            check_dims("Y", yy.dim(), obs_dims)?;
        }

        match self.config().method() {
            ExpectationMethod::Exact => {
                debug!("{}: closed-form expectation", self.name());
                self.exact_expectations(fmu, chol, yy)
            }
            ExpectationMethod::Stochastic => {
                let num_samples = self.config().num_samples();
                debug!(
                    "{}: stochastic expectation with {} samples",
                    self.name(),
                    num_samples
                );

                let mean = self.stochastic_mean(fmu);
                let xx = sample_correlated(&mean, chol, num_samples, rng)?;
                let gg = self.transform(&xx)?;
                debug!("{}: transformed samples {:?}", self.name(), gg.shape());

                let (gmu, gvar) = self.estimate_mu_var(&gg)?;
                check_dims("transformed moments", gmu.dim(), yy.dim())?;

                self.variational_expectations(&gmu, &gvar, yy)
            }
        }
    }
}

/// `ShapeMismatch` unless `found == expected`
pub(crate) fn check_dims(
    what: &str,
    found: (usize, usize),
    expected: (usize, usize),
) -> Result<()> {
    if found != expected {
        return Err(LikelihoodError::ShapeMismatch(format!(
            "{} has shape {:?}, expected {:?}",
            what, found, expected
        )));
    }
    Ok(())
}
