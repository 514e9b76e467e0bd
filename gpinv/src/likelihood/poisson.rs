//! Poisson likelihood for count data.

use ndarray::prelude::*;
use ndarray::Zip;

use super::{check_dims, StochasticLikelihood};
use crate::config::StochasticConfig;
use crate::densities;
use crate::error::Result;
use crate::transform::Transform;

/// Inverse link from the latent function to the Poisson rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvLink {
    /// λ = exp(f)
    #[default]
    Exp,
    /// λ = log(1 + exp(f))
    Softplus,
}

impl InvLink {
    pub fn apply(&self, f: f64) -> f64 {
        match self {
            InvLink::Exp => f.exp(),
            InvLink::Softplus => {
                // log(1 + e^f) without overflow for large f
                if f > 0.0 {
                    f + (-f).exp().ln_1p()
                } else {
                    f.exp().ln_1p()
                }
            }
        }
    }
}

/// Poisson likelihood: y ~ Poisson(invlink(f))
///
/// # Model
/// ```text
/// log p(y | f) = y * log λ - λ - log(y!),   λ = invlink(f)
/// ```
///
/// `logp` takes latent values. The stochastic path instead samples
/// rates directly around `invlink(Fmu)` with the latent covariance
/// `L L^T`, so `g` in `variational_expectations` is a rate and the
/// plug-in is the second-order expansion of `E[log Poisson(y | g)]`:
/// ```text
/// E[log p(y | λ)] ≈ y * (log E[λ] - Var[λ] / (2 E[λ]²)) - E[λ] - log(y!)
/// ```
/// Against the latent-space expectation under `f ~ N(Fmu, Fvar)`, e.g.
/// `y Fmu - exp(Fmu + Fvar / 2) - log(y!)` for the `exp` link, this is
/// biased upward by about
/// ```text
/// λ (exp(Fvar / 2) - 1) - y Fvar / (2 λ²),   λ = invlink(Fmu)
/// ```
/// so the two agree only while `λ * Fvar` is small.
///
/// A non-positive rate mean yields non-finite values; these are
/// returned as is.
///
/// There is no closed form; with `exact = true` evaluation fails with
/// `UnimplementedCapability`.
#[derive(Debug, Clone, Default)]
pub struct PoissonLikelihood {
    invlink: InvLink,
    config: StochasticConfig,
}

impl PoissonLikelihood {
    pub fn new(invlink: InvLink, config: StochasticConfig) -> Self {
        Self { invlink, config }
    }

    pub fn invlink(&self) -> InvLink {
        self.invlink
    }
}

impl StochasticLikelihood for PoissonLikelihood {
    fn name(&self) -> &'static str {
        "poisson"
    }

    fn config(&self) -> &StochasticConfig {
        &self.config
    }

    /// Samples already live in rate space
    fn transform(&self, ff: &Array3<f64>) -> Result<Array3<f64>> {
        Ok(Transform::Identity.apply(ff))
    }

    fn logp(&self, ff: &Array2<f64>, yy: &Array2<f64>) -> Result<Array2<f64>> {
        check_dims("Y", yy.dim(), ff.dim())?;
        let invlink = self.invlink;
        Ok(Zip::from(ff)
            .and(yy)
            .map_collect(|&f, &y| densities::poisson(invlink.apply(f), y)))
    }

    fn variational_expectations(
        &self,
        gmu: &Array2<f64>,
        gvar: &Array2<f64>,
        yy: &Array2<f64>,
    ) -> Result<Array2<f64>> {
        check_dims("Y", yy.dim(), gmu.dim())?;
        check_dims("Gvar", gvar.dim(), gmu.dim())?;
        Ok(Zip::from(gmu)
            .and(gvar)
            .and(yy)
            .map_collect(|&mu, &v, &y| {
                let log_rate = if y == 0.0 {
                    0.0
                } else {
                    y * (mu.ln() - 0.5 * v / (mu * mu))
                };
                log_rate - mu - densities::ln_factorial(y)
            }))
    }

    fn stochastic_mean(&self, fmu: &Array2<f64>) -> Array2<f64> {
        let invlink = self.invlink;
        fmu.mapv(|f| invlink.apply(f))
    }

    fn observation_dims(&self, latent_dims: (usize, usize)) -> Option<(usize, usize)> {
        Some(latent_dims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LikelihoodError;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_invlink() {
        assert_abs_diff_eq!(InvLink::Exp.apply(1.0), 1_f64.exp(), epsilon = 1e-12);
        assert_abs_diff_eq!(InvLink::Softplus.apply(0.0), 2_f64.ln(), epsilon = 1e-12);
        assert_abs_diff_eq!(InvLink::Softplus.apply(800.0), 800.0, epsilon = 1e-9);
        assert!(InvLink::Softplus.apply(-800.0) >= 0.0);
    }

    #[test]
    fn test_poisson_logp() -> Result<()> {
        let lik = PoissonLikelihood::default();
        let ff = array![[0.0, 1.0]];
        let yy = array![[1.0, 2.0]];
        let lp = lik.logp(&ff, &yy)?;
        // rate 1, y = 1: log(1 * e^-1 / 1!) = -1
        assert_abs_diff_eq!(lp[[0, 0]], -1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(
            lp[[0, 1]],
            2.0 - 1_f64.exp() - 2_f64.ln(),
            epsilon = 1e-10
        );
        Ok(())
    }

    #[test]
    fn test_exact_is_unsupported() {
        let lik = PoissonLikelihood::new(InvLink::Exp, StochasticConfig::exact());
        let fmu = array![[0.0]];
        let chol = Array3::<f64>::ones((1, 1, 1));
        let yy = array![[1.0]];
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            lik.stochastic_expectations(&fmu, &chol, &yy, &mut rng),
            Err(LikelihoodError::UnimplementedCapability {
                likelihood: "poisson",
                capability: "exact_expectations",
            })
        );
    }

    #[test]
    fn test_stochastic_mean_is_rate() {
        let lik = PoissonLikelihood::default();
        let fmu = array![[0.0, 2.0]];
        let rate = lik.stochastic_mean(&fmu);
        assert_abs_diff_eq!(rate, array![[1.0, 2_f64.exp()]], epsilon = 1e-12);
    }

    #[test]
    fn test_zero_variance_plug_in_is_logp() -> Result<()> {
        let lik = PoissonLikelihood::default();
        let fmu = array![[0.3, -0.2], [1.1, 0.0]];
        let yy = array![[0.0, 1.0], [3.0, 2.0]];
        let gmu = lik.stochastic_mean(&fmu);
        let gvar = Array2::<f64>::zeros(gmu.raw_dim());
        let ee = lik.variational_expectations(&gmu, &gvar, &yy)?;
        assert_abs_diff_eq!(ee, lik.logp(&fmu, &yy)?, epsilon = 1e-10);
        Ok(())
    }
}
