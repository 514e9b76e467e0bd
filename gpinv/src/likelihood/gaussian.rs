//! Gaussian likelihood for continuous data.

use ndarray::prelude::*;
use ndarray::Zip;

use super::{check_dims, StochasticLikelihood};
use crate::config::StochasticConfig;
use crate::densities;
use crate::error::{LikelihoodError, Result};
use crate::sampler::{check_latent_shapes, latent_marginal_variance};
use crate::transform::Transform;

/// i.i.d. Gaussian noise with a shared variance: y ~ N(f, σ²)
///
/// # Model
/// ```text
/// log p(y | f) = -0.5 * [log(2π) + log σ² + (y - f)² / σ²]
/// ```
///
/// The transform is the identity, so the expectation under
/// `f ~ N(μ, v)` has the closed form
/// ```text
/// E[log p(y | f)] = -0.5 * [log(2π) + log σ² + ((y - μ)² + v) / σ²]
/// ```
/// used both by the exact path (with `v = diag(L L^T)`) and by the
/// moment-matched stochastic path.
#[derive(Debug, Clone)]
pub struct GaussianLikelihood {
    variance: f64,
    config: StochasticConfig,
}

impl Default for GaussianLikelihood {
    /// Unit variance, closed-form evaluation
    fn default() -> Self {
        Self {
            variance: 1.0,
            config: StochasticConfig::exact(),
        }
    }
}

impl GaussianLikelihood {
    pub fn new(variance: f64, config: StochasticConfig) -> Result<Self> {
        check_variance(variance)?;
        Ok(Self { variance, config })
    }

    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Update the noise variance, e.g., after an optimizer step
    pub fn set_variance(&mut self, variance: f64) -> Result<()> {
        check_variance(variance)?;
        self.variance = variance;
        Ok(())
    }

    fn expected_log_density(
        &self,
        mu: &Array2<f64>,
        var: &Array2<f64>,
        yy: &Array2<f64>,
    ) -> Array2<f64> {
        let noise_var = self.variance;
        Zip::from(mu).and(var).and(yy).map_collect(|&mu, &v, &y| {
            densities::gaussian(y, mu, noise_var) - 0.5 * v / noise_var
        })
    }
}

fn check_variance(variance: f64) -> Result<()> {
    if !(variance.is_finite() && variance > 0.0) {
        return Err(LikelihoodError::InvalidParameter(format!(
            "Gaussian variance must be positive and finite, got {}",
            variance
        )));
    }
    Ok(())
}

impl StochasticLikelihood for GaussianLikelihood {
    fn name(&self) -> &'static str {
        "gaussian"
    }

    fn config(&self) -> &StochasticConfig {
        &self.config
    }

    fn transform(&self, ff: &Array3<f64>) -> Result<Array3<f64>> {
        Ok(Transform::Identity.apply(ff))
    }

    fn logp(&self, ff: &Array2<f64>, yy: &Array2<f64>) -> Result<Array2<f64>> {
        check_dims("Y", yy.dim(), ff.dim())?;
        let noise_var = self.variance;
        Ok(Zip::from(ff)
            .and(yy)
            .map_collect(|&f, &y| densities::gaussian(y, f, noise_var)))
    }

    fn variational_expectations(
        &self,
        gmu: &Array2<f64>,
        gvar: &Array2<f64>,
        yy: &Array2<f64>,
    ) -> Result<Array2<f64>> {
        check_dims("Y", yy.dim(), gmu.dim())?;
        check_dims("Gvar", gvar.dim(), gmu.dim())?;
        Ok(self.expected_log_density(gmu, gvar, yy))
    }

    fn exact_expectations(
        &self,
        fmu: &Array2<f64>,
        chol: &Array3<f64>,
        yy: &Array2<f64>,
    ) -> Result<Array2<f64>> {
        let latent_dims = check_latent_shapes(fmu, chol)?;
        check_dims("Y", yy.dim(), latent_dims)?;
        let fvar = latent_marginal_variance(chol);
        Ok(self.expected_log_density(fmu, &fvar, yy))
    }

    fn observation_dims(&self, latent_dims: (usize, usize)) -> Option<(usize, usize)> {
        Some(latent_dims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_single_point_exact() -> Result<()> {
        let lik = GaussianLikelihood::default();
        let fmu = array![[0.0]];
        let chol = Array3::<f64>::ones((1, 1, 1));
        let yy = array![[0.0]];

        let mut rng = StdRng::seed_from_u64(0);
        let ee = lik.stochastic_expectations(&fmu, &chol, &yy, &mut rng)?;

        let expected = -0.5 * (2.0 * std::f64::consts::PI).ln() - 0.5;
        assert_eq!(ee.dim(), (1, 1));
        assert_abs_diff_eq!(ee[[0, 0]], expected, epsilon = 1e-6);
        assert_abs_diff_eq!(ee[[0, 0]], -1.4189385, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn test_exact_uses_noise_variance() -> Result<()> {
        let lik = GaussianLikelihood::new(2.0, StochasticConfig::exact())?;
        // L = [[1, 0], [1, 1]] => Fvar = [1, 2]
        let mut chol = Array3::<f64>::zeros((2, 2, 1));
        chol[[0, 0, 0]] = 1.0;
        chol[[1, 0, 0]] = 1.0;
        chol[[1, 1, 0]] = 1.0;
        let fmu = array![[0.0], [1.0]];
        let yy = array![[1.0], [1.0]];

        let ee = lik.exact_expectations(&fmu, &chol, &yy)?;
        let c = -0.5 * densities::LN_2PI - 0.5 * 2_f64.ln();
        assert_abs_diff_eq!(ee[[0, 0]], c - 0.5 * (1.0 + 1.0) / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ee[[1, 0]], c - 0.5 * (0.0 + 2.0) / 2.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_logp_matches_density() -> Result<()> {
        let lik = GaussianLikelihood::new(0.5, StochasticConfig::default())?;
        let ff = array![[0.0, 1.0], [2.0, -1.0]];
        let yy = array![[0.5, 1.0], [0.0, 0.0]];
        let lp = lik.logp(&ff, &yy)?;
        assert_abs_diff_eq!(lp[[1, 0]], densities::gaussian(0.0, 2.0, 0.5), epsilon = 1e-12);
        assert!(lik.logp(&ff, &array![[0.0]]).is_err());
        Ok(())
    }

    #[test]
    fn test_invalid_variance() {
        for v in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                GaussianLikelihood::new(v, StochasticConfig::default()),
                Err(LikelihoodError::InvalidParameter(_))
            ));
        }
        let mut lik = GaussianLikelihood::default();
        assert!(lik.set_variance(-0.1).is_err());
        assert_eq!(lik.variance(), 1.0);
        assert!(lik.set_variance(0.3).is_ok());
        assert_eq!(lik.variance(), 0.3);
    }

    #[test]
    fn test_observation_shape_checked_before_sampling() -> Result<()> {
        let lik = GaussianLikelihood::new(1.0, StochasticConfig::stochastic(5)?)?;
        let fmu = Array2::<f64>::zeros((3, 2));
        let chol = Array3::<f64>::zeros((3, 3, 2));
        let yy = Array2::<f64>::zeros((2, 3));
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            lik.stochastic_expectations(&fmu, &chol, &yy, &mut rng),
            Err(LikelihoodError::ShapeMismatch(_))
        ));
        Ok(())
    }
}
