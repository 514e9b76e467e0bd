//! Stochastic variational expectations `E_q[log p(Y | f)]` under a
//! correlated Gaussian posterior `q(f) = N(Fmu, L L^T)` of the latent
//! functions, for sparse/stochastic variational GP objectives.
//!
//! # Example
//!
//! ```
//! use gpinv::{GaussianLikelihood, StochasticConfig, StochasticLikelihood};
//! use ndarray::{array, Array3};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let lik = GaussianLikelihood::new(1.0, StochasticConfig::stochastic(100).unwrap()).unwrap();
//! let fmu = array![[0.0], [1.0]];
//! let chol = Array3::<f64>::from_shape_fn((2, 2, 1), |(i, j, _)| if i == j { 0.1 } else { 0.0 });
//! let yy = array![[0.1], [0.9]];
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let ee = lik.stochastic_expectations(&fmu, &chol, &yy, &mut rng).unwrap();
//! assert_eq!(ee.dim(), (2, 1));
//! ```

pub mod cli;
pub mod config;
pub mod densities;
pub mod error;
pub mod likelihood;
pub mod moments;
pub mod quadrature;
pub mod sampler;
pub mod transform;

pub use config::{ExpectationMethod, StochasticConfig};
pub use error::{LikelihoodError, Result};
pub use likelihood::{GaussianLikelihood, InvLink, PoissonLikelihood, StochasticLikelihood};
pub use moments::estimate_mu_var;
pub use quadrature::GaussHermite;
pub use sampler::{check_latent_shapes, latent_marginal_variance, sample_correlated};
pub use transform::Transform;
