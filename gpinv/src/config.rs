use crate::error::{LikelihoodError, Result};

/// Default number of Monte Carlo draws per call
pub const DEFAULT_NUM_SAMPLES: usize = 20;

/// How `stochastic_expectations` evaluates `E_q[log p(Y|f)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectationMethod {
    /// Closed form, no random draws
    Exact,
    /// Correlated sampling followed by moment matching
    Stochastic,
}

/// Configuration of the variational expectation estimator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StochasticConfig {
    /// Number of Monte Carlo samples S
    num_samples: usize,
    /// Use the closed form when the likelihood has one
    exact: bool,
}

impl Default for StochasticConfig {
    fn default() -> Self {
        Self {
            num_samples: DEFAULT_NUM_SAMPLES,
            exact: false,
        }
    }
}

impl StochasticConfig {
    /// Create a new configuration.
    ///
    /// # Arguments
    /// * `num_samples` - Monte Carlo draws per call, at least 1
    /// * `exact` - evaluate in closed form instead of sampling
    pub fn new(num_samples: usize, exact: bool) -> Result<Self> {
        if num_samples < 1 {
            return Err(LikelihoodError::InvalidParameter(format!(
                "num_samples must be at least 1, got {}",
                num_samples
            )));
        }
        Ok(Self { num_samples, exact })
    }

    /// Closed-form evaluation with the default sample count
    pub fn exact() -> Self {
        Self {
            num_samples: DEFAULT_NUM_SAMPLES,
            exact: true,
        }
    }

    /// Sampling-based evaluation with `num_samples` draws
    pub fn stochastic(num_samples: usize) -> Result<Self> {
        Self::new(num_samples, false)
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn method(&self) -> ExpectationMethod {
        if self.exact {
            ExpectationMethod::Exact
        } else {
            ExpectationMethod::Stochastic
        }
    }
}
