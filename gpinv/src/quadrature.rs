//! Gauss-Hermite quadrature for expectations under a univariate
//! Gaussian.
//!
//! ```text
//! E[h(g)], g ~ N(mu, var)  ≈  Σ_i w_i h(mu + sqrt(2 var) x_i)
//! ```
//!
//! Nodes `x_i` are the eigenvalues of the Jacobi matrix of the
//! physicists' Hermite polynomials (Golub-Welsch); the weights are
//! normalized to sum to one.

use crate::error::{LikelihoodError, Result};
use nalgebra::DMatrix;
use ndarray::prelude::*;
use ndarray::Zip;

/// Number of quadrature points used by the default variational
/// expectation
pub const DEFAULT_NUM_GAUSS_HERMITE_POINTS: usize = 20;

#[derive(Debug, Clone)]
pub struct GaussHermite {
    nodes: Vec<f64>,
    weights: Vec<f64>,
}

impl GaussHermite {
    /// Build a rule with `num_points` nodes, exact for polynomials up
    /// to degree `2 * num_points - 1`.
    pub fn new(num_points: usize) -> Result<Self> {
        if num_points < 1 {
            return Err(LikelihoodError::InvalidParameter(
                "need at least one Gauss-Hermite point".into(),
            ));
        }

        // J[i, i + 1] = J[i + 1, i] = sqrt((i + 1) / 2)
        let jacobi = DMatrix::<f64>::from_fn(num_points, num_points, |i, j| {
            if i + 1 == j {
                ((j as f64) / 2.0).sqrt()
            } else if j + 1 == i {
                ((i as f64) / 2.0).sqrt()
            } else {
                0.0
            }
        });

        let eig = jacobi.symmetric_eigen();

        let mut rule: Vec<(f64, f64)> = (0..num_points)
            .map(|k| {
                let v0 = eig.eigenvectors[(0, k)];
                (eig.eigenvalues[k], v0 * v0)
            })
            .collect();
        rule.sort_by(|a, b| a.0.total_cmp(&b.0));

        let total: f64 = rule.iter().map(|(_, w)| w).sum();
        let (nodes, weights) = rule.into_iter().map(|(x, w)| (x, w / total)).unzip();

        Ok(Self { nodes, weights })
    }

    pub fn num_points(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Elementwise `E[h(g)]` for `g ~ N(mu, var)`, where `h` maps a
    /// whole array of evaluation points to an array of the same shape.
    ///
    /// # Arguments
    /// * `mu` - Means, shape `[N, M]`
    /// * `var` - Variances, shape `[N, M]`
    /// * `h` - Elementwise function evaluated at each node
    pub fn expectation<F>(
        &self,
        mu: &Array2<f64>,
        var: &Array2<f64>,
        mut h: F,
    ) -> Result<Array2<f64>>
    where
        F: FnMut(&Array2<f64>) -> Result<Array2<f64>>,
    {
        if mu.dim() != var.dim() {
            return Err(LikelihoodError::ShapeMismatch(format!(
                "mean {:?} and variance {:?} differ",
                mu.dim(),
                var.dim()
            )));
        }

        let scale = var.mapv(|v| (2.0 * v).sqrt());
        let mut ret = Array2::<f64>::zeros(mu.raw_dim());

        for (&x, &w) in self.nodes.iter().zip(self.weights.iter()) {
            let gg = Zip::from(mu).and(&scale).map_collect(|&m, &s| m + s * x);
            let hh = h(&gg)?;
            if hh.dim() != ret.dim() {
                return Err(LikelihoodError::ShapeMismatch(format!(
                    "integrand returned {:?}, expected {:?}",
                    hh.dim(),
                    ret.dim()
                )));
            }
            ret.scaled_add(w, &hh);
        }

        Ok(ret)
    }
}
