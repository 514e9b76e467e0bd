use anyhow::Result;
use clap::Args;
use log::info;
use matrix_util::common_io::mkdir;
use matrix_util::traits::{CholeskyBlockOps, IoOps};
use nalgebra::DMatrix;
use ndarray::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Poisson};

use crate::transform::Transform;

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// number of points `N`
    #[arg(short, long, default_value_t = 20)]
    pub rows: usize,

    /// number of latent outputs `M`
    #[arg(short = 'm', long, default_value_t = 1)]
    pub outputs: usize,

    /// RBF kernel lengthscale
    #[arg(long, default_value_t = 0.3)]
    pub lengthscale: f64,

    /// posterior covariance scale relative to the kernel
    #[arg(long, default_value_t = 0.1)]
    pub posterior_scale: f64,

    /// Gaussian observation noise variance
    #[arg(long, default_value_t = 0.01)]
    pub noise: f64,

    /// draw Poisson counts with rate `exp(Fmu)` instead of Gaussian data
    #[arg(long, default_value_t = false)]
    pub counts: bool,

    /// random seed
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// output header: writes `{out}.mean.tsv`, `{out}.chol.tsv`, `{out}.obs.tsv`
    #[arg(short, long, required = true)]
    pub out: Box<str>,
}

/// A toy latent posterior and matching observations
pub struct SimOut {
    pub fmu: Array2<f64>,
    pub chol: Array3<f64>,
    pub yy: Array2<f64>,
}

/// Lower Cholesky factor of `scale * K + jitter * I` for an RBF kernel
/// `K[i,j] = exp(-0.5 (x_i - x_j)^2 / l^2)` on the grid `xx`
pub fn rbf_cholesky(xx: &[f64], lengthscale: f64, scale: f64) -> Result<Array2<f64>> {
    let nn = xx.len();
    let jitter = 1e-6;
    let kk = DMatrix::<f64>::from_fn(nn, nn, |i, j| {
        let d = (xx[i] - xx[j]) / lengthscale;
        let k_ij = scale * (-0.5 * d * d).exp();
        if i == j {
            k_ij + jitter
        } else {
            k_ij
        }
    });

    let chol = kk
        .cholesky()
        .ok_or_else(|| anyhow::anyhow!("kernel matrix is not positive definite"))?;
    let ll = chol.l();

    Ok(Array2::from_shape_fn((nn, nn), |(i, j)| ll[(i, j)]))
}

/// Generate a latent posterior over `N` points on `[0, 1]` with `M`
/// phase-shifted `sin(3x)` means, and observations around that mean.
///
/// ```text
/// Fmu[n, m] = sin(3 x_n + m)
/// L[:, :, m] = chol(scale * K + jitter I)
/// Y[n, m] ~ N(Fmu[n, m], noise)  or  Poisson(exp(Fmu[n, m]))
/// ```
pub fn generate_latent_posterior(args: &SimulateArgs) -> Result<SimOut> {
    let nn = args.rows;
    let mm = args.outputs;

    if nn == 0 || mm == 0 {
        anyhow::bail!("need at least one point and one output");
    }
    if !(args.lengthscale > 0.0 && args.posterior_scale > 0.0 && args.noise > 0.0) {
        anyhow::bail!("lengthscale, posterior scale and noise must be positive");
    }

    let mut rng = StdRng::seed_from_u64(args.seed);

    let xx: Vec<f64> = if nn == 1 {
        vec![0.0]
    } else {
        (0..nn).map(|i| i as f64 / (nn - 1) as f64).collect()
    };

    let fmu = Array2::from_shape_fn((nn, mm), |(n, m)| (3.0 * xx[n] + m as f64).sin());

    let l_nn = rbf_cholesky(&xx, args.lengthscale, args.posterior_scale)?;
    let mut chol = Array3::<f64>::zeros((nn, nn, mm));
    for m in 0..mm {
        chol.index_axis_mut(Axis(2), m).assign(&l_nn);
    }

    let mut yy = Array2::<f64>::zeros((nn, mm));
    if args.counts {
        let rate = Transform::Exp.apply(&fmu);
        for ((n, m), y) in yy.indexed_iter_mut() {
            let rpois = Poisson::new(rate[[n, m]])?;
            *y = rpois.sample(&mut rng);
        }
    } else {
        let rnorm = Normal::new(0.0, args.noise.sqrt())?;
        for ((n, m), y) in yy.indexed_iter_mut() {
            *y = fmu[[n, m]] + rnorm.sample(&mut rng);
        }
    }

    Ok(SimOut { fmu, chol, yy })
}

pub fn run(args: &SimulateArgs) -> Result<()> {
    let sim = generate_latent_posterior(args)?;

    let mean_file = format!("{}.mean.tsv", args.out);
    let chol_file = format!("{}.chol.tsv", args.out);
    let obs_file = format!("{}.obs.tsv", args.out);
    mkdir(&mean_file)?;

    sim.fmu.to_tsv(&mean_file)?;
    sim.chol.to_stacked_blocks().to_tsv(&chol_file)?;
    sim.yy.to_tsv(&obs_file)?;

    info!(
        "simulated {} points x {} outputs ({})",
        args.rows,
        args.outputs,
        if args.counts { "counts" } else { "gaussian" }
    );
    info!("wrote {}, {}, {}", mean_file, chol_file, obs_file);

    Ok(())
}
