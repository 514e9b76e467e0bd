use anyhow::Result;
use clap::{Args, ValueEnum};
use log::info;
use matrix_util::traits::{CholeskyBlockOps, IoOps};
use ndarray::{Array2, Array3};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::config::StochasticConfig;
use crate::error::LikelihoodError;
use crate::likelihood::{GaussianLikelihood, InvLink, PoissonLikelihood, StochasticLikelihood};
use crate::sampler::check_latent_shapes;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LikelihoodType {
    Gaussian,
    Poisson,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvLinkArg {
    Exp,
    Softplus,
}

impl From<InvLinkArg> for InvLink {
    fn from(arg: InvLinkArg) -> Self {
        match arg {
            InvLinkArg::Exp => InvLink::Exp,
            InvLinkArg::Softplus => InvLink::Softplus,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ExpectArgs {
    /// latent mean `Fmu` (`N x M`, tsv or tsv.gz)
    #[arg(long, required = true)]
    pub mean: Box<str>,

    /// Cholesky factors `L` stacked by output (`N*M x N`, tsv or tsv.gz)
    #[arg(long, required = true)]
    pub chol: Box<str>,

    /// observations `Y` (tsv or tsv.gz)
    #[arg(long, required = true)]
    pub obs: Box<str>,

    /// likelihood model
    #[arg(long, value_enum, default_value = "gaussian")]
    pub likelihood: LikelihoodType,

    /// Gaussian noise variance
    #[arg(long, default_value_t = 1.0)]
    pub variance: f64,

    /// Poisson inverse link
    #[arg(long, value_enum, default_value = "exp")]
    pub invlink: InvLinkArg,

    /// number of Monte Carlo samples
    #[arg(short = 's', long, default_value_t = 20)]
    pub num_samples: usize,

    /// closed-form evaluation, if the likelihood has one
    #[arg(long, default_value_t = false)]
    pub exact: bool,

    /// random seed (fresh entropy if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// output file (`stdout` to print)
    #[arg(short, long, default_value = "stdout")]
    pub out: Box<str>,
}

/// Build the likelihood selected on the command line
pub fn build_likelihood(args: &ExpectArgs) -> Result<Box<dyn StochasticLikelihood>> {
    let config = StochasticConfig::new(args.num_samples, args.exact)?;
    let lik: Box<dyn StochasticLikelihood> = match args.likelihood {
        LikelihoodType::Gaussian => Box::new(GaussianLikelihood::new(args.variance, config)?),
        LikelihoodType::Poisson => Box::new(PoissonLikelihood::new(args.invlink.into(), config)),
    };
    Ok(lik)
}

/// Read `Fmu`, `L`, `Y` from files.
///
/// The number of blocks in `L` comes from its own layout, so a factor
/// file that disagrees with `Fmu` fails with `ShapeMismatch`.
pub fn load_inputs(args: &ExpectArgs) -> Result<(Array2<f64>, Array3<f64>, Array2<f64>)> {
    let fmu = Array2::<f64>::from_tsv(&args.mean, None)?;
    info!("Fmu: {:?} from {}", fmu.dim(), args.mean);

    let stacked = Array2::<f64>::from_tsv(&args.chol, None)?;
    let (nrows, ncols) = stacked.dim();
    if ncols == 0 || nrows % ncols != 0 {
        return Err(LikelihoodError::ShapeMismatch(format!(
            "{}: [{}, {}] is not a stack of square blocks",
            args.chol, nrows, ncols
        ))
        .into());
    }
    let chol = Array3::<f64>::from_stacked_blocks(&stacked, nrows / ncols)?;
    check_latent_shapes(&fmu, &chol)?;
    info!("L: {:?} from {}", chol.dim(), args.chol);

    let yy = Array2::<f64>::from_tsv(&args.obs, None)?;
    info!("Y: {:?} from {}", yy.dim(), args.obs);

    Ok((fmu, chol, yy))
}

pub fn run(args: &ExpectArgs) -> Result<()> {
    let lik = build_likelihood(args)?;
    let (fmu, chol, yy) = load_inputs(args)?;

    let mut rng: Box<dyn RngCore> = match args.seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::rng()),
    };

    let ee = lik.stochastic_expectations(&fmu, &chol, &yy, rng.as_mut())?;

    info!(
        "{} likelihood ({:?}): total expectation {:.6}",
        lik.name(),
        lik.config().method(),
        ee.sum()
    );

    if args.out.as_ref() != "stdout" {
        matrix_util::common_io::mkdir(&args.out)?;
    }
    ee.to_tsv(&args.out)?;
    info!("wrote {:?} expectations to {}", ee.dim(), args.out);

    Ok(())
}
