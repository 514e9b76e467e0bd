use approx::assert_abs_diff_eq;
use gpinv::cli::{expect, simulate, ExpectArgs, InvLinkArg, LikelihoodType, SimulateArgs};
use gpinv::{GaussianLikelihood, LikelihoodError, StochasticConfig, StochasticLikelihood};
use matrix_util::traits::IoOps;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn sim_args(out: &str, counts: bool) -> SimulateArgs {
    SimulateArgs {
        rows: 8,
        outputs: 2,
        lengthscale: 0.3,
        posterior_scale: 0.1,
        noise: 0.01,
        counts,
        seed: 7,
        out: out.into(),
    }
}

fn expect_args(prefix: &str, out: &str, likelihood: LikelihoodType, exact: bool) -> ExpectArgs {
    ExpectArgs {
        mean: format!("{}.mean.tsv", prefix).into(),
        chol: format!("{}.chol.tsv", prefix).into(),
        obs: format!("{}.obs.tsv", prefix).into(),
        likelihood,
        variance: 0.01,
        invlink: InvLinkArg::Exp,
        num_samples: 50,
        exact,
        seed: Some(1),
        out: out.into(),
    }
}

#[test]
fn simulated_posterior_is_consistent() -> anyhow::Result<()> {
    let sim = simulate::generate_latent_posterior(&sim_args("unused", false))?;
    assert_eq!(sim.fmu.dim(), (8, 2));
    assert_eq!(sim.chol.dim(), (8, 8, 2));
    assert_eq!(sim.yy.dim(), (8, 2));

    // lower triangular with a positive diagonal
    for m in 0..2 {
        for i in 0..8 {
            assert!(sim.chol[[i, i, m]] > 0.0);
            for j in (i + 1)..8 {
                assert_eq!(sim.chol[[i, j, m]], 0.0);
            }
        }
    }

    let counts = simulate::generate_latent_posterior(&sim_args("unused", true))?;
    assert!(counts.yy.iter().all(|&y| y >= 0.0 && y.fract() == 0.0));
    Ok(())
}

#[test]
fn expect_from_files_matches_library() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let prefix = dir.path().join("toy");
    let prefix = prefix.to_str().ok_or(anyhow::anyhow!("bad path"))?;

    let sargs = sim_args(prefix, false);
    simulate::run(&sargs)?;
    let sim = simulate::generate_latent_posterior(&sargs)?;

    let out = format!("{}.expect.tsv.gz", prefix);
    expect::run(&expect_args(prefix, &out, LikelihoodType::Gaussian, true))?;
    let ee = Array2::<f64>::from_tsv(&out, None)?;

    let lik = GaussianLikelihood::new(0.01, StochasticConfig::exact())?;
    let mut rng = StdRng::seed_from_u64(0);
    let expected = lik.stochastic_expectations(&sim.fmu, &sim.chol, &sim.yy, &mut rng)?;

    assert_eq!(ee.dim(), (8, 2));
    assert_abs_diff_eq!(ee, expected, epsilon = 1e-9);
    Ok(())
}

#[test]
fn expect_poisson_counts() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let prefix = dir.path().join("counts");
    let prefix = prefix.to_str().ok_or(anyhow::anyhow!("bad path"))?;

    simulate::run(&sim_args(prefix, true))?;

    let out = format!("{}.expect.tsv", prefix);
    expect::run(&expect_args(prefix, &out, LikelihoodType::Poisson, false))?;
    let ee = Array2::<f64>::from_tsv(&out, None)?;
    assert_eq!(ee.dim(), (8, 2));
    assert!(ee.iter().all(|e| e.is_finite() && *e <= 0.0));

    // no closed form for Poisson
    let res = expect::run(&expect_args(prefix, &out, LikelihoodType::Poisson, true));
    assert!(res.is_err());
    Ok(())
}

#[test]
fn expect_rejects_mismatched_factor_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let two = dir.path().join("two");
    let two = two.to_str().ok_or(anyhow::anyhow!("bad path"))?;
    let three = dir.path().join("three");
    let three = three.to_str().ok_or(anyhow::anyhow!("bad path"))?;

    simulate::run(&sim_args(two, false))?;
    let mut sargs = sim_args(three, false);
    sargs.outputs = 3;
    simulate::run(&sargs)?;

    // Fmu with 2 outputs, L with 3 blocks
    let mut args = expect_args(two, "stdout", LikelihoodType::Gaussian, true);
    args.chol = format!("{}.chol.tsv", three).into();

    let err = expect::load_inputs(&args).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LikelihoodError>(),
        Some(LikelihoodError::ShapeMismatch(_))
    ));

    // a factor file that is not a stack of square blocks
    let ragged = format!("{}.ragged.tsv", two);
    Array2::<f64>::zeros((5, 3)).to_tsv(&ragged)?;
    args.chol = ragged.into();
    let err = expect::load_inputs(&args).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LikelihoodError>(),
        Some(LikelihoodError::ShapeMismatch(_))
    ));
    Ok(())
}
