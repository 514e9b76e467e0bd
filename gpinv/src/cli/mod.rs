pub mod expect;
pub mod simulate;

use clap::{Parser, Subcommand};

pub use expect::{ExpectArgs, InvLinkArg, LikelihoodType};
pub use simulate::SimulateArgs;

#[derive(Parser, Debug)]
#[command(name = "gpinv")]
#[command(version, about = "Stochastic variational expectations for correlated GP posteriors", term_width = 80)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// verbosity
    #[arg(
        long,
        short,
        global = true,
        help = "verbosity",
        long_help = "Enable verbose output `RUST_LOG=info`"
    )]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate `E_q[log p(Y|f)]` for a latent posterior stored in files
    Expect(ExpectArgs),
    /// Simulate a toy latent posterior and observations
    Simulate(SimulateArgs),
}
