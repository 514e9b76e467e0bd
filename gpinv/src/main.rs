use anyhow::Result;
use clap::Parser;
use gpinv::cli::{expect, simulate, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    match &cli.command {
        Commands::Expect(args) => {
            expect::run(args)?;
        }
        Commands::Simulate(args) => {
            simulate::run(args)?;
        }
    }

    Ok(())
}
