use anyhow::Result;
use clap::Parser;
use moneymap::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    moneymap::logging::init_tracing(cli.verbose);
    cli.run()
}
