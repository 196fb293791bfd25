use clap::Parser;
use upsync::config::Cli;
use upsync::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Convert CLI args to Config - this validates immediately
    let config = Config::try_from(cli)?;

    upsync::commands::sync::run(config)?;

    Ok(())
}
