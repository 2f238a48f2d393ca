use clap::Parser;
use msync::config::Cli;
use msync::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Convert CLI args to Config - this validates immediately
    let config = Config::try_from(cli)?;

    msync::commands::sync::run(config)?;

    Ok(())
}
