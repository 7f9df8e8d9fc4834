// devbuilder CLI entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod confirm;
mod output;

#[derive(Parser)]
#[command(name = "devbuilder", about = "Form-driven devfile editing over a devstate server")]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    commands::run(cli.command)
}
