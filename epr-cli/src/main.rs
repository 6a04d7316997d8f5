//! EPR CLI - command line tool for the plant's monthly environmental reports.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "epr-cli",
    version,
    about = "Plant environmental report toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: epr_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    epr_cmd::run(cli.command).await
}
