use clap::Parser;
use dotenv::dotenv;
use scripts::{cli::Cli, errors::ScriptError};

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    // Load .env file
    dotenv().ok();

    let cli = Cli::parse();
    let overrides = cli.overrides();

    tracing_subscriber::fmt().pretty().init();

    cli.command.run(cli.network, &overrides).await
}
