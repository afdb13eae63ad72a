use clap::Parser;
use scripts::{
    cli::Cli,
    commands::exit_code,
    config::ScriptConfig,
    errors::ScriptError,
    utils::{init_logging, load_dotenv},
};
use tracing::error;

/// Load the configuration and run the requested command
async fn run(cli: Cli) -> Result<(), ScriptError> {
    let config = ScriptConfig::from_env(cli.config)?;
    cli.command.run(config).await
}

#[tokio::main]
async fn main() {
    // Load `.env` first so that it can set `RUST_LOG` and the flag fallbacks
    let dotenv = load_dotenv();
    init_logging();

    let result = match dotenv {
        Ok(()) => run(Cli::parse()).await,
        Err(e) => Err(e),
    };

    if let Err(e) = &result {
        error!("{e}");
    }
    std::process::exit(exit_code(&result));
}
