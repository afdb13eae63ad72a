//! Utilities for the proxy scripts.

use alloy::{
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{config::NetworkConfig, errors::ScriptError};

/// The log filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "info";

/// Load variables from a `.env` file in the working directory, if there is one
pub fn load_dotenv() -> Result<(), ScriptError> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ScriptError::Configuration(format!("invalid .env file: {e}"))),
    }
}

/// Install the global log subscriber, writing to stderr so that stdout only
/// carries the operator-facing report
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Sets up the client with which to send transactions, checking that the node
/// serves the configured chain. Without a signer the client can only read.
pub async fn setup_client(
    network: &NetworkConfig,
    signer: Option<PrivateKeySigner>,
) -> Result<DynProvider, ScriptError> {
    let provider = match signer {
        Some(signer) => ProviderBuilder::new()
            .wallet(signer)
            .connect_http(network.rpc_url.clone())
            .erased(),
        None => ProviderBuilder::new()
            .connect_http(network.rpc_url.clone())
            .erased(),
    };

    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    if let Some(expected) = network.chain_id {
        if chain_id != expected {
            return Err(ScriptError::ClientInitialization(format!(
                "{} expects chain ID {}, but the node at {} reports {}",
                network.name, expected, network.rpc_url, chain_id
            )));
        }
    }
    info!("Connected to {} (chain ID {})", network.name, chain_id);

    Ok(provider)
}
