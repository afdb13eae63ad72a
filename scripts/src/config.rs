//! Run configuration, resolved once at startup from CLI flags and the environment

use std::{
    fmt::{self, Display},
    path::PathBuf,
    str::FromStr,
};

use alloy::{
    primitives::Address, signers::local::PrivateKeySigner, transports::http::reqwest::Url,
};
use clap::{Args, ValueEnum};

use crate::{
    constants::{
        ARTIFACTS_PATH_ENV_VAR, BSC_GAS_LIMIT, BSC_MAINNET_CHAIN_ID, BSC_PROVIDER_ENV_VAR,
        BSC_TESTNET_CHAIN_ID, BSC_TESTNET_PROVIDER_ENV_VAR, DEFAULT_ARTIFACTS_PATH,
        DEFAULT_DEPLOYMENTS_PATH, DEPLOYMENTS_PATH_ENV_VAR, LOCALHOST_PRIVATE_KEY,
        LOCALHOST_RPC_URL, OWNER_ADDRESS_ENV_VAR, PRIVATE_KEY_ENV_VAR, RPC_URL_ENV_VAR,
    },
    errors::ScriptError,
};

/// The networks the scripts can target
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum NetworkName {
    /// A local development node
    Localhost,
    /// BNB Smart Chain testnet
    BscTestnet,
    /// BNB Smart Chain mainnet
    BscMainnet,
}

impl Display for NetworkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkName::Localhost => write!(f, "localhost"),
            NetworkName::BscTestnet => write!(f, "bsc-testnet"),
            NetworkName::BscMainnet => write!(f, "bsc-mainnet"),
        }
    }
}

impl NetworkName {
    /// The environment variable holding the network's RPC URL
    fn rpc_env_var(self) -> Option<&'static str> {
        match self {
            NetworkName::Localhost => None,
            NetworkName::BscTestnet => Some(BSC_TESTNET_PROVIDER_ENV_VAR),
            NetworkName::BscMainnet => Some(BSC_PROVIDER_ENV_VAR),
        }
    }

    /// The chain ID the connected node must report, if enforced
    fn chain_id(self) -> Option<u64> {
        match self {
            NetworkName::Localhost => None,
            NetworkName::BscTestnet => Some(BSC_TESTNET_CHAIN_ID),
            NetworkName::BscMainnet => Some(BSC_MAINNET_CHAIN_ID),
        }
    }

    /// The fixed gas limit of every transaction, if any
    fn gas_limit(self) -> Option<u64> {
        match self {
            NetworkName::Localhost => None,
            NetworkName::BscTestnet | NetworkName::BscMainnet => Some(BSC_GAS_LIMIT),
        }
    }
}

/// Configuration flags shared by every command
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// The network to run against
    #[arg(short, long, default_value = "localhost")]
    pub network: NetworkName,

    /// RPC URL, overriding the network's default endpoint
    #[arg(short, long, env = RPC_URL_ENV_VAR)]
    pub rpc_url: Option<String>,

    /// Private key of the deployer, in hex.
    /// Defaults to the first development account on `localhost`.
    /// Only commands sending transactions need it
    #[arg(short, long, env = PRIVATE_KEY_ENV_VAR, hide_env_values = true)]
    pub private_key: Option<String>,

    /// Owner address passed to the preset initializers
    #[arg(short, long, env = OWNER_ADDRESS_ENV_VAR)]
    pub owner: Option<String>,

    /// Path to the Hardhat artifacts directory
    #[arg(long, env = ARTIFACTS_PATH_ENV_VAR, default_value = DEFAULT_ARTIFACTS_PATH)]
    pub artifacts_path: PathBuf,

    /// Path to the file recording deployed proxies
    #[arg(long, env = DEPLOYMENTS_PATH_ENV_VAR, default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments_path: PathBuf,

    /// Name of a proxy contract artifact to place in front of implementations
    /// instead of the bundled `ERC1967Proxy`
    #[arg(long)]
    pub proxy_contract: Option<String>,
}

/// The connection details of the targeted network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// The network's name
    pub name: NetworkName,
    /// The RPC endpoint
    pub rpc_url: Url,
    /// The chain ID the node must report, if enforced
    pub chain_id: Option<u64>,
    /// The fixed gas limit of every transaction, estimated when unset
    pub gas_limit: Option<u64>,
}

/// Everything a run needs to know, resolved once at process entry
#[derive(Debug, Clone)]
pub struct ScriptConfig {
    /// The targeted network
    pub network: NetworkConfig,
    /// The deployer's signing key, unset for read-only runs
    pub signer: Option<PrivateKeySigner>,
    /// The owner address used by the presets, if configured
    pub owner: Option<Address>,
    /// The Hardhat artifacts directory
    pub artifacts_path: PathBuf,
    /// The deployments file
    pub deployments_path: PathBuf,
    /// The proxy contract artifact name, the bundled proxy when unset
    pub proxy_contract: Option<String>,
}

impl ScriptConfig {
    /// Resolve the configuration, reading network endpoints from the process environment
    pub fn from_env(args: ConfigArgs) -> Result<Self, ScriptError> {
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    /// Resolve the configuration, reading network endpoints through `env`
    pub fn resolve(
        args: ConfigArgs,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ScriptError> {
        let name = args.network;

        let rpc_url = match (args.rpc_url, name.rpc_env_var()) {
            (Some(url), _) => url,
            (None, None) => LOCALHOST_RPC_URL.to_string(),
            (None, Some(var)) => env(var).filter(|url| !url.is_empty()).ok_or_else(|| {
                ScriptError::Configuration(format!("{var} must be set to use {name}"))
            })?,
        };
        let rpc_url = Url::parse(&rpc_url)
            .map_err(|e| ScriptError::Configuration(format!("invalid RPC URL {rpc_url}: {e}")))?;

        let private_key = match (args.private_key, name) {
            (Some(key), _) => Some(key),
            (None, NetworkName::Localhost) => Some(LOCALHOST_PRIVATE_KEY.to_string()),
            (None, _) => None,
        };
        let signer = private_key
            .map(|key| {
                PrivateKeySigner::from_str(&key)
                    .map_err(|e| ScriptError::Configuration(format!("invalid private key: {e}")))
            })
            .transpose()?;

        let owner = args
            .owner
            .map(|owner| {
                Address::from_str(&owner).map_err(|e| {
                    ScriptError::Configuration(format!("invalid owner address {owner}: {e}"))
                })
            })
            .transpose()?;

        Ok(Self {
            network: NetworkConfig {
                name,
                rpc_url,
                chain_id: name.chain_id(),
                gas_limit: name.gas_limit(),
            },
            signer,
            owner,
            artifacts_path: args.artifacts_path,
            deployments_path: args.deployments_path,
            proxy_contract: args.proxy_contract,
        })
    }

    /// The deployer's signing key, required by every command sending transactions
    pub fn signer(&self) -> Result<&PrivateKeySigner, ScriptError> {
        self.signer.as_ref().ok_or_else(|| {
            ScriptError::Configuration(format!(
                "{PRIVATE_KEY_ENV_VAR} must be set to send transactions on {}",
                self.network.name
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use alloy::primitives::address;

    use super::*;

    fn args(network: NetworkName) -> ConfigArgs {
        ConfigArgs {
            network,
            rpc_url: None,
            private_key: None,
            owner: None,
            artifacts_path: PathBuf::from(DEFAULT_ARTIFACTS_PATH),
            deployments_path: PathBuf::from(DEFAULT_DEPLOYMENTS_PATH),
            proxy_contract: None,
        }
    }

    fn env_of(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_localhost_defaults() {
        let config = ScriptConfig::resolve(args(NetworkName::Localhost), env_of(&[])).unwrap();

        assert_eq!(config.network.rpc_url.as_str(), "http://127.0.0.1:8545/");
        assert_eq!(config.network.chain_id, None);
        assert_eq!(config.network.gas_limit, None);
        assert_eq!(
            config.signer().unwrap().address(),
            address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266")
        );
        assert_eq!(config.owner, None);
    }

    #[test]
    fn test_bsc_testnet_from_env() {
        let mut args = args(NetworkName::BscTestnet);
        args.private_key = Some(LOCALHOST_PRIVATE_KEY.to_string());
        args.owner = Some("0x7eb87f93c513a59be74fb804954019b9be48b98b".to_string());

        let env = env_of(&[(BSC_TESTNET_PROVIDER_ENV_VAR, "https://bsc-testnet.example/rpc")]);
        let config = ScriptConfig::resolve(args, env).unwrap();

        assert_eq!(config.network.name, NetworkName::BscTestnet);
        assert_eq!(config.network.rpc_url.host_str(), Some("bsc-testnet.example"));
        assert_eq!(config.network.chain_id, Some(97));
        assert_eq!(config.network.gas_limit, Some(8_000_000));
        assert_eq!(
            config.owner,
            Some(address!("7eb87f93c513a59be74fb804954019b9be48b98b"))
        );
    }

    #[test]
    fn test_rpc_override_wins() {
        let mut args = args(NetworkName::BscMainnet);
        args.private_key = Some(LOCALHOST_PRIVATE_KEY.to_string());
        args.rpc_url = Some("http://10.0.0.1:8545".to_string());

        let config = ScriptConfig::resolve(args, env_of(&[])).unwrap();
        assert_eq!(config.network.rpc_url.as_str(), "http://10.0.0.1:8545/");
        assert_eq!(config.network.chain_id, Some(56));
    }

    #[test]
    fn test_read_only_without_private_key() {
        let env = env_of(&[(BSC_PROVIDER_ENV_VAR, "https://bsc.example")]);
        let config = ScriptConfig::resolve(args(NetworkName::BscMainnet), env).unwrap();

        assert!(config.signer.is_none());
        match config.signer() {
            Err(ScriptError::Configuration(msg)) => assert!(msg.contains(PRIVATE_KEY_ENV_VAR)),
            other => panic!("expected a configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_values_are_configuration_errors() {
        // No RPC endpoint
        let mut no_rpc = args(NetworkName::BscMainnet);
        no_rpc.private_key = Some(LOCALHOST_PRIVATE_KEY.to_string());
        assert!(matches!(
            ScriptConfig::resolve(no_rpc, env_of(&[])),
            Err(ScriptError::Configuration(_))
        ));

        // Malformed private key
        let mut bad_key = args(NetworkName::Localhost);
        bad_key.private_key = Some("0x1234".to_string());
        assert!(matches!(
            ScriptConfig::resolve(bad_key, env_of(&[])),
            Err(ScriptError::Configuration(_))
        ));

        // Overlong owner address
        let mut bad_owner = args(NetworkName::Localhost);
        bad_owner.owner = Some("0x7eb87f93c513a59be74fb804954019b9be48b98b00".to_string());
        assert!(matches!(
            ScriptConfig::resolve(bad_owner, env_of(&[])),
            Err(ScriptError::Configuration(_))
        ));
    }
}
