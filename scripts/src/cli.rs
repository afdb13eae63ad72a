//! Definitions of CLI arguments and commands for the proxy scripts

use std::io::{self, Write};

use alloy::primitives::{Address, Bytes};
use clap::{Args, Parser, Subcommand};

use crate::{
    artifacts::{ArtifactStore, ContractFactory},
    backend::ContractResolver,
    chain::ChainUpgrades,
    commands::{deploy_proxy, list_accounts, report_implementation, upgrade_proxy},
    config::{ConfigArgs, ScriptConfig},
    constants::{BOX_CONTRACT_NAME, DEFAULT_BOX_NAME, DEFAULT_BOX_SYMBOL, DEFAULT_INITIALIZER},
    deployments::write_deployment,
    errors::ScriptError,
    presets::{box_deployment, gacha_deployment, resolve_owner, resolve_proxy},
    types::DeploymentParams,
    utils::setup_client,
};

/// Deploy and upgrade UUPS proxies from compiled Hardhat artifacts
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Network, key and path configuration
    #[command(flatten)]
    pub config: ConfigArgs,

    /// The procedure to run
    #[command(subcommand)]
    pub command: Command,
}

/// The procedures the scripts can run
#[derive(Subcommand)]
pub enum Command {
    /// Print the deployer account and its balance
    Accounts,
    /// Deploy any contract behind a new UUPS proxy
    DeployProxy(DeployProxyArgs),
    /// Deploy `BoxContract` behind a new UUPS proxy
    DeployBox(DeployBoxArgs),
    /// Deploy `GachaContract` behind a new UUPS proxy
    DeployGacha(DeployGachaArgs),
    /// Upgrade an existing UUPS proxy to a new implementation
    UpgradeProxy(UpgradeProxyArgs),
    /// Print the implementation an ERC-1967 proxy delegates to
    Implementation(ImplementationArgs),
}

/// Deploy a contract behind a UUPS proxy, calling its initializer through the proxy
#[derive(Args)]
pub struct DeployProxyArgs {
    /// Name of the implementation contract, bare or `path/File.sol:Name`
    #[arg(short, long)]
    pub contract: String,

    /// Initializer function called through the proxy, by name or full signature
    #[arg(short, long, default_value = DEFAULT_INITIALIZER)]
    pub initializer: String,

    /// Initializer arguments, in order
    pub args: Vec<String>,
}

/// Deploy the Box collection
#[derive(Args)]
pub struct DeployBoxArgs {
    /// Collection name
    #[arg(long, default_value = DEFAULT_BOX_NAME)]
    pub name: String,

    /// Collection symbol
    #[arg(long, default_value = DEFAULT_BOX_SYMBOL)]
    pub symbol: String,
}

/// Deploy the Gacha contract
#[derive(Args)]
pub struct DeployGachaArgs {
    /// Address of the Box proxy.
    /// Defaults to the `BoxContract` entry of the deployments file
    #[arg(short, long)]
    pub box_contract: Option<Address>,
}

/// Upgrade a proxy's implementation
#[derive(Args)]
pub struct UpgradeProxyArgs {
    /// Address of the proxy.
    /// Defaults to the deployments file entry of the current contract
    #[arg(short, long)]
    pub proxy: Option<Address>,

    /// Name of the new implementation contract
    #[arg(short, long)]
    pub contract: String,

    /// Name of the contract the proxy currently runs. Defaults to `--contract`
    #[arg(short, long)]
    pub from: Option<String>,

    /// Hex calldata executed on the new implementation through `upgradeToAndCall`
    #[arg(long)]
    pub calldata: Option<Bytes>,
}

/// Read a proxy's implementation
#[derive(Args)]
pub struct ImplementationArgs {
    /// Address of the proxy
    #[arg(short, long)]
    pub proxy: Address,
}

impl Command {
    /// Run the command against the configured network
    pub async fn run(self, config: ScriptConfig) -> Result<(), ScriptError> {
        let resolver = ArtifactStore::new(config.artifacts_path.clone());
        let mut out = io::stdout();

        match self {
            Command::Accounts => {
                let upgrader = connect(&config).await?;
                list_accounts(&upgrader, &mut out).await
            }
            Command::Implementation(args) => {
                let upgrader = connect_read_only(&config).await?;
                report_implementation(&upgrader, args.proxy, &mut out)
                    .await
                    .map(|_| ())
            }
            Command::DeployProxy(args) => {
                let params = DeploymentParams {
                    contract: args.contract,
                    initializer: args.initializer,
                    args: args.args,
                };
                deploy_and_record(&resolver, &config, &params, &mut out).await
            }
            Command::DeployBox(args) => {
                let owner = resolve_owner(config.owner)?;
                let params = box_deployment(&args.name, &args.symbol, owner);
                deploy_and_record(&resolver, &config, &params, &mut out).await
            }
            Command::DeployGacha(args) => {
                let box_contract =
                    resolve_proxy(args.box_contract, &config.deployments_path, BOX_CONTRACT_NAME)?;
                let owner = resolve_owner(config.owner)?;
                let params = gacha_deployment(box_contract, owner);
                deploy_and_record(&resolver, &config, &params, &mut out).await
            }
            Command::UpgradeProxy(args) => {
                let current = args.from.unwrap_or_else(|| args.contract.clone());
                let proxy = resolve_proxy(args.proxy, &config.deployments_path, &current)?;

                let upgrader = connect(&config).await?;
                let addresses = upgrade_proxy(
                    &resolver,
                    &upgrader,
                    proxy,
                    &current,
                    &args.contract,
                    args.calldata,
                    &mut out,
                )
                .await?;
                write_deployment(&config.deployments_path, &args.contract, addresses)
            }
        }
    }
}

/// Connect to the configured network as the deployer
async fn connect(config: &ScriptConfig) -> Result<ChainUpgrades, ScriptError> {
    let signer = config.signer()?.clone();
    let deployer = signer.address();
    let provider = setup_client(&config.network, Some(signer)).await?;
    Ok(ChainUpgrades::new(provider, Some(deployer), config.network.gas_limit))
}

/// Connect to the configured network without a key, for commands that only read
async fn connect_read_only(config: &ScriptConfig) -> Result<ChainUpgrades, ScriptError> {
    let provider = setup_client(&config.network, None).await?;
    Ok(ChainUpgrades::new(provider, None, config.network.gas_limit))
}

/// Deploy `params` behind a new proxy and record the result in the deployments file
async fn deploy_and_record(
    resolver: &ArtifactStore,
    config: &ScriptConfig,
    params: &DeploymentParams,
    out: &mut impl Write,
) -> Result<(), ScriptError> {
    let proxy_factory = match &config.proxy_contract {
        Some(name) => resolver.contract_factory(name)?,
        None => ContractFactory::embedded_proxy()?,
    };
    let upgrader = connect(config).await?.with_proxy_factory(proxy_factory);

    let addresses = deploy_proxy(resolver, &upgrader, params, out).await?;
    write_deployment(&config.deployments_path, &params.contract, addresses)
}
