//! The on-chain implementation of the proxy deploy and upgrade operations

use alloy::{
    dyn_abi::DynSolValue,
    network::TransactionBuilder,
    primitives::{Address, Bytes, TxHash},
    providers::{DynProvider, Provider},
    rpc::types::{TransactionReceipt, TransactionRequest},
    sol_types::SolCall,
};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::{
    artifacts::ContractFactory,
    backend::ProxyUpgrader,
    constants::{
        PRIVATE_KEY_ENV_VAR, RECEIPT_POLL_ATTEMPTS, RECEIPT_POLL_INTERVAL, UPGRADE_TO_FN_NAME,
    },
    erc1967::{implementation_from_slot, implementation_slot},
    errors::ScriptError,
    solidity::IUUPSUpgradeable,
    types::{ContractHandle, DeployerAccount, ProxyKind},
};

/// Deploys and upgrades UUPS proxies through an RPC provider holding the deployer's key
pub struct ChainUpgrades {
    /// The provider, with the deployer's wallet attached when there is one
    provider: DynProvider,
    /// The deployer's address, unset for read-only runs
    deployer: Option<Address>,
    /// The proxy contract placed in front of implementations, needed for deployments
    proxy_factory: Option<ContractFactory>,
    /// The gas limit of every transaction, estimated when unset
    gas_limit: Option<u64>,
}

impl ChainUpgrades {
    /// Create a backend able to upgrade and inspect proxies. Without a deployer
    /// only reads succeed.
    pub fn new(provider: DynProvider, deployer: Option<Address>, gas_limit: Option<u64>) -> Self {
        Self {
            provider,
            deployer,
            proxy_factory: None,
            gas_limit,
        }
    }

    /// Enable proxy deployments. `proxy_factory` must take `(address logic, bytes data)`
    /// as constructor arguments, as `ERC1967Proxy` does.
    pub fn with_proxy_factory(mut self, proxy_factory: ContractFactory) -> Self {
        self.proxy_factory = Some(proxy_factory);
        self
    }

    /// The address signing transactions
    fn sender(&self) -> Result<Address, ScriptError> {
        self.deployer.ok_or_else(|| {
            ScriptError::Configuration(format!(
                "{PRIVATE_KEY_ENV_VAR} must be set to send transactions"
            ))
        })
    }

    /// Send a transaction and wait until it is mined without reverting
    async fn transact(&self, mut tx: TransactionRequest) -> Result<TransactionReceipt, String> {
        if let Some(gas_limit) = self.gas_limit {
            tx.set_gas_limit(gas_limit);
        }

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| e.to_string())?;
        self.wait_for_receipt(*pending.tx_hash()).await
    }

    /// Poll for the receipt of `tx_hash`, failing if the transaction reverted
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TransactionReceipt, String> {
        for _ in 0..RECEIPT_POLL_ATTEMPTS {
            let receipt = self
                .provider
                .get_transaction_receipt(tx_hash)
                .await
                .map_err(|e| e.to_string())?;

            match receipt {
                Some(receipt) if receipt.status() => return Ok(receipt),
                Some(_) => return Err(format!("transaction {tx_hash} reverted")),
                None => tokio::time::sleep(RECEIPT_POLL_INTERVAL).await,
            }
        }

        Err(format!(
            "transaction {tx_hash} not mined after {RECEIPT_POLL_ATTEMPTS} receipt polls"
        ))
    }

    /// Send a contract creation transaction and return the created address
    async fn deploy_contract(&self, name: &str, code: Bytes) -> Result<Address, ScriptError> {
        let tx = TransactionRequest::default()
            .with_from(self.sender()?)
            .with_deploy_code(code);
        let receipt = self
            .transact(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(format!("{name}: {e}")))?;

        receipt.contract_address.ok_or_else(|| {
            ScriptError::ContractDeployment(format!(
                "{name}: no contract address in receipt of {}",
                receipt.transaction_hash
            ))
        })
    }

    /// Deploy `factory` behind a fresh ERC-1967 proxy, initialized with `calldata`
    async fn deploy_uups(
        &self,
        factory: &ContractFactory,
        calldata: Bytes,
    ) -> Result<ContractHandle, ScriptError> {
        let proxy_factory = self.proxy_factory.as_ref().ok_or_else(|| {
            ScriptError::Configuration("no proxy contract configured for deployments".to_string())
        })?;

        let implementation_code = factory.deploy_code(&[])?;
        let implementation = self
            .deploy_contract(&factory.name, implementation_code)
            .await?;
        info!("{} implementation deployed at {:#x}", factory.name, implementation);

        let proxy_code = proxy_factory.deploy_code(&[
            DynSolValue::Address(implementation),
            DynSolValue::Bytes(calldata.to_vec()),
        ])?;
        let proxy = self
            .deploy_contract(&proxy_factory.name, proxy_code)
            .await?;
        info!("{} deployed at {:#x}", proxy_factory.name, proxy);

        Ok(factory.attach(proxy))
    }
}

/// The calldata pointing `proxy` at `implementation`.
///
/// `upgradeTo` is only used without `call` and when the proxy's current interface
/// has it. OpenZeppelin 5 implementations only expose `upgradeToAndCall`, which
/// then receives empty data.
pub fn upgrade_calldata(
    proxy: &ContractHandle,
    implementation: Address,
    call: Option<Bytes>,
) -> Bytes {
    match call {
        None if proxy.abi.function(UPGRADE_TO_FN_NAME).is_some() => {
            IUUPSUpgradeable::upgradeToCall {
                newImplementation: implementation,
            }
            .abi_encode()
            .into()
        }
        call => IUUPSUpgradeable::upgradeToAndCallCall {
            newImplementation: implementation,
            data: call.unwrap_or_default(),
        }
        .abi_encode()
        .into(),
    }
}

#[async_trait]
impl ProxyUpgrader for ChainUpgrades {
    async fn deployer(&self) -> Result<DeployerAccount, ScriptError> {
        let address = self.sender()?;
        let balance = self
            .provider
            .get_balance(address)
            .await
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

        Ok(DeployerAccount { address, balance })
    }

    async fn deploy_proxy(
        &self,
        factory: &ContractFactory,
        initializer: &str,
        args: &[String],
        kind: ProxyKind,
    ) -> Result<ContractHandle, ScriptError> {
        if !factory.is_uups() {
            return Err(ScriptError::NotUpgradeable(format!(
                "{} has no upgradeTo or upgradeToAndCall function, a {} proxy in front of it could never be upgraded",
                factory.name, kind
            )));
        }

        // Encode before sending anything, so bad arguments cost no gas
        let calldata = factory.encode_call(initializer, args)?;
        debug!("Initializer calldata: {}", calldata);

        match kind {
            ProxyKind::Uups => self.deploy_uups(factory, calldata).await,
        }
    }

    async fn upgrade_proxy(
        &self,
        proxy: &ContractHandle,
        factory: &ContractFactory,
        call: Option<Bytes>,
    ) -> Result<ContractHandle, ScriptError> {
        let current = self.implementation_address(proxy.address).await?;
        debug!("Current implementation of {:#x}: {:#x}", proxy.address, current);

        if !factory.is_uups() {
            return Err(ScriptError::NotUpgradeable(format!(
                "{} has no upgradeTo or upgradeToAndCall function, upgrading to it would lock the proxy",
                factory.name
            )));
        }

        let code = factory.deploy_code(&[])?;
        let implementation = self.deploy_contract(&factory.name, code).await?;
        info!("{} implementation deployed at {:#x}", factory.name, implementation);

        let calldata = upgrade_calldata(proxy, implementation, call);
        let tx = TransactionRequest::default()
            .with_from(self.sender()?)
            .with_to(proxy.address)
            .with_input(calldata);
        let receipt = self
            .transact(tx)
            .await
            .map_err(ScriptError::ContractInteraction)?;
        debug!("Upgrade transaction: {}", receipt.transaction_hash);

        Ok(factory.attach(proxy.address))
    }

    async fn implementation_address(&self, proxy: Address) -> Result<Address, ScriptError> {
        let word = self
            .provider
            .get_storage_at(proxy, implementation_slot())
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        implementation_from_slot(proxy, word)
    }
}
