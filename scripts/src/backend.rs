//! The capabilities the deploy and upgrade procedures are written against.
//!
//! Production runs use [`ArtifactStore`](crate::artifacts::ArtifactStore) and
//! [`ChainUpgrades`](crate::chain::ChainUpgrades); tests substitute fakes.

use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;

use crate::{
    artifacts::ContractFactory,
    errors::ScriptError,
    types::{ContractHandle, DeployerAccount, ProxyKind},
};

/// Resolves names and addresses into contract handles
pub trait ContractResolver {
    /// Resolve a compiled contract into a deployable factory
    fn contract_factory(&self, name: &str) -> Result<ContractFactory, ScriptError>;

    /// Resolve a contract's interface bound to an existing address
    fn attach(&self, name: &str, address: Address) -> Result<ContractHandle, ScriptError> {
        Ok(self.contract_factory(name)?.attach(address))
    }
}

/// Deploys and upgrades proxies on behalf of the deployer
#[async_trait]
pub trait ProxyUpgrader {
    /// The account signing every transaction
    async fn deployer(&self) -> Result<DeployerAccount, ScriptError>;

    /// Deploy a fresh implementation behind a new proxy of the given kind, calling
    /// `initializer` with `args` through the proxy. Resolves once confirmed.
    async fn deploy_proxy(
        &self,
        factory: &ContractFactory,
        initializer: &str,
        args: &[String],
        kind: ProxyKind,
    ) -> Result<ContractHandle, ScriptError>;

    /// Deploy `factory` as the new implementation of `proxy`, optionally calling
    /// into it with `call`. Resolves once confirmed.
    async fn upgrade_proxy(
        &self,
        proxy: &ContractHandle,
        factory: &ContractFactory,
        call: Option<Bytes>,
    ) -> Result<ContractHandle, ScriptError>;

    /// The implementation `proxy` currently delegates to
    async fn implementation_address(&self, proxy: Address) -> Result<Address, ScriptError>;
}
