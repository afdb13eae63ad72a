//! Type definitions used throughout the scripts

use std::fmt::{self, Display};

use alloy::{
    json_abi::JsonAbi,
    primitives::{Address, U256},
};

/// The account that signs and pays for every transaction of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployerAccount {
    /// The deployer's address
    pub address: Address,
    /// The deployer's balance, in wei
    pub balance: U256,
}

/// A contract interface bound to an on-chain address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractHandle {
    /// The name of the compiled contract whose interface the handle speaks
    pub name: String,
    /// The address the handle is attached to
    pub address: Address,
    /// The interface the contract at `address` speaks
    pub abi: JsonAbi,
}

/// The proxy patterns the scripts know how to deploy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyKind {
    /// An ERC-1967 proxy whose upgrade logic lives in the implementation (ERC-1822)
    Uups,
}

impl Display for ProxyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyKind::Uups => write!(f, "uups"),
        }
    }
}

/// The addresses reported at the end of a deploy or upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProxyAddresses {
    /// The stable proxy address
    pub proxy: Address,
    /// The implementation the proxy currently delegates to
    pub implementation: Address,
}

/// What to deploy behind a new proxy and how to initialize it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentParams {
    /// The implementation contract name
    pub contract: String,
    /// The initializer called through the proxy
    pub initializer: String,
    /// The initializer arguments, in order
    pub args: Vec<String>,
}
