//! Definitions of errors that can occur during the execution of the proxy management scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the proxy management scripts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// A missing or malformed configuration value
    Configuration(String),
    /// No compiled artifact exists for the requested contract name
    UnknownContract(String),
    /// More than one compiled artifact matches a bare contract name
    AmbiguousContract(String),
    /// The artifact has no creation bytecode (abstract contract or interface)
    AbstractContract(String),
    /// Error parsing a compilation artifact
    ArtifactParsing(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error constructing calldata for a contract method
    CalldataConstruction(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error calling a contract method, including reverted upgrades
    ContractInteraction(String),
    /// The contract cannot be used behind a UUPS proxy
    NotUpgradeable(String),
    /// The address does not hold an ERC-1967 proxy
    NotAProxy(String),
    /// Error reading the deployments file
    ReadDeployments(String),
    /// Error writing the deployments file
    WriteDeployments(String),
    /// Error writing the report to the operator
    Output(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Configuration(s) => write!(f, "invalid configuration: {}", s),
            ScriptError::UnknownContract(s) => write!(f, "unknown contract: {}", s),
            ScriptError::AmbiguousContract(s) => write!(f, "ambiguous contract name: {}", s),
            ScriptError::AbstractContract(s) => {
                write!(f, "cannot deploy abstract contract or interface: {}", s)
            }
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::NotUpgradeable(s) => write!(f, "contract is not UUPS upgradeable: {}", s),
            ScriptError::NotAProxy(s) => write!(f, "not an ERC-1967 proxy: {}", s),
            ScriptError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            ScriptError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
            ScriptError::Output(s) => write!(f, "error writing output: {}", s),
        }
    }
}

impl Error for ScriptError {}
