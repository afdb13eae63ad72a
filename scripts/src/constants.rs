//! Constants used in the proxy scripts

use std::time::Duration;

use alloy::primitives::{b256, B256};

/// The ABI of the ERC1967Proxy contract placed in front of implementations
pub const PROXY_ABI: &str = include_str!("../artifacts/ERC1967Proxy.abi");

/// The creation bytecode of the ERC1967Proxy contract.
///
/// A minimal ERC-1967 proxy: the constructor takes `(address logic, bytes data)`,
/// requires code at `logic`, stores it in the implementation slot, emits
/// `Upgraded(logic)` and delegate-calls `data` when it is non-empty. The runtime
/// delegates every call to the implementation slot and bubbles up reverts.
pub const PROXY_BYTECODE: &str = include_str!("../artifacts/ERC1967Proxy.bin");

/// The storage slot containing the implementation address in an ERC-1967 proxy.
///
/// This is `keccak256("eip1967.proxy.implementation") - 1`, specified in EIP1967:
/// https://eips.ethereum.org/EIPS/eip-1967#logic-contract-address
pub const IMPLEMENTATION_STORAGE_SLOT: B256 =
    b256!("360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc");

/// The number of bytes stored in a single storage slot
pub const NUM_BYTES_STORAGE_SLOT: usize = 32;

/// The number of bytes in an Ethereum address
pub const NUM_BYTES_ADDRESS: usize = 20;

/// The interval between two polls for a transaction receipt
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// The number of polls for a transaction receipt before giving up
pub const RECEIPT_POLL_ATTEMPTS: usize = 240;

/// The initializer invoked through the proxy when none is specified
pub const DEFAULT_INITIALIZER: &str = "initialize";

/// The name of the embedded proxy contract
pub const DEFAULT_PROXY_CONTRACT: &str = "ERC1967Proxy";

/// The UUPS upgrade entrypoint without extra calldata
pub const UPGRADE_TO_FN_NAME: &str = "upgradeTo";

/// The UUPS upgrade entrypoint with extra calldata
pub const UPGRADE_TO_AND_CALL_FN_NAME: &str = "upgradeToAndCall";

// ------------
// | Networks |
// ------------

/// The default RPC URL of a local development node
pub const LOCALHOST_RPC_URL: &str = "http://127.0.0.1:8545";

/// The private key of the first account that local development nodes are seeded with
pub const LOCALHOST_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// The chain ID of BNB Smart Chain mainnet
pub const BSC_MAINNET_CHAIN_ID: u64 = 56;

/// The chain ID of BNB Smart Chain testnet
pub const BSC_TESTNET_CHAIN_ID: u64 = 97;

/// The gas limit used for every transaction on the BSC networks
pub const BSC_GAS_LIMIT: u64 = 8_000_000;

// -------------------------
// | Environment variables |
// -------------------------

/// The environment variable holding the deployer's private key
pub const PRIVATE_KEY_ENV_VAR: &str = "PRIVATE_KEY";

/// The environment variable holding the BSC mainnet RPC URL
pub const BSC_PROVIDER_ENV_VAR: &str = "BSC_PROVIDER";

/// The environment variable holding the BSC testnet RPC URL
pub const BSC_TESTNET_PROVIDER_ENV_VAR: &str = "BSC_TESTNET_PROVIDER";

/// The environment variable overriding the RPC URL of any network
pub const RPC_URL_ENV_VAR: &str = "RPC_URL";

/// The environment variable holding the owner address used by the presets
pub const OWNER_ADDRESS_ENV_VAR: &str = "ADDRESS";

/// The environment variable holding the artifacts directory
pub const ARTIFACTS_PATH_ENV_VAR: &str = "ARTIFACTS_PATH";

/// The environment variable holding the deployments file path
pub const DEPLOYMENTS_PATH_ENV_VAR: &str = "DEPLOYMENTS_PATH";

// -------------
// | Artifacts |
// -------------

/// The default Hardhat artifacts directory
pub const DEFAULT_ARTIFACTS_PATH: &str = "artifacts";

/// The directory of Hardhat build info files, which are not contract artifacts
pub const BUILD_INFO_DIR: &str = "build-info";

/// The extension of a contract artifact
pub const ARTIFACT_EXTENSION: &str = "json";

/// The suffix of Hardhat debug files sitting next to each artifact
pub const DEBUG_ARTIFACT_SUFFIX: &str = ".dbg.json";

// ---------------
// | Deployments |
// ---------------

/// The default path of the deployments file
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The deployments key in the deployments file
pub const DEPLOYMENTS_KEY: &str = "deployments";

// -----------
// | Presets |
// -----------

/// The contract name of the box collection
pub const BOX_CONTRACT_NAME: &str = "BoxContract";

/// The default token name of the box collection
pub const DEFAULT_BOX_NAME: &str = "Box";

/// The default token symbol of the box collection
pub const DEFAULT_BOX_SYMBOL: &str = "BOX";

/// The contract name of the gacha contract
pub const GACHA_CONTRACT_NAME: &str = "GachaContract";
