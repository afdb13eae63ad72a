//! The operator workflows for the Box and Gacha contracts, expressed as
//! parameters of the generic deploy and upgrade procedures

use std::path::Path;

use alloy::primitives::Address;
use tool_utils::prompt_for_eth_address;
use tracing::info;

use crate::{
    constants::{BOX_CONTRACT_NAME, DEFAULT_INITIALIZER, GACHA_CONTRACT_NAME},
    deployments::read_proxy_address,
    errors::ScriptError,
    types::DeploymentParams,
};

/// Deploy `BoxContract` as `initialize(name, symbol, owner)`
pub fn box_deployment(name: &str, symbol: &str, owner: Address) -> DeploymentParams {
    DeploymentParams {
        contract: BOX_CONTRACT_NAME.to_string(),
        initializer: DEFAULT_INITIALIZER.to_string(),
        args: vec![name.to_string(), symbol.to_string(), format!("{owner:#x}")],
    }
}

/// Deploy `GachaContract` as `initialize(boxContract, owner)`
pub fn gacha_deployment(box_contract: Address, owner: Address) -> DeploymentParams {
    DeploymentParams {
        contract: GACHA_CONTRACT_NAME.to_string(),
        initializer: DEFAULT_INITIALIZER.to_string(),
        args: vec![format!("{box_contract:#x}"), format!("{owner:#x}")],
    }
}

/// The configured owner, or one entered by the operator
pub fn resolve_owner(configured: Option<Address>) -> Result<Address, ScriptError> {
    match configured {
        Some(owner) => Ok(owner),
        None => prompt_for_eth_address("Owner address")
            .map_err(|e| ScriptError::Configuration(e.to_string())),
    }
}

/// The given proxy address, or the one recorded for `contract_name`
pub fn resolve_proxy(
    given: Option<Address>,
    deployments_path: &Path,
    contract_name: &str,
) -> Result<Address, ScriptError> {
    if let Some(proxy) = given {
        return Ok(proxy);
    }

    let proxy = read_proxy_address(deployments_path, contract_name)?;
    info!(
        "Using {} proxy {:#x} from {}",
        contract_name,
        proxy,
        deployments_path.display()
    );
    Ok(proxy)
}
