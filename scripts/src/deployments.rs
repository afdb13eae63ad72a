//! Reading and writing proxy addresses in the deployments file

use std::{fs, path::Path, str::FromStr};

use alloy::primitives::Address;
use serde_json::{json, Map, Value};

use crate::{constants::DEPLOYMENTS_KEY, errors::ScriptError, types::ProxyAddresses};

/// The key of the proxy address within a contract's entry
const PROXY_KEY: &str = "proxy";
/// The key of the implementation address within a contract's entry
const IMPLEMENTATION_KEY: &str = "implementation";

/// Read the deployments file, or an empty document if it does not exist yet
fn read_json(file_path: &Path) -> Result<Value, ScriptError> {
    if !file_path.exists() {
        return Ok(json!({}));
    }

    let contents = fs::read_to_string(file_path)
        .map_err(|e| ScriptError::ReadDeployments(format!("{}: {}", file_path.display(), e)))?;
    serde_json::from_str(&contents)
        .map_err(|e| ScriptError::ReadDeployments(format!("{}: {}", file_path.display(), e)))
}

/// Read an address recorded for `contract_name` under `key`
fn read_address(file_path: &Path, contract_name: &str, key: &str) -> Result<Address, ScriptError> {
    let parsed_json = read_json(file_path)?;
    let addr_str = parsed_json[DEPLOYMENTS_KEY][contract_name][key]
        .as_str()
        .ok_or_else(|| {
            ScriptError::ReadDeployments(format!(
                "no {key} address recorded for {contract_name} in {}",
                file_path.display()
            ))
        })?;

    Address::from_str(addr_str).map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// The proxy address recorded for `contract_name`
pub fn read_proxy_address(file_path: &Path, contract_name: &str) -> Result<Address, ScriptError> {
    read_address(file_path, contract_name, PROXY_KEY)
}

/// Record the addresses of `contract_name`, keeping every other entry
pub fn write_deployment(
    file_path: &Path,
    contract_name: &str,
    addresses: ProxyAddresses,
) -> Result<(), ScriptError> {
    let mut parsed_json = read_json(file_path)?;
    let deployments = &parsed_json[DEPLOYMENTS_KEY];
    if !parsed_json.is_object() || !(deployments.is_object() || deployments.is_null()) {
        return Err(ScriptError::WriteDeployments(format!(
            "{} is not a deployments file",
            file_path.display()
        )));
    }

    let mut entry = Map::new();
    entry.insert(
        PROXY_KEY.to_string(),
        Value::String(format!("{:#x}", addresses.proxy)),
    );
    entry.insert(
        IMPLEMENTATION_KEY.to_string(),
        Value::String(format!("{:#x}", addresses.implementation)),
    );
    parsed_json[DEPLOYMENTS_KEY][contract_name] = Value::Object(entry);

    let contents = serde_json::to_string_pretty(&parsed_json)
        .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    fs::write(file_path, contents)
        .map_err(|e| ScriptError::WriteDeployments(format!("{}: {}", file_path.display(), e)))
}
