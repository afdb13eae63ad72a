//! Implementations of the deploy, upgrade and inspection procedures.
//!
//! The procedures print their report to `out` and leave the chain and the
//! artifacts to the [`ContractResolver`] and [`ProxyUpgrader`] they are given.

use std::io::Write;

use alloy::primitives::{Address, Bytes};
use tracing::info;

use crate::{
    backend::{ContractResolver, ProxyUpgrader},
    errors::ScriptError,
    types::{DeploymentParams, ProxyAddresses, ProxyKind},
};

/// Deploy `params.contract` behind a new UUPS proxy, initialized with `params.args`
pub async fn deploy_proxy<R, U>(
    resolver: &R,
    upgrader: &U,
    params: &DeploymentParams,
    out: &mut impl Write,
) -> Result<ProxyAddresses, ScriptError>
where
    R: ContractResolver + ?Sized,
    U: ProxyUpgrader + ?Sized,
{
    report_deployer(upgrader, out).await?;

    let factory = resolver.contract_factory(&params.contract)?;

    report(out, format_args!("Deploying {}...", params.contract))?;
    info!(
        "Initializing {} with {}({})",
        params.contract,
        params.initializer,
        params.args.join(", ")
    );
    let proxy = upgrader
        .deploy_proxy(&factory, &params.initializer, &params.args, ProxyKind::Uups)
        .await?;
    let implementation = upgrader.implementation_address(proxy.address).await?;

    report(
        out,
        format_args!("{} proxy address: {}", params.contract, proxy.address),
    )?;
    report(
        out,
        format_args!("{} logic address: {}", params.contract, implementation),
    )?;

    Ok(ProxyAddresses {
        proxy: proxy.address,
        implementation,
    })
}

/// Upgrade the proxy at `proxy`, currently speaking `current_contract`'s
/// interface, to a fresh deployment of `new_contract`
pub async fn upgrade_proxy<R, U>(
    resolver: &R,
    upgrader: &U,
    proxy: Address,
    current_contract: &str,
    new_contract: &str,
    call: Option<Bytes>,
    out: &mut impl Write,
) -> Result<ProxyAddresses, ScriptError>
where
    R: ContractResolver + ?Sized,
    U: ProxyUpgrader + ?Sized,
{
    report_deployer(upgrader, out).await?;

    let current = resolver.attach(current_contract, proxy)?;
    report(
        out,
        format_args!("Upgrading {} at {}...", current.name, current.address),
    )?;

    let factory = resolver.contract_factory(new_contract)?;
    let upgraded = upgrader.upgrade_proxy(&current, &factory, call).await?;
    let implementation = upgrader.implementation_address(upgraded.address).await?;

    report(
        out,
        format_args!("{} proxy address: {}", new_contract, proxy),
    )?;
    report(
        out,
        format_args!("{} logic address: {}", new_contract, implementation),
    )?;

    Ok(ProxyAddresses {
        proxy,
        implementation,
    })
}

/// Print the implementation the proxy at `proxy` delegates to
pub async fn report_implementation<U>(
    upgrader: &U,
    proxy: Address,
    out: &mut impl Write,
) -> Result<Address, ScriptError>
where
    U: ProxyUpgrader + ?Sized,
{
    let implementation = upgrader.implementation_address(proxy).await?;
    report(out, format_args!("Proxy address: {}", proxy))?;
    report(out, format_args!("Logic address: {}", implementation))?;

    Ok(implementation)
}

/// Print the deployer account and its balance
pub async fn list_accounts<U>(upgrader: &U, out: &mut impl Write) -> Result<(), ScriptError>
where
    U: ProxyUpgrader + ?Sized,
{
    let deployer = upgrader.deployer().await?;
    report(
        out,
        format_args!("{} (balance: {} wei)", deployer.address, deployer.balance),
    )
}

/// The process exit code of a finished run
pub fn exit_code<T>(result: &Result<T, ScriptError>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

/// Print the address and balance of the account signing the run
async fn report_deployer<U>(upgrader: &U, out: &mut impl Write) -> Result<(), ScriptError>
where
    U: ProxyUpgrader + ?Sized,
{
    let deployer = upgrader.deployer().await?;
    report(out, format_args!("Deployer: {}", deployer.address))?;
    report(out, format_args!("Balance: {}", deployer.balance))
}

/// Write a line of the run report
fn report(out: &mut impl Write, line: std::fmt::Arguments<'_>) -> Result<(), ScriptError> {
    writeln!(out, "{}", line).map_err(|e| ScriptError::Output(e.to_string()))
}
