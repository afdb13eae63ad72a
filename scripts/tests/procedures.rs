//! Tests of the deploy and upgrade procedures against recording fakes

use std::sync::{Arc, Mutex};

use alloy::{
    json_abi::JsonAbi,
    primitives::{address, Address, Bytes, U256},
};
use async_trait::async_trait;
use scripts::{
    artifacts::ContractFactory,
    backend::{ContractResolver, ProxyUpgrader},
    commands::{deploy_proxy, exit_code, list_accounts, report_implementation, upgrade_proxy},
    errors::ScriptError,
    presets::box_deployment,
    types::{ContractHandle, DeployerAccount, ProxyKind},
};

/// The deployer account of every test
const DEPLOYER: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");
/// The owner passed to the initializers
const OWNER: Address = address!("7eb87f93c513a59be74fb804954019b9be48b98b");
/// The proxy created by the fake upgrader
const PROXY: Address = address!("28d9428e95b9602866e461d8116500dda0f16dc4");
/// The implementation behind a freshly deployed proxy
const LOGIC_V1: Address = address!("00000000000000000000000000000000000000b1");
/// The implementation installed by an upgrade
const LOGIC_V2: Address = address!("00000000000000000000000000000000000000b2");

/// A call made to one of the fakes
#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    /// A contract factory was resolved
    Resolve(String),
    /// The deployer account was read
    Deployer,
    /// A proxy deployment was requested
    Deploy {
        /// The implementation contract
        contract: String,
        /// The initializer
        initializer: String,
        /// The initializer arguments
        args: Vec<String>,
        /// The proxy kind
        kind: ProxyKind,
    },
    /// A proxy upgrade was requested
    Upgrade {
        /// The handle the proxy was attached as
        proxy: ContractHandle,
        /// The new implementation contract
        contract: String,
        /// The calldata passed along with the upgrade
        call: Option<Bytes>,
    },
    /// A proxy's implementation was read
    Implementation(Address),
}

/// The calls made to the fakes, in order
type EventLog = Arc<Mutex<Vec<Event>>>;

/// Resolves a fixed set of contract names
struct FakeResolver {
    /// The names that resolve
    known: Vec<&'static str>,
    /// The shared call log
    events: EventLog,
}

impl ContractResolver for FakeResolver {
    fn contract_factory(&self, name: &str) -> Result<ContractFactory, ScriptError> {
        self.events.lock().unwrap().push(Event::Resolve(name.to_string()));
        if !self.known.iter().any(|known| *known == name) {
            return Err(ScriptError::UnknownContract(name.to_string()));
        }

        Ok(ContractFactory::new(name, JsonAbi::default(), Bytes::from_static(&[0x60, 0x80])))
    }
}

/// Deploys to fixed addresses, optionally failing the proxy operation
struct FakeUpgrader {
    /// The shared call log
    events: EventLog,
    /// The error returned by `deploy_proxy` and `upgrade_proxy`, if any
    failure: Option<ScriptError>,
    /// The implementation the proxy currently points to
    implementation: Mutex<Address>,
}

impl FakeUpgrader {
    /// Record `event` and return the configured failure, if any
    fn record(&self, event: Event) -> Result<(), ScriptError> {
        self.events.lock().unwrap().push(event);
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ProxyUpgrader for FakeUpgrader {
    async fn deployer(&self) -> Result<DeployerAccount, ScriptError> {
        self.events.lock().unwrap().push(Event::Deployer);
        Ok(DeployerAccount {
            address: DEPLOYER,
            balance: U256::from(10_000_000_000_000_000_000u128),
        })
    }

    async fn deploy_proxy(
        &self,
        factory: &ContractFactory,
        initializer: &str,
        args: &[String],
        kind: ProxyKind,
    ) -> Result<ContractHandle, ScriptError> {
        self.record(Event::Deploy {
            contract: factory.name.clone(),
            initializer: initializer.to_string(),
            args: args.to_vec(),
            kind,
        })?;
        Ok(factory.attach(PROXY))
    }

    async fn upgrade_proxy(
        &self,
        proxy: &ContractHandle,
        factory: &ContractFactory,
        call: Option<Bytes>,
    ) -> Result<ContractHandle, ScriptError> {
        self.record(Event::Upgrade {
            proxy: proxy.clone(),
            contract: factory.name.clone(),
            call,
        })?;
        *self.implementation.lock().unwrap() = LOGIC_V2;
        Ok(factory.attach(proxy.address))
    }

    async fn implementation_address(&self, proxy: Address) -> Result<Address, ScriptError> {
        self.events.lock().unwrap().push(Event::Implementation(proxy));
        if proxy != PROXY {
            return Err(ScriptError::NotAProxy(format!("{proxy:#x}")));
        }
        Ok(*self.implementation.lock().unwrap())
    }
}

/// Build a resolver and upgrader sharing one call log
fn fakes(
    known: Vec<&'static str>,
    failure: Option<ScriptError>,
) -> (FakeResolver, FakeUpgrader, EventLog) {
    let events = EventLog::default();
    let resolver = FakeResolver {
        known,
        events: events.clone(),
    };
    let upgrader = FakeUpgrader {
        events: events.clone(),
        failure,
        implementation: Mutex::new(LOGIC_V1),
    };
    (resolver, upgrader, events)
}

/// The recorded calls, in order
fn recorded(events: &EventLog) -> Vec<Event> {
    events.lock().unwrap().clone()
}

#[tokio::test]
async fn test_deploy_box_reports_addresses() {
    let (resolver, upgrader, events) = fakes(vec!["BoxContract"], None);
    let params = box_deployment("Box", "BOX", OWNER);
    let mut out = Vec::new();

    let result = deploy_proxy(&resolver, &upgrader, &params, &mut out).await;
    assert_eq!(exit_code(&result), 0);

    let addresses = result.unwrap();
    assert_eq!(addresses.proxy, PROXY);
    assert_eq!(addresses.implementation, LOGIC_V1);

    assert_eq!(
        recorded(&events),
        vec![
            Event::Deployer,
            Event::Resolve("BoxContract".to_string()),
            Event::Deploy {
                contract: "BoxContract".to_string(),
                initializer: "initialize".to_string(),
                args: vec![
                    "Box".to_string(),
                    "BOX".to_string(),
                    format!("{OWNER:#x}"),
                ],
                kind: ProxyKind::Uups,
            },
            Event::Implementation(PROXY),
        ]
    );

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains(&format!("Deployer: {DEPLOYER}")));
    assert!(out.contains("Balance: 10000000000000000000"));
    assert!(out.contains(&format!("BoxContract proxy address: {PROXY}")));
    assert!(out.contains(&format!("BoxContract logic address: {LOGIC_V1}")));
}

#[tokio::test]
async fn test_unknown_contract_attempts_no_deployment() {
    let (resolver, upgrader, events) = fakes(vec!["BoxContract"], None);
    let params = box_deployment("Box", "BOX", OWNER);
    let params = scripts::types::DeploymentParams {
        contract: "MissingContract".to_string(),
        ..params
    };
    let mut out = Vec::new();

    let result = deploy_proxy(&resolver, &upgrader, &params, &mut out).await;
    assert_eq!(exit_code(&result), 1);
    assert_eq!(
        result.unwrap_err(),
        ScriptError::UnknownContract("MissingContract".to_string())
    );

    let events = recorded(&events);
    assert!(!events.iter().any(|e| matches!(e, Event::Deploy { .. })));
    assert!(!String::from_utf8(out).unwrap().contains("proxy address"));
}

#[tokio::test]
async fn test_reverted_deployment_reports_no_addresses() {
    let revert = ScriptError::ContractDeployment("execution reverted".to_string());
    let (resolver, upgrader, events) = fakes(vec!["BoxContract"], Some(revert.clone()));
    let params = box_deployment("Box", "BOX", OWNER);
    let mut out = Vec::new();

    let result = deploy_proxy(&resolver, &upgrader, &params, &mut out).await;
    assert_eq!(exit_code(&result), 1);
    assert_eq!(result.unwrap_err(), revert);

    // Exactly one deployment was attempted and nothing was read back
    let events = recorded(&events);
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, Event::Deploy { .. }))
            .count(),
        1
    );
    assert!(!events.iter().any(|e| matches!(e, Event::Implementation(_))));

    let out = String::from_utf8(out).unwrap();
    assert!(!out.contains("proxy address"));
    assert!(!out.contains("logic address"));
}

#[tokio::test]
async fn test_upgrade_attaches_before_upgrading() {
    let (resolver, upgrader, events) = fakes(vec!["BoxContract", "GachaContract"], None);
    let mut out = Vec::new();

    let result = upgrade_proxy(
        &resolver,
        &upgrader,
        PROXY,
        "BoxContract",
        "GachaContract",
        None,
        &mut out,
    )
    .await;
    assert_eq!(exit_code(&result), 0);

    let addresses = result.unwrap();
    assert_eq!(addresses.proxy, PROXY);
    assert_eq!(addresses.implementation, LOGIC_V2);

    assert_eq!(
        recorded(&events),
        vec![
            Event::Deployer,
            Event::Resolve("BoxContract".to_string()),
            Event::Resolve("GachaContract".to_string()),
            Event::Upgrade {
                proxy: ContractHandle {
                    name: "BoxContract".to_string(),
                    address: PROXY,
                    abi: JsonAbi::default(),
                },
                contract: "GachaContract".to_string(),
                call: None,
            },
            Event::Implementation(PROXY),
        ]
    );

    let out = String::from_utf8(out).unwrap();
    let attach_line = out
        .find(&format!("Upgrading BoxContract at {PROXY}..."))
        .unwrap();
    let proxy_line = out
        .find(&format!("GachaContract proxy address: {PROXY}"))
        .unwrap();
    assert!(attach_line < proxy_line);
    assert!(out.contains(&format!("GachaContract logic address: {LOGIC_V2}")));
}

#[tokio::test]
async fn test_upgrade_forwards_calldata() {
    let (resolver, upgrader, events) = fakes(vec!["GachaContract"], None);
    let call = Bytes::from_static(&[0x81, 0x29, 0xfc, 0x1c]);
    let mut out = Vec::new();

    upgrade_proxy(
        &resolver,
        &upgrader,
        PROXY,
        "GachaContract",
        "GachaContract",
        Some(call.clone()),
        &mut out,
    )
    .await
    .unwrap();

    assert!(recorded(&events).contains(&Event::Upgrade {
        proxy: ContractHandle {
            name: "GachaContract".to_string(),
            address: PROXY,
            abi: JsonAbi::default(),
        },
        contract: "GachaContract".to_string(),
        call: Some(call),
    }));
}

#[tokio::test]
async fn test_rejected_upgrade_surfaces_reason() {
    let reject =
        ScriptError::ContractInteraction("execution reverted: storage layout incompatible".into());
    let (resolver, upgrader, _events) =
        fakes(vec!["BoxContract", "GachaContract"], Some(reject));
    let mut out = Vec::new();

    let result = upgrade_proxy(
        &resolver,
        &upgrader,
        PROXY,
        "BoxContract",
        "GachaContract",
        None,
        &mut out,
    )
    .await;
    assert_eq!(exit_code(&result), 1);
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("storage layout incompatible"));

    // The proxy still points to the first implementation
    assert_eq!(*upgrader.implementation.lock().unwrap(), LOGIC_V1);
    assert!(!String::from_utf8(out).unwrap().contains("logic address"));
}

#[tokio::test]
async fn test_unresolvable_upgrade_target_attempts_no_upgrade() {
    let (resolver, upgrader, events) = fakes(vec!["BoxContract"], None);
    let mut out = Vec::new();

    let result = upgrade_proxy(
        &resolver,
        &upgrader,
        PROXY,
        "BoxContract",
        "GachaContract",
        None,
        &mut out,
    )
    .await;
    assert_eq!(exit_code(&result), 1);
    assert!(!recorded(&events)
        .iter()
        .any(|e| matches!(e, Event::Upgrade { .. })));
}

#[tokio::test]
async fn test_report_implementation() {
    let (_resolver, upgrader, _events) = fakes(vec![], None);
    let mut out = Vec::new();

    let implementation = report_implementation(&upgrader, PROXY, &mut out)
        .await
        .unwrap();
    assert_eq!(implementation, LOGIC_V1);
    assert!(String::from_utf8(out)
        .unwrap()
        .contains(&format!("Logic address: {LOGIC_V1}")));

    // Anything but the fake proxy holds an empty slot
    let result = report_implementation(&upgrader, OWNER, &mut Vec::new()).await;
    assert!(matches!(result, Err(ScriptError::NotAProxy(_))));
}

#[tokio::test]
async fn test_list_accounts() {
    let (_resolver, upgrader, _events) = fakes(vec![], None);
    let mut out = Vec::new();

    list_accounts(&upgrader, &mut out).await.unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        format!("{DEPLOYER} (balance: 10000000000000000000 wei)\n")
    );
}
