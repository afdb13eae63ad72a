//! Definitions of Solidity functions called during upgrades

use alloy::sol;

sol! {
    interface IUUPSUpgradeable {
        function upgradeTo(address newImplementation) external;
        function upgradeToAndCall(address newImplementation, bytes memory data) external payable;
    }
}
