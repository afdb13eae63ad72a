//! Reading the ERC-1967 implementation slot

use alloy::primitives::{Address, U256};

use crate::{
    constants::{IMPLEMENTATION_STORAGE_SLOT, NUM_BYTES_ADDRESS, NUM_BYTES_STORAGE_SLOT},
    errors::ScriptError,
};

/// The implementation slot as a storage key
pub fn implementation_slot() -> U256 {
    U256::from_be_bytes(IMPLEMENTATION_STORAGE_SLOT.0)
}

/// Decode the implementation address held in the slot of `proxy`.
///
/// An empty slot means `proxy` is not an ERC-1967 proxy.
pub fn implementation_from_slot(proxy: Address, word: U256) -> Result<Address, ScriptError> {
    let bytes = word.to_be_bytes::<NUM_BYTES_STORAGE_SLOT>();
    let implementation =
        Address::from_slice(&bytes[NUM_BYTES_STORAGE_SLOT - NUM_BYTES_ADDRESS..]);

    if implementation == Address::ZERO {
        return Err(ScriptError::NotAProxy(format!(
            "{proxy:#x} has no implementation set"
        )));
    }

    Ok(implementation)
}
