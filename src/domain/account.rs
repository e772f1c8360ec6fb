//! Account identity from a user-supplied address

use serde::Serialize;

use crate::core::NavigationTarget;
use crate::error::ValidationError;
use crate::infrastructure::address::AddressCodec;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: String,
    pub address: String,
}

/// Validate `address` and normalize it to its canonical form
pub fn get_account(codec: &dyn AddressCodec, address: &str) -> Result<Account, ValidationError> {
    let canonical = codec
        .decode(address)
        .ok_or_else(|| ValidationError::InvalidAddress(address.to_string()))?;
    Ok(Account {
        id: canonical.clone(),
        address: canonical,
    })
}

/// Account page of `account` on a network, addressed in that network's format
pub fn account_target(codec: &dyn AddressCodec, account: &Account, prefix: u16) -> NavigationTarget {
    NavigationTarget::Account {
        address: codec.encode(&account.id, prefix),
    }
}
