//! Navigation targets produced by search

use serde::Serialize;

/// Where a search submission leads
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NavigationTarget {
    /// Go to specific extrinsic
    Extrinsic { id: String },
    /// Go to specific block
    Block { id: String },
    /// Go to specific account
    Account { address: String },
    /// Go to the list of extrinsics and events sharing a name
    EntityName { name: String },
    /// Nothing matched
    NotFound { query: String },
}

impl NavigationTarget {
    /// Display route of this target within `network`
    ///
    /// Path segments and query values are form-urlencoded.
    pub fn route(&self, network: &str) -> String {
        let network = encode(network);
        match self {
            NavigationTarget::Extrinsic { id } => format!("/{network}/extrinsic/{}", encode(id)),
            NavigationTarget::Block { id } => format!("/{network}/block/{}", encode(id)),
            NavigationTarget::Account { address } => {
                format!("/{network}/account/{}", encode(address))
            }
            NavigationTarget::EntityName { name } => {
                format!("/{network}/search?query={}", encode(name))
            }
            NavigationTarget::NotFound { query } => format!("/not-found?query={}", encode(query)),
        }
    }

    pub fn is_found(&self) -> bool {
        !matches!(self, NavigationTarget::NotFound { .. })
    }
}

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
