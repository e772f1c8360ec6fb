//! Archive row types and their query templates

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::filter::Entity;

/// Row type that can be listed from the archive
pub trait ArchiveEntity: DeserializeOwned + Send + 'static {
    const ENTITY: Entity;
    /// Root field of the list query
    const LIST_ROOT: &'static str;
    /// Root field of the connection (count) query
    const CONNECTION_ROOT: &'static str;
    /// Selection set fetched per row
    const FIELDS: &'static str;
    /// Accepted `orderBy` tokens; the first one is the default
    const ORDERS: &'static [&'static str];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRef {
    pub id: String,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub height: Option<u64>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRef {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtrinsicRef {
    pub id: String,
    #[serde(default)]
    pub hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extrinsic {
    pub id: String,
    pub hash: String,
    #[serde(default)]
    pub index_in_block: Option<u32>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub signature: Option<Value>,
    #[serde(default)]
    pub call: Option<CallRef>,
    #[serde(default)]
    pub block: Option<BlockRef>,
}

impl Extrinsic {
    /// Signer address for both the bare and the wrapped signature encoding
    pub fn signer_address(&self) -> Option<&str> {
        let address = self.signature.as_ref()?.get("address")?;
        address
            .as_str()
            .or_else(|| address.get("value").and_then(Value::as_str))
    }

    pub fn call_name(&self) -> Option<&str> {
        self.call.as_ref().map(|call| call.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,
    pub hash: String,
    pub height: u64,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub spec_version: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub args: Option<Value>,
    #[serde(default)]
    pub extrinsic: Option<ExtrinsicRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub args: Option<Value>,
    #[serde(default)]
    pub extrinsic: Option<ExtrinsicRef>,
}

impl ArchiveEntity for Extrinsic {
    const ENTITY: Entity = Entity::Extrinsic;
    const LIST_ROOT: &'static str = "extrinsics";
    const CONNECTION_ROOT: &'static str = "extrinsicsConnection";
    const FIELDS: &'static str = "id hash indexInBlock success signature \
        call { id name } block { id hash height timestamp }";
    const ORDERS: &'static [&'static str] = &["id_DESC", "id_ASC"];
}

impl ArchiveEntity for Block {
    const ENTITY: Entity = Entity::Block;
    const LIST_ROOT: &'static str = "blocks";
    const CONNECTION_ROOT: &'static str = "blocksConnection";
    const FIELDS: &'static str = "id hash height timestamp specVersion";
    const ORDERS: &'static [&'static str] = &["id_DESC", "id_ASC", "height_DESC", "height_ASC"];
}

impl ArchiveEntity for Event {
    const ENTITY: Entity = Entity::Event;
    const LIST_ROOT: &'static str = "events";
    const CONNECTION_ROOT: &'static str = "eventsConnection";
    const FIELDS: &'static str = "id name args extrinsic { id hash }";
    const ORDERS: &'static [&'static str] = &["id_DESC", "id_ASC"];
}

impl ArchiveEntity for Call {
    const ENTITY: Entity = Entity::Call;
    const LIST_ROOT: &'static str = "calls";
    const CONNECTION_ROOT: &'static str = "callsConnection";
    const FIELDS: &'static str = "id name success args extrinsic { id hash }";
    const ORDERS: &'static [&'static str] = &["id_DESC", "id_ASC"];
}
