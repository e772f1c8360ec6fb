//! Free-text search classification
//!
//! A query is run through an ordered list of [`SearchStage`]s. Each stage
//! decides from the query's shape whether it applies, then probes the
//! archive with a single-row lookup. The first stage with a hit wins; a
//! data access failure stops the pipeline instead of falling through.

use std::pin::pin;

use futures::{future, stream, StreamExt, TryStreamExt};
use serde_json::json;
use tracing::debug;

use crate::core::NavigationTarget;
use crate::domain::filter::FilterExpr;
use crate::error::QueryError;
use crate::infrastructure::archive::Archive;

/// One ordered step of the search pipeline
#[async_trait::async_trait]
pub trait SearchStage: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the query has the shape this stage looks for
    fn applies(&self, _query: &str) -> bool {
        true
    }

    async fn probe(
        &self,
        archive: &Archive,
        query: &str,
    ) -> Result<Option<NavigationTarget>, QueryError>;
}

/// Unsigned integer without leading zeros, optionally prefixed by `+`
pub fn is_number(query: &str) -> bool {
    let digits = query.strip_prefix('+').unwrap_or(query);
    match digits.as_bytes() {
        [b'0'] => true,
        [b'1'..=b'9', rest @ ..] => rest.iter().all(u8::is_ascii_digit),
        _ => false,
    }
}

pub struct ExtrinsicByHash;

#[async_trait::async_trait]
impl SearchStage for ExtrinsicByHash {
    fn name(&self) -> &'static str {
        "extrinsic-hash"
    }

    async fn probe(
        &self,
        archive: &Archive,
        query: &str,
    ) -> Result<Option<NavigationTarget>, QueryError> {
        let hit = archive
            .extrinsics()
            .first(&FilterExpr::eq("hash", query))
            .await?;
        Ok(hit.map(|extrinsic| NavigationTarget::Extrinsic { id: extrinsic.id }))
    }
}

pub struct BlockByHash;

#[async_trait::async_trait]
impl SearchStage for BlockByHash {
    fn name(&self) -> &'static str {
        "block-hash"
    }

    async fn probe(
        &self,
        archive: &Archive,
        query: &str,
    ) -> Result<Option<NavigationTarget>, QueryError> {
        let hit = archive.blocks().first(&FilterExpr::eq("hash", query)).await?;
        Ok(hit.map(|block| NavigationTarget::Block { id: block.id }))
    }
}

/// Signer filter covering the bare and the wrapped address encoding
pub fn signer_filter(address: &str) -> FilterExpr {
    FilterExpr::or([
        FilterExpr::json_contains("signature", json!({ "address": address })),
        FilterExpr::json_contains("signature", json!({ "address": { "value": address } })),
    ])
}

/// Accounts are only found through extrinsics they signed
pub struct AccountBySigner;

#[async_trait::async_trait]
impl SearchStage for AccountBySigner {
    fn name(&self) -> &'static str {
        "account-signer"
    }

    async fn probe(
        &self,
        archive: &Archive,
        query: &str,
    ) -> Result<Option<NavigationTarget>, QueryError> {
        let hit = archive.extrinsics().first(&signer_filter(query)).await?;
        Ok(hit.map(|_| NavigationTarget::Account {
            address: query.to_string(),
        }))
    }
}

pub struct BlockByHeight;

#[async_trait::async_trait]
impl SearchStage for BlockByHeight {
    fn name(&self) -> &'static str {
        "block-height"
    }

    fn applies(&self, query: &str) -> bool {
        is_number(query)
    }

    async fn probe(
        &self,
        archive: &Archive,
        query: &str,
    ) -> Result<Option<NavigationTarget>, QueryError> {
        let digits = query.strip_prefix('+').unwrap_or(query);
        // heights beyond i64 cannot exist
        let Ok(height) = digits.parse::<i64>() else {
            return Ok(None);
        };
        let hit = archive
            .blocks()
            .first(&FilterExpr::eq("height", height))
            .await?;
        Ok(hit.map(|block| NavigationTarget::Block { id: block.id }))
    }
}

/// Extrinsic call names and event names, looked up concurrently
pub struct EntityByName;

#[async_trait::async_trait]
impl SearchStage for EntityByName {
    fn name(&self) -> &'static str {
        "entity-name"
    }

    fn applies(&self, query: &str) -> bool {
        !is_number(query)
    }

    async fn probe(
        &self,
        archive: &Archive,
        query: &str,
    ) -> Result<Option<NavigationTarget>, QueryError> {
        let by_call = FilterExpr::relation("call", FilterExpr::eq("name", query));
        let by_event = FilterExpr::eq("name", query);
        let extrinsics = archive.extrinsics();
        let events = archive.events();

        let (extrinsic, event) =
            futures::try_join!(extrinsics.first(&by_call), events.first(&by_event))?;

        Ok((extrinsic.is_some() || event.is_some()).then(|| NavigationTarget::EntityName {
            name: query.to_string(),
        }))
    }
}

pub fn default_stages() -> Vec<Box<dyn SearchStage>> {
    vec![
        Box::new(ExtrinsicByHash),
        Box::new(BlockByHash),
        Box::new(AccountBySigner),
        Box::new(BlockByHeight),
        Box::new(EntityByName),
    ]
}

pub struct SearchResolver {
    archive: Archive,
    stages: Vec<Box<dyn SearchStage>>,
}

impl SearchResolver {
    pub fn new(archive: Archive) -> Self {
        Self::with_stages(archive, default_stages())
    }

    pub fn with_stages(archive: Archive, stages: Vec<Box<dyn SearchStage>>) -> Self {
        Self { archive, stages }
    }

    /// Classify `query`; stages run strictly in order and stop at the first hit
    pub async fn resolve(&self, query: &str) -> Result<NavigationTarget, QueryError> {
        let hits = stream::iter(self.stages.iter().filter(|stage| stage.applies(query)))
            .then(|stage| async move {
                debug!(stage = stage.name(), query, "probing search stage");
                stage.probe(&self.archive, query).await
            })
            .try_filter_map(|hit| future::ready(Ok(hit)));
        let mut hits = pin!(hits);

        match hits.try_next().await? {
            Some(target) => {
                debug!(?target, query, "search resolved");
                Ok(target)
            }
            None => Ok(NavigationTarget::NotFound {
                query: query.to_string(),
            }),
        }
    }
}
