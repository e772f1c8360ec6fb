//! Scripted archive for integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use calamar::infrastructure::{Archive, QueryExecutor};
use calamar::DataAccessError;

struct Rule {
    needles: Vec<String>,
    reply: Result<Value, DataAccessError>,
}

/// Replies with the first rule whose needles all occur in the query text
///
/// Unmatched queries get empty lists and zero counts for every root.
#[derive(Default)]
pub struct MockArchive {
    rules: Mutex<Vec<Rule>>,
    queries: Mutex<Vec<String>>,
}

impl MockArchive {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(self: &Arc<Self>, needles: &[&str], data: Value) -> Arc<Self> {
        self.push(needles, Ok(data))
    }

    pub fn fail(self: &Arc<Self>, needles: &[&str], err: DataAccessError) -> Arc<Self> {
        self.push(needles, Err(err))
    }

    fn push(self: &Arc<Self>, needles: &[&str], reply: Result<Value, DataAccessError>) -> Arc<Self> {
        self.rules.lock().unwrap().push(Rule {
            needles: needles.iter().map(|needle| needle.to_string()).collect(),
            reply,
        });
        self.clone()
    }

    pub fn archive(self: &Arc<Self>) -> Archive {
        Archive::new(self.clone())
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

fn empty_reply() -> Value {
    json!({
        "extrinsics": [],
        "blocks": [],
        "events": [],
        "calls": [],
        "extrinsicsConnection": { "totalCount": 0 },
        "blocksConnection": { "totalCount": 0 },
        "eventsConnection": { "totalCount": 0 },
        "callsConnection": { "totalCount": 0 },
    })
}

#[async_trait::async_trait]
impl QueryExecutor for MockArchive {
    async fn execute_query(&self, query: &str) -> Result<Value, DataAccessError> {
        self.queries.lock().unwrap().push(query.to_string());
        let rules = self.rules.lock().unwrap();
        rules
            .iter()
            .find(|rule| rule.needles.iter().all(|needle| query.contains(needle.as_str())))
            .map(|rule| rule.reply.clone())
            .unwrap_or_else(|| Ok(empty_reply()))
    }
}

pub fn extrinsic_row(id: &str, hash: &str) -> Value {
    json!({
        "id": id,
        "hash": hash,
        "indexInBlock": 1,
        "success": true,
        "signature": null,
        "call": { "id": format!("{id}-000"), "name": "Balances.transfer" },
        "block": { "id": "0000000010-5f2a1", "height": 10 },
    })
}

pub fn block_row(id: &str, height: u64) -> Value {
    json!({
        "id": id,
        "hash": format!("0x{}", "cd".repeat(32)),
        "height": height,
        "timestamp": "2023-06-01T00:00:00.000Z",
        "specVersion": 9430,
    })
}

pub fn event_row(id: &str, name: &str) -> Value {
    json!({ "id": id, "name": name, "args": null, "extrinsic": null })
}
