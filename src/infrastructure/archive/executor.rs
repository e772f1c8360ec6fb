//! Query execution boundary and the HTTP GraphQL implementation

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::DataAccessError;

/// Executes query text against an archive and returns its `data` object
#[async_trait::async_trait]
pub trait QueryExecutor: Send + Sync + 'static {
    async fn execute_query(&self, query: &str) -> Result<Value, DataAccessError>;
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

/// Archive reached over HTTP POST
pub struct HttpQueryExecutor {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpQueryExecutor {
    pub fn new(endpoint: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(20))
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait::async_trait]
impl QueryExecutor for HttpQueryExecutor {
    async fn execute_query(&self, query: &str) -> Result<Value, DataAccessError> {
        debug!(endpoint = %self.endpoint, %query, "executing archive query");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await
            .map_err(|err| DataAccessError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(endpoint = %self.endpoint, %status, "archive returned error status");
            return Err(DataAccessError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GraphqlResponse = response
            .json()
            .await
            .map_err(|err| DataAccessError::MalformedResponse(err.to_string()))?;

        if !payload.errors.is_empty() {
            let messages: Vec<String> = payload.errors.into_iter().map(|e| e.message).collect();
            warn!(endpoint = %self.endpoint, ?messages, "archive rejected query");
            return Err(DataAccessError::Backend { messages });
        }

        payload
            .data
            .ok_or_else(|| DataAccessError::MalformedResponse("response has no data".into()))
    }
}
