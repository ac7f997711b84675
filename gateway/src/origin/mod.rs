//! Remote row-store client (component C).
//!
//! Exposes exactly the `Query`/`GetByID` capability the read orchestrator
//! depends on (§9 design note: "repository polymorphism" expressed as a
//! capability set, not a class hierarchy). Transport errors, deadline
//! expiry, and empty results map onto a closed taxonomy independent of the
//! boundary's `AppError` — the orchestrator is the one place that decides
//! how an `OriginError` becomes a client-visible response.

use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

use crate::fingerprint::FilterValue;

#[derive(Debug, Error)]
pub enum OriginError {
    #[error("origin connection error: {0}")]
    Connection(String),
    #[error("origin request timed out")]
    Timeout,
    #[error("origin query error: {0}")]
    Query(String),
    #[error("not found")]
    NotFound,
}

/// A row-store record, kept as a tagged JSON object rather than a typed
/// struct: the gateway has no compile-time knowledge of the remote schema
/// (§9 design note: dynamically shaped result maps).
pub type Row = Value;

#[derive(Clone)]
pub struct OriginClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OriginClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub async fn query(
        &self,
        table: &str,
        filters: &BTreeMap<String, FilterValue>,
        limit: i64,
        offset: i64,
        deadline: Duration,
    ) -> Result<Vec<Row>, OriginError> {
        let mut req = self
            .http
            .get(format!("{}/{}", self.base_url.trim_end_matches('/'), table))
            .bearer_auth(&self.api_key)
            .query(&[("limit", limit.to_string()), ("offset", offset.to_string())])
            .timeout(deadline);

        for (k, v) in filters {
            req = req.query(&[(k.as_str(), filter_value_as_query(v))]);
        }

        let resp = req.send().await.map_err(map_reqwest_err)?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(OriginError::NotFound);
        }
        if !resp.status().is_success() {
            return Err(OriginError::Query(format!("origin returned {}", resp.status())));
        }
        resp.json::<Vec<Row>>()
            .await
            .map_err(|e| OriginError::Query(e.to_string()))
    }

    pub async fn get_by_id(&self, table: &str, id: &str, deadline: Duration) -> Result<Row, OriginError> {
        let resp = self
            .http
            .get(format!("{}/{}/{}", self.base_url.trim_end_matches('/'), table, id))
            .bearer_auth(&self.api_key)
            .timeout(deadline)
            .send()
            .await
            .map_err(map_reqwest_err)?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(OriginError::NotFound);
        }
        if !resp.status().is_success() {
            return Err(OriginError::Query(format!("origin returned {}", resp.status())));
        }
        resp.json::<Row>().await.map_err(|e| OriginError::Query(e.to_string()))
    }

    /// Cheap reachability probe used by the health endpoint.
    pub async fn ping(&self, deadline: Duration) -> Result<(), OriginError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url.trim_end_matches('/')))
            .timeout(deadline)
            .send()
            .await
            .map_err(map_reqwest_err)?;
        if resp.status().is_success() || resp.status() == reqwest::StatusCode::NOT_FOUND {
            // a 404 on a probe path still proves the origin is reachable
            Ok(())
        } else {
            Err(OriginError::Query(format!("origin returned {}", resp.status())))
        }
    }
}

fn filter_value_as_query(v: &FilterValue) -> String {
    match v {
        FilterValue::Str(s) => s.clone(),
        FilterValue::Int(i) => i.to_string(),
        FilterValue::Bool(b) => b.to_string(),
    }
}

fn map_reqwest_err(e: reqwest::Error) -> OriginError {
    if e.is_timeout() {
        OriginError::Timeout
    } else if e.is_connect() {
        OriginError::Connection(e.to_string())
    } else {
        OriginError::Query(e.to_string())
    }
}
