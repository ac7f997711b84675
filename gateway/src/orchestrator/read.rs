//! Cache-aside read orchestrator (component F, §4.4).
//!
//! Depends only on the capability the fetch closure provides (§9 design
//! note: "repository polymorphism" as a capability set), not on a concrete
//! origin or relational type — callers pass whichever backend the route
//! needs to fall back to on a cache miss.

use std::future::Future;
use std::time::Duration;

use catalog_gateway_shared::{AppError, Metadata};
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};

use crate::cache::CacheClient;

pub struct ReadResult<T> {
    pub data: T,
    pub metadata: Metadata,
}

/// `fetch` runs only on a cache miss (or cache error — §7: cache errors are
/// recovered locally, never surfaced). Negative results (`fetch` erroring
/// with `AppError::not_found`/`*_not_found`) are deliberately not cached
/// (§4.4 "Negative caching", §9 open question resolved as "do not cache").
pub async fn read_through<T, F, Fut>(
    cache: Option<&CacheClient>,
    key: &str,
    ttl: Duration,
    fetch: F,
) -> Result<ReadResult<T>, AppError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    if let Some(cache) = cache {
        match cache.get(key).await {
            Ok(Some(bytes)) => {
                if let Ok(data) = serde_json::from_slice::<T>(&bytes) {
                    return Ok(ReadResult {
                        data,
                        metadata: Metadata::cache(true, Some(Utc::now())),
                    });
                }
                tracing::warn!(key, "cache hit failed to deserialize, falling through to origin");
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(key, error = %e, "cache lookup failed, falling through to origin");
            }
        }
    }

    let data = fetch().await?;

    if let Some(cache) = cache {
        match serde_json::to_vec(&data) {
            Ok(bytes) => {
                if let Err(e) = cache.set(key, &bytes, ttl).await {
                    tracing::warn!(key, error = %e, "cache populate failed, continuing without it");
                }
            }
            Err(e) => tracing::warn!(key, error = %e, "failed to serialize value for cache populate"),
        }
    }

    Ok(ReadResult {
        data,
        metadata: Metadata::cache(false, None),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_gateway_shared::ErrorCode;

    #[tokio::test]
    async fn miss_calls_fetch_and_marks_not_from_cache() {
        let result: ReadResult<serde_json::Value> =
            read_through(None, "k", Duration::from_secs(1), || async {
                Ok(serde_json::json!({"id": 1}))
            })
            .await
            .unwrap();
        assert_eq!(result.metadata.from_cache, Some(false));
    }

    #[tokio::test]
    async fn fetch_error_propagates() {
        let result: Result<ReadResult<serde_json::Value>, AppError> =
            read_through(None, "k", Duration::from_secs(1), || async {
                Err(AppError::not_found("missing"))
            })
            .await;
        assert!(matches!(result, Err(e) if e.code == ErrorCode::NotFound));
    }
}
