use crate::pagination::Pagination;
use serde::Serialize;

/// Cache/pagination metadata attached to successful responses.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_cache: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl Metadata {
    pub fn cache(from_cache: bool, cached_at: Option<chrono::DateTime<chrono::Utc>>) -> Self {
        Self {
            from_cache: Some(from_cache),
            cached_at,
            pagination: None,
        }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

/// The single success-response shape. Error responses are produced by
/// `AppError`'s own `IntoResponse` impl, never through this type.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: &'static str,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: "success",
            data,
            metadata: None,
            message: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> axum::response::IntoResponse for Envelope<T> {
    fn into_response(self) -> axum::response::Response {
        axum::Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_omits_absent_fields() {
        let env = Envelope::ok(serde_json::json!({"id": 1}));
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["status"], "success");
        assert!(v.get("metadata").is_none());
        assert!(v.get("message").is_none());
    }

    #[test]
    fn cache_metadata_round_trips() {
        let env = Envelope::ok(1).with_metadata(Metadata::cache(true, None));
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["metadata"]["from_cache"], true);
    }
}
