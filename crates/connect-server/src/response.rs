//! The `{ success, message?, data?, count?, pagination? }` envelope every
//! handler returns.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use connect_model::{PageMeta, Paged};

#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    #[serde(skip)]
    status: StatusCode,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageMeta>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            success: true,
            message: None,
            data: Some(data),
            count: None,
            pagination: None,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::ok(data)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> Envelope<Vec<T>> {
    /// A list with its length in `count`.
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len();
        Self {
            count: Some(count),
            ..Self::ok(items)
        }
    }

    /// One page of items with its metadata in `pagination`.
    pub fn page(paged: Paged<T>) -> Self {
        Self {
            pagination: Some(paged.meta),
            ..Self::list(paged.items)
        }
    }
}

impl Envelope<()> {
    /// Success with only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            success: true,
            message: Some(message.into()),
            data: None,
            count: None,
            pagination: None,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_carries_count() {
        let body = serde_json::to_value(Envelope::list(vec![1, 2, 3])).unwrap();
        assert_eq!(body, json!({ "success": true, "data": [1, 2, 3], "count": 3 }));
    }

    #[test]
    fn test_page_carries_meta() {
        let paged = Paged {
            items: vec!["a", "b"],
            meta: PageMeta::new(5, 1, 2),
        };
        let body = serde_json::to_value(Envelope::page(paged)).unwrap();
        assert_eq!(body["count"], 2);
        assert_eq!(body["pagination"]["total"], 5);
        assert_eq!(body["pagination"]["total_pages"], 3);
    }

    #[test]
    fn test_message_only() {
        let body = serde_json::to_value(Envelope::message("Post deleted")).unwrap();
        assert_eq!(body, json!({ "success": true, "message": "Post deleted" }));
    }

    #[test]
    fn test_created_status() {
        let response = Envelope::created(json!({ "id": 1 })).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
