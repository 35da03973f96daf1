//! Shared response envelope.
//!
//! Success bodies are `{"data": ...}`; list endpoints add the applied
//! page and limit so clients can see the normalized window.

use serde::Serialize;

use crate::models::Pagination;

/// Success response envelope
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub data: T,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl<T> Envelope<T> {
    /// Plain `{data}` envelope.
    pub fn data(data: T) -> Self {
        Self {
            data,
            page: None,
            limit: None,
        }
    }

    /// `{data, page, limit}` envelope for list endpoints.
    pub fn paged(data: T, page: Pagination) -> Self {
        Self {
            data,
            page: Some(page.page),
            limit: Some(page.limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_envelope_omits_page_fields() {
        let json = serde_json::to_value(Envelope::data(1)).unwrap();
        assert_eq!(json, serde_json::json!({ "data": 1 }));
    }

    #[test]
    fn paged_envelope_includes_window() {
        let page = Pagination::new(Some(2), Some(25));
        let json = serde_json::to_value(Envelope::paged(vec![1, 2], page)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "data": [1, 2], "page": 2, "limit": 25 })
        );
    }
}
