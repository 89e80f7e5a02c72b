//! Uniform response envelope.
//!
//! Every response body has the shape
//! `{ success, data?, message?, error?, pagination? }`. Handlers return
//! [`ApiResult`]: the `Ok` side carries data (and optionally a page summary),
//! the `Err` side is an [`AppError`] rendered into the same envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::AppError;

pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Page summary attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_records: u64,
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> Envelope<T> {
    fn success(data: Option<T>) -> Self {
        Self {
            success: true,
            data,
            message: None,
            error: None,
            pagination: None,
        }
    }
}

impl Envelope<()> {
    /// Failure carrying a human-readable `message`.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            error: None,
            pagination: None,
        }
    }

    /// Failure carrying raw `error` text from a lower layer.
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
            pagination: None,
        }
    }
}

/// Successful response with its status code.
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    body: Envelope<T>,
}

impl<T> ApiResponse<T> {
    /// 200 with `data`.
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            body: Envelope::success(Some(data)),
        }
    }

    /// 201 with the created resource.
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            body: Envelope::success(Some(data)),
        }
    }

    /// 200 with one page of results.
    pub fn page(data: T, pagination: Pagination) -> Self {
        let mut body = Envelope::success(Some(data));
        body.pagination = Some(pagination);
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &Envelope<T> {
        &self.body
    }
}

impl ApiResponse<()> {
    /// 200 with only a confirmation `message`.
    pub fn message(message: impl Into<String>) -> Self {
        let mut body = Envelope::success(None);
        body.message = Some(message.into());
        Self {
            status: StatusCode::OK,
            body,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_envelope_shape() {
        let response = ApiResponse::page(
            vec![1, 2],
            Pagination {
                current_page: 1,
                total_pages: 3,
                total_records: 25,
            },
        );
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            serde_json::to_value(response.body()).unwrap(),
            json!({
                "success": true,
                "data": [1, 2],
                "pagination": {"currentPage": 1, "totalPages": 3, "totalRecords": 25}
            })
        );
    }

    #[test]
    fn created_sets_status() {
        let response = ApiResponse::created(json!({"id": "a"}));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.body().data, Some(json!({"id": "a"})));
    }

    #[test]
    fn message_envelope_omits_data() {
        let response = ApiResponse::message("Comic book deleted");
        assert_eq!(
            serde_json::to_value(response.body()).unwrap(),
            json!({"success": true, "message": "Comic book deleted"})
        );
    }
}
