// ABOUTME: Shared API response envelope
// ABOUTME: Consistent `{ success, data, error }` body for JSON endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
};
use serde::Serialize;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// `200 OK` with the data wrapped in the envelope
pub fn ok<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, ResponseJson(ApiResponse::success(data))).into_response()
}

/// `201 Created` with the data wrapped in the envelope
pub fn created<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, ResponseJson(ApiResponse::success(data))).into_response()
}
