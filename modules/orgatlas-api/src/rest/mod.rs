pub mod activities;
pub mod buildings;
pub mod organizations;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

/// 404 with the `{"detail": ...}` body shape clients expect.
pub(crate) fn not_found(detail: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": detail }))).into_response()
}

/// 400 with the `{"detail": ...}` body shape clients expect.
pub(crate) fn bad_request(detail: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "detail": detail }))).into_response()
}
