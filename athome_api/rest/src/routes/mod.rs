use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::contact::ApiContactResponse;

pub mod contact;
pub mod health;

pub const INTERNAL_SERVER_ERROR_MESSAGE: &str =
    "Failed to send email. Please try again or contact us directly.";

pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err:#}");
    error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR_MESSAGE)
}

fn error(code: StatusCode, message: impl Into<String>) -> Response {
    (code, Json(ApiContactResponse::error(message))).into_response()
}
