use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use bookstock_core::StockError;

pub fn stock_error_to_response(err: StockError) -> axum::response::Response {
    let status = match &err {
        StockError::UnknownIdentifier(_) => StatusCode::NOT_FOUND,
        StockError::InsufficientStock { .. } => StatusCode::CONFLICT,
        StockError::MissingRequiredField(_) => StatusCode::BAD_REQUEST,
        StockError::Validation(_) => StatusCode::BAD_REQUEST,
        StockError::Persistence(_) => StatusCode::BAD_GATEWAY,
    };
    json_error(status, err.code(), err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
