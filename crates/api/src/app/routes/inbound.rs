use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Local;

use bookstock_inventory::TransactionKind;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/inbound", post(receive))
        .route("/inbound/history", get(history))
}

pub async fn receive(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::InboundBody>,
) -> axum::response::Response {
    let req = match body.into_request() {
        Ok(r) => r,
        Err(e) => return errors::stock_error_to_response(e),
    };

    match services.inbound(req, Local::now().naive_local()).await {
        Ok(receipt) => (StatusCode::OK, Json(dto::receipt_to_json(&receipt))).into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}

/// Inbound log, newest first.
pub async fn history(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.history(TransactionKind::In).await {
        Ok(records) => {
            let items: Vec<_> = records.iter().map(dto::record_to_json).collect();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::stock_error_to_response(e),
    }
}
