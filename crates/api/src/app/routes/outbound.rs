use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Local;

use bookstock_inventory::{OutboundChannel, TransactionKind};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/outbound", post(ship))
        .route("/outbound/history", get(history))
}

/// Shared by both outbound tabs; only the channel differs.
pub(crate) async fn ship_via(
    services: &AppServices,
    body: dto::OutboundBody,
    channel: OutboundChannel,
) -> axum::response::Response {
    let req = match body.into_request(channel) {
        Ok(r) => r,
        Err(e) => return errors::stock_error_to_response(e),
    };

    match services.outbound(req, Local::now().naive_local()).await {
        Ok(receipt) => (StatusCode::OK, Json(dto::receipt_to_json(&receipt))).into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}

pub async fn ship(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::OutboundBody>,
) -> axum::response::Response {
    ship_via(&services, body, OutboundChannel::Primary).await
}

/// Outbound log, newest first.
pub async fn history(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.history(TransactionKind::Out).await {
        Ok(records) => {
            let items: Vec<_> = records.iter().map(dto::record_to_json).collect();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::stock_error_to_response(e),
    }
}
