use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use bookstock_inventory::OutboundChannel;

use crate::app::routes::outbound::ship_via;
use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/secondary-outbound", post(ship))
        .route("/secondary-outbound/summary", get(summary))
}

pub async fn ship(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::OutboundBody>,
) -> axum::response::Response {
    ship_via(&services, body, OutboundChannel::Secondary).await
}

/// Total shipped per title through the secondary channel, by ISBN.
pub async fn summary(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.secondary_summary().await {
        Ok(rows) => {
            let items: Vec<_> = rows.iter().map(dto::summary_to_json).collect();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::stock_error_to_response(e),
    }
}
