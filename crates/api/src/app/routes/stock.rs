use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/stock", get(current_stock))
        .route("/refresh", post(refresh))
}

pub async fn current_stock(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.current_stock().await {
        Ok(table) => {
            let items: Vec<_> = table.rows().map(dto::row_to_json).collect();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::stock_error_to_response(e),
    }
}

/// Drop cached snapshots so the next read sees writes made elsewhere.
pub async fn refresh(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.refresh().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}
