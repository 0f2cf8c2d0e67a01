use axum::Router;

pub mod inbound;
pub mod outbound;
pub mod secondary;
pub mod stock;
pub mod system;

/// Router for the four ledger tabs plus cache control.
pub fn router() -> Router {
    Router::new()
        .merge(inbound::router())
        .merge(outbound::router())
        .merge(secondary::router())
        .merge(stock::router())
}
