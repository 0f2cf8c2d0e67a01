use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use bookstock_api::app::services::{AppServices, build_in_memory_services};
use bookstock_api::config::AppConfig;

struct TestServer {
    base_url: String,
    services: Arc<AppServices>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod over an in-memory ledger, bound to an ephemeral port.
        let services = Arc::new(build_in_memory_services(&AppConfig::default()));
        let app = bookstock_api::app::router_with(services.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            services,
            handle,
        }
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn get_json(&self, path: &str) -> serde_json::Value {
        let res = reqwest::Client::new()
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "GET {path}");
        res.json().await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn receive_book_a(srv: &TestServer) {
    let res = srv
        .post(
            "/inbound",
            json!({ "isbn": "222", "title": "Book A", "author": "X", "price": 1000, "quantity": 10 }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_is_public_and_tagged_with_request_id() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn inbound_of_new_isbn_creates_row_and_in_record() {
    let srv = TestServer::spawn().await;

    let res = srv
        .post(
            "/inbound",
            json!({ "isbn": "222", "title": "Book A", "author": "X", "price": 1000, "quantity": 10 }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["row"]["quantity"], 10);
    assert_eq!(body["transaction"]["change"], 10);
    assert_eq!(body["transaction"]["type"], "IN");

    let stock = srv.get_json("/stock").await;
    assert_eq!(
        stock["items"],
        json!([{ "isbn": "222", "title": "Book A", "author": "X", "price": 1000, "quantity": 10 }])
    );

    let history = srv.get_json("/inbound/history").await;
    let items = history["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["change"], 10);
}

#[tokio::test]
async fn inbound_of_new_isbn_without_details_is_rejected() {
    let srv = TestServer::spawn().await;

    let res = srv.post("/inbound", json!({ "isbn": "333", "quantity": 2 })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "missing_required_field");

    let stock = srv.get_json("/stock").await;
    assert!(stock["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn restock_only_needs_isbn_and_quantity() {
    let srv = TestServer::spawn().await;
    receive_book_a(&srv).await;

    let res = srv.post("/inbound", json!({ "isbn": "222", "quantity": 5 })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["row"]["quantity"], 15);
}

#[tokio::test]
async fn outbound_over_stock_is_rejected_without_side_effects() {
    let srv = TestServer::spawn().await;
    receive_book_a(&srv).await;

    let res = srv.post("/outbound", json!({ "isbn": "222", "quantity": 15 })).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_stock");

    let stock = srv.get_json("/stock").await;
    assert_eq!(stock["items"][0]["quantity"], 10);
    let history = srv.get_json("/outbound/history").await;
    assert!(history["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn outbound_of_unregistered_isbn_is_not_found() {
    let srv = TestServer::spawn().await;

    let res = srv.post("/outbound", json!({ "isbn": "999", "quantity": 1 })).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "unknown_identifier");
}

#[tokio::test]
async fn secondary_outbound_feeds_the_summary() {
    let srv = TestServer::spawn().await;
    receive_book_a(&srv).await;

    for quantity in [3, 2] {
        let res = srv
            .post("/secondary-outbound", json!({ "isbn": "222", "quantity": quantity }))
            .await;
        assert_eq!(res.status(), StatusCode::OK);
    }
    let res = srv.post("/outbound", json!({ "isbn": "222", "quantity": 1 })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let summary = srv.get_json("/secondary-outbound/summary").await;
    assert_eq!(
        summary["items"],
        json!([{ "isbn": "222", "title": "Book A", "total_quantity": 5 }])
    );

    let stock = srv.get_json("/stock").await;
    assert_eq!(stock["items"][0]["quantity"], 4);
}

#[tokio::test]
async fn store_outage_surfaces_as_persistence_error() {
    let srv = TestServer::spawn().await;
    let store = srv.services.in_memory_store().unwrap().clone();

    store.set_unavailable(true);
    let res = srv
        .post(
            "/inbound",
            json!({ "isbn": "1", "title": "T", "author": "A", "price": 0, "quantity": 1 }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "persistence_error");

    store.set_unavailable(false);
    let res = reqwest::Client::new()
        .post(format!("{}/refresh", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn non_positive_quantity_is_a_validation_error() {
    let srv = TestServer::spawn().await;
    receive_book_a(&srv).await;

    let res = srv.post("/outbound", json!({ "isbn": "222", "quantity": 0 })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}
