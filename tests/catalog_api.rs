//! Catalog service end to end: in-process router on an ephemeral port, in-memory document
//! store, driven over HTTP with reqwest (and a WebSocket client for chat).

use commerce_services::transport::catalog::{self, chat::ChatHub, CatalogState};
use commerce_services::{CatalogService, MemoryDocumentStore};
use futures::{SinkExt, StreamExt};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio_tungstenite::tungstenite::Message;

struct TestServer {
    base_url: String,
    chat: ChatHub,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn start_server() -> TestServer {
    let chat = ChatHub::default();
    let state = CatalogState {
        catalog: CatalogService::new(Arc::new(MemoryDocumentStore::new())),
        chat: chat.clone(),
    };
    let router = catalog::create_router(state);

    // Bind to an ephemeral port so tests can run in parallel.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestServer {
        base_url: format!("127.0.0.1:{}", port),
        chat,
        handle,
    }
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.base_url, path)
    }
}

async fn post(client: &reqwest::Client, url: &str, body: Value) -> (StatusCode, Value) {
    let resp = client.post(url).json(&body).send().await.unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

async fn get(client: &reqwest::Client, url: &str) -> (StatusCode, Value) {
    let resp = client.get(url).send().await.unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

async fn delete(client: &reqwest::Client, url: &str) -> (StatusCode, Value) {
    let resp = client.delete(url).send().await.unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn product_listing_joins_categories() {
    let server = start_server().await;
    let client = reqwest::Client::new();

    let (status, tools) = post(&client, &server.url("/categories"), json!({"name": "Tools"})).await;
    assert_eq!(status, StatusCode::OK);
    let tools = tools["data"].clone();
    assert_eq!(tools["name"], "Tools");
    assert!(tools["id"].is_string());

    let (status, created) = post(
        &client,
        &server.url("/products"),
        json!({
            "name": "Hammer",
            "description": "Claw hammer",
            "price": 12.5,
            "categories": [tools["id"]]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let product = &created["data"];
    assert_eq!(product["name"], "Hammer");
    assert_eq!(product["description"], "Claw hammer");
    assert_eq!(product["price"], 12.5);
    assert_eq!(product["categories"], json!([tools["id"]]));

    let (status, listed) = get(&client, &server.url("/products")).await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed["data"].as_array().unwrap().clone();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["categories"], json!([tools]));
}

#[tokio::test]
async fn empty_catalog_lists_nothing() {
    let server = start_server().await;
    let client = reqwest::Client::new();

    let (status, body) = get(&client, &server.url("/products")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn invalid_product_reports_each_field() {
    let server = start_server().await;
    let client = reqwest::Client::new();

    let (status, body) = post(&client, &server.url("/products"), json!({"price": 3})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    let fields: Vec<&str> = body["data"]["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "description", "categories"]);

    let (status, body) = post(
        &client,
        &server.url("/products"),
        json!({"name": "Free", "description": "x", "price": 0, "categories": []}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["errors"][0]["field"], "price");

    let resp = client
        .post(server.url("/products"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_twice_returns_prior_state_then_404() {
    let server = start_server().await;
    let client = reqwest::Client::new();

    let (_, created) = post(
        &client,
        &server.url("/products"),
        json!({"name": "Saw", "description": "Hand saw", "price": 20, "categories": []}),
    )
    .await;
    let product = created["data"].clone();
    let id = product["id"].as_str().unwrap();

    let (status, fetched) = get(&client, &server.url(&format!("/products/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"], product);

    let (status, first) = delete(&client, &server.url(&format!("/products/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["data"], product);

    let (status, second) = delete(&client, &server.url(&format!("/products/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(second["error"], "product not found");

    let (status, _) = get(&client, &server.url(&format!("/products/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_id_is_a_validation_error() {
    let server = start_server().await;
    let client = reqwest::Client::new();

    let (status, body) = get(&client, &server.url("/products/not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["errors"][0]["field"], "id");
}

#[tokio::test]
async fn category_lifecycle() {
    let server = start_server().await;
    let client = reqwest::Client::new();

    let (_, created) = post(&client, &server.url("/categories"), json!({"name": "Garden"})).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, listed) = get(&client, &server.url("/categories")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["data"], json!([created["data"]]));

    let (status, _) = delete(&client, &server.url(&format!("/categories/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(&client, &server.url(&format!("/categories/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_ok() {
    let server = start_server().await;
    let (status, body) = get(&reqwest::Client::new(), &server.url("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn chat_rebroadcasts_to_every_client() {
    let server = start_server().await;
    let ws_url = format!("ws://{}/chat", server.base_url);

    let (mut alice, _) = tokio_tungstenite::connect_async(ws_url.as_str()).await.unwrap();
    let (mut bob, _) = tokio_tungstenite::connect_async(ws_url.as_str()).await.unwrap();

    // Wait until both sockets are subscribed on the server side.
    for _ in 0..50 {
        if server.chat.connections() == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(server.chat.connections(), 2);

    alice
        .send(Message::Text("hello from alice".to_string()))
        .await
        .unwrap();

    for socket in [&mut alice, &mut bob] {
        let msg = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("timed out waiting for broadcast")
            .unwrap()
            .unwrap();
        assert_eq!(msg, Message::Text("hello from alice".to_string()));
    }

    bob.close(None).await.unwrap();
    for _ in 0..50 {
        if server.chat.connections() == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(server.chat.connections(), 1);
}
