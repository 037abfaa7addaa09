//! Shared helpers for daemon integration tests
#![allow(dead_code)]

use std::net::SocketAddr;

use axum::body::Body;
use axum::Router;
use http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower::ServiceExt;
use url::Url;

use ::common::prelude::SeedConfig;
use filetree_daemon::content_store::ObjectContentStore;
use filetree_daemon::database::Database;
use filetree_daemon::http_server;
use filetree_daemon::ServiceState;

pub const BOUNDARY: &str = "filetree-test-boundary";

pub async fn memory_database() -> Database {
    let url = Url::parse("sqlite::memory:").unwrap();
    Database::connect(&url).await.unwrap()
}

/// Service state over an in-memory database and content store
pub async fn setup_state() -> ServiceState {
    ServiceState::from_parts(
        memory_database().await,
        ObjectContentStore::memory(),
        SeedConfig::default(),
        2,
    )
}

pub fn setup_router(state: ServiceState) -> Router {
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    http_server::router(http_server::Config::new(addr), state)
}

/// Thin driver that fires one request at a time through the router
#[derive(Clone)]
pub struct TestApp {
    pub state: ServiceState,
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "body is not the expected json ({}): {}",
                e,
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn value(&self) -> Value {
        self.json()
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }
}

impl TestApp {
    pub async fn new() -> Self {
        let state = setup_state().await;
        let router = setup_router(state.clone());
        Self { state, router }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec();
        TestResponse {
            status,
            content_type,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(header::ACCEPT, "application/json")
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn json(&self, method: Method, uri: &str, body: Value) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn upload(&self, method: Method, uri: &str, name: &str, data: &[u8]) -> TestResponse {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
                name
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Root container id, bootstrapping the tree if needed
    pub async fn root_id(&self) -> String {
        let response = self.get("/root").await;
        assert_eq!(response.status, StatusCode::OK);
        response.value()["rootId"].as_str().unwrap().to_string()
    }
}
