//! Common test utilities for integration tests
//!
//! Every `TestApp` owns its own in-memory database, so tests never share state.

use anyhow::Result;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use threadline_common::config::Config;
use tower::ServiceExt;
use uuid::Uuid;

/// Password used for every registered test user
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// A registered user and their bearer token
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub token: String,
}

/// Test application with its own database
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        let pool = threadline_common::db::connect_in_memory().await?;
        let config = Config::from_lookup(|_| None)?;
        let router = threadline_app::create_app(&config, pool.clone());
        Ok(Self { router, pool })
    }

    /// Send a request and return the status with the parsed JSON body
    /// (`Value::Null` for empty bodies)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, parse_body(response).await)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(authed_request(Method::GET, uri, token, None)).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(authed_request(Method::POST, uri, token, Some(body)))
            .await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(authed_request(Method::PUT, uri, token, Some(body)))
            .await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(authed_request(Method::DELETE, uri, token, None))
            .await
    }

    /// Register a user through the API
    pub async fn register(&self, name: &str) -> TestUser {
        let email = format!("{}-{}@example.com", name.to_lowercase(), Uuid::new_v4().simple());
        let (status, body) = self
            .send(json_request(
                Method::POST,
                "/auth/register",
                json!({ "name": name, "email": email, "password": TEST_PASSWORD }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        TestUser {
            id: body["user"]["id"].as_str().unwrap().parse().unwrap(),
            name: name.to_string(),
            email,
            token: body["token"]["access_token"].as_str().unwrap().to_string(),
        }
    }

    /// Create a guest through the API
    pub async fn guest(&self, name: &str) -> TestUser {
        let (status, body) = self
            .send(json_request(
                Method::POST,
                "/auth/guest",
                json!({ "name": name }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "guest failed: {}", body);

        TestUser {
            id: body["user"]["id"].as_str().unwrap().parse().unwrap(),
            name: name.to_string(),
            email: body["user"]["email"].as_str().unwrap().to_string(),
            token: body["token"]["access_token"].as_str().unwrap().to_string(),
        }
    }

    /// Create a conversation owned by `creator`; returns its id
    pub async fn create_conversation(&self, creator: &TestUser, others: &[&TestUser]) -> Uuid {
        let ids: Vec<Uuid> = others.iter().map(|u| u.id).collect();
        let (status, body) = self
            .post(
                "/conversations",
                &creator.token,
                json!({ "name": "Test room", "participant_ids": ids }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
        body["id"].as_str().unwrap().parse().unwrap()
    }

    /// Post a message; returns its id
    pub async fn post_message(
        &self,
        conversation_id: Uuid,
        author: &TestUser,
        content: &str,
        reply_to_id: Option<Uuid>,
    ) -> Uuid {
        let (status, body) = self
            .post(
                &format!("/conversations/{}/messages", conversation_id),
                &author.token,
                json!({ "content": content, "reply_to_id": reply_to_id }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "post failed: {}", body);
        body["id"].as_str().unwrap().parse().unwrap()
    }
}

/// Build an authenticated request
pub fn authed_request(method: Method, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token));

    match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Build an unauthenticated JSON request
pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Parse response body as JSON (`Value::Null` when empty)
pub async fn parse_body(response: axum::http::Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&body).unwrap()
}

/// Error code from a standard error body
pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}
