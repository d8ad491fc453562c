//! Authentication endpoint integration tests

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::json;

use crate::common::{error_code, json_request, TestApp, TEST_PASSWORD};

mod test_register {
    use super::*;

    #[tokio::test]
    async fn test_register_returns_user_and_token() {
        let app = TestApp::new().await.unwrap();

        let (status, body) = app
            .send(json_request(
                Method::POST,
                "/auth/register",
                json!({ "name": "Alice", "email": "  Alice@Example.COM ", "password": TEST_PASSWORD }),
            ))
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["email"], "alice@example.com");
        assert_eq!(body["user"]["is_guest"], false);
        assert!(body["user"].get("password_hash").is_none());
        assert_eq!(body["token"]["token_type"], "Bearer");
        assert_eq!(body["token"]["kind"], "user");
        assert_eq!(body["token"]["abilities"], json!(["*"]));
        assert!(body["token"]["access_token"].as_str().unwrap().contains('|'));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_returns_422() {
        let app = TestApp::new().await.unwrap();
        let alice = app.register("Alice").await;

        let (status, body) = app
            .send(json_request(
                Method::POST,
                "/auth/register",
                json!({ "name": "Other", "email": alice.email.to_uppercase(), "password": TEST_PASSWORD }),
            ))
            .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"]["fields"]["email"].is_array());
    }

    #[tokio::test]
    async fn test_register_validation_errors() {
        let app = TestApp::new().await.unwrap();

        let (status, body) = app
            .send(json_request(
                Method::POST,
                "/auth/register",
                json!({ "name": "", "email": "not-an-email", "password": "short" }),
            ))
            .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error_code(&body), "VALIDATION_ERROR");
        for field in ["name", "email", "password"] {
            assert!(body["error"]["fields"][field].is_array(), "missing {}", field);
        }
    }

    #[tokio::test]
    async fn test_register_whitespace_name_returns_422() {
        let app = TestApp::new().await.unwrap();

        let (status, body) = app
            .send(json_request(
                Method::POST,
                "/auth/register",
                json!({ "name": "   ", "email": "blank@example.com", "password": TEST_PASSWORD }),
            ))
            .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"]["fields"]["name"].is_array());
        assert!(body["error"]["fields"].get("email").is_none());
    }
}

mod test_login {
    use super::*;

    #[tokio::test]
    async fn test_login_success() {
        let app = TestApp::new().await.unwrap();
        let alice = app.register("Alice").await;

        let (status, body) = app
            .send(json_request(
                Method::POST,
                "/auth/login",
                json!({ "email": alice.email, "password": TEST_PASSWORD }),
            ))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["id"], json!(alice.id));
        assert_ne!(body["token"]["access_token"], json!(alice.token));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let app = TestApp::new().await.unwrap();
        let alice = app.register("Alice").await;

        let (wrong_status, wrong_body) = app
            .send(json_request(
                Method::POST,
                "/auth/login",
                json!({ "email": alice.email, "password": "wrong-password" }),
            ))
            .await;
        let (unknown_status, unknown_body) = app
            .send(json_request(
                Method::POST,
                "/auth/login",
                json!({ "email": "nobody@example.com", "password": TEST_PASSWORD }),
            ))
            .await;

        assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_body, unknown_body);
        assert_eq!(error_code(&wrong_body), "INVALID_CREDENTIALS");
    }
}

mod test_tokens {
    use super::*;

    #[tokio::test]
    async fn test_missing_and_malformed_tokens_return_401() {
        let app = TestApp::new().await.unwrap();

        let request = Request::get("/conversations").body(Body::empty()).unwrap();
        let (status, body) = app.send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(&body), "MISSING_AUTHORIZATION");

        let (status, _) = app.get("/conversations", "garbage").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let alice = app.register("Alice").await;
        let (id, _) = alice.token.split_once('|').unwrap();
        let forged = format!("{}|{}", id, "x".repeat(40));
        let (status, body) = app.get("/conversations", &forged).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(&body), "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn test_expired_token_returns_401() {
        let app = TestApp::new().await.unwrap();
        let alice = app.register("Alice").await;

        sqlx::query("UPDATE access_tokens SET expires_at = ?")
            .bind("2000-01-01T00:00:00Z")
            .execute(&app.pool)
            .await
            .unwrap();

        let (status, body) = app.get("/conversations", &alice.token).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(&body), "TOKEN_EXPIRED");
    }

    #[tokio::test]
    async fn test_me_returns_token_metadata() {
        let app = TestApp::new().await.unwrap();
        let alice = app.register("Alice").await;

        let (status, body) = app.get("/auth/me", &alice.token).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["name"], "Alice");
        assert_eq!(body["token"]["kind"], "user");
        assert!(body["token"].get("access_token").is_none());
    }

    #[tokio::test]
    async fn test_refresh_revokes_current_token_by_default() {
        let app = TestApp::new().await.unwrap();
        let alice = app.register("Alice").await;

        let (status, body) = app.post("/auth/refresh", &alice.token, json!({})).await;
        assert_eq!(status, StatusCode::OK);
        let fresh = body["token"]["access_token"].as_str().unwrap().to_string();

        let (status, _) = app.get("/auth/me", &alice.token).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = app.get("/auth/me", &fresh).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_refresh_can_keep_current_token() {
        let app = TestApp::new().await.unwrap();
        let alice = app.register("Alice").await;

        let (status, body) = app
            .post("/auth/refresh?revoke_current=false", &alice.token, json!({}))
            .await;
        assert_eq!(status, StatusCode::OK);
        let fresh = body["token"]["access_token"].as_str().unwrap().to_string();

        assert_eq!(app.get("/auth/me", &alice.token).await.0, StatusCode::OK);
        assert_eq!(app.get("/auth/me", &fresh).await.0, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_logout_revokes_only_presented_token() {
        let app = TestApp::new().await.unwrap();
        let alice = app.register("Alice").await;
        let (_, body) = app
            .send(json_request(
                Method::POST,
                "/auth/login",
                json!({ "email": alice.email, "password": TEST_PASSWORD }),
            ))
            .await;
        let second = body["token"]["access_token"].as_str().unwrap().to_string();

        let (status, body) = app.post("/auth/logout", &alice.token, json!({})).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_null());

        assert_eq!(
            app.get("/auth/me", &alice.token).await.0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(app.get("/auth/me", &second).await.0, StatusCode::OK);
    }
}

mod test_guest {
    use super::*;

    #[tokio::test]
    async fn test_guest_without_body() {
        let app = TestApp::new().await.unwrap();

        let request = Request::post("/auth/guest").body(Body::empty()).unwrap();
        let (status, body) = app.send(request).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["is_guest"], true);
        assert_eq!(body["user"]["name"], "Guest");
        assert_eq!(body["token"]["kind"], "guest");
        assert!(body["token"]["expires_at"].is_string());
    }

    #[tokio::test]
    async fn test_guest_cannot_manage_conversations() {
        let app = TestApp::new().await.unwrap();
        let guest = app.guest("Visitor").await;

        let (status, body) = app
            .post("/conversations", &guest.token, json!({ "name": "Mine" }))
            .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(error_code(&body), "INSUFFICIENT_SCOPE");
    }

    #[tokio::test]
    async fn test_guest_can_chat_once_added() {
        let app = TestApp::new().await.unwrap();
        let alice = app.register("Alice").await;
        let guest = app.guest("Visitor").await;
        let conversation_id = app.create_conversation(&alice, &[&guest]).await;

        let (status, body) = app.get("/conversations", &guest.token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        app.post_message(conversation_id, &guest, "hello from a guest", None)
            .await;

        let (status, body) = app
            .post(
                &format!("/conversations/{}/participants", conversation_id),
                &guest.token,
                json!({ "user_id": alice.id }),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(error_code(&body), "INSUFFICIENT_SCOPE");
    }
}
