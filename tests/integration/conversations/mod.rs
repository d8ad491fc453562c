//! Conversation endpoint integration tests

use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::{error_code, TestApp};

fn participant_ids(body: &Value) -> Vec<Uuid> {
    body["participants"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().parse().unwrap())
        .collect()
}

mod test_create_conversation {
    use super::*;

    #[tokio::test]
    async fn test_create_returns_201_with_roster() {
        let app = TestApp::new().await.unwrap();
        let alice = app.register("Alice").await;
        let bob = app.register("Bob").await;

        let (status, body) = app
            .post(
                "/conversations",
                &alice.token,
                json!({
                    "name": "Team",
                    "description": "Daily chatter",
                    "participant_ids": [bob.id, bob.id, alice.id]
                }),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["name"], "Team");
        assert_eq!(body["description"], "Daily chatter");
        assert_eq!(body["created_by"], json!(alice.id));

        let ids = participant_ids(&body);
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&alice.id) && ids.contains(&bob.id));
        assert!(body["participants"][0]["joined_at"].is_string());
    }

    #[tokio::test]
    async fn test_create_without_fields() {
        let app = TestApp::new().await.unwrap();
        let alice = app.register("Alice").await;

        let (status, body) = app.post("/conversations", &alice.token, json!({})).await;

        assert_eq!(status, StatusCode::CREATED);
        assert!(body["name"].is_null());
        assert_eq!(participant_ids(&body), vec![alice.id]);
    }

    #[tokio::test]
    async fn test_create_with_unknown_participant_returns_400_and_persists_nothing() {
        let app = TestApp::new().await.unwrap();
        let alice = app.register("Alice").await;
        let ghost = Uuid::new_v4();

        let (status, body) = app
            .post(
                "/conversations",
                &alice.token,
                json!({ "name": "Ghost town", "participant_ids": [ghost] }),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "INVALID_PARTICIPANT");
        assert_eq!(body["error"]["invalid_ids"], json!([ghost]));

        let (_, list) = app.get("/conversations", &alice.token).await;
        assert!(list["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_name_too_long_returns_422() {
        let app = TestApp::new().await.unwrap();
        let alice = app.register("Alice").await;

        let (status, body) = app
            .post("/conversations", &alice.token, json!({ "name": "n".repeat(256) }))
            .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"]["fields"]["name"].is_array());
    }
}

mod test_list_and_show {
    use super::*;

    #[tokio::test]
    async fn test_list_visibility() {
        let app = TestApp::new().await.unwrap();
        let a = app.register("A").await;
        let b = app.register("B").await;
        let c = app.register("C").await;
        let d = app.register("D").await;
        let conversation_id = app.create_conversation(&a, &[&b, &c]).await;

        for user in [&a, &b, &c] {
            let (status, body) = app.get("/conversations", &user.token).await;
            assert_eq!(status, StatusCode::OK);
            let data = body["data"].as_array().unwrap();
            assert_eq!(data.len(), 1);
            assert_eq!(data[0]["id"], json!(conversation_id));
            assert_eq!(data[0]["participants"].as_array().unwrap().len(), 3);
        }

        let (status, body) = app.get("/conversations", &d.token).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_show_distinguishes_missing_from_forbidden() {
        let app = TestApp::new().await.unwrap();
        let alice = app.register("Alice").await;
        let mallory = app.register("Mallory").await;
        let conversation_id = app.create_conversation(&alice, &[]).await;

        let (status, body) = app
            .get(&format!("/conversations/{}", Uuid::new_v4()), &alice.token)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_code(&body), "CONVERSATION_NOT_FOUND");

        let (status, body) = app
            .get(&format!("/conversations/{}", conversation_id), &mallory.token)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(error_code(&body), "NOT_A_PARTICIPANT");

        let (status, body) = app
            .get(&format!("/conversations/{}", conversation_id), &alice.token)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], json!(conversation_id));
    }
}

mod test_update_and_delete {
    use super::*;

    #[tokio::test]
    async fn test_only_creator_may_update() {
        let app = TestApp::new().await.unwrap();
        let alice = app.register("Alice").await;
        let bob = app.register("Bob").await;
        let conversation_id = app.create_conversation(&alice, &[&bob]).await;
        let uri = format!("/conversations/{}", conversation_id);

        let (status, body) = app.put(&uri, &bob.token, json!({ "name": "Bob's" })).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(error_code(&body), "NOT_CREATOR");

        let (status, body) = app
            .put(&uri, &alice.token, json!({ "description": "Renamed later" }))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Test room");
        assert_eq!(body["description"], "Renamed later");
    }

    #[tokio::test]
    async fn test_only_creator_may_delete() {
        let app = TestApp::new().await.unwrap();
        let alice = app.register("Alice").await;
        let bob = app.register("Bob").await;
        let conversation_id = app.create_conversation(&alice, &[&bob]).await;
        let message_id = app.post_message(conversation_id, &bob, "hi", None).await;
        let uri = format!("/conversations/{}", conversation_id);

        let (status, body) = app.delete(&uri, &bob.token).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(error_code(&body), "NOT_CREATOR");

        let (status, body) = app.delete(&uri, &alice.token).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_null());

        let (status, _) = app.get(&uri, &alice.token).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app
            .get(&format!("/messages/{}", message_id), &bob.token)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_missing_conversation_is_forbidden() {
        let app = TestApp::new().await.unwrap();
        let alice = app.register("Alice").await;

        let (status, body) = app
            .delete(&format!("/conversations/{}", Uuid::new_v4()), &alice.token)
            .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(error_code(&body), "NOT_CREATOR");
    }
}
