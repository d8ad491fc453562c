//! Message endpoint integration tests

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::common::{error_code, TestApp};

fn messages_uri(conversation_id: Uuid) -> String {
    format!("/conversations/{}/messages", conversation_id)
}

mod test_post_and_read {
    use super::*;

    #[tokio::test]
    async fn test_create_message_returns_201() {
        let app = TestApp::new().await.unwrap();
        let alice = app.register("Alice").await;
        let conversation_id = app.create_conversation(&alice, &[]).await;

        let (status, body) = app
            .post(
                &messages_uri(conversation_id),
                &alice.token,
                json!({ "content": "  hello  " }),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["content"], "hello");
        assert_eq!(body["conversation_id"], json!(conversation_id));
        assert_eq!(body["author"]["id"], json!(alice.id));
        assert_eq!(body["author"]["name"], "Alice");
        assert!(body["reply_to_id"].is_null());
        assert!(body["reply_to"].is_null());
        assert!(body["edited_at"].is_null());
    }

    #[tokio::test]
    async fn test_blank_content_returns_422() {
        let app = TestApp::new().await.unwrap();
        let alice = app.register("Alice").await;
        let conversation_id = app.create_conversation(&alice, &[]).await;

        let (status, body) = app
            .post(&messages_uri(conversation_id), &alice.token, json!({ "content": "   " }))
            .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"]["fields"]["content"].is_array());
    }

    #[tokio::test]
    async fn test_non_participant_cannot_post_or_read() {
        let app = TestApp::new().await.unwrap();
        let alice = app.register("Alice").await;
        let mallory = app.register("Mallory").await;
        let conversation_id = app.create_conversation(&alice, &[]).await;
        let message_id = app.post_message(conversation_id, &alice, "private", None).await;

        let (status, body) = app
            .post(&messages_uri(conversation_id), &mallory.token, json!({ "content": "hi" }))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(error_code(&body), "NOT_A_PARTICIPANT");

        let (status, _) = app.get(&messages_uri(conversation_id), &mallory.token).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app
            .get(&format!("/messages/{}", message_id), &mallory.token)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = app
            .get(&format!("/messages/{}", Uuid::new_v4()), &alice.token)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_code(&body), "MESSAGE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_pagination_newest_first() {
        let app = TestApp::new().await.unwrap();
        let alice = app.register("Alice").await;
        let conversation_id = app.create_conversation(&alice, &[]).await;
        for i in 0..120 {
            app.post_message(conversation_id, &alice, &format!("message {}", i), None)
                .await;
        }
        let uri = messages_uri(conversation_id);

        let (status, page1) = app.get(&format!("{}?page=1", uri), &alice.token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page1["data"].as_array().unwrap().len(), 50);
        assert_eq!(page1["data"][0]["content"], "message 119");
        assert_eq!(page1["meta"]["total"], 120);
        assert_eq!(page1["meta"]["page_size"], 50);
        assert_eq!(page1["meta"]["last_page"], 3);

        let (_, page2) = app.get(&format!("{}?page=2", uri), &alice.token).await;
        assert_eq!(page2["data"].as_array().unwrap().len(), 50);
        assert_eq!(page2["data"][0]["content"], "message 69");

        let (_, page3) = app.get(&format!("{}?page=3", uri), &alice.token).await;
        assert_eq!(page3["data"].as_array().unwrap().len(), 20);
        assert_eq!(page3["data"][19]["content"], "message 0");

        let (_, custom) = app
            .get(&format!("{}?page=2&page_size=500", uri), &alice.token)
            .await;
        assert_eq!(custom["meta"]["page_size"], 100);
        assert_eq!(custom["data"].as_array().unwrap().len(), 20);
    }
}

mod test_replies {
    use super::*;

    #[tokio::test]
    async fn test_reply_includes_summary() {
        let app = TestApp::new().await.unwrap();
        let a = app.register("A").await;
        let b = app.register("B").await;
        let conversation_id = app.create_conversation(&a, &[&b]).await;
        let hello = app.post_message(conversation_id, &a, "hello", None).await;

        let (status, body) = app
            .post(
                &messages_uri(conversation_id),
                &b.token,
                json!({ "content": "hi back", "reply_to_id": hello }),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["reply_to_id"], json!(hello));
        assert_eq!(body["reply_to"]["id"], json!(hello));
        assert_eq!(body["reply_to"]["content"], "hello");
        assert_eq!(body["reply_to"]["author"]["id"], json!(a.id));
        assert_eq!(body["reply_to"]["author"]["name"], "A");
        assert!(body["reply_to"].get("reply_to").is_none());
    }

    #[tokio::test]
    async fn test_reply_target_errors() {
        let app = TestApp::new().await.unwrap();
        let a = app.register("A").await;
        let first = app.create_conversation(&a, &[]).await;
        let second = app.create_conversation(&a, &[]).await;
        let elsewhere = app.post_message(second, &a, "elsewhere", None).await;

        let (status, body) = app
            .post(
                &messages_uri(first),
                &a.token,
                json!({ "content": "cross", "reply_to_id": elsewhere }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "REPLY_TARGET_CROSS_CONVERSATION");

        let (status, body) = app
            .post(
                &messages_uri(first),
                &a.token,
                json!({ "content": "nothing", "reply_to_id": Uuid::new_v4() }),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_code(&body), "REPLY_TARGET_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_reply_survives_target_deletion() {
        let app = TestApp::new().await.unwrap();
        let a = app.register("A").await;
        let b = app.register("B").await;
        let conversation_id = app.create_conversation(&a, &[&b]).await;
        let root = app.post_message(conversation_id, &a, "root", None).await;
        let reply = app
            .post_message(conversation_id, &b, "reply", Some(root))
            .await;

        let (status, _) = app.delete(&format!("/messages/{}", root), &a.token).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = app.get(&format!("/messages/{}", reply), &b.token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"], "reply");
        assert!(body["reply_to_id"].is_null());
        assert!(body["reply_to"].is_null());
    }
}

mod test_ownership {
    use super::*;

    #[tokio::test]
    async fn test_only_author_may_edit_or_delete() {
        let app = TestApp::new().await.unwrap();
        let alice = app.register("Alice").await;
        let bob = app.register("Bob").await;
        let conversation_id = app.create_conversation(&alice, &[&bob]).await;
        let message_id = app.post_message(conversation_id, &alice, "original", None).await;
        let uri = format!("/messages/{}", message_id);

        let (status, body) = app.put(&uri, &bob.token, json!({ "content": "hijack" })).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(error_code(&body), "NOT_MESSAGE_OWNER");

        let (status, body) = app.delete(&uri, &bob.token).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(error_code(&body), "NOT_MESSAGE_OWNER");

        let (status, body) = app.put(&uri, &alice.token, json!({ "content": "edited" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"], "edited");
        assert!(body["edited_at"].is_string());

        let (status, _) = app.delete(&uri, &alice.token).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = app.delete(&uri, &alice.token).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_code(&body), "MESSAGE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_removed_author_cannot_edit() {
        let app = TestApp::new().await.unwrap();
        let alice = app.register("Alice").await;
        let bob = app.register("Bob").await;
        let conversation_id = app.create_conversation(&alice, &[&bob]).await;
        let message_id = app.post_message(conversation_id, &bob, "mine", None).await;

        let (status, _) = app
            .delete(
                &format!("/conversations/{}/participants/{}", conversation_id, bob.id),
                &alice.token,
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app
            .put(
                &format!("/messages/{}", message_id),
                &bob.token,
                json!({ "content": "changed" }),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(error_code(&body), "NOT_A_PARTICIPANT");
    }
}
