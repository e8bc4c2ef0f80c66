// tests/assistant_test.rs — Conversation flow against a local stub server

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use base64::Engine;
use pretty_assertions::assert_eq;
use serde_json::json;

use pulsedeck::api::types::UserProfile;
use pulsedeck::api::ApiClient;
use pulsedeck::assistant::{Conversation, Role, APOLOGY};
use pulsedeck::infra::errors::PulsedeckError;
use pulsedeck::session::Session;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: &str) -> ApiClient {
    let session = Arc::new(Mutex::new(Session {
        credential: Some("tok".into()),
        identity: Some(UserProfile {
            id: "u-1".into(),
            email: "ops@example.com".into(),
            name: None,
            created_at: None,
        }),
    }));
    ApiClient::new(base_url, session, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_reply_appended_on_success() {
    let router = Router::new().route(
        "/voice/query",
        post(|| async {
            Json(json!({"response": "Revenue is up 12% this week."}))
        }),
    );
    let base = serve(router).await;
    let mut conversation = Conversation::new(client(&base));

    conversation.submit("how is revenue?").await.unwrap();

    let messages = conversation.messages();
    // greeting, user turn, reply
    assert_eq!(messages.len(), 3);
    assert!(matches!(messages[1].role, Role::User));
    assert_eq!(messages[1].text, "how is revenue?");
    assert!(matches!(messages[2].role, Role::Assistant));
    assert_eq!(messages[2].text, "Revenue is up 12% this week.");
    assert!(!conversation.is_busy());
}

#[tokio::test]
async fn test_server_failure_becomes_apology() {
    let router = Router::new().route(
        "/voice/query",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base = serve(router).await;
    let mut conversation = Conversation::new(client(&base));

    // Failure is absorbed; the user sees an apology, not an error screen.
    conversation.submit("hello?").await.unwrap();

    let last = conversation.messages().last().unwrap();
    assert!(matches!(last.role, Role::Assistant));
    assert_eq!(last.text, APOLOGY);
    assert!(!conversation.is_busy());
}

#[tokio::test]
async fn test_unauthorized_propagates_without_apology() {
    let router = Router::new().route("/voice/query", post(|| async { StatusCode::UNAUTHORIZED }));
    let base = serve(router).await;
    let mut conversation = Conversation::new(client(&base));

    let before = conversation.messages().len();
    let err = conversation.submit("hello?").await.unwrap_err();
    assert!(matches!(err, PulsedeckError::Unauthorized));

    // The user turn is recorded but no apology is faked; the caller routes
    // to the login screen instead.
    let messages = conversation.messages();
    assert_eq!(messages.len(), before + 1);
    assert!(matches!(messages.last().unwrap().role, Role::User));
    assert!(!conversation.is_busy());
}

#[tokio::test]
async fn test_empty_input_rejected_locally() {
    // Unroutable base URL: a network call would fail loudly.
    let mut conversation = Conversation::new(client("http://127.0.0.1:1"));

    let err = conversation.submit("   ").await.unwrap_err();
    assert!(matches!(err, PulsedeckError::Validation(_)));
    assert_eq!(conversation.messages().len(), 1); // greeting only
}

#[tokio::test]
async fn test_voice_submission_decodes_reply_audio() {
    let mp3 = b"ID3fake-mp3-bytes".to_vec();
    let encoded = base64::engine::general_purpose::STANDARD.encode(&mp3);

    let router = Router::new().route(
        "/voice/speak",
        post(move || {
            let encoded = encoded.clone();
            async move {
                Json(json!({
                    "query": "what changed today",
                    "response": "Two accounts need attention.",
                    "audio": encoded,
                }))
            }
        }),
    );
    let base = serve(router).await;
    let mut conversation = Conversation::new(client(&base));

    let audio = conversation
        .submit_audio(b"RIFFfake-wav".to_vec())
        .await
        .unwrap();
    assert_eq!(audio, Some(mp3.clone()));

    let messages = conversation.messages();
    assert_eq!(messages[1].text, "what changed today");
    assert_eq!(messages[2].text, "Two accounts need attention.");
    assert_eq!(messages[2].audio, Some(mp3));
}

#[tokio::test]
async fn test_empty_recording_rejected() {
    let mut conversation = Conversation::new(client("http://127.0.0.1:1"));
    let err = conversation.submit_audio(Vec::new()).await.unwrap_err();
    assert!(matches!(err, PulsedeckError::Validation(_)));
}
