// tests/api_test.rs — ApiClient behavior against a local stub server

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use serde_json::json;

use pulsedeck::api::types::UserProfile;
use pulsedeck::api::ApiClient;
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

fn identity() -> UserProfile {
    UserProfile {
        id: "u-1".into(),
        email: "ops@example.com".into(),
        name: None,
        created_at: None,
    }
}

fn logged_in_session(token: &str) -> Arc<Mutex<Session>> {
    Arc::new(Mutex::new(Session {
        credential: Some(token.into()),
        identity: Some(identity()),
    }))
}

fn client(base_url: &str, session: Arc<Mutex<Session>>) -> ApiClient {
    ApiClient::new(base_url, session, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_bearer_token_attached() {
    let router = Router::new().route(
        "/accounts",
        get(|headers: HeaderMap| async move {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("");
            if auth == "Bearer tok-abc" {
                Json(json!([])).into_response()
            } else {
                StatusCode::BAD_REQUEST.into_response()
            }
        }),
    );

    let base = serve(router).await;
    let api = client(&base, logged_in_session("tok-abc"));

    let accounts = api.accounts().await.unwrap();
    assert!(accounts.is_empty());
}

#[tokio::test]
async fn test_unauthorized_clears_session() {
    let router = Router::new().route("/accounts", get(|| async { StatusCode::UNAUTHORIZED }));
    let base = serve(router).await;

    let session = logged_in_session("tok-expired");
    let api = client(&base, session.clone());

    let err = api.accounts().await.unwrap_err();
    assert!(matches!(err, PulsedeckError::Unauthorized));

    // Credential and identity are both gone; the next render routes to login.
    let session = session.lock().unwrap();
    assert!(!session.is_authenticated());
    assert!(session.identity.is_none());
}

#[tokio::test]
async fn test_server_error_maps_to_api_error() {
    let router = Router::new().route(
        "/analytics/funnel",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = serve(router).await;
    let api = client(&base, logged_in_session("tok"));

    let err = api.funnel().await.unwrap_err();
    match &err {
        PulsedeckError::Api { status, message, .. } => {
            assert_eq!(*status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    // 5xx is worth one more attempt; 4xx is not.
    assert!(err.is_retriable());
}

#[tokio::test]
async fn test_client_error_not_retriable() {
    let router = Router::new().route(
        "/analytics/funnel",
        get(|| async { (StatusCode::UNPROCESSABLE_ENTITY, "bad period") }),
    );
    let base = serve(router).await;
    let api = client(&base, logged_in_session("tok"));

    let err = api.funnel().await.unwrap_err();
    assert!(!err.is_retriable());
}

#[tokio::test]
async fn test_connect_failure_is_retriable_transport() {
    // Nothing listens here.
    let api = client("http://127.0.0.1:1", logged_in_session("tok"));
    let err = api.accounts().await.unwrap_err();
    match err {
        PulsedeckError::Transport { retriable, .. } => assert!(retriable),
        other => panic!("expected Transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_non_retriable_transport() {
    let router = Router::new().route("/accounts", get(|| async { "not json" }));
    let base = serve(router).await;
    let api = client(&base, logged_in_session("tok"));

    let err = api.accounts().await.unwrap_err();
    match err {
        PulsedeckError::Transport { retriable, .. } => assert!(!retriable),
        other => panic!("expected Transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_login_sends_credentials_as_params() {
    #[derive(serde::Deserialize)]
    struct Creds {
        email: String,
        password: String,
    }

    let router = Router::new().route(
        "/auth/login",
        post(|Query(creds): Query<Creds>| async move {
            if creds.email == "ops@example.com" && creds.password == "hunter2" {
                Json(json!({"access_token": "tok-new"})).into_response()
            } else {
                StatusCode::UNAUTHORIZED.into_response()
            }
        }),
    );

    let base = serve(router).await;
    let api = client(&base, Arc::new(Mutex::new(Session::default())));

    let resp = api.login("ops@example.com", "hunter2").await.unwrap();
    assert_eq!(resp.access_token, "tok-new");
    assert_eq!(resp.token_type, "bearer");

    let err = api.login("ops@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, PulsedeckError::Unauthorized));
}

#[tokio::test]
async fn test_generation_failure_wrapped_as_external_service() {
    let router = Router::new().route(
        "/niches/analyze",
        post(|| async { (StatusCode::BAD_GATEWAY, "model overloaded") }),
    );
    let base = serve(router).await;
    let api = client(&base, logged_in_session("tok"));

    let err = api.analyze_niche("fitness").await.unwrap_err();
    match err {
        PulsedeckError::ExternalService { service, message } => {
            assert_eq!(service, "niche analysis");
            assert_eq!(message, "model overloaded");
        }
        other => panic!("expected ExternalService, got {other:?}"),
    }
}

#[tokio::test]
async fn test_generation_unauthorized_not_wrapped() {
    let router =
        Router::new().route("/niches/analyze", post(|| async { StatusCode::UNAUTHORIZED }));
    let base = serve(router).await;

    let session = logged_in_session("tok");
    let api = client(&base, session.clone());

    let err = api.analyze_niche("fitness").await.unwrap_err();
    assert!(matches!(err, PulsedeckError::Unauthorized));
    assert!(!session.lock().unwrap().is_authenticated());
}

#[tokio::test]
async fn test_voice_query_roundtrip() {
    #[derive(serde::Deserialize)]
    struct Q {
        query: String,
    }

    let router = Router::new().route(
        "/voice/query",
        post(|Query(q): Query<Q>| async move {
            Json(json!({
                "query": q.query,
                "response": "You gained 120 followers today.",
            }))
        }),
    );
    let base = serve(router).await;
    let api = client(&base, logged_in_session("tok"));

    let reply = api.voice_query("how are my accounts?").await.unwrap();
    assert_eq!(reply.query.as_deref(), Some("how are my accounts?"));
    assert_eq!(reply.response, "You gained 120 followers today.");
    assert!(reply.audio.is_none());
}
