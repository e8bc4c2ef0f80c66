// src/api/mod.rs — HTTP client for the platform API
//
// One client instance is shared by every view. It joins paths onto the
// configured base URL, attaches the session credential as a bearer header,
// and maps failures into the PulsedeckError taxonomy. A 401 from any
// endpoint tears the session down before the error reaches the caller, so
// the router can only ever observe "logged out + Unauthorized".

pub mod types;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::infra::errors::PulsedeckError;
use crate::session::Session;
use types::*;

#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    session: Arc<Mutex<Session>>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        session: Arc<Mutex<Session>>,
        timeout: Duration,
    ) -> Result<Self, PulsedeckError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PulsedeckError::Config(format!("HTTP client init failed: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            session,
        })
    }

    pub fn session(&self) -> Arc<Mutex<Session>> {
        self.session.clone()
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Request builder with the current credential attached, if any.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.client.request(method, self.url(path));
        let token = self
            .session
            .lock()
            .expect("session lock poisoned")
            .token()
            .map(String::from);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        builder
    }

    /// Clear the session in memory and on disk. Called on any 401.
    fn teardown_session(&self) {
        let mut session = self.session.lock().expect("session lock poisoned");
        if let Err(e) = session.logout() {
            tracing::warn!("Failed to remove persisted session: {e}");
        }
    }

    /// Send a request and decode a JSON body, mapping failures to the error
    /// taxonomy. All endpoint methods funnel through here.
    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        endpoint: &str,
    ) -> Result<T, PulsedeckError> {
        let response = builder.send().await.map_err(|e| PulsedeckError::Transport {
            endpoint: endpoint.into(),
            message: e.to_string(),
            retriable: e.is_timeout() || e.is_connect(),
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::info!(endpoint, "Server rejected credential; clearing session");
            self.teardown_session();
            return Err(PulsedeckError::Unauthorized);
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(PulsedeckError::Api {
                endpoint: endpoint.into(),
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| PulsedeckError::Transport {
                endpoint: endpoint.into(),
                message: format!("invalid response body: {e}"),
                retriable: false,
            })
    }

    // ── Auth ────────────────────────────────────────────────────────

    /// Exchange credentials for a token. The caller follows up with `me()`
    /// and only then persists the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, PulsedeckError> {
        let builder = self
            .request(Method::POST, "/auth/login")
            .query(&[("email", email), ("password", password)]);
        self.send_json(builder, "/auth/login").await
    }

    pub async fn me(&self) -> Result<UserProfile, PulsedeckError> {
        self.send_json(self.request(Method::GET, "/users/me"), "/users/me")
            .await
    }

    /// `me()` with an explicit token, for the login flow before the session
    /// holds a credential.
    pub async fn me_with_token(&self, token: &str) -> Result<UserProfile, PulsedeckError> {
        let builder = self
            .client
            .get(self.url("/users/me"))
            .header("Authorization", format!("Bearer {token}"));
        self.send_json(builder, "/users/me").await
    }

    // ── Analytics ───────────────────────────────────────────────────

    pub async fn dashboard_summary(&self) -> Result<DashboardSummary, PulsedeckError> {
        self.send_json(
            self.request(Method::GET, "/analytics/dashboard"),
            "/analytics/dashboard",
        )
        .await
    }

    pub async fn funnel(&self) -> Result<FunnelStats, PulsedeckError> {
        self.send_json(
            self.request(Method::GET, "/analytics/funnel"),
            "/analytics/funnel",
        )
        .await
    }

    pub async fn revenue(&self, period: &str) -> Result<RevenueStats, PulsedeckError> {
        let builder = self
            .request(Method::GET, "/analytics/revenue")
            .query(&[("period", period)]);
        self.send_json(builder, "/analytics/revenue").await
    }

    pub async fn platforms(&self) -> Result<Vec<PlatformStats>, PulsedeckError> {
        self.send_json(
            self.request(Method::GET, "/analytics/platforms"),
            "/analytics/platforms",
        )
        .await
    }

    // ── Accounts / content / niches ─────────────────────────────────

    pub async fn accounts(&self) -> Result<Vec<Account>, PulsedeckError> {
        self.send_json(self.request(Method::GET, "/accounts"), "/accounts")
            .await
    }

    pub async fn account_stats(&self, id: &str) -> Result<AccountStats, PulsedeckError> {
        let path = format!("/accounts/{id}/stats");
        self.send_json(self.request(Method::GET, &path), &path).await
    }

    pub async fn content(&self) -> Result<Vec<ContentItem>, PulsedeckError> {
        self.send_json(self.request(Method::GET, "/content"), "/content")
            .await
    }

    /// Trigger AI content generation. The backend proxies a third-party
    /// generation service, so non-auth failures surface as ExternalService
    /// and never affect the session.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<ContentItem, PulsedeckError> {
        let builder = self.request(Method::POST, "/content/generate").json(request);
        self.send_json(builder, "/content/generate")
            .await
            .map_err(|e| as_external_service("content generation", e))
    }

    pub async fn niches(&self) -> Result<Vec<Niche>, PulsedeckError> {
        self.send_json(self.request(Method::GET, "/niches"), "/niches")
            .await
    }

    pub async fn analyze_niche(&self, name: &str) -> Result<NicheAnalysis, PulsedeckError> {
        let builder = self
            .request(Method::POST, "/niches/analyze")
            .query(&[("niche_name", name)]);
        self.send_json(builder, "/niches/analyze")
            .await
            .map_err(|e| as_external_service("niche analysis", e))
    }

    // ── Assistant ───────────────────────────────────────────────────

    pub async fn voice_query(&self, query: &str) -> Result<VoiceReply, PulsedeckError> {
        let builder = self
            .request(Method::POST, "/voice/query")
            .query(&[("query", query)]);
        self.send_json(builder, "/voice/query").await
    }

    /// Upload a recorded clip for transcription and response. Multipart;
    /// reqwest sets the Content-Type boundary itself.
    pub async fn voice_speak(&self, audio: Vec<u8>) -> Result<VoiceReply, PulsedeckError> {
        let part = reqwest::multipart::Part::bytes(audio)
            .file_name("clip.wav")
            .mime_str("audio/wav")
            .map_err(|e| PulsedeckError::Recording(format!("bad audio part: {e}")))?;
        let form = reqwest::multipart::Form::new().part("audio", part);
        let builder = self.request(Method::POST, "/voice/speak").multipart(form);
        self.send_json(builder, "/voice/speak").await
    }
}

/// Rewrap generation-endpoint failures as ExternalService, keeping
/// Unauthorized and transport errors intact for the retry/logout paths.
fn as_external_service(service: &str, err: PulsedeckError) -> PulsedeckError {
    match err {
        PulsedeckError::Api { message, .. } => PulsedeckError::ExternalService {
            service: service.into(),
            message,
        },
        other => other,
    }
}
