// src/api/types.rs — Typed payloads for the platform API
//
// The backend is loose about shapes, so every response record tolerates
// unknown fields and defaults the optional ones. Normalization happens here,
// at the client boundary, so nothing downstream handles raw JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `POST /auth/login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".into()
}

/// `GET /users/me`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// `GET /analytics/dashboard`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardSummary {
    #[serde(default)]
    pub total_accounts: u64,
    #[serde(default)]
    pub active_accounts: u64,
    #[serde(default)]
    pub total_followers: u64,
    #[serde(default)]
    pub followers_growth: i64,

    #[serde(default)]
    pub total_content: u64,
    #[serde(default)]
    pub scheduled_content: u64,
    #[serde(default)]
    pub published_today: u64,

    #[serde(default)]
    pub total_leads: u64,
    #[serde(default)]
    pub new_leads_today: u64,
    #[serde(default)]
    pub conversion_rate: f64,

    #[serde(default)]
    pub revenue_today: f64,
    #[serde(default)]
    pub revenue_month: f64,
    #[serde(default)]
    pub expenses_month: f64,
    #[serde(default)]
    pub profit_month: f64,

    #[serde(default)]
    pub accounts_needing_attention: u64,
    #[serde(default)]
    pub failed_publications: u64,

    #[serde(default)]
    pub platforms_stats: Vec<PlatformStats>,
}

/// `GET /analytics/platforms` (also embedded in the dashboard summary)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformStats {
    pub platform: String,
    #[serde(default)]
    pub accounts_count: u64,
    #[serde(default)]
    pub total_followers: u64,
    #[serde(default)]
    pub total_views: u64,
    #[serde(default)]
    pub total_engagement: u64,
    #[serde(default)]
    pub avg_engagement_rate: f64,
    #[serde(default)]
    pub publications_count: u64,
}

/// `GET /analytics/funnel`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunnelStats {
    #[serde(default)]
    pub total_leads: u64,
    #[serde(default)]
    pub new_leads: u64,
    #[serde(default)]
    pub engaged_leads: u64,
    #[serde(default)]
    pub interested_leads: u64,
    #[serde(default)]
    pub ready_to_buy: u64,
    #[serde(default)]
    pub converted: u64,
    #[serde(default)]
    pub lost: u64,
    #[serde(default)]
    pub conversion_rate: f64,
}

impl FunnelStats {
    /// Stage counts top-to-bottom for funnel rendering.
    pub fn stages(&self) -> [(&'static str, u64); 6] {
        [
            ("new", self.new_leads),
            ("engaged", self.engaged_leads),
            ("interested", self.interested_leads),
            ("ready to buy", self.ready_to_buy),
            ("converted", self.converted),
            ("lost", self.lost),
        ]
    }
}

/// `GET /analytics/revenue?period=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevenueStats {
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub total_commission: f64,
    #[serde(default)]
    pub total_expenses: f64,
    #[serde(default)]
    pub net_profit: f64,
    #[serde(default)]
    pub roi: f64,
    #[serde(default)]
    pub conversions_count: u64,
    #[serde(default)]
    pub avg_order_value: f64,
}

/// `GET /accounts`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub platform: String,
    pub username: String,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub total_posts: u64,
    #[serde(default)]
    pub engagement_rate: Option<f64>,
    #[serde(default)]
    pub health_score: u32,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub posts_today: u32,
    #[serde(default)]
    pub last_posted_at: Option<DateTime<Utc>>,
}

/// `GET /accounts/{id}/stats`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountStats {
    pub id: String,
    pub platform: String,
    pub username: String,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub total_views: u64,
    #[serde(default)]
    pub total_engagement: u64,
}

/// `GET /content`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub hook: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub scheduled_for: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ai_model: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// `POST /content/generate`
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub niche_id: String,
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

/// `GET /niches`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Niche {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub potential_score: Option<u32>,
    #[serde(default)]
    pub competition_level: Option<String>,
    #[serde(default)]
    pub trend: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub content_pillars: Vec<String>,
}

/// `POST /niches/analyze` — AI-backed analysis of a prospective niche.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NicheAnalysis {
    pub name: String,
    #[serde(default)]
    pub potential_score: u32,
    #[serde(default)]
    pub competition_level: String,
    #[serde(default)]
    pub trend: String,
    #[serde(default)]
    pub monthly_search_volume: u64,
    #[serde(default)]
    pub avg_product_price: f64,
    #[serde(default)]
    pub recommended_affiliates: Vec<String>,
    #[serde(default)]
    pub content_pillars: Vec<String>,
}

/// `POST /voice/query` and `POST /voice/speak`
///
/// `/voice/query` only fills `response`; `/voice/speak` echoes the
/// transcribed `query` and may attach base64-encoded reply audio.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoiceReply {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub response: String,
    /// Base64-encoded mp3, when the server synthesized speech.
    #[serde(default)]
    pub audio: Option<String>,
}
