// src/tui/data.rs — Data loading for the dashboard screens
//
// Every screen renders from a `DashboardData` snapshot filled through the
// query cache, so switching back to a screen within the staleness window
// costs nothing and concurrent refreshes collapse to one request.

use crate::api::types::*;
use crate::api::ApiClient;
use crate::cache::QueryCache;
use crate::infra::errors::PulsedeckError;
use crate::tui::router::Screen;

// Logical resource identifiers, shared by the TUI and the CLI commands so
// both hit the same cache entries.
pub const KEY_SUMMARY: &str = "dashboard-summary";
pub const KEY_ACCOUNTS: &str = "accounts";
pub const KEY_CONTENT: &str = "content";
pub const KEY_FUNNEL: &str = "funnel";
pub const KEY_PLATFORMS: &str = "platforms";
pub const KEY_NICHES: &str = "niches";

pub fn revenue_key(period: &str) -> String {
    format!("revenue-{period}")
}

/// Snapshot of everything the screens render. Fields stay `None`/empty
/// until their screen has been visited.
#[derive(Default)]
pub struct DashboardData {
    pub summary: Option<DashboardSummary>,
    pub accounts: Vec<Account>,
    pub content: Vec<ContentItem>,
    pub revenue: Option<RevenueStats>,
    pub revenue_period: String,
    pub platforms: Vec<PlatformStats>,
    pub funnel: Option<FunnelStats>,
    pub niches: Vec<Niche>,
    /// Error from the most recent load, shown in the footer.
    pub load_error: Option<String>,
}

pub async fn fetch_summary(
    cache: &QueryCache,
    api: &ApiClient,
) -> Result<DashboardSummary, PulsedeckError> {
    let api = api.clone();
    cache
        .fetch(KEY_SUMMARY, move || {
            let api = api.clone();
            async move { api.dashboard_summary().await }
        })
        .await
}

pub async fn fetch_accounts(
    cache: &QueryCache,
    api: &ApiClient,
) -> Result<Vec<Account>, PulsedeckError> {
    let api = api.clone();
    cache
        .fetch(KEY_ACCOUNTS, move || {
            let api = api.clone();
            async move { api.accounts().await }
        })
        .await
}

pub async fn fetch_content(
    cache: &QueryCache,
    api: &ApiClient,
) -> Result<Vec<ContentItem>, PulsedeckError> {
    let api = api.clone();
    cache
        .fetch(KEY_CONTENT, move || {
            let api = api.clone();
            async move { api.content().await }
        })
        .await
}

pub async fn fetch_funnel(
    cache: &QueryCache,
    api: &ApiClient,
) -> Result<FunnelStats, PulsedeckError> {
    let api = api.clone();
    cache
        .fetch(KEY_FUNNEL, move || {
            let api = api.clone();
            async move { api.funnel().await }
        })
        .await
}

pub async fn fetch_platforms(
    cache: &QueryCache,
    api: &ApiClient,
) -> Result<Vec<PlatformStats>, PulsedeckError> {
    let api = api.clone();
    cache
        .fetch(KEY_PLATFORMS, move || {
            let api = api.clone();
            async move { api.platforms().await }
        })
        .await
}

pub async fn fetch_revenue(
    cache: &QueryCache,
    api: &ApiClient,
    period: &str,
) -> Result<RevenueStats, PulsedeckError> {
    let api = api.clone();
    let period_owned = period.to_string();
    cache
        .fetch(&revenue_key(period), move || {
            let api = api.clone();
            let period = period_owned.clone();
            async move { api.revenue(&period).await }
        })
        .await
}

pub async fn fetch_niches(
    cache: &QueryCache,
    api: &ApiClient,
) -> Result<Vec<Niche>, PulsedeckError> {
    let api = api.clone();
    cache
        .fetch(KEY_NICHES, move || {
            let api = api.clone();
            async move { api.niches().await }
        })
        .await
}

/// Cache keys a screen renders from, for targeted refresh ('r').
pub fn keys_for_screen(screen: Screen, revenue_period: &str) -> Vec<String> {
    match screen {
        Screen::Overview => vec![KEY_SUMMARY.into()],
        Screen::Accounts => vec![KEY_ACCOUNTS.into()],
        Screen::Content => vec![KEY_CONTENT.into()],
        Screen::Analytics => vec![revenue_key(revenue_period), KEY_PLATFORMS.into()],
        Screen::Funnel => vec![KEY_FUNNEL.into()],
        Screen::Niches => vec![KEY_NICHES.into()],
        Screen::Login | Screen::Assistant => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revenue_key_embeds_period() {
        assert_eq!(revenue_key("month"), "revenue-month");
        assert_eq!(revenue_key("day"), "revenue-day");
    }

    #[test]
    fn test_keys_for_screen() {
        assert_eq!(keys_for_screen(Screen::Overview, "month"), vec![KEY_SUMMARY]);
        assert_eq!(
            keys_for_screen(Screen::Analytics, "week"),
            vec!["revenue-week".to_string(), KEY_PLATFORMS.to_string()]
        );
        assert!(keys_for_screen(Screen::Login, "month").is_empty());
    }
}
