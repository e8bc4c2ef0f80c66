// src/cli/show.rs — One-shot table printers (accounts, content, analytics, niches)

use crate::api::types::GenerateContentRequest;
use crate::api::ApiClient;
use crate::infra::errors::PulsedeckError;
use crate::util::truncate_str;

/// Remap an authorization failure to a friendly hint; everything else bubbles.
fn check_auth<T>(result: Result<T, PulsedeckError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(PulsedeckError::Unauthorized) => {
            eprintln!("Session expired. Run `pulsedeck login`.");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn accounts(api: &ApiClient, with_stats: bool) -> anyhow::Result<()> {
    let Some(accounts) = check_auth(api.accounts().await)? else {
        return Ok(());
    };
    if accounts.is_empty() {
        println!("No accounts.");
        return Ok(());
    }

    println!(
        "{:<10} {:<20} {:>10} {:>7} {:>7} {:<10}",
        "PLATFORM", "USERNAME", "FOLLOWERS", "POSTS", "HEALTH", "STATUS"
    );
    for a in &accounts {
        println!(
            "{:<10} {:<20} {:>10} {:>7} {:>7} {:<10}",
            a.platform,
            format!("@{}", a.username),
            a.followers,
            a.total_posts,
            a.health_score,
            a.status
        );
        if with_stats {
            if let Some(stats) = check_auth(api.account_stats(&a.id).await)? {
                println!(
                    "           views {} / engagement {}",
                    stats.total_views, stats.total_engagement
                );
            }
        }
    }
    Ok(())
}

pub async fn content_list(api: &ApiClient) -> anyhow::Result<()> {
    let Some(items) = check_auth(api.content().await)? else {
        return Ok(());
    };
    if items.is_empty() {
        println!("No content.");
        return Ok(());
    }

    println!("{:<10} {:<44} {:<11} {:<17}", "TYPE", "HOOK", "STATUS", "SCHEDULED");
    for c in &items {
        let scheduled = c
            .scheduled_for
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<10} {:<44} {:<11} {:<17}",
            c.content_type,
            truncate_str(c.hook.as_deref().unwrap_or("-"), 42),
            c.status,
            scheduled
        );
    }
    Ok(())
}

pub async fn content_generate(
    api: &ApiClient,
    niche_id: String,
    content_type: String,
    topic: Option<String>,
) -> anyhow::Result<()> {
    let request = GenerateContentRequest {
        niche_id,
        content_type,
        topic,
    };
    println!("Generating...");
    let Some(item) = check_auth(api.generate_content(&request).await)? else {
        return Ok(());
    };

    println!("Draft {} ({})", item.id, item.content_type);
    if let Some(hook) = &item.hook {
        println!("  Hook:    {hook}");
    }
    if let Some(caption) = &item.caption {
        println!("  Caption: {caption}");
    }
    if !item.hashtags.is_empty() {
        println!("  Tags:    {}", item.hashtags.join(" "));
    }
    Ok(())
}

pub async fn analytics(api: &ApiClient, period: &str) -> anyhow::Result<()> {
    let Some(revenue) = check_auth(api.revenue(period).await)? else {
        return Ok(());
    };

    println!("Revenue ({period})");
    println!("  Revenue:     ${:.2}", revenue.total_revenue);
    println!("  Commission:  ${:.2}", revenue.total_commission);
    println!("  Expenses:    ${:.2}", revenue.total_expenses);
    println!("  Net profit:  ${:.2}", revenue.net_profit);
    println!("  ROI:         {:.1}%", revenue.roi);
    println!("  Conversions: {}", revenue.conversions_count);

    let Some(platforms) = check_auth(api.platforms().await)? else {
        return Ok(());
    };
    if platforms.is_empty() {
        return Ok(());
    }

    println!();
    println!(
        "{:<12} {:>9} {:>10} {:>12} {:>7}",
        "PLATFORM", "ACCOUNTS", "FOLLOWERS", "VIEWS", "ENG %"
    );
    for p in &platforms {
        println!(
            "{:<12} {:>9} {:>10} {:>12} {:>7.1}",
            p.platform, p.accounts_count, p.total_followers, p.total_views, p.avg_engagement_rate
        );
    }
    Ok(())
}

pub async fn niches(api: &ApiClient, analyze: Option<String>) -> anyhow::Result<()> {
    if let Some(name) = analyze {
        println!("Analyzing \"{name}\"...");
        match api.analyze_niche(&name).await {
            Ok(analysis) => {
                println!("{}", analysis.name);
                println!("  Potential:    {}", analysis.potential_score);
                println!("  Competition:  {}", analysis.competition_level);
                println!("  Trend:        {}", analysis.trend);
                println!("  Searches/mo:  {}", analysis.monthly_search_volume);
                println!("  Avg price:    ${:.2}", analysis.avg_product_price);
                if !analysis.recommended_affiliates.is_empty() {
                    println!(
                        "  Affiliates:   {}",
                        analysis.recommended_affiliates.join(", ")
                    );
                }
            }
            Err(PulsedeckError::Unauthorized) => {
                eprintln!("Session expired. Run `pulsedeck login`.");
            }
            Err(PulsedeckError::ExternalService { service, message }) => {
                eprintln!("{service} unavailable: {message}");
            }
            Err(e) => return Err(e.into()),
        }
        return Ok(());
    }

    let Some(niches) = check_auth(api.niches().await)? else {
        return Ok(());
    };
    if niches.is_empty() {
        println!("No niches.");
        return Ok(());
    }

    println!("{:<24} {:<10} {:>10} {:<12}", "NAME", "STATUS", "POTENTIAL", "TREND");
    for n in &niches {
        println!(
            "{:<24} {:<10} {:>10} {:<12}",
            truncate_str(&n.name, 22),
            n.status,
            n.potential_score
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".into()),
            n.trend.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
