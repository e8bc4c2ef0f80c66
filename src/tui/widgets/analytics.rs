// src/tui/widgets/analytics.rs — Revenue and per-platform analytics (screen 4).

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::api::types::{PlatformStats, RevenueStats};
use crate::tui::theme::Theme;

pub fn render(
    f: &mut Frame,
    area: Rect,
    revenue: Option<&RevenueStats>,
    platforms: &[PlatformStats],
    period: &str,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(6)])
        .split(area);

    render_revenue(f, chunks[0], revenue, period);
    render_platforms(f, chunks[1], platforms);
}

fn render_revenue(f: &mut Frame, area: Rect, revenue: Option<&RevenueStats>, period: &str) {
    let block = Block::default()
        .title(format!(" Revenue — {period} "))
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let lines = match revenue {
        Some(r) => {
            let profit_style = if r.net_profit >= 0.0 {
                Theme::success()
            } else {
                Theme::error()
            };
            vec![
                row("Revenue", format!("${:.2}", r.total_revenue), Theme::text()),
                row("Commission", format!("${:.2}", r.total_commission), Theme::text()),
                row("Expenses", format!("${:.2}", r.total_expenses), Theme::text()),
                row("Net profit", format!("${:.2}", r.net_profit), profit_style),
                row("ROI", format!("{:.1}%", r.roi), Theme::text()),
                row("Conversions", r.conversions_count.to_string(), Theme::text()),
                row("Avg order", format!("${:.2}", r.avg_order_value), Theme::text()),
            ]
        }
        None => vec![Line::from(Span::styled("Loading...", Theme::text_dim()))],
    };

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn row(label: &str, value: String, style: ratatui::style::Style) -> Line<'_> {
    Line::from(vec![
        Span::styled(format!("{label:<14}"), Theme::text_dim()),
        Span::styled(value, style),
    ])
}

fn render_platforms(f: &mut Frame, area: Rect, platforms: &[PlatformStats]) {
    let block = Block::default()
        .title(" Platforms ")
        .borders(Borders::ALL)
        .border_style(Theme::border());

    if platforms.is_empty() {
        let p = Paragraph::new(Line::from(Span::styled(
            "No platform data.",
            Theme::text_dim(),
        )))
        .block(block);
        f.render_widget(p, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Platform").style(Theme::table_header()),
        Cell::from("Accounts").style(Theme::table_header()),
        Cell::from("Followers").style(Theme::table_header()),
        Cell::from("Views").style(Theme::table_header()),
        Cell::from("Engagement").style(Theme::table_header()),
        Cell::from("Eng %").style(Theme::table_header()),
        Cell::from("Posts").style(Theme::table_header()),
    ]);

    let rows: Vec<Row> = platforms
        .iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(p.platform.clone()).style(Theme::text()),
                Cell::from(p.accounts_count.to_string()).style(Theme::text()),
                Cell::from(p.total_followers.to_string()).style(Theme::text()),
                Cell::from(p.total_views.to_string()).style(Theme::text_dim()),
                Cell::from(p.total_engagement.to_string()).style(Theme::text_dim()),
                Cell::from(format!("{:.1}", p.avg_engagement_rate)).style(Theme::text()),
                Cell::from(p.publications_count.to_string()).style(Theme::text_dim()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(9),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(11),
            Constraint::Length(7),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(block);

    f.render_widget(table, area);
}
