// src/tui/widgets/accounts.rs — Tracked social accounts table (screen 2).

use ratatui::{
    layout::{Constraint, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::api::types::Account;
use crate::tui::theme::Theme;

pub fn render(f: &mut Frame, area: Rect, accounts: &[Account], state: &mut TableState) {
    if accounts.is_empty() {
        let p = Paragraph::new(Line::from(Span::styled(
            "No accounts yet.",
            Theme::text_dim(),
        )))
        .block(block(0));
        f.render_widget(p, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Platform").style(Theme::table_header()),
        Cell::from("Username").style(Theme::table_header()),
        Cell::from("Followers").style(Theme::table_header()),
        Cell::from("Posts").style(Theme::table_header()),
        Cell::from("Eng %").style(Theme::table_header()),
        Cell::from("Health").style(Theme::table_header()),
        Cell::from("Status").style(Theme::table_header()),
    ]);

    let rows: Vec<Row> = accounts
        .iter()
        .map(|a| {
            let engagement = a
                .engagement_rate
                .map(|r| format!("{r:.1}"))
                .unwrap_or_else(|| "-".into());
            let status_style = match a.status.as_str() {
                "active" => Theme::success(),
                "banned" | "suspended" => Theme::error(),
                _ => Theme::text_dim(),
            };
            Row::new(vec![
                Cell::from(a.platform.clone()).style(Theme::text()),
                Cell::from(format!("@{}", a.username)).style(Theme::text()),
                Cell::from(a.followers.to_string()).style(Theme::text()),
                Cell::from(a.total_posts.to_string()).style(Theme::text_dim()),
                Cell::from(engagement).style(Theme::text_dim()),
                Cell::from(a.health_score.to_string()).style(Theme::health(a.health_score)),
                Cell::from(a.status.clone()).style(status_style),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Min(16),
            Constraint::Length(10),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(block(accounts.len()))
    .row_highlight_style(Theme::highlight().add_modifier(Modifier::BOLD))
    .highlight_symbol("> ");

    f.render_stateful_widget(table, area, state);
}

fn block(count: usize) -> Block<'static> {
    Block::default()
        .title(format!(" Accounts ({count}) "))
        .borders(Borders::ALL)
        .border_style(Theme::border())
}
