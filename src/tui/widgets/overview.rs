// src/tui/widgets/overview.rs — Dashboard summary panels (screen 1).

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::api::types::DashboardSummary;
use crate::tui::theme::Theme;

pub fn render(f: &mut Frame, area: Rect, summary: Option<&DashboardSummary>) {
    let Some(summary) = summary else {
        let p = Paragraph::new(Line::from(Span::styled("Loading...", Theme::text_dim())))
            .block(Block::default().borders(Borders::ALL).border_style(Theme::border()));
        f.render_widget(p, area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    render_accounts(f, top[0], summary);
    render_content(f, top[1], summary);
    render_money(f, bottom[0], summary);
    render_attention(f, bottom[1], summary);
}

fn panel(f: &mut Frame, area: Rect, title: &str, lines: Vec<Line>) {
    let p = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!(" {title} "))
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(p, area);
}

fn stat<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label:<18}"), Theme::text_dim()),
        Span::styled(value, Theme::text()),
    ])
}

fn render_accounts(f: &mut Frame, area: Rect, s: &DashboardSummary) {
    let growth = if s.followers_growth >= 0 {
        Span::styled(format!("+{}", s.followers_growth), Theme::success())
    } else {
        Span::styled(s.followers_growth.to_string(), Theme::error())
    };
    let lines = vec![
        stat("Accounts", format!("{} ({} active)", s.total_accounts, s.active_accounts)),
        Line::from(""),
        stat("Followers", s.total_followers.to_string()),
        Line::from(vec![
            Span::styled(format!("{:<18}", "Growth"), Theme::text_dim()),
            growth,
        ]),
    ];
    panel(f, area, "Accounts", lines);
}

fn render_content(f: &mut Frame, area: Rect, s: &DashboardSummary) {
    let lines = vec![
        stat("Content items", s.total_content.to_string()),
        Line::from(""),
        stat("Scheduled", s.scheduled_content.to_string()),
        stat("Published today", s.published_today.to_string()),
    ];
    panel(f, area, "Content", lines);
}

fn render_money(f: &mut Frame, area: Rect, s: &DashboardSummary) {
    let profit_style = if s.profit_month >= 0.0 {
        Theme::success()
    } else {
        Theme::error()
    };
    let lines = vec![
        stat("Revenue today", format!("${:.2}", s.revenue_today)),
        stat("Revenue month", format!("${:.2}", s.revenue_month)),
        stat("Expenses month", format!("${:.2}", s.expenses_month)),
        Line::from(vec![
            Span::styled(format!("{:<18}", "Profit month"), Theme::text_dim()),
            Span::styled(format!("${:.2}", s.profit_month), profit_style),
        ]),
        Line::from(""),
        stat("Leads", format!("{} ({} new today)", s.total_leads, s.new_leads_today)),
        stat("Conversion", format!("{:.1}%", s.conversion_rate)),
    ];
    panel(f, area, "Revenue & Leads", lines);
}

fn render_attention(f: &mut Frame, area: Rect, s: &DashboardSummary) {
    let attention_style = if s.accounts_needing_attention > 0 {
        Theme::warning()
    } else {
        Theme::success()
    };
    let failed_style = if s.failed_publications > 0 {
        Theme::error()
    } else {
        Theme::success()
    };
    let lines = vec![
        Line::from(vec![
            Span::styled(format!("{:<22}", "Needing attention"), Theme::text_dim()),
            Span::styled(s.accounts_needing_attention.to_string(), attention_style),
        ]),
        Line::from(vec![
            Span::styled(format!("{:<22}", "Failed publications"), Theme::text_dim()),
            Span::styled(s.failed_publications.to_string(), failed_style),
        ]),
    ];
    panel(f, area, "Attention", lines);
}
