// src/tui/widgets/niches.rs — Niche portfolio table (screen 6).

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::api::types::Niche;
use crate::tui::theme::Theme;
use crate::util::truncate_str;

pub fn render(f: &mut Frame, area: Rect, niches: &[Niche]) {
    let block = Block::default()
        .title(format!(" Niches ({}) ", niches.len()))
        .borders(Borders::ALL)
        .border_style(Theme::border());

    if niches.is_empty() {
        let p = Paragraph::new(Line::from(Span::styled("No niches yet.", Theme::text_dim())))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Name").style(Theme::table_header()),
        Cell::from("Status").style(Theme::table_header()),
        Cell::from("Potential").style(Theme::table_header()),
        Cell::from("Competition").style(Theme::table_header()),
        Cell::from("Trend").style(Theme::table_header()),
        Cell::from("Keywords").style(Theme::table_header()),
    ]);

    let rows: Vec<Row> = niches
        .iter()
        .map(|n| {
            let potential = n
                .potential_score
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".into());
            let potential_style = n.potential_score.map(Theme::health).unwrap_or(Theme::text_dim());
            Row::new(vec![
                Cell::from(n.name.clone()).style(Theme::text()),
                Cell::from(n.status.clone()).style(Theme::text_dim()),
                Cell::from(potential).style(potential_style),
                Cell::from(n.competition_level.clone().unwrap_or_else(|| "-".into()))
                    .style(Theme::text_dim()),
                Cell::from(n.trend.clone().unwrap_or_else(|| "-".into())).style(Theme::text_dim()),
                Cell::from(truncate_str(&n.keywords.join(", "), 40)).style(Theme::text_dim()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(16),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(42),
        ],
    )
    .header(header)
    .block(block);

    f.render_widget(table, area);
}
