// src/tui/widgets/content.rs — Content pipeline table and detail (screen 3).

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::api::types::ContentItem;
use crate::tui::theme::Theme;
use crate::util::truncate_str;

pub fn render(f: &mut Frame, area: Rect, items: &[ContentItem], state: &mut TableState) {
    if items.is_empty() {
        let p = Paragraph::new(Line::from(Span::styled(
            "No content yet.",
            Theme::text_dim(),
        )))
        .block(
            Block::default()
                .title(" Content ")
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );
        f.render_widget(p, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_table(f, chunks[0], items, state);
    let selected = state.selected().and_then(|i| items.get(i));
    render_detail(f, chunks[1], selected);
}

fn render_table(f: &mut Frame, area: Rect, items: &[ContentItem], state: &mut TableState) {
    let header = Row::new(vec![
        Cell::from("Type").style(Theme::table_header()),
        Cell::from("Hook").style(Theme::table_header()),
        Cell::from("Status").style(Theme::table_header()),
        Cell::from("Scheduled").style(Theme::table_header()),
        Cell::from("Model").style(Theme::table_header()),
    ]);

    let rows: Vec<Row> = items
        .iter()
        .map(|c| {
            let hook = c.hook.as_deref().unwrap_or("-");
            let status_style = match c.status.as_str() {
                "published" => Theme::success(),
                "failed" => Theme::error(),
                "scheduled" => Theme::warning(),
                _ => Theme::text_dim(),
            };
            let scheduled = c
                .scheduled_for
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".into());
            Row::new(vec![
                Cell::from(c.content_type.clone()).style(Theme::text()),
                Cell::from(truncate_str(hook, 40)).style(Theme::text()),
                Cell::from(c.status.clone()).style(status_style),
                Cell::from(scheduled).style(Theme::text_dim()),
                Cell::from(c.ai_model.clone().unwrap_or_else(|| "-".into()))
                    .style(Theme::text_dim()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Min(30),
            Constraint::Length(11),
            Constraint::Length(17),
            Constraint::Length(16),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(format!(" Content ({}) ", items.len()))
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    )
    .row_highlight_style(Theme::highlight().add_modifier(Modifier::BOLD))
    .highlight_symbol("> ");

    f.render_stateful_widget(table, area, state);
}

fn render_detail(f: &mut Frame, area: Rect, item: Option<&ContentItem>) {
    let block = Block::default()
        .title(" Detail ")
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let lines = match item {
        Some(c) => {
            let mut lines = Vec::new();
            if let Some(hook) = &c.hook {
                lines.push(Line::from(vec![
                    Span::styled("Hook:     ", Theme::text_dim()),
                    Span::styled(hook.clone(), Theme::text()),
                ]));
            }
            if let Some(caption) = &c.caption {
                lines.push(Line::from(vec![
                    Span::styled("Caption:  ", Theme::text_dim()),
                    Span::styled(caption.clone(), Theme::text()),
                ]));
            }
            if !c.hashtags.is_empty() {
                lines.push(Line::from(vec![
                    Span::styled("Hashtags: ", Theme::text_dim()),
                    Span::styled(c.hashtags.join(" "), Theme::text_dim()),
                ]));
            }
            if lines.is_empty() {
                lines.push(Line::from(Span::styled("(empty draft)", Theme::text_dim())));
            }
            lines
        }
        None => vec![Line::from(Span::styled("Nothing selected.", Theme::text_dim()))],
    };

    let p = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(p, area);
}
