// src/tui/widgets/funnel.rs — Lead funnel bars (screen 5).

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::api::types::FunnelStats;
use crate::tui::theme::Theme;

const BAR_WIDTH: usize = 40;

pub fn render(f: &mut Frame, area: Rect, funnel: Option<&FunnelStats>) {
    let block = Block::default()
        .title(" Lead Funnel ")
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let Some(funnel) = funnel else {
        let p = Paragraph::new(Line::from(Span::styled("Loading...", Theme::text_dim())))
            .block(block);
        f.render_widget(p, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(3)])
        .split(area);

    let stages = funnel.stages();
    let max = stages.iter().map(|(_, n)| *n).max().unwrap_or(0).max(1);

    let lines: Vec<Line> = stages
        .iter()
        .map(|(label, count)| {
            let filled = (*count as usize * BAR_WIDTH) / max as usize;
            let bar = "\u{2588}".repeat(filled);
            Line::from(vec![
                Span::styled(format!("{label:<14}"), Theme::text_dim()),
                Span::styled(bar, Theme::highlight()),
                Span::styled(format!(" {count}"), Theme::text()),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), chunks[0]);

    let summary = Line::from(vec![
        Span::styled("Lost: ", Theme::text_dim()),
        Span::styled(funnel.lost.to_string(), Theme::error()),
        Span::styled("   Conversion: ", Theme::text_dim()),
        Span::styled(format!("{:.1}%", funnel.conversion_rate), Theme::success()),
    ]);
    let p = Paragraph::new(summary).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    f.render_widget(p, chunks[1]);
}
