// src/tui/widgets/assistant.rs — Assistant chat transcript and input (screen 7).

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::assistant::{Conversation, Role};
use crate::tui::theme::Theme;

pub fn render(f: &mut Frame, area: Rect, conversation: &Conversation, input: &str, recording: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(3)])
        .split(area);

    render_transcript(f, chunks[0], conversation);
    render_input(f, chunks[1], conversation, input, recording);
}

fn render_transcript(f: &mut Frame, area: Rect, conversation: &Conversation) {
    let mut lines: Vec<Line> = Vec::new();
    for message in conversation.messages() {
        let (who, style) = match message.role {
            Role::User => ("you", Theme::key_hint()),
            Role::Assistant => ("assistant", Theme::success()),
        };
        lines.push(Line::from(Span::styled(format!("{who}:"), style)));
        for text_line in message.text.lines() {
            lines.push(Line::from(Span::styled(
                format!("  {text_line}"),
                Theme::text(),
            )));
        }
        if message.audio.is_some() {
            lines.push(Line::from(Span::styled("  [audio reply]", Theme::text_dim())));
        }
        lines.push(Line::from(""));
    }
    if conversation.is_busy() {
        lines.push(Line::from(Span::styled("thinking...", Theme::text_dim())));
    }

    // Keep the tail of the transcript in view.
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;

    let p = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Assistant ")
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(p, area);
}

fn render_input(
    f: &mut Frame,
    area: Rect,
    conversation: &Conversation,
    input: &str,
    recording: bool,
) {
    let (title, border) = if recording {
        (" \u{25cf} recording — Ctrl-R to stop ", Theme::error())
    } else if conversation.is_busy() {
        (" waiting... ", Theme::border())
    } else {
        (" message — Enter to send, Ctrl-R to record ", Theme::border_focus())
    };

    let shown = if recording || conversation.is_busy() {
        input.to_string()
    } else {
        format!("{input}\u{2588}")
    };
    let p = Paragraph::new(Line::from(Span::styled(shown, Theme::text()))).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border),
    );
    f.render_widget(p, area);
}
