// src/tui/widgets/login.rs — Full-screen sign-in form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::tui::app::LoginForm;
use crate::tui::theme::Theme;

pub fn render(f: &mut Frame, area: Rect, form: &LoginForm, notice: Option<&str>) {
    let outer = centered_rect(46, 12, area);
    f.render_widget(Clear, outer);

    let block = Block::default()
        .title(Span::styled(" pulsedeck — sign in ", Theme::header()))
        .borders(Borders::ALL)
        .border_style(Theme::border());
    let inner = block.inner(outer);
    f.render_widget(block, outer);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    render_field(f, chunks[0], "Email", &form.email, !form.focus_password);
    let masked = "*".repeat(form.password.chars().count());
    render_field(f, chunks[1], "Password", &masked, form.focus_password);

    let status = if form.busy {
        Line::from(Span::styled(" Signing in...", Theme::text_dim()))
    } else if let Some(err) = &form.error {
        Line::from(Span::styled(format!(" {err}"), Theme::error()))
    } else if let Some(notice) = notice {
        Line::from(Span::styled(format!(" {notice}"), Theme::warning()))
    } else {
        Line::from("")
    };
    f.render_widget(Paragraph::new(status), chunks[2]);

    let hints = Line::from(vec![
        Span::styled(" Tab", Theme::key_hint()),
        Span::styled(" field  ", Theme::key_desc()),
        Span::styled("Enter", Theme::key_hint()),
        Span::styled(" sign in  ", Theme::key_desc()),
        Span::styled("Esc", Theme::key_hint()),
        Span::styled(" quit", Theme::key_desc()),
    ]);
    f.render_widget(Paragraph::new(hints), chunks[3]);
}

fn render_field(f: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let border = if focused {
        Theme::border_focus()
    } else {
        Theme::border()
    };
    let shown = if focused {
        format!("{value}\u{2588}")
    } else {
        value.to_string()
    };
    let field = Paragraph::new(Line::from(Span::styled(shown, Theme::text()))).block(
        Block::default()
            .title(format!(" {label} "))
            .borders(Borders::ALL)
            .border_style(border),
    );
    f.render_widget(field, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}
