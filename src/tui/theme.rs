// src/tui/theme.rs — Color scheme and style definitions for the dashboard.

use ratatui::style::{Color, Modifier, Style};

pub struct Theme;

impl Theme {
    // ── Palette ──────────────────────────────────────────────────
    pub const INDIGO: Color = Color::Rgb(110, 120, 240);
    pub const WHITE: Color = Color::Rgb(240, 240, 240);
    pub const GREEN: Color = Color::Rgb(80, 200, 120);
    pub const RED: Color = Color::Rgb(230, 80, 80);
    pub const YELLOW: Color = Color::Rgb(230, 200, 60);
    pub const GRAY: Color = Color::Rgb(120, 120, 140);
    pub const DIM: Color = Color::Rgb(80, 80, 100);
    pub const CYAN: Color = Color::Rgb(80, 200, 220);

    // ── Semantic styles ──────────────────────────────────────────

    pub fn tab_active() -> Style {
        Style::default()
            .fg(Theme::INDIGO)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_inactive() -> Style {
        Style::default().fg(Theme::GRAY)
    }

    pub fn header() -> Style {
        Style::default()
            .fg(Theme::INDIGO)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Theme::DIM)
    }

    pub fn border_focus() -> Style {
        Style::default().fg(Theme::INDIGO)
    }

    pub fn text() -> Style {
        Style::default().fg(Theme::WHITE)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(Theme::GRAY)
    }

    pub fn success() -> Style {
        Style::default().fg(Theme::GREEN)
    }

    pub fn warning() -> Style {
        Style::default().fg(Theme::YELLOW)
    }

    pub fn error() -> Style {
        Style::default().fg(Theme::RED)
    }

    pub fn highlight() -> Style {
        Style::default()
            .fg(Theme::CYAN)
            .add_modifier(Modifier::BOLD)
    }

    pub fn table_header() -> Style {
        Style::default()
            .fg(Theme::WHITE)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn key_hint() -> Style {
        Style::default()
            .fg(Theme::CYAN)
            .add_modifier(Modifier::BOLD)
    }

    pub fn key_desc() -> Style {
        Style::default().fg(Theme::GRAY)
    }

    /// Style for an account health score.
    pub fn health(score: u32) -> Style {
        if score >= 80 {
            Theme::success()
        } else if score >= 50 {
            Theme::warning()
        } else {
            Theme::error()
        }
    }
}
