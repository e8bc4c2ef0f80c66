// src/tui/mod.rs — Terminal dashboard module.
//
// Full-screen ratatui dashboard over the platform API.
// Launch via `pulsedeck dashboard`.

pub mod app;
pub mod data;
pub mod router;
pub mod theme;
pub mod widgets;

pub use app::run_dashboard;
