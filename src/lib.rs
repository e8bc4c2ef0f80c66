// src/lib.rs — Library root for pulsedeck

pub mod api;
pub mod assistant;
pub mod cache;
pub mod cli;
pub mod infra;
pub mod session;
pub mod tui;
pub mod util;
