// src/tui/widgets/mod.rs — Widget sub-modules for each dashboard screen.

pub mod accounts;
pub mod analytics;
pub mod assistant;
pub mod content;
pub mod funnel;
pub mod login;
pub mod niches;
pub mod overview;
