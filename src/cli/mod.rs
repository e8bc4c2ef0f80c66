// src/cli/mod.rs — CLI definition (clap derive)

pub mod auth;
pub mod chat;
pub mod show;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pulsedeck",
    about = "Terminal dashboard for the content automation platform",
    version
)]
pub struct Cli {
    /// Config file path
    #[arg(long)]
    pub config: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and persist the session
    Login {
        /// Email address (prompted if omitted)
        #[arg(long)]
        email: Option<String>,
    },
    /// Clear the persisted session
    Logout,
    /// Show the signed-in identity
    Whoami,
    /// Launch the TUI dashboard (default when no subcommand given)
    Dashboard,
    /// List tracked social accounts
    Accounts {
        /// Also fetch per-account stats
        #[arg(long)]
        stats: bool,
    },
    /// Content pipeline
    Content {
        #[command(subcommand)]
        action: Option<ContentAction>,
    },
    /// Revenue and platform analytics
    Analytics {
        /// Revenue period (day, week, month)
        #[arg(long, default_value = "month")]
        period: String,
    },
    /// Niche portfolio
    Niches {
        /// Run AI analysis for a niche by name
        #[arg(long)]
        analyze: Option<String>,
    },
    /// Chat with the assistant (supports /record for voice)
    Chat,
}

#[derive(Subcommand)]
pub enum ContentAction {
    /// List content items
    List,
    /// Generate a content draft for a niche
    Generate {
        /// Niche id
        niche_id: String,
        /// Content type (reel, post, story)
        #[arg(long, default_value = "post")]
        content_type: String,
        /// Optional topic hint
        #[arg(long)]
        topic: Option<String>,
    },
}
