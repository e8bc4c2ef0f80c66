// src/main.rs — pulsedeck entry point

use std::sync::{Arc, Mutex};

use clap::Parser;

use pulsedeck::api::ApiClient;
use pulsedeck::cache::QueryCache;
use pulsedeck::cli::{Cli, Commands, ContentAction};
use pulsedeck::infra::config::Config;
use pulsedeck::infra::logger;
use pulsedeck::session::Session;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Respects RUST_LOG / PULSEDECK_LOG over the flag
    logger::init_logging(&cli.log_level);

    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    let session = Arc::new(Mutex::new(Session::load()));
    let api = ApiClient::new(
        config.api.effective_base_url(),
        session,
        config.api.timeout(),
    )?;

    match cli.command {
        Some(Commands::Login { email }) => pulsedeck::cli::auth::login(&api, email).await,
        Some(Commands::Logout) => pulsedeck::cli::auth::logout(&api),
        Some(Commands::Whoami) => pulsedeck::cli::auth::whoami(&api).await,
        Some(Commands::Accounts { stats }) => pulsedeck::cli::show::accounts(&api, stats).await,
        Some(Commands::Content { action }) => match action.unwrap_or(ContentAction::List) {
            ContentAction::List => pulsedeck::cli::show::content_list(&api).await,
            ContentAction::Generate {
                niche_id,
                content_type,
                topic,
            } => pulsedeck::cli::show::content_generate(&api, niche_id, content_type, topic).await,
        },
        Some(Commands::Analytics { period }) => {
            pulsedeck::cli::show::analytics(&api, &period).await
        }
        Some(Commands::Niches { analyze }) => pulsedeck::cli::show::niches(&api, analyze).await,
        Some(Commands::Chat) => pulsedeck::cli::chat::run_chat(api, &config).await,
        Some(Commands::Dashboard) | None => {
            let cache = QueryCache::new(&config.cache);
            pulsedeck::tui::run_dashboard(api, cache, config).await
        }
    }
}
