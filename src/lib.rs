pub mod api;
pub mod cli;
pub mod clients;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod models;
pub mod overrides;
pub mod parser;
pub mod services;
pub mod state;

use std::sync::{Arc, OnceLock};
use tokio::signal;

use anyhow::Context;
use clap::Parser;
use cli::{
    Cli, Commands, cmd_anime_info, cmd_browse, cmd_list_anime, cmd_list_sheet, cmd_reload,
    cmd_sheet_info,
};
pub use config::Config;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use models::SheetKind;
use state::SharedState;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

static PROMETHEUS: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

/// Installs the global Prometheus recorder on first call; later calls
/// return the same handle.
pub fn prometheus_handle() -> Option<PrometheusHandle> {
    PROMETHEUS
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("Prometheus metrics recorder initialized");
                Some(handle)
            }
            Err(e) => {
                error!("Failed to install Prometheus recorder: {e}");
                None
            }
        })
        .clone()
}

fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    if config.observability.loki_enabled {
        let url = url::Url::parse(&config.observability.loki_url).context("Invalid Loki URL")?;

        let (layer, task) = tracing_loki::builder()
            .label("app", "mediashelf")?
            .extra_field("nickname", config.tracker.nickname.clone())?
            .build_url(url)?;

        // A second initialisation keeps the first subscriber.
        if registry.with(layer).try_init().is_ok() {
            tokio::spawn(task);
            info!(
                "Loki logging initialized at {}",
                config.observability.loki_url
            );
        }
    } else {
        let _ = registry.try_init();
    }

    Ok(())
}

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    init_tracing(&config)?;

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Serve => run_server(config).await,

        Commands::Anime { filters } => cmd_list_anime(&config, &filters.to_filter_state()).await,

        Commands::AnimeInfo { id } => cmd_anime_info(&config, &id).await,

        Commands::Manga { filters } => {
            cmd_list_sheet(&config, SheetKind::Manga, &filters.to_filter_state()).await
        }

        Commands::MangaInfo { row } => cmd_sheet_info(&config, SheetKind::Manga, &row).await,

        Commands::Movies { filters } => {
            cmd_list_sheet(&config, SheetKind::Movies, &filters.to_filter_state()).await
        }

        Commands::MovieInfo { row } => cmd_sheet_info(&config, SheetKind::Movies, &row).await,

        Commands::Reload { catalog } => cmd_reload(&config, catalog).await,

        Commands::Browse { catalog, filters } => {
            cmd_browse(&config, catalog, filters.to_filter_state()).await
        }

        Commands::Init => {
            if Config::create_default_if_missing()? {
                println!("✓ Created config.toml with default settings");
            } else {
                println!("config.toml already exists");
            }
            Ok(())
        }
    }
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    let prometheus_handle = if config.observability.metrics_enabled {
        prometheus_handle()
    } else {
        None
    };

    let port = config.server.port;
    let shared = Arc::new(SharedState::new(config).await?);
    let api_state = api::create_app_state(shared, prometheus_handle);

    info!("Starting Web API on port {}", port);

    let app = api::router(api_state);
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Web Server running at http://0.0.0.0:{}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match signal::ctrl_c().await {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => error!("Error listening for shutdown: {}", e),
            }
        })
        .await?;

    info!("Server stopped");
    Ok(())
}
