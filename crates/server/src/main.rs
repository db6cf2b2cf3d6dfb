//! Server entry point.
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use game_content::ContentFactory;
use game_server::{AppState, ServerConfig, logging, router};
use runtime::{FileAccountRepository, Runtime, RuntimeConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ServerConfig::from_env();
    let _log_guard = logging::init(&config.log_dir)?;
    for warning in &config.warnings {
        warn!("{warning}");
    }

    let content = ContentFactory::new(&config.data_dir);
    let world = content.load_config_or_default()?;
    let layout = content.load_layout_or_default(&world)?;
    info!(
        width = world.width,
        height = world.height,
        orbs = world.orb_count,
        portals = layout.portals.len(),
        zones = layout.zones.len(),
        "World content loaded from {}",
        config.data_dir.display()
    );

    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            world,
            command_buffer_size: config.command_buffer,
            seed: config.world_seed,
        })
        .layout(layout)
        .accounts(Arc::new(FileAccountRepository::new(&config.accounts_path)))
        .build()
        .context("starting runtime")?;

    let app = router(AppState::new(runtime.handle()));
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("Shutting down");
    runtime.shutdown().await.context("stopping runtime")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "Ctrl-C handler failed, shutting down");
    }
}
