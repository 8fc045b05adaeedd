pub mod api;
pub mod config;
pub mod core_state;
pub mod db;
pub mod engine;
pub mod models;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

/// Start the backend: tracing, data directory, lexicon, database
/// migrations, HTTP server. Runs until ctrl-c.
pub async fn run() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Nursle backend starting v{}", config::APP_VERSION);

    std::fs::create_dir_all(config::app_data_dir())
        .map_err(|e| format!("Cannot create data directory: {e}"))?;

    let lexicon_path = config::lexicon_path();
    let lexicon = if lexicon_path.exists() {
        tracing::info!(path = %lexicon_path.display(), "Loading lexicon override");
        engine::Lexicon::load(&lexicon_path).map_err(|e| format!("Cannot load lexicon: {e}"))?
    } else {
        engine::Lexicon::builtin()
    };
    tracing::info!(keywords = lexicon.len(), "Lexicon ready");

    let core = Arc::new(core_state::CoreState::new(engine::Engine::new(lexicon)));

    // Open once up front so migrations run before traffic arrives
    core.open_db()
        .map_err(|e| format!("Database initialization failed: {e}"))?;

    let mut server = api::start_server(Arc::clone(&core), config::bind_addr()).await?;
    tracing::info!(addr = %server.session.server_addr, "Nursle backend listening");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("Signal handler failed: {e}"))?;
    tracing::info!("Shutdown signal received");

    server.shutdown();
    if let Err(e) = core.flush_and_prune_audit() {
        tracing::warn!("Final audit flush failed: {e}");
    }
    if let Err(e) = core.flush_predictions() {
        tracing::warn!("Final prediction flush failed: {e}");
    }

    Ok(())
}
