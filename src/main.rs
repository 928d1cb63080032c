use std::sync::Arc;

use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod tts;

use api::routes::{create_router, AppState};
use config::Config;
use tts::{espeak::EspeakEngine, google::GoogleTranslateTts, TtsService};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("TTS Bridge v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Starting server on http://{}", config.addr);
    tracing::info!("Offline engine: {}", config.espeak_bin);
    tracing::info!("Online engine: {}", config.gtts_host);
    tracing::info!("Static directory: {}", config.static_dir.display());

    let offline = EspeakEngine::new(config.espeak_bin.clone());
    let online = GoogleTranslateTts::new(config.gtts_host.clone(), config.online_timeout)
        .expect("Failed to create online engine");

    let tts = TtsService::new(Arc::new(offline), Arc::new(online))
        .with_temp_dir(config.temp_dir.clone());

    let state = Arc::new(AppState { tts });
    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
