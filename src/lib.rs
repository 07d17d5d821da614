pub mod config;
pub mod error;
pub mod routes;
pub mod telegram;
pub mod telemetry;
pub mod track;
pub mod yandex;

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use telegram::handlers::BotState;
use telegram::session::SessionStore;
use tower_http::trace::TraceLayer;
use track::service::TrackService;
use yandex::client::YandexClient;

pub async fn run(config: config::Config) -> anyhow::Result<()> {
    telemetry::init_tracing(&config.rust_log);

    let client = YandexClient::new(
        &config.yandex_api_url,
        &config.yandex_music_token,
        config.provider_timeout(),
    )?;
    tracing::info!(api_url = %config.yandex_api_url, "Yandex Music client initialized");

    let sessions = SessionStore::new();
    let state = Arc::new(BotState {
        tracks: TrackService::new(
            Arc::new(client),
            config.provider_timeout(),
            &config.chart_option,
        ),
        sessions: sessions.clone(),
    });

    if let Some(port) = config.health_port {
        let host: std::net::IpAddr = config.host.parse()?;
        let addr = SocketAddr::from((host, port));
        let app = Router::new()
            .merge(routes::routes(sessions))
            .layer(TraceLayer::new_for_http());

        tracing::info!("Starting health server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = ?e, "Health server stopped");
            }
        });
    }

    telegram::run_bot(&config.telegram_token, state).await
}
