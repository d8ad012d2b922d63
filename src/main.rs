use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use curbside::config::AppConfig;
use curbside::db;
use curbside::handlers;
use curbside::services::geocoding::google::GoogleGeocoder;
use curbside::services::gis::arcgis::ArcGisSource;
use curbside::services::reminders::alexa::AlexaReminderClient;
use curbside::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    anyhow::ensure!(
        !config.google_api_key.is_empty(),
        "GOOGLE_API_KEY must be set"
    );

    let geocoder = GoogleGeocoder::new(config.google_api_key.clone());
    let schedule_source = ArcGisSource::new(config.gis_base_url.clone());
    let reminders = AlexaReminderClient::new(
        config.reminders_api_url.clone(),
        config.reminders_api_token.clone(),
    );

    tracing::info!(
        timezone = %config.timezone,
        gis = %config.gis_base_url,
        "resolved configuration"
    );

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        geocoder: Box::new(geocoder),
        schedule_source: Box::new(schedule_source),
        reminders: Box::new(reminders),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/skill", post(handlers::skill::skill_turn))
        .route("/skill/session_ended", post(handlers::skill::session_ended))
        .route("/api/schedule", get(handlers::schedule::get_schedule))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
