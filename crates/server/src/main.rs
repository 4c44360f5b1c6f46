use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use server_api::{dispatch, ApiContext, Summarizer};
use shared::protocol::CollaboratorResponse;
use storage::Storage;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
};
use tracing::{error, info, warn};

mod app_state;
mod config;
mod gemini;

use app_state::AppState;
use config::{load_settings, prepare_database_url};
use gemini::GeminiSummarizer;

const MAX_REQUEST_BYTES: usize = 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let summarizer = match settings.gemini_api_key {
        Some(api_key) => {
            info!(model = %settings.gemini_model, "summarizer configured");
            Some(Arc::new(GeminiSummarizer::new(api_key, settings.gemini_model))
                as Arc<dyn Summarizer>)
        }
        None => {
            warn!("API_KEY is not set; summarize requests will be rejected");
            None
        }
    };

    let state = AppState {
        api: ApiContext {
            storage,
            summarizer,
        },
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "collaborator service listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", post(exec))
        .route("/exec", post(exec))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BYTES))
        .layer(cors)
        .with_state(state)
}

// Application failures travel in the body with status 200, the way the
// hosted script reports them.
async fn exec(State(state): State<Arc<AppState>>, body: Bytes) -> Json<CollaboratorResponse> {
    Json(dispatch(&state.api, &body).await)
}

async fn health(State(state): State<Arc<AppState>>) -> Result<&'static str, StatusCode> {
    state.api.storage.health_check().await.map_err(|error| {
        error!(%error, "storage health check failed");
        StatusCode::SERVICE_UNAVAILABLE
    })?;
    Ok("ok")
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
