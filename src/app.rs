use crate::catalog::MovieCatalog;
use crate::config::{OmdbConfig, ServerConfig};
use crate::error::MovieError;
use crate::models::{Genre, MovieDetail, MovieSummary, SearchResult};
use crate::omdb::{MovieApi, OmdbClient};
use anyhow::{Context, Result};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<MovieCatalog>,
}

pub async fn run_server() -> Result<()> {
    let omdb_config = OmdbConfig::from_env().context("loading OMDb configuration")?;
    let server_config = ServerConfig::from_env().context("loading server configuration")?;
    info!("Using OMDb endpoint {}", omdb_config.base_url);

    let api: Arc<dyn MovieApi> = Arc::new(OmdbClient::new(&omdb_config)?);
    let state = AppState {
        catalog: Arc::new(MovieCatalog::new(api)),
    };

    let app = build_router(state);

    info!("Listening on {}", server_config.addr);
    let listener = tokio::net::TcpListener::bind(server_config.addr)
        .await
        .with_context(|| format!("binding {}", server_config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/movies/popular", get(popular))
        .route("/api/movies/search", get(search))
        .route("/api/movies/:id", get(movie_detail))
        .route("/api/genres", get(genres))
        .route("/api/genres/:label/movies", get(genre_movies))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<MovieError> for ApiError {
    fn from(err: MovieError) -> Self {
        let status = match &err {
            MovieError::Remote { .. } if err.is_not_found() => StatusCode::NOT_FOUND,
            MovieError::Remote { .. } | MovieError::Transport { .. } => StatusCode::BAD_GATEWAY,
            MovieError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, err.to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn popular(State(state): State<AppState>) -> Json<Vec<MovieSummary>> {
    Json(state.catalog.curated_list().await)
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
    page: Option<u32>,
}

async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResult>, ApiError> {
    let Query(params) = params?;
    let query = params.q.trim();
    if query.is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "query parameter 'q' must not be empty",
        ));
    }
    let page = params.page.unwrap_or(1).max(1);
    let result = state.catalog.search_page(query, page).await.map_err(|e| {
        warn!("Search '{}' failed: {}", query, e);
        ApiError::from(e)
    })?;
    Ok(Json(result))
}

async fn movie_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MovieDetail>, ApiError> {
    let detail = state.catalog.details(id.trim()).await?;
    Ok(Json(detail))
}

#[derive(Debug, Serialize)]
struct GenreEntry {
    id: Genre,
    name: &'static str,
}

async fn genres() -> Json<Vec<GenreEntry>> {
    Json(
        Genre::ALL
            .into_iter()
            .map(|g| GenreEntry {
                id: g,
                name: g.display_name(),
            })
            .collect(),
    )
}

async fn genre_movies(
    State(state): State<AppState>,
    Path(label): Path<String>,
) -> Result<Json<Vec<MovieSummary>>, ApiError> {
    let genre: Genre = label
        .parse()
        .map_err(|e: crate::models::UnknownGenre| ApiError::new(StatusCode::NOT_FOUND, e.to_string()))?;
    Ok(Json(state.catalog.by_genre(genre).await))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
