//! Local viewer service: JSON API plus server-rendered list/detail pages.
//!
//! Routing is a pure function ([routes::route_request]) over the loaded store so it can be
//! exercised without sockets; axum only carries requests to it and serves `/assets`.

use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower_http::services::ServeDir;

use crate::config::AppConfig;
use crate::data::loader::MonsterStore;
use crate::export::ExportContext;

pub mod api;
pub mod pages;
pub mod routes;

use routes::HttpResponse;

/// Shared, read-only state handed to every request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<MonsterStore>,
    pub export: ExportContext,
}

impl AppState {
    pub fn new(store: Arc<MonsterStore>, export: ExportContext) -> Self {
        AppState { store, export }
    }
}

impl IntoResponse for HttpResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: String,
) -> HttpResponse {
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let response = routes::route_request(&state, method.as_str(), path, &body);
    tracing::debug!(%method, path, status = response.status_code, "request");
    response
}

pub fn router(state: AppState, assets_dir: &Path) -> Router {
    Router::new()
        .nest_service("/assets", ServeDir::new(assets_dir))
        .fallback(dispatch)
        .with_state(state)
}

pub async fn run_server(config: &AppConfig, store: Arc<MonsterStore>) -> std::io::Result<()> {
    let state = AppState::new(store, config.export_context());
    let app = router(state, &config.assets_dir);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("compendium server listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await
}
