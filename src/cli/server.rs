//! HTTP server mode: list screens over REST

use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures::future::join_all;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::DashboardConfig;
use crate::error::{Error, Result};
use crate::fetch::{PageSource, PagedCollectionFetcher};
use crate::screen::{ListScreen, RefreshStatus};

type SharedScreen = Arc<Mutex<ListScreen>>;

/// State shared across handlers
pub struct AppState {
    screens: BTreeMap<String, SharedScreen>,
    fetcher: PagedCollectionFetcher<Arc<dyn PageSource>>,
}

impl AppState {
    /// One screen per configured definition, all fetching through `source`
    pub fn new(config: &DashboardConfig, source: Arc<dyn PageSource>) -> Result<Self> {
        let mut screens = BTreeMap::new();
        for definition in &config.screens {
            let screen = ListScreen::from_config(config, &definition.name)?;
            screens.insert(definition.name.clone(), Arc::new(Mutex::new(screen)));
        }
        Ok(Self {
            screens,
            fetcher: PagedCollectionFetcher::new(source),
        })
    }

    fn screen(&self, name: &str) -> Result<&SharedScreen> {
        self.screens
            .get(name)
            .ok_or_else(|| Error::screen_not_found(name))
    }

    /// Run one fetch cycle for a screen.
    ///
    /// The screen lock is not held during the network fetch; if another
    /// refresh starts meanwhile, this one's outcome is discarded.
    async fn refresh(&self, screen: &SharedScreen) -> RefreshStatus {
        let (token, endpoint) = {
            let guard = screen.lock().await;
            (guard.begin_refresh(), guard.endpoint())
        };
        let outcome = self.fetcher.fetch_all_guarded(&endpoint, &token).await;
        screen.lock().await.complete_refresh(&token, outcome)
    }
}

/// Response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Build the router
pub fn router(state: AppState) -> Router {
    // Allow all origins; the dashboard front end is served elsewhere
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/screens", get(list_screens))
        .route("/screens/:name", get(view_screen))
        .route("/screens/:name/refresh", post(refresh_screen))
        .route("/refresh", post(refresh_all))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(Arc::new(state))
}

/// Start the HTTP server
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to port {port}"))?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn error_status(err: &Error) -> StatusCode {
    match err {
        Error::ScreenNotFound { .. } => StatusCode::NOT_FOUND,
        Error::InvalidConfigValue { .. } | Error::Config { .. } => StatusCode::BAD_REQUEST,
        Error::Http(_)
        | Error::HttpStatus { .. }
        | Error::Timeout { .. }
        | Error::RateLimited { .. }
        | Error::Auth { .. }
        | Error::Aggregation(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: &Error) -> Response {
    (
        error_status(err),
        Json(ApiResponse::<()>::error(err.user_message())),
    )
        .into_response()
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// List screens with their filters and load state
async fn list_screens(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut screens = Vec::with_capacity(state.screens.len());
    for screen in state.screens.values() {
        let screen = screen.lock().await;
        let definition = screen.definition();
        screens.push(json!({
            "name": definition.name,
            "title": definition.title(),
            "path": definition.path,
            "search_fields": definition.search_fields,
            "filters": definition.filters.iter().map(|f| json!({
                "field": f.field,
                "label": f.label,
                "options": f.options,
                "server": f.server,
            })).collect::<Vec<_>>(),
            "records": screen.collection().len(),
            "refreshed_at": screen.refreshed_at(),
        }));
    }

    Json(ApiResponse::success(json!({ "screens": screens })))
}

/// View one page of a screen.
///
/// The query string is the complete filter state: `search`, `page`, and
/// one parameter per filter field. Filters left out are cleared. A screen
/// is fetched on first view and whenever a server-side parameter changes.
async fn view_screen(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    match view_screen_inner(&state, &name, params).await {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::success(data))).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn view_screen_inner(
    state: &AppState,
    name: &str,
    mut params: HashMap<String, String>,
) -> Result<Value> {
    let screen = state.screen(name)?;

    let page = match params.remove("page") {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| Error::invalid_value("page", format!("'{raw}' is not a page number")))?,
        None => 1,
    };
    let search = params.remove("search").unwrap_or_default();

    let needs_fetch = {
        let mut guard = screen.lock().await;
        if let Some(unknown) = params
            .keys()
            .find(|k| guard.definition().filter(k.as_str()).is_none())
        {
            return Err(Error::invalid_value(
                "filter",
                format!("screen '{name}' has no filter '{unknown}'"),
            ));
        }

        let mut refetch = guard.needs_load();
        refetch |= guard.set_search(search).needs_fetch();
        let fields: Vec<String> = guard
            .definition()
            .filters
            .iter()
            .map(|f| f.field.clone())
            .collect();
        for field in fields {
            let value = params.remove(&field).unwrap_or_default();
            refetch |= guard.set_filter(&field, value).needs_fetch();
        }
        refetch
    };

    if needs_fetch {
        if let RefreshStatus::Partial { records: 0, message } = state.refresh(screen).await {
            return Err(Error::http_status(502, message));
        }
    }

    let mut guard = screen.lock().await;
    guard.set_page(page);
    Ok(serde_json::to_value(guard.snapshot())?)
}

/// Refetch one screen
async fn refresh_screen(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    let screen = match state.screen(&name) {
        Ok(screen) => screen,
        Err(e) => return error_response(&e),
    };

    let status = state.refresh(screen).await;
    if let RefreshStatus::Partial { records: 0, message } = &status {
        return error_response(&Error::http_status(502, message.clone()));
    }

    let records = screen.lock().await.collection().len();
    (
        StatusCode::OK,
        Json(ApiResponse::success(json!({
            "screen": name,
            "refresh": status,
            "records": records,
        }))),
    )
        .into_response()
}

/// Refetch every screen concurrently
async fn refresh_all(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let names: Vec<&String> = state.screens.keys().collect();
    let statuses = join_all(state.screens.values().map(|screen| state.refresh(screen))).await;

    let results: BTreeMap<&String, RefreshStatus> = names.into_iter().zip(statuses).collect();
    Json(ApiResponse::success(json!({ "screens": results })))
}
