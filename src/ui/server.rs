//! HTTP surface of the dashboard.
//!
//! The page owns the current selection and posts every control change to
//! `/api/update`; the server keeps nothing but the immutable dataset.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::CorsLayer;

use super::layout::Layout;
use super::page::INDEX_HTML;
use crate::color::ColorMap;
use crate::data::model::{Dataset, FilterSelection, PayloadRange, RangeError, SiteSelection};
use crate::state::{Dashboard, DashboardFigures, FilterChange};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub colors: Arc<ColorMap>,
    pub layout: Arc<Layout>,
}

impl AppState {
    pub fn new(dataset: Dataset) -> Self {
        let colors = ColorMap::new(&dataset.booster_categories);
        let layout = Layout::for_dataset(&dataset);
        Self {
            dataset: Arc::new(dataset),
            colors: Arc::new(colors),
            layout: Arc::new(layout),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid payload range: {0}")]
    Range(#[from] RangeError),
    #[error("query parameter '{param}' is not a number: '{value}'")]
    NotANumber { param: &'static str, value: String },
    #[error("{}", .0.body_text())]
    Body(#[from] JsonRejection),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log::warn!("rejecting request: {self}");
        let (status, code) = match &self {
            ApiError::Range(_) => (StatusCode::BAD_REQUEST, "INVALID_RANGE"),
            ApiError::NotANumber { .. } => (StatusCode::BAD_REQUEST, "NOT_A_NUMBER"),
            ApiError::Body(rejection) => (rejection.status(), "INVALID_BODY"),
        };
        let body = ErrorBody {
            code: code.to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "launches": state.dataset.len() }))
}

async fn layout_handler(State(state): State<AppState>) -> Json<Layout> {
    Json(state.layout.as_ref().clone())
}

/// Raw query strings so malformed numbers get a JSON error body.
#[derive(Debug, Default, Deserialize)]
pub struct FiguresQuery {
    site: Option<String>,
    low: Option<String>,
    high: Option<String>,
}

fn parse_bound(param: &'static str, raw: Option<&str>, fallback: f64) -> Result<f64, ApiError> {
    match raw {
        None => Ok(fallback),
        Some(value) => value.trim().parse().map_err(|_| ApiError::NotANumber {
            param,
            value: value.to_string(),
        }),
    }
}

impl FiguresQuery {
    /// Missing parameters fall back to the initial selection.
    fn into_selection(self, initial: &FilterSelection) -> Result<FilterSelection, ApiError> {
        let low = parse_bound("low", self.low.as_deref(), initial.payload_range.low)?;
        let high = parse_bound("high", self.high.as_deref(), initial.payload_range.high)?;
        Ok(FilterSelection {
            site: self
                .site
                .as_deref()
                .map(SiteSelection::parse)
                .unwrap_or_else(|| initial.site.clone()),
            payload_range: PayloadRange::new(low, high)?,
        })
    }
}

async fn figures_handler(
    State(state): State<AppState>,
    Query(query): Query<FiguresQuery>,
) -> Result<Json<DashboardFigures>, ApiError> {
    let selection = query.into_selection(&state.layout.initial)?;
    let mut dashboard =
        Dashboard::with_selection(state.dataset.clone(), state.colors.clone(), selection);
    Ok(Json(dashboard.figures().clone()))
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub selection: FilterSelection,
    pub change: FilterChange,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub selection: FilterSelection,
    pub figures: DashboardFigures,
}

fn checked(range: PayloadRange) -> Result<PayloadRange, RangeError> {
    PayloadRange::new(range.low, range.high)
}

/// One control changed on the page: re-run the binding from the page's
/// current selection.
async fn update_handler(
    State(state): State<AppState>,
    body: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let Json(request) = body?;
    let mut selection = request.selection;
    selection.payload_range = checked(selection.payload_range)?;
    let change = match request.change {
        FilterChange::PayloadRange(range) => FilterChange::PayloadRange(checked(range)?),
        site @ FilterChange::Site(_) => site,
    };

    let mut dashboard =
        Dashboard::with_selection(state.dataset.clone(), state.colors.clone(), selection);
    let figures = dashboard.apply(change).clone();
    Ok(Json(UpdateResponse {
        selection: dashboard.selection().clone(),
        figures,
    }))
}

// ---------------------------------------------------------------------------
// Router & server
// ---------------------------------------------------------------------------

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/layout", get(layout_handler))
        .route("/api/figures", get(figures_handler))
        .route("/api/update", post(update_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until Ctrl+C.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    log::info!("Dashboard running at http://{addr} (Ctrl+C to stop)");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                log::error!("failed to listen for Ctrl+C: {err}");
            }
        })
        .await
        .context("serving dashboard")?;

    log::info!("Dashboard stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::three_launches;
    use axum::body::Body;
    use axum::http::{Request, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(AppState::new(three_launches()))
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    fn scatter_masses(chart: &Value) -> Vec<f64> {
        let mut masses: Vec<f64> = chart["series"]
            .as_array()
            .unwrap()
            .iter()
            .flat_map(|s| s["points"].as_array().unwrap().iter())
            .map(|p| p["x"].as_f64().unwrap())
            .collect();
        masses.sort_by(f64::total_cmp);
        masses
    }

    #[tokio::test]
    async fn index_serves_page() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("SpaceX Launch Records Dashboard"));
    }

    #[tokio::test]
    async fn health_reports_launch_count() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["launches"], 3);
    }

    #[tokio::test]
    async fn layout_lists_sites_and_initial_range() {
        let (status, body) = get_json("/api/layout").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["site_dropdown"]["options"][1]["value"], "A");
        assert_eq!(body["initial"]["site"], "ALL");
        assert_eq!(body["initial"]["payload_range"], json!({"low": 500.0, "high": 9000.0}));
        assert_eq!(body["payload_slider"]["max"], 10000.0);
    }

    #[tokio::test]
    async fn figures_default_to_initial_selection() {
        let (status, body) = get_json("/api/figures").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["proportion"]["title"], "Total Successful Launches by Site");
        assert_eq!(scatter_masses(&body["scatter"]), vec![500.0, 3000.0, 9000.0]);
    }

    #[tokio::test]
    async fn figures_apply_query_selection() {
        let (status, body) = get_json("/api/figures?site=ALL&low=0&high=5000").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(scatter_masses(&body["scatter"]), vec![500.0, 3000.0]);
    }

    #[tokio::test]
    async fn unknown_site_renders_empty_charts() {
        let (status, body) = get_json("/api/figures?site=Boca%20Chica").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["proportion"]["sectors"], json!([]));
        assert!(body["proportion"]["placeholder"].is_string());
        assert_eq!(body["scatter"]["series"], json!([]));
    }

    #[tokio::test]
    async fn inverted_range_is_bad_request() {
        let (status, body) = get_json("/api/figures?low=5000&high=10").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_RANGE");
    }

    #[tokio::test]
    async fn non_numeric_bound_is_bad_request() {
        let (status, body) = get_json("/api/figures?low=lots").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "NOT_A_NUMBER");
    }

    #[tokio::test]
    async fn update_applies_site_change() {
        let (status, body) = post_json(
            "/api/update",
            json!({
                "selection": {"site": "ALL", "payload_range": {"low": 0, "high": 10000}},
                "change": {"site": "A"}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selection"]["site"], "A");
        assert_eq!(
            body["figures"]["proportion"]["title"],
            "Success vs Failure for site A"
        );
        let labels: Vec<&str> = body["figures"]["proportion"]["sectors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["label"].as_str().unwrap())
            .collect();
        assert_eq!(labels, vec!["Success", "Failure"]);
    }

    #[tokio::test]
    async fn update_applies_range_change() {
        let (status, body) = post_json(
            "/api/update",
            json!({
                "selection": {"site": "A", "payload_range": {"low": 0, "high": 10000}},
                "change": {"payload_range": {"low": 1000, "high": 10000}}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selection"]["site"], "A");
        assert_eq!(scatter_masses(&body["figures"]["scatter"]), vec![9000.0]);
    }

    #[tokio::test]
    async fn update_rejects_inverted_range() {
        let (status, body) = post_json(
            "/api/update",
            json!({
                "selection": {"site": "ALL", "payload_range": {"low": 0, "high": 10000}},
                "change": {"payload_range": {"low": 9000, "high": 1000}}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_RANGE");
    }

    #[tokio::test]
    async fn update_with_incomplete_selection_returns_json_error() {
        let (status, body) = post_json(
            "/api/update",
            json!({
                "selection": {"site": "ALL"},
                "change": {"site": "A"}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "INVALID_BODY");
        assert!(body["message"].as_str().unwrap().contains("payload_range"));
    }

    #[tokio::test]
    async fn update_with_unparsable_body_returns_json_error() {
        let (status, body) = post_json("/api/update", json!("not an update")).await;
        assert!(status.is_client_error());
        assert_eq!(body["code"], "INVALID_BODY");
    }
}
