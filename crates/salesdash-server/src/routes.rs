//! HTTP routes
//!
//! - `GET /` dashboard page
//! - `GET /api/panels` the same panels as JSON
//! - `GET /health`
//! - `GET /metrics`

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use maud::Markup;
use salesdash_data::{DataBundle, DateRange};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::metrics::Metrics;
use crate::page::dashboard_page;
use crate::panels::{render, PanelSet};

#[derive(Clone)]
pub struct AppState {
    bundle: Arc<DataBundle>,
    default_range: DateRange,
    metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(bundle: DataBundle, default_range: DateRange, metrics: Metrics) -> Self {
        Self {
            bundle: Arc::new(bundle),
            default_range,
            metrics: Arc::new(metrics),
        }
    }
}

/// Optional `start`/`end` query parameters; blank values count as absent
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    start: Option<String>,
    end: Option<String>,
}

impl RangeQuery {
    fn resolve(&self, defaults: DateRange) -> Result<DateRange, RouteError> {
        let start = parse_date("start", self.start.as_deref())?.unwrap_or(defaults.start);
        let end = parse_date("end", self.end.as_deref())?.unwrap_or(defaults.end);
        Ok(DateRange::new(start, end))
    }
}

fn parse_date(field: &'static str, value: Option<&str>) -> Result<Option<NaiveDate>, RouteError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| RouteError::InvalidDate {
                field,
                value: value.to_string(),
            }),
    }
}

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid {field} date '{value}', expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },

    #[error("failed to encode metrics: {0}")]
    Metrics(#[from] prometheus::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        let status = match self {
            RouteError::InvalidDate { .. } => StatusCode::BAD_REQUEST,
            RouteError::Metrics(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!(status = %status, error = %self, "Request rejected");
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/api/panels", get(panels_json))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Render every panel inside a span tagged with a fresh request id
fn render_panels(state: &AppState, query: &RangeQuery) -> Result<PanelSet, RouteError> {
    let range = query.resolve(state.default_range)?;
    let span = tracing::info_span!(
        "render",
        request_id = %uuid::Uuid::new_v4(),
        start = %range.start,
        end = %range.end,
    );

    let panels = span.in_scope(|| render(&state.bundle, range));
    state.metrics.observe(&panels);
    Ok(panels)
}

async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Markup, RouteError> {
    let panels = render_panels(&state, &query)?;
    Ok(dashboard_page(&panels))
}

async fn panels_json(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
    headers: HeaderMap,
) -> Result<Response, RouteError> {
    let panels = render_panels(&state, &query)?;
    let etag = format!("\"{}\"", panels.fingerprint());

    let unchanged = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| etag_matches(value, &etag));

    let mut response = if unchanged {
        StatusCode::NOT_MODIFIED.into_response()
    } else {
        Json(panels).into_response()
    };
    if let Ok(value) = HeaderValue::from_str(&etag) {
        response.headers_mut().insert(header::ETAG, value);
    }
    Ok(response)
}

/// Weak comparison of an `If-None-Match` list against `etag`
fn etag_matches(header: &str, etag: &str) -> bool {
    header.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
    })
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn metrics(State(state): State<AppState>) -> Result<Response, RouteError> {
    let body = state.metrics.encode()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_missing_params_use_defaults() {
        let range = RangeQuery::default().resolve(DateRange::default()).unwrap();
        assert_eq!(range, DateRange::default());
    }

    #[test]
    fn test_blank_param_counts_as_missing() {
        let query = RangeQuery {
            start: Some(String::new()),
            end: Some("2017-12-31".to_string()),
        };
        let range = query.resolve(DateRange::default()).unwrap();
        assert_eq!(range.start, date(2017, 1, 1));
        assert_eq!(range.end, date(2017, 12, 31));
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        let query = RangeQuery {
            start: Some("2017-02-30".to_string()),
            end: None,
        };
        match query.resolve(DateRange::default()) {
            Err(RouteError::InvalidDate { field, value }) => {
                assert_eq!(field, "start");
                assert_eq!(value, "2017-02-30");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_if_none_match_lists() {
        let etag = r#""abc123""#;
        assert!(etag_matches(etag, etag));
        assert!(etag_matches(r#""other", "abc123""#, etag));
        assert!(etag_matches(r#"W/"abc123""#, etag));
        assert!(etag_matches("*", etag));
        assert!(!etag_matches(r#""other""#, etag));
        assert!(!etag_matches(r#""abc""#, etag));
    }
}
