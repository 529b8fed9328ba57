use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use guardian_common::types::{Metric, MetricError, MetricKind, MetricPayload};
use guardian_storage::{Storage, StorageError};
use std::fmt::Write;

/// Request-level failure. Each variant maps to exactly one status code and
/// a plain-text body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Metric(#[from] MetricError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Path-encoded update with an empty `{name}` segment.
    #[error("metric name is required")]
    EmptyName,

    #[error("metric not found")]
    NotFound,

    #[error("invalid JSON body: {0}")]
    BadJson(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::EmptyName | ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Metric(_) | ApiError::Storage(_) | ApiError::BadJson(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

fn json_body(
    payload: Result<Json<MetricPayload>, JsonRejection>,
) -> Result<MetricPayload, ApiError> {
    payload
        .map(|Json(p)| p)
        .map_err(|e| ApiError::BadJson(e.body_text()))
}

fn lookup(storage: &dyn Storage, kind: MetricKind, name: &str) -> Option<Metric> {
    match kind {
        MetricKind::Gauge => storage.get_gauge(name).map(|v| Metric::gauge(name, v)),
        MetricKind::Counter => storage.get_counter(name).map(|d| Metric::counter(name, d)),
    }
}

/// `POST /update/{kind}/{name}/{value}`
pub async fn update_by_path(
    State(state): State<AppState>,
    Path((kind, name, value)): Path<(String, String, String)>,
) -> Result<&'static str, ApiError> {
    if name.is_empty() {
        return Err(ApiError::EmptyName);
    }
    let metric = Metric::from_parts(&kind, &name, &value)?;
    state.storage.update_metric(metric)?;
    Ok("OK")
}

/// `POST /update/`. Echoes the value stored after the update; for counters
/// that is the running sum, not the delta sent.
pub async fn update_json(
    State(state): State<AppState>,
    payload: Result<Json<MetricPayload>, JsonRejection>,
) -> Result<Json<MetricPayload>, ApiError> {
    let metric = Metric::try_from(json_body(payload)?)?;
    let stored = state.storage.update_metric(metric)?;
    Ok(Json(MetricPayload::from(&stored)))
}

/// `GET /value/{kind}/{name}`
pub async fn value_by_path(
    State(state): State<AppState>,
    Path((kind, name)): Path<(String, String)>,
) -> Result<String, ApiError> {
    // An unknown kind can never have been written.
    let kind: MetricKind = kind.parse().map_err(|_| ApiError::NotFound)?;
    lookup(state.storage.as_ref(), kind, &name)
        .map(|m| m.value.to_string())
        .ok_or(ApiError::NotFound)
}

/// `POST /value/`
pub async fn value_json(
    State(state): State<AppState>,
    payload: Result<Json<MetricPayload>, JsonRejection>,
) -> Result<Json<MetricPayload>, ApiError> {
    let payload = json_body(payload)?;
    let (kind, name) = payload.identity()?;
    let metric = lookup(state.storage.as_ref(), kind, name).ok_or(ApiError::NotFound)?;
    Ok(Json(MetricPayload::from(&metric)))
}

/// `GET /`: diagnostic table of everything stored.
pub async fn list_metrics(State(state): State<AppState>) -> Html<String> {
    let mut metrics = state.storage.get_all();
    metrics.sort_by(|a, b| (a.kind(), &a.name).cmp(&(b.kind(), &b.name)));
    Html(render_table(&metrics))
}

fn render_table(metrics: &[Metric]) -> String {
    let mut html = String::from(
        "<html><body><h1>Metrics</h1><table border=\"1\">\
         <tr><th>Name</th><th>Type</th><th>Value</th></tr>",
    );
    for metric in metrics {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            html_escape(&metric.name),
            metric.kind(),
            metric.value
        );
    }
    html.push_str("</table></body></html>");
    html
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_mapping() {
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::EmptyName.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(MetricError::InvalidKind("histogram".to_string())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(StorageError::CounterOverflow {
                name: "n".to_string()
            })
            .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn table_escapes_names() {
        let html = render_table(&[Metric::gauge("<b>", 1.5), Metric::counter("hits", 3)]);
        assert!(html.contains("<td>&lt;b&gt;</td><td>gauge</td><td>1.5</td>"));
        assert!(html.contains("<td>hits</td><td>counter</td><td>3</td>"));
    }
}
