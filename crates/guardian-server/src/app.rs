use crate::state::AppState;
use crate::{api, logging};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

pub fn build_http_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::list_metrics))
        .route("/update/{kind}/{name}/{value}", post(api::update_by_path))
        .route("/update", post(api::update_json))
        .route("/update/", post(api::update_json))
        .route("/value/{kind}/{name}", get(api::value_by_path))
        .route("/value", post(api::value_json))
        .route("/value/", post(api::value_json))
        .with_state(state)
        .layer(middleware::from_fn(logging::request_logging))
}
