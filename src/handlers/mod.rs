pub mod flow;
pub mod health;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/services", get(flow::list_services))
        .route("/api/flows", post(flow::create_flow))
        .route(
            "/api/flows/:id",
            get(flow::get_flow).delete(flow::delete_flow),
        )
        .route("/api/flows/:id/contact", post(flow::update_contact))
        .route("/api/flows/:id/info", post(flow::submit_info))
        .route("/api/flows/:id/date", post(flow::select_date))
        .route("/api/flows/:id/slot", post(flow::select_slot))
        .route("/api/flows/:id/confirm", post(flow::confirm))
        .route("/api/flows/:id/back", post(flow::go_back))
        .route("/api/flows/:id/reset", post(flow::reset))
        .route("/api/flows/:id/events", get(flow::events_stream))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
