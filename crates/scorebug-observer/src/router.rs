//! Axum router construction for the observer.
//!
//! Assembles the renderer routes, the `WebSocket` push and the operator
//! API into a single [`Router`] with CORS and request tracing.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::state::AppState;
use crate::{handlers, operator, ws};

const FIXED_ROUTES: [&str; 3] = ["/", "/overlay.html", "/state.json"];

/// Build the complete router.
///
/// - `GET /`, `GET /overlay.html` -- rendered document
/// - `GET /state.json` -- latest state record, also served under
///   [`AppState::record_route`] so the document's relative fetch resolves
/// - `GET /ws/state` -- `WebSocket` record stream
/// - `GET /api/roster/{side}` -- player labels
/// - `/api/operator/*` -- operator commands (see [`operator`])
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        // Renderer
        .route("/", get(handlers::document))
        .route("/overlay.html", get(handlers::document))
        .route("/state.json", get(handlers::record))
        // WebSocket
        .route("/ws/state", get(ws::ws_state))
        // Pickers
        .route("/api/roster/{side}", get(handlers::roster))
        // Operator
        .route("/api/operator/status", get(operator::status))
        .route("/api/operator/clock/toggle", post(operator::toggle_clock))
        .route("/api/operator/reset", post(operator::reset))
        .route("/api/operator/period", post(operator::set_period))
        .route("/api/operator/added-time", post(operator::added_time))
        .route("/api/operator/goal", post(operator::goal))
        .route("/api/operator/score/correct", post(operator::correct_score))
        .route("/api/operator/card", post(operator::card))
        .route("/api/operator/substitution", post(operator::substitution))
        .route("/api/operator/stats", post(operator::stats))
        .route("/api/operator/stats/schedule", post(operator::schedule_stats))
        .route("/api/operator/overlay/hide", post(operator::hide_overlay))
        .route("/api/operator/teams", post(operator::teams))
        .route("/api/operator/crest", post(operator::crest));

    let record_route = state.record_route.as_str();
    if is_plain_route(record_route) && !FIXED_ROUTES.contains(&record_route) {
        router = router.route(record_route, get(handlers::record));
    } else if !FIXED_ROUTES.contains(&record_route) {
        warn!(route = record_route, "Record route not servable, use /state.json");
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A static path of plain segments that cannot collide with the API.
fn is_plain_route(route: &str) -> bool {
    route.len() > 1
        && route.starts_with('/')
        && !route.starts_with("/api/")
        && !route.starts_with("/ws/")
        && !route.contains("//")
        && route
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'/' | b'.' | b'-' | b'_'))
}
