use axum::{Router, routing::post};

use crate::{AppState, controllers::forward_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/backtest", post(forward_controller::post_backtest))
        .route("/api/optimize", post(forward_controller::post_optimize))
        .route("/api/simulate", post(forward_controller::post_simulate))
        .route(
            "/api/agentic-rag",
            post(forward_controller::post_rag).get(forward_controller::get_rag_health),
        )
}
