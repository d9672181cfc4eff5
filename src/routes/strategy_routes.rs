use axum::{Router, routing::get};

use crate::{AppState, controllers::strategy_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route(
        "/api/strategies",
        get(strategy_controller::get_strategies).post(strategy_controller::post_strategy),
    )
}
