use axum::{Router, routing::get};

use crate::{AppState, controllers::position_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route(
        "/api/positions",
        get(position_controller::get_positions).delete(position_controller::delete_position),
    )
}
