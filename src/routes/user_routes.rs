use axum::{Router, routing::get};

use crate::{AppState, controllers::user_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route(
        "/api/user/filters",
        get(user_controller::get_filters).put(user_controller::put_filters),
    )
}
