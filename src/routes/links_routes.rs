use axum::{
    Router,
    routing::{get, post},
};

use crate::{AppState, controllers::links_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/links", post(links_controller::post_link))
        .route("/api/links/analytics", get(links_controller::get_analytics))
        .route(
            "/api/links/analytics/:code",
            get(links_controller::get_link_analytics),
        )
        .route("/l/:code", get(links_controller::get_redirect))
}
