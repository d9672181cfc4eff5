use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::{AppState, controllers::watchlist_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route(
            "/api/watchlist",
            get(watchlist_controller::get_watchlists).post(watchlist_controller::post_watchlist),
        )
        .route(
            "/api/watchlist/:id",
            put(watchlist_controller::put_watchlist)
                .delete(watchlist_controller::delete_watchlist),
        )
        .route(
            "/api/watchlist/:id/stocks",
            post(watchlist_controller::post_watchlist_stock),
        )
        .route(
            "/api/watchlist/:id/stocks/:symbol",
            delete(watchlist_controller::delete_watchlist_stock),
        )
}
