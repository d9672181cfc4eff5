use axum::Router;
use axum::middleware::from_fn_with_state;
use tower_http::trace::TraceLayer;

use crate::{AppState, controllers::home_controller};

pub mod home_routes;
pub mod market_routes;
pub mod watchlist_routes;
pub mod strategy_routes;
pub mod position_routes;
pub mod user_routes;
pub mod forward_routes;
pub mod links_routes;

pub fn app(state: AppState) -> Router {
    let router = Router::<AppState>::new();

    let router = home_routes::add_routes(router);
    let router = market_routes::add_routes(router);
    let router = watchlist_routes::add_routes(router);
    let router = strategy_routes::add_routes(router);
    let router = position_routes::add_routes(router);
    let router = user_routes::add_routes(router);
    let router = forward_routes::add_routes(router);
    let router = links_routes::add_routes(router);

    router
        .fallback(home_controller::not_found)
        .layer(from_fn_with_state(state.clone(), crate::auth::inject_current_user))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
