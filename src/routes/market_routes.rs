use axum::{Router, routing::get};

use crate::{AppState, controllers::market_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/quote", get(market_controller::get_quote))
        .route("/api/historical-price", get(market_controller::get_historical_price))
        .route("/api/crypto", get(market_controller::get_crypto))
        .route("/api/dividends", get(market_controller::get_dividends))
        .route("/api/insider-trading", get(market_controller::get_insider_trading))
        .route("/api/news", get(market_controller::get_news))
        .route("/api/market-indices", get(market_controller::get_market_indices))
        .route("/api/sector-performance", get(market_controller::get_sector_performance))
        .route("/api/movers", get(market_controller::get_movers))
        .route("/api/search", get(market_controller::get_search))
        .route("/api/market-overview", get(market_controller::get_market_overview))
}
