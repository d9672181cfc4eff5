use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, services::market_service};

// Cache hints scale with how fast each category goes stale.
const TTL_QUOTE: u32 = 5;
const TTL_HISTORICAL: u32 = 300;
const TTL_CRYPTO: u32 = 300;
const TTL_DIVIDENDS: u32 = 86_400;
const TTL_INSIDER: u32 = 3_600;
const TTL_NEWS: u32 = 300;
const TTL_INDICES: u32 = 60;
const TTL_SECTORS: u32 = 3_600;
const TTL_MOVERS: u32 = 60;
const TTL_SEARCH: u32 = 300;

fn cached_json<T: serde::Serialize>(ttl: u32, body: T) -> Response {
    (
        [(header::CACHE_CONTROL, format!("public, max-age={ttl}"))],
        Json(body),
    )
        .into_response()
}

fn missing_param(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

fn required(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[derive(Deserialize)]
pub struct QuoteQuery {
    pub symbol: Option<String>,
}

pub async fn get_quote(
    State(state): State<AppState>,
    Query(query): Query<QuoteQuery>,
) -> Response {
    let Some(symbol) = required(query.symbol) else {
        return missing_param("No symbol provided");
    };

    let quote = market_service::quote(&state, &symbol).await;
    cached_json(TTL_QUOTE, quote)
}

#[derive(Deserialize)]
pub struct HistoricalQuery {
    pub symbol: Option<String>,
    pub timeframe: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

pub async fn get_historical_price(
    State(state): State<AppState>,
    Query(query): Query<HistoricalQuery>,
) -> Response {
    let Some(symbol) = required(query.symbol) else {
        return missing_param("No symbol provided");
    };
    let timeframe = query.timeframe.unwrap_or_else(|| "1Y".to_string());

    let bars = market_service::historical(
        &state,
        &symbol,
        &timeframe,
        query.from.as_deref(),
        query.to.as_deref(),
    )
    .await;

    cached_json(TTL_HISTORICAL, bars)
}

#[derive(Deserialize)]
pub struct CryptoQuery {
    pub symbol: Option<String>,
    pub market: Option<String>,
}

pub async fn get_crypto(
    State(state): State<AppState>,
    Query(query): Query<CryptoQuery>,
) -> Response {
    let symbol = required(query.symbol).unwrap_or_else(|| "BTC".to_string());
    let market = required(query.market).unwrap_or_else(|| "USD".to_string());

    let body = market_service::crypto(&state, &symbol, &market).await;
    cached_json(TTL_CRYPTO, body)
}

#[derive(Deserialize)]
pub struct DividendsQuery {
    pub symbol: Option<String>,
}

pub async fn get_dividends(
    State(state): State<AppState>,
    Query(query): Query<DividendsQuery>,
) -> Response {
    let Some(symbol) = required(query.symbol) else {
        return missing_param("No symbol provided");
    };

    let dividends = market_service::dividends(&state, &symbol).await;
    cached_json(TTL_DIVIDENDS, json!({ "symbol": symbol, "dividends": dividends }))
}

#[derive(Deserialize)]
pub struct InsiderQuery {
    pub symbol: Option<String>,
    pub limit: Option<String>,
}

pub async fn get_insider_trading(
    State(state): State<AppState>,
    Query(query): Query<InsiderQuery>,
) -> Response {
    let Some(symbol) = required(query.symbol) else {
        return missing_param("No symbol provided");
    };
    let limit = query
        .limit
        .and_then(|l| l.parse::<i64>().ok())
        .unwrap_or(50);

    let trades = market_service::insider_trades(&state, &symbol, limit).await;
    cached_json(TTL_INSIDER, trades)
}

#[derive(Deserialize)]
pub struct NewsQuery {
    pub symbols: Option<String>,
}

pub async fn get_news(State(state): State<AppState>, Query(query): Query<NewsQuery>) -> Response {
    let symbols: Vec<String> = query
        .symbols
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if symbols.is_empty() {
        return missing_param("No symbols provided");
    }

    let articles = market_service::news(&state, &symbols).await;
    cached_json(TTL_NEWS, articles)
}

pub async fn get_market_indices(State(state): State<AppState>) -> Response {
    let indices = market_service::market_indices(&state).await;
    cached_json(TTL_INDICES, json!({ "indices": indices }))
}

pub async fn get_sector_performance(State(state): State<AppState>) -> Response {
    let sectors = market_service::sector_performance(&state).await;
    cached_json(TTL_SECTORS, json!({ "sectors": sectors }))
}

#[derive(Deserialize)]
pub struct MoversQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

pub async fn get_movers(
    State(state): State<AppState>,
    Query(query): Query<MoversQuery>,
) -> Response {
    let kind = required(query.kind).unwrap_or_else(|| "gainers".to_string());

    let movers = market_service::movers(&state, &kind).await;
    cached_json(TTL_MOVERS, movers)
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn get_search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    // An empty query is an empty result, not an error.
    let Some(q) = required(query.q) else {
        return cached_json(TTL_SEARCH, json!([]));
    };

    let results = market_service::search(&state, &q).await;
    cached_json(TTL_SEARCH, results)
}

pub async fn get_market_overview(State(state): State<AppState>) -> Response {
    let overview = market_service::market_overview(&state).await;
    cached_json(TTL_INDICES, overview)
}
