use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{AppState, services::FieldErrors};

fn validation_failed(errs: FieldErrors) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": errs })),
    )
        .into_response()
}

/// Relay the backend's answer with its own status. Error bodies keep
/// whatever `error` field the backend set, with a fixed fallback.
fn relay(
    result: Result<(u16, Value), String>,
    failure_label: &str,
    include_details: bool,
) -> Response {
    match result {
        Ok((status, body)) if (200..300).contains(&status) => Json(body).into_response(),
        Ok((status, body)) => {
            let status =
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let error = body
                .get("error")
                .cloned()
                .unwrap_or_else(|| json!(failure_label));

            let payload = if include_details {
                json!({ "error": error, "details": body })
            } else {
                json!({ "error": error })
            };

            (status, Json(payload)).into_response()
        }
        Err(message) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": message })),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
pub struct BacktestPayload {
    #[serde(rename = "entryStrategy", default)]
    pub entry_strategy: String,

    #[serde(rename = "exitStrategy", default)]
    pub exit_strategy: String,

    #[serde(default)]
    pub stocks: Vec<String>,

    #[serde(default)]
    pub capital: Option<f64>,

    #[serde(rename = "startDate", default)]
    pub start_date: Option<String>,

    #[serde(rename = "endDate", default)]
    pub end_date: Option<String>,
}

pub async fn post_backtest(
    State(state): State<AppState>,
    Json(payload): Json<BacktestPayload>,
) -> Response {
    let mut errs = FieldErrors::new();

    if payload.entry_strategy.trim().chars().count() < 3 {
        errs.insert(
            "entryStrategy".into(),
            "Entry strategy must be at least 3 characters.".into(),
        );
    }
    if payload.exit_strategy.trim().chars().count() < 3 {
        errs.insert(
            "exitStrategy".into(),
            "Exit strategy must be at least 3 characters.".into(),
        );
    }
    if payload.stocks.is_empty() {
        errs.insert("stocks".into(), "Select at least one stock.".into());
    }
    if !errs.is_empty() {
        return validation_failed(errs);
    }

    let capital = payload.capital.unwrap_or(50_000.0);
    let query = format!(
        "Entry: {}. Exit: {}",
        payload.entry_strategy.trim(),
        payload.exit_strategy.trim()
    );

    let body = json!({
        "query": query,
        "tickers": payload.stocks,
        "period": "2y",
        "capital": capital,
    });

    relay(
        state.backend.post("/backtest", &body).await,
        "Backtest failed",
        true,
    )
}

#[derive(Deserialize)]
pub struct OptimizePayload {
    #[serde(default)]
    pub tickers: Vec<String>,

    #[serde(default)]
    pub capital: Option<f64>,
}

pub async fn post_optimize(
    State(state): State<AppState>,
    Json(payload): Json<OptimizePayload>,
) -> Response {
    let mut errs = FieldErrors::new();

    if payload.tickers.len() < 2 {
        errs.insert(
            "tickers".into(),
            "Please provide at least 2 tickers".into(),
        );
    }
    let capital = payload.capital.unwrap_or(10_000.0);
    if capital <= 0.0 {
        errs.insert("capital".into(), "Capital must be positive.".into());
    }
    if !errs.is_empty() {
        return validation_failed(errs);
    }

    let body = json!({
        "tickers": payload.tickers,
        "capital": capital,
    });

    relay(
        state.backend.post("/optimize", &body).await,
        "Backend request failed",
        false,
    )
}

#[derive(Deserialize)]
pub struct SimulatePayload {
    #[serde(default)]
    pub n_simulations: Option<i64>,

    #[serde(default)]
    pub starting_capital: Option<f64>,

    #[serde(default)]
    pub risk_per_trade: Option<f64>,

    #[serde(default)]
    pub risk_reward_ratio: Option<f64>,

    #[serde(default)]
    pub win_rate: Option<f64>,

    #[serde(default)]
    pub num_trades: Option<i64>,
}

pub async fn post_simulate(
    State(state): State<AppState>,
    Json(payload): Json<SimulatePayload>,
) -> Response {
    let mut errs = FieldErrors::new();

    let n_simulations = payload.n_simulations.unwrap_or(1_000);
    if !(100..=100_000).contains(&n_simulations) {
        errs.insert(
            "n_simulations".into(),
            "Number of simulations must be between 100 and 100000.".into(),
        );
    }

    let starting_capital = payload.starting_capital.unwrap_or(10_000.0);
    if starting_capital <= 0.0 {
        errs.insert(
            "starting_capital".into(),
            "Starting capital must be positive.".into(),
        );
    }

    let risk_per_trade = payload.risk_per_trade.unwrap_or(0.01);
    if !(0.0..=1.0).contains(&risk_per_trade) {
        errs.insert(
            "risk_per_trade".into(),
            "Risk per trade must be between 0 and 1.".into(),
        );
    }

    let risk_reward_ratio = payload.risk_reward_ratio.unwrap_or(1.5);
    if risk_reward_ratio <= 0.0 {
        errs.insert(
            "risk_reward_ratio".into(),
            "Risk/reward ratio must be positive.".into(),
        );
    }

    let win_rate = payload.win_rate.unwrap_or(0.5);
    if !(0.0..=1.0).contains(&win_rate) {
        errs.insert("win_rate".into(), "Win rate must be between 0 and 1.".into());
    }

    let num_trades = payload.num_trades.unwrap_or(100);
    if !(10..=5_000).contains(&num_trades) {
        errs.insert(
            "num_trades".into(),
            "Number of trades must be between 10 and 5000.".into(),
        );
    }

    if !errs.is_empty() {
        return validation_failed(errs);
    }

    let body = json!({
        "n_simulations": n_simulations,
        "starting_capital": starting_capital,
        "risk_per_trade": risk_per_trade,
        "risk_reward_ratio": risk_reward_ratio,
        "win_rate": win_rate,
        "num_trades": num_trades,
    });

    relay(
        state.backend.post("/simulate", &body).await,
        "Backend request failed",
        false,
    )
}

#[derive(Deserialize)]
pub struct RagPayload {
    #[serde(default)]
    pub query: String,

    #[serde(default)]
    pub top_k: Option<i64>,

    #[serde(default)]
    pub max_iterations: Option<i64>,
}

pub async fn post_rag(
    State(state): State<AppState>,
    Json(payload): Json<RagPayload>,
) -> Response {
    let mut errs = FieldErrors::new();

    if payload.query.trim().is_empty() {
        errs.insert("query".into(), "Query is required".into());
    }

    let top_k = payload.top_k.unwrap_or(20);
    if !(1..=100).contains(&top_k) {
        errs.insert("top_k".into(), "top_k must be between 1 and 100.".into());
    }

    let max_iterations = payload.max_iterations.unwrap_or(3);
    if !(1..=5).contains(&max_iterations) {
        errs.insert(
            "max_iterations".into(),
            "max_iterations must be between 1 and 5.".into(),
        );
    }

    if !errs.is_empty() {
        return validation_failed(errs);
    }

    let body = json!({
        "query": payload.query.trim(),
        "top_k": top_k,
        "max_iterations": max_iterations,
    });

    relay(
        state.backend.post("/agentic-rag", &body).await,
        "Agentic RAG failed",
        true,
    )
}

pub async fn get_rag_health(State(state): State<AppState>) -> Response {
    relay(
        state.backend.get("/agentic-rag/health").await,
        "Backend health check failed",
        false,
    )
}
