use axum::{
    Router,
    http::{Request, StatusCode, header},
    routing::post,
};
use http_body_util::BodyExt;
use mongodb::Client;
use tower::ServiceExt;

use finsim_gateway::{AppState, config, controllers::forward_controller, services};

async fn test_state() -> AppState {
    let mut settings = config::load();
    settings.fmp_api_key = String::new();
    settings.alpha_vantage_api_key = String::new();
    settings.finnhub_api_key = String::new();

    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("mongodb client");
    let db = client.database(&settings.mongodb_db);

    AppState {
        db,
        fmp: services::fmp::FmpClient::new(settings.fmp_api_key.clone()),
        alpha_vantage: services::alpha_vantage::AlphaVantageClient::new(
            settings.alpha_vantage_api_key.clone(),
        ),
        finnhub: services::finnhub::FinnhubClient::new(settings.finnhub_api_key.clone()),
        backend: services::backend_service::BackendClient::new(settings.backend_url.clone()),
        links: services::link_service::LinkRegistry::new(),
        settings,
    }
}

async fn response_json(res: axum::response::Response) -> serde_json::Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_post(uri: &str, body: serde_json::Value) -> Request<axum::body::Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn backtest_with_no_stocks_fails_validation() {
    let state = test_state().await;
    let app = Router::new()
        .route("/api/backtest", post(forward_controller::post_backtest))
        .with_state(state);

    // Validation runs before any outbound call, so no backend is needed.
    let res = app
        .oneshot(json_post(
            "/api/backtest",
            serde_json::json!({
                "entryStrategy": "RSI below 30",
                "exitStrategy": "RSI above 70",
                "stocks": [],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(res).await;
    assert!(body["error"]["stocks"].is_string());
}

#[tokio::test]
async fn backtest_with_short_strategies_fails_validation() {
    let state = test_state().await;
    let app = Router::new()
        .route("/api/backtest", post(forward_controller::post_backtest))
        .with_state(state);

    let res = app
        .oneshot(json_post(
            "/api/backtest",
            serde_json::json!({
                "entryStrategy": "ab",
                "exitStrategy": "",
                "stocks": ["AAPL"],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(res).await;
    assert!(body["error"]["entryStrategy"].is_string());
    assert!(body["error"]["exitStrategy"].is_string());
}

#[tokio::test]
async fn optimize_with_one_ticker_fails_validation() {
    let state = test_state().await;
    let app = Router::new()
        .route("/api/optimize", post(forward_controller::post_optimize))
        .with_state(state);

    let res = app
        .oneshot(json_post(
            "/api/optimize",
            serde_json::json!({ "tickers": ["AAPL"] }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(res).await;
    assert_eq!(body["error"]["tickers"], "Please provide at least 2 tickers");
}

#[tokio::test]
async fn optimize_with_nonpositive_capital_fails_validation() {
    let state = test_state().await;
    let app = Router::new()
        .route("/api/optimize", post(forward_controller::post_optimize))
        .with_state(state);

    let res = app
        .oneshot(json_post(
            "/api/optimize",
            serde_json::json!({ "tickers": ["AAPL", "MSFT"], "capital": 0.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(res).await;
    assert!(body["error"]["capital"].is_string());
}

#[tokio::test]
async fn rag_with_empty_query_fails_validation() {
    let state = test_state().await;
    let app = Router::new()
        .route("/api/agentic-rag", post(forward_controller::post_rag))
        .with_state(state);

    let res = app
        .oneshot(json_post(
            "/api/agentic-rag",
            serde_json::json!({ "query": "   " }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(res).await;
    assert_eq!(body["error"]["query"], "Query is required");
}

#[tokio::test]
async fn rag_range_checks_catch_bad_inputs() {
    let state = test_state().await;
    let app = Router::new()
        .route("/api/agentic-rag", post(forward_controller::post_rag))
        .with_state(state);

    let res = app
        .oneshot(json_post(
            "/api/agentic-rag",
            serde_json::json!({
                "query": "What moved semiconductor stocks this week?",
                "top_k": 500,
                "max_iterations": 0,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(res).await;
    assert!(body["error"]["top_k"].is_string());
    assert!(body["error"]["max_iterations"].is_string());
}

#[tokio::test]
async fn simulate_range_checks_catch_bad_inputs() {
    let state = test_state().await;
    let app = Router::new()
        .route("/api/simulate", post(forward_controller::post_simulate))
        .with_state(state);

    let res = app
        .oneshot(json_post(
            "/api/simulate",
            serde_json::json!({
                "n_simulations": 50,
                "win_rate": 1.5,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(res).await;
    assert!(body["error"]["n_simulations"].is_string());
    assert!(body["error"]["win_rate"].is_string());
}
