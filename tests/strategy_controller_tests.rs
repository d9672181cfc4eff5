use axum::{
    Router,
    http::{Request, StatusCode, header},
    routing::get,
};
use http_body_util::BodyExt;
use mongodb::{Client, bson::oid::ObjectId};
use tower::ServiceExt;

use finsim_gateway::{
    AppState, config, controllers::strategy_controller, models::CurrentUser, services,
};

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

fn strategy_app(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/strategies",
            get(strategy_controller::get_strategies).post(strategy_controller::post_strategy),
        )
        .with_state(state)
}

async fn response_json(res: axum::response::Response) -> serde_json::Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_post(uri: &str, body: serde_json::Value, authed: bool) -> Request<axum::body::Body> {
    let mut req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap();

    if authed {
        req.extensions_mut().insert(CurrentUser {
            id: ObjectId::new(),
            email: "test@example.com".to_string(),
            username: "test".to_string(),
        });
    }
    req
}

fn equity_leg() -> serde_json::Value {
    serde_json::json!({
        "type": "equity",
        "action": "buy",
        "symbol": "AAPL",
        "quantity": 10.0,
        "orderType": "market",
    })
}

#[tokio::test]
async fn list_without_user_returns_401() {
    let app = strategy_app(test_state().await);

    let req = Request::builder()
        .method("GET")
        .uri("/api/strategies")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_without_user_returns_401() {
    let app = strategy_app(test_state().await);

    let req = json_post(
        "/api/strategies",
        serde_json::json!({ "name": "Iron Condor", "legs": [equity_leg()] }),
        false,
    );

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_without_legs_is_rejected() {
    let app = strategy_app(test_state().await);

    let req = json_post(
        "/api/strategies",
        serde_json::json!({ "name": "Iron Condor", "legs": [] }),
        true,
    );

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(res).await;
    assert!(body["error"]["legs"].is_string());
}

#[tokio::test]
async fn create_with_short_name_is_rejected() {
    let app = strategy_app(test_state().await);

    let req = json_post(
        "/api/strategies",
        serde_json::json!({ "name": "ab", "legs": [equity_leg()] }),
        true,
    );

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(res).await;
    assert!(body["error"]["name"].is_string());
}

#[tokio::test]
async fn create_with_unknown_leg_type_is_rejected() {
    let app = strategy_app(test_state().await);

    let mut leg = equity_leg();
    leg["type"] = serde_json::json!("future");

    let req = json_post(
        "/api/strategies",
        serde_json::json!({ "name": "Straddle", "legs": [leg] }),
        true,
    );

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(res).await;
    assert!(body["error"]["legs[0].type"].is_string());
}

#[tokio::test]
async fn limit_leg_without_price_is_rejected() {
    let app = strategy_app(test_state().await);

    let mut leg = equity_leg();
    leg["orderType"] = serde_json::json!("limit");

    let req = json_post(
        "/api/strategies",
        serde_json::json!({ "name": "Covered Call", "legs": [leg] }),
        true,
    );

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(res).await;
    assert!(body["error"]["legs[0].limitPrice"].is_string());
}
