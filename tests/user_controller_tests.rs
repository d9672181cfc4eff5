use axum::{
    Router,
    http::{Request, StatusCode, header},
    routing::get,
};
use http_body_util::BodyExt;
use mongodb::{Client, bson::oid::ObjectId};
use tower::ServiceExt;

use finsim_gateway::{
    AppState, config,
    controllers::{position_controller, user_controller},
    models::CurrentUser,
    services,
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

async fn response_json(res: axum::response::Response) -> serde_json::Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn current_user() -> CurrentUser {
    CurrentUser {
        id: ObjectId::new(),
        email: "test@example.com".to_string(),
        username: "test".to_string(),
    }
}

#[tokio::test]
async fn filters_require_a_user() {
    let state = test_state().await;
    let app = Router::new()
        .route(
            "/api/user/filters",
            get(user_controller::get_filters).put(user_controller::put_filters),
        )
        .with_state(state);

    let req = Request::builder()
        .method("GET")
        .uri("/api/user/filters")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = response_json(res).await;
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn short_phone_number_is_rejected() {
    let state = test_state().await;
    let app = Router::new()
        .route(
            "/api/user/filters",
            get(user_controller::get_filters).put(user_controller::put_filters),
        )
        .with_state(state);

    let mut req = Request::builder()
        .method("PUT")
        .uri("/api/user/filters")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::json!({ "phoneNumber": "1234", "scrips": ["INFY"] }).to_string(),
        ))
        .unwrap();
    req.extensions_mut().insert(current_user());

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(res).await;
    assert!(body["error"]["phoneNumber"].is_string());
}

#[tokio::test]
async fn positions_require_a_user() {
    let state = test_state().await;
    let app = Router::new()
        .route(
            "/api/positions",
            get(position_controller::get_positions).delete(position_controller::delete_position),
        )
        .with_state(state);

    let req = Request::builder()
        .method("GET")
        .uri("/api/positions")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn closing_a_position_requires_an_id() {
    let state = test_state().await;
    let app = Router::new()
        .route(
            "/api/positions",
            get(position_controller::get_positions).delete(position_controller::delete_position),
        )
        .with_state(state);

    let mut req = Request::builder()
        .method("DELETE")
        .uri("/api/positions")
        .body(axum::body::Body::empty())
        .unwrap();
    req.extensions_mut().insert(current_user());

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_json(res).await;
    assert_eq!(body["error"], "id is required");
}

#[tokio::test]
async fn closing_with_a_malformed_id_is_not_found() {
    let state = test_state().await;
    let app = Router::new()
        .route(
            "/api/positions",
            get(position_controller::get_positions).delete(position_controller::delete_position),
        )
        .with_state(state);

    let mut req = Request::builder()
        .method("DELETE")
        .uri("/api/positions?id=not-an-object-id")
        .body(axum::body::Body::empty())
        .unwrap();
    req.extensions_mut().insert(current_user());

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body = response_json(res).await;
    assert_eq!(body["error"], "Position not found");
}
