use axum::{
    Router,
    http::{Request, StatusCode, header},
    routing::{get, post},
};
use http_body_util::BodyExt;
use mongodb::Client;
use tower::ServiceExt;

use finsim_gateway::{AppState, config, controllers::links_controller, services};

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

fn links_app(state: AppState) -> Router {
    Router::new()
        .route("/api/links", post(links_controller::post_link))
        .route("/api/links/analytics", get(links_controller::get_analytics))
        .route(
            "/api/links/analytics/:code",
            get(links_controller::get_link_analytics),
        )
        .route("/l/:code", get(links_controller::get_redirect))
        .with_state(state)
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

fn get_request(uri: &str) -> Request<axum::body::Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap()
}

#[tokio::test]
async fn shorten_then_redirect_roundtrips() {
    let app = links_app(test_state().await);

    let res = app
        .clone()
        .oneshot(json_post(
            "/api/links",
            serde_json::json!({ "url": "https://example.com/filing.pdf" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = response_json(res).await;
    let code = body["shortCode"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 6);
    assert!(body["shortUrl"].as_str().unwrap().ends_with(&format!("/l/{code}")));

    let res = app
        .oneshot(get_request(&format!("/l/{code}")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        res.headers().get(header::LOCATION).unwrap(),
        "https://example.com/filing.pdf"
    );
}

#[tokio::test]
async fn unknown_code_is_404_not_a_crash() {
    let app = links_app(test_state().await);

    let res = app.oneshot(get_request("/l/zzzzzz")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body = response_json(res).await;
    assert_eq!(body["error"], "Link not found");
}

#[tokio::test]
async fn clicks_increment_once_per_redirect() {
    let app = links_app(test_state().await);

    let res = app
        .clone()
        .oneshot(json_post(
            "/api/links",
            serde_json::json!({
                "url": "https://example.com/announcement.pdf",
                "metadata": { "stockCode": "INFY", "filingType": "Board Meeting" },
            }),
        ))
        .await
        .unwrap();
    let code = response_json(res).await["shortCode"]
        .as_str()
        .unwrap()
        .to_string();

    app.clone()
        .oneshot(get_request(&format!("/l/{code}")))
        .await
        .unwrap();
    app.clone()
        .oneshot(get_request(&format!("/l/{code}")))
        .await
        .unwrap();

    let res = app
        .oneshot(get_request(&format!("/api/links/analytics/{code}")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let record = response_json(res).await;
    assert_eq!(record["clicks"], 2);
    assert_eq!(record["originalUrl"], "https://example.com/announcement.pdf");
    assert_eq!(record["metadata"]["stockCode"], "INFY");
}

#[tokio::test]
async fn missing_url_is_rejected() {
    let app = links_app(test_state().await);

    let res = app
        .oneshot(json_post("/api/links", serde_json::json!({ "url": "  " })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(res).await;
    assert!(body["error"]["url"].is_string());
}

#[tokio::test]
async fn analytics_lists_every_link() {
    let app = links_app(test_state().await);

    for url in ["https://a.example", "https://b.example"] {
        app.clone()
            .oneshot(json_post("/api/links", serde_json::json!({ "url": url })))
            .await
            .unwrap();
    }

    let res = app
        .oneshot(get_request("/api/links/analytics"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = response_json(res).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["links"].as_array().unwrap().len(), 2);
}
