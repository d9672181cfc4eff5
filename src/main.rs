use std::net::SocketAddr;

use mongodb::Client;

use finsim_gateway::{AppState, config, routes, services};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = config::load();

    // Mongo connection
    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("Failed to connect to MongoDB");
    let db = client.database(&settings.mongodb_db);

    let state = AppState {
        db,
        fmp: services::fmp::FmpClient::new(settings.fmp_api_key.clone()),
        alpha_vantage: services::alpha_vantage::AlphaVantageClient::new(
            settings.alpha_vantage_api_key.clone(),
        ),
        finnhub: services::finnhub::FinnhubClient::new(settings.finnhub_api_key.clone()),
        backend: services::backend_service::BackendClient::new(settings.backend_url.clone()),
        links: services::link_service::LinkRegistry::new(),
        settings,
    };

    let app = routes::app(state.clone());

    let addr = SocketAddr::from((
        state
            .settings
            .host
            .parse::<std::net::IpAddr>()
            .expect("HOST must be a valid IP address"),
        state.settings.port,
    ));
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.expect("bind");
    axum::serve(listener, app).await.expect("server error");
}
