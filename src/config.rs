use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub host: String,
    pub port: u16,

    pub jwt_secret: String,
    pub jwt_cookie_name: String,

    // Provider keys. Empty means "skip that provider", not an error.
    pub fmp_api_key: String,
    pub alpha_vantage_api_key: String,
    pub finnhub_api_key: String,

    pub backend_url: String,
    pub base_url: String,
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let mongodb_uri = env::var("MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

    let mongodb_db = env::var("MONGODB_DB")
        .unwrap_or_else(|_| "finsim".to_string());

    let host = env::var("HOST")
        .unwrap_or_else(|_| "127.0.0.1".to_string());

    let port = env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(4000);

    let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| "change-me-dev-secret".to_string());
    let jwt_cookie_name = env::var("JWT_COOKIE_NAME").unwrap_or_else(|_| "auth".to_string());

    let fmp_api_key = env::var("FMP_API_KEY").unwrap_or_default();
    let alpha_vantage_api_key = env::var("ALPHA_VANTAGE_API_KEY").unwrap_or_default();
    let finnhub_api_key = env::var("FINNHUB_API_KEY").unwrap_or_default();

    let backend_url = env::var("BACKEND_URL")
        .unwrap_or_else(|_| "http://localhost:5001".to_string());

    let base_url = env::var("BASE_URL")
        .unwrap_or_else(|_| "http://localhost:4000".to_string());

    Settings {
        mongodb_uri,
        mongodb_db,
        host,
        port,
        jwt_secret,
        jwt_cookie_name,
        fmp_api_key,
        alpha_vantage_api_key,
        finnhub_api_key,
        backend_url,
        base_url,
    }
}
