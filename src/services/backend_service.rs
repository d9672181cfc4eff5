use reqwest::Client;
use serde_json::{Value, json};

/// Client for the analytics backend that does the actual
/// backtesting/optimization/simulation math. The gateway only
/// validates and relays; no retries, no timeout overrides.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// POST the payload and hand back the backend's status and JSON
    /// body untouched. A body that is not JSON becomes an empty object,
    /// matching how callers treat unreadable error bodies.
    pub async fn post(&self, path: &str, payload: &Value) -> Result<(u16, Value), String> {
        let url = format!("{}{}", self.base_url, path);

        let res = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = res.status().as_u16();
        let body = res.json::<Value>().await.unwrap_or_else(|_| json!({}));

        Ok((status, body))
    }

    /// GET pass-through, used for the RAG health probe.
    pub async fn get(&self, path: &str) -> Result<(u16, Value), String> {
        let url = format!("{}{}", self.base_url, path);

        let res = self.http.get(&url).send().await.map_err(|e| e.to_string())?;

        let status = res.status().as_u16();
        let body = res.json::<Value>().await.unwrap_or_else(|_| json!({}));

        Ok((status, body))
    }
}
