use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filing_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLink {
    pub original_url: String,
    pub short_code: String,
    pub clicks: u64,
    pub created_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<LinkMetadata>,
}

/// Process-wide short-link store. In-memory only: entries live for the
/// lifetime of the process, nothing is evicted, and growth is
/// unbounded. Codes are not checked for uniqueness; a collision
/// silently replaces the earlier entry.
#[derive(Clone, Default)]
pub struct LinkRegistry {
    links: Arc<Mutex<HashMap<String, ShortLink>>>,
}

fn generate_short_code() -> String {
    let bytes: [u8; 4] = rand::random();
    let mut code = URL_SAFE_NO_PAD.encode(bytes);
    code.truncate(6);
    code
}

impl LinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shorten(&self, original_url: &str, metadata: Option<LinkMetadata>) -> String {
        let short_code = generate_short_code();

        let link = ShortLink {
            original_url: original_url.to_string(),
            short_code: short_code.clone(),
            clicks: 0,
            created_at: Utc::now(),
            metadata,
        };

        let mut links = self.links.lock().unwrap_or_else(|e| e.into_inner());
        links.insert(short_code.clone(), link);

        short_code
    }

    /// Resolving counts as a click.
    pub fn resolve(&self, short_code: &str) -> Option<String> {
        let mut links = self.links.lock().unwrap_or_else(|e| e.into_inner());
        let link = links.get_mut(short_code)?;

        link.clicks += 1;
        tracing::info!(
            short_code,
            url = %link.original_url,
            clicks = link.clicks,
            "short link clicked"
        );

        Some(link.original_url.clone())
    }

    pub fn analytics(&self, short_code: &str) -> Option<ShortLink> {
        let links = self.links.lock().unwrap_or_else(|e| e.into_inner());
        links.get(short_code).cloned()
    }

    pub fn all_analytics(&self) -> Vec<ShortLink> {
        let links = self.links.lock().unwrap_or_else(|e| e.into_inner());
        links.values().cloned().collect()
    }
}
