use chrono::{Duration, Utc};
use reqwest::Client;
use serde_json::Value;

use crate::models::market::{InsiderTrade, NewsArticle, SearchItem};

use super::provider::{ProviderError, int, num, text};
use super::sentiment;

const BASE: &str = "https://finnhub.io/api/v1";

/// Finnhub. Last in the chain everywhere it appears.
#[derive(Clone)]
pub struct FinnhubClient {
    http: Client,
    api_key: String,
}

impl FinnhubClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
        }
    }

    fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ProviderError> {
        let res = self
            .http
            .get(format!("{BASE}{path}"))
            .query(query)
            .query(&[("token", self.api_key.as_str())])
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(ProviderError::Status {
                provider: "finnhub",
                status: res.status().as_u16(),
            });
        }

        Ok(res.json::<Value>().await?)
    }

    pub async fn search(&self, q: &str) -> Result<Option<Vec<SearchItem>>, ProviderError> {
        if !self.has_key() {
            return Err(ProviderError::Unconfigured);
        }

        let data = self.get_json("/search", &[("q", q)]).await?;

        let Some(items) = data["result"].as_array().filter(|a| !a.is_empty()) else {
            return Ok(None);
        };

        let results: Vec<SearchItem> = items
            .iter()
            .filter_map(|item| {
                let symbol = text(&item["symbol"])?;
                if symbol.trim().is_empty() {
                    return None;
                }
                Some(SearchItem {
                    name: text(&item["description"]).unwrap_or_else(|| symbol.clone()),
                    symbol,
                })
            })
            .take(10)
            .collect();

        if results.is_empty() {
            return Ok(None);
        }
        Ok(Some(results))
    }

    /// Insider transactions over the trailing 90 days.
    pub async fn insider_transactions(
        &self,
        symbol: &str,
    ) -> Result<Option<Vec<InsiderTrade>>, ProviderError> {
        if !self.has_key() {
            return Err(ProviderError::Unconfigured);
        }

        let to = Utc::now().date_naive();
        let from = to - Duration::days(90);
        let to = to.format("%Y-%m-%d").to_string();
        let from = from.format("%Y-%m-%d").to_string();

        let data = self
            .get_json(
                "/stock/insider-transactions",
                &[("symbol", symbol), ("from", from.as_str()), ("to", to.as_str())],
            )
            .await?;

        let Some(items) = data["data"].as_array().filter(|a| !a.is_empty()) else {
            return Ok(None);
        };

        let trades = items
            .iter()
            .map(|t| {
                let shares = int(&t["share"]).unwrap_or(0);
                let price = num(&t["transactionPrice"]).unwrap_or(0.0);
                let transaction_date = text(&t["transactionDate"]).unwrap_or_default();
                InsiderTrade {
                    symbol: text(&t["symbol"]).unwrap_or_else(|| symbol.to_string()),
                    company_name: text(&t["name"]).unwrap_or_else(|| symbol.to_string()),
                    filing_date: text(&t["filingDate"]).unwrap_or_else(|| transaction_date.clone()),
                    transaction_date,
                    insider: text(&t["name"]).unwrap_or_default(),
                    title: "Insider".to_string(),
                    transaction_type: text(&t["transactionCode"])
                        .unwrap_or_else(|| "N/A".to_string()),
                    shares,
                    price_per_share: price,
                    total_value: shares as f64 * price,
                    shares_owned: int(&t["shareHoldAfterTransaction"]).unwrap_or(0),
                    link: String::new(),
                }
            })
            .collect();

        Ok(Some(trades))
    }

    /// Company news over the trailing week, five articles per symbol.
    pub async fn company_news(
        &self,
        symbols: &[String],
    ) -> Result<Option<Vec<NewsArticle>>, ProviderError> {
        if !self.has_key() {
            return Err(ProviderError::Unconfigured);
        }

        let to = Utc::now().date_naive();
        let from = (to - Duration::days(7)).format("%Y-%m-%d").to_string();
        let to = to.format("%Y-%m-%d").to_string();

        let mut articles: Vec<NewsArticle> = vec![];

        for symbol in symbols.iter().take(5) {
            let data = match self
                .get_json(
                    "/company-news",
                    &[
                        ("symbol", symbol.as_str()),
                        ("from", from.as_str()),
                        ("to", to.as_str()),
                    ],
                )
                .await
            {
                Ok(data) => data,
                Err(err) => {
                    tracing::warn!(symbol, error = %err, "finnhub news request failed");
                    continue;
                }
            };

            let Some(items) = data.as_array() else { continue };

            for item in items.iter().take(5) {
                let title = text(&item["headline"]).unwrap_or_else(|| "No title".to_string());
                let summary = text(&item["summary"]).unwrap_or_default();
                let unix = int(&item["datetime"]).unwrap_or(0);
                let timestamp = chrono::DateTime::from_timestamp(unix, 0)
                    .map(|dt| dt.to_rfc3339())
                    .unwrap_or_default();

                articles.push(NewsArticle {
                    id: format!("{symbol}-{unix}"),
                    symbol: symbol.clone(),
                    sentiment: sentiment::classify(&title, &summary).to_string(),
                    summary: if summary.is_empty() {
                        "No description available".to_string()
                    } else {
                        summary.chars().take(200).collect()
                    },
                    title,
                    source: text(&item["source"]).unwrap_or_else(|| "Finnhub".to_string()),
                    timestamp,
                    url: text(&item["url"]).unwrap_or_default(),
                    image_url: text(&item["image"]),
                    author: None,
                });
            }
        }

        if articles.is_empty() {
            return Ok(None);
        }

        articles.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        articles.truncate(20);
        Ok(Some(articles))
    }
}
