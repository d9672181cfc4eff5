use reqwest::Client;
use serde_json::{Value, json};

use crate::models::market::{HistoricalBar, InsiderTrade, Mover, NewsArticle, Quote};

use super::provider::{ProviderError, int, num, text};
use super::sentiment;

const BASE_V3: &str = "https://financialmodelingprep.com/api/v3";
const BASE_STABLE: &str = "https://financialmodelingprep.com/stable";

/// Financial Modeling Prep. First in the chain for most equity
/// categories.
#[derive(Clone)]
pub struct FmpClient {
    http: Client,
    api_key: String,
}

impl FmpClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
        }
    }

    fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, ProviderError> {
        let res = self
            .http
            .get(url)
            .query(query)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(ProviderError::Status {
                provider: "fmp",
                status: res.status().as_u16(),
            });
        }

        Ok(res.json::<Value>().await?)
    }

    pub async fn quote(&self, symbol: &str) -> Result<Option<Quote>, ProviderError> {
        if !self.has_key() {
            return Err(ProviderError::Unconfigured);
        }

        let url = format!("{BASE_V3}/quote/{symbol}");
        let data = self.get_json(&url, &[]).await?;

        let Some(raw) = data.as_array().and_then(|a| a.first()) else {
            return Ok(None);
        };

        Ok(Some(map_quote(raw, symbol)))
    }

    /// Batch quote, used for the index board. One request, many symbols.
    pub async fn batch_quotes(&self, symbols: &str) -> Result<Option<Vec<Quote>>, ProviderError> {
        if !self.has_key() {
            return Err(ProviderError::Unconfigured);
        }

        let url = format!("{BASE_V3}/quote/{symbols}");
        let data = self.get_json(&url, &[]).await?;

        let Some(items) = data.as_array().filter(|a| !a.is_empty()) else {
            return Ok(None);
        };

        let quotes = items
            .iter()
            .map(|raw| {
                let sym = text(&raw["symbol"]).unwrap_or_default();
                map_quote(raw, &sym)
            })
            .collect();

        Ok(Some(quotes))
    }

    /// Full daily history, normalized to oldest-first. The caller trims
    /// to the requested window.
    pub async fn historical(
        &self,
        symbol: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Option<Vec<HistoricalBar>>, ProviderError> {
        if !self.has_key() {
            return Err(ProviderError::Unconfigured);
        }

        let mut query: Vec<(&str, &str)> = vec![];
        if let Some(from) = from {
            query.push(("from", from));
        }
        if let Some(to) = to {
            query.push(("to", to));
        }

        let url = format!("{BASE_V3}/historical-price-full/{symbol}");
        let data = self.get_json(&url, &query).await?;

        let Some(days) = data["historical"].as_array().filter(|a| !a.is_empty()) else {
            return Ok(None);
        };

        // FMP serves newest-first.
        let bars = days
            .iter()
            .rev()
            .map(|day| {
                let date = text(&day["date"]).unwrap_or_default();
                HistoricalBar {
                    time: date.clone(),
                    date,
                    open: num(&day["open"]),
                    high: num(&day["high"]),
                    low: num(&day["low"]),
                    close: num(&day["close"]),
                    volume: int(&day["volume"]),
                }
            })
            .collect();

        Ok(Some(bars))
    }

    pub async fn insider_trades(
        &self,
        symbol: &str,
        limit: i64,
    ) -> Result<Option<Vec<InsiderTrade>>, ProviderError> {
        if !self.has_key() {
            return Err(ProviderError::Unconfigured);
        }

        let limit = limit.to_string();
        let url = format!("{BASE_STABLE}/insider-trading/search");
        let data = self
            .get_json(&url, &[("symbol", symbol), ("limit", limit.as_str())])
            .await?;

        let Some(items) = data.as_array().filter(|a| !a.is_empty()) else {
            return Ok(None);
        };

        let trades = items
            .iter()
            .map(|t| {
                let shares = int(&t["securitiesTransacted"]).unwrap_or(0);
                let price = num(&t["price"]).unwrap_or(0.0);
                InsiderTrade {
                    symbol: text(&t["symbol"]).unwrap_or_else(|| symbol.to_string()),
                    company_name: text(&t["companyName"]).unwrap_or_else(|| symbol.to_string()),
                    filing_date: text(&t["filingDate"]).unwrap_or_default(),
                    transaction_date: text(&t["transactionDate"]).unwrap_or_default(),
                    insider: text(&t["reportingName"]).unwrap_or_default(),
                    title: text(&t["typeOfOwner"]).unwrap_or_else(|| "Insider".to_string()),
                    transaction_type: text(&t["transactionType"]).unwrap_or_default(),
                    shares,
                    price_per_share: price,
                    total_value: shares as f64 * price,
                    shares_owned: int(&t["securitiesOwned"]).unwrap_or(0),
                    link: text(&t["link"]).unwrap_or_default(),
                }
            })
            .collect();

        Ok(Some(trades))
    }

    pub async fn stock_news(
        &self,
        symbols: &[String],
    ) -> Result<Option<Vec<NewsArticle>>, ProviderError> {
        if !self.has_key() {
            return Err(ProviderError::Unconfigured);
        }

        let mut articles: Vec<NewsArticle> = vec![];

        for symbol in symbols.iter().take(5) {
            let url = format!("{BASE_STABLE}/news/stock");
            let data = match self
                .get_json(&url, &[("symbols", symbol.as_str()), ("limit", "5")])
                .await
            {
                Ok(data) => data,
                Err(err) => {
                    tracing::warn!(symbol, error = %err, "fmp news request failed");
                    continue;
                }
            };

            let Some(items) = data.as_array() else { continue };

            for item in items {
                let title = text(&item["title"]).unwrap_or_else(|| "No title".to_string());
                let body = text(&item["text"]).unwrap_or_default();
                let published = text(&item["publishedDate"]).unwrap_or_default();

                articles.push(NewsArticle {
                    id: format!("{symbol}-{published}"),
                    symbol: symbol.clone(),
                    sentiment: sentiment::classify(&title, &body).to_string(),
                    summary: truncate(&body, 200),
                    title,
                    source: text(&item["site"]).unwrap_or_else(|| "FMP".to_string()),
                    timestamp: published,
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

    pub async fn sector_performance(&self) -> Result<Option<Vec<Value>>, ProviderError> {
        if !self.has_key() {
            return Err(ProviderError::Unconfigured);
        }

        let url = format!("{BASE_V3}/sector-performance");
        let data = self.get_json(&url, &[]).await?;

        let Some(items) = data.as_array().filter(|a| !a.is_empty()) else {
            return Ok(None);
        };

        let sectors = items
            .iter()
            .map(|s| {
                json!({
                    "sector": s["sector"],
                    "changesPercentage": s["changesPercentage"],
                })
            })
            .collect();

        Ok(Some(sectors))
    }

    pub async fn movers(&self, kind: &str) -> Result<Option<Vec<Mover>>, ProviderError> {
        if !self.has_key() {
            return Err(ProviderError::Unconfigured);
        }

        let endpoint = match kind {
            "losers" => "biggest-losers",
            "active" => "most-actives",
            _ => "biggest-gainers",
        };

        let url = format!("{BASE_STABLE}/{endpoint}");
        let data = self.get_json(&url, &[]).await?;

        let Some(items) = data.as_array().filter(|a| !a.is_empty()) else {
            return Ok(None);
        };

        let movers = items
            .iter()
            .map(|s| Mover {
                symbol: text(&s["symbol"]).unwrap_or_default(),
                name: text(&s["name"])
                    .or_else(|| text(&s["companyName"]))
                    .or_else(|| text(&s["symbol"]))
                    .unwrap_or_default(),
                price: num(&s["price"]).unwrap_or(0.0),
                change: num(&s["change"]).unwrap_or(0.0),
                change_percent: num(&s["changesPercentage"]).unwrap_or(0.0),
                volume: int(&s["volume"]).unwrap_or(0),
                market_cap: int(&s["marketCap"]),
            })
            .collect();

        Ok(Some(movers))
    }
}

fn map_quote(raw: &Value, fallback_symbol: &str) -> Quote {
    Quote {
        symbol: text(&raw["symbol"]).unwrap_or_else(|| fallback_symbol.to_uppercase()),
        name: text(&raw["name"]),
        price: num(&raw["price"]),
        last_price: num(&raw["price"]),
        change: num(&raw["change"]),
        changes_percentage: num(&raw["changesPercentage"]),
        day_low: num(&raw["dayLow"]),
        day_high: num(&raw["dayHigh"]),
        year_high: num(&raw["yearHigh"]),
        year_low: num(&raw["yearLow"]),
        market_cap: num(&raw["marketCap"]),
        price_avg50: num(&raw["priceAvg50"]),
        price_avg200: num(&raw["priceAvg200"]),
        volume: num(&raw["volume"]),
        avg_volume: num(&raw["avgVolume"]),
        open: num(&raw["open"]),
        previous_close: num(&raw["previousClose"]),
        eps: num(&raw["eps"]),
        pe: num(&raw["pe"]),
        earnings_announcement: text(&raw["earningsAnnouncement"]),
        shares_outstanding: num(&raw["sharesOutstanding"]),
        timestamp: int(&raw["timestamp"]),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.is_empty() {
        return "No description available".to_string();
    }
    s.chars().take(max).collect()
}
