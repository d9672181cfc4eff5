use reqwest::Client;
use serde_json::{Value, json};

use crate::models::market::{Dividend, HistoricalBar, NewsArticle, Quote, SearchItem};

use super::provider::{ProviderError, int, num, text};
use super::sentiment;

const BASE: &str = "https://www.alphavantage.co/query";

/// Alpha Vantage. Everything is string-typed on the wire and envelope
/// keys carry numbered prefixes ("05. price"); normalization happens
/// here so nothing downstream sees that.
#[derive(Clone)]
pub struct AlphaVantageClient {
    http: Client,
    api_key: String,
}

impl AlphaVantageClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
        }
    }

    fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn get_json(&self, query: &[(&str, &str)]) -> Result<Value, ProviderError> {
        let res = self
            .http
            .get(BASE)
            .query(query)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(ProviderError::Status {
                provider: "alpha_vantage",
                status: res.status().as_u16(),
            });
        }

        Ok(res.json::<Value>().await?)
    }

    pub async fn global_quote(&self, symbol: &str) -> Result<Option<Quote>, ProviderError> {
        if !self.has_key() {
            return Err(ProviderError::Unconfigured);
        }

        let data = self
            .get_json(&[("function", "GLOBAL_QUOTE"), ("symbol", symbol)])
            .await?;

        // Unknown symbols come back as an empty object under the same key.
        let Some(q) = data["Global Quote"].as_object().filter(|o| !o.is_empty()) else {
            return Ok(None);
        };
        let q = Value::Object(q.clone());

        Ok(Some(Quote {
            symbol: text(&q["01. symbol"]).unwrap_or_else(|| symbol.to_uppercase()),
            price: num(&q["05. price"]),
            last_price: num(&q["05. price"]),
            change: num(&q["09. change"]),
            changes_percentage: num(&q["10. change percent"]),
            open: num(&q["02. open"]),
            day_high: num(&q["03. high"]),
            day_low: num(&q["04. low"]),
            volume: num(&q["06. volume"]),
            previous_close: num(&q["08. previous close"]),
            ..Quote::default()
        }))
    }

    /// Full daily history, normalized to oldest-first.
    pub async fn daily_series(&self, symbol: &str) -> Result<Option<Vec<HistoricalBar>>, ProviderError> {
        if !self.has_key() {
            return Err(ProviderError::Unconfigured);
        }

        let data = self
            .get_json(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("outputsize", "full"),
            ])
            .await?;

        let Some(series) = data["Time Series (Daily)"].as_object() else {
            return Ok(None);
        };
        if series.is_empty() {
            return Ok(None);
        }

        let mut bars: Vec<HistoricalBar> = series
            .iter()
            .map(|(date, values)| HistoricalBar {
                date: date.clone(),
                time: date.clone(),
                open: num(&values["1. open"]),
                high: num(&values["2. high"]),
                low: num(&values["3. low"]),
                close: num(&values["4. close"]),
                volume: int(&values["5. volume"]),
            })
            .collect();

        bars.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(Some(bars))
    }

    pub async fn digital_currency_daily(
        &self,
        symbol: &str,
        market: &str,
    ) -> Result<Option<Value>, ProviderError> {
        if !self.has_key() {
            return Err(ProviderError::Unconfigured);
        }

        let data = self
            .get_json(&[
                ("function", "DIGITAL_CURRENCY_DAILY"),
                ("symbol", symbol),
                ("market", market),
            ])
            .await?;

        let meta = &data["Meta Data"];
        let Some(series) = data["Time Series (Digital Currency Daily)"].as_object() else {
            return Ok(None);
        };
        if meta.is_null() || series.is_empty() {
            return Ok(None);
        }

        let open_key = format!("1a. open ({market})");
        let high_key = format!("2a. high ({market})");
        let low_key = format!("3a. low ({market})");
        let close_key = format!("4a. close ({market})");

        let day = |date: &str, values: &Value| {
            json!({
                "date": date,
                "open": num(&values[&open_key]),
                "high": num(&values[&high_key]),
                "low": num(&values[&low_key]),
                "close": num(&values[&close_key]),
                "volume": num(&values["5. volume"]),
            })
        };

        // Map iteration is date-ascending; the latest entry is last.
        let Some((latest_date, latest)) = series.iter().next_back() else {
            return Ok(None);
        };

        let mut current = day(latest_date, latest);
        current["marketCap"] = json!(num(&latest["6. market cap (USD)"]));

        let history: Vec<Value> = series
            .iter()
            .rev()
            .take(30)
            .map(|(date, values)| day(date, values))
            .collect();

        Ok(Some(json!({
            "symbol": symbol,
            "market": market,
            "metaData": meta,
            "current": current,
            "history": history,
        })))
    }

    pub async fn dividends(&self, symbol: &str) -> Result<Option<Vec<Dividend>>, ProviderError> {
        if !self.has_key() {
            return Err(ProviderError::Unconfigured);
        }

        let data = self
            .get_json(&[("function", "DIVIDENDS"), ("symbol", symbol)])
            .await?;

        // The envelope key being present counts as usable, even when the
        // list is empty; a no-dividend stock is an answer, not a miss.
        let Some(items) = data["data"].as_array() else {
            return Ok(None);
        };

        let dividends = items
            .iter()
            .map(|div| {
                let amount = num(&div["amount"]);
                Dividend {
                    ex_date: text(&div["ex_dividend_date"]).unwrap_or_default(),
                    payment_date: text(&div["payment_date"]).unwrap_or_default(),
                    record_date: text(&div["record_date"]).unwrap_or_default(),
                    declaration_date: text(&div["declaration_date"]).unwrap_or_default(),
                    amount,
                    adjusted_amount: num(&div["adjusted_amount"]).or(amount),
                }
            })
            .collect();

        Ok(Some(dividends))
    }

    pub async fn news_sentiment(
        &self,
        symbols: &[String],
    ) -> Result<Option<Vec<NewsArticle>>, ProviderError> {
        if !self.has_key() {
            return Err(ProviderError::Unconfigured);
        }

        let mut articles: Vec<NewsArticle> = vec![];

        for symbol in symbols.iter().take(3) {
            let data = match self
                .get_json(&[
                    ("function", "NEWS_SENTIMENT"),
                    ("tickers", symbol.as_str()),
                    ("limit", "5"),
                ])
                .await
            {
                Ok(data) => data,
                Err(err) => {
                    tracing::warn!(symbol, error = %err, "alpha vantage news request failed");
                    continue;
                }
            };

            let Some(feed) = data["feed"].as_array() else { continue };

            for item in feed {
                let published = text(&item["time_published"]).unwrap_or_default();
                let score = num(&item["overall_sentiment_score"]).unwrap_or(0.0);
                let summary = text(&item["summary"]).unwrap_or_default();

                let author = item["authors"].as_array().map(|authors| {
                    authors
                        .iter()
                        .filter_map(|a| a.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                });

                articles.push(NewsArticle {
                    id: format!("{symbol}-{published}"),
                    symbol: symbol.clone(),
                    title: text(&item["title"]).unwrap_or_else(|| "No title".to_string()),
                    summary: if summary.is_empty() {
                        "No description available".to_string()
                    } else {
                        summary.chars().take(200).collect()
                    },
                    sentiment: sentiment::from_score(score).to_string(),
                    source: text(&item["source"]).unwrap_or_else(|| "Alpha Vantage".to_string()),
                    timestamp: published,
                    url: text(&item["url"]).unwrap_or_default(),
                    image_url: text(&item["banner_image"]),
                    author,
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

    pub async fn symbol_search(&self, query: &str) -> Result<Option<Vec<SearchItem>>, ProviderError> {
        if !self.has_key() {
            return Err(ProviderError::Unconfigured);
        }

        let data = self
            .get_json(&[("function", "SYMBOL_SEARCH"), ("keywords", query)])
            .await?;

        let Some(matches) = data["bestMatches"].as_array().filter(|a| !a.is_empty()) else {
            return Ok(None);
        };

        let results = matches
            .iter()
            .take(10)
            .map(|m| SearchItem {
                symbol: text(&m["1. symbol"]).unwrap_or_default(),
                name: text(&m["2. name"]).unwrap_or_default(),
            })
            .collect();

        Ok(Some(results))
    }
}
