use serde::{Deserialize, Serialize};

/// Normalized quote, the superset of what any configured provider can
/// fill in. Fields a provider does not carry serialize as null; numeric
/// fields that arrive as unparsable strings also end up null.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,

    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub last_price: Option<f64>,
    #[serde(default)]
    pub change: Option<f64>,
    #[serde(default)]
    pub changes_percentage: Option<f64>,
    #[serde(default)]
    pub day_low: Option<f64>,
    #[serde(default)]
    pub day_high: Option<f64>,
    #[serde(default)]
    pub year_high: Option<f64>,
    #[serde(default)]
    pub year_low: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub price_avg50: Option<f64>,
    #[serde(default)]
    pub price_avg200: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub avg_volume: Option<f64>,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub previous_close: Option<f64>,
    #[serde(default)]
    pub eps: Option<f64>,
    #[serde(default)]
    pub pe: Option<f64>,
    #[serde(default)]
    pub earnings_announcement: Option<String>,
    #[serde(default)]
    pub shares_outstanding: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// Daily bar. Sequences are oldest-first once normalized; `time`
/// mirrors `date` because the chart consumer reads both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalBar {
    pub date: String,
    pub time: String,

    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub close: Option<f64>,
    #[serde(default)]
    pub volume: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dividend {
    pub ex_date: String,
    pub payment_date: String,
    pub record_date: String,
    pub declaration_date: String,

    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub adjusted_amount: Option<f64>,
}

/// Numeric fields default to 0 when the filing omits or garbles them;
/// this category never serves nulls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsiderTrade {
    pub symbol: String,
    pub company_name: String,
    pub filing_date: String,
    pub transaction_date: String,
    pub insider: String,
    pub title: String,
    pub transaction_type: String,
    pub shares: i64,
    pub price_per_share: f64,
    pub total_value: f64,
    pub shares_owned: i64,
    pub link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: String,
    pub symbol: String,
    pub title: String,
    pub summary: String,
    pub sentiment: String,
    pub source: String,
    pub timestamp: String,
    pub url: String,

    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mover {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchItem {
    pub symbol: String,
    pub name: String,
}
