use serde_json::{Value, json};

use crate::AppState;
use crate::models::market::{Dividend, HistoricalBar, InsiderTrade, Mover, NewsArticle, Quote, SearchItem};

use super::provider::{self, Attempt};
use super::mock_data;

/// Bar-count window per chart timeframe. Intraday frames get a few days
/// of dailies; the chart client resamples.
pub fn days_for_timeframe(timeframe: &str) -> usize {
    match timeframe {
        "1m" | "5m" | "15m" | "1h" | "4h" => 5,
        "1D" => 90,
        "1W" => 365,
        "1M" => 365 * 3,
        _ => 365,
    }
}

pub async fn quote(state: &AppState, symbol: &str) -> Quote {
    let attempts: Vec<(&'static str, Attempt<'_, Quote>)> = vec![
        ("fmp", Box::pin(state.fmp.quote(symbol))),
        ("alpha_vantage", Box::pin(state.alpha_vantage.global_quote(symbol))),
    ];

    provider::first_success("quote", attempts)
        .await
        .unwrap_or_else(|| mock_data::quote(symbol))
}

pub async fn historical(
    state: &AppState,
    symbol: &str,
    timeframe: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> Vec<HistoricalBar> {
    let days = days_for_timeframe(timeframe);

    let attempts: Vec<(&'static str, Attempt<'_, Vec<HistoricalBar>>)> = vec![
        ("fmp", Box::pin(state.fmp.historical(symbol, from, to))),
        ("alpha_vantage", Box::pin(state.alpha_vantage.daily_series(symbol))),
    ];

    match provider::first_success("historical-price", attempts).await {
        Some(mut bars) => {
            // Adapters hand back the full oldest-first series; keep the
            // most recent window.
            if bars.len() > days {
                bars.drain(..bars.len() - days);
            }
            bars
        }
        None => mock_data::historical(days),
    }
}

pub async fn crypto(state: &AppState, symbol: &str, market: &str) -> Value {
    let attempts: Vec<(&'static str, Attempt<'_, Value>)> = vec![(
        "alpha_vantage",
        Box::pin(state.alpha_vantage.digital_currency_daily(symbol, market)),
    )];

    provider::first_success("crypto", attempts)
        .await
        .unwrap_or_else(|| mock_data::crypto(symbol))
}

pub async fn dividends(state: &AppState, symbol: &str) -> Vec<Dividend> {
    let attempts: Vec<(&'static str, Attempt<'_, Vec<Dividend>>)> =
        vec![("alpha_vantage", Box::pin(state.alpha_vantage.dividends(symbol)))];

    provider::first_success("dividends", attempts)
        .await
        .unwrap_or_else(mock_data::dividends)
}

/// Insider trades have no mock table; an empty list is the fallback.
pub async fn insider_trades(state: &AppState, symbol: &str, limit: i64) -> Vec<InsiderTrade> {
    let attempts: Vec<(&'static str, Attempt<'_, Vec<InsiderTrade>>)> = vec![
        ("fmp", Box::pin(state.fmp.insider_trades(symbol, limit))),
        ("finnhub", Box::pin(state.finnhub.insider_transactions(symbol))),
    ];

    provider::first_success("insider-trading", attempts)
        .await
        .unwrap_or_default()
}

pub async fn news(state: &AppState, symbols: &[String]) -> Vec<NewsArticle> {
    let attempts: Vec<(&'static str, Attempt<'_, Vec<NewsArticle>>)> = vec![
        ("fmp", Box::pin(state.fmp.stock_news(symbols))),
        ("alpha_vantage", Box::pin(state.alpha_vantage.news_sentiment(symbols))),
        ("finnhub", Box::pin(state.finnhub.company_news(symbols))),
    ];

    provider::first_success("news", attempts)
        .await
        .unwrap_or_default()
}

pub async fn market_indices(state: &AppState) -> Vec<Quote> {
    // S&P 500, Dow Jones, NASDAQ, Russell 2000
    let symbols = "^GSPC,^DJI,^IXIC,^RUT";

    let attempts: Vec<(&'static str, Attempt<'_, Vec<Quote>>)> =
        vec![("fmp", Box::pin(state.fmp.batch_quotes(symbols)))];

    provider::first_success("market-indices", attempts)
        .await
        .unwrap_or_else(mock_data::market_indices)
}

pub async fn sector_performance(state: &AppState) -> Vec<Value> {
    let attempts: Vec<(&'static str, Attempt<'_, Vec<Value>>)> =
        vec![("fmp", Box::pin(state.fmp.sector_performance()))];

    provider::first_success("sector-performance", attempts)
        .await
        .unwrap_or_else(mock_data::sectors)
}

pub async fn movers(state: &AppState, kind: &str) -> Vec<Mover> {
    let attempts: Vec<(&'static str, Attempt<'_, Vec<Mover>>)> =
        vec![("fmp", Box::pin(state.fmp.movers(kind)))];

    provider::first_success("movers", attempts)
        .await
        .unwrap_or_else(mock_data::movers)
}

pub async fn search(state: &AppState, query: &str) -> Vec<SearchItem> {
    let attempts: Vec<(&'static str, Attempt<'_, Vec<SearchItem>>)> = vec![
        ("alpha_vantage", Box::pin(state.alpha_vantage.symbol_search(query))),
        ("finnhub", Box::pin(state.finnhub.search(query))),
    ];

    provider::first_success("search", attempts)
        .await
        .unwrap_or_else(|| {
            let q = query.to_lowercase();
            mock_data::stocks()
                .into_iter()
                .filter(|s| {
                    s.symbol.to_lowercase().contains(&q) || s.name.to_lowercase().contains(&q)
                })
                .take(10)
                .collect()
        })
}

/// Everything the dashboard landing page needs, fetched together. The
/// categories are independent, so they run concurrently and each falls
/// back on its own.
pub async fn market_overview(state: &AppState) -> Value {
    let (indices, sectors, movers) = tokio::join!(
        market_indices(state),
        sector_performance(state),
        movers(state, "gainers"),
    );

    json!({
        "indices": indices,
        "sectors": sectors,
        "movers": movers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeframe_windows_match_chart_expectations() {
        assert_eq!(days_for_timeframe("1m"), 5);
        assert_eq!(days_for_timeframe("4h"), 5);
        assert_eq!(days_for_timeframe("1D"), 90);
        assert_eq!(days_for_timeframe("1W"), 365);
        assert_eq!(days_for_timeframe("1M"), 1095);
        assert_eq!(days_for_timeframe("1Y"), 365);
        assert_eq!(days_for_timeframe("anything"), 365);
    }
}
