//! Static fallback datasets served when no live provider answers.
//!
//! Failure is invisible to the caller by design: every read route has a
//! mock of the right shape, so exhausting the provider chain still
//! produces a 200.

use chrono::{Duration, Utc};
use rand::Rng;
use serde_json::{Value, json};

use crate::models::market::{Dividend, HistoricalBar, Mover, Quote, SearchItem};

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn crypto(symbol: &str) -> Value {
    match symbol {
        "BTCUSD" => json!({ "symbol": "BTCUSD", "price": 43250.50, "change": "+2.5%", "volume": "25.5B" }),
        "ETHUSD" => json!({ "symbol": "ETHUSD", "price": 2345.80, "change": "+1.8%", "volume": "12.3B" }),
        "BNBUSD" => json!({ "symbol": "BNBUSD", "price": 315.45, "change": "-0.5%", "volume": "1.2B" }),
        other => json!({ "symbol": other }),
    }
}

/// Plausible random quote around a random base price.
pub fn quote(symbol: &str) -> Quote {
    let mut rng = rand::thread_rng();

    let base_price: f64 = 100.0 + rng.gen_range(0.0..400.0);
    let change: f64 = rng.gen_range(-5.0..5.0);
    let changes_percentage = (change / base_price) * 100.0;

    let next_earnings = (Utc::now() + Duration::days(30))
        .format("%Y-%m-%d")
        .to_string();

    Quote {
        symbol: symbol.to_uppercase(),
        name: Some(format!("{symbol} Company")),
        price: Some(round2(base_price)),
        last_price: Some(round2(base_price)),
        change: Some(round2(change)),
        changes_percentage: Some(round2(changes_percentage)),
        day_low: Some(round2(base_price - rng.gen_range(0.0..5.0))),
        day_high: Some(round2(base_price + rng.gen_range(0.0..5.0))),
        year_high: Some(round2(base_price * 1.3)),
        year_low: Some(round2(base_price * 0.7)),
        market_cap: Some((base_price * 1_000_000_000.0).floor()),
        price_avg50: Some(round2(base_price * 0.98)),
        price_avg200: Some(round2(base_price * 0.95)),
        volume: Some((1_000_000.0 + rng.gen_range(0.0f64..10_000_000.0)).floor()),
        avg_volume: Some((1_500_000.0 + rng.gen_range(0.0f64..8_000_000.0)).floor()),
        open: Some(round2(base_price - change)),
        previous_close: Some(round2(base_price - change)),
        eps: Some(round2(rng.gen_range(0.0..10.0))),
        pe: Some(round2(15.0 + rng.gen_range(0.0..20.0))),
        earnings_announcement: Some(next_earnings),
        shares_outstanding: Some((base_price * 10_000_000.0).floor()),
        timestamp: Some(Utc::now().timestamp_millis()),
    }
}

/// Random walk with a slight upward trend, oldest-first.
pub fn historical(days: usize) -> Vec<HistoricalBar> {
    let mut rng = rand::thread_rng();

    let base_price: f64 = 500.0 + rng.gen_range(0.0..500.0);
    let now = Utc::now().date_naive();
    let mut bars = Vec::with_capacity(days + 1);

    for i in (0..=days).rev() {
        let date = (now - Duration::days(i as i64)).format("%Y-%m-%d").to_string();

        let trend = (days - i) as f64 / days.max(1) as f64;
        let variance: f64 = rng.gen_range(-7.5..7.5);
        let price_base = base_price * (1.0 + trend * 0.2);
        let open = price_base + variance;
        let close = open + rng.gen_range(-4.0..4.0);
        let high = open.max(close) + rng.gen_range(0.0..4.0);
        let low = open.min(close) - rng.gen_range(0.0..4.0);
        let volume = 500_000 + rng.gen_range(0..3_000_000);

        bars.push(HistoricalBar {
            time: date.clone(),
            date,
            open: Some(round2(open)),
            high: Some(round2(high)),
            low: Some(round2(low)),
            close: Some(round2(close)),
            volume: Some(volume),
        });
    }

    bars
}

/// One year of quarterly AAPL-style payouts, served for any symbol.
pub fn dividends() -> Vec<Dividend> {
    let rows = [
        ("2024-11-08", "2024-11-14", "2024-11-11", "2024-10-31"),
        ("2024-08-09", "2024-08-15", "2024-08-12", "2024-08-01"),
        ("2024-05-10", "2024-05-16", "2024-05-13", "2024-05-02"),
        ("2024-02-09", "2024-02-15", "2024-02-12", "2024-02-01"),
    ];

    rows.iter()
        .map(|(ex, pay, rec, dec)| Dividend {
            ex_date: ex.to_string(),
            payment_date: pay.to_string(),
            record_date: rec.to_string(),
            declaration_date: dec.to_string(),
            amount: Some(0.24),
            adjusted_amount: Some(0.24),
        })
        .collect()
}

pub fn market_indices() -> Vec<Quote> {
    let rows: [(&str, &str, f64, f64, f64, f64, f64, f64, f64, f64, f64, f64, f64); 4] = [
        ("^NSEI", "NIFTY 50", 25884.80, -0.29, -74.70, 25750.25, 25920.15, 26277.35, 21281.45, 25456.78, 24123.90, 324567890.0, 350000000.0),
        ("^BSESN", "SENSEX", 84587.01, -0.37, -313.73, 84250.30, 84720.50, 85978.25, 70001.55, 83892.45, 79678.23, 287654321.0, 300000000.0),
        ("^NSEBANK", "NIFTY Bank", 54213.45, -0.52, -283.25, 53980.20, 54350.80, 55487.90, 45123.65, 53789.12, 51234.78, 123456789.0, 150000000.0),
        ("^CNXIT", "NIFTY IT", 43567.25, 0.85, 367.45, 43125.60, 43620.90, 44892.30, 32456.70, 42889.55, 40567.85, 98765432.0, 100000000.0),
    ];

    rows.iter()
        .map(
            |&(symbol, name, price, pct, change, day_low, day_high, year_high, year_low, avg50, avg200, volume, avg_volume)| Quote {
                symbol: symbol.to_string(),
                name: Some(name.to_string()),
                price: Some(price),
                last_price: Some(price),
                changes_percentage: Some(pct),
                change: Some(change),
                day_low: Some(day_low),
                day_high: Some(day_high),
                year_high: Some(year_high),
                year_low: Some(year_low),
                price_avg50: Some(avg50),
                price_avg200: Some(avg200),
                volume: Some(volume),
                avg_volume: Some(avg_volume),
                ..Quote::default()
            },
        )
        .collect()
}

pub fn sectors() -> Vec<Value> {
    [
        ("Technology", "2.45%"),
        ("Healthcare", "1.32%"),
        ("Financial Services", "0.87%"),
        ("Consumer Cyclical", "1.65%"),
        ("Industrials", "0.54%"),
        ("Energy", "-0.23%"),
        ("Utilities", "0.12%"),
        ("Real Estate", "-0.45%"),
        ("Basic Materials", "0.76%"),
        ("Consumer Defensive", "0.34%"),
        ("Communication Services", "1.89%"),
    ]
    .iter()
    .map(|(name, performance)| json!({ "name": name, "performance": performance }))
    .collect()
}

pub fn movers() -> Vec<Mover> {
    let rows: [(&str, &str, f64, f64, f64, i64); 5] = [
        ("INFY", "Infosys Limited", 1895.50, 87.25, 4.83, 12345678),
        ("TCS", "Tata Consultancy Services Limited", 4125.30, 172.80, 4.37, 8901234),
        ("RELIANCE", "Reliance Industries Limited", 2847.65, 115.35, 4.22, 23456789),
        ("HDFCBANK", "HDFC Bank Limited", 1678.90, -62.45, -3.59, 15678901),
        ("ICICIBANK", "ICICI Bank Limited", 1245.20, -45.30, -3.51, 9876543),
    ];

    rows.iter()
        .map(|&(symbol, name, price, change, pct, volume)| Mover {
            symbol: symbol.to_string(),
            name: name.to_string(),
            price,
            change,
            change_percent: pct,
            volume,
            market_cap: None,
        })
        .collect()
}

pub fn stocks() -> Vec<SearchItem> {
    [
        ("RELIANCE.NS", "Reliance Industries"),
        ("TCS.NS", "Tata Consultancy Services"),
        ("HDFCBANK.NS", "HDFC Bank"),
        ("INFY", "Infosys"),
        ("ICICIBANK.NS", "ICICI Bank"),
        ("HINDUNILVR.NS", "Hindustan Unilever"),
        ("ITC.NS", "ITC Limited"),
        ("SBIN.NS", "State Bank of India"),
        ("BHARTIARTL.NS", "Bharti Airtel"),
        ("KOTAKBANK.NS", "Kotak Mahindra Bank"),
        ("LT.NS", "Larsen & Toubro"),
        ("AXISBANK.NS", "Axis Bank"),
        ("ASIANPAINT.NS", "Asian Paints"),
        ("MARUTI.NS", "Maruti Suzuki"),
        ("TITAN.NS", "Titan Company"),
        ("WIPRO", "Wipro"),
        ("HCLTECH.NS", "HCL Technologies"),
        ("TATAMOTORS.NS", "Tata Motors"),
        ("TATASTEEL.NS", "Tata Steel"),
        ("BAJFINANCE.NS", "Bajaj Finance"),
        ("AAPL", "Apple Inc."),
        ("MSFT", "Microsoft Corporation"),
        ("GOOGL", "Alphabet Inc."),
        ("AMZN", "Amazon.com Inc."),
        ("TSLA", "Tesla Inc."),
        ("NVDA", "NVIDIA Corporation"),
        ("META", "Meta Platforms Inc."),
        ("NFLX", "Netflix Inc."),
    ]
    .iter()
    .map(|(symbol, name)| SearchItem {
        symbol: symbol.to_string(),
        name: name.to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crypto_table_is_exact() {
        let btc = crypto("BTCUSD");
        assert_eq!(btc["price"], 43250.50);
        assert_eq!(btc["change"], "+2.5%");
        assert_eq!(btc["volume"], "25.5B");

        let unknown = crypto("DOGEUSD");
        assert_eq!(unknown["symbol"], "DOGEUSD");
        assert!(unknown.get("price").is_none());
    }

    #[test]
    fn generated_quote_is_consistent() {
        let q = quote("tsla");
        assert_eq!(q.symbol, "TSLA");

        let price = q.price.unwrap();
        assert!(price >= 100.0 && price <= 500.0);
        assert!(q.day_low.unwrap() <= price);
        assert!(q.year_high.unwrap() > q.year_low.unwrap());
    }

    #[test]
    fn generated_bars_are_oldest_first_and_ordered() {
        let bars = historical(30);
        assert_eq!(bars.len(), 31);
        assert!(bars.first().unwrap().date < bars.last().unwrap().date);

        for bar in &bars {
            assert!(bar.high.unwrap() >= bar.low.unwrap());
            assert_eq!(bar.date, bar.time);
        }
    }

    #[test]
    fn static_tables_have_expected_sizes() {
        assert_eq!(dividends().len(), 4);
        assert_eq!(market_indices().len(), 4);
        assert_eq!(sectors().len(), 11);
        assert_eq!(movers().len(), 5);
        assert_eq!(stocks().len(), 28);
    }
}
