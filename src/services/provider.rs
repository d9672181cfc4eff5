use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider's API key is empty. Not a failure, just a signal to
    /// move on to the next provider in the chain.
    #[error("api key not configured")]
    Unconfigured,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} returned {status}")]
    Status {
        provider: &'static str,
        status: u16,
    },
}

/// One provider attempt for a data category. Resolves to normalized
/// data, `None` for "response parsed but carried nothing usable", or a
/// provider failure.
pub type Attempt<'a, T> =
    Pin<Box<dyn Future<Output = Result<Option<T>, ProviderError>> + Send + 'a>>;

/// Walk the attempts in priority order and return the first that yields
/// data.
///
/// Failures and empty results are logged and swallowed here; the caller
/// decides what to serve when the whole chain comes up empty (every
/// read route has a mock fallback, so callers never error).
pub async fn first_success<T>(
    category: &'static str,
    attempts: Vec<(&'static str, Attempt<'_, T>)>,
) -> Option<T> {
    for (provider, attempt) in attempts {
        match attempt.await {
            Ok(Some(data)) => {
                tracing::debug!(category, provider, "provider returned data");
                return Some(data);
            }
            Ok(None) => {
                tracing::debug!(category, provider, "no usable data, trying next");
            }
            Err(ProviderError::Unconfigured) => {
                tracing::debug!(category, provider, "no api key, skipping");
            }
            Err(err) => {
                tracing::warn!(category, provider, error = %err, "provider unavailable, trying next");
            }
        }
    }
    None
}

/// Numeric field from a loose provider payload. Providers disagree on
/// whether numbers come as JSON numbers or strings; unparsable strings
/// become `None` rather than NaN, since the wire format cannot carry
/// NaN anyway.
pub fn num(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').parse().ok(),
        _ => None,
    }
}

pub fn int(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| s.trim().parse::<f64>().ok().map(|f| f as i64)),
        _ => None,
    }
}

pub fn text(v: &Value) -> Option<String> {
    v.as_str().map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn num_parses_plain_and_string_numbers() {
        assert_eq!(num(&json!(42.5)), Some(42.5));
        assert_eq!(num(&json!("42.5")), Some(42.5));
        assert_eq!(num(&json!("1.27%")), Some(1.27));
    }

    #[test]
    fn num_turns_garbage_into_none() {
        assert_eq!(num(&json!("--")), None);
        assert_eq!(num(&json!(null)), None);
        assert_eq!(num(&json!({})), None);
    }

    #[test]
    fn int_accepts_floats_and_strings() {
        assert_eq!(int(&json!(100)), Some(100));
        assert_eq!(int(&json!(100.7)), Some(100));
        assert_eq!(int(&json!("250000")), Some(250000));
        assert_eq!(int(&json!("not a number")), None);
    }

    #[tokio::test]
    async fn chain_returns_first_hit_and_skips_failures() {
        let attempts: Vec<(&'static str, Attempt<'_, i32>)> = vec![
            ("a", Box::pin(async { Err(ProviderError::Unconfigured) })),
            ("b", Box::pin(async { Ok(None) })),
            ("c", Box::pin(async { Ok(Some(7)) })),
            ("d", Box::pin(async { Ok(Some(8)) })),
        ];

        assert_eq!(first_success("test", attempts).await, Some(7));
    }

    #[tokio::test]
    async fn chain_exhaustion_yields_none() {
        let attempts: Vec<(&'static str, Attempt<'_, i32>)> = vec![
            ("a", Box::pin(async { Ok(None) })),
            (
                "b",
                Box::pin(async {
                    Err(ProviderError::Status {
                        provider: "b",
                        status: 500,
                    })
                }),
            ),
        ];

        assert_eq!(first_success("test", attempts).await, None);
    }
}
