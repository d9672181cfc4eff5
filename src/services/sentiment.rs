/// Keyword-based sentiment tagging for news headlines. Crude but good
/// enough for a dashboard badge; providers that ship their own
/// sentiment score bypass this.
const BULLISH: &[&str] = &[
    "gain", "rise", "up", "surge", "profit", "growth", "strong", "beat", "exceed", "positive",
    "rally", "bullish", "upgrade", "buy", "soar", "record", "high", "success", "boost", "improve",
    "outperform", "win",
];

const BEARISH: &[&str] = &[
    "fall", "down", "drop", "loss", "decline", "weak", "miss", "cut", "negative", "bearish",
    "downgrade", "sell", "plunge", "low", "fail", "concern", "risk", "warning", "underperform",
    "lawsuit", "probe",
];

pub fn classify(title: &str, body: &str) -> &'static str {
    let text = format!("{} {}", title, body).to_lowercase();

    let bullish = BULLISH.iter().filter(|k| text.contains(*k)).count();
    let bearish = BEARISH.iter().filter(|k| text.contains(*k)).count();

    if bullish > bearish {
        "bullish"
    } else if bearish > bullish {
        "bearish"
    } else {
        "neutral"
    }
}

/// Alpha Vantage ships a numeric sentiment score instead of text.
pub fn from_score(score: f64) -> &'static str {
    if score > 0.15 {
        "bullish"
    } else if score < -0.15 {
        "bearish"
    } else {
        "neutral"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bullish_headline() {
        assert_eq!(
            classify("Shares surge on record profit", "strong growth beat estimates"),
            "bullish"
        );
    }

    #[test]
    fn bearish_headline() {
        assert_eq!(
            classify("Stock plunges after lawsuit", "regulators probe accounting concerns"),
            "bearish"
        );
    }

    #[test]
    fn mixed_or_empty_is_neutral() {
        assert_eq!(classify("Quarterly report released", ""), "neutral");
        assert_eq!(classify("Gains offset by losses", "rise and fall"), "neutral");
    }

    #[test]
    fn score_thresholds() {
        assert_eq!(from_score(0.3), "bullish");
        assert_eq!(from_score(-0.3), "bearish");
        assert_eq!(from_score(0.1), "neutral");
    }
}
