use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// One buy/sell instruction within a multi-leg strategy.
///
/// `strike`, `expiry` and `limit_price` only apply to option legs and
/// limit orders respectively; they stay `None` otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyLeg {
    #[serde(rename = "type")]
    pub kind: String,

    pub action: String,
    pub symbol: String,

    #[serde(default)]
    pub strike: Option<f64>,

    #[serde(default)]
    pub expiry: Option<String>,

    pub quantity: f64,

    #[serde(rename = "orderType")]
    pub order_type: String,

    #[serde(rename = "limitPrice", default)]
    pub limit_price: Option<f64>,
}

/// Legs are immutable after creation; there is no update route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strategy {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub user_id: ObjectId,
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub legs: Vec<StrategyLeg>,

    pub created_at: i64,
}
