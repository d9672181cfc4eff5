use std::collections::HashMap;

pub mod provider;
pub mod sentiment;

pub mod fmp;
pub mod alpha_vantage;
pub mod finnhub;

pub mod market_service;
pub mod mock_data;

pub mod backend_service;
pub mod link_service;

pub mod watchlist_service;
pub mod strategy_service;
pub mod position_service;
pub mod user_service;

/// Per-field validation messages, keyed by field name. "_form" carries
/// errors that belong to the whole request rather than one field.
pub type FieldErrors = HashMap<String, String>;
