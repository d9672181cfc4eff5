use std::collections::HashMap;

use chrono::Utc;
use futures_util::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::FindOptions;

use crate::{
    AppState,
    models::{Strategy, StrategyLeg},
};

use super::FieldErrors;

pub async fn list(state: &AppState, user_id: ObjectId) -> Result<Vec<Strategy>, String> {
    let strategies = state.db.collection::<Strategy>("strategies");
    let find_opts = FindOptions::builder().sort(doc! { "created_at": -1 }).build();

    let mut cursor = strategies
        .find(doc! { "user_id": user_id }, find_opts)
        .await
        .map_err(|e| e.to_string())?;

    let mut out: Vec<Strategy> = vec![];
    while let Some(res) = cursor.next().await {
        out.push(res.map_err(|e| e.to_string())?);
    }
    Ok(out)
}

fn validate_leg(index: usize, leg: &StrategyLeg, errs: &mut FieldErrors) {
    let key = |field: &str| format!("legs[{index}].{field}");

    if !matches!(leg.kind.as_str(), "equity" | "option") {
        errs.insert(key("type"), "Leg type must be equity or option.".into());
    }
    if !matches!(leg.action.as_str(), "buy" | "sell") {
        errs.insert(key("action"), "Leg action must be buy or sell.".into());
    }
    if leg.symbol.trim().is_empty() {
        errs.insert(key("symbol"), "Missing symbol.".into());
    }
    if leg.quantity <= 0.0 {
        errs.insert(key("quantity"), "Enter a valid quantity.".into());
    }
    if !matches!(leg.order_type.as_str(), "market" | "limit") {
        errs.insert(key("orderType"), "Order type must be market or limit.".into());
    }
    if leg.order_type == "limit" && leg.limit_price.is_none() {
        errs.insert(key("limitPrice"), "Limit orders need a limit price.".into());
    }
}

pub async fn create(
    state: &AppState,
    user_id: ObjectId,
    name: &str,
    description: Option<String>,
    legs: Vec<StrategyLeg>,
) -> Result<Strategy, FieldErrors> {
    let mut errs: FieldErrors = HashMap::new();

    if name.trim().chars().count() < 3 {
        errs.insert("name".into(), "Name must be at least 3 characters.".into());
    }
    if legs.is_empty() {
        errs.insert("legs".into(), "Add at least one leg.".into());
    }
    for (i, leg) in legs.iter().enumerate() {
        validate_leg(i, leg, &mut errs);
    }
    if !errs.is_empty() {
        return Err(errs);
    }

    let legs = legs
        .into_iter()
        .map(|mut leg| {
            leg.symbol = leg.symbol.trim().to_uppercase();
            leg
        })
        .collect();

    let strategy = Strategy {
        id: ObjectId::new(),
        user_id,
        name: name.trim().to_string(),
        description,
        legs,
        created_at: Utc::now().timestamp(),
    };

    let strategies = state.db.collection::<Strategy>("strategies");
    if let Err(e) = strategies.insert_one(&strategy, None).await {
        errs.insert("_form".into(), format!("db error: {e}"));
        return Err(errs);
    }

    Ok(strategy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn equity_leg() -> StrategyLeg {
        StrategyLeg {
            kind: "equity".into(),
            action: "buy".into(),
            symbol: "AAPL".into(),
            strike: None,
            expiry: None,
            quantity: 10.0,
            order_type: "market".into(),
            limit_price: None,
        }
    }

    #[test]
    fn valid_leg_passes() {
        let mut errs = FieldErrors::new();
        validate_leg(0, &equity_leg(), &mut errs);
        assert!(errs.is_empty());
    }

    #[test]
    fn bad_enums_are_flagged_per_leg() {
        let mut leg = equity_leg();
        leg.kind = "future".into();
        leg.action = "hold".into();

        let mut errs = FieldErrors::new();
        validate_leg(1, &leg, &mut errs);
        assert!(errs.contains_key("legs[1].type"));
        assert!(errs.contains_key("legs[1].action"));
    }

    #[test]
    fn limit_order_requires_price() {
        let mut leg = equity_leg();
        leg.order_type = "limit".into();

        let mut errs = FieldErrors::new();
        validate_leg(0, &leg, &mut errs);
        assert!(errs.contains_key("legs[0].limitPrice"));

        leg.limit_price = Some(187.5);
        let mut errs = FieldErrors::new();
        validate_leg(0, &leg, &mut errs);
        assert!(errs.is_empty());
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let mut leg = equity_leg();
        leg.quantity = 0.0;

        let mut errs = FieldErrors::new();
        validate_leg(0, &leg, &mut errs);
        assert!(errs.contains_key("legs[0].quantity"));
    }
}
