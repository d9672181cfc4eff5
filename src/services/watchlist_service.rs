use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::Utc;
use futures_util::StreamExt;
use mongodb::bson::{doc, oid::ObjectId, to_bson};
use mongodb::options::FindOptions;
use regex::Regex;

use crate::{
    AppState,
    models::{Watchlist, WatchlistStock},
};

use super::FieldErrors;

fn symbol_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z0-9.\-]{1,12}$").expect("valid symbol pattern"))
}

fn validate_name(name: &str, errs: &mut FieldErrors) {
    let len = name.trim().chars().count();
    if len < 2 {
        errs.insert("name".into(), "Name must be at least 2 characters.".into());
    } else if len > 32 {
        errs.insert("name".into(), "Name must be at most 32 characters.".into());
    }
}

fn parse_id(id: &str, errs: &mut FieldErrors) -> Option<ObjectId> {
    match ObjectId::parse_str(id) {
        Ok(oid) => Some(oid),
        Err(_) => {
            errs.insert("id".into(), "Invalid watchlist id.".into());
            None
        }
    }
}

pub async fn list(state: &AppState, user_id: ObjectId) -> Result<Vec<Watchlist>, String> {
    let watchlists = state.db.collection::<Watchlist>("watchlists");
    let find_opts = FindOptions::builder().sort(doc! { "created_at": -1 }).build();

    let mut cursor = watchlists
        .find(doc! { "user_id": user_id }, find_opts)
        .await
        .map_err(|e| e.to_string())?;

    let mut out: Vec<Watchlist> = vec![];
    while let Some(res) = cursor.next().await {
        out.push(res.map_err(|e| e.to_string())?);
    }
    Ok(out)
}

pub async fn create(
    state: &AppState,
    user_id: ObjectId,
    name: &str,
) -> Result<Watchlist, FieldErrors> {
    let mut errs: FieldErrors = HashMap::new();

    validate_name(name, &mut errs);
    if !errs.is_empty() {
        return Err(errs);
    }

    let now = Utc::now().timestamp();
    let watchlist = Watchlist {
        id: ObjectId::new(),
        user_id,
        name: name.trim().to_string(),
        stocks: vec![],
        created_at: now,
        updated_at: now,
    };

    let watchlists = state.db.collection::<Watchlist>("watchlists");
    if let Err(e) = watchlists.insert_one(&watchlist, None).await {
        errs.insert("_form".into(), format!("db error: {e}"));
        return Err(errs);
    }

    Ok(watchlist)
}

async fn get_owned(
    state: &AppState,
    user_id: ObjectId,
    id: ObjectId,
) -> Result<Option<Watchlist>, String> {
    let watchlists = state.db.collection::<Watchlist>("watchlists");
    watchlists
        .find_one(doc! { "_id": id, "user_id": user_id }, None)
        .await
        .map_err(|e| e.to_string())
}

pub async fn rename(
    state: &AppState,
    user_id: ObjectId,
    id: &str,
    name: &str,
) -> Result<Option<Watchlist>, FieldErrors> {
    let mut errs: FieldErrors = HashMap::new();

    validate_name(name, &mut errs);
    let Some(oid) = parse_id(id, &mut errs) else {
        return Err(errs);
    };
    if !errs.is_empty() {
        return Err(errs);
    }

    let mut watchlist = match get_owned(state, user_id, oid).await {
        Ok(Some(w)) => w,
        Ok(None) => return Ok(None),
        Err(e) => {
            errs.insert("_form".into(), format!("db error: {e}"));
            return Err(errs);
        }
    };

    watchlist.name = name.trim().to_string();
    watchlist.updated_at = Utc::now().timestamp();

    let watchlists = state.db.collection::<Watchlist>("watchlists");
    if let Err(e) = watchlists
        .update_one(
            doc! { "_id": oid, "user_id": user_id },
            doc! { "$set": { "name": &watchlist.name, "updated_at": watchlist.updated_at } },
            None,
        )
        .await
    {
        errs.insert("_form".into(), format!("db error: {e}"));
        return Err(errs);
    }

    Ok(Some(watchlist))
}

pub async fn delete(state: &AppState, user_id: ObjectId, id: &str) -> Result<bool, FieldErrors> {
    let mut errs: FieldErrors = HashMap::new();

    let Some(oid) = parse_id(id, &mut errs) else {
        return Err(errs);
    };

    let watchlists = state.db.collection::<Watchlist>("watchlists");
    match watchlists
        .delete_one(doc! { "_id": oid, "user_id": user_id }, None)
        .await
    {
        Ok(res) => Ok(res.deleted_count > 0),
        Err(e) => {
            errs.insert("_form".into(), format!("db error: {e}"));
            Err(errs)
        }
    }
}

async fn save_stocks(
    state: &AppState,
    watchlist: &Watchlist,
    errs: &mut FieldErrors,
) -> Result<(), ()> {
    let stocks = match to_bson(&watchlist.stocks) {
        Ok(b) => b,
        Err(e) => {
            errs.insert("_form".into(), format!("encode error: {e}"));
            return Err(());
        }
    };

    let watchlists = state.db.collection::<Watchlist>("watchlists");
    if let Err(e) = watchlists
        .update_one(
            doc! { "_id": watchlist.id, "user_id": watchlist.user_id },
            doc! { "$set": { "stocks": stocks, "updated_at": watchlist.updated_at } },
            None,
        )
        .await
    {
        errs.insert("_form".into(), format!("db error: {e}"));
        return Err(());
    }

    Ok(())
}

pub async fn add_stock(
    state: &AppState,
    user_id: ObjectId,
    id: &str,
    symbol: &str,
) -> Result<Option<Watchlist>, FieldErrors> {
    let mut errs: FieldErrors = HashMap::new();

    let sym = symbol.trim().to_uppercase();
    if !symbol_pattern().is_match(&sym) {
        errs.insert("symbol".into(), "Enter a valid symbol.".into());
    }
    let Some(oid) = parse_id(id, &mut errs) else {
        return Err(errs);
    };
    if !errs.is_empty() {
        return Err(errs);
    }

    let mut watchlist = match get_owned(state, user_id, oid).await {
        Ok(Some(w)) => w,
        Ok(None) => return Ok(None),
        Err(e) => {
            errs.insert("_form".into(), format!("db error: {e}"));
            return Err(errs);
        }
    };

    // Re-adding an existing symbol is a no-op.
    if watchlist.stocks.iter().any(|s| s.symbol == sym) {
        return Ok(Some(watchlist));
    }

    watchlist.stocks.push(WatchlistStock {
        symbol: sym,
        added_at: Utc::now().timestamp(),
    });
    watchlist.updated_at = Utc::now().timestamp();

    save_stocks(state, &watchlist, &mut errs)
        .await
        .map_err(|_| errs)?;

    Ok(Some(watchlist))
}

pub async fn remove_stock(
    state: &AppState,
    user_id: ObjectId,
    id: &str,
    symbol: &str,
) -> Result<Option<Watchlist>, FieldErrors> {
    let mut errs: FieldErrors = HashMap::new();

    let sym = symbol.trim().to_uppercase();
    let Some(oid) = parse_id(id, &mut errs) else {
        return Err(errs);
    };

    let mut watchlist = match get_owned(state, user_id, oid).await {
        Ok(Some(w)) => w,
        Ok(None) => return Ok(None),
        Err(e) => {
            errs.insert("_form".into(), format!("db error: {e}"));
            return Err(errs);
        }
    };

    watchlist.stocks.retain(|s| s.symbol != sym);
    watchlist.updated_at = Utc::now().timestamp();

    save_stocks(state, &watchlist, &mut errs)
        .await
        .map_err(|_| errs)?;

    Ok(Some(watchlist))
}
