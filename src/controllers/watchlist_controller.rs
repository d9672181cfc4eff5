use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState,
    models::CurrentUser,
    services::{FieldErrors, watchlist_service},
};

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Unauthorized" })),
    )
        .into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Watchlist not found" })),
    )
        .into_response()
}

fn field_errors(errs: FieldErrors) -> Response {
    if let Some(msg) = errs.get("_form") {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": msg })),
        )
            .into_response();
    }
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": errs })),
    )
        .into_response()
}

pub async fn get_watchlists(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(user)) = user else {
        return unauthorized();
    };

    match watchlist_service::list(&state, user.id).await {
        Ok(watchlists) => Json(watchlists).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e })),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
pub struct NamePayload {
    #[serde(default)]
    pub name: String,
}

pub async fn post_watchlist(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Json(payload): Json<NamePayload>,
) -> Response {
    let Some(Extension(user)) = user else {
        return unauthorized();
    };

    match watchlist_service::create(&state, user.id, &payload.name).await {
        Ok(watchlist) => (StatusCode::CREATED, Json(watchlist)).into_response(),
        Err(errs) => field_errors(errs),
    }
}

pub async fn put_watchlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: Option<Extension<CurrentUser>>,
    Json(payload): Json<NamePayload>,
) -> Response {
    let Some(Extension(user)) = user else {
        return unauthorized();
    };

    match watchlist_service::rename(&state, user.id, &id, &payload.name).await {
        Ok(Some(watchlist)) => Json(watchlist).into_response(),
        Ok(None) => not_found(),
        Err(errs) => field_errors(errs),
    }
}

pub async fn delete_watchlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(user)) = user else {
        return unauthorized();
    };

    match watchlist_service::delete(&state, user.id, &id).await {
        Ok(true) => Json(json!({ "ok": true })).into_response(),
        Ok(false) => not_found(),
        Err(errs) => field_errors(errs),
    }
}

#[derive(Deserialize)]
pub struct StockPayload {
    #[serde(default)]
    pub symbol: String,
}

pub async fn post_watchlist_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: Option<Extension<CurrentUser>>,
    Json(payload): Json<StockPayload>,
) -> Response {
    let Some(Extension(user)) = user else {
        return unauthorized();
    };

    match watchlist_service::add_stock(&state, user.id, &id, &payload.symbol).await {
        Ok(Some(watchlist)) => Json(watchlist).into_response(),
        Ok(None) => not_found(),
        Err(errs) => field_errors(errs),
    }
}

pub async fn delete_watchlist_stock(
    State(state): State<AppState>,
    Path((id, symbol)): Path<(String, String)>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(user)) = user else {
        return unauthorized();
    };

    match watchlist_service::remove_stock(&state, user.id, &id, &symbol).await {
        Ok(Some(watchlist)) => Json(watchlist).into_response(),
        Ok(None) => not_found(),
        Err(errs) => field_errors(errs),
    }
}
