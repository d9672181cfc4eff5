use axum::{
    Json,
    extract::{Extension, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState,
    models::{CurrentUser, StrategyLeg},
    services::{FieldErrors, strategy_service},
};

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Unauthorized" })),
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

pub async fn get_strategies(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(user)) = user else {
        return unauthorized();
    };

    match strategy_service::list(&state, user.id).await {
        Ok(strategies) => Json(strategies).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e })),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
pub struct CreateStrategyPayload {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub legs: Vec<StrategyLeg>,
}

pub async fn post_strategy(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Json(payload): Json<CreateStrategyPayload>,
) -> Response {
    let Some(Extension(user)) = user else {
        return unauthorized();
    };

    match strategy_service::create(
        &state,
        user.id,
        &payload.name,
        payload.description,
        payload.legs,
    )
    .await
    {
        Ok(strategy) => (StatusCode::CREATED, Json(strategy)).into_response(),
        Err(errs) => field_errors(errs),
    }
}
