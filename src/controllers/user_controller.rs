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
    models::{CurrentUser, UserFilters},
    services::{FieldErrors, user_service},
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

pub async fn get_filters(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(user)) = user else {
        return unauthorized();
    };

    match user_service::get_profile(&state, user.id).await {
        Ok(Some(profile)) => Json(profile).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "User not found" })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e })),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
pub struct UpdateFiltersPayload {
    #[serde(rename = "phoneNumber", default)]
    pub phone_number: Option<String>,

    #[serde(default)]
    pub scrips: Option<Vec<String>>,

    #[serde(default)]
    pub categories: Option<Vec<String>>,

    #[serde(default)]
    pub keywords: Option<Vec<String>>,
}

pub async fn put_filters(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Json(payload): Json<UpdateFiltersPayload>,
) -> Response {
    let Some(Extension(user)) = user else {
        return unauthorized();
    };

    let filters = UserFilters {
        scrips: payload.scrips.unwrap_or_default(),
        categories: payload.categories.unwrap_or_default(),
        keywords: payload.keywords.unwrap_or_default(),
    };

    match user_service::update_filters(&state, &user, payload.phone_number, filters).await {
        Ok(profile) => Json(profile).into_response(),
        Err(errs) => field_errors(errs),
    }
}
