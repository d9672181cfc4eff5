use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, services::link_service::LinkMetadata};

#[derive(Deserialize)]
pub struct ShortenPayload {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub metadata: Option<LinkMetadata>,
}

pub async fn post_link(
    State(state): State<AppState>,
    Json(payload): Json<ShortenPayload>,
) -> Response {
    let url = payload.url.trim();
    if url.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": { "url": "Missing url." } })),
        )
            .into_response();
    }

    let code = state.links.shorten(url, payload.metadata);
    let short_url = format!("{}/l/{}", state.settings.base_url, code);

    (
        StatusCode::CREATED,
        Json(json!({ "shortCode": code, "shortUrl": short_url })),
    )
        .into_response()
}

/// The public redirect surface. Following the link counts the click.
pub async fn get_redirect(State(state): State<AppState>, Path(code): Path<String>) -> Response {
    match state.links.resolve(&code) {
        Some(url) => Redirect::temporary(&url).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Link not found" })),
        )
            .into_response(),
    }
}

pub async fn get_analytics(State(state): State<AppState>) -> Response {
    let links = state.links.all_analytics();

    Json(json!({
        "total": links.len(),
        "links": links,
    }))
    .into_response()
}

pub async fn get_link_analytics(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Response {
    match state.links.analytics(&code) {
        Some(record) => Json(record).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Link not found" })),
        )
            .into_response(),
    }
}
