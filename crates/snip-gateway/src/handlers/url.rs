use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::info;
use url::Url;

use crate::error::Result;
use crate::model::{CreateUrlRequest, CreateUrlResponse, UrlResponse};
use crate::state::AppState;

pub async fn create_url_handler(
    State(state): State<AppState>,
    request: std::result::Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(request) = request?;

    let code = state.shortener().create(&request.url).await?;
    info!(code = %code, "short url created");

    let response = CreateUrlResponse {
        short_url: code.to_url(state.base_url()),
        code: code.to_string(),
        url: request.url,
    };

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let url = state.shortener().resolve(&short_code).await?;
    // percent-encodes anything a header value cannot carry
    let location = Url::parse(&url).map(String::from).unwrap_or(url);

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

pub async fn get_url_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UrlResponse>> {
    let mapping = state.shortener().lookup(&short_code).await?;

    Ok(Json(UrlResponse {
        code: mapping.code.to_string(),
        url: mapping.url,
        created_at: mapping.created_at,
    }))
}
