use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::{
    auth::extractors::AuthUser,
    error::ApiError,
    state::AppState,
    weights::{
        dto::{AccountResponse, EntryResponse, NewEntryRequest},
        services::validate_entry,
        summary::summarize,
    },
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/weights", get(list_entries))
        .route("/account", get(account))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/weights", post(submit_entry))
}

#[instrument(skip(state, payload))]
pub async fn submit_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<NewEntryRequest>,
) -> Result<(StatusCode, Json<EntryResponse>), ApiError> {
    let (weight, satisfaction) = validate_entry(&state.config.satisfaction, &payload)?;
    let entry = state
        .entries
        .append(user_id, weight, satisfaction, OffsetDateTime::now_utc())
        .await?;
    info!(user_id = %user_id, entry_id = %entry.id, weight, "weight entry recorded");
    Ok((StatusCode::CREATED, Json(entry.into())))
}

#[instrument(skip(state))]
pub async fn list_entries(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<EntryResponse>>, ApiError> {
    let entries = state.entries.list_for_user(user_id).await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// The account view. A brand-new user has no history; that renders as
/// `summary: null`, never as an error.
#[instrument(skip(state))]
pub async fn account(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<AccountResponse>, ApiError> {
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(ApiError::Unauthenticated)?;
    let entries = state.entries.list_for_user(user_id).await?;

    let summary = if entries.is_empty() {
        None
    } else {
        Some(summarize(&entries)?.into())
    };

    Ok(Json(AccountResponse {
        user: user.into(),
        entries: entries.into_iter().map(Into::into).collect(),
        summary,
    }))
}
