use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use axum_extra::extract::Query;
use courtside_shared::{
    Metadata,
    social::{Status, TimeFilter},
};
use serde::Deserialize;
use serde_json::json;

use super::{AppState, now, reply};
use crate::error::AppError;

/// POST /socials/{id}/participants
pub async fn register(
    State(state): State<AppState>,
    Extension(metadata): Extension<Metadata>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let registration = state.command.register(&id, &metadata, now()).await?;
    let message = match registration.status {
        Status::Waitlisted => "added to the waitlist",
        _ => "registered",
    };

    Ok(reply(message, registration))
}

/// GET /socials/{id}/participants
pub async fn list_for_social(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let participants = state.query.list_social_participants(&id).await?;

    Ok(reply(format!("{} participants", participants.len()), participants))
}

/// DELETE /socials/{id}/my-participation
pub async fn cancel_own(
    State(state): State<AppState>,
    Extension(metadata): Extension<Metadata>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let cancellation = state.command.cancel_own(&id, &metadata, now()).await?;

    Ok(reply("participation cancelled", cancellation))
}

/// POST /socials/{id}/checkin
pub async fn check_in(
    State(state): State<AppState>,
    Extension(metadata): Extension<Metadata>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let participation_id = state.command.check_in(&id, &metadata, now()).await?;

    Ok(reply(
        "checked in",
        json!({ "participationId": participation_id }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct OverrideInput {
    pub status: Status,
}

/// PUT /socials/{id}/participants/{participation_id}/status
pub async fn override_status(
    State(state): State<AppState>,
    Extension(metadata): Extension<Metadata>,
    Path((id, participation_id)): Path<(String, String)>,
    Json(input): Json<OverrideInput>,
) -> Result<impl IntoResponse, AppError> {
    let status = state
        .command
        .override_status(&id, &participation_id, input.status, &metadata, now())
        .await?;

    Ok(reply("participation updated", json!({ "status": status })))
}

#[derive(Debug, Default, Deserialize)]
pub struct MineQuery {
    pub status: Option<Status>,
    #[serde(default)]
    pub time: TimeFilter,
}

/// GET /my-participations?status=&time=
pub async fn list_mine(
    State(state): State<AppState>,
    Extension(metadata): Extension<Metadata>,
    Query(query): Query<MineQuery>,
) -> Result<impl IntoResponse, AppError> {
    let player_id = metadata.trigger_by()?;
    let participations = state
        .query
        .list_my_participations(&player_id, query.status, query.time, now())
        .await?;

    Ok(reply(
        format!("{} participations", participations.len()),
        participations,
    ))
}

/// GET /admin/players/{id}/participations
pub async fn admin_list(
    State(state): State<AppState>,
    Extension(metadata): Extension<Metadata>,
    Path(player_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let participations = state
        .query
        .admin_list_participations(&player_id, &metadata)
        .await?;

    Ok(reply(
        format!("{} participations", participations.len()),
        participations,
    ))
}
