use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use axum_extra::extract::Query;
use courtside_shared::{
    Metadata,
    social::{Gender, TimeFilter},
};
use courtside_social::{CreateSocialInput, UpdateSocialInput};
use serde::Deserialize;
use serde_json::json;

use super::{AppState, done, now, reply};
use crate::error::AppError;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub filter: TimeFilter,
}

/// GET /socials?filter=upcoming|past|all|available
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let socials = state.query.list_socials(query.filter, now()).await?;

    Ok(reply(format!("{} socials", socials.len()), socials))
}

/// POST /socials
pub async fn create(
    State(state): State<AppState>,
    Extension(metadata): Extension<Metadata>,
    Json(input): Json<CreateSocialInput>,
) -> Result<impl IntoResponse, AppError> {
    let id = state.command.create_social(input, &metadata, now()).await?;

    Ok(reply("social created", json!({ "id": id })))
}

/// GET /socials/{id}
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some(social) = state.query.find_social(&id).await? else {
        return Err(courtside_shared::Error::NotFound("social".to_owned()).into());
    };

    Ok(reply("social found", social))
}

/// PATCH /socials/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(metadata): Extension<Metadata>,
    Path(id): Path<String>,
    Json(input): Json<UpdateSocialInput>,
) -> Result<impl IntoResponse, AppError> {
    state
        .command
        .update_social(&id, input, &metadata, now())
        .await?;

    Ok(done("social updated"))
}

/// GET /socials/{id}/qrcode
pub async fn qrcode(
    State(state): State<AppState>,
    Extension(metadata): Extension<Metadata>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let code = state.command.checkin_qr_code(&id, &metadata, now()).await?;

    Ok(reply("check-in code ready", code))
}

#[derive(Debug, Deserialize)]
pub struct PromoteInput {
    pub gender: Gender,
}

/// POST /socials/{id}/promote, manual trigger for the host or an admin.
pub async fn promote(
    State(state): State<AppState>,
    Extension(metadata): Extension<Metadata>,
    Path(id): Path<String>,
    Json(input): Json<PromoteInput>,
) -> Result<impl IntoResponse, AppError> {
    let Some(social) = state.query.find_social(&id).await? else {
        return Err(courtside_shared::Error::NotFound("social".to_owned()).into());
    };

    if !metadata.is_admin() && metadata.trigger_by.as_deref() != Some(social.social.host_id.as_str())
    {
        return Err(courtside_shared::Error::NotAuthorized.into());
    }

    let promotion = state.command.promote(&id, input.gender, now()).await?;
    let message = match &promotion {
        Some(_) => "participant promoted",
        None => "nobody to promote",
    };

    Ok(reply(message, promotion))
}
