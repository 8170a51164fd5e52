use axum::{
    Extension, Json,
    extract::State,
    response::IntoResponse,
};
use courtside_shared::Metadata;
use courtside_social::SyncPlayerInput;

use super::{AppState, done, now};
use crate::error::AppError;

/// POST /players
///
/// Profile sync from the identity service. Players may only sync themselves,
/// and only admins may grant roles.
pub async fn sync(
    State(state): State<AppState>,
    Extension(metadata): Extension<Metadata>,
    Json(input): Json<SyncPlayerInput>,
) -> Result<impl IntoResponse, AppError> {
    let caller = metadata.trigger_by()?;

    if !metadata.is_admin() && (caller != input.id || input.role != metadata.role) {
        return Err(courtside_shared::Error::NotAuthorized.into());
    }

    state.command.sync_player(input, now()).await?;

    Ok(done("player synced"))
}
