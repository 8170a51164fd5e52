use courtside_shared::social::{Gender, Role};
use serde::Deserialize;
use validator::Validate;

use crate::store::{self, player::PlayerProfile};

/// Profile fields mirrored from the identity service.
#[derive(Debug, Clone, Validate, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPlayerInput {
    #[validate(length(min = 1, max = 64))]
    pub id: String,
    pub gender: Option<String>,
    #[validate(length(max = 50))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 64))]
    pub line_uid: Option<String>,
    #[serde(default)]
    pub role: Role,
}

impl super::Command {
    #[tracing::instrument(skip_all, fields(player_id = %input.id))]
    pub async fn sync_player(
        &self,
        input: SyncPlayerInput,
        now: i64,
    ) -> courtside_shared::Result<()> {
        input.validate()?;

        let gender = input.gender.as_deref().map(Gender::parse).transpose()?;

        let mut tx = self.write_db.begin().await?;
        store::player::upsert(
            &mut tx,
            PlayerProfile {
                id: &input.id,
                gender,
                name: input.name.as_deref(),
                email: input.email.as_deref(),
                line_uid: input.line_uid.as_deref(),
                role: input.role,
            },
            now,
        )
        .await?;
        tx.commit().await?;

        Ok(())
    }
}
