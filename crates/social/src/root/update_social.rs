use courtside_shared::{Metadata, social::SkillLevel};
use serde::Deserialize;
use validator::Validate;

use crate::{
    policy::retry,
    store::{self, social::SocialChanges},
};

/// Fields a host may change after creation. Host, venue and quotas are fixed.
#[derive(Debug, Clone, Default, Validate, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSocialInput {
    pub start_at: Option<i64>,
    pub end_at: Option<i64>,
    #[validate(range(min = 0))]
    pub fee: Option<i64>,
    pub skill_level: Option<SkillLevel>,
    #[validate(length(max = 100))]
    pub note: Option<String>,
    pub is_cancelled: Option<bool>,
}

impl super::Command {
    #[tracing::instrument(skip(self, input, metadata))]
    pub async fn update_social(
        &self,
        social_id: &str,
        input: UpdateSocialInput,
        metadata: &Metadata,
        now: i64,
    ) -> courtside_shared::Result<()> {
        super::parse_id(social_id)?;
        input.validate()?;
        metadata.trigger_by()?;

        let input = &input;
        retry(&self.policy, move || {
            self.try_update_social(social_id, input, metadata, now)
        })
        .await
    }

    async fn try_update_social(
        &self,
        social_id: &str,
        input: &UpdateSocialInput,
        metadata: &Metadata,
        now: i64,
    ) -> courtside_shared::Result<()> {
        let _guard = self
            .locks
            .acquire(social_id, self.policy.lock_timeout)
            .await?;
        let mut tx = self.write_db.begin().await?;

        let Some(social) = store::social::find(&mut *tx, social_id).await? else {
            courtside_shared::not_found!("social");
        };

        if metadata.trigger_by.as_deref() != Some(social.host_id.as_str()) {
            return Err(courtside_shared::Error::NotAuthorized);
        }

        // An empty note clears it.
        let note = match input.note.as_deref() {
            Some("") => None,
            Some(note) => Some(note.to_owned()),
            None => social.note,
        };

        let start_at = input.start_at.unwrap_or(social.start_at);
        let changes = SocialChanges {
            start_at,
            end_at: input.end_at.unwrap_or(social.end_at),
            fee: input.fee.unwrap_or(social.fee),
            skill_level: input.skill_level.unwrap_or(social.skill_level.0),
            note,
            is_cancelled: input.is_cancelled.unwrap_or(social.is_cancelled),
            rescheduled: start_at != social.start_at,
        };

        if changes.end_at <= changes.start_at {
            return Err(courtside_shared::Error::ValidationFailed(
                "end time must be after start time".to_owned(),
            ));
        }

        store::social::update(&mut tx, social_id, changes, now).await?;
        tx.commit().await?;

        tracing::info!("social updated");

        Ok(())
    }
}
