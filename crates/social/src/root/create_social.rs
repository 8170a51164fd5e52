use courtside_shared::{Metadata, social::SkillLevel};
use serde::Deserialize;
use ulid::Ulid;
use validator::Validate;

use crate::store::social::NewSocial;

#[derive(Debug, Clone, Validate, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSocialInput {
    #[validate(length(min = 1, max = 64))]
    pub venue_id: String,
    pub start_at: i64,
    pub end_at: i64,
    #[validate(range(min = 0))]
    pub fee: i64,
    #[serde(default)]
    pub skill_level: SkillLevel,
    #[validate(range(max = 500))]
    pub female_slots: u32,
    #[validate(range(max = 500))]
    pub male_slots: u32,
    #[validate(length(max = 100))]
    pub note: Option<String>,
}

impl super::Command {
    #[tracing::instrument(skip_all, fields(venue_id = %input.venue_id))]
    pub async fn create_social(
        &self,
        input: CreateSocialInput,
        metadata: &Metadata,
        now: i64,
    ) -> courtside_shared::Result<String> {
        input.validate()?;
        let host_id = metadata.trigger_by()?;

        if input.end_at <= input.start_at {
            return Err(courtside_shared::Error::ValidationFailed(
                "end time must be after start time".to_owned(),
            ));
        }

        if input.start_at <= now {
            return Err(courtside_shared::Error::ValidationFailed(
                "start time must be in the future".to_owned(),
            ));
        }

        if input.female_slots == 0 && input.male_slots == 0 {
            return Err(courtside_shared::Error::ValidationFailed(
                "at least one slot is required".to_owned(),
            ));
        }

        let id = Ulid::new().to_string();
        let mut tx = self.write_db.begin().await?;

        crate::store::social::insert(
            &mut tx,
            NewSocial {
                id: &id,
                host_id: &host_id,
                venue_id: &input.venue_id,
                start_at: input.start_at,
                end_at: input.end_at,
                fee: input.fee,
                skill_level: input.skill_level,
                female_slots: input.female_slots.into(),
                male_slots: input.male_slots.into(),
                note: input.note.as_deref(),
                created_at: now,
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(social_id = %id, "social created");

        Ok(id)
    }
}
