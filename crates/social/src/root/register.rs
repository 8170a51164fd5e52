use courtside_shared::{
    Metadata,
    social::{Gender, Status},
};
use serde::Serialize;
use ulid::Ulid;

use crate::{
    policy::retry,
    store::{self, participation::NewParticipation},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Admitted,
    Waitlisted,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub participation_id: String,
    pub outcome: Outcome,
    pub status: Status,
}

impl super::Command {
    /// Admits the caller against the quota of their gender, or queues them on
    /// the waitlist when it is exhausted.
    #[tracing::instrument(skip(self, metadata), fields(player_id = metadata.trigger_by.as_deref()))]
    pub async fn register(
        &self,
        social_id: &str,
        metadata: &Metadata,
        now: i64,
    ) -> courtside_shared::Result<Registration> {
        super::parse_id(social_id)?;
        let player_id = metadata.trigger_by()?;
        let gender = Gender::parse(metadata.gender.as_deref().unwrap_or_default())?;

        let player_id = player_id.as_str();
        let registration = retry(&self.policy, move || {
            self.try_register(social_id, player_id, gender, now)
        })
        .await?;

        tracing::info!(
            participation_id = %registration.participation_id,
            outcome = ?registration.outcome,
            "registered"
        );

        Ok(registration)
    }

    async fn try_register(
        &self,
        social_id: &str,
        player_id: &str,
        gender: Gender,
        now: i64,
    ) -> courtside_shared::Result<Registration> {
        let _guard = self
            .locks
            .acquire(social_id, self.policy.lock_timeout)
            .await?;
        let mut tx = self.write_db.begin().await?;

        let Some(social) = store::social::find(&mut *tx, social_id).await? else {
            courtside_shared::not_found!("social");
        };

        if social.is_cancelled || social.start_at <= now {
            return Err(courtside_shared::Error::RegistrationClosed);
        }

        if store::participation::find_active(&mut *tx, social_id, player_id)
            .await?
            .is_some()
        {
            return Err(courtside_shared::Error::AlreadyRegistered);
        }

        store::player::ensure(&mut tx, player_id, gender, now).await?;

        let (outcome, status) = if store::social::admit(&mut tx, social_id, gender, now).await? {
            (Outcome::Admitted, Status::Registered)
        } else {
            store::waitlist::push(&mut tx, social_id, player_id, gender, now).await?;
            (Outcome::Waitlisted, Status::Waitlisted)
        };

        let id = Ulid::new().to_string();
        store::participation::insert(
            &mut tx,
            NewParticipation {
                id: &id,
                social_id,
                player_id,
                gender,
                status,
                now,
            },
        )
        .await?;

        tx.commit().await?;

        Ok(Registration {
            participation_id: id,
            outcome,
            status,
        })
    }
}
