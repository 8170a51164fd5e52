use courtside_shared::{Metadata, social::Status};

use crate::{policy::retry, store};

use super::Cancellation;

impl super::Command {
    /// Host or admin correction of a participation.
    ///
    /// Supported: `Registered -> Cancelled` (with promotion),
    /// `Waitlisted -> Cancelled` and `Absent -> ManuallyAttended`.
    #[tracing::instrument(skip(self, metadata), fields(initiator = metadata.trigger_by.as_deref()))]
    pub async fn override_status(
        &self,
        social_id: &str,
        participation_id: &str,
        new_status: Status,
        metadata: &Metadata,
        now: i64,
    ) -> courtside_shared::Result<Status> {
        super::parse_id(social_id)?;
        super::parse_id(participation_id)?;
        metadata.trigger_by()?;

        let (status, cancellation) = retry(&self.policy, move || {
            self.try_override_status(social_id, participation_id, new_status, metadata, now)
        })
        .await?;

        tracing::info!(%status, "participation status overridden");

        if let Some(promotion) = cancellation.as_ref().and_then(|c| c.promoted.as_ref()) {
            self.notify_promoted(promotion).await;
        }

        Ok(status)
    }

    async fn try_override_status(
        &self,
        social_id: &str,
        participation_id: &str,
        new_status: Status,
        metadata: &Metadata,
        now: i64,
    ) -> courtside_shared::Result<(Status, Option<Cancellation>)> {
        let _guard = self
            .locks
            .acquire(social_id, self.policy.lock_timeout)
            .await?;
        let mut tx = self.write_db.begin().await?;

        let Some(social) = store::social::find(&mut *tx, social_id).await? else {
            courtside_shared::not_found!("social");
        };

        if !Self::is_host_or_admin(&social, metadata) {
            return Err(courtside_shared::Error::NotAuthorized);
        }

        let Some(participation) = store::participation::find(&mut *tx, participation_id)
            .await?
            .filter(|p| p.social_id == social_id)
        else {
            courtside_shared::not_found!("participation");
        };

        let from = participation.status.0;
        let cancellation = match (from, new_status) {
            (Status::Registered | Status::Waitlisted, Status::Cancelled) => {
                Some(Self::cancel_in_tx(&mut tx, &participation, now).await?)
            }
            (Status::Absent, Status::ManuallyAttended) => {
                if !store::participation::transition(
                    &mut tx,
                    &participation.id,
                    from,
                    new_status,
                    now,
                )
                .await?
                {
                    return Err(courtside_shared::Error::Contention);
                }

                store::player::record_manual_attendance(&mut tx, &participation.player_id)
                    .await?;

                None
            }
            _ => {
                return Err(courtside_shared::Error::InvalidTransition(format!(
                    "cannot override participation from {from} to {new_status}"
                )));
            }
        };

        tx.commit().await?;

        Ok((new_status, cancellation))
    }
}
