use courtside_shared::{Metadata, social::Status};
use serde::Serialize;
use sqlx::SqliteConnection;

use crate::{
    policy::retry,
    store::{self, participation::ParticipationRow},
};

use super::Promotion;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cancellation {
    pub participation_id: String,
    pub previous_status: Status,
    pub promoted: Option<Promotion>,
}

impl super::Command {
    /// Cancels a participation on behalf of its owner, the host or an admin.
    ///
    /// Owners are bound by the cancellation cutoff. A released slot is handed
    /// to the waitlist in the same transaction.
    #[tracing::instrument(skip(self, metadata), fields(initiator = metadata.trigger_by.as_deref()))]
    pub async fn cancel(
        &self,
        social_id: &str,
        participation_id: &str,
        metadata: &Metadata,
        now: i64,
    ) -> courtside_shared::Result<Cancellation> {
        super::parse_id(social_id)?;
        super::parse_id(participation_id)?;
        metadata.trigger_by()?;

        let cancellation = retry(&self.policy, move || {
            self.try_cancel(social_id, participation_id, metadata, now)
        })
        .await?;

        tracing::info!(previous_status = %cancellation.previous_status, "participation cancelled");

        if let Some(promotion) = &cancellation.promoted {
            self.notify_promoted(promotion).await;
        }

        Ok(cancellation)
    }

    /// Cancels the caller's own active participation.
    pub async fn cancel_own(
        &self,
        social_id: &str,
        metadata: &Metadata,
        now: i64,
    ) -> courtside_shared::Result<Cancellation> {
        super::parse_id(social_id)?;
        let player_id = metadata.trigger_by()?;

        let Some(participation) =
            store::participation::find_active(&self.read_db, social_id, &player_id).await?
        else {
            return Err(courtside_shared::Error::NotRegistered);
        };

        self.cancel(social_id, &participation.id, metadata, now)
            .await
    }

    async fn try_cancel(
        &self,
        social_id: &str,
        participation_id: &str,
        metadata: &Metadata,
        now: i64,
    ) -> courtside_shared::Result<Cancellation> {
        let _guard = self
            .locks
            .acquire(social_id, self.policy.lock_timeout)
            .await?;
        let mut tx = self.write_db.begin().await?;

        let Some(social) = store::social::find(&mut *tx, social_id).await? else {
            courtside_shared::not_found!("social");
        };

        let Some(participation) = store::participation::find(&mut *tx, participation_id)
            .await?
            .filter(|p| p.social_id == social_id)
        else {
            courtside_shared::not_found!("participation");
        };

        if !Self::is_host_or_admin(&social, metadata) {
            if metadata.trigger_by.as_deref() != Some(participation.player_id.as_str()) {
                return Err(courtside_shared::Error::NotAuthorized);
            }

            if now > social.start_at - self.policy.cancellation_cutoff {
                return Err(courtside_shared::Error::OutsideCancellationWindow);
            }
        }

        let cancellation = Self::cancel_in_tx(&mut tx, &participation, now).await?;
        tx.commit().await?;

        Ok(cancellation)
    }

    /// Cancels and, for slot holders, releases and promotes atomically.
    pub(crate) async fn cancel_in_tx(
        conn: &mut SqliteConnection,
        participation: &ParticipationRow,
        now: i64,
    ) -> courtside_shared::Result<Cancellation> {
        let from = participation.status.0;
        let gender = participation.gender.0;
        let social_id = participation.social_id.as_str();

        if !store::participation::transition(conn, &participation.id, from, Status::Cancelled, now)
            .await?
        {
            return Err(courtside_shared::Error::Contention);
        }

        let promoted = if from.holds_slot() {
            store::social::release(conn, social_id, gender, now).await?;
            Self::promote_in_tx(conn, social_id, gender, now).await?
        } else {
            store::waitlist::remove_player(conn, social_id, &participation.player_id).await?;
            None
        };

        Ok(Cancellation {
            participation_id: participation.id.to_owned(),
            previous_status: from,
            promoted,
        })
    }
}
