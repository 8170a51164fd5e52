use courtside_shared::social::{Gender, Status};
use serde::Serialize;
use sqlx::SqliteConnection;

use crate::{policy::retry, store};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub social_id: String,
    pub participation_id: String,
    pub player_id: String,
    pub gender: Gender,
}

impl super::Command {
    /// Fills one free `gender` slot from the waitlist, if both exist.
    #[tracing::instrument(skip(self))]
    pub async fn promote(
        &self,
        social_id: &str,
        gender: Gender,
        now: i64,
    ) -> courtside_shared::Result<Option<Promotion>> {
        super::parse_id(social_id)?;

        let promotion = retry(&self.policy, move || self.try_promote(social_id, gender, now)).await?;

        if let Some(promotion) = &promotion {
            self.notify_promoted(promotion).await;
        }

        Ok(promotion)
    }

    async fn try_promote(
        &self,
        social_id: &str,
        gender: Gender,
        now: i64,
    ) -> courtside_shared::Result<Option<Promotion>> {
        let _guard = self
            .locks
            .acquire(social_id, self.policy.lock_timeout)
            .await?;
        let mut tx = self.write_db.begin().await?;

        if store::social::find(&mut *tx, social_id).await?.is_none() {
            courtside_shared::not_found!("social");
        }

        let promotion = Self::promote_in_tx(&mut tx, social_id, gender, now).await?;
        tx.commit().await?;

        Ok(promotion)
    }

    /// Pops the oldest waitlist entry of `gender` into a free slot.
    ///
    /// Must run under the social lock, inside the transaction of the release
    /// that freed the slot. Entries whose participation is no longer
    /// waitlisted are discarded.
    pub(crate) async fn promote_in_tx(
        conn: &mut SqliteConnection,
        social_id: &str,
        gender: Gender,
        now: i64,
    ) -> courtside_shared::Result<Option<Promotion>> {
        let Some(social) = store::social::find(&mut *conn, social_id).await? else {
            courtside_shared::not_found!("social");
        };

        if social.demand(gender) <= 0 {
            return Ok(None);
        }

        while let Some(entry) = store::waitlist::oldest(conn, social_id, gender).await? {
            if !store::waitlist::remove(conn, entry.seq).await? {
                continue;
            }

            let participation =
                store::participation::find_active(&mut *conn, social_id, &entry.player_id).await?;

            let Some(participation) =
                participation.filter(|p| p.status.0 == Status::Waitlisted)
            else {
                tracing::warn!(player_id = %entry.player_id, "discarding stale waitlist entry");
                continue;
            };

            if !store::participation::transition(
                conn,
                &participation.id,
                Status::Waitlisted,
                Status::Promoted,
                now,
            )
            .await?
            {
                continue;
            }

            if !store::social::admit(conn, social_id, gender, now).await? {
                return Err(courtside_shared::Error::Contention);
            }

            tracing::info!(
                participation_id = %participation.id,
                player_id = %entry.player_id,
                "promoted from waitlist"
            );

            return Ok(Some(Promotion {
                social_id: social_id.to_owned(),
                participation_id: participation.id,
                player_id: entry.player_id,
                gender,
            }));
        }

        Ok(None)
    }

    pub(crate) async fn notify_promoted(&self, promotion: &Promotion) {
        self.notify_player(
            &promotion.player_id,
            "You're in!",
            &format!(
                "A spot opened up and you have been promoted from the waitlist of social {}.",
                promotion.social_id
            ),
        )
        .await;
    }
}
