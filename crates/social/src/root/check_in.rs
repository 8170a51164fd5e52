use courtside_shared::{Metadata, social::Status};

use crate::{policy::retry, store};

impl super::Command {
    /// Marks the caller as attended while the check-in window is open.
    ///
    /// Only the participation row and the player counters change, so no
    /// social lock is taken.
    #[tracing::instrument(skip(self, metadata), fields(player_id = metadata.trigger_by.as_deref()))]
    pub async fn check_in(
        &self,
        social_id: &str,
        metadata: &Metadata,
        now: i64,
    ) -> courtside_shared::Result<String> {
        super::parse_id(social_id)?;
        let player_id = metadata.trigger_by()?;

        let player_id = player_id.as_str();
        let participation_id =
            retry(&self.policy, move || self.try_check_in(social_id, player_id, now)).await?;

        tracing::info!(%participation_id, "checked in");

        Ok(participation_id)
    }

    async fn try_check_in(
        &self,
        social_id: &str,
        player_id: &str,
        now: i64,
    ) -> courtside_shared::Result<String> {
        let mut tx = self.write_db.begin().await?;

        let Some(social) = store::social::find(&mut *tx, social_id).await? else {
            courtside_shared::not_found!("social");
        };

        let Some(participation) = store::participation::find_active(&mut *tx, social_id, player_id)
            .await?
            .filter(|p| p.status.0.holds_slot())
        else {
            return Err(courtside_shared::Error::NotRegistered);
        };

        if social.is_cancelled {
            return Err(courtside_shared::Error::InvalidTransition(
                "social has been cancelled".to_owned(),
            ));
        }

        let opens_at = social.start_at - self.policy.checkin_lead;
        let closes_at = social.end_at + self.policy.checkin_grace;
        if now < opens_at || now > closes_at {
            return Err(courtside_shared::Error::OutsideCheckinWindow);
        }

        if !store::participation::transition(
            &mut tx,
            &participation.id,
            participation.status.0,
            Status::Attended,
            now,
        )
        .await?
        {
            return Err(courtside_shared::Error::NotRegistered);
        }

        store::player::record_attended(&mut tx, player_id).await?;
        tx.commit().await?;

        Ok(participation.id)
    }
}
