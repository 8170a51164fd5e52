use courtside_db::table::Social;
use courtside_shared::social::Status;
use serde::Serialize;

use crate::store::{self, social::SocialRow};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    pub processed: Vec<String>,
    pub failed: Vec<String>,
}

impl super::Command {
    /// Sends the day-before reminder to admitted participants and the host.
    ///
    /// The flag is claimed before sending so concurrent sweeps never send the
    /// same reminder twice.
    #[tracing::instrument(skip(self))]
    pub async fn remind_upcoming(&self, now: i64) -> courtside_shared::Result<SweepReport> {
        let due = store::social::starting_within(
            &self.read_db,
            now,
            self.policy.reminder_lead,
            Social::ReminderSent,
        )
        .await?;

        let mut report = SweepReport::default();
        for social in due {
            match self.remind_social(&social, now).await {
                Ok(true) => report.processed.push(social.id),
                Ok(false) => {}
                Err(err) => {
                    tracing::error!(err = %err, social_id = %social.id, "failed to send reminders");
                    report.failed.push(social.id);
                }
            }
        }

        Ok(report)
    }

    async fn remind_social(&self, social: &SocialRow, now: i64) -> courtside_shared::Result<bool> {
        let mut conn = self.write_db.acquire().await?;
        if !store::social::claim_flag(&mut conn, &social.id, Social::ReminderSent, now).await? {
            return Ok(false);
        }
        drop(conn);

        let mut conn = self.read_db.acquire().await?;
        let participants = store::participation::list_by_status(
            &mut conn,
            &social.id,
            &[Status::Registered, Status::Promoted],
        )
        .await?;
        drop(conn);

        let subject = "Your social starts soon";
        let body = format!(
            "Reminder: social {} at venue {} starts at {} (unix time). Check-in opens one hour before start.",
            social.id, social.venue_id, social.start_at
        );

        for participant in &participants {
            self.notify_player(&participant.player_id, subject, &body)
                .await;
        }

        self.notify_player(
            &social.host_id,
            "Your hosted social starts soon",
            &format!(
                "Social {} starts at {} with {} confirmed participants.",
                social.id,
                social.start_at,
                participants.len()
            ),
        )
        .await;

        tracing::info!(social_id = %social.id, participants = participants.len(), "reminders sent");

        Ok(true)
    }

    /// Generates check-in codes for socials about to start and hands them to
    /// their hosts.
    #[tracing::instrument(skip(self))]
    pub async fn generate_checkin_codes(&self, now: i64) -> courtside_shared::Result<SweepReport> {
        let due = store::social::starting_within(
            &self.read_db,
            now,
            self.policy.qr_lead,
            Social::QrCodeGenerated,
        )
        .await?;

        let mut report = SweepReport::default();
        for social in due {
            match self.issue_checkin_code(&social, now).await {
                Ok(true) => report.processed.push(social.id),
                Ok(false) => {}
                Err(err) => {
                    tracing::error!(err = %err, social_id = %social.id, "failed to generate check-in code");
                    report.failed.push(social.id);
                }
            }
        }

        Ok(report)
    }

    async fn issue_checkin_code(
        &self,
        social: &SocialRow,
        now: i64,
    ) -> courtside_shared::Result<bool> {
        let url = self.policy.checkin_url(&social.id);
        self.qr.generate(&url)?;

        let mut conn = self.write_db.acquire().await?;
        if !store::social::claim_flag(&mut conn, &social.id, Social::QrCodeGenerated, now).await? {
            return Ok(false);
        }
        drop(conn);

        self.notify_player(
            &social.host_id,
            "Check-in code ready",
            &format!(
                "The check-in code for social {} is ready. Display it at the venue or share this link with participants: {url}",
                social.id
            ),
        )
        .await;

        tracing::info!(social_id = %social.id, "check-in code generated");

        Ok(true)
    }
}
