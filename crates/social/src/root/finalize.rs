use courtside_db::table::Social;
use courtside_shared::social::Status;
use futures::{StreamExt, stream};
use serde::Serialize;

use crate::{policy::retry, store};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeReport {
    pub finalized: Vec<String>,
    pub absences: u64,
    pub failed: Vec<String>,
}

impl super::Command {
    /// Closes every social whose check-in window has passed, cancelled or not.
    ///
    /// Registered and promoted participations become absent. Socials are
    /// processed concurrently, each one under its own lock, and a social is
    /// never finalized twice.
    #[tracing::instrument(skip(self))]
    pub async fn finalize(&self, now: i64) -> courtside_shared::Result<FinalizeReport> {
        let due =
            store::social::due_for_finalize(&self.read_db, now - self.policy.finalize_grace)
                .await?;

        let this = self;
        let results = stream::iter(due)
            .map(move |social_id| async move {
                let id = social_id.as_str();
                let res = retry(&this.policy, move || this.finalize_social(id, now)).await;

                (social_id, res)
            })
            .buffer_unordered(self.policy.finalize_concurrency.max(1))
            .collect::<Vec<_>>()
            .await;

        let mut report = FinalizeReport::default();
        for (social_id, res) in results {
            match res {
                Ok(Some(absences)) => {
                    report.absences += absences;
                    report.finalized.push(social_id);
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::error!(err = %err, %social_id, "failed to finalize social");
                    report.failed.push(social_id);
                }
            }
        }

        report.finalized.sort();
        report.failed.sort();

        if !report.finalized.is_empty() || !report.failed.is_empty() {
            tracing::info!(
                finalized = report.finalized.len(),
                absences = report.absences,
                failed = report.failed.len(),
                "attendance finalized"
            );
        }

        Ok(report)
    }

    /// Returns the number of absences recorded, or `None` if another sweep
    /// already finalized the social.
    async fn finalize_social(
        &self,
        social_id: &str,
        now: i64,
    ) -> courtside_shared::Result<Option<u64>> {
        let _guard = self
            .locks
            .acquire(social_id, self.policy.lock_timeout)
            .await?;
        let mut tx = self.write_db.begin().await?;

        let Some(social) = store::social::find(&mut *tx, social_id).await? else {
            courtside_shared::not_found!("social");
        };

        if social.attendance_finalized {
            return Ok(None);
        }

        let mut absences = 0;

        let unresolved = store::participation::list_by_status(
            &mut tx,
            social_id,
            &[Status::Registered, Status::Promoted],
        )
        .await?;

        for participation in unresolved {
            if !store::participation::transition(
                &mut tx,
                &participation.id,
                participation.status.0,
                Status::Absent,
                now,
            )
            .await?
            {
                continue;
            }

            store::player::record_absent(&mut tx, &participation.player_id).await?;
            absences += 1;
        }

        if !store::social::claim_flag(&mut tx, social_id, Social::AttendanceFinalized, now).await?
        {
            return Ok(None);
        }

        tx.commit().await?;

        Ok(Some(absences))
    }
}
