use time::OffsetDateTime;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::Command;

/// Registers the finalizer and the pre-social sweep (reminders and
/// check-in codes). The caller starts and shuts down the scheduler.
pub async fn scheduler(
    command: &Command,
    finalize_cron: &str,
    sweep_cron: &str,
) -> Result<JobScheduler, JobSchedulerError> {
    let sched = JobScheduler::new().await?;

    let finalize_command = command.clone();
    sched
        .add(Job::new_async(finalize_cron, move |uuid, mut l| {
            let command = finalize_command.clone();

            Box::pin(async move {
                let now = OffsetDateTime::now_utc().unix_timestamp();
                if let Err(err) = command.finalize(now).await {
                    tracing::error!(err = %err, "failed to finalize social attendance");
                }

                if let Err(err) = l.next_tick_for_job(uuid).await {
                    tracing::error!(err = %err, "failed to get next tick for finalize attendance");
                }
            })
        })?)
        .await?;

    let sweep_command = command.clone();
    sched
        .add(Job::new_async(sweep_cron, move |uuid, mut l| {
            let command = sweep_command.clone();

            Box::pin(async move {
                let now = OffsetDateTime::now_utc().unix_timestamp();
                if let Err(err) = command.remind_upcoming(now).await {
                    tracing::error!(err = %err, "failed to send social reminders");
                }

                if let Err(err) = command.generate_checkin_codes(now).await {
                    tracing::error!(err = %err, "failed to generate check-in codes");
                }

                if let Err(err) = l.next_tick_for_job(uuid).await {
                    tracing::error!(err = %err, "failed to get next tick for social sweep");
                }
            })
        })?)
        .await?;

    Ok(sched)
}
