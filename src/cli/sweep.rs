use anyhow::Result;
use time::OffsetDateTime;

/// One Finalizer pass, for cron setups without the embedded scheduler.
pub async fn finalize(config: courtside::Config) -> Result<()> {
    let pool = courtside::create_pool(&config.database.url, 1).await?;
    let command = super::command(&config, pool.clone(), pool.clone())?;

    let report = command
        .finalize(OffsetDateTime::now_utc().unix_timestamp())
        .await?;

    tracing::info!(
        finalized = report.finalized.len(),
        absences = report.absences,
        failed = report.failed.len(),
        "Finalize completed"
    );

    pool.close().await;

    Ok(())
}

/// One reminder and check-in code pass.
pub async fn remind(config: courtside::Config) -> Result<()> {
    let pool = courtside::create_pool(&config.database.url, 1).await?;
    let command = super::command(&config, pool.clone(), pool.clone())?;
    let now = OffsetDateTime::now_utc().unix_timestamp();

    let reminders = command.remind_upcoming(now).await?;
    let codes = command.generate_checkin_codes(now).await?;

    tracing::info!(
        reminded = reminders.processed.len(),
        codes = codes.processed.len(),
        failed = reminders.failed.len() + codes.failed.len(),
        "Reminder sweep completed"
    );

    pool.close().await;

    Ok(())
}
