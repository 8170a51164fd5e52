use std::{future::Future, time::Duration};

/// Time windows and retry tuning for the registration workflows.
///
/// All offsets are in seconds relative to the social start/end.
#[derive(Debug, Clone)]
pub struct Policy {
    /// Participants may cancel until this long before start.
    pub cancellation_cutoff: i64,
    /// Check-in opens this long before start.
    pub checkin_lead: i64,
    /// Check-in stays open this long after end.
    pub checkin_grace: i64,
    /// A social is finalized once this long has passed after end.
    pub finalize_grace: i64,
    /// Reminders go out for socials starting within this horizon.
    pub reminder_lead: i64,
    /// Check-in codes are generated for socials starting within this horizon.
    pub qr_lead: i64,
    pub lock_timeout: Duration,
    pub max_retries: u32,
    pub retry_backoff: Duration,
    pub finalize_concurrency: usize,
    /// Public origin used to build check-in links.
    pub base_url: String,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            cancellation_cutoff: 12 * 3600,
            checkin_lead: 3600,
            checkin_grace: 3600,
            finalize_grace: 3600,
            reminder_lead: 24 * 3600,
            qr_lead: 3600,
            lock_timeout: Duration::from_secs(5),
            max_retries: 3,
            retry_backoff: Duration::from_millis(50),
            finalize_concurrency: 4,
            base_url: "http://localhost:3000".to_owned(),
        }
    }
}

impl Policy {
    pub fn checkin_url(&self, social_id: &str) -> String {
        format!(
            "{}/socials/{social_id}/checkin",
            self.base_url.trim_end_matches('/')
        )
    }
}

/// Runs `op` again when it fails with `Contention`, up to `max_retries` times
/// with a linear backoff. Any other outcome is returned as is.
pub(crate) async fn retry<T, F, Fut>(policy: &Policy, mut op: F) -> courtside_shared::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = courtside_shared::Result<T>>,
{
    let mut attempt = 0;

    loop {
        match op().await {
            Err(err) if err.is_contention() && attempt < policy.max_retries => {
                attempt += 1;
                tracing::warn!(attempt, "contention detected, retrying");
                tokio::time::sleep(policy.retry_backoff * attempt).await;
            }
            res => return res,
        }
    }
}
