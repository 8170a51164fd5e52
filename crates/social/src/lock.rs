use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::sync::{Mutex, OwnedMutexGuard};

// Idle entries are pruned once the registry grows past this size.
const PRUNE_THRESHOLD: usize = 1024;

/// Per-social exclusive sections.
///
/// Every read-then-write of a social's counters or waitlist holds the guard
/// returned by [`EventLocks::acquire`] for the whole transaction. Dropping the
/// guard releases the section on every exit path.
#[derive(Clone, Default)]
pub struct EventLocks(Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>);

impl EventLocks {
    pub async fn acquire(
        &self,
        social_id: &str,
        timeout: Duration,
    ) -> courtside_shared::Result<OwnedMutexGuard<()>> {
        let lock = {
            let mut locks = self.0.lock().await;

            if locks.len() > PRUNE_THRESHOLD {
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }

            locks.entry(social_id.to_owned()).or_default().clone()
        };

        match tokio::time::timeout(timeout, lock.lock_owned()).await {
            Ok(guard) => Ok(guard),
            Err(_) => {
                tracing::warn!(social_id, "timed out waiting for social lock");

                Err(courtside_shared::Error::Contention)
            }
        }
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.0.lock().await.len()
    }
}
