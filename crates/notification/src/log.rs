use courtside_shared::notify::{Channel, Notifier};

/// Notifier that only writes to the trace log. Used when SMTP is disabled.
#[derive(Clone, Default)]
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, channel: &Channel, subject: &str, body: &str) -> anyhow::Result<()> {
        tracing::info!(?channel, subject, body, "notification");

        Ok(())
    }
}
