use std::sync::Arc;

use courtside_shared::notify::{Channel, Notifier};

/// Routes each channel to the service that can deliver it.
///
/// A channel without a configured service is an error, which lets the caller
/// fall back to the player's next channel.
#[derive(Clone, Default)]
pub struct Dispatcher {
    email: Option<Arc<dyn Notifier>>,
    line: Option<Arc<dyn Notifier>>,
}

impl Dispatcher {
    pub fn with_email(mut self, email: Arc<dyn Notifier>) -> Self {
        self.email = Some(email);
        self
    }

    pub fn with_line(mut self, line: Arc<dyn Notifier>) -> Self {
        self.line = Some(line);
        self
    }
}

#[async_trait::async_trait]
impl Notifier for Dispatcher {
    async fn send(&self, channel: &Channel, subject: &str, body: &str) -> anyhow::Result<()> {
        let service = match channel {
            Channel::Email(_) => self.email.as_ref(),
            Channel::Line(_) => self.line.as_ref(),
        };

        let Some(service) = service else {
            anyhow::bail!("no service configured for {channel:?}");
        };

        service.send(channel, subject, body).await
    }
}
