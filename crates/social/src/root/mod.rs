use std::{ops::Deref, sync::Arc};

use courtside_shared::{
    Metadata,
    notify::{Channel, Notifier, QrCodeGenerator},
};

use crate::{
    lock::EventLocks,
    policy::Policy,
    store::{self, social::SocialRow},
};

mod cancel;
mod check_in;
mod create_social;
mod finalize;
mod override_status;
mod player;
mod promote;
mod qr_code;
mod register;
mod remind;
mod update_social;

pub use cancel::Cancellation;
pub use create_social::CreateSocialInput;
pub use finalize::FinalizeReport;
pub use player::SyncPlayerInput;
pub use promote::Promotion;
pub use qr_code::CheckinCode;
pub use register::{Outcome, Registration};
pub use remind::SweepReport;
pub use update_social::UpdateSocialInput;

#[derive(Clone)]
pub struct Command {
    state: courtside_shared::State,
    locks: EventLocks,
    policy: Policy,
    notifier: Arc<dyn Notifier>,
    qr: Arc<dyn QrCodeGenerator>,
}

impl Deref for Command {
    type Target = courtside_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl Command {
    pub fn new(
        state: courtside_shared::State,
        notifier: Arc<dyn Notifier>,
        qr: Arc<dyn QrCodeGenerator>,
    ) -> Self {
        Self {
            state,
            locks: EventLocks::default(),
            policy: Policy::default(),
            notifier,
            qr,
        }
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub(crate) fn is_host_or_admin(social: &SocialRow, metadata: &Metadata) -> bool {
        metadata.is_admin() || metadata.trigger_by.as_deref() == Some(social.host_id.as_str())
    }

    /// Best effort delivery, failures are only logged.
    pub(crate) async fn notify_player(&self, player_id: &str, subject: &str, body: &str) {
        let player = match store::player::find(&self.read_db, player_id).await {
            Ok(player) => player,
            Err(err) => {
                tracing::error!(err = %err, player_id, "failed to load player for notification");
                return;
            }
        };

        let channels = player
            .as_ref()
            .map(|p| Channel::candidates(p.line_uid.as_deref(), p.email.as_deref()))
            .unwrap_or_default();

        if channels.is_empty() {
            tracing::warn!(player_id, "no notification channel for player");
            return;
        }

        // Falls back to the next channel when delivery fails.
        for channel in channels {
            match self.notifier.send(&channel, subject, body).await {
                Ok(()) => return,
                Err(err) => {
                    tracing::error!(err = %err, player_id, ?channel, "failed to send notification")
                }
            }
        }
    }
}

pub(crate) fn parse_id(value: &str) -> courtside_shared::Result<()> {
    ulid::Ulid::from_string(value)
        .map(|_| ())
        .map_err(|_| courtside_shared::Error::InvalidIdentifier(value.to_owned()))
}
