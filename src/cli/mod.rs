mod migrate;
mod server;
mod sweep;

pub use migrate::{migrate, reset};
pub use server::serve;
pub use sweep::{finalize, remind};

use std::sync::Arc;

use courtside_shared::notify::Notifier;

/// Builds the social engine on top of the given pools.
pub(crate) fn command(
    config: &courtside::Config,
    read_db: sqlx::SqlitePool,
    write_db: sqlx::SqlitePool,
) -> anyhow::Result<courtside_social::Command> {
    let notifier: Arc<dyn Notifier> = if config.email.enabled || config.line.enabled {
        let mut dispatcher = courtside_notification::Dispatcher::default();

        if config.email.enabled {
            let email: courtside_notification::EmailConfig = (&config.email).into();
            dispatcher =
                dispatcher.with_email(Arc::new(courtside_notification::EmailService::new(&email)?));
        }

        if config.line.enabled {
            let line: courtside_notification::LineConfig = (&config.line).into();
            dispatcher =
                dispatcher.with_line(Arc::new(courtside_notification::LineService::new(&line)));
        }

        Arc::new(dispatcher)
    } else {
        tracing::info!("Email and LINE disabled, notifications are only logged");
        Arc::new(courtside_notification::LogNotifier)
    };

    let command = courtside_social::Command::new(
        courtside_shared::State { read_db, write_db },
        notifier,
        Arc::new(courtside_notification::SvgQrCode),
    )
    .with_policy(config.social.policy());

    Ok(command)
}
