use std::{
    path::PathBuf,
    str::FromStr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use courtside_db::{Migrate, Plan};
use courtside_shared::{
    Metadata,
    notify::{Channel, Notifier, QrCodeGenerator},
    social::{Role, SkillLevel},
};
use courtside_social::{Command, CreateSocialInput, Policy, Query, Social, SyncPlayerInput};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use ulid::Ulid;

pub const HOUR: i64 = 3600;
pub const NOW: i64 = 1_760_000_000;

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(Channel, String, String)>>,
    fail: AtomicBool,
    fail_line: AtomicBool,
}

#[allow(dead_code)]
impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(Channel, String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, email: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(channel, _, _)| *channel == Channel::Email(email.to_owned()))
            .map(|(_, subject, _)| subject)
            .collect()
    }

    pub fn sent_to_line(&self, uid: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(channel, _, _)| *channel == Channel::Line(uid.to_owned()))
            .map(|(_, subject, _)| subject)
            .collect()
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn fail_line(&self, fail: bool) {
        self.fail_line.store(fail, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, channel: &Channel, subject: &str, body: &str) -> anyhow::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("smtp unavailable");
        }

        if matches!(channel, Channel::Line(_)) && self.fail_line.load(Ordering::SeqCst) {
            anyhow::bail!("line push rejected");
        }

        self.sent
            .lock()
            .unwrap()
            .push((channel.clone(), subject.to_owned(), body.to_owned()));

        Ok(())
    }
}

pub struct StaticQrCode;

impl QrCodeGenerator for StaticQrCode {
    fn generate(&self, url: &str) -> anyhow::Result<String> {
        Ok(format!("qr:{url}"))
    }
}

#[allow(dead_code)]
pub struct TestState {
    pub command: Command,
    pub query: Query,
    pub notifier: Arc<RecordingNotifier>,
    pub pool: SqlitePool,
}

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<TestState> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    let write_db = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts.clone())
        .await?;
    let read_db = SqlitePool::connect_with(opts).await?;

    let mut conn = write_db.acquire().await?;
    courtside_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;
    drop(conn);

    let notifier = Arc::new(RecordingNotifier::default());
    let command = Command::new(
        courtside_shared::State {
            read_db: read_db.clone(),
            write_db,
        },
        notifier.clone(),
        Arc::new(StaticQrCode),
    )
    .with_policy(Policy {
        retry_backoff: Duration::from_millis(1),
        base_url: "https://courtside.localhost".to_owned(),
        ..Default::default()
    });

    Ok(TestState {
        command,
        query: Query(read_db.clone()),
        notifier,
        pool: read_db,
    })
}

#[allow(dead_code)]
pub fn host() -> Metadata {
    Metadata::by(Ulid::new().to_string())
}

#[allow(dead_code)]
pub fn admin() -> Metadata {
    Metadata::admin(Ulid::new().to_string())
}

#[allow(dead_code)]
pub fn female() -> Metadata {
    Metadata::by_with_gender(Ulid::new().to_string(), "female")
}

#[allow(dead_code)]
pub fn male() -> Metadata {
    Metadata::by_with_gender(Ulid::new().to_string(), "male")
}

#[allow(dead_code)]
pub fn player_id(metadata: &Metadata) -> String {
    metadata.trigger_by.clone().unwrap()
}

/// Social starting at `start_at` and lasting two hours.
#[allow(dead_code)]
pub async fn create_social(
    state: &TestState,
    host: &Metadata,
    female_slots: u32,
    male_slots: u32,
    start_at: i64,
) -> anyhow::Result<String> {
    Ok(state
        .command
        .create_social(
            CreateSocialInput {
                venue_id: "court-7".to_owned(),
                start_at,
                end_at: start_at + 2 * HOUR,
                fee: 300,
                skill_level: SkillLevel::B,
                female_slots,
                male_slots,
                note: None,
            },
            host,
            NOW,
        )
        .await?)
}

/// Gives the player an email address so notifications can reach them.
#[allow(dead_code)]
pub async fn sync_email(state: &TestState, metadata: &Metadata, email: &str) -> anyhow::Result<()> {
    sync_contacts(state, metadata, None, email).await
}

#[allow(dead_code)]
pub async fn sync_contacts(
    state: &TestState,
    metadata: &Metadata,
    line_uid: Option<&str>,
    email: &str,
) -> anyhow::Result<()> {
    state
        .command
        .sync_player(
            SyncPlayerInput {
                id: player_id(metadata),
                gender: metadata.gender.clone(),
                name: None,
                email: Some(email.to_owned()),
                line_uid: line_uid.map(str::to_owned),
                role: Role::User,
            },
            NOW,
        )
        .await?;

    Ok(())
}

#[allow(dead_code)]
pub async fn load_social(state: &TestState, id: &str) -> anyhow::Result<Social> {
    Ok(state.query.find_social(id).await?.unwrap().social)
}

#[allow(dead_code)]
pub fn assert_conserved(social: &Social, female_total: i64, male_total: i64) {
    assert_eq!(social.demand_female + social.current_female, female_total);
    assert_eq!(social.demand_male + social.current_male, male_total);
    assert!(social.demand_female >= 0 && social.demand_male >= 0);
}
