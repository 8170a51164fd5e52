//! LINE Messaging API push notifications

use courtside_shared::notify::{Channel, Notifier};
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Clone)]
pub struct LineConfig {
    pub channel_access_token: String,
    /// Messaging API origin, overridable for tests.
    pub api_base: String,
}

#[derive(Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: [TextMessage; 1],
}

#[derive(Serialize)]
struct TextMessage {
    #[serde(rename = "type")]
    kind: &'static str,
    text: String,
}

/// Sends text push messages to players who linked their LINE account.
#[derive(Clone)]
pub struct LineService {
    client: Client,
    endpoint: String,
    token: String,
}

impl LineService {
    pub fn new(config: &LineConfig) -> Self {
        tracing::info!(api_base = %config.api_base, "LINE push service initialized");

        Self {
            client: Client::new(),
            endpoint: format!(
                "{}/v2/bot/message/push",
                config.api_base.trim_end_matches('/')
            ),
            token: config.channel_access_token.clone(),
        }
    }

    #[tracing::instrument(skip(self, text))]
    pub async fn push_text(&self, to: &str, text: String) -> anyhow::Result<()> {
        let request = PushRequest {
            to,
            messages: [TextMessage { kind: "text", text }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("LINE push to {to} failed with {status}: {body}");
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl Notifier for LineService {
    async fn send(&self, channel: &Channel, subject: &str, body: &str) -> anyhow::Result<()> {
        match channel {
            Channel::Line(uid) => self.push_text(uid, format!("{subject}\n\n{body}")).await,
            Channel::Email(to) => {
                anyhow::bail!("LINE service cannot deliver to email address {to}")
            }
        }
    }
}
