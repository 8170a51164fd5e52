/// Where a notice should be delivered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Channel {
    Email(String),
    Line(String),
}

impl Channel {
    /// Delivery order for a player: LINE first when an account is linked,
    /// then email.
    pub fn candidates(line_uid: Option<&str>, email: Option<&str>) -> Vec<Self> {
        let line = line_uid
            .filter(|uid| !uid.is_empty())
            .map(|uid| Channel::Line(uid.to_owned()));
        let email = email
            .filter(|email| !email.is_empty())
            .map(|email| Channel::Email(email.to_owned()));

        line.into_iter().chain(email).collect()
    }
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, channel: &Channel, subject: &str, body: &str) -> anyhow::Result<()>;
}

pub trait QrCodeGenerator: Send + Sync {
    /// Returns an opaque artifact encoding `url`.
    fn generate(&self, url: &str) -> anyhow::Result<String>;
}
