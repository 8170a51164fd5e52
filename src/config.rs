use std::{env, time::Duration};

use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use courtside_social::Policy;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub line: LineConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub social: SocialConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Shared secret of the identity provider signing the tokens.
    pub secret: String,
}

/// SMTP delivery. When disabled, notifications are only logged.
#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_username: String,
    #[serde(default)]
    pub smtp_password: String,
    #[serde(default = "default_from_address")]
    pub from_address: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_address: default_from_address(),
        }
    }
}

impl From<&EmailConfig> for courtside_notification::EmailConfig {
    fn from(config: &EmailConfig) -> Self {
        Self {
            smtp_host: config.smtp_host.to_owned(),
            smtp_port: config.smtp_port,
            smtp_username: config.smtp_username.to_owned(),
            smtp_password: config.smtp_password.to_owned(),
            from_address: config.from_address.to_owned(),
        }
    }
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_address() -> String {
    "courtside <noreply@courtside.app>".to_string()
}

/// LINE Messaging API push. Players with a linked LINE account are reached
/// there first, then by email.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LineConfig {
    pub enabled: bool,
    pub channel_access_token: String,
    pub api_base: String,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            channel_access_token: String::new(),
            api_base: "https://api.line.me".to_string(),
        }
    }
}

impl From<&LineConfig> for courtside_notification::LineConfig {
    fn from(config: &LineConfig) -> Self {
        Self {
            channel_access_token: config.channel_access_token.to_owned(),
            api_base: config.api_base.to_owned(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// JSON lines instead of pretty console output.
    #[serde(default)]
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Registration rules. Durations are in minutes unless the name says otherwise.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SocialConfig {
    pub cancellation_cutoff_hours: i64,
    pub checkin_lead_minutes: i64,
    pub checkin_grace_minutes: i64,
    pub finalize_grace_minutes: i64,
    pub reminder_lead_hours: i64,
    pub qr_lead_minutes: i64,
    pub lock_timeout_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub finalize_concurrency: usize,
    pub base_url: String,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            cancellation_cutoff_hours: 12,
            checkin_lead_minutes: 60,
            checkin_grace_minutes: 60,
            finalize_grace_minutes: 60,
            reminder_lead_hours: 24,
            qr_lead_minutes: 60,
            lock_timeout_ms: 5000,
            max_retries: 3,
            retry_backoff_ms: 50,
            finalize_concurrency: 4,
            base_url: "http://localhost:3000".to_string(),
        }
    }
}

impl SocialConfig {
    pub fn policy(&self) -> Policy {
        Policy {
            cancellation_cutoff: self.cancellation_cutoff_hours * 3600,
            checkin_lead: self.checkin_lead_minutes * 60,
            checkin_grace: self.checkin_grace_minutes * 60,
            finalize_grace: self.finalize_grace_minutes * 60,
            reminder_lead: self.reminder_lead_hours * 3600,
            qr_lead: self.qr_lead_minutes * 60,
            lock_timeout: Duration::from_millis(self.lock_timeout_ms),
            max_retries: self.max_retries,
            retry_backoff: Duration::from_millis(self.retry_backoff_ms),
            finalize_concurrency: self.finalize_concurrency,
            base_url: self.base_url.to_owned(),
        }
    }
}

/// Six-field cron expressions (with seconds).
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SchedulerConfig {
    pub enabled: bool,
    pub finalize_cron: String,
    pub sweep_cron: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            finalize_cron: "0 */5 * * * *".to_string(),
            sweep_cron: "0 */10 * * * *".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (COURTSIDE__DATABASE__URL, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "sqlite:courtside.db")?
            .set_default("database.max_connections", 5)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("COURTSIDE")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }
        if let Ok(jwt_secret) = env::var("JWT_SECRET") {
            builder = builder.set_override("jwt.secret", jwt_secret)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.jwt.secret.len() < 32 {
            return Err("JWT secret must be at least 32 characters long".to_string());
        }
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if self.line.enabled && self.line.channel_access_token.is_empty() {
            return Err("LINE channel_access_token must be set when LINE is enabled".to_string());
        }

        let social = &self.social;
        let windows = [
            social.cancellation_cutoff_hours,
            social.checkin_lead_minutes,
            social.checkin_grace_minutes,
            social.finalize_grace_minutes,
            social.reminder_lead_hours,
            social.qr_lead_minutes,
        ];
        if windows.iter().any(|w| *w < 0) {
            return Err("Social windows must not be negative".to_string());
        }
        if social.finalize_grace_minutes < social.checkin_grace_minutes {
            return Err("Finalize grace must cover the check-in grace".to_string());
        }
        if social.max_retries < 1 {
            return Err("Social max_retries must be at least 1".to_string());
        }
        if social.base_url.is_empty() {
            return Err("Social base_url must be set".to_string());
        }

        Ok(())
    }
}
