use std::env;

use chrono::Duration;
use chrono::Utc;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::domain::session::models::SessionSettings;

/// Platform name that unlocks destructive dev tooling.
pub const DEV_PLATFORM: &str = "dev";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_platform")]
    pub platform: String,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub webhook: WebhookConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Upper bound for any single store call.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_ttl_seconds")]
    pub access_token_ttl_seconds: i64,
    #[serde(default = "default_refresh_token_ttl_days")]
    pub refresh_token_ttl_days: i64,
    /// Clock skew tolerated past an access token's `exp`.
    #[serde(default)]
    pub leeway_seconds: u64,
}

#[derive(Deserialize, Clone)]
pub struct WebhookConfig {
    pub api_key: String,
}

// Secrets stay out of logs even when the whole config is debug-printed.
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field("refresh_token_ttl_days", &self.refresh_token_ttl_days)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl std::fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

fn default_platform() -> String {
    "production".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_timeout_seconds() -> u64 {
    5
}

fn default_access_token_ttl_seconds() -> i64 {
    60 * 60
}

fn default_refresh_token_ttl_days() -> i64 {
    60
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, WEBHOOK__API_KEY, DATABASE__URL, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// Fails when the signing secret or webhook key is missing or blank.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        config.validate()
    }

    /// Reject values that would make the services unsafe to start.
    ///
    /// TTLs must also fit in a `chrono::Duration`, so a validated config
    /// always yields [`SessionSettings`].
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".into()));
        }
        if self.webhook.api_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "webhook.api_key must not be empty".into(),
            ));
        }
        if self.jwt.access_token_ttl_seconds <= 0 {
            return Err(ConfigError::Message(
                "jwt.access_token_ttl_seconds must be positive".into(),
            ));
        }
        if self.jwt.refresh_token_ttl_days <= 0 {
            return Err(ConfigError::Message(
                "jwt.refresh_token_ttl_days must be positive".into(),
            ));
        }
        if self.database.timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "database.timeout_seconds must be positive".into(),
            ));
        }
        self.session_settings()?;

        Ok(self)
    }

    pub fn is_dev_platform(&self) -> bool {
        self.platform == DEV_PLATFORM
    }

    /// Immutable settings handed to the session services.
    pub fn session_settings(&self) -> Result<SessionSettings, ConfigError> {
        let access_token_ttl = lifetime(
            "jwt.access_token_ttl_seconds",
            Duration::try_seconds(self.jwt.access_token_ttl_seconds),
        )?;
        let refresh_token_ttl = lifetime(
            "jwt.refresh_token_ttl_days",
            Duration::try_days(self.jwt.refresh_token_ttl_days),
        )?;
        lifetime(
            "jwt.leeway_seconds",
            i64::try_from(self.jwt.leeway_seconds)
                .ok()
                .and_then(Duration::try_seconds),
        )?;

        Ok(SessionSettings {
            jwt_secret: self.jwt.secret.clone(),
            access_token_ttl,
            refresh_token_ttl,
            leeway_seconds: self.jwt.leeway_seconds,
            store_timeout: std::time::Duration::from_secs(self.database.timeout_seconds),
            webhook_api_key: self.webhook.api_key.clone(),
        })
    }
}

// Token expiry is computed as `now + lifetime`; that sum has to stay representable.
fn lifetime(key: &str, duration: Option<Duration>) -> Result<Duration, ConfigError> {
    duration
        .filter(|d| Utc::now().checked_add_signed(*d).is_some())
        .ok_or_else(|| ConfigError::Message(format!("{} is out of range", key)))
}
