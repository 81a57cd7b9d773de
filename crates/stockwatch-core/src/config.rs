//! Configuration management for stockwatch
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables (a `.env` file is honored by the binary). The
//! environment layer goes through [`Config::apply_lookup`] so tests can feed
//! any key/value source without touching the process environment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Alert rule thresholds
    pub alerting: AlertThresholds,

    /// SMTP delivery configuration
    pub smtp: SmtpConfig,

    /// WhatsApp (Twilio) delivery configuration
    pub whatsapp: WhatsAppConfig,

    /// Alert recipients per channel
    pub recipients: RecipientsConfig,

    /// Sales report configuration
    pub report: ReportConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Thresholds for the two inventory rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// Alert when a product expires within this many days
    pub expiration_days: i64,
    /// Alert when a product has been idle for at least this many days
    pub idle_days: i64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            expiration_days: 30,
            idle_days: 90,
        }
    }
}

/// SMTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    /// Mail relay host; delivery is disabled when unset
    pub host: Option<String>,
    /// Mail relay port
    pub port: u16,
    /// Login user
    pub username: Option<String>,
    /// Login secret
    pub password: Option<String>,
    /// Sender address override
    pub from: Option<String>,
    /// Skip STARTTLS and login entirely
    pub no_auth: bool,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: 587,
            username: None,
            password: None,
            from: None,
            no_auth: false,
        }
    }
}

/// Twilio WhatsApp configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatsAppConfig {
    /// Twilio account SID
    pub account_sid: Option<String>,
    /// Twilio auth token
    pub auth_token: Option<String>,
    /// Originating handle, e.g. `whatsapp:+14155238886`
    pub from: Option<String>,
    /// Base URL of the Twilio REST API
    pub api_base: String,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            account_sid: None,
            auth_token: None,
            from: None,
            api_base: "https://api.twilio.com".to_string(),
        }
    }
}

/// Alert recipients
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipientsConfig {
    /// Email recipients
    pub emails: Vec<String>,
    /// WhatsApp recipients
    pub whatsapp: Vec<String>,
}

/// Sales report configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Transactions CSV
    pub transactions_path: PathBuf,
    /// Inventory CSV
    pub inventory_path: PathBuf,
    /// Directory for the chart image
    pub output_dir: PathBuf,
    /// Chart file name
    pub chart_name: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            transactions_path: PathBuf::from("transactions.csv"),
            inventory_path: PathBuf::from("inventory.csv"),
            output_dir: PathBuf::from("images"),
            chart_name: "monthly_sales.svg".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (json or pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, an optional TOML file and the
    /// process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`], reading overrides from `lookup` instead of
    /// the process environment.
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Config::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let mut cfg: Config = builder.build()?.try_deserialize()?;
        cfg.apply_lookup(lookup)?;
        Ok(cfg)
    }

    /// Build a configuration from defaults plus the given key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();
        cfg.apply_lookup(lookup)?;
        Ok(cfg)
    }

    /// Override settings from environment-style keys.
    ///
    /// Blank values count as unset.
    pub fn apply_lookup<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = get("ALERT_EXPIRATION_DAYS") {
            self.alerting.expiration_days = parse_number("ALERT_EXPIRATION_DAYS", &v)?;
        }
        if let Some(v) = get("ALERT_IDLE_DAYS") {
            self.alerting.idle_days = parse_number("ALERT_IDLE_DAYS", &v)?;
        }

        if let Some(v) = get("SMTP_HOST") {
            self.smtp.host = Some(v);
        }
        if let Some(v) = get("SMTP_PORT") {
            self.smtp.port = parse_number("SMTP_PORT", &v)?;
        }
        if let Some(v) = get("SMTP_USER") {
            self.smtp.username = Some(v);
        }
        if let Some(v) = get("SMTP_PASS") {
            self.smtp.password = Some(v);
        }
        if let Some(v) = get("SMTP_FROM") {
            self.smtp.from = Some(v);
        }
        if let Some(v) = get("SMTP_NO_AUTH") {
            self.smtp.no_auth = is_truthy(&v);
        }

        if let Some(v) = get("TWILIO_ACCOUNT_SID") {
            self.whatsapp.account_sid = Some(v);
        }
        if let Some(v) = get("TWILIO_AUTH_TOKEN") {
            self.whatsapp.auth_token = Some(v);
        }
        if let Some(v) = get("TWILIO_WHATSAPP_FROM") {
            self.whatsapp.from = Some(v);
        }
        if let Some(v) = get("TWILIO_API_BASE") {
            self.whatsapp.api_base = v;
        }

        if let Some(v) = get("ALERT_EMAILS") {
            self.recipients.emails = split_list(&v);
        }
        if let Some(v) = get("ALERT_WHATSAPP_TO") {
            self.recipients.whatsapp = split_list(&v);
        }

        if let Some(v) = get("STOCKWATCH_LOG_FORMAT") {
            self.logging.format = v;
        }
        if let Some(v) = get("STOCKWATCH_LOG_LEVEL") {
            self.logging.level = v;
        }

        Ok(())
    }
}

/// Recognized truthy values: `1`, `true`, `yes`, `on` (case-insensitive).
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Split a comma-separated list, trimming entries and dropping blanks.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::config(format!("{key} must be a number, got '{value}'")))
}
