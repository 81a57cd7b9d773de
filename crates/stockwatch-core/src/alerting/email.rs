//! Email notification channel using SMTP.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, error, info, warn};

use super::notifier::{DeliveryChannel, NotificationError};
use crate::config::SmtpConfig;
use crate::models::AlertMessage;

const SMTP_TIMEOUT: Duration = Duration::from_secs(10);

/// A fully addressed plain-text email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    /// Sender address
    pub from: String,
    /// Recipient addresses
    pub to: Vec<String>,
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub body: String,
}

/// Hands a message to a mail server
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Make one send attempt
    async fn send(&self, smtp: &SmtpConfig, mail: &OutgoingMail) -> Result<(), NotificationError>;
}

/// SMTP transport backed by `lettre`.
///
/// Authenticated mode upgrades with STARTTLS when the server offers it and
/// carries on in plain text when it does not, then logs in. A server that
/// offers STARTTLS but fails the handshake fails the send. No-auth mode
/// does neither.
#[derive(Debug, Clone, Copy, Default)]
pub struct LettreTransport;

#[async_trait]
impl MailTransport for LettreTransport {
    async fn send(&self, smtp: &SmtpConfig, mail: &OutgoingMail) -> Result<(), NotificationError> {
        let host = smtp
            .host
            .as_deref()
            .ok_or_else(|| NotificationError::Config("SMTP host not configured".to_string()))?;
        let message = build_message(mail)?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(smtp.port)
            .timeout(Some(SMTP_TIMEOUT));

        if !smtp.no_auth {
            let tls = TlsParameters::new(host.to_string())
                .map_err(|e| NotificationError::Transport(format!("TLS setup failed: {e}")))?;
            builder = builder.tls(Tls::Opportunistic(tls));

            if let (Some(user), Some(pass)) = (&smtp.username, &smtp.password) {
                builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
            }
        }

        let transport = builder.build();
        transport
            .send(message)
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        Ok(())
    }
}

fn build_message(mail: &OutgoingMail) -> Result<Message, NotificationError> {
    let parse = |addr: &str| {
        addr.parse::<Mailbox>()
            .map_err(|e| NotificationError::Address(format!("{addr}: {e}")))
    };

    let mut builder = Message::builder()
        .from(parse(&mail.from)?)
        .subject(mail.subject.clone())
        .header(ContentType::TEXT_PLAIN);
    for to in &mail.to {
        builder = builder.to(parse(to)?);
    }

    builder
        .body(mail.body.clone())
        .map_err(|e| NotificationError::Transport(format!("Failed to build email: {e}")))
}

/// Email notification channel
pub struct EmailChannel {
    config: SmtpConfig,
    transport: Arc<dyn MailTransport>,
}

impl EmailChannel {
    /// Create an email channel over SMTP
    pub fn new(config: SmtpConfig) -> Self {
        Self::with_transport(config, Arc::new(LettreTransport))
    }

    /// Create an email channel over a custom transport
    pub fn with_transport(config: SmtpConfig, transport: Arc<dyn MailTransport>) -> Self {
        Self { config, transport }
    }

    /// Send one email to all recipients.
    ///
    /// Returns `false` without contacting the server when the host,
    /// recipients or (outside no-auth mode) credentials are missing.
    pub async fn send(&self, subject: &str, body: &str, recipients: &[String]) -> bool {
        let Some(host) = self.config.host.as_deref() else {
            warn!("SMTP host not configured, email will not be sent");
            return false;
        };
        if recipients.is_empty() {
            warn!("No recipients given, email will not be sent");
            return false;
        }
        if !self.config.no_auth && (self.config.username.is_none() || self.config.password.is_none()) {
            warn!("SMTP credentials missing and no-auth mode is off, email will not be sent");
            return false;
        }

        let mail = OutgoingMail {
            from: self.sender(host),
            to: recipients.to_vec(),
            subject: subject.to_string(),
            body: body.to_string(),
        };

        debug!(
            host,
            port = self.config.port,
            no_auth = self.config.no_auth,
            recipients = mail.to.len(),
            "Sending alert email"
        );

        match self.transport.send(&self.config, &mail).await {
            Ok(()) => {
                info!(recipients = ?mail.to, "Alert email sent");
                true
            }
            Err(e) => {
                error!(error = %e, host, "Failed to send email");
                false
            }
        }
    }

    fn sender(&self, host: &str) -> String {
        self.config
            .from
            .clone()
            .or_else(|| self.config.username.clone())
            .unwrap_or_else(|| format!("stockwatch@{host}"))
    }
}

#[async_trait]
impl DeliveryChannel for EmailChannel {
    fn channel_type(&self) -> &'static str {
        "email"
    }

    async fn deliver(&self, message: &AlertMessage, recipients: &[String]) -> bool {
        self.send(&message.subject, &message.body, recipients).await
    }
}
