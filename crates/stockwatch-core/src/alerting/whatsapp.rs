//! WhatsApp notification channel using the Twilio messaging API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info, warn};
use url::Url;

use super::notifier::{DeliveryChannel, NotificationError};
use crate::config::WhatsAppConfig;
use crate::models::AlertMessage;

/// Sends alert bodies as WhatsApp messages, one request per recipient
pub struct WhatsAppChannel {
    config: WhatsAppConfig,
    client: Client,
}

impl WhatsAppChannel {
    /// Create a new WhatsApp channel
    pub fn new(config: WhatsAppConfig) -> Result<Self, NotificationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| NotificationError::Http(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Send `body` to each recipient in order.
    ///
    /// Stops at the first failure; messages already accepted for earlier
    /// recipients stay sent.
    pub async fn send(&self, body: &str, recipients: &[String]) -> bool {
        let (Some(sid), Some(token), Some(from)) = (
            self.config.account_sid.as_deref(),
            self.config.auth_token.as_deref(),
            self.config.from.as_deref(),
        ) else {
            warn!("Twilio configuration missing, WhatsApp message will not be sent");
            return false;
        };
        if recipients.is_empty() {
            warn!("No WhatsApp recipients given, message will not be sent");
            return false;
        }

        match self.send_all(sid, token, from, body, recipients).await {
            Ok(()) => {
                info!(recipients = recipients.len(), "WhatsApp alert sent");
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to send WhatsApp message");
                false
            }
        }
    }

    async fn send_all(
        &self,
        sid: &str,
        token: &str,
        from: &str,
        body: &str,
        recipients: &[String],
    ) -> Result<(), NotificationError> {
        let url = self.messages_url(sid)?;

        for to in recipients {
            let response = self
                .client
                .post(url.clone())
                .basic_auth(sid, Some(token))
                .form(&[("Body", body), ("From", from), ("To", to.as_str())])
                .send()
                .await
                .map_err(|e| NotificationError::Http(e.to_string()))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(NotificationError::Http(format!(
                    "Twilio returned {} for {}: {}",
                    status, to, body
                )));
            }
        }

        Ok(())
    }

    fn messages_url(&self, sid: &str) -> Result<Url, NotificationError> {
        let base = format!("{}/", self.config.api_base.trim_end_matches('/'));
        Url::parse(&base)
            .and_then(|base| base.join(&format!("2010-04-01/Accounts/{sid}/Messages.json")))
            .map_err(|e| NotificationError::Config(format!("Invalid Twilio API base: {e}")))
    }
}

#[async_trait]
impl DeliveryChannel for WhatsAppChannel {
    fn channel_type(&self) -> &'static str {
        "whatsapp"
    }

    async fn deliver(&self, message: &AlertMessage, recipients: &[String]) -> bool {
        self.send(&message.body, recipients).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MESSAGES_PATH: &str = "/2010-04-01/Accounts/AC123/Messages.json";

    fn config(api_base: &str) -> WhatsAppConfig {
        WhatsAppConfig {
            account_sid: Some("AC123".to_string()),
            auth_token: Some("token".to_string()),
            from: Some("whatsapp:+15550000".to_string()),
            api_base: api_base.to_string(),
        }
    }

    fn handles(numbers: &[&str]) -> Vec<String> {
        numbers.iter().map(|n| format!("whatsapp:{n}")).collect()
    }

    #[tokio::test]
    async fn missing_config_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let channel = WhatsAppChannel::new(WhatsAppConfig {
            auth_token: None,
            ..config(&server.uri())
        })
        .unwrap();
        assert!(!channel.send("hello", &handles(&["+15551111"])).await);

        let channel = WhatsAppChannel::new(config(&server.uri())).unwrap();
        assert!(!channel.send("hello", &[]).await);
    }

    #[tokio::test]
    async fn one_request_per_recipient() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MESSAGES_PATH))
            .and(header_exists("authorization"))
            .and(body_string_contains("From=whatsapp%3A%2B15550000"))
            .and(body_string_contains("Body=stock+low"))
            .respond_with(ResponseTemplate::new(201))
            .expect(2)
            .mount(&server)
            .await;

        let channel = WhatsAppChannel::new(config(&server.uri())).unwrap();

        assert!(channel.send("stock low", &handles(&["+15551111", "+15552222"])).await);
    }

    #[tokio::test]
    async fn first_failure_aborts_remaining_sends() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MESSAGES_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
            .expect(1)
            .mount(&server)
            .await;

        let channel = WhatsAppChannel::new(config(&server.uri())).unwrap();

        assert!(!channel.send("hello", &handles(&["+15551111", "+15552222", "+15553333"])).await);
    }

    #[tokio::test]
    async fn deliver_sends_the_body_only() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("Body=only+the+body"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let channel = WhatsAppChannel::new(config(&server.uri())).unwrap();
        let message = AlertMessage {
            subject: "ignored".to_string(),
            body: "only the body".to_string(),
        };

        assert!(channel.deliver(&message, &handles(&["+15551111"])).await);
        assert_eq!(channel.channel_type(), "whatsapp");
    }

    #[test]
    fn messages_url_tolerates_trailing_slash() {
        let channel = WhatsAppChannel::new(config("https://api.twilio.com/")).unwrap();
        assert_eq!(
            channel.messages_url("AC123").unwrap().as_str(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }
}
