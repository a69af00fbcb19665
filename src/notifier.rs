use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::MonitorConfig;
use crate::models::NotificationEvent;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("mail provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("mail provider rejected message ({status}): {body}")]
    Rejected { status: StatusCode, body: String },
}

#[derive(Debug, Serialize)]
struct MailRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(rename = "type")]
    kind: &'static str,
    value: String,
}

/// Sends transition mails through the SendGrid v3 mail-send API.
///
/// Delivery is attempted once. Callers decide what to do with a failure;
/// the monitor only logs it.
pub struct Notifier {
    client: Client,
    api_url: String,
    api_key: String,
    from_email: String,
    to_email: String,
    endpoint: String,
}

impl Notifier {
    pub fn new(client: Client, config: &MonitorConfig) -> Self {
        Self {
            client,
            api_url: config.sendgrid_api_url.clone(),
            api_key: config.sendgrid_key.clone(),
            from_email: config.from_email.clone(),
            to_email: config.to_email.clone(),
            endpoint: config.check_endpoint.clone(),
        }
    }

    fn request(&self, event: NotificationEvent) -> MailRequest<'_> {
        MailRequest {
            personalizations: vec![Personalization {
                to: vec![Address { email: &self.to_email }],
            }],
            from: Address { email: &self.from_email },
            subject: event.subject(),
            content: vec![Content {
                kind: "text/html",
                value: event.body(&self.endpoint),
            }],
        }
    }

    pub async fn notify(&self, event: NotificationEvent) -> Result<(), NotifyError> {
        info!(to = %self.to_email, subject = event.subject(), "sending mail");

        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&self.request(event))
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        Err(NotifyError::Rejected { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn notifier(api_url: String) -> Notifier {
        let config = MonitorConfig::sample("https://example.com/health", &api_url);
        Notifier::new(Client::new(), &config)
    }

    #[tokio::test]
    async fn entered_alarm_posts_sendgrid_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v3/mail/send")
            .match_header("authorization", "Bearer SG.test-key")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "personalizations": [{"to": [{"email": "ops@example.com"}]}],
                "from": {"email": "monitor@example.com"},
                "subject": "Endpoint is down",
                "content": [{
                    "type": "text/html",
                    "value": "Target in alarm: https://example.com/health"
                }]
            })))
            .with_status(202)
            .expect(1)
            .create_async()
            .await;

        let result = notifier(format!("{}/v3/mail/send", server.url()))
            .notify(NotificationEvent::EnteredAlarm)
            .await;
        assert!(result.is_ok(), "{result:?}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn exited_alarm_uses_recovery_subject() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v3/mail/send")
            .match_body(Matcher::PartialJson(json!({
                "subject": "Endpoint is back online",
                "content": [{"type": "text/html", "value": "Target: https://example.com/health"}]
            })))
            .with_status(202)
            .expect(1)
            .create_async()
            .await;

        notifier(format!("{}/v3/mail/send", server.url()))
            .notify(NotificationEvent::ExitedAlarm)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn provider_error_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v3/mail/send")
            .with_status(500)
            .with_body("upstream exploded")
            .expect(1)
            .create_async()
            .await;

        let err = notifier(format!("{}/v3/mail/send", server.url()))
            .notify(NotificationEvent::EnteredAlarm)
            .await
            .unwrap_err();
        match err {
            NotifyError::Rejected { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "upstream exploded");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_provider_is_transport_error() {
        let err = notifier("http://127.0.0.1:1/v3/mail/send".to_string())
            .notify(NotificationEvent::ExitedAlarm)
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Transport(_)));
    }
}
