use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

use crate::models::message::DispatchMessage;

/// Raw response surfaced by the mail provider.
#[derive(Debug, Clone)]
pub struct SendResponse {
    pub status_code: u16,
    pub body: String,
    pub headers: HashMap<String, String>,
}

/// Abstraction over the outbound mail transport. Object-safe so the
/// dispatcher can hold `Arc<dyn MailSender>`.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, message: &DispatchMessage) -> Result<SendResponse, Error>;
}

const DEFAULT_BASE_URL: &str = "https://api.sendgrid.com";

pub struct SendGridClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl SendGridClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|_| anyhow!("Failed to create HTTP client"))?;

        info!("SendGrid client initialized");

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Serialize)]
struct MailSendRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: EmailAddress<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<EmailAddress<'a>>,
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: Vec<EmailAddress<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    cc: Vec<EmailAddress<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    bcc: Vec<EmailAddress<'a>>,
}

#[derive(Serialize)]
struct EmailAddress<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

fn addresses(emails: &[String]) -> Vec<EmailAddress<'_>> {
    emails.iter().map(|email| EmailAddress { email }).collect()
}

#[async_trait]
impl MailSender for SendGridClient {
    async fn send(&self, message: &DispatchMessage) -> Result<SendResponse, Error> {
        let request = MailSendRequest {
            personalizations: vec![Personalization {
                to: addresses(&message.to),
                cc: addresses(&message.cc),
                bcc: addresses(&message.bcc),
            }],
            from: EmailAddress {
                email: &message.from,
            },
            subject: &message.subject,
            content: vec![Content {
                content_type: "text/html",
                value: &message.html_body,
            }],
            reply_to: message
                .reply_to
                .as_deref()
                .map(|email| EmailAddress { email }),
        };

        debug!(to = ?message.to, subject = %message.subject, "Sending message via SendGrid");

        let response = self
            .http_client
            .post(format!("{}/v3/mail/send", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).to_string(),
                )
            })
            .collect();
        let body = response.text().await?;

        if status.is_success() {
            info!(status_code = status.as_u16(), "Message accepted by SendGrid");
            Ok(SendResponse {
                status_code: status.as_u16(),
                body,
                headers,
            })
        } else {
            Err(anyhow!(
                "SendGrid request failed with status {}: {}",
                status,
                body
            ))
        }
    }
}

/// Captures outbound messages in memory. Swap in for the SendGrid client in
/// tests, or anywhere a real transport is undesirable.
#[derive(Default)]
pub struct FakeMailSender {
    outbox: Mutex<Vec<DispatchMessage>>,
    fail_with: Option<String>,
}

impl FakeMailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender whose every send attempt fails with `reason`. Attempts are
    /// still recorded in the outbox.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            outbox: Mutex::new(Vec::new()),
            fail_with: Some(reason.into()),
        }
    }

    pub fn sent_messages(&self) -> Vec<DispatchMessage> {
        self.outbox.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailSender for FakeMailSender {
    async fn send(&self, message: &DispatchMessage) -> Result<SendResponse, Error> {
        self.outbox.lock().unwrap().push(message.clone());

        if let Some(reason) = &self.fail_with {
            return Err(anyhow!("{}", reason));
        }

        Ok(SendResponse {
            status_code: 202,
            body: String::new(),
            headers: HashMap::new(),
        })
    }
}
