// src/services/mailer.rs

//! Digest delivery over SMTP.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart, SinglePart, header::ContentType};
use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::{AppError, Result};
use crate::models::{Credentials, EmailConfig};

const SERVICE: &str = "smtp";
/// Reply codes servers use for rejected logins.
const AUTH_REJECTION_CODES: &[&str] = &["530", "534", "535"];

/// A fully rendered message ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

impl OutgoingEmail {
    /// Build the MIME message: a text part and an HTML part as alternatives.
    pub fn to_message(&self) -> Result<Message> {
        let from: Mailbox = self
            .from
            .parse()
            .map_err(|e| AppError::config(format!("Invalid sender address: {e}")))?;
        let to: Mailbox = self
            .to
            .parse()
            .map_err(|e| AppError::config(format!("Invalid recipient address: {e}")))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(&self.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(self.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(self.html_body.clone()),
                    ),
            )
            .map_err(|e| AppError::delivery(format!("Failed to build email message: {e}")))
    }
}

/// Something that can deliver a rendered digest.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<()>;
}

/// SMTP mailer authenticating with the sender's credentials.
///
/// Each `send` opens its own connection and closes it before returning,
/// whether delivery succeeded or not.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl SmtpMailer {
    /// Configure the transport. No connection is made until `send`.
    pub fn new(config: &EmailConfig, credentials: &Credentials) -> Result<Self> {
        let creds = SmtpCredentials::new(
            credentials.email_sender.clone(),
            credentials.email_password().to_string(),
        );

        let builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host).map_err(
                |e| AppError::config(format!("Invalid SMTP relay {}: {e}", config.smtp_host)),
            )?
        } else {
            log::warn!("STARTTLS disabled; credentials are sent in clear text");
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
        };

        let transport = builder
            .port(config.smtp_port)
            .credentials(creds)
            .build();

        Ok(Self {
            transport,
            host: format!("{}:{}", config.smtp_host, config.smtp_port),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        let message = email.to_message()?;
        log::debug!("Connecting to SMTP relay {}", self.host);

        self.transport
            .send(message)
            .await
            .map_err(|e| classify_smtp_error(&e))?;

        log::info!("Email sent to {} via {}", email.to, self.host);
        Ok(())
    }
}

fn classify_smtp_error(error: &lettre::transport::smtp::Error) -> AppError {
    let code = error.status().map(|code| code.to_string());
    if code.as_deref().is_some_and(is_auth_rejection) {
        AppError::authentication(SERVICE, error)
    } else {
        AppError::delivery(format!("SMTP send failed: {error}"))
    }
}

fn is_auth_rejection(code: &str) -> bool {
    AUTH_REJECTION_CODES.contains(&code)
}
