pub mod templates;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{
    AsyncSendmailTransport, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::{MailTransportConfig, SmtpConfig};

/// A fully addressed notification ready for a mail sender.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMail {
    pub to: String,
    pub from: String,
    pub reply_to: String,
    pub subject: String,
    pub body: String,
}

impl OutgoingMail {
    pub fn to_message(&self) -> Result<Message, String> {
        let reply_to: Mailbox = self
            .reply_to
            .parse()
            .map_err(|e| format!("Invalid reply-to address: {e}"))?;

        Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| format!("Invalid from address: {e}"))?,
            )
            .reply_to(reply_to)
            .to(self.to.parse().map_err(|e| format!("Invalid to address: {e}"))?)
            .subject(self.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(self.body.clone())
            .map_err(|e| format!("Failed to build email: {e}"))
    }
}

/// Result of handing a message to the transport. Failures carry the reason.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryOutcome {
    Sent,
    Failed(String),
}

#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> DeliveryOutcome;
}

pub struct SmtpMailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailSender {
    pub fn new(config: &SmtpConfig, timeout: Duration) -> Result<Self, String> {
        let creds = Credentials::new(config.user.clone(), config.pass.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| format!("SMTP starttls error: {e}"))?
            .port(config.port)
            .credentials(creds)
            .timeout(Some(timeout))
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl MailSender for SmtpMailSender {
    async fn send(&self, mail: &OutgoingMail) -> DeliveryOutcome {
        let message = match mail.to_message() {
            Ok(message) => message,
            Err(e) => return DeliveryOutcome::Failed(e),
        };

        match self.transport.send(message).await {
            Ok(_) => DeliveryOutcome::Sent,
            Err(e) => DeliveryOutcome::Failed(format!("Failed to send email: {e}")),
        }
    }
}

/// Hands messages to the local sendmail binary.
pub struct SendmailMailSender {
    transport: AsyncSendmailTransport<Tokio1Executor>,
}

impl SendmailMailSender {
    pub fn new(command: Option<&str>) -> Self {
        let transport = match command {
            Some(command) => AsyncSendmailTransport::<Tokio1Executor>::new_with_command(command),
            None => AsyncSendmailTransport::<Tokio1Executor>::new(),
        };
        Self { transport }
    }
}

#[async_trait]
impl MailSender for SendmailMailSender {
    async fn send(&self, mail: &OutgoingMail) -> DeliveryOutcome {
        let message = match mail.to_message() {
            Ok(message) => message,
            Err(e) => return DeliveryOutcome::Failed(e),
        };

        match self.transport.send(message).await {
            Ok(()) => DeliveryOutcome::Sent,
            Err(e) => DeliveryOutcome::Failed(format!("sendmail failed: {e}")),
        }
    }
}

/// Build the configured mail sender, if any.
pub fn from_config(
    config: Option<&MailTransportConfig>,
    timeout: Duration,
) -> Result<Option<Arc<dyn MailSender>>, String> {
    let mailer: Arc<dyn MailSender> = match config {
        Some(MailTransportConfig::Smtp(smtp)) => Arc::new(SmtpMailSender::new(smtp, timeout)?),
        Some(MailTransportConfig::Sendmail(command)) => {
            Arc::new(SendmailMailSender::new(command.as_deref()))
        }
        None => return Ok(None),
    };
    Ok(Some(mailer))
}
