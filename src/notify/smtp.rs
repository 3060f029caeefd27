use super::{Notification, Notifier};
use crate::config::EmailSettings;
use crate::error::{ReconcileError, Result};
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// SMTP submission with STARTTLS and login
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    pub fn from_settings(settings: &EmailSettings) -> Result<Self> {
        let from = parse_mailbox("from", &settings.from)?;
        let to = parse_mailbox("to", &settings.to)?;
        let credentials = Credentials::new(settings.smtp_user.clone(), settings.password()?);

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_server)
            .map_err(|e| {
                ReconcileError::notify(format!("invalid SMTP server {}: {e}", settings.smtp_server))
            })?
            .port(settings.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self { transport, from, to })
    }

    fn message(&self, notification: &Notification) -> Result<Message> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(notification.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body.clone())
            .map_err(|e| ReconcileError::notify(format!("failed to build message: {e}")))
    }
}

fn parse_mailbox(field: &str, address: &str) -> Result<Mailbox> {
    address
        .parse()
        .map_err(|e| ReconcileError::notify(format!("invalid {field} address {address:?}: {e}")))
}

#[async_trait]
impl Notifier for SmtpNotifier {
    fn name(&self) -> &str {
        "smtp"
    }

    async fn send(&self, notification: &Notification) -> Result<()> {
        let message = self.message(notification)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| ReconcileError::notify(e.to_string()))?;
        Ok(())
    }
}
