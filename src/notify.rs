use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("no mail-transport credentials configured")]
    MissingCredentials,
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("failed to build notification message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("SMTP relay error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Best-effort send capability. Callers decide whether to await the result;
/// the request path dispatches it on a detached task and only logs failures.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, recipient: &str, link: &str) -> Result<(), NotifyError>;
}

pub struct SmtpNotifier {
    host: String,
    username: Option<String>,
    password: Option<String>,
    from: Option<String>,
}

impl SmtpNotifier {
    pub fn new(
        host: String,
        username: Option<String>,
        password: Option<String>,
        from: Option<String>,
    ) -> Self {
        Self {
            host,
            username,
            password,
            from,
        }
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, recipient: &str, link: &str) -> Result<(), NotifyError> {
        let (Some(username), Some(password)) = (self.username.as_ref(), self.password.as_ref())
        else {
            return Err(NotifyError::MissingCredentials);
        };
        let from = self.from.as_deref().unwrap_or(username);

        let message = Message::builder()
            .from(from.parse::<Mailbox>()?)
            .to(recipient.parse::<Mailbox>()?)
            .subject("Your Event Aggregator ICS File")
            .body(format!(
                "Your events have been processed. You can download your ICS file at: {link}"
            ))?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)?
            .credentials(Credentials::new(username.clone(), password.clone()))
            .build();
        mailer.send(message).await?;
        Ok(())
    }
}
