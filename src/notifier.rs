use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::config::SmtpConfig;

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Delivery timed out after {0:?}")]
    Timeout(Duration),
}

/// Delivery collaborator for customer-facing messages.
///
/// Implementations must be thread-safe; the app state holds one behind
/// `Arc<dyn Notifier>` so tests can substitute [`MemoryNotifier`].
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifierError>;
}

/// SMTP notifier backed by lettre. Every send is bounded by the configured
/// timeout; a timed-out send surfaces as [`NotifierError::Timeout`].
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    timeout: Duration,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> Result<Self, NotifierError> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            timeout: config.timeout,
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifierError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| NotifierError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| NotifierError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        match tokio::time::timeout(self.timeout, self.mailer.send(email)).await {
            Ok(result) => {
                result?;
                tracing::info!(to = %to, subject = %subject, "notification sent");
                Ok(())
            }
            Err(_) => Err(NotifierError::Timeout(self.timeout)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// In-memory notifier for testing.
///
/// Records every delivered message and can be switched into a failing mode
/// to exercise rollback paths.
#[derive(Clone, Default)]
pub struct MemoryNotifier {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages delivered so far, in send order.
    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    /// When set, every subsequent send fails without recording anything.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifierError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifierError::Delivery("memory notifier set to fail".into()));
        }
        self.sent.lock().await.push(SentMessage {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_notifier_records_sends() {
        let notifier = MemoryNotifier::new();
        notifier
            .send("a@example.com", "Hello", "body")
            .await
            .unwrap();

        let sent = notifier.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@example.com");
        assert_eq!(sent[0].subject, "Hello");
    }

    #[tokio::test]
    async fn memory_notifier_failing_mode_records_nothing() {
        let notifier = MemoryNotifier::new();
        notifier.set_failing(true);

        let result = notifier.send("a@example.com", "Hello", "body").await;
        assert!(matches!(result, Err(NotifierError::Delivery(_))));
        assert!(notifier.sent().await.is_empty());

        notifier.set_failing(false);
        notifier
            .send("a@example.com", "Hello", "body")
            .await
            .unwrap();
        assert_eq!(notifier.sent().await.len(), 1);
    }
}
