//! # Mailer
//!
//! Outbound mail seam used by the password reset flow.
//!
//! [`LogMailer`] is the default and writes the reset link to the log, which is
//! enough for local development. Test builds add `RecordingMailer`, which
//! keeps every message in memory so tests can read the token back.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail delivery failed: {0}")]
    Delivery(String),
}

/// A password reset message ready to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetMail {
    pub email: String,
    pub token: String,
    pub link: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_password_reset(&self, mail: PasswordResetMail) -> Result<(), MailError>;
}

/// Writes reset links to the log instead of sending them.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_password_reset(&self, mail: PasswordResetMail) -> Result<(), MailError> {
        info!(email = %mail.email, link = %mail.link, "[MAILER] Password reset link");
        Ok(())
    }
}

/// Keeps sent messages in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: std::sync::Mutex<Vec<PasswordResetMail>>,
    failing: std::sync::atomic::AtomicBool,
}

#[cfg(test)]
impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following delivery fail (`true`) or succeed (`false`).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<PasswordResetMail> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    /// Token of the most recent message to `email`.
    pub fn last_token_for(&self, email: &str) -> Option<String> {
        self.sent()
            .into_iter()
            .rev()
            .find(|mail| mail.email == email)
            .map(|mail| mail.token)
    }
}

#[cfg(test)]
#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_password_reset(&self, mail: PasswordResetMail) -> Result<(), MailError> {
        if self.failing.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(MailError::Delivery("mailbox unavailable".to_string()));
        }
        self.sent
            .lock()
            .map_err(|e| MailError::Delivery(e.to_string()))?
            .push(mail);
        Ok(())
    }
}
