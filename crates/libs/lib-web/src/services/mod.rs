//! # Services Layer
//!
//! Integrations that handlers reach through a trait so tests can swap them.
//!
//! - [`mailer`] - outbound mail for password reset links

pub mod mailer;

pub use mailer::{LogMailer, MailError, Mailer, PasswordResetMail};

#[cfg(test)]
pub use mailer::RecordingMailer;
