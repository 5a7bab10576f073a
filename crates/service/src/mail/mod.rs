//! Outgoing mail: the verification message and the transports that send it.

pub mod smtp;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use smtp::SmtpMailer;

pub const VERIFICATION_SUBJECT: &str = "The Bee Store Account verification email";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address: {0}")]
    Address(String),
    #[error("message build failed: {0}")]
    Build(String),
    #[error("transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

/// Writes the message to the log instead of sending it. Used when no SMTP
/// credentials are configured.
#[derive(Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        tracing::info!(to = %mail.to, subject = %mail.subject, body_len = mail.html.len(), "mail_not_sent_no_smtp_credentials");
        tracing::debug!(body = %mail.html, "mail_body");
        Ok(())
    }
}

/// SMTP when credentials are present, otherwise the log sink.
pub fn from_config(cfg: &configs::MailConfig) -> Result<Arc<dyn Mailer>, MailError> {
    if cfg.has_credentials() {
        Ok(Arc::new(SmtpMailer::new(cfg)?))
    } else {
        tracing::warn!("MAIL_USERNAME/MAIL_PASSWORD unset; verification mail will only be logged");
        Ok(Arc::new(LogMailer))
    }
}

pub fn verification_link(base_url: &str, token: &str) -> String {
    format!("{}/verification?token={}", base_url.trim_end_matches('/'), token)
}

pub fn verification_email(to: &str, link: &str) -> OutgoingMail {
    let html = format!(
        r#"<!DOCTYPE html>
<html>
  <head></head>
  <body>
    <div style="display: flex; align-items: center; justify-content: center; flex-direction: column">
      <h3>Account Verification</h3>
      <br>
      <p>Thanks for choosing The Bee Store, please click on the button below to verify your account</p>
      <a style="margin-top: 1rem; padding: 1rem; border-radius: 0.5rem; font-size: 1rem; text-decoration: none; background: #0275d8; color: white;" href="{link}">Verify your email</a>
      <p>Please kindly ignore this email if you did not register for The Bee Store and nothing will happen. Thanks</p>
    </div>
  </body>
</html>"#
    );
    OutgoingMail { to: to.to_string(), subject: VERIFICATION_SUBJECT.to_string(), html }
}
