//! Logger mailer that only logs emails.
//!
//! Useful for environments where you want to see what would be sent
//! without actually sending anything.

use async_trait::async_trait;

use crate::email::Email;
use crate::error::MailError;
use crate::mailer::{DeliveryResult, Mailer, MailerExt};

/// Mail transport that emits tracing events instead of sending.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggerMailer;

impl LoggerMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for LoggerMailer {
    async fn deliver(&self, email: &Email) -> Result<DeliveryResult, MailError> {
        self.validate(email)?;

        let message_id = uuid::Uuid::new_v4().to_string();
        tracing::info!(
            message_id = %message_id,
            to = ?email.to.iter().map(|a| &a.email).collect::<Vec<_>>(),
            subject = %email.subject,
            "Email logged"
        );

        Ok(DeliveryResult::new(message_id))
    }

    fn provider_name(&self) -> &'static str {
        "logger"
    }
}
