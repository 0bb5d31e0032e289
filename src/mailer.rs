//! Mailer trait and delivery result types.
//!
//! Uses `#[async_trait]` rather than native async traits because the
//! transport is selected at runtime and held as an `Arc<dyn Mailer>`;
//! native async traits are not object-safe. Email sending is I/O-bound,
//! so the per-call boxing is unmeasurable next to network latency.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::email::Email;
use crate::error::MailError;

/// Result of a successful email delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryResult {
    /// Message ID assigned by the transport.
    pub message_id: String,
}

impl DeliveryResult {
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
        }
    }
}

/// Trait for email delivery transports.
///
/// Transports never attempt network I/O for a structurally invalid
/// message: [`MailerExt::validate`] is called at the top of `deliver`
/// and rejects missing fields and `@`-less addresses up front.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a single email. Returns the message ID on success.
    async fn deliver(&self, email: &Email) -> Result<DeliveryResult, MailError>;

    /// Transport name (for logging/debugging).
    fn provider_name(&self) -> &'static str {
        "unknown"
    }
}

/// Extension trait with shared pre-send validation.
pub trait MailerExt: Mailer {
    /// Validate an email before sending.
    fn validate(&self, email: &Email) -> Result<(), MailError> {
        let Some(from) = &email.from else {
            return Err(MailError::MissingField("from"));
        };
        if email.to.is_empty() {
            return Err(MailError::MissingField("to"));
        }
        for addr in std::iter::once(from)
            .chain(&email.to)
            .chain(&email.cc)
            .chain(&email.reply_to)
        {
            if !crate::Address::basic_sanity_check(&addr.email) {
                return Err(MailError::InvalidAddress(format!(
                    "'{}' is not a deliverable address",
                    addr.email
                )));
            }
        }
        Ok(())
    }
}

// Auto-implement MailerExt for all Mailers
impl<T: Mailer + ?Sized> MailerExt for T {}
