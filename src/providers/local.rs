//! Local mailer for development and testing.
//!
//! Captures emails in memory instead of sending them, with query helpers
//! for assertions and per-recipient failure injection for exercising
//! error paths.
//!
//! ```rust,ignore
//! let mailer = LocalMailer::new();
//! mailer.fail_to("flaky@example.com", "connection refused");
//!
//! // ... code under test ...
//!
//! assert!(mailer.sent_to("user@example.com"));
//! assert_eq!(mailer.email_count(), 1);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::email::Email;
use crate::error::MailError;
use crate::mailer::{DeliveryResult, Mailer, MailerExt};

#[derive(Default)]
struct Inner {
    /// Captured emails, in send order.
    emails: RwLock<Vec<Email>>,
    /// If set, every delivery fails with this message.
    fail_all: RwLock<Option<String>>,
    /// Per-recipient failure messages, keyed by lowercased address.
    fail_to: RwLock<HashMap<String, String>>,
}

/// Mail transport that stores emails in memory.
///
/// Clones share the same captured mailbox.
#[derive(Clone, Default)]
pub struct LocalMailer {
    inner: Arc<Inner>,
}

impl LocalMailer {
    /// Create a new local mailer with an empty mailbox.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Failure Simulation
    // =========================================================================

    /// Fail every delivery with the given message.
    pub fn set_failure(&self, message: impl Into<String>) {
        *self.inner.fail_all.write() = Some(message.into());
    }

    /// Fail deliveries addressed to one recipient, leaving others alone.
    pub fn fail_to(&self, email: &str, message: impl Into<String>) {
        self.inner
            .fail_to
            .write()
            .insert(email.to_ascii_lowercase(), message.into());
    }

    /// Clear all failure state.
    pub fn clear_failures(&self) {
        *self.inner.fail_all.write() = None;
        self.inner.fail_to.write().clear();
    }

    // =========================================================================
    // Mailbox Access
    // =========================================================================

    /// All captured emails, in send order.
    pub fn emails(&self) -> Vec<Email> {
        self.inner.emails.read().clone()
    }

    /// The most recently sent email.
    pub fn last_email(&self) -> Option<Email> {
        self.inner.emails.read().last().cloned()
    }

    /// Number of captured emails.
    pub fn email_count(&self) -> usize {
        self.inner.emails.read().len()
    }

    /// Whether any email was captured.
    pub fn has_emails(&self) -> bool {
        self.email_count() > 0
    }

    /// Remove all captured emails.
    pub fn clear(&self) {
        self.inner.emails.write().clear();
    }

    // =========================================================================
    // Query Helpers
    // =========================================================================

    /// Whether an email was sent to the given address.
    pub fn sent_to(&self, email: &str) -> bool {
        self.inner.emails.read().iter().any(|stored| {
            stored
                .to
                .iter()
                .any(|addr| addr.email.eq_ignore_ascii_case(email))
        })
    }

    /// Whether an email with a subject containing `text` was sent.
    pub fn sent_with_subject_containing(&self, text: &str) -> bool {
        self.inner
            .emails
            .read()
            .iter()
            .any(|stored| stored.subject.contains(text))
    }
}

#[async_trait]
impl Mailer for LocalMailer {
    async fn deliver(&self, email: &Email) -> Result<DeliveryResult, MailError> {
        self.validate(email)?;

        if let Some(message) = self.inner.fail_all.read().clone() {
            return Err(MailError::SendError(message));
        }
        {
            let fail_to = self.inner.fail_to.read();
            for addr in &email.to {
                if let Some(message) = fail_to.get(&addr.email.to_ascii_lowercase()) {
                    return Err(MailError::SendError(message.clone()));
                }
            }
        }

        self.inner.emails.write().push(email.clone());
        Ok(DeliveryResult::new(uuid::Uuid::new_v4().to_string()))
    }

    fn provider_name(&self) -> &'static str {
        "local"
    }
}
