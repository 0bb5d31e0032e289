//! Best-effort batch dispatch with a per-recipient result ledger.
//!
//! Sends are strictly sequential within one request. A transport failure
//! is captured into that recipient's ledger entry and never aborts the
//! remaining batch; the ledger entries are immutable once recorded.

use std::sync::Arc;

use serde::Serialize;

use crate::address::Address;
use crate::booking::BookingGroup;
use crate::email::Email;
use crate::error::MailError;
use crate::mailer::{DeliveryResult, Mailer};
use crate::recipient::ResolvedRecipient;
use crate::template;

/// Outcome of one attempted send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DispatchOutcome {
    Success,
    Failed,
}

/// One ledger entry per attempted send.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResult {
    pub recipient: String,
    pub outcome: DispatchOutcome,
    /// Transport error text for failed sends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// The ledger for a whole batch.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub results: Vec<DispatchResult>,
}

impl DispatchReport {
    /// Number of successful sends.
    pub fn sent(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome == DispatchOutcome::Success)
            .count()
    }

    /// Number of attempted sends.
    pub fn total(&self) -> usize {
        self.results.len()
    }
}

/// Drives a resolved recipient set through the mail transport.
///
/// Holds the transport and the configured sender address; both are
/// handed in at construction rather than read from ambient state.
pub struct Dispatcher {
    mailer: Arc<dyn Mailer>,
    from: Address,
}

impl Dispatcher {
    pub fn new(mailer: Arc<dyn Mailer>, from: Address) -> Self {
        Self { mailer, from }
    }

    /// Send one message directly to one explicit recipient.
    pub async fn send_direct(
        &self,
        to: Address,
        subject: &str,
        html_body: String,
        reply_to: Option<Address>,
        cc: Vec<Address>,
    ) -> Result<DeliveryResult, MailError> {
        let mut email = Email::new()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .html_body(html_body)
            .put_cc(cc);
        if let Some(reply_to) = reply_to {
            email = email.reply_to(reply_to);
        }

        self.mailer.deliver(&email).await
    }

    /// Flat broadcast: one message fragment, rendered and sent to each
    /// recipient in resolver order with the default display name.
    ///
    /// An empty recipient set returns an empty report without touching
    /// the transport.
    pub async fn broadcast(
        &self,
        recipients: &[ResolvedRecipient],
        subject: &str,
        fragment: &str,
    ) -> DispatchReport {
        let span = tracing::info_span!(
            "broadcast",
            provider = self.mailer.provider_name(),
            recipients = recipients.len(),
            subject = %subject,
        );
        let _guard = span.enter();

        let mut report = DispatchReport::default();
        for recipient in recipients {
            let html = template::render_notification(fragment, None);
            let email = Email::new()
                .from(self.from.clone())
                .to(Address::new(&recipient.email))
                .subject(subject)
                .html_body(html);
            report.results.push(self.send_one(email, &recipient.email).await);
        }
        report
    }

    /// Grouped reminders: one email per group, its subject reflecting the
    /// booking count and its body itemizing each booking in group order.
    pub async fn remind(&self, groups: &[BookingGroup]) -> DispatchReport {
        let span = tracing::info_span!(
            "remind",
            provider = self.mailer.provider_name(),
            recipients = groups.len(),
        );
        let _guard = span.enter();

        let mut report = DispatchReport::default();
        for group in groups {
            let count = group.bookings.len();
            let subject = if count == 1 {
                "Reminder: you have 1 upcoming booking".to_string()
            } else {
                format!("Reminder: you have {} upcoming bookings", count)
            };

            let mut items = String::new();
            for booking in &group.bookings {
                items.push_str(&format!(
                    "<li>{} on {}</li>",
                    booking.facility_name,
                    booking.start_time.format("%A, %B %e, %Y at %H:%M")
                ));
            }
            let fragment = format!(
                "<p>You have the following bookings in the next 24 hours:</p><ul>{}</ul>",
                items
            );

            let html = template::render_notification(&fragment, Some(&group.display_name));
            let email = Email::new()
                .from(self.from.clone())
                .to(Address::with_name(&group.display_name, &group.email))
                .subject(subject)
                .html_body(html);
            report.results.push(self.send_one(email, &group.email).await);
        }
        report
    }

    /// Attempt one send and fold the transport's answer into a ledger entry.
    async fn send_one(&self, email: Email, recipient: &str) -> DispatchResult {
        match self.mailer.deliver(&email).await {
            Ok(result) => {
                tracing::info!(recipient, message_id = %result.message_id, "Email delivered");
                DispatchResult {
                    recipient: recipient.to_string(),
                    outcome: DispatchOutcome::Success,
                    detail: None,
                }
            }
            Err(err) => {
                tracing::error!(recipient, error = %err, "Email delivery failed");
                DispatchResult {
                    recipient: recipient.to_string(),
                    outcome: DispatchOutcome::Failed,
                    detail: Some(err.to_string()),
                }
            }
        }
    }
}
