//! Mail transport implementations.
//!
//! Each transport implements the [`Mailer`](crate::Mailer) trait and is
//! selected at startup via `MAIL_BACKEND`:
//!
//! | Transport | Backend | Description |
//! |-----------|---------|-------------|
//! | [`SmtpMailer`] | `smtp` | SMTP via lettre |
//! | [`LocalMailer`] | `local` | In-memory capture for dev/testing |
//! | [`LoggerMailer`] | `logger` | Logs emails without sending |

use std::sync::Arc;

use crate::config::{MailBackend, MailConfig};
use crate::mailer::Mailer;

mod local;
mod logger;
mod smtp;

pub use local::LocalMailer;
pub use logger::LoggerMailer;
pub use smtp::{SmtpBuilder, SmtpMailer, TlsMode};

/// Build the configured mail transport.
pub fn build_mailer(config: &MailConfig) -> Arc<dyn Mailer> {
    match config.backend {
        MailBackend::Smtp => {
            let mut builder =
                SmtpMailer::new(&config.smtp_host, config.smtp_port).tls(config.tls);
            if !config.smtp_username.is_empty() {
                builder = builder.credentials(&config.smtp_username, &config.smtp_password);
            }
            Arc::new(builder.build())
        }
        MailBackend::Local => Arc::new(LocalMailer::new()),
        MailBackend::Logger => Arc::new(LoggerMailer::new()),
    }
}
