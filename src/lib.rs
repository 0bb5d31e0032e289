//! # iReserve Mailer
//!
//! Transactional and broadcast email service for the iReserve
//! facility-reservation platform.
//!
//! Three HTTP routes sit on top of one pipeline:
//!
//! 1. **Resolve** - candidate rows come out of the relational store with
//!    addresses that are either plaintext or reversibly encrypted
//!    (`iv:ciphertext` hex, AES-256-CBC). The [`Resolver`] decrypts where
//!    needed, drops candidates that fail to decode or validate, and
//!    deduplicates the rest. A bad candidate never aborts the batch.
//! 2. **Compose** - [`render_notification`] wraps the message fragment
//!    in a fixed, self-contained HTML document.
//! 3. **Dispatch** - the [`Dispatcher`] sends one email per recipient
//!    (or, for reminders, one per booking group) sequentially through the
//!    configured [`Mailer`] transport, recording a per-recipient ledger
//!    and aggregate counts. Transport failures are captured, not raised.
//!
//! ## Configuration
//!
//! Everything is read from the environment once at startup (see
//! [`Config`]) and passed into the components explicitly. The mail
//! transport is chosen with `MAIL_BACKEND` (`smtp`, `local`, `logger`).

mod address;
mod booking;
mod cipher;
mod dispatch;
mod email;
mod error;
mod mailer;
mod recipient;
mod template;

pub mod config;
pub mod http;
pub mod providers;
pub mod store;

// Re-exports
pub use address::Address;
pub use booking::{group_bookings, BookingEntry, BookingGroup, BookingRow};
pub use cipher::AddressCipher;
pub use config::Config;
pub use dispatch::{DispatchOutcome, DispatchReport, DispatchResult, Dispatcher};
pub use email::Email;
pub use error::{CipherError, ConfigError, MailError, StoreError};
pub use mailer::{DeliveryResult, Mailer, MailerExt};
pub use recipient::{RawAddress, RecipientClass, RecipientRecord, ResolvedRecipient, Resolver};
pub use template::{render_direct_message, render_notification, DEFAULT_RECIPIENT_NAME};
