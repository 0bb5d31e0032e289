//! Shared fixtures: an in-memory store stub and a fully wired router.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;

use ireserve_mailer::http::{router, AppState};
use ireserve_mailer::providers::LocalMailer;
use ireserve_mailer::store::RecipientStore;
use ireserve_mailer::{
    Address, AddressCipher, BookingRow, Dispatcher, RawAddress, RecipientClass, RecipientRecord,
    StoreError,
};

pub const KEY: [u8; 32] = *b"0123456789abcdef0123456789abcdef";
pub const IV: [u8; 16] = *b"fedcba9876543210";

pub fn cipher() -> AddressCipher {
    AddressCipher::new(KEY)
}

/// Encrypt an address the way provisioning would store it.
pub fn encoded(email: &str) -> String {
    cipher().encode(email, &IV)
}

/// Store stub serving canned rows, or a database error when `fail` is set.
#[derive(Default)]
pub struct StubStore {
    pub recipients: Vec<RecipientRecord>,
    pub bookings: Vec<BookingRow>,
    pub fail: bool,
}

#[async_trait]
impl RecipientStore for StubStore {
    async fn recipients(
        &self,
        _class: RecipientClass,
    ) -> Result<Vec<RecipientRecord>, StoreError> {
        if self.fail {
            return Err(StoreError::Database("connection refused".into()));
        }
        Ok(self.recipients.clone())
    }

    async fn bookings_in_window(
        &self,
        _from: DateTime<Utc>,
        _until: DateTime<Utc>,
    ) -> Result<Vec<BookingRow>, StoreError> {
        if self.fail {
            return Err(StoreError::Database("connection refused".into()));
        }
        Ok(self.bookings.clone())
    }
}

pub fn record(stored_email: &str, name: &str) -> RecipientRecord {
    RecipientRecord {
        raw: RawAddress::from_stored(stored_email),
        display_name: name.to_string(),
    }
}

pub fn booking(stored_email: &str, name: &str, facility: &str, start: DateTime<Utc>) -> BookingRow {
    BookingRow {
        raw: RawAddress::from_stored(stored_email),
        display_name: name.to_string(),
        facility_name: facility.to_string(),
        start_time: start,
    }
}

/// Wire the router against a stub store and a capturing mailer.
pub fn app(store: StubStore) -> (Router, LocalMailer) {
    let mailer = LocalMailer::new();
    let dispatcher = Dispatcher::new(
        Arc::new(mailer.clone()),
        Address::with_name("iReserve System", "noreply@example.com"),
    );
    let state = Arc::new(AppState {
        store: Arc::new(store),
        dispatcher,
        cipher: cipher(),
    });
    (router(state), mailer)
}

/// POST a JSON body (or an empty body) and decode the JSON response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    let request = match body {
        Some(value) => builder.body(Body::from(value.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}
