//! Recipient and booking queries against the relational store.
//!
//! The three broadcast query shapes are fixed; callers select one via
//! [`RecipientClass`] and cannot parameterize them further. Address
//! fields come back as stored (plaintext or encrypted token) and are
//! tagged into [`RawAddress`] here, at ingestion.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::booking::BookingRow;
use crate::error::StoreError;
use crate::recipient::{RawAddress, RecipientClass, RecipientRecord};

/// Read access to the recipient tables.
///
/// Any failure here is fatal for the whole resolve step; per-candidate
/// problems are the resolver's business, not the store's.
#[async_trait]
pub trait RecipientStore: Send + Sync {
    /// Candidate recipients for a broadcast class.
    async fn recipients(&self, class: RecipientClass)
        -> Result<Vec<RecipientRecord>, StoreError>;

    /// Booking rows with a start time in `[from, until)`, ordered by
    /// recipient email then start time.
    async fn bookings_in_window(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<BookingRow>, StoreError>;
}

const ALL_QUERY: &str = "\
    SELECT r.email, r.full_name FROM residents r \
    JOIN users u ON r.user_id = u.user_id WHERE u.status = 'active' \
    UNION \
    SELECT s.email, s.full_name FROM staff s \
    JOIN users u ON s.user_id = u.user_id WHERE u.status = 'active'";

const RESIDENTS_QUERY: &str = "\
    SELECT r.email, r.full_name FROM residents r \
    JOIN users u ON r.user_id = u.user_id \
    WHERE u.status = 'active' AND u.user_type = 'resident'";

const STAFF_QUERY: &str = "\
    SELECT s.email, s.full_name FROM staff s \
    JOIN users u ON s.user_id = u.user_id \
    WHERE u.status = 'active' AND u.user_type = 'staff'";

// The window is compared on full timestamps, so bookings on the far side
// of a midnight boundary are still selected.
const BOOKINGS_QUERY: &str = "\
    SELECT r.email, r.full_name, f.name AS facility_name, b.start_time \
    FROM bookings b \
    JOIN facilities f ON f.facility_id = b.facility_id \
    JOIN residents r ON r.user_id = b.user_id \
    JOIN users u ON u.user_id = r.user_id \
    WHERE u.status = 'active' AND b.start_time >= $1 AND b.start_time < $2 \
    ORDER BY r.email, b.start_time";

/// PostgreSQL-backed [`RecipientStore`].
#[derive(Debug, Clone)]
pub struct PostgresRecipientStore {
    pool: PgPool,
}

impl PostgresRecipientStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipientStore for PostgresRecipientStore {
    async fn recipients(
        &self,
        class: RecipientClass,
    ) -> Result<Vec<RecipientRecord>, StoreError> {
        let query = match class {
            RecipientClass::All => ALL_QUERY,
            RecipientClass::Residents => RESIDENTS_QUERY,
            RecipientClass::Staff => STAFF_QUERY,
        };

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(|row| {
                let email: String = row.try_get("email")?;
                let full_name: String = row.try_get("full_name")?;
                Ok(RecipientRecord {
                    raw: RawAddress::from_stored(email),
                    display_name: full_name,
                })
            })
            .collect()
    }

    async fn bookings_in_window(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<BookingRow>, StoreError> {
        let rows = sqlx::query(BOOKINGS_QUERY)
            .bind(from)
            .bind(until)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                let email: String = row.try_get("email")?;
                Ok(BookingRow {
                    raw: RawAddress::from_stored(email),
                    display_name: row.try_get("full_name")?,
                    facility_name: row.try_get("facility_name")?,
                    start_time: row.try_get("start_time")?,
                })
            })
            .collect()
    }
}
