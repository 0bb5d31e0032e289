//! Grouping of upcoming bookings into one reminder per recipient.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::recipient::{RawAddress, Resolver};

/// One row of the reminder join: a booking with its facility and the
/// (possibly encrypted) address of the person who booked it.
#[derive(Debug, Clone)]
pub struct BookingRow {
    pub raw: RawAddress,
    pub display_name: String,
    pub facility_name: String,
    pub start_time: DateTime<Utc>,
}

/// A single booking line inside a reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingEntry {
    pub facility_name: String,
    pub start_time: DateTime<Utc>,
}

/// All upcoming bookings for one deliverable recipient.
///
/// Exactly one reminder email is sent per group, no matter how many
/// bookings it holds.
#[derive(Debug, Clone)]
pub struct BookingGroup {
    pub email: String,
    pub display_name: String,
    pub bookings: Vec<BookingEntry>,
}

/// Group booking rows by recipient.
///
/// Each row's address goes through the resolver's decode-or-skip policy;
/// rows whose address cannot be decoded are dropped without affecting the
/// rest. Groups appear in first-seen order and bookings keep the row
/// order, so the store's `ORDER BY email, start_time` carries through.
pub fn group_bookings(resolver: &Resolver<'_>, rows: Vec<BookingRow>) -> Vec<BookingGroup> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<BookingGroup> = Vec::new();

    for row in rows {
        let Some(email) = resolver.decode_deliverable(&row.raw) else {
            continue;
        };
        let key = email.to_ascii_lowercase();
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                groups.push(BookingGroup {
                    email,
                    display_name: row.display_name.clone(),
                    bookings: Vec::new(),
                });
                index.insert(key, groups.len() - 1);
                groups.len() - 1
            }
        };
        groups[slot].bookings.push(BookingEntry {
            facility_name: row.facility_name,
            start_time: row.start_time,
        });
    }

    groups
}
