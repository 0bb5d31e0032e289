//! Recipient resolution: decrypt-or-pass-through, validate, deduplicate.

use std::collections::HashSet;

use serde::Deserialize;

use crate::cipher::AddressCipher;
use crate::error::CipherError;

/// Which stored population a broadcast goes to.
///
/// Each variant selects one of the fixed query shapes in the store;
/// callers cannot parameterize the selection beyond these three values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecipientClass {
    /// Active residents and active staff, deduplicated.
    All,
    /// Active users whose role is resident.
    Residents,
    /// Active users whose role is staff.
    Staff,
}

/// A stored address field as it came out of the database.
///
/// Decided once at ingestion: plaintext addresses contain `@`, encrypted
/// tokens never do. Downstream code matches on the variant instead of
/// re-checking the string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawAddress {
    /// Already-plaintext address.
    Plain(String),
    /// An `iv:ciphertext` hex token (see [`AddressCipher`]).
    Encoded(String),
}

impl RawAddress {
    /// Tag a stored address field.
    pub fn from_stored(field: impl Into<String>) -> Self {
        let field = field.into();
        if field.contains('@') {
            Self::Plain(field)
        } else {
            Self::Encoded(field)
        }
    }
}

/// A candidate row from the recipient tables.
#[derive(Debug, Clone)]
pub struct RecipientRecord {
    pub raw: RawAddress,
    pub display_name: String,
}

/// A validated, deliverable recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRecipient {
    pub email: String,
    pub display_name: String,
}

/// Minimal structural validation: exactly one `@` with non-empty halves.
fn is_deliverable(email: &str) -> bool {
    let mut parts = email.split('@');
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty()
    )
}

/// Resolves candidate rows into deliverable recipients.
///
/// A single bad candidate is never fatal: decode failures and addresses
/// that fail structural validation are logged and dropped, and the rest
/// of the batch resolves normally. Only the storage layer (which produces
/// the candidates in the first place) can fail the whole step.
pub struct Resolver<'a> {
    cipher: &'a AddressCipher,
}

impl<'a> Resolver<'a> {
    pub fn new(cipher: &'a AddressCipher) -> Self {
        Self { cipher }
    }

    /// Decode one candidate address.
    fn decode(&self, raw: &RawAddress) -> Result<String, CipherError> {
        match raw {
            RawAddress::Plain(email) => Ok(email.clone()),
            RawAddress::Encoded(token) => self.cipher.decode(token),
        }
    }

    /// Decode one candidate and validate the result, or `None` if it is
    /// undeliverable. This is the skip-on-failure policy shared by the
    /// broadcast and reminder flows.
    pub fn decode_deliverable(&self, raw: &RawAddress) -> Option<String> {
        let email = match self.decode(raw) {
            Ok(email) => email,
            Err(err) => {
                tracing::warn!(error = %err, "Skipping recipient: address token failed to decode");
                return None;
            }
        };
        if !is_deliverable(&email) {
            tracing::debug!("Skipping recipient: decoded address is not structurally valid");
            return None;
        }
        Some(email)
    }

    /// Resolve candidates into a deduplicated list of deliverable
    /// recipients, preserving the candidates' order.
    ///
    /// Duplicates are compared case-insensitively; the first occurrence
    /// wins and keeps its spelling and display name.
    pub fn resolve(&self, candidates: Vec<RecipientRecord>) -> Vec<ResolvedRecipient> {
        let mut seen = HashSet::new();
        let mut resolved = Vec::new();

        for record in candidates {
            let Some(email) = self.decode_deliverable(&record.raw) else {
                continue;
            };
            if seen.insert(email.to_ascii_lowercase()) {
                resolved.push(ResolvedRecipient {
                    email,
                    display_name: record.display_name,
                });
            }
        }

        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IV: [u8; 16] = *b"0000111122223333";

    fn cipher() -> AddressCipher {
        AddressCipher::new(*b"0123456789abcdef0123456789abcdef")
    }

    fn plain(email: &str, name: &str) -> RecipientRecord {
        RecipientRecord {
            raw: RawAddress::Plain(email.to_string()),
            display_name: name.to_string(),
        }
    }

    #[test]
    fn test_tagging_at_ingestion() {
        assert_eq!(
            RawAddress::from_stored("a@a.com"),
            RawAddress::Plain("a@a.com".into())
        );
        assert_eq!(
            RawAddress::from_stored("deadbeef:cafebabe"),
            RawAddress::Encoded("deadbeef:cafebabe".into())
        );
    }

    #[test]
    fn test_plaintext_pass_through_unchanged() {
        let cipher = cipher();
        let resolver = Resolver::new(&cipher);

        let resolved = resolver.resolve(vec![plain("a@a.com", "A"), plain("b@b.com", "B")]);
        let emails: Vec<_> = resolved.iter().map(|r| r.email.as_str()).collect();
        assert_eq!(emails, vec!["a@a.com", "b@b.com"]);
    }

    #[test]
    fn test_encoded_candidate_decodes() {
        let cipher = cipher();
        let resolver = Resolver::new(&cipher);
        let token = cipher.encode("secret@example.com", &IV);

        let resolved = resolver.resolve(vec![RecipientRecord {
            raw: RawAddress::from_stored(token),
            display_name: "Secret".into(),
        }]);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].email, "secret@example.com");
        assert_eq!(resolved[0].display_name, "Secret");
    }

    #[test]
    fn test_decode_failure_skips_candidate_only() {
        let cipher = cipher();
        let resolver = Resolver::new(&cipher);

        let resolved = resolver.resolve(vec![
            plain("a@a.com", "A"),
            RecipientRecord {
                raw: RawAddress::Encoded("iv_hex:ciphertext_hex".into()),
                display_name: "Broken".into(),
            },
            plain("b@b.com", "B"),
        ]);

        // The bad token is absent; the surrounding candidates are unaffected.
        let emails: Vec<_> = resolved.iter().map(|r| r.email.as_str()).collect();
        assert_eq!(emails, vec!["a@a.com", "b@b.com"]);
    }

    #[test]
    fn test_decoded_address_without_at_is_dropped() {
        let cipher = cipher();
        let resolver = Resolver::new(&cipher);
        let token = cipher.encode("not-an-address", &IV);

        let resolved = resolver.resolve(vec![
            RecipientRecord {
                raw: RawAddress::from_stored(token),
                display_name: "Nobody".into(),
            },
            plain("ok@example.com", "Ok"),
        ]);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].email, "ok@example.com");
    }

    #[test]
    fn test_double_at_is_dropped() {
        let cipher = cipher();
        let resolver = Resolver::new(&cipher);

        let resolved = resolver.resolve(vec![plain("a@@b.com", "Odd")]);
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_dedup_is_case_insensitive_first_wins() {
        let cipher = cipher();
        let resolver = Resolver::new(&cipher);

        let resolved = resolver.resolve(vec![
            plain("User@Example.com", "First"),
            plain("user@example.com", "Second"),
        ]);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].email, "User@Example.com");
        assert_eq!(resolved[0].display_name, "First");
    }

    #[test]
    fn test_dedup_across_plain_and_encoded() {
        let cipher = cipher();
        let resolver = Resolver::new(&cipher);
        let token = cipher.encode("dup@example.com", &IV);

        let resolved = resolver.resolve(vec![
            plain("dup@example.com", "Plain"),
            RecipientRecord {
                raw: RawAddress::from_stored(token),
                display_name: "Encoded".into(),
            },
        ]);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].display_name, "Plain");
    }

    #[test]
    fn test_empty_candidates() {
        let cipher = cipher();
        let resolver = Resolver::new(&cipher);
        assert!(resolver.resolve(Vec::new()).is_empty());
    }

    #[test]
    fn test_recipient_class_wire_names() {
        let class: RecipientClass = serde_json::from_str("\"RESIDENTS\"").unwrap();
        assert_eq!(class, RecipientClass::Residents);
        assert!(serde_json::from_str::<RecipientClass>("\"EVERYONE\"").is_err());
    }
}
