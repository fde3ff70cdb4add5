//! Value objects for the user aggregate.
//!
//! Each wrapper enforces a single-field invariant at construction: the
//! fallible constructor is the only way to obtain an instance, so holding a
//! value proves it is valid. Checks run in a fixed order — emptiness first
//! (its own error kind), then length/format.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{UserError, UserResult};

/// Allowed length bounds for names, counted in characters after trimming.
pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 50;

/// Basic `local@domain.tld` shape: non-whitespace segments around "@" and ".".
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

/// Opaque, non-empty user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(raw: impl Into<String>) -> UserResult<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(UserError::EmptyValue { field: "User ID" });
        }
        Ok(Self(raw))
    }

    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn validate_name(field: &'static str, raw: &str) -> UserResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UserError::EmptyValue { field });
    }

    let len = trimmed.chars().count();
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        return Err(UserError::InvalidLength {
            field,
            min: NAME_MIN_LEN,
            max: NAME_MAX_LEN,
            actual: len,
        });
    }

    Ok(trimmed.to_string())
}

/// First name, trimmed, 2–50 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    pub fn new(raw: &str) -> UserResult<Self> {
        validate_name("Name", raw).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Last name, same rules as [`UserName`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserLastName(String);

impl UserLastName {
    pub fn new(raw: &str) -> UserResult<Self> {
        validate_name("Last name", raw).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserLastName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Email address, trimmed and normalized to lower case.
///
/// Two emails are equal iff their normalized strings match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserEmail(String);

impl UserEmail {
    pub fn new(raw: &str) -> UserResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserError::EmptyValue { field: "Email" });
        }

        if !EMAIL_RE.is_match(trimmed) {
            return Err(UserError::InvalidEmailFormat(trimmed.to_string()));
        }

        Ok(Self(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of a user.
///
/// `Deleted` marks a soft-deleted user; repositories never return those
/// from finders. Serialized with the capitalized literal ("Active").
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
pub enum UserState {
    #[default]
    Active,
    Suspended,
    Deleted,
}

impl UserState {
    /// Parse a raw state literal. Any value outside the three literals is
    /// rejected with [`UserError::InvalidState`].
    pub fn parse(raw: &str) -> UserResult<Self> {
        raw.parse()
            .map_err(|_| UserError::InvalidState(raw.to_string()))
    }

    pub fn is_active(&self) -> bool {
        matches!(self, UserState::Active)
    }

    pub fn is_suspended(&self) -> bool {
        matches!(self, UserState::Suspended)
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, UserState::Deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_rejects_blank() {
        assert_eq!(
            UserId::new("   ").unwrap_err(),
            UserError::EmptyValue { field: "User ID" }
        );
        assert_eq!(
            UserId::new("").unwrap_err(),
            UserError::EmptyValue { field: "User ID" }
        );
    }

    #[test]
    fn test_user_id_generate_is_unique_and_non_empty() {
        let a = UserId::generate();
        let b = UserId::generate();
        assert!(!a.as_str().is_empty());
        assert_ne!(a, b);
    }

    #[test]
    fn test_name_is_trimmed() {
        let name = UserName::new("  Juan  ").unwrap();
        assert_eq!(name.as_str(), "Juan");
    }

    #[test]
    fn test_name_empty_is_distinct_from_length_error() {
        assert_eq!(
            UserName::new("   ").unwrap_err(),
            UserError::EmptyValue { field: "Name" }
        );
        assert!(matches!(
            UserName::new("J").unwrap_err(),
            UserError::InvalidLength { actual: 1, .. }
        ));
    }

    #[test]
    fn test_name_length_boundaries() {
        // 1 and 51 fail, 2 and 50 succeed
        assert!(UserName::new("J").is_err());
        assert!(UserName::new(&"a".repeat(51)).is_err());
        assert!(UserName::new("Jo").is_ok());
        assert!(UserName::new(&"a".repeat(50)).is_ok());
    }

    #[test]
    fn test_name_length_counts_characters_not_bytes() {
        // Two accented characters are two characters
        assert!(UserName::new("Éé").is_ok());
    }

    #[test]
    fn test_last_name_uses_its_own_field_label() {
        assert_eq!(
            UserLastName::new("").unwrap_err(),
            UserError::EmptyValue { field: "Last name" }
        );
        assert!(matches!(
            UserLastName::new("X").unwrap_err(),
            UserError::InvalidLength { field: "Last name", .. }
        ));
    }

    #[test]
    fn test_email_is_normalized_to_lower_case() {
        let email = UserEmail::new("TEST@EXAMPLE.COM").unwrap();
        assert_eq!(email.as_str(), "test@example.com");
    }

    #[test]
    fn test_email_equality_after_normalization() {
        let a = UserEmail::new("  Juan.Perez@Example.com ").unwrap();
        let b = UserEmail::new("juan.perez@example.com").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_email_empty_before_format() {
        assert_eq!(
            UserEmail::new("   ").unwrap_err(),
            UserError::EmptyValue { field: "Email" }
        );
    }

    #[test]
    fn test_email_rejects_bad_shapes() {
        for bad in ["invalid", "no@tld", "spaces in@example.com", "@example.com", "a@.com"] {
            assert!(
                matches!(UserEmail::new(bad), Err(UserError::InvalidEmailFormat(_))),
                "expected '{bad}' to be rejected"
            );
        }
    }

    #[test]
    fn test_state_parses_exact_literals_only() {
        assert_eq!(UserState::parse("Active").unwrap(), UserState::Active);
        assert_eq!(UserState::parse("Suspended").unwrap(), UserState::Suspended);
        assert_eq!(UserState::parse("Deleted").unwrap(), UserState::Deleted);
        assert_eq!(
            UserState::parse("active").unwrap_err(),
            UserError::InvalidState("active".to_string())
        );
        assert_eq!(
            UserState::parse("Archived").unwrap_err(),
            UserError::InvalidState("Archived".to_string())
        );
    }

    #[test]
    fn test_state_display_round_trip() {
        for state in [UserState::Active, UserState::Suspended, UserState::Deleted] {
            assert_eq!(UserState::parse(&state.to_string()).unwrap(), state);
        }
    }

    #[test]
    fn test_state_default_is_active() {
        assert_eq!(UserState::default(), UserState::Active);
        assert!(UserState::default().is_active());
    }
}
