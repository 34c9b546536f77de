//! Identifier - one entity within one identifier namespace
//!
//! Canonical form is `kind::value`. `kind` may not contain `:` at all, so the
//! first `::` in a canonical string is always the field delimiter and `value`
//! is free to carry colons (URNs, IPv6 addresses). `$` is reserved for the
//! pair level and is rejected in both fields.

use crate::config::CanonicalConfig;
use crate::error::{ParseError, ValidationError};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Separates `kind` from `value` in the canonical form
pub const IDENTIFIER_DELIMITER: &str = "::";

/// Separates the two endpoints of a pair in the canonical form
pub const PAIR_DELIMITER: char = '$';

const KIND_RESERVED: [char; 2] = [':', PAIR_DELIMITER];

/// An immutable `(kind, value)` identifier.
///
/// Equality, hashing and ordering are exact and case-sensitive over both
/// fields. Ordering is by `kind`, then `value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    kind: String,
    value: String,
}

impl Identifier {
    /// Build an identifier, rejecting empty fields and reserved characters
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Result<Self, ValidationError> {
        let kind = kind.into();
        let value = value.into();
        validate(&kind, &value)?;
        Ok(Self { kind, value })
    }

    /// Build an identifier after applying a canonicalization policy to raw fields
    pub fn canonicalized(
        kind: &str,
        value: &str,
        config: &CanonicalConfig,
    ) -> Result<Self, ValidationError> {
        Self::new(config.canonical_kind(kind), config.canonical_value(value))
    }

    /// Explicit copy of an existing identifier
    pub fn from_existing(other: &Identifier) -> Self {
        other.clone()
    }

    /// Parse the canonical `kind::value` form
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let (kind, value) = input
            .split_once(IDENTIFIER_DELIMITER)
            .ok_or_else(|| ParseError::MissingDelimiter {
                input: input.to_string(),
            })?;

        Self::new(kind, value).map_err(|source| ParseError::InvalidIdentifier {
            input: input.to_string(),
            source,
        })
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Copy with a different kind; the original is left untouched
    pub fn with_kind(&self, kind: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(kind, self.value.clone())
    }

    /// Copy with a different value; the original is left untouched
    pub fn with_value(&self, value: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(self.kind.clone(), value)
    }

    pub fn into_parts(self) -> (String, String) {
        (self.kind, self.value)
    }

    pub fn to_canonical_string(&self) -> String {
        self.to_string()
    }
}

fn validate(kind: &str, value: &str) -> Result<(), ValidationError> {
    if kind.is_empty() {
        return Err(ValidationError::EmptyKind);
    }
    if value.is_empty() {
        return Err(ValidationError::EmptyValue);
    }
    if let Some(reserved) = kind.chars().find(|c| KIND_RESERVED.contains(c)) {
        return Err(ValidationError::ReservedInKind {
            kind: kind.to_string(),
            reserved,
        });
    }
    if value.contains(PAIR_DELIMITER) {
        return Err(ValidationError::ReservedInValue {
            value: value.to_string(),
            reserved: PAIR_DELIMITER,
        });
    }
    Ok(())
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.kind, IDENTIFIER_DELIMITER, self.value)
    }
}

impl FromStr for Identifier {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Identifier::parse(&raw).map_err(de::Error::custom)
    }
}
