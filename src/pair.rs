//! Identifier Pair - one observed co-occurrence of two identifiers
//!
//! Canonical form is `first$second`, e.g. `email::a@b.com$device::x`.
//! Endpoint order is kept for serialization but ignored by equality.

use crate::error::ParseError;
use crate::identifier::{Identifier, PAIR_DELIMITER};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// An unordered edge between two identifiers.
///
/// `{a, b}` equals `{b, a}`. A pair whose endpoints are equal is a self-pair
/// and contributes no connectivity.
#[derive(Debug, Clone)]
pub struct IdentifierPair {
    first: Identifier,
    second: Identifier,
}

impl IdentifierPair {
    pub fn new(first: Identifier, second: Identifier) -> Self {
        Self { first, second }
    }

    /// Explicit copy of an existing pair
    pub fn from_existing(other: &IdentifierPair) -> Self {
        other.clone()
    }

    /// Parse the canonical `kind::value$kind::value` form
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let parts: Vec<&str> = input.split(PAIR_DELIMITER).collect();
        let [first, second] = parts.as_slice() else {
            return Err(ParseError::PairArity {
                input: input.to_string(),
                found: parts.len(),
            });
        };
        Ok(Self::new(Identifier::parse(first)?, Identifier::parse(second)?))
    }

    pub fn first(&self) -> &Identifier {
        &self.first
    }

    pub fn second(&self) -> &Identifier {
        &self.second
    }

    pub fn endpoints(&self) -> (&Identifier, &Identifier) {
        (&self.first, &self.second)
    }

    pub fn into_endpoints(self) -> (Identifier, Identifier) {
        (self.first, self.second)
    }

    pub fn is_self_pair(&self) -> bool {
        self.first == self.second
    }

    pub fn contains(&self, id: &Identifier) -> bool {
        self.first == *id || self.second == *id
    }

    /// The endpoint opposite to `id`, or `None` if `id` is not in this pair
    pub fn other(&self, id: &Identifier) -> Option<&Identifier> {
        if self.first == *id {
            Some(&self.second)
        } else if self.second == *id {
            Some(&self.first)
        } else {
            None
        }
    }

    pub fn to_canonical_string(&self) -> String {
        self.to_string()
    }

    /// Endpoints in canonical (sorted) order
    fn normalized(&self) -> (&Identifier, &Identifier) {
        if self.first <= self.second {
            (&self.first, &self.second)
        } else {
            (&self.second, &self.first)
        }
    }
}

impl PartialEq for IdentifierPair {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for IdentifierPair {}

impl Hash for IdentifierPair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl Display for IdentifierPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.first, PAIR_DELIMITER, self.second)
    }
}

impl FromStr for IdentifierPair {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for IdentifierPair {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IdentifierPair {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        IdentifierPair::parse(&raw).map_err(de::Error::custom)
    }
}
