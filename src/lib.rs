//! # node-group
//!
//! Identity stitching: given observed pairs of identifiers (an email seen
//! next to a device id in some record), group every identifier that is
//! directly or transitively linked into one entity.
//!
//! ```rust
//! use node_group::{group_identifier_pairs, Identifier, IdentifierPair};
//!
//! let pair = |a: &str, b: &str| {
//!     IdentifierPair::new(Identifier::parse(a).unwrap(), Identifier::parse(b).unwrap())
//! };
//! let groups = group_identifier_pairs(&[
//!     pair("email::a", "device::x"),
//!     pair("device::x", "cookie::y"),
//!     pair("email::b", "device::z"),
//! ]);
//! assert_eq!(groups.len(), 2);
//! assert_eq!(groups[0].len(), 3);
//! ```

pub mod config;
pub mod error;
pub mod grouping;
pub mod identifier;
pub mod ingestion;
pub mod pair;

pub use config::{CanonicalConfig, CaseMode, ConfigOverrides, NodeGroupConfig};
pub use error::{NodeGroupError, ParseError, Result, ValidationError};
pub use grouping::{group_identifier_pairs, group_pairs, GroupingStats, IdentityGrouper, IdentityGroups};
pub use identifier::{Identifier, IDENTIFIER_DELIMITER, PAIR_DELIMITER};
pub use ingestion::{group_table, load_csv, pairs_from_table, IdentifierTable, IngestionOptions, JsonRecords};
pub use pair::IdentifierPair;
