//! Ingestion Module - identifier pairs from tabular data
//!
//! Every column is an identifier kind and every cell an identifier value.
//! For each unordered pair of distinct columns, each row where both cells are
//! present yields one `IdentifierPair`. Output order is column-pair major
//! (column positions in lexicographic order), rows minor.

pub mod csv_loader;
pub mod json_records;
pub mod table;

pub use csv_loader::load_csv;
pub use json_records::JsonRecords;
pub use table::IdentifierTable;

use crate::config::CanonicalConfig;
use crate::error::{NodeGroupError, Result};
use crate::grouping::{group_pairs, IdentityGroups};
use crate::identifier::Identifier;
use crate::pair::IdentifierPair;
use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Options controlling pair extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionOptions {
    /// Use only these columns, in this order
    #[serde(default)]
    pub columns: Option<Vec<String>>,

    /// Use only columns whose name matches this regex
    #[serde(default)]
    pub column_pattern: Option<String>,

    /// Normalization applied to column names and cell values
    #[serde(default)]
    pub canonical: CanonicalConfig,

    /// Treat cells that are empty after canonicalization as null instead of
    /// failing validation
    #[serde(default = "default_skip_blank_cells")]
    pub skip_blank_cells: bool,

    /// Emit a self-pair for rows where exactly one selected column is
    /// present, so those identifiers still surface as singleton groups
    #[serde(default)]
    pub emit_singletons: bool,
}

fn default_skip_blank_cells() -> bool {
    true
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            columns: None,
            column_pattern: None,
            canonical: CanonicalConfig::default(),
            skip_blank_cells: default_skip_blank_cells(),
            emit_singletons: false,
        }
    }
}

impl IngestionOptions {
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_column_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.column_pattern = Some(pattern.into());
        self
    }

    pub fn with_canonical(mut self, canonical: CanonicalConfig) -> Self {
        self.canonical = canonical;
        self
    }

    pub fn with_singletons(mut self, emit_singletons: bool) -> Self {
        self.emit_singletons = emit_singletons;
        self
    }

    /// Resolve which table columns take part, in order
    fn select_columns(&self, available: Vec<String>) -> Result<Vec<String>> {
        let mut selected = match &self.columns {
            Some(requested) => {
                if let Some(missing) = requested.iter().find(|c| !available.contains(c)) {
                    return Err(NodeGroupError::ColumnNotFound(missing.clone()));
                }
                requested.clone()
            }
            None => available,
        };

        if let Some(pattern) = &self.column_pattern {
            let re = Regex::new(pattern).map_err(|e| {
                NodeGroupError::Config(format!("Invalid column pattern {}: {}", pattern, e))
            })?;
            selected.retain(|c| re.is_match(c));
        }

        Ok(selected.into_iter().unique().collect())
    }
}

/// Extract identifier pairs from every combination of two columns
pub fn pairs_from_table<T>(table: &T, options: &IngestionOptions) -> Result<Vec<IdentifierPair>>
where
    T: IdentifierTable + ?Sized,
{
    let columns = options.select_columns(table.column_names())?;
    if columns.len() < 2 && !options.emit_singletons {
        warn!(
            "Only {} identifier column(s) selected; no pairs can be formed",
            columns.len()
        );
    }

    let cells: Vec<Vec<Option<Identifier>>> = columns
        .iter()
        .map(|column| column_identifiers(table, column, options))
        .collect::<Result<_>>()?;

    let mut pairs = Vec::new();
    for ((left_name, left), (right_name, right)) in
        columns.iter().zip(&cells).tuple_combinations::<(_, _)>()
    {
        let before = pairs.len();
        for (a, b) in left.iter().zip(right) {
            if let (Some(a), Some(b)) = (a, b) {
                pairs.push(IdentifierPair::new(a.clone(), b.clone()));
            }
        }
        debug!(
            "Columns ({}, {}) produced {} pairs",
            left_name,
            right_name,
            pairs.len() - before
        );
    }

    if options.emit_singletons {
        let before = pairs.len();
        for row in 0..table.row_count() {
            let mut present = cells
                .iter()
                .filter_map(|column| column.get(row).and_then(Option::as_ref));
            if let (Some(only), None) = (present.next(), present.next()) {
                pairs.push(IdentifierPair::new(only.clone(), only.clone()));
            }
        }
        debug!("Emitted {} singleton self-pairs", pairs.len() - before);
    }

    info!(
        "Extracted {} identifier pairs from {} rows across {} columns",
        pairs.len(),
        table.row_count(),
        columns.len()
    );
    Ok(pairs)
}

/// Extract pairs from `table` and group them
pub fn group_table<T>(table: &T, options: &IngestionOptions) -> Result<IdentityGroups>
where
    T: IdentifierTable + ?Sized,
{
    let pairs = pairs_from_table(table, options)?;
    Ok(group_pairs(&pairs))
}

fn column_identifiers<T>(
    table: &T,
    column: &str,
    options: &IngestionOptions,
) -> Result<Vec<Option<Identifier>>>
where
    T: IdentifierTable + ?Sized,
{
    let kind = options.canonical.canonical_kind(column);
    table
        .column_cells(column)?
        .into_iter()
        .map(|cell| -> Result<Option<Identifier>> {
            let Some(raw) = cell else {
                return Ok(None);
            };
            let value = options.canonical.canonical_value(&raw);
            if value.is_empty() && options.skip_blank_cells {
                return Ok(None);
            }
            Ok(Some(Identifier::new(kind.clone(), value)?))
        })
        .collect()
}
