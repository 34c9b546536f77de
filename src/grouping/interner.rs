//! Identifier interning table
//!
//! Maps each distinct identifier to a dense index, assigned in
//! first-appearance order. The union-find forest works on those indices.

use crate::identifier::Identifier;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub(crate) struct IdentifierInterner {
    index: HashMap<Identifier, usize>,
    identifiers: Vec<Identifier>,
}

impl IdentifierInterner {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            identifiers: Vec::with_capacity(capacity),
        }
    }

    /// Index for `id`, allocating one if unseen. The flag is `true` when the
    /// identifier was inserted by this call.
    pub fn intern(&mut self, id: &Identifier) -> (usize, bool) {
        if let Some(&existing) = self.index.get(id) {
            return (existing, false);
        }
        let next = self.identifiers.len();
        self.index.insert(id.clone(), next);
        self.identifiers.push(id.clone());
        (next, true)
    }

    pub fn get(&self, id: &Identifier) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    /// Split into the lookup map and the identifiers in index order
    pub fn into_parts(self) -> (HashMap<Identifier, usize>, Vec<Identifier>) {
        (self.index, self.identifiers)
    }
}
