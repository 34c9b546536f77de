//! Grouping Engine
//!
//! Partitions identifiers into connected components of the graph defined by
//! a set of identifier pairs.
//!
//! ## Ordering
//!
//! Output order is a function of input order only:
//! - groups are ordered by the first appearance of any of their members,
//! - members within a group are ordered by their own first appearance,
//!
//! where appearance means scanning pairs in order, `first` before `second`.
//! Hash-table iteration order never leaks into the output.

mod interner;
mod union_find;

use interner::IdentifierInterner;
use union_find::UnionFind;

use crate::identifier::Identifier;
use crate::pair::IdentifierPair;
use serde::{Serialize, Serializer};
use std::borrow::Borrow;
use std::collections::HashMap;
use tracing::debug;

/// Counters collected while grouping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupingStats {
    /// Distinct identifiers seen
    pub identifiers: usize,

    /// Pairs consumed, including duplicates and self-pairs
    pub links: usize,

    pub self_links: usize,

    /// Pairs that joined two previously separate groups
    pub merges: usize,

    pub groups: usize,

    pub largest_group: usize,
}

/// Incremental union-find over identifiers.
///
/// Owns its interning table and forest exclusively; not meant to be shared
/// across threads while pairs are being added.
#[derive(Debug, Default)]
pub struct IdentityGrouper {
    interner: IdentifierInterner,
    forest: UnionFind,
    stats: GroupingStats,
}

impl IdentityGrouper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size for roughly `pairs` input pairs
    pub fn with_capacity(pairs: usize) -> Self {
        Self {
            interner: IdentifierInterner::with_capacity(pairs),
            forest: UnionFind::with_capacity(pairs),
            stats: GroupingStats::default(),
        }
    }

    pub fn add_pair(&mut self, pair: &IdentifierPair) {
        let (first, second) = pair.endpoints();
        let a = self.intern(first);
        let b = self.intern(second);

        self.stats.links += 1;
        if a == b {
            self.stats.self_links += 1;
            return;
        }
        if self.forest.union(a, b) {
            self.stats.merges += 1;
        }
    }

    pub fn extend<I>(&mut self, pairs: I)
    where
        I: IntoIterator,
        I::Item: Borrow<IdentifierPair>,
    {
        for pair in pairs {
            self.add_pair(pair.borrow());
        }
    }

    /// Whether two identifiers are already linked by the pairs added so far.
    /// Unknown identifiers are only connected to themselves.
    pub fn connected(&mut self, a: &Identifier, b: &Identifier) -> bool {
        if a == b {
            return true;
        }
        match (self.interner.get(a), self.interner.get(b)) {
            (Some(a), Some(b)) => self.forest.connected(a, b),
            _ => false,
        }
    }

    pub fn identifier_count(&self) -> usize {
        self.interner.len()
    }

    pub fn link_count(&self) -> usize {
        self.stats.links
    }

    /// Number of groups the current pairs would produce
    pub fn group_count(&self) -> usize {
        self.interner.len() - self.stats.merges
    }

    pub fn finish(self) -> IdentityGroups {
        let IdentityGrouper {
            interner,
            mut forest,
            mut stats,
        } = self;

        let (mut index, identifiers) = interner.into_parts();
        let mut slot_of_root: Vec<Option<usize>> = vec![None; identifiers.len()];
        let mut membership: Vec<usize> = Vec::with_capacity(identifiers.len());
        let mut groups: Vec<Vec<Identifier>> = Vec::new();

        for (position, id) in identifiers.into_iter().enumerate() {
            let root = forest.find(position);
            let slot = match slot_of_root[root] {
                Some(slot) => slot,
                None => {
                    groups.push(Vec::with_capacity(forest.set_size(root)));
                    slot_of_root[root] = Some(groups.len() - 1);
                    groups.len() - 1
                }
            };
            groups[slot].push(id);
            membership.push(slot);
        }

        for slot in index.values_mut() {
            *slot = membership[*slot];
        }

        stats.identifiers = membership.len();
        stats.groups = groups.len();
        stats.largest_group = groups.iter().map(Vec::len).max().unwrap_or(0);

        debug!(
            "Grouped {} identifiers from {} links into {} groups (largest {})",
            stats.identifiers, stats.links, stats.groups, stats.largest_group
        );

        IdentityGroups {
            groups,
            index,
            stats,
        }
    }

    fn intern(&mut self, id: &Identifier) -> usize {
        let (position, inserted) = self.interner.intern(id);
        if inserted {
            let set = self.forest.make_set();
            debug_assert_eq!(set, position);
        }
        position
    }
}

/// The partition produced by the grouping engine.
///
/// Serializes as a JSON array of arrays of canonical identifier strings.
#[derive(Debug, Clone, Default)]
pub struct IdentityGroups {
    groups: Vec<Vec<Identifier>>,
    /// identifier -> group slot
    index: HashMap<Identifier, usize>,
    stats: GroupingStats,
}

impl IdentityGroups {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &[Vec<Identifier>] {
        &self.groups
    }

    pub fn members(&self, group: usize) -> Option<&[Identifier]> {
        self.groups.get(group).map(Vec::as_slice)
    }

    /// Position of the group containing `id`
    pub fn group_of(&self, id: &Identifier) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn same_group(&self, a: &Identifier, b: &Identifier) -> bool {
        match (self.group_of(a), self.group_of(b)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    pub fn identifier_count(&self) -> usize {
        self.index.len()
    }

    pub fn stats(&self) -> &GroupingStats {
        &self.stats
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vec<Identifier>> {
        self.groups.iter()
    }

    pub fn into_groups(self) -> Vec<Vec<Identifier>> {
        self.groups
    }

    /// Membership in a fixed canonical order: members sorted within each
    /// group, then groups sorted. Use this to compare partitions built from
    /// differently ordered inputs.
    pub fn sorted(&self) -> Vec<Vec<Identifier>> {
        let mut sorted: Vec<Vec<Identifier>> = self
            .groups
            .iter()
            .map(|group| {
                let mut group = group.clone();
                group.sort();
                group
            })
            .collect();
        sorted.sort();
        sorted
    }
}

impl<'a> IntoIterator for &'a IdentityGroups {
    type Item = &'a Vec<Identifier>;
    type IntoIter = std::slice::Iter<'a, Vec<Identifier>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

impl Serialize for IdentityGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.groups.serialize(serializer)
    }
}

/// Group any sequence of pairs
pub fn group_pairs<I>(pairs: I) -> IdentityGroups
where
    I: IntoIterator,
    I::Item: Borrow<IdentifierPair>,
{
    let pairs = pairs.into_iter();
    let mut grouper = IdentityGrouper::with_capacity(pairs.size_hint().0);
    grouper.extend(pairs);
    grouper.finish()
}

/// Connected components of the graph defined by `pairs`, one group per
/// component, in first-appearance order.
pub fn group_identifier_pairs(pairs: &[IdentifierPair]) -> Vec<Vec<Identifier>> {
    group_pairs(pairs).into_groups()
}
