use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::MatchError;

/// Groups keyed by identifier, each an ordered list of entities.
///
/// Entities are expected to be disjoint across the groups of one partition.
/// Debug builds assert this while indexing; release builds keep whichever
/// group indexed a duplicated entity last.
pub type Partition<K, E> = BTreeMap<K, Vec<E>>;

/// Positional groups plus an entity -> group position index.
pub(crate) struct GroupIndex<'a, E> {
    members: Vec<&'a [E]>,
    owner: HashMap<&'a E, usize>,
}

impl<'a, E: Eq + Hash> GroupIndex<'a, E> {
    fn new(groups: Vec<&'a [E]>) -> Self {
        let mut owner = HashMap::with_capacity(groups.iter().map(|g| g.len()).sum());
        for (i, group) in groups.iter().enumerate() {
            for entity in group.iter() {
                let prev = owner.insert(entity, i);
                debug_assert!(
                    prev.is_none_or(|p| p == i),
                    "clustermatch: entity appears in more than one group of a partition"
                );
            }
        }
        Self { members: groups, owner }
    }

    pub(crate) fn len(&self) -> usize {
        self.members.len()
    }

    pub(crate) fn members(&self, group: usize) -> &'a [E] {
        self.members[group]
    }

    /// Position of the group holding `entity`, if any.
    pub(crate) fn owner_of(&self, entity: &E) -> Option<usize> {
        self.owner.get(entity).copied()
    }
}

/// A partition flattened in key order.
pub(crate) struct IndexedPartition<'a, K, E> {
    pub(crate) keys: Vec<&'a K>,
    pub(crate) groups: GroupIndex<'a, E>,
}

impl<'a, K, E: Eq + Hash> IndexedPartition<'a, K, E> {
    pub(crate) fn new(partition: &'a Partition<K, E>) -> Self {
        let (keys, members) = partition.iter().map(|(k, g)| (k, g.as_slice())).unzip();
        Self {
            keys,
            groups: GroupIndex::new(members),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn members(&self, group: usize) -> &'a [E] {
        self.groups.members(group)
    }

    pub(crate) fn owner_of(&self, entity: &E) -> Option<usize> {
        self.groups.owner_of(entity)
    }
}

/// Manual corrections recorded against old groups.
///
/// A claimed entity always ends up in the group claiming it. A rejected
/// entity never lands in the rejecting group through the computed assignment;
/// it is sent back to the old group it currently belongs to instead.
///
/// An entity should be claimed by at most one group.
#[derive(Debug, Clone)]
pub struct Overrides<K, E> {
    pub claims: Partition<K, E>,
    pub rejections: Partition<K, E>,
}

impl<K, E> Default for Overrides<K, E> {
    fn default() -> Self {
        Self {
            claims: BTreeMap::new(),
            rejections: BTreeMap::new(),
        }
    }
}

impl<K: Ord, E> Overrides<K, E> {
    /// Creates an empty set of overrides.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_claims(mut self, claims: Partition<K, E>) -> Self {
        self.claims = claims;
        self
    }

    pub fn with_rejections(mut self, rejections: Partition<K, E>) -> Self {
        self.rejections = rejections;
        self
    }

    /// Entities claimed by `key`, empty if it claims none.
    pub fn claims_for(&self, key: &K) -> &[E] {
        self.claims.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Entities rejected by `key`, empty if it rejects none.
    pub fn rejections_for(&self, key: &K) -> &[E] {
        self.rejections.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.claims.values().all(Vec::is_empty) && self.rejections.values().all(Vec::is_empty)
    }

    /// Checks that every claiming or rejecting group exists in `old`.
    pub fn validate(&self, old: &Partition<K, E>) -> Result<(), MatchError>
    where
        K: Debug,
    {
        for (relation, groups) in [("claims", &self.claims), ("rejections", &self.rejections)] {
            if let Some(key) = groups.keys().find(|k| !old.contains_key(*k)) {
                return Err(MatchError::UnknownOldGroup {
                    relation,
                    key: format!("{key:?}"),
                });
            }
        }
        Ok(())
    }
}

impl<K: Ord, E: Eq + Hash> Overrides<K, E> {
    /// Rejected entities grouped by the rejecting group.
    pub(crate) fn rejection_sets(&self) -> BTreeMap<&K, HashSet<&E>> {
        self.rejections
            .iter()
            .filter(|(_, entities)| !entities.is_empty())
            .map(|(key, entities)| (key, entities.iter().collect()))
            .collect()
    }
}
