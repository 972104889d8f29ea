//! Radius query results.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use serde::Serialize;

/// Result key for a kind, e.g. `"Track"` becomes `"TrackIds"`.
pub fn result_key(kind: &str) -> String {
    format!("{kind}Ids")
}

// == Query Result ==
/// Ids found by a radius query, one set per requested kind.
///
/// Every requested kind has an entry, empty when nothing of that kind was
/// in range or the kind is not declared on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryResult<Id: Eq + Hash> {
    sets: HashMap<String, HashSet<Id>>,
}

impl<Id: Eq + Hash> QueryResult<Id> {
    pub(crate) fn for_kinds(kinds: &[&str]) -> Self {
        let sets = kinds
            .iter()
            .map(|kind| (result_key(kind), HashSet::new()))
            .collect();
        Self { sets }
    }

    pub(crate) fn insert(&mut self, kind: &str, id: Id) {
        if let Some(set) = self.sets.get_mut(&result_key(kind)) {
            set.insert(id);
        }
    }

    /// Ids of `kind`, None if the kind was not part of the query.
    pub fn ids(&self, kind: &str) -> Option<&HashSet<Id>> {
        self.sets.get(&result_key(kind))
    }

    /// Looks up a set by its result key (`"<kind>Ids"`).
    pub fn get(&self, key: &str) -> Option<&HashSet<Id>> {
        self.sets.get(key)
    }

    pub fn contains(&self, kind: &str, id: &Id) -> bool {
        self.ids(kind).is_some_and(|ids| ids.contains(id))
    }

    /// Total number of ids across all kinds.
    pub fn total(&self) -> usize {
        self.sets.values().map(HashSet::len).sum()
    }
}
