use std::collections::HashSet;

use crate::candidates::normalize_candidates;

/// The loaded roster and the subset of it still eligible to win.
///
/// `available` is always a subset of `roster` and keeps roster order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidatePool {
    roster: Vec<String>,
    available: Vec<String>,
}

impl CandidatePool {
    /// Rebuild a pool from persisted slots. Names in `available` that are not
    /// on the roster are dropped.
    pub fn from_parts(roster: Vec<String>, available: Vec<String>) -> Self {
        let roster = normalize_candidates(roster);
        let keep: HashSet<&str> = available.iter().map(String::as_str).collect();
        let available = roster
            .iter()
            .filter(|name| keep.contains(name.as_str()))
            .cloned()
            .collect();
        Self { roster, available }
    }

    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    pub fn available(&self) -> &[String] {
        &self.available
    }

    pub fn candidate_count(&self) -> usize {
        self.roster.len()
    }

    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    pub fn is_available(&self, name: &str) -> bool {
        self.available.iter().any(|n| n == name)
    }

    /// Replace the roster wholesale; everyone becomes available again.
    pub fn set_candidates(&mut self, names: Vec<String>) {
        self.roster = normalize_candidates(names);
        self.available = self.roster.clone();
    }

    pub fn reset(&mut self) {
        self.available = self.roster.clone();
    }

    pub fn clear(&mut self) {
        self.roster.clear();
        self.available.clear();
    }

    pub(crate) fn remove(&mut self, names: &[String]) {
        self.available.retain(|n| !names.contains(n));
    }

    /// Set-union `names` back into the available pool.
    ///
    /// Only roster members are restored, and the result follows roster order,
    /// so a name is never duplicated and never appears without being loaded.
    pub(crate) fn restore(&mut self, names: &[String]) {
        let restored: Vec<String> = {
            let mut wanted: HashSet<&str> = self.available.iter().map(String::as_str).collect();
            wanted.extend(names.iter().map(String::as_str));
            self.roster
                .iter()
                .filter(|name| wanted.contains(name.as_str()))
                .cloned()
                .collect()
        };
        self.available = restored;
    }
}
