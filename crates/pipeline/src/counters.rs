//! Task-local advisory counters.
//!
//! Each map or reduce task owns its own `Counters`. The runner merges them
//! after the task completes, for reporting only; no stage reads them back.

use serde::Serialize;
use std::collections::BTreeMap;

/// Named event counts, ordered by name for stable reporting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Counters(BTreeMap<&'static str, u64>);

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `by` to the named counter
    pub fn incr(&mut self, name: &'static str, by: u64) {
        *self.0.entry(name).or_insert(0) += by;
    }

    /// Current value, zero if never incremented
    pub fn get(&self, name: &str) -> u64 {
        self.0.get(name).copied().unwrap_or(0)
    }

    pub fn merge(&mut self, other: &Counters) {
        for (&name, &count) in &other.0 {
            self.incr(name, count);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.0.iter().map(|(&name, &count)| (name, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_adds_counts() {
        let mut a = Counters::new();
        assert!(a.is_empty());
        a.incr("rows", 2);
        assert!(!a.is_empty());
        let mut b = Counters::new();
        b.incr("rows", 3);
        b.incr("errors", 1);

        a.merge(&b);

        assert_eq!(a.get("rows"), 5);
        assert_eq!(a.get("errors"), 1);
        assert_eq!(a.get("missing"), 0);
        assert_eq!(a.iter().map(|(n, _)| n).collect::<Vec<_>>(), vec!["errors", "rows"]);
    }
}
