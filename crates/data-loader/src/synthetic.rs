//! Synthetic Epinions-shaped input for benchmarking.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Shape of a generated dataset
#[derive(Debug, Clone, Copy)]
pub struct SyntheticSpec {
    pub users: usize,
    pub items: usize,
    pub ratings_per_user: usize,
    pub trusts_per_user: usize,
    /// Share of trust rows written as distrust (-1)
    pub distrust_ratio: f64,
}

/// Generate rating and trust rows in the raw tab-delimited format.
///
/// The same seed always produces the same lines.
pub fn generate(spec: &SyntheticSpec, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    let users = spec.users.max(1);
    let items = spec.items.max(1);
    let mut lines = Vec::with_capacity(users * (spec.ratings_per_user + spec.trusts_per_user));

    for user in 0..users {
        for _ in 0..spec.ratings_per_user {
            let item = rng.random_range(0..items);
            let rating = rng.random_range(1..=5);
            let status = if rng.random_bool(0.9) { 1 } else { 0 };
            lines.push(format!(
                "{item}\t{user}\t{rating}\t{status}\t2001/01/10\t2001/01/10\t1\t{status}"
            ));
        }
        for _ in 0..spec.trusts_per_user {
            let other = rng.random_range(0..users);
            let value = if rng.random_bool(spec.distrust_ratio.clamp(0.0, 1.0)) { -1 } else { 1 };
            lines.push(format!("{user}\t{other}\t{value}\t2001/01/10"));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::ParseSummary;

    fn spec() -> SyntheticSpec {
        SyntheticSpec {
            users: 50,
            items: 20,
            ratings_per_user: 4,
            trusts_per_user: 3,
            distrust_ratio: 0.2,
        }
    }

    #[test]
    fn test_generated_rows_all_parse() {
        let lines = generate(&spec(), 7);
        let summary = ParseSummary::from_lines(&lines);

        assert_eq!(lines.len(), 50 * 7);
        assert_eq!(summary.ratings, 200);
        assert_eq!(summary.trust_edges + summary.distrust_edges, 150);
        assert_eq!(summary.rejected(), 0);
    }

    #[test]
    fn test_same_seed_same_data() {
        assert_eq!(generate(&spec(), 42), generate(&spec(), 42));
    }
}
