use rand::Rng;
use rand::seq::SliceRandom;

/// Picks up to `k` distinct elements of `pool`.
///
/// No ordering guarantee on the result; callers that need a random order
/// shuffle it themselves.
pub fn sample_without_replacement<T: Clone, R: Rng + ?Sized>(pool: &[T], k: usize, rng: &mut R) -> Vec<T> {
    pool.choose_multiple(rng, k).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_sample_is_distinct_subset() {
        let pool: Vec<i32> = (0..20).collect();
        let mut rng = StdRng::seed_from_u64(11);

        let picked = sample_without_replacement(&pool, 5, &mut rng);
        let unique: HashSet<_> = picked.iter().collect();

        assert_eq!(picked.len(), 5);
        assert_eq!(unique.len(), 5);
        assert!(picked.iter().all(|p| pool.contains(p)));
    }

    #[test]
    fn test_sample_larger_than_pool() {
        let pool = vec!["a", "b"];
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(sample_without_replacement(&pool, 3, &mut rng).len(), 2);
        assert!(sample_without_replacement::<&str, _>(&[], 3, &mut rng).is_empty());
    }
}
