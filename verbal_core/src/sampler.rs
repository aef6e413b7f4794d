//! Random selection primitives

use rand::seq::SliceRandom;
use rand::Rng;

/// Return a uniformly shuffled copy of `items`. The input is left untouched.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    // Fisher-Yates
    out.shuffle(rng);
    out
}

/// Pick `min(n, len)` items without replacement.
pub fn take_random<T: Clone, R: Rng + ?Sized>(items: &[T], n: usize, rng: &mut R) -> Vec<T> {
    let mut out = shuffle(items, rng);
    out.truncate(n);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn shuffle_keeps_every_element() {
        let mut rng = StdRng::seed_from_u64(7);
        let input: Vec<u32> = (0..20).collect();
        let mut out = shuffle(&input, &mut rng);
        assert_eq!(input, (0..20).collect::<Vec<_>>());
        out.sort();
        assert_eq!(out, input);
    }

    #[test]
    fn take_random_caps_at_length() {
        let mut rng = StdRng::seed_from_u64(1);
        let input = vec!["a", "b", "c"];
        assert_eq!(take_random(&input, 2, &mut rng).len(), 2);
        assert_eq!(take_random(&input, 10, &mut rng).len(), 3);
        assert!(take_random::<&str, _>(&[], 3, &mut rng).is_empty());
    }

    #[test]
    fn take_random_has_no_repeats() {
        let mut rng = StdRng::seed_from_u64(42);
        let input: Vec<u32> = (0..10).collect();
        let mut picked = take_random(&input, 5, &mut rng);
        picked.sort();
        picked.dedup();
        assert_eq!(picked.len(), 5);
    }

    #[test]
    fn shuffle_reaches_every_permutation() {
        let mut rng = StdRng::seed_from_u64(3);
        let input = [1, 2, 3];
        let mut seen = std::collections::HashSet::new();
        for _ in 0..600 {
            seen.insert(shuffle(&input, &mut rng));
        }
        assert_eq!(seen.len(), 6);
    }
}
