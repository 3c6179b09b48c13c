//! Stratified train/test splitting.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Split sample indices into train and test partitions while preserving
/// per-class proportions.
///
/// Each class pool is shuffled with the caller's seeded generator; the test
/// share is rounded per class and clamped so any class with at least two
/// members lands on both sides. Returned index lists are sorted ascending.
pub(crate) fn stratified_split(
    labels: &[usize],
    n_classes: usize,
    test_fraction: f64,
    rng: &mut StdRng,
) -> (Vec<usize>, Vec<usize>) {
    let mut pools: Vec<Vec<usize>> = vec![Vec::new(); n_classes];
    for (index, &label) in labels.iter().enumerate() {
        if label < n_classes {
            pools[label].push(index);
        }
    }

    let mut train = Vec::new();
    let mut test = Vec::new();
    for pool in &mut pools {
        if pool.is_empty() {
            continue;
        }
        pool.shuffle(rng);
        let n_test = if pool.len() < 2 {
            0
        } else {
            ((pool.len() as f64 * test_fraction).round() as usize).clamp(1, pool.len() - 1)
        };
        test.extend_from_slice(&pool[..n_test]);
        train.extend_from_slice(&pool[n_test..]);
    }
    train.sort_unstable();
    test.sort_unstable();
    (train, test)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn labels(counts: &[usize]) -> Vec<usize> {
        let mut out = Vec::new();
        for (class, &count) in counts.iter().enumerate() {
            out.extend(std::iter::repeat_n(class, count));
        }
        out
    }

    #[test]
    fn preserves_per_class_proportions() {
        let labels = labels(&[40, 40, 40, 40]);
        let mut rng = StdRng::seed_from_u64(42);
        let (train, test) = stratified_split(&labels, 4, 0.25, &mut rng);
        assert_eq!(train.len() + test.len(), 160);
        for class in 0..4 {
            let in_test = test.iter().filter(|&&i| labels[i] == class).count();
            assert_eq!(in_test, 10);
        }
    }

    #[test]
    fn partitions_are_disjoint_and_complete() {
        let labels = labels(&[13, 7, 21, 9]);
        let mut rng = StdRng::seed_from_u64(9);
        let (train, test) = stratified_split(&labels, 4, 0.2, &mut rng);
        let mut all: Vec<usize> = train.iter().chain(&test).copied().collect();
        all.sort_unstable();
        let expected: Vec<usize> = (0..labels.len()).collect();
        assert_eq!(all, expected);
    }

    #[test]
    fn small_classes_land_on_both_sides() {
        let labels = labels(&[2, 2, 2, 2]);
        let mut rng = StdRng::seed_from_u64(1);
        let (train, test) = stratified_split(&labels, 4, 0.25, &mut rng);
        for class in 0..4 {
            assert!(train.iter().any(|&i| labels[i] == class));
            assert!(test.iter().any(|&i| labels[i] == class));
        }
    }

    #[test]
    fn singleton_classes_stay_in_train() {
        let labels = vec![0, 0, 0, 1];
        let mut rng = StdRng::seed_from_u64(1);
        let (train, test) = stratified_split(&labels, 2, 0.25, &mut rng);
        assert!(train.contains(&3));
        assert!(!test.contains(&3));
    }

    #[test]
    fn is_deterministic_for_a_fixed_seed() {
        let labels = labels(&[30, 30, 30, 30]);
        let mut rng_a = StdRng::seed_from_u64(11);
        let mut rng_b = StdRng::seed_from_u64(11);
        assert_eq!(
            stratified_split(&labels, 4, 0.2, &mut rng_a),
            stratified_split(&labels, 4, 0.2, &mut rng_b)
        );
    }
}
