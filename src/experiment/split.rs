use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};

/// Disjoint train/test index sets covering `0..n`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl Split {
    /// Partition `data` into `(train, test)` following the index sets.
    ///
    /// `None` if `data` is shorter than the split it was drawn for.
    pub fn apply<T: Clone>(&self, data: &[T]) -> Option<(Vec<T>, Vec<T>)> {
        let pick = |idx: &[usize]| -> Option<Vec<T>> {
            idx.iter().map(|&i| data.get(i).cloned()).collect()
        };
        Some((pick(&self.train)?, pick(&self.test)?))
    }
}

/// Shuffle `0..n` with `seed` and hold out `round(n * test_perc)` indices.
pub fn train_test_split(n: usize, test_perc: f64, seed: u64) -> Split {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));

    let n_test = ((n as f64) * test_perc.clamp(0.0, 1.0)).round() as usize;
    let train = indices.split_off(n_test.min(n));
    Split {
        train,
        test: indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[rstest]
    #[case(1000, 0.25, 250)]
    #[case(10, 0.25, 3)]
    #[case(7, 0.0, 0)]
    #[case(0, 0.25, 0)]
    fn test_share_is_rounded(#[case] n: usize, #[case] perc: f64, #[case] expected: usize) {
        let split = train_test_split(n, perc, 42);
        assert_eq!(split.test.len(), expected);
        assert_eq!(split.train.len(), n - expected);
    }

    #[test]
    fn seed_makes_split_reproducible() {
        assert_eq!(train_test_split(100, 0.25, 42), train_test_split(100, 0.25, 42));
        assert_ne!(train_test_split(100, 0.25, 42), train_test_split(100, 0.25, 7));
    }

    #[test]
    fn apply_partitions_data() {
        let data: Vec<u32> = (0..8).map(|i| i * 10).collect();
        let split = train_test_split(data.len(), 0.25, 1);
        let (train, test) = split.apply(&data).unwrap();
        assert_eq!(train.len(), 6);
        assert_eq!(test.len(), 2);
        assert!(test.iter().all(|v| !train.contains(v)));
    }

    #[test]
    fn apply_rejects_short_data() {
        let split = train_test_split(10, 0.25, 3);
        let data = vec![0u8; 4];
        assert!(split.apply(&data).is_none());
    }

    proptest! {
        #[test]
        fn split_is_a_partition(n in 0usize..500, perc in 0.0f64..0.99, seed in any::<u64>()) {
            let split = train_test_split(n, perc, seed);
            let all: HashSet<usize> = split.train.iter().chain(&split.test).copied().collect();
            prop_assert_eq!(all.len(), n);
            prop_assert_eq!(split.train.len() + split.test.len(), n);
            prop_assert!(all.iter().all(|&i| i < n));
        }
    }
}
