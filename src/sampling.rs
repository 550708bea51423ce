//! Reproducible subsampling of populations.
//!
//! Every trial `j` owns a seed, `seed + j`. Each population is drawn from
//! its own generator initialised with that seed, so the two draws of a
//! trial are paired. Ties between the two hypotheses are settled with a
//! separate generator derived from the same trial seed.
use rand::Rng;
use rand::SeedableRng;
use rand::seq::index;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Decorrelates the tie-breaking stream from the sampling stream.
const TIE_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// How the subsets of successive window sizes relate within a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sampling {
    /// Every window size draws a fresh subset, from a generator reseeded
    /// with the trial seed.
    Resampled,
    /// One random ordering per trial; window `k` takes its first `k`
    /// traces, so each window extends the previous one.
    Nested,
}

/// Seed of trial `j`.
pub fn trial_seed(seed: u64, j: usize) -> u64 {
    seed.wrapping_add(j as u64)
}

/// Generator used to subsample a population in a trial.
pub fn trial_rng(trial_seed: u64) -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(trial_seed)
}

/// Generator used to settle ties in a trial.
pub fn tie_rng(trial_seed: u64) -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(trial_seed ^ TIE_STREAM)
}

/// Draws `amount` distinct indices from `0..length`, in random order.
///
/// Panics if `amount > length`; callers check population sizes first.
pub fn draw_subset<R: Rng + ?Sized>(rng: &mut R, length: usize, amount: usize) -> Vec<usize> {
    index::sample(rng, length, amount).into_vec()
}

/// Draws the subset used for window `window` of a trial.
///
/// `max_window` is only relevant for `Sampling::Nested`, where the
/// ordering is always drawn at full length so that smaller windows are
/// prefixes of larger ones.
pub fn window_subset(sampling: Sampling, trial_seed: u64, length: usize,
                     window: usize, max_window: usize) -> Vec<usize> {
    let mut rng = trial_rng(trial_seed);
    match sampling {
        Sampling::Resampled => draw_subset(&mut rng, length, window),
        Sampling::Nested => {
            let mut ordering = draw_subset(&mut rng, length, max_window);
            ordering.truncate(window);
            ordering
        },
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn subsets_are_reproducible() {
        for &(length, window) in &[(10, 1), (10, 10), (5000, 30), (40, 17)] {
            let a = window_subset(Sampling::Resampled, 7, length, window, window);
            let b = window_subset(Sampling::Resampled, 7, length, window, window);
            assert_eq!(a, b);
            assert_eq!(a.len(), window);
            assert!(a.iter().all(|&i| i < length));
            assert_eq!(a.iter().unique().count(), window);
        }
    }

    #[test]
    fn trials_draw_different_subsets() {
        let subsets = (0..20).map(|j| window_subset(Sampling::Resampled,
                                                    trial_seed(0, j), 5000, 5, 5))
                             .collect::<Vec<_>>();
        assert!(subsets.iter().unique().count() > 1);
    }

    #[test]
    fn nested_windows_are_prefixes() {
        let max_window = 12;
        let full = window_subset(Sampling::Nested, 3, 100, max_window, max_window);
        assert_eq!(full.iter().unique().count(), max_window);
        for k in 1..=max_window {
            let sub = window_subset(Sampling::Nested, 3, 100, k, max_window);
            assert_eq!(&sub[..], &full[..k]);
        }
    }

    #[test]
    fn resampled_windows_are_fresh_draws() {
        let max_window = 30;
        let subsets = (1..=max_window).map(|k| window_subset(Sampling::Resampled, 3, 5000,
                                                              k, max_window))
                                      .collect::<Vec<_>>();
        for (k, sub) in subsets.iter().enumerate() {
            assert_eq!(sub.len(), k + 1);
        }
        assert!(subsets.windows(2).any(|w| w[0][..] != w[1][..w[0].len()]));
    }

    #[test]
    fn trial_seeds() {
        assert_eq!(trial_seed(0, 4), 4);
        assert_eq!(trial_seed(10, 4), 14);
        assert_eq!(trial_seed(u64::MAX, 1), 0);
    }

    #[test]
    fn tie_stream_differs_from_sampling_stream() {
        let a: u64 = trial_rng(5).random();
        let b: u64 = tie_rng(5).random();
        assert_ne!(a, b);
    }
}
