//! Likelihood-ratio decisions over accumulated traces.
//!
//! A trial draws, for every window size `k`, a subset of `k` traces from
//! each population and sums the log-likelihood of both hypotheses over it.
//! The decision for a population is correct when the summed evidence
//! strictly favours its true hypothesis. Trials are independent, so they
//! run on the rayon pool; each trial only touches its own tally.
use rand::Rng;
use rayon::prelude::*;
use indicatif::ProgressBar;

use crate::Hypothesis;
use crate::errors::NllError;
use crate::scores::{Evidence, Population};
use crate::sampling::{Sampling, tie_rng, trial_seed, window_subset};

/// What to do when both hypotheses are exactly as likely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieRule {
    /// Settle the tie with a fair coin from the trial's tie stream.
    CoinFlip,
    /// Count the decision as incorrect.
    Incorrect,
}

/// Whether `evidence` leads to the right decision for a population of
/// ground truth `truth`.
pub fn decide<R: Rng>(evidence: &Evidence, truth: Hypothesis,
                       tie_rule: TieRule, tie_rng: &mut R) -> bool {
    match evidence.favours() {
        Some(h) => h == truth,
        None => match tie_rule {
            TieRule::CoinFlip => tie_rng.random_bool(0.5),
            TieRule::Incorrect => false,
        },
    }
}

/// Correct decisions per window size, index `k - 1` for window `k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowTally {
    pub correct_fixed: Vec<usize>,
    pub correct_random: Vec<usize>,
}

impl WindowTally {
    pub fn new(max_window: usize) -> WindowTally {
        WindowTally {
            correct_fixed: vec![0; max_window],
            correct_random: vec![0; max_window],
        }
    }

    pub fn merge(mut self, other: WindowTally) -> WindowTally {
        for (a, b) in self.correct_fixed.iter_mut().zip(other.correct_fixed) {
            *a += b;
        }
        for (a, b) in self.correct_random.iter_mut().zip(other.correct_random) {
            *a += b;
        }
        self
    }
}

/// The likelihood-ratio test for a pair of populations.
pub struct LikelihoodTest<'a> {
    fixed: &'a Population,
    random: &'a Population,
    max_window: usize,
    sampling: Sampling,
    tie_rule: TieRule,
}

impl<'a> LikelihoodTest<'a> {
    /// Checks that both populations can feed windows up to `max_window`.
    pub fn new(fixed: &'a Population, random: &'a Population, max_window: usize,
               sampling: Sampling, tie_rule: TieRule)
            -> Result<LikelihoodTest<'a>, NllError> {
        if fixed.hypothesis() != Hypothesis::Fixed || random.hypothesis() != Hypothesis::Random {
            return Err(NllError::InvalidConfig(
                    "populations must be passed as (fixed, random)".to_string()));
        }
        if fixed.domain() != random.domain() {
            return Err(NllError::InvalidConfig(
                    "both populations must use the same score domain".to_string()));
        }
        if max_window == 0 {
            return Err(NllError::InvalidConfig("max window must be positive".to_string()));
        }
        for pop in &[fixed, random] {
            if pop.len() < max_window {
                return Err(NllError::InsufficientData {
                    population: pop.hypothesis(),
                    window: max_window,
                    available: pop.len(),
                });
            }
        }

        Ok(LikelihoodTest {
            fixed,
            random,
            max_window,
            sampling,
            tie_rule,
        })
    }

    pub fn max_window(&self) -> usize {
        self.max_window
    }

    fn subset(&self, pop: &Population, seed: u64, window: usize) -> Vec<usize> {
        window_subset(self.sampling, seed, pop.len(), window, self.max_window)
    }

    /// Runs one trial for every window size, adding its correct decisions
    /// to `tally`.
    pub fn run_trial(&self, seed: u64, tally: &mut WindowTally) {
        let mut ties = tie_rng(seed);

        for k in 1..=self.max_window {
            let fixed_evidence = self.fixed.evidence(&self.subset(self.fixed, seed, k));
            let random_evidence = self.random.evidence(&self.subset(self.random, seed, k));

            if decide(&random_evidence, Hypothesis::Random, self.tie_rule, &mut ties) {
                tally.correct_random[k - 1] += 1;
            }
            if decide(&fixed_evidence, Hypothesis::Fixed, self.tie_rule, &mut ties) {
                tally.correct_fixed[k - 1] += 1;
            }
        }
    }

    /// Runs trials `0..trials` on the current rayon pool.
    ///
    /// Counts are summed as integers, so the result does not depend on
    /// how trials are scheduled.
    pub fn run_trials(&self, trials: usize, seed: u64, progress: &ProgressBar) -> WindowTally {
        (0..trials).into_par_iter()
                   .fold(|| WindowTally::new(self.max_window),
                         |mut tally, j| {
                             self.run_trial(trial_seed(seed, j), &mut tally);
                             progress.inc(1);
                             tally
                         })
                   .reduce(|| WindowTally::new(self.max_window), WindowTally::merge)
    }
}
