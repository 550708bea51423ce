//! nll-distinguisher evaluates how well a binary classifier separates
//! side-channel traces captured under a fixed key from traces captured
//! under random keys, as a function of how many traces an attacker can
//! accumulate.
//!
//! The classifier (typically a CNN or a fully-connected network trained on
//! oscilloscope traces of AES, Keccak or NTRU implementations) is external
//! to this crate: it only has to produce one score per trace, either the
//! probability that the trace belongs to the random-key population, or the
//! corresponding logit.
//!
//! For every window size `k`, many trials draw `k` traces from each
//! population, sum the log-likelihood of both hypotheses over them, and
//! check that the likelihood-ratio decision picks the right hypothesis.
//! The fraction of correct decisions over all trials gives an accuracy
//! curve indexed by the number of traces.
//!
//! # Getting started
//!
//! The `nll` binary takes two score files, one per population:
//!
//! ```text
//! nll probability [options] <fixed> <random>
//! nll logit [options] <fixed> <random>
//! ```
//!
//! and prints one line per window size:
//!
//! ```text
//! Trace num : 1 | Nll test accuracy : 0.7312
//! Trace num : 2 | Nll test accuracy : 0.8049
//! ...
//! ```
//!
//! For usage instructions please refer to the help screen: `nll -h`.
//!
//! # Library
//!
//! ```
//! #[macro_use(array)]
//! extern crate ndarray;
//! extern crate nll_distinguisher;
//!
//! # fn main() {
//! use nll_distinguisher::*;
//!
//! let fixed = Population::new(Hypothesis::Fixed, array![0.01, 0.02, 0.05, 0.01],
//!                             ScoreDomain::Probability).unwrap();
//! let random = Population::new(Hypothesis::Random, array![0.99, 0.97, 0.96, 0.99],
//!                              ScoreDomain::Probability).unwrap();
//!
//! let config = NllConfig::default().max_window(3).trials(10).progress(false);
//! let curve = run_nll(&fixed, &random, &config, &mut None).unwrap();
//!
//! assert_eq!(curve.accuracy(1), Some(1.0));
//! assert_eq!(curve.report_lines()[2],
//!            "Trace num : 3 | Nll test accuracy : 1.0");
//! # }
//! ```
extern crate csv;
extern crate ndarray;
#[macro_use]
extern crate itertools;
#[macro_use]
extern crate log;
extern crate ordered_float;
extern crate float_cmp;
extern crate rayon;

use std::fmt;

pub mod errors;
pub mod scores;
pub mod sampling;
pub mod likelihood;
pub mod curve;
pub mod classifier;
pub mod security_measures;
pub mod nll_estimation;
pub mod utils;
#[cfg(feature = "python-module")]
mod python_module;

pub use errors::NllError;
pub use scores::{Population, ScoreDomain, Evidence, EPSILON};
pub use sampling::Sampling;
pub use likelihood::{LikelihoodTest, TieRule, WindowTally};
pub use curve::{AccuracyCurve, WindowAccuracy};
pub use classifier::{Classifier, score_traces, score_population, single_trace_accuracy};
pub use security_measures::LeakageMeasures;
pub use nll_estimation::{NllConfig, Logger, run_nll};

/// Ground truth of a population: the key the traces were captured under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hypothesis {
    Fixed,
    Random,
}

impl fmt::Display for Hypothesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hypothesis::Fixed => write!(f, "fixed"),
            Hypothesis::Random => write!(f, "random"),
        }
    }
}
