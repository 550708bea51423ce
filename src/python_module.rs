//! A wrapper to allow running the likelihood test from Python.
//!
//! Wraps the function `nll_estimation::run_nll()`.
use numpy::*;
use pyo3::prelude::*;
use pyo3::exceptions::PyValueError;

use crate::Hypothesis;
use crate::scores::{Population, ScoreDomain};
use crate::sampling::Sampling;
use crate::likelihood::TieRule;
use crate::nll_estimation::{NllConfig, run_nll};
use crate::errors::NllError;

fn to_py_err(e: NllError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Likelihood-ratio evaluation of fixed-vs-random side-channel classifiers.
/// Given the scores a classifier assigned to held-out fixed-key and
/// random-key traces, it measures how often accumulating k traces picks
/// the right population.
#[pymodule(nll_distinguisher)]
fn pynll(_py: Python, m: &PyModule) -> PyResult<()> {
    /// run_nll(fixed, random, domain, max_window, trials, seed, nested,
    /// strict_ties)
    /// --
    ///
    /// Run the likelihood test and return the accuracy for 1..max_window
    /// traces.
    ///
    /// Keyword arguments:
    /// fixed : scores of the fixed-key traces
    /// random : scores of the random-key traces
    /// domain : "probability" for sigmoid outputs, "logit" for logits
    /// max_window : largest number of accumulated traces
    /// trials : trials per number of traces
    /// seed : trial j is seeded with seed + j
    /// nested : grow one ordering per trial instead of redrawing subsets
    /// strict_ties : count ties as errors instead of flipping a coin
    #[pyfn(m, "run_nll")]
    fn run_nll_py(_py: Python,
                  fixed: &PyArray1<f64>, random: &PyArray1<f64>,
                  domain: &str, max_window: usize, trials: usize,
                  seed: u64, nested: bool, strict_ties: bool)
            -> PyResult<Vec<f64>> {

        let domain = match domain {
            "probability" => ScoreDomain::Probability,
            "logit" => ScoreDomain::Logit,
            other => return Err(PyValueError::new_err(
                        format!("unknown score domain: {}", other))),
        };

        let fixed = Population::new(Hypothesis::Fixed,
                                    fixed.readonly().as_array().to_owned(),
                                    domain).map_err(to_py_err)?;
        let random = Population::new(Hypothesis::Random,
                                     random.readonly().as_array().to_owned(),
                                     domain).map_err(to_py_err)?;

        let config = NllConfig::default()
                        .max_window(max_window)
                        .trials(trials)
                        .seed(seed)
                        .sampling(if nested { Sampling::Nested } else { Sampling::Resampled })
                        .tie_rule(if strict_ties { TieRule::Incorrect } else { TieRule::CoinFlip })
                        .progress(false);

        let curve = run_nll(&fixed, &random, &config, &mut None).map_err(to_py_err)?;
        Ok(curve.points().iter().map(|p| p.accuracy).collect())
    }
    Ok(())
}
