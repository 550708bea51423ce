//! The accuracy curve: likelihood-test accuracy indexed by the number of
//! accumulated traces.
use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::likelihood::WindowTally;

/// Accuracy of the likelihood test for one window size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowAccuracy {
    pub window: usize,
    pub correct_fixed: usize,
    pub correct_random: usize,
    pub trials: usize,
    pub accuracy: f64,
}

impl WindowAccuracy {
    pub fn new(window: usize, correct_fixed: usize, correct_random: usize,
               trials: usize) -> WindowAccuracy {
        let accuracy = (correct_fixed + correct_random) as f64 / (2 * trials) as f64;
        WindowAccuracy {
            window,
            correct_fixed,
            correct_random,
            trials,
            accuracy,
        }
    }

    /// Monte-Carlo standard error of `accuracy`.
    pub fn standard_error(&self) -> f64 {
        let p = self.accuracy;
        (p * (1. - p) / (2 * self.trials) as f64).sqrt()
    }

    pub fn report_line(&self) -> String {
        format!("Trace num : {} | Nll test accuracy : {}",
                self.window, truncated_repr(self.accuracy, 6))
    }
}

/// Accuracy for window sizes `1..=max_window`.
#[derive(Debug, Clone, PartialEq)]
pub struct AccuracyCurve {
    points: Vec<WindowAccuracy>,
}

impl AccuracyCurve {
    pub fn from_tally(tally: &WindowTally, trials: usize) -> AccuracyCurve {
        let points = tally.correct_fixed.iter()
                                        .zip(&tally.correct_random)
                                        .enumerate()
                                        .map(|(i, (&f, &r))| WindowAccuracy::new(i + 1, f, r, trials))
                                        .collect();
        AccuracyCurve { points }
    }

    pub fn points(&self) -> &[WindowAccuracy] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, window: usize) -> Option<&WindowAccuracy> {
        match window {
            0 => None,
            w => self.points.get(w - 1),
        }
    }

    pub fn accuracy(&self, window: usize) -> Option<f64> {
        self.get(window).map(|p| p.accuracy)
    }

    pub fn last(&self) -> Option<&WindowAccuracy> {
        self.points.last()
    }

    /// The most accurate window; the smallest one if several are tied.
    pub fn best(&self) -> Option<&WindowAccuracy> {
        self.points.iter()
                   .rev()
                   .max_by_key(|p| OrderedFloat::from(p.accuracy))
    }

    /// The smallest number of traces for which accuracy reaches `target`.
    pub fn traces_to_reach(&self, target: f64) -> Option<usize> {
        self.points.iter()
                   .find(|p| p.accuracy >= target)
                   .map(|p| p.window)
    }

    pub fn report_lines(&self) -> Vec<String> {
        self.points.iter()
                   .map(WindowAccuracy::report_line)
                   .collect()
    }
}

/// Formats `x` as its shortest round-trip decimal form, keeping a trailing
/// `.0` on integral values and a two-digit exponent below 1e-4, and cuts
/// the result to `width` characters.
pub fn truncated_repr(x: f64, width: usize) -> String {
    let repr = if x.fract() == 0. && x.abs() < 1e16 {
        format!("{:.1}", x)
    } else if x != 0. && x.abs() < 1e-4 {
        let sci = format!("{:e}", x);
        match sci.split_once('e') {
            Some((mantissa, exp)) => match exp.strip_prefix('-') {
                Some(digits) => format!("{}e-{:0>2}", mantissa, digits),
                None => format!("{}e+{:0>2}", mantissa, exp),
            },
            None => sci,
        }
    } else {
        format!("{}", x)
    };
    repr.chars().take(width).collect()
}
