//! Leakage measures derived from the accuracy of the likelihood test.
//!
//! We write R for the error of the test at some window size (1 - accuracy)
//! and G for the error of random guessing. With two equally likely
//! hypotheses, G = 0.5.
//!
//! # References
//! [1] M. S. Alvim et al. "Additive and multiplicative notions of leakage,
//!     and their capacities." CSF, 2014.
//! [2] G. Cherubin "Bayes, not Naïve: Security Bounds on Website
//!     Fingerprinting Defenses." PoPETS, 2017
use std::fmt;
use float_cmp::approx_eq;

/// Random guessing error for the balanced fixed-vs-random game.
pub const BALANCED_GUESSING_ERROR: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeakageMeasures {
    /// R.
    pub error: f64,
    /// 1 - R/G; 0 for a blind guess, 1 for a perfect distinguisher.
    pub advantage: f64,
    /// G - R [1].
    pub additive: f64,
    /// (1 - R) / (1 - G) [1].
    pub multiplicative: f64,
    /// R / G [2].
    pub bayes_security: f64,
    /// log2 of the multiplicative leakage.
    pub min_entropy: f64,
}

impl LeakageMeasures {
    pub fn new(accuracy: f64, random_guessing: f64) -> LeakageMeasures {
        assert!(!approx_eq!(f64, random_guessing, 0.),
                "Random guessing error cannot be 0");
        let error = 1. - accuracy;
        let multiplicative = (1. - error) / (1. - random_guessing);

        LeakageMeasures {
            error,
            advantage: 1. - error / random_guessing,
            additive: random_guessing - error,
            multiplicative,
            bayes_security: error / random_guessing,
            min_entropy: multiplicative.log2(),
        }
    }

    /// Measures for the two-hypothesis test at the given accuracy.
    pub fn from_accuracy(accuracy: f64) -> LeakageMeasures {
        LeakageMeasures::new(accuracy, BALANCED_GUESSING_ERROR)
    }
}

impl fmt::Display for LeakageMeasures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Distinguishing advantage: {}", self.advantage)?;
        writeln!(f, "Multiplicative Leakage: {}", self.multiplicative)?;
        writeln!(f, "Additive Leakage: {}", self.additive)?;
        writeln!(f, "Bayes security measure: {}", self.bayes_security)?;
        write!(f, "Min-entropy Leakage: {}", self.min_entropy)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blind_guess_leaks_nothing() {
        let m = LeakageMeasures::from_accuracy(0.5);
        assert_eq!(m.advantage, 0.);
        assert_eq!(m.additive, 0.);
        assert_eq!(m.multiplicative, 1.);
        assert_eq!(m.bayes_security, 1.);
        assert_eq!(m.min_entropy, 0.);
    }

    #[test]
    fn perfect_distinguisher() {
        let m = LeakageMeasures::from_accuracy(1.);
        assert_eq!(m.error, 0.);
        assert_eq!(m.advantage, 1.);
        assert_eq!(m.multiplicative, 2.);
        assert_eq!(m.min_entropy, 1.);
        assert_eq!(m.bayes_security, 0.);
    }

    #[test]
    fn intermediate_accuracy() {
        let m = LeakageMeasures::from_accuracy(0.75);
        assert!(approx_eq!(f64, m.advantage, 0.5, ulps = 2));
        assert!(approx_eq!(f64, m.additive, 0.25, ulps = 2));
        assert!(approx_eq!(f64, m.multiplicative, 1.5, ulps = 2));
        assert!(approx_eq!(f64, m.min_entropy, 1.5f64.log2(), ulps = 2));
    }

    #[test]
    #[should_panic]
    fn zero_guessing_error() {
        LeakageMeasures::new(0.9, 0.);
    }
}
