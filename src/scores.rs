//! Per-trace classifier scores and their log-likelihoods.
//!
//! A classifier emits, for every trace, either the probability `p` that the
//! trace was captured under a random key, or the logit `z` of that
//! probability. Each score is turned once, when its `Population` is built,
//! into the pair `(log P(fixed), log P(random))`:
//!
//! * probability domain: `ln(1 - p + 1e-5)` and `ln(p + 1e-5)`;
//! * logit domain: `log_sigmoid(-z)` and `log_sigmoid(z)`.
//!
//! A run only ever uses one of the two transforms.
use ndarray::*;

use crate::Hypothesis;
use crate::errors::NllError;

/// Offset added inside the logarithm of probability-domain scores.
pub const EPSILON: f64 = 1e-5;

/// Representation of the classifier's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreDomain {
    /// Sigmoid output in [0, 1].
    Probability,
    /// Pre-sigmoid output.
    Logit,
}

impl ScoreDomain {
    /// Returns `(log P(fixed), log P(random))` for a single score.
    pub fn log_likelihoods(self, score: f64) -> (f64, f64) {
        match self {
            ScoreDomain::Probability => ((1. - score + EPSILON).ln(),
                                         (score + EPSILON).ln()),
            ScoreDomain::Logit => (log_sigmoid(-score), log_sigmoid(score)),
        }
    }

    /// Checks that a score belongs to this domain.
    fn accepts(self, score: f64) -> bool {
        match self {
            ScoreDomain::Probability => score.is_finite() && (0. ..=1.).contains(&score),
            ScoreDomain::Logit => score.is_finite(),
        }
    }
}

/// `ln(1 / (1 + e^-z))` without overflow for large `|z|`.
pub fn log_sigmoid(z: f64) -> f64 {
    if z >= 0. {
        -(-z).exp().ln_1p()
    } else {
        z - z.exp().ln_1p()
    }
}

/// Summed log-likelihoods of both hypotheses over a set of traces.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Evidence {
    pub fixed: f64,
    pub random: f64,
}

impl Evidence {
    /// The hypothesis with the strictly larger likelihood, `None` on a tie.
    pub fn favours(&self) -> Option<Hypothesis> {
        if self.random > self.fixed {
            Some(Hypothesis::Random)
        } else if self.random < self.fixed {
            Some(Hypothesis::Fixed)
        } else {
            None
        }
    }
}

/// Scores of traces sharing the same ground truth.
///
/// Scores are validated and transformed on construction, and never
/// change afterwards.
#[derive(Debug, Clone)]
pub struct Population {
    hypothesis: Hypothesis,
    domain: ScoreDomain,
    scores: Array1<f64>,
    log_fixed: Array1<f64>,
    log_random: Array1<f64>,
}

impl Population {
    pub fn new(hypothesis: Hypothesis, scores: Array1<f64>, domain: ScoreDomain)
            -> Result<Population, NllError> {
        if let Some((index, &value)) = scores.iter()
                                             .enumerate()
                                             .find(|(_, s)| !domain.accepts(**s)) {
            return Err(NllError::InvalidScore { population: hypothesis, index, value });
        }

        let mut log_fixed = Array1::zeros(scores.len());
        let mut log_random = Array1::zeros(scores.len());
        for (s, lf, lr) in izip!(&scores, &mut log_fixed, &mut log_random) {
            let (f, r) = domain.log_likelihoods(*s);
            *lf = f;
            *lr = r;
        }

        Ok(Population {
            hypothesis,
            domain,
            scores,
            log_fixed,
            log_random,
        })
    }

    pub fn hypothesis(&self) -> Hypothesis {
        self.hypothesis
    }

    pub fn domain(&self) -> ScoreDomain {
        self.domain
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn scores(&self) -> ArrayView1<f64> {
        self.scores.view()
    }

    /// Sums the log-likelihoods of the traces at `indices`, in order.
    pub fn evidence(&self, indices: &[usize]) -> Evidence {
        let mut evidence = Evidence::default();
        for &i in indices {
            evidence.fixed += self.log_fixed[i];
            evidence.random += self.log_random[i];
        }
        evidence
    }

    /// Whether a single trace, on its own, is attributed to the right
    /// hypothesis.
    pub fn trace_is_correct(&self, index: usize) -> bool {
        self.evidence(&[index]).favours() == Some(self.hypothesis)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn log_sigmoid_is_stable() {
        assert!(approx_eq!(f64, log_sigmoid(0.), -(2f64).ln(), ulps = 2));
        assert!(approx_eq!(f64, log_sigmoid(800.), 0., epsilon = 1e-300));
        assert!(approx_eq!(f64, log_sigmoid(-800.), -800., ulps = 2));
        assert!(log_sigmoid(-800.).is_finite());
        // Agrees with the naive form where the latter is accurate.
        for &z in &[-5f64, -0.3, 0.7, 4.] {
            let naive = (1. / (1. + (-z).exp())).ln();
            assert!(approx_eq!(f64, log_sigmoid(z), naive, epsilon = 1e-12));
        }
    }

    #[test]
    fn probability_domain_uses_epsilon() {
        let (f, r) = ScoreDomain::Probability.log_likelihoods(0.);
        assert!(approx_eq!(f64, f, (1. + EPSILON).ln(), ulps = 2));
        assert!(approx_eq!(f64, r, EPSILON.ln(), ulps = 2));

        let (f, r) = ScoreDomain::Probability.log_likelihoods(1.);
        assert!(f.is_finite());
        assert!(approx_eq!(f64, r, (1. + EPSILON).ln(), ulps = 2));
    }

    #[test]
    fn invalid_scores_are_rejected() {
        let bad = [f64::NAN, f64::INFINITY, -0.1, 1.1];
        for &b in &bad {
            let scores = array![0.2, 0.4, b];
            match Population::new(Hypothesis::Fixed, scores, ScoreDomain::Probability) {
                Err(NllError::InvalidScore { population, index, .. }) => {
                    assert_eq!(population, Hypothesis::Fixed);
                    assert_eq!(index, 2);
                },
                other => panic!("expected InvalidScore, got {:?}", other),
            }
        }

        // Logits may be outside [0, 1], but must be finite.
        assert!(Population::new(Hypothesis::Random, array![-3., 12.],
                                ScoreDomain::Logit).is_ok());
        assert!(Population::new(Hypothesis::Random, array![-3., f64::NEG_INFINITY],
                                ScoreDomain::Logit).is_err());
    }

    #[test]
    fn evidence_sums_selected_traces() {
        let pop = Population::new(Hypothesis::Random, array![0.9, 0.2, 0.6],
                                  ScoreDomain::Probability).unwrap();
        let e = pop.evidence(&[0, 2]);
        assert!(approx_eq!(f64, e.random,
                           (0.9 + EPSILON).ln() + (0.6 + EPSILON).ln(), ulps = 4));
        assert!(approx_eq!(f64, e.fixed,
                           (0.1 + EPSILON).ln() + (0.4 + EPSILON).ln(), epsilon = 1e-12));
        assert_eq!(e.favours(), Some(Hypothesis::Random));

        assert!(pop.trace_is_correct(0));
        assert!(!pop.trace_is_correct(1));
        assert_eq!(pop.evidence(&[]).favours(), None);
    }

    #[test]
    fn neutral_scores_tie() {
        for &(domain, neutral) in &[(ScoreDomain::Probability, 0.5), (ScoreDomain::Logit, 0.)] {
            let pop = Population::new(Hypothesis::Fixed,
                                      Array1::from_elem(4, neutral),
                                      domain).unwrap();
            assert_eq!(pop.evidence(&[0, 1, 3]).favours(), None);
        }
    }
}
