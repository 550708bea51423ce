//! The seam to the trained classifier.
//!
//! Training, network topology and model persistence live outside this
//! crate; all the likelihood test needs is a way to turn traces into
//! scores.
use ndarray::*;

use crate::Hypothesis;
use crate::errors::NllError;
use crate::scores::{Population, ScoreDomain};

/// A trained fixed-vs-random classifier.
pub trait Classifier {
    /// Domain of the scores returned by `predict()`.
    fn domain(&self) -> ScoreDomain;
    /// Scores every row of `traces`.
    fn predict(&self, traces: &ArrayView2<f64>) -> Result<Array1<f64>, NllError>;
}

/// Scores `traces` in batches of at most `batch_size` rows.
pub fn score_traces<C>(classifier: &C, traces: &ArrayView2<f64>, batch_size: usize)
        -> Result<Array1<f64>, NllError>
where C: Classifier + ?Sized {
    if batch_size == 0 {
        return Err(NllError::InvalidConfig("batch size must be positive".to_string()));
    }

    let mut scores = Vec::with_capacity(traces.nrows());
    for batch in traces.axis_chunks_iter(Axis(0), batch_size) {
        let batch_scores = classifier.predict(&batch)?;
        if batch_scores.len() != batch.nrows() {
            return Err(NllError::InvalidConfig(
                    format!("classifier returned {} scores for {} traces",
                            batch_scores.len(), batch.nrows())));
        }
        scores.extend(batch_scores.iter().cloned());
    }
    Ok(Array1::from(scores))
}

/// Scores `traces` and wraps them into a population.
pub fn score_population<C>(classifier: &C, hypothesis: Hypothesis,
                           traces: &ArrayView2<f64>, batch_size: usize)
        -> Result<Population, NllError>
where C: Classifier + ?Sized {
    let scores = score_traces(classifier, traces, batch_size)?;
    debug!("scored {} {} traces", scores.len(), hypothesis);
    Population::new(hypothesis, scores, classifier.domain())
}

/// Plain test accuracy of the classifier: the fraction of traces that,
/// taken one at a time, favour their true hypothesis.
pub fn single_trace_accuracy(fixed: &Population, random: &Population) -> f64 {
    let total = fixed.len() + random.len();
    if total == 0 {
        return 0.;
    }
    let correct = (0..fixed.len()).filter(|&i| fixed.trace_is_correct(i)).count()
                  + (0..random.len()).filter(|&i| random.trace_is_correct(i)).count();
    correct as f64 / total as f64
}
