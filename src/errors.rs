//! Error type shared by the library and the `nll` binary.
use std::error::Error;
use std::fmt;
use std::io;

use crate::Hypothesis;

/// Errors raised while loading scores or running the likelihood test.
#[derive(Debug)]
pub enum NllError {
    /// A window asks for more traces than a population holds.
    InsufficientData {
        population: Hypothesis,
        window: usize,
        available: usize,
    },
    /// A score is NaN/Inf, or outside [0, 1] in the probability domain.
    InvalidScore {
        population: Hypothesis,
        index: usize,
        value: f64,
    },
    InvalidConfig(String),
    /// A score file could not be read or has the wrong shape.
    Load { path: String, reason: String },
    Io(io::Error),
    Csv(csv::Error),
}

impl fmt::Display for NllError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NllError::InsufficientData { population, window, available } => write!(
                f,
                "window of {} traces exceeds the {} traces of the {} population",
                window, available, population
            ),
            NllError::InvalidScore { population, index, value } => write!(
                f,
                "invalid score {} at index {} of the {} population",
                value, index, population
            ),
            NllError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            NllError::Load { path, reason } => write!(f, "could not load {}: {}", path, reason),
            NllError::Io(e) => write!(f, "i/o error: {}", e),
            NllError::Csv(e) => write!(f, "csv error: {}", e),
        }
    }
}

impl Error for NllError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NllError::Io(e) => Some(e),
            NllError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for NllError {
    fn from(e: io::Error) -> Self {
        NllError::Io(e)
    }
}

impl From<csv::Error> for NllError {
    fn from(e: csv::Error) -> Self {
        NllError::Csv(e)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_population() {
        let e = NllError::InsufficientData {
            population: Hypothesis::Random,
            window: 31,
            available: 30,
        };
        assert_eq!(e.to_string(),
                   "window of 31 traces exceeds the 30 traces of the random population");

        let e = NllError::InvalidScore {
            population: Hypothesis::Fixed,
            index: 4,
            value: 1.5,
        };
        assert_eq!(e.to_string(), "invalid score 1.5 at index 4 of the fixed population");
    }

    #[test]
    fn io_errors_keep_their_source() {
        let e: NllError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(e.source().is_some());
    }
}
