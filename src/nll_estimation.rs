//! Likelihood-test estimation routines.
//!
//! `run_nll()` takes two populations and an explicit `NllConfig`, runs the
//! trials on a dedicated rayon pool and returns the accuracy curve.
use std::fs::File;
use std::time::{Duration, Instant};
use indicatif::{ProgressBar, ProgressStyle};

use crate::errors::NllError;
use crate::scores::Population;
use crate::sampling::Sampling;
use crate::likelihood::{LikelihoodTest, TieRule};
use crate::curve::{AccuracyCurve, WindowAccuracy};

/// Parameters of a likelihood-test run.
#[derive(Debug, Clone, PartialEq)]
pub struct NllConfig {
    /// Largest number of accumulated traces.
    pub max_window: usize,
    /// Trials per window size.
    pub trials: usize,
    /// Trial `j` is seeded with `seed + j`.
    pub seed: u64,
    pub sampling: Sampling,
    pub tie_rule: TieRule,
    /// Worker threads; 0 lets rayon decide.
    pub threads: usize,
    /// Show a progress bar on stderr.
    pub progress: bool,
}

impl Default for NllConfig {
    fn default() -> NllConfig {
        NllConfig {
            max_window: 30,
            trials: 5000,
            seed: 0,
            sampling: Sampling::Resampled,
            tie_rule: TieRule::CoinFlip,
            threads: 0,
            progress: true,
        }
    }
}

impl NllConfig {
    pub fn max_window(mut self, max_window: usize) -> NllConfig {
        self.max_window = max_window;
        self
    }

    pub fn trials(mut self, trials: usize) -> NllConfig {
        self.trials = trials;
        self
    }

    pub fn seed(mut self, seed: u64) -> NllConfig {
        self.seed = seed;
        self
    }

    pub fn sampling(mut self, sampling: Sampling) -> NllConfig {
        self.sampling = sampling;
        self
    }

    pub fn tie_rule(mut self, tie_rule: TieRule) -> NllConfig {
        self.tie_rule = tie_rule;
        self
    }

    pub fn threads(mut self, threads: usize) -> NllConfig {
        self.threads = threads;
        self
    }

    pub fn progress(mut self, progress: bool) -> NllConfig {
        self.progress = progress;
        self
    }
}

/// Log the curve either to a .csv file or into a Vec.
pub enum Logger {
    LogFile(csv::Writer<File>),
    LogVec(Vec<WindowAccuracy>),
}

impl Logger {
    pub fn to_file(path: &str) -> Result<Logger, NllError> {
        Ok(Logger::LogFile(csv::Writer::from_path(path)?))
    }

    fn log(&mut self, point: &WindowAccuracy) -> Result<(), NllError> {
        match self {
            Logger::LogFile(writer) => writer.serialize(point)?,
            Logger::LogVec(v) => v.push(point.clone()),
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), NllError> {
        if let Logger::LogFile(writer) = self {
            writer.flush()?;
        }
        Ok(())
    }
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template(
            "{elapsed_precise} {wide_bar} {pos}/{len} trials ({eta})") {
        bar.set_style(style);
    }
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Runs the likelihood test for windows `1..=config.max_window`.
///
/// Fails with `InsufficientData` if a population holds fewer than
/// `max_window` scores, and with `InvalidConfig` on zero trials or
/// mismatched populations.
pub fn run_nll(fixed: &Population, random: &Population, config: &NllConfig,
               logger: &mut Option<Logger>) -> Result<AccuracyCurve, NllError> {
    if config.trials == 0 {
        return Err(NllError::InvalidConfig("number of trials must be positive".to_string()));
    }
    let test = LikelihoodTest::new(fixed, random, config.max_window,
                                   config.sampling, config.tie_rule)?;

    let pool = rayon::ThreadPoolBuilder::new()
                   .num_threads(config.threads)
                   .build()
                   .map_err(|e| NllError::InvalidConfig(e.to_string()))?;
    info!("{} fixed and {} random scores, windows 1..={}, {} trials each, {} threads",
          fixed.len(), random.len(), config.max_window, config.trials,
          pool.current_num_threads());
    debug!("{:?} sampling, ties: {:?}, seed {}", config.sampling, config.tie_rule,
           config.seed);

    let start = Instant::now();
    let progress = progress_bar(config.trials, config.progress);
    let tally = pool.install(|| test.run_trials(config.trials, config.seed, &progress));
    progress.finish_and_clear();
    info!("likelihood test done in {:.2?}", start.elapsed());

    let curve = AccuracyCurve::from_tally(&tally, config.trials);
    if let Some(logger) = logger {
        for point in curve.points() {
            logger.log(point)?;
        }
        logger.finish()?;
    }
    Ok(curve)
}
