//! `nll` runs the likelihood-ratio test on the scores a fixed-vs-random
//! classifier assigned to two held-out populations of side-channel traces.
//!
//! # Getting started
//!
//! `nll` takes two score files, one per population, holding one score per
//! trace:
//!
//!     fixed.npy   scores of traces captured under the fixed key
//!     random.npy  scores of traces captured under random keys
//!
//! Scores are either sigmoid outputs (`nll probability`), i.e. the
//! probability that a trace comes from the random-key population, or the
//! logits that precede the sigmoid (`nll logit`). Files can be `.npy`
//! (f32/f64, vector or single column) or headerless CSV whose first column
//! is the score.
//!
//! The general syntax is:
//!
//!     nll (probability | logit) [options] <fixed> <random>
//!
//! For every window size `k` from 1 to `--max-window`, `--trials` trials
//! draw `k` traces from each population and check whether summing the
//! log-likelihoods of both hypotheses over them points at the right one.
//! One line per window reports the fraction of correct decisions.
//!
//! ## Further options
//!
//! By default every window draws its own subset, from a generator reseeded
//! with the trial index. With `--nested`, each trial draws one ordering and
//! window `k` uses its first `k` traces.
//!
//! Exact ties between the two hypotheses are settled with a fair coin;
//! `--strict-ties` counts them as errors instead.
//!
//! `RUST_LOG=info` (or `debug`) prints diagnostics on stderr.
extern crate docopt;
extern crate serde;
extern crate env_logger;

extern crate nll_distinguisher;

use std::process;
use docopt::Docopt;
use serde::Deserialize;

use nll_distinguisher::*;
use nll_distinguisher::curve::truncated_repr;
use nll_distinguisher::utils::{load_scores, keep_first, parse_targets};


const USAGE: &'static str = "
Likelihood-ratio test of a fixed-vs-random trace classifier.

Usage: nll probability [options] <fixed> <random>
       nll logit [options] <fixed> <random>
       nll (--help | --version)

Options:
    --max-window=<k>            Largest number of accumulated traces
                                [default: 30].
    --trials=<t>                Trials per number of traces [default: 5000].
    --data-num=<n>              Only use the first n scores of each
                                population.
    --seed=<s>                  Trial j is seeded with s + j [default: 0].
    --nested                    Grow one random ordering per trial instead
                                of redrawing a subset for every window.
    --strict-ties               Count ties between the two hypotheses as
                                errors instead of flipping a coin.
    --threads=<n>               Worker threads; 0 for one per core
                                [default: 0].
    --target=<a>                Report how many traces are needed to reach
                                accuracy a. Multiple targets can be
                                specified as comma-separated values
                                [default: 0.9].
    --logfile=<f>               Write the accuracy curve to this CSV file.
    --no-progress               Don't show a progress bar.
    -h, --help                  Show help.
    --version                   Show the version.
";

#[derive(Deserialize)]
struct Args {
    cmd_probability: bool,
    cmd_logit: bool,
    flag_max_window: usize,
    flag_trials: usize,
    flag_data_num: Option<usize>,
    flag_seed: u64,
    flag_nested: bool,
    flag_strict_ties: bool,
    flag_threads: usize,
    flag_target: String,
    flag_logfile: Option<String>,
    flag_no_progress: bool,
    arg_fixed: String,
    arg_random: String,
}

impl Args {
    fn domain(&self) -> ScoreDomain {
        if self.cmd_logit {
            ScoreDomain::Logit
        } else {
            debug_assert!(self.cmd_probability);
            ScoreDomain::Probability
        }
    }

    fn config(&self) -> NllConfig {
        let sampling = if self.flag_nested { Sampling::Nested } else { Sampling::Resampled };
        let tie_rule = if self.flag_strict_ties { TieRule::Incorrect } else { TieRule::CoinFlip };

        NllConfig::default().max_window(self.flag_max_window)
                            .trials(self.flag_trials)
                            .seed(self.flag_seed)
                            .sampling(sampling)
                            .tie_rule(tie_rule)
                            .threads(self.flag_threads)
                            .progress(!self.flag_no_progress)
    }
}

fn load_population(fname: &str, hypothesis: Hypothesis, args: &Args)
        -> Result<Population, NllError> {
    let scores = keep_first(load_scores(fname)?, args.flag_data_num);
    Population::new(hypothesis, scores, args.domain())
}

fn run(args: &Args) -> Result<(), NllError> {
    let targets = parse_targets(&args.flag_target)?;
    let config = args.config();

    let fixed = load_population(&args.arg_fixed, Hypothesis::Fixed, args)?;
    let random = load_population(&args.arg_random, Hypothesis::Random, args)?;

    let mut logger = match args.flag_logfile {
        Some(ref path) => Some(Logger::to_file(path)?),
        None => None,
    };

    println!("test accuracy : {}",
             truncated_repr(single_trace_accuracy(&fixed, &random), 6));
    println!();
    println!("Likelihood comparison");
    let curve = run_nll(&fixed, &random, &config, &mut logger)?;
    for line in curve.report_lines() {
        println!("{}", line);
    }

    println!();
    for target in targets {
        match (curve.traces_to_reach(target), curve.last()) {
            (Some(k), _) => println!("[*] accuracy {} reached with {} traces", target, k),
            (None, Some(last)) => println!("[*] accuracy {} not reached within {} traces \
                                            (accuracy {})", target, last.window, last.accuracy),
            (None, None) => {},
        }
    }

    if let Some(best) = curve.best() {
        println!();
        println!("Best accuracy: {} with {} traces (standard error {})",
                 best.accuracy, best.window, best.standard_error());
        println!("{}", LeakageMeasures::from_accuracy(best.accuracy));
    }
    Ok(())
}

fn main() {
    env_logger::init();

    // Parse args from command line.
    let args: Args = Docopt::new(USAGE)
                            .and_then(|d| d.version(Some(env!("CARGO_PKG_VERSION").to_string()))
                                           .deserialize())
                            .unwrap_or_else(|e| e.exit());

    if let Err(e) = run(&args) {
        eprintln!("[!] {}", e);
        process::exit(1);
    }
}
