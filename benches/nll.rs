#[macro_use]
extern crate bencher;
extern crate ndarray;
extern crate rand;
extern crate rand_xoshiro;

extern crate nll_distinguisher;

use nll_distinguisher::*;
use nll_distinguisher::sampling::Sampling;
use bencher::Bencher;
use ndarray::prelude::*;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;


/// Scores of a weak classifier on 2000 traces per population.
///
/// This data only serves for benchmark purposes.
fn weak_scores() -> (Population, Population) {
    let n = 2000;
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);

    let fixed = Array1::from_shape_fn(n, |_| rng.random_range(0.25..0.65));
    let random = Array1::from_shape_fn(n, |_| rng.random_range(0.35..0.75));

    (Population::new(Hypothesis::Fixed, fixed, ScoreDomain::Probability).unwrap(),
     Population::new(Hypothesis::Random, random, ScoreDomain::Probability).unwrap())
}

fn bench(b: &mut Bencher, sampling: Sampling) {
    let (fixed, random) = weak_scores();
    let config = NllConfig::default().max_window(30)
                                     .trials(200)
                                     .sampling(sampling)
                                     .progress(false);

    b.iter(|| {
        run_nll(&fixed, &random, &config, &mut None).expect("likelihood test failed")
    });
}

fn bench_nll_resampled(b: &mut Bencher) {
    bench(b, Sampling::Resampled);
}

fn bench_nll_nested(b: &mut Bencher) {
    bench(b, Sampling::Nested);
}

benchmark_group!(benches, bench_nll_resampled, bench_nll_nested);
benchmark_main!(benches);
