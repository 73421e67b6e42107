//! Unit tests for gl-dist samplers.

use gl_core::{EmitterRng, ParticipantId};

fn rng(seed: u64) -> EmitterRng {
    EmitterRng::new(seed, ParticipantId(0))
}

#[cfg(test)]
mod size_tests {
    use super::*;
    use crate::size::sample_truncated_normal;
    use crate::{SizeSampler, TRUNCATED_NORMAL_MAX_DRAWS, truncated_normal_size, uniform_size};
    use gl_core::{RunConfig, SizeDistribution};

    const RANGES: [(usize, usize); 5] = [(1, 1), (1, 2), (10, 20), (1024, 10_240), (7, 1_000_000)];

    #[test]
    fn uniform_stays_in_range() {
        let mut r = rng(1);
        for (min, max) in RANGES {
            for _ in 0..2_000 {
                let s = uniform_size(&mut r, min, max);
                assert!((min..=max).contains(&s), "{s} outside [{min}, {max}]");
            }
        }
    }

    #[test]
    fn uniform_hits_both_bounds() {
        let mut r = rng(2);
        let draws: Vec<usize> = (0..1_000).map(|_| uniform_size(&mut r, 3, 5)).collect();
        assert!(draws.contains(&3));
        assert!(draws.contains(&5));
    }

    #[test]
    fn uniform_mean_is_range_midpoint() {
        let mut r = rng(3);
        let n = 20_000;
        let (min, max) = (1024usize, 10_240usize);
        let sum: usize = (0..n).map(|_| uniform_size(&mut r, min, max)).sum();
        let mean = sum as f64 / n as f64;
        let expected = (min + max) as f64 / 2.0;
        // stddev of the mean ≈ 2660 / sqrt(20000) ≈ 19
        assert!((mean - expected).abs() < 100.0, "mean {mean}, expected {expected}");
    }

    #[test]
    fn truncated_normal_stays_in_range() {
        let mut r = rng(4);
        for (min, max) in RANGES {
            for _ in 0..2_000 {
                let s = truncated_normal_size(&mut r, min, max, 5.0);
                assert!((min..=max).contains(&s), "{s} outside [{min}, {max}]");
            }
        }
    }

    #[test]
    fn truncated_normal_mean_is_range_midpoint() {
        let mut r = rng(5);
        let n = 20_000;
        let sum: usize = (0..n).map(|_| truncated_normal_size(&mut r, 1000, 2000, 5.0)).sum();
        let mean = sum as f64 / n as f64;
        assert!((mean - 1500.0).abs() < 10.0, "mean {mean}");
    }

    #[test]
    fn truncated_normal_draws_are_bounded_even_with_wide_tails() {
        // Divisor 0.01 → stddev = 100 × range: almost every draw misses.
        let mut r = rng(6);
        let mut clamped = 0;
        for _ in 0..1_000 {
            let d = sample_truncated_normal(&mut r, 100, 110, 0.01);
            assert!(d.draws <= TRUNCATED_NORMAL_MAX_DRAWS);
            assert!((100..=110).contains(&d.size));
            clamped += d.clamped as u32;
        }
        assert!(clamped > 0, "expected the clamp fallback to trigger");
    }

    #[test]
    fn degenerate_range_is_constant() {
        let mut r = rng(7);
        for _ in 0..100 {
            assert_eq!(uniform_size(&mut r, 42, 42), 42);
            assert_eq!(truncated_normal_size(&mut r, 42, 42, 5.0), 42);
        }
        let d = sample_truncated_normal(&mut r, 42, 42, 5.0);
        assert_eq!(d.draws, 0);
    }

    #[test]
    fn sampler_from_config_dispatches() {
        let cfg = RunConfig::builder()
            .msg_sizes(10, 20)
            .size_distribution(SizeDistribution::Uniform)
            .build()
            .unwrap();
        assert_eq!(SizeSampler::from_config(&cfg), SizeSampler::Uniform { min: 10, max: 20 });

        let cfg = RunConfig::builder().msg_sizes(10, 20).stddev_divisor(4.0).build().unwrap();
        assert_eq!(
            SizeSampler::from_config(&cfg),
            SizeSampler::TruncatedNormal { min: 10, max: 20, stddev_divisor: 4.0 }
        );

        let cfg = RunConfig::builder().msg_sizes(8, 8).build().unwrap();
        let sampler = SizeSampler::from_config(&cfg);
        assert_eq!(sampler, SizeSampler::Constant(8));
        assert_eq!(sampler.sample(&mut rng(0)), 8);
        assert_eq!(sampler.mean(), 8.0);
    }

    #[test]
    fn same_seed_same_sizes() {
        let sampler = SizeSampler::TruncatedNormal { min: 1, max: 1000, stddev_divisor: 5.0 };
        let (mut a, mut b) = (rng(11), rng(11));
        let xs: Vec<usize> = (0..500).map(|_| sampler.sample(&mut a)).collect();
        let ys: Vec<usize> = (0..500).map(|_| sampler.sample(&mut b)).collect();
        assert_eq!(xs, ys);
    }
}

#[cfg(test)]
mod arrival_tests {
    use std::time::Duration;

    use super::*;
    use crate::{ArrivalSampler, poisson_wait, regular_wait};
    use gl_core::{ArrivalDistribution, RunConfig};

    #[test]
    fn poisson_waits_strictly_positive() {
        let mut r = rng(20);
        for rate in [0.1, 1.0, 10.0, 1_000.0, 1e6] {
            for _ in 0..2_000 {
                assert!(poisson_wait(&mut r, rate) > Duration::ZERO);
            }
        }
    }

    #[test]
    fn poisson_mean_is_inverse_rate() {
        let mut r = rng(21);
        let rate = 10.0;
        let n = 20_000;
        let total: f64 = (0..n).map(|_| poisson_wait(&mut r, rate).as_secs_f64()).sum();
        let mean = total / n as f64;
        // stddev of the mean ≈ 0.1 / sqrt(20000) ≈ 0.0007
        assert!((mean - 0.1).abs() < 0.005, "mean {mean}");
    }

    #[test]
    fn regular_wait_is_inverse_rate() {
        assert_eq!(regular_wait(4.0), Duration::from_millis(250));
        assert_eq!(regular_wait(1e-300), Duration::MAX);
    }

    #[test]
    fn sampler_from_config_dispatches() {
        let cfg = RunConfig::builder().msg_rate(2.0).build().unwrap();
        let sampler = ArrivalSampler::from_config(&cfg);
        assert_eq!(sampler, ArrivalSampler::Poisson { rate: 2.0 });
        assert_eq!(sampler.mean_wait(), Duration::from_millis(500));

        let cfg = RunConfig::builder()
            .msg_rate(2.0)
            .arrival_distribution(ArrivalDistribution::Regular)
            .build()
            .unwrap();
        let sampler = ArrivalSampler::from_config(&cfg);
        let mut r = rng(0);
        assert!((0..10).all(|_| sampler.sample(&mut r) == Duration::from_millis(500)));
    }

    #[test]
    fn same_seed_same_waits() {
        let sampler = ArrivalSampler::Poisson { rate: 3.0 };
        let (mut a, mut b) = (rng(5), rng(5));
        for _ in 0..500 {
            assert_eq!(sampler.sample(&mut a), sampler.sample(&mut b));
        }
    }
}
