//! Unit tests for gl-core primitives.

#[cfg(test)]
mod ids {
    use crate::ParticipantId;

    #[test]
    fn index_roundtrip() {
        let id = ParticipantId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(ParticipantId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(ParticipantId(0) < ParticipantId(1));
    }

    #[test]
    fn display() {
        assert_eq!(ParticipantId(7).to_string(), "ParticipantId(7)");
    }
}

#[cfg(test)]
mod time {
    use std::time::Duration;

    use tokio::time::Instant;

    use crate::RunClock;

    #[test]
    fn deadline_is_origin_plus_duration() {
        let origin = Instant::now();
        let clock = RunClock::starting_at(origin, Duration::from_secs(2));
        assert_eq!(clock.deadline(), origin + Duration::from_secs(2));
        assert_eq!(clock.duration(), Duration::from_secs(2));
    }

    #[test]
    fn offsets_saturate_before_origin() {
        let origin = Instant::now();
        let clock = RunClock::starting_at(origin + Duration::from_secs(5), Duration::from_secs(1));
        assert_eq!(clock.offset_of(origin), Duration::ZERO);
        assert_eq!(clock.offset_of(origin + Duration::from_secs(6)), Duration::from_secs(1));
    }

    #[test]
    fn unrepresentable_deadline_is_capped() {
        let origin = Instant::now();
        let clock = RunClock::starting_at(origin, Duration::MAX);
        assert_eq!(clock.duration(), crate::config::MAX_SIMULATION_TIME);
        assert!(!clock.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn expires_at_deadline() {
        let clock = RunClock::start(Duration::from_millis(500));
        assert!(!clock.is_expired());
        assert_eq!(clock.remaining(), Duration::from_millis(500));

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(!clock.is_expired());

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(clock.is_expired());
        assert_eq!(clock.remaining(), Duration::ZERO);
        assert_eq!(clock.elapsed(), Duration::from_millis(500));
    }
}

#[cfg(test)]
mod rng {
    use crate::{EmitterRng, ParticipantId, RunRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = EmitterRng::new(12345, ParticipantId(0));
        let mut r2 = EmitterRng::new(12345, ParticipantId(0));
        for _ in 0..100 {
            let a: u64 = r1.random();
            let b: u64 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn different_participants_differ() {
        let mut r0 = EmitterRng::new(1, ParticipantId(0));
        let mut r1 = EmitterRng::new(1, ParticipantId(1));
        let a: u64 = r0.random();
        let b: u64 = r1.random();
        assert_ne!(a, b, "seeds for adjacent participants should diverge");
    }

    #[test]
    fn fill_is_reproducible() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        EmitterRng::new(9, ParticipantId(3)).fill(&mut a);
        EmitterRng::new(9, ParticipantId(3)).fill(&mut b);
        assert_eq!(a, b);
        assert_ne!(a, [0u8; 32]);
    }

    #[test]
    fn run_rng_gen_range_in_bounds() {
        let mut rng = RunRng::new(0);
        for _ in 0..1000 {
            let v = rng.gen_range(3usize..=9);
            assert!((3..=9).contains(&v));
        }
    }
}

#[cfg(test)]
mod config {
    use std::time::Duration;

    use crate::config::{DEFAULT_MAX_MSG_SIZE, DEFAULT_MIN_MSG_SIZE, DEFAULT_STDDEV_DIVISOR};
    use crate::{ArrivalDistribution, ConfigError, GlError, RunConfig, RunSettings, SizeDistribution};

    #[test]
    fn empty_settings_build_defaults() {
        let cfg = RunConfig::builder().build().unwrap();
        assert_eq!(cfg, RunConfig::default());
        assert_eq!(cfg.min_msg_size(), DEFAULT_MIN_MSG_SIZE);
        assert_eq!(cfg.max_msg_size(), DEFAULT_MAX_MSG_SIZE);
        assert_eq!(cfg.size_distribution(), SizeDistribution::TruncatedNormal);
        assert_eq!(cfg.arrival_distribution(), ArrivalDistribution::Poisson);
        assert_eq!(cfg.stddev_divisor(), DEFAULT_STDDEV_DIVISOR);
        assert!(cfg.record_messages());
    }

    #[test]
    fn equal_sizes_are_valid() {
        let cfg = RunConfig::builder().msg_sizes(64, 64).build().unwrap();
        assert_eq!(cfg.min_msg_size(), cfg.max_msg_size());
    }

    #[test]
    fn rejects_zero_size() {
        let err = RunConfig::builder().msg_sizes(0, 10).build().unwrap_err();
        assert_eq!(err, ConfigError::ZeroMessageSize { min: 0, max: 10 });
    }

    #[test]
    fn rejects_inverted_range() {
        let err = RunConfig::builder().msg_sizes(20, 10).build().unwrap_err();
        assert_eq!(err, ConfigError::SizeRangeInverted { min: 20, max: 10 });
    }

    #[test]
    fn rejects_bad_rates() {
        for rate in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(RunConfig::builder().msg_rate(rate).build(), Err(ConfigError::InvalidRate(_))),
                "rate {rate} accepted"
            );
        }
    }

    #[test]
    fn rejects_fraction_outside_unit_interval() {
        for fraction in [0.0, -0.5, 1.01, 10.0, f64::NAN] {
            assert!(
                matches!(
                    RunConfig::builder().emitters_fraction(fraction).build(),
                    Err(ConfigError::InvalidEmittersFraction(_))
                ),
                "fraction {fraction} accepted"
            );
        }
        assert!(RunConfig::builder().emitters_fraction(1.0).build().is_ok());
    }

    #[test]
    fn rejects_zero_duration() {
        let err = RunConfig::builder().simulation_time(Duration::ZERO).build().unwrap_err();
        assert_eq!(err, ConfigError::ZeroSimulationTime);
    }

    #[test]
    fn rejects_overlong_duration() {
        let max = crate::config::MAX_SIMULATION_TIME;
        for d in [max + Duration::from_secs(1), Duration::from_secs(u64::MAX / 2), Duration::MAX] {
            assert_eq!(
                RunConfig::builder().simulation_time(d).build().unwrap_err(),
                ConfigError::SimulationTimeTooLong { got: d, max }
            );
        }
        assert!(RunConfig::builder().simulation_time(max).build().is_ok());
    }

    #[test]
    fn overlong_duration_from_json_is_rejected() {
        let settings = RunSettings::from_json_str(r#"{ "simulation_time": "400days" }"#).unwrap();
        assert!(matches!(
            RunConfig::try_from(settings),
            Err(ConfigError::SimulationTimeTooLong { .. })
        ));
    }

    #[test]
    fn rejects_bad_stddev_divisor() {
        assert!(RunConfig::builder().stddev_divisor(0.0).build().is_err());
        assert!(RunConfig::builder().stddev_divisor(f64::NAN).build().is_err());
        assert!(RunConfig::builder().stddev_divisor(2.5).build().is_ok());
    }

    #[test]
    fn merge_prefers_later_layer() {
        let file = RunSettings::new().msg_rate(5.0).seed(1).msg_sizes(10, 20);
        let cli = RunSettings::new().msg_rate(8.0);
        let merged = file.merge(cli);
        assert_eq!(merged.msg_rate, Some(8.0));
        assert_eq!(merged.seed, Some(1));
        assert_eq!(merged.min_msg_size, Some(10));
    }

    #[test]
    fn settings_roundtrip_through_config() {
        let cfg = RunConfig::builder().msg_sizes(5, 50).seed(3).build().unwrap();
        assert_eq!(cfg.to_settings().build().unwrap(), cfg);
    }

    #[test]
    fn deserializes_json_with_aliases() {
        let json = r#"{
            "min_msg_size": 512,
            "max_msg_size": 2048,
            "size_distribution": "tnormal",
            "arrival_distribution": "constant",
            "simulation_time": "2m 30s",
            "emitters_fraction": 0.5
        }"#;
        let settings = RunSettings::from_json_str(json).unwrap();
        let cfg = RunConfig::try_from(settings).unwrap();
        assert_eq!(cfg.size_distribution(), SizeDistribution::TruncatedNormal);
        assert_eq!(cfg.arrival_distribution(), ArrivalDistribution::Regular);
        assert_eq!(cfg.simulation_time(), Duration::from_secs(150));
        assert_eq!(cfg.emitters_fraction(), 0.5);
    }

    #[test]
    fn unknown_json_field_rejected() {
        let json = r#"{ "msg_rte": 3 }"#;
        assert!(RunSettings::from_json_str(json).is_err());
    }

    #[test]
    fn distribution_names_parse_case_insensitively() {
        assert_eq!("Uniform".parse::<SizeDistribution>().unwrap(), SizeDistribution::Uniform);
        assert_eq!("GAUSSIAN".parse::<SizeDistribution>().unwrap(), SizeDistribution::TruncatedNormal);
        assert_eq!("Poisson".parse::<ArrivalDistribution>().unwrap(), ArrivalDistribution::Poisson);
        assert!("zipf".parse::<SizeDistribution>().is_err());
    }

    #[test]
    fn json_parse_errors_are_typed() {
        let err = RunSettings::from_json_str("{ \"msg_rate\": \"fast\" }").unwrap_err();
        assert!(matches!(err, GlError::Parse(_)), "{err}");
        assert_eq!(RunSettings::from_json_str("{}").unwrap(), RunSettings::new());
    }

    #[test]
    fn missing_json_file_is_io_error() {
        let err = RunSettings::from_json_file(std::path::Path::new("/nonexistent/genload.json"))
            .unwrap_err();
        assert!(matches!(err, GlError::Io(_)), "{err}");
    }
}
