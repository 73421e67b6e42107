//! Unit tests for the genload binary.

use std::time::Duration;

use clap::Parser;

use gl_core::{ArrivalDistribution, RunConfig, SizeDistribution};

use crate::cli::{Cli, OutputFormat};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("genload").chain(args.iter().copied())).unwrap()
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn no_flags_means_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.participants, 100);
        assert_eq!(cli.format, OutputFormat::Csv);
        let cfg = RunConfig::try_from(cli.resolve_settings().unwrap()).unwrap();
        assert_eq!(cfg, RunConfig::default());
    }

    #[test]
    fn short_flags_parse() {
        let cli = parse(&[
            "-m", "100", "-x", "200", "-s", "uniform", "-r", "2.5", "-a", "constant", "-e", "0.5",
            "-d", "1m 30s", "-n", "40", "-l", "debug",
        ]);
        let cfg = RunConfig::try_from(cli.resolve_settings().unwrap()).unwrap();
        assert_eq!((cfg.min_msg_size(), cfg.max_msg_size()), (100, 200));
        assert_eq!(cfg.size_distribution(), SizeDistribution::Uniform);
        assert_eq!(cfg.msg_rate(), 2.5);
        assert_eq!(cfg.arrival_distribution(), ArrivalDistribution::Regular);
        assert_eq!(cfg.emitters_fraction(), 0.5);
        assert_eq!(cfg.simulation_time(), Duration::from_secs(90));
        assert_eq!(cli.participants, 40);
        assert_eq!(cli.log_level, "debug");
    }

    #[test]
    fn bad_distribution_name_rejected() {
        assert!(Cli::try_parse_from(["genload", "-s", "zipf"]).is_err());
        assert!(Cli::try_parse_from(["genload", "-d", "soon"]).is_err());
    }

    #[test]
    fn no_message_records_flag() {
        assert_eq!(parse(&[]).overrides().record_messages, None);
        assert_eq!(parse(&["--no-message-records"]).overrides().record_messages, Some(false));
    }

    #[test]
    fn invalid_values_fail_at_build() {
        let cli = parse(&["-m", "500", "-x", "100"]);
        assert!(RunConfig::try_from(cli.resolve_settings().unwrap()).is_err());
    }
}

#[cfg(test)]
mod precedence_tests {
    use std::io::Write;

    use super::*;

    fn config_file(json: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(json.as_bytes()).unwrap();
        f
    }

    #[test]
    fn file_overrides_defaults_and_flags_override_file() {
        let file = config_file(r#"{ "msg_rate": 3.0, "seed": 11, "simulation_time": "5s" }"#);
        let path = file.path().to_str().unwrap();

        let cfg = RunConfig::try_from(parse(&["-c", path]).resolve_settings().unwrap()).unwrap();
        assert_eq!(cfg.msg_rate(), 3.0);
        assert_eq!(cfg.seed(), 11);
        assert_eq!(cfg.simulation_time(), Duration::from_secs(5));
        assert_eq!(cfg.min_msg_size(), RunConfig::default().min_msg_size());

        let cfg = RunConfig::try_from(
            parse(&["-c", path, "-r", "7", "--seed", "12"]).resolve_settings().unwrap(),
        )
        .unwrap();
        assert_eq!(cfg.msg_rate(), 7.0);
        assert_eq!(cfg.seed(), 12);
        assert_eq!(cfg.simulation_time(), Duration::from_secs(5));
    }

    #[test]
    fn unreadable_file_is_reported() {
        let cli = parse(&["-c", "/nonexistent/genload.json"]);
        let err = cli.resolve_settings().unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/genload.json"), "{err:#}");
    }

    #[test]
    fn malformed_file_is_reported() {
        let file = config_file(r#"{ "msg_rate": 3.0, "bogus": true }"#);
        let cli = parse(&["-c", file.path().to_str().unwrap()]);
        assert!(cli.resolve_settings().is_err());
    }
}

#[cfg(test)]
mod output_tests {
    use super::*;
    use crate::cli::writers;

    #[test]
    fn both_opens_two_writers() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(writers(OutputFormat::Both, dir.path()).unwrap().len(), 2);
        assert_eq!(writers(OutputFormat::Json, dir.path()).unwrap().len(), 1);
        assert!(dir.path().join("emitters.csv").exists());
    }
}

#[cfg(test)]
mod relay_tests {
    use gl_core::{EmitterRng, ParticipantId};
    use gl_emitter::{ChannelPublisher, PayloadHeader, Publisher, build_payload};

    use crate::relay::spawn_relay;

    fn payload(seq: u64, size: usize) -> bytes::Bytes {
        let mut rng = EmitterRng::new(0, ParticipantId(0));
        build_payload(&mut rng, PayloadHeader { seq, sent_at_unix_nanos: 0 }, size)
    }

    #[tokio::test]
    async fn drains_until_every_sender_is_gone() {
        let (tx, drain) = spawn_relay(8);
        let mut a = ChannelPublisher::new(ParticipantId(1), tx.clone());
        let mut b = ChannelPublisher::new(ParticipantId(2), tx);
        a.send(payload(0, 32)).await.unwrap();
        a.send(payload(1, 48)).await.unwrap();
        b.send(payload(0, 20)).await.unwrap();
        drop((a, b));

        let stats = drain.await.unwrap();
        assert_eq!(stats.messages, 3);
        assert_eq!(stats.bytes, 100);
        assert_eq!(stats.senders, 2);
    }
}
