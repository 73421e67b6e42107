//! Command-line surface and settings resolution.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use gl_core::{ArrivalDistribution, RunSettings, SizeDistribution};
use gl_output::{CsvWriter, JsonWriter, OutputWriter};

/// Which report files to write.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `emitters.csv`, `messages.csv`, `summary.csv`
    Csv,
    /// `report.json`
    Json,
    /// CSV and JSON
    Both,
    /// `report.db`
    #[cfg(feature = "sqlite")]
    Sqlite,
}

#[derive(Debug, Parser)]
#[command(
    name = "genload",
    about = "Synthetic traffic generator for P2P messaging networks",
    version
)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG wins when set
    #[arg(short = 'l', long, default_value = "info")]
    pub log_level: String,

    /// Directory the report files are written to (created if missing)
    #[arg(short = 'o', long, default_value = "genload-output")]
    pub output_dir: PathBuf,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// JSON settings file; flags given on the command line override it
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Number of simulated participants
    #[arg(short = 'n', long, default_value_t = 100)]
    pub participants: usize,

    /// Capacity of the in-process relay queue, in messages
    #[arg(long, default_value_t = 4096)]
    pub relay_capacity: usize,

    // ── Run settings (unset flags fall through to the file, then defaults) ──
    /// Minimum message size in bytes [default: 1024]
    #[arg(short = 'm', long)]
    pub min_msg_size: Option<usize>,

    /// Maximum message size in bytes [default: 10240]
    #[arg(short = 'x', long)]
    pub max_msg_size: Option<usize>,

    /// Message size distribution: uniform | tnormal [default: tnormal]
    #[arg(short = 's', long)]
    pub size_distribution: Option<SizeDistribution>,

    /// Truncated-normal stddev = (max - min) / divisor [default: 5]
    #[arg(long)]
    pub stddev_divisor: Option<f64>,

    /// Messages per second, per emitter [default: 10]
    #[arg(short = 'r', long)]
    pub msg_rate: Option<f64>,

    /// Inter-arrival distribution: poisson | regular [default: poisson]
    #[arg(short = 'a', long)]
    pub arrival_distribution: Option<ArrivalDistribution>,

    /// Fraction of participants that emit, in (0, 1] [default: 0.1]
    #[arg(short = 'e', long)]
    pub emitters_fraction: Option<f64>,

    /// Run length, e.g. "90s" or "2m" [default: 60s]
    #[arg(short = 'd', long, value_parser = humantime::parse_duration)]
    pub simulation_time: Option<Duration>,

    /// Run seed [default: 0]
    #[arg(long)]
    pub seed: Option<u64>,

    /// Keep counters only, no per-message records
    #[arg(long)]
    pub no_message_records: bool,
}

impl Cli {
    /// The settings layer made of flags actually passed.
    pub fn overrides(&self) -> RunSettings {
        RunSettings {
            min_msg_size:         self.min_msg_size,
            max_msg_size:         self.max_msg_size,
            size_distribution:    self.size_distribution,
            stddev_divisor:       self.stddev_divisor,
            msg_rate:             self.msg_rate,
            arrival_distribution: self.arrival_distribution,
            emitters_fraction:    self.emitters_fraction,
            simulation_time:      self.simulation_time,
            seed:                 self.seed,
            record_messages:      self.no_message_records.then_some(false),
        }
    }

    /// Config file (if any) overlaid with the command-line flags.  Built-in
    /// defaults fill whatever is still unset when the result is built.
    pub fn resolve_settings(&self) -> anyhow::Result<RunSettings> {
        let file = match &self.config {
            Some(path) => RunSettings::from_json_file(path)
                .with_context(|| format!("loading config file {}", path.display()))?,
            None => RunSettings::new(),
        };
        Ok(file.merge(self.overrides()))
    }
}

/// Open the writers for `format` in `dir`.
pub fn writers(format: OutputFormat, dir: &Path) -> anyhow::Result<Vec<Box<dyn OutputWriter>>> {
    let mut out: Vec<Box<dyn OutputWriter>> = Vec::new();
    if matches!(format, OutputFormat::Csv | OutputFormat::Both) {
        out.push(Box::new(CsvWriter::new(dir).context("opening CSV output")?));
    }
    if matches!(format, OutputFormat::Json | OutputFormat::Both) {
        out.push(Box::new(JsonWriter::new(dir).context("opening JSON output")?));
    }
    #[cfg(feature = "sqlite")]
    if format == OutputFormat::Sqlite {
        out.push(Box::new(gl_output::SqliteWriter::new(dir).context("opening SQLite output")?));
    }
    Ok(out)
}
