//! `gl-output` — run report writers for the genload traffic generator.
//!
//! Three backends are provided, the last behind a Cargo feature:
//!
//! | Feature   | Backend     | Files created                                   |
//! |-----------|-------------|-------------------------------------------------|
//! | *(none)*  | CSV         | `emitters.csv`, `messages.csv`, `summary.csv`   |
//! | *(none)*  | JSON        | `report.json`                                   |
//! | `sqlite`  | SQLite      | `report.db`                                     |
//!
//! All backends implement [`OutputWriter`] and are driven by
//! [`ReportOutputObserver`], which implements `gl_sim::RunObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use gl_output::{CsvWriter, ReportOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = ReportOutputObserver::new(writer);
//! coordinator.run(&mut obs).await?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod json;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use self::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use json::JsonWriter;
pub use observer::ReportOutputObserver;
pub use row::{EmitterRow, MessageRow, SummaryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
