//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `report.db` file in the configured output directory with
//! three tables: `emitters`, `messages` and `summary`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{EmitterRow, MessageRow, OutputResult, SummaryRow};

pub const DB_FILE: &str = "report.db";

/// Writes a run report to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `report.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join(DB_FILE))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS emitters (
                 emitter_id      INTEGER PRIMARY KEY,
                 attempted       INTEGER NOT NULL,
                 succeeded       INTEGER NOT NULL,
                 failed          INTEGER NOT NULL,
                 bytes_sent      INTEGER NOT NULL,
                 started_at_us   INTEGER NOT NULL,
                 stopped_at_us   INTEGER NOT NULL,
                 achieved_rate   REAL    NOT NULL,
                 mean_latency_us INTEGER NOT NULL,
                 max_latency_us  INTEGER NOT NULL,
                 stop_reason     TEXT    NOT NULL,
                 stop_detail     TEXT    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS messages (
                 emitter_id INTEGER NOT NULL,
                 seq        INTEGER NOT NULL,
                 sent_at_us INTEGER NOT NULL,
                 size       INTEGER NOT NULL,
                 wait_us    INTEGER NOT NULL,
                 latency_us INTEGER NOT NULL,
                 sent       INTEGER NOT NULL,
                 error      TEXT    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS summary (
                 started_at_utc          TEXT    NOT NULL,
                 participants            INTEGER NOT NULL,
                 emitter_count           INTEGER NOT NULL,
                 wall_clock_us           INTEGER NOT NULL,
                 target_rate             REAL    NOT NULL,
                 target_aggregate_rate   REAL    NOT NULL,
                 achieved_aggregate_rate REAL    NOT NULL,
                 rate_drift              REAL    NOT NULL,
                 attempted               INTEGER NOT NULL,
                 succeeded               INTEGER NOT NULL,
                 failed                  INTEGER NOT NULL,
                 bytes_sent              INTEGER NOT NULL,
                 early_stops             INTEGER NOT NULL,
                 mean_latency_us         INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

// SQLite INTEGER is a signed 64-bit value.
fn int(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

impl OutputWriter for SqliteWriter {
    fn write_emitters(&mut self, rows: &[EmitterRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR REPLACE INTO emitters \
                 (emitter_id, attempted, succeeded, failed, bytes_sent, started_at_us, \
                  stopped_at_us, achieved_rate, mean_latency_us, max_latency_us, \
                  stop_reason, stop_detail) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.emitter_id,
                    int(row.attempted),
                    int(row.succeeded),
                    int(row.failed),
                    int(row.bytes_sent),
                    int(row.started_at_us),
                    int(row.stopped_at_us),
                    row.achieved_rate,
                    int(row.mean_latency_us),
                    int(row.max_latency_us),
                    row.stop_reason,
                    row.stop_detail,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_messages(&mut self, rows: &[MessageRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO messages \
                 (emitter_id, seq, sent_at_us, size, wait_us, latency_us, sent, error) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.emitter_id,
                    int(row.seq),
                    int(row.sent_at_us),
                    int(row.size),
                    int(row.wait_us),
                    int(row.latency_us),
                    row.sent as i64,
                    row.error,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO summary \
             (started_at_utc, participants, emitter_count, wall_clock_us, target_rate, \
              target_aggregate_rate, achieved_aggregate_rate, rate_drift, attempted, \
              succeeded, failed, bytes_sent, early_stops, mean_latency_us) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            rusqlite::params![
                row.started_at_utc,
                int(row.participants),
                int(row.emitter_count),
                int(row.wall_clock_us),
                row.target_rate,
                row.target_aggregate_rate,
                row.achieved_aggregate_rate,
                row.rate_drift,
                int(row.attempted),
                int(row.succeeded),
                int(row.failed),
                int(row.bytes_sent),
                int(row.early_stops),
                int(row.mean_latency_us),
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
