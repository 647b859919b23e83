//! Bulk loading of reference proteins from delimited tables.
//!
//! Tables have a header row; the sequence and payload columns are picked by
//! header name or 1-based position. Input may be gzip-compressed.
//!
//! Rows are read as raw bytes: a sequence that is not valid protein text
//! (including non-UTF-8 bytes) is rejected by the index, and a row missing
//! one of its fields is reported as malformed. Both are skipped and counted.

use std::io::Read;
use std::path::Path;
use std::time::{Duration, Instant};

use csv::{ByteRecord, StringRecord};
use getset::CopyGetters;
use itertools::Itertools;
use log::{info, warn};
use serde::Serialize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::{Column, LoadConfig};
use crate::identity::ProteinId;
use crate::index::KmerIndex;
use crate::Error;
use crate::Result;

const BATCH_SIZE: usize = 1_000;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct LoadStats {
    /// Data rows read, header excluded.
    rows: usize,
    loaded: usize,
    /// Rows whose sequence is shorter than the k-mer size.
    skipped_short: usize,
    /// Rows whose sequence has symbols outside the protein alphabet, or
    /// that are missing a field.
    skipped_invalid: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// 1-based line in the input.
    pub line: u64,
    pub sequence: Vec<u8>,
    pub payload: String,
}

pub struct TableRows<R: Read> {
    records: csv::ByteRecordsIntoIter<R>,
    sequence: usize,
    payload: usize,
}

impl<R: Read> TableRows<R> {
    pub fn new(rdr: R, config: &LoadConfig) -> Result<TableRows<R>> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(config.delimiter())
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(rdr);

        let headers = rdr.headers()?.clone();
        let sequence = resolve_column(&headers, config.sequence_column())?;
        let payload = resolve_column(&headers, config.payload_column())?;

        Ok(TableRows {
            records: rdr.into_byte_records(),
            sequence,
            payload,
        })
    }

    fn row(&self, record: ByteRecord) -> Result<TableRow> {
        let line = record.position().map_or(0, |pos| pos.line());
        let malformed = |message: String| Error::MalformedRow { line, message };
        let field = |i: usize| {
            record.get(i).ok_or_else(|| {
                malformed(format!("{} fields, no field #{}", record.len(), i + 1))
            })
        };

        let sequence = field(self.sequence)?;
        let payload = std::str::from_utf8(field(self.payload)?)
            .map_err(|e| malformed(format!("payload is not UTF-8: {}", e)))?;

        Ok(TableRow {
            line,
            sequence: sequence.to_vec(),
            payload: payload.into(),
        })
    }
}

impl<R: Read> Iterator for TableRows<R> {
    type Item = Result<TableRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(record.map_err(Error::from).and_then(|r| self.row(r)))
    }
}

fn resolve_column(headers: &StringRecord, column: &Column) -> Result<usize> {
    let pos = match column {
        Column::Name(name) => headers.iter().position(|h| h == name),
        Column::Position(n) if *n >= 1 && *n <= headers.len() => Some(n - 1),
        Column::Position(_) => None,
    };
    pos.ok_or_else(|| Error::MissingColumn {
        column: column.to_string(),
    })
}

/// Opens `path`, decompressing it if needed.
pub fn open_table<P: AsRef<Path>>(path: P) -> Result<Box<dyn Read>> {
    let (rdr, _format) = niffler::from_path(path)?;
    Ok(rdr)
}

enum Outcome {
    Loaded,
    Short,
    Invalid,
}

struct Progress {
    interval: Duration,
    started: Instant,
    last: Instant,
}

impl Progress {
    fn new(interval: Duration) -> Progress {
        let now = Instant::now();
        Progress {
            interval,
            started: now,
            last: now,
        }
    }

    fn tick(&mut self, stats: &LoadStats) {
        if self.last.elapsed() >= self.interval {
            info!(
                "Processed {} rows, {} proteins loaded ({:.0}s)",
                stats.rows,
                stats.loaded,
                self.started.elapsed().as_secs_f64()
            );
            self.last = Instant::now();
        }
    }
}

/// Feeds every row of `rdr` long enough for `ksize` to `add`.
///
/// Rows rejected with a recoverable error are skipped and counted; any
/// other error stops the load.
pub fn load_rows<R, F>(rdr: R, config: &LoadConfig, ksize: usize, add: F) -> Result<LoadStats>
where
    R: Read,
    F: Fn(&[u8], &str) -> Result<ProteinId> + Sync,
{
    let rows = TableRows::new(rdr, config)?;
    let mut stats = LoadStats::default();
    let mut progress = Progress::new(config.progress_interval());

    let insert = |row: &TableRow| -> Result<Outcome> {
        if row.sequence.len() < ksize {
            return Ok(Outcome::Short);
        }
        match add(&row.sequence, &row.payload) {
            Ok(_) => Ok(Outcome::Loaded),
            Err(e) if e.is_recoverable() => {
                warn!("Skipping line {}: {}", row.line, e);
                Ok(Outcome::Invalid)
            }
            Err(e) => Err(e),
        }
    };

    for chunk in &rows.chunks(BATCH_SIZE) {
        let mut batch = Vec::with_capacity(BATCH_SIZE);
        let mut failure = None;
        for row in chunk {
            match row {
                Ok(row) => batch.push(row),
                Err(e) if e.is_recoverable() => {
                    warn!("Skipping {}", e);
                    stats.rows += 1;
                    stats.skipped_invalid += 1;
                }
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        #[cfg(feature = "parallel")]
        let batch_iter = batch.par_iter();

        #[cfg(not(feature = "parallel"))]
        let batch_iter = batch.iter();

        let outcomes: Vec<Outcome> = batch_iter.map(&insert).collect::<Result<_>>()?;

        stats.rows += batch.len();
        for outcome in outcomes {
            match outcome {
                Outcome::Loaded => stats.loaded += 1,
                Outcome::Short => stats.skipped_short += 1,
                Outcome::Invalid => stats.skipped_invalid += 1,
            }
        }
        progress.tick(&stats);

        if let Some(e) = failure {
            return Err(e);
        }
    }

    info!(
        "Loaded {} proteins from {} rows; skipped {} shorter than k={} and {} invalid",
        stats.loaded, stats.rows, stats.skipped_short, ksize, stats.skipped_invalid
    );
    Ok(stats)
}

impl<T> KmerIndex<T>
where
    T: for<'a> From<&'a str> + Send + Sync,
{
    /// Adds every usable row of a table, with the payload column as payload.
    pub fn load_reader<R: Read>(&self, rdr: R, config: &LoadConfig) -> Result<LoadStats> {
        load_rows(rdr, config, self.ksize(), |seq, payload| {
            self.add_protein(seq, T::from(payload))
        })
    }

    pub fn load_path<P: AsRef<Path>>(&self, path: P, config: &LoadConfig) -> Result<LoadStats> {
        info!("Loading reference proteins from {}", path.as_ref().display());
        self.load_reader(open_table(path)?, config)
    }
}
