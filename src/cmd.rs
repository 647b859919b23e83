//! Drivers for the `protkmer` command-line subcommands.
//!
//! Each driver loads the reference table, runs the query rows against it and
//! writes one record per result to `out`, as TSV with a header or as JSON
//! lines.

use std::io::Write;
use std::path::Path;

use log::{info, warn};
use serde::Serialize;
use typed_builder::TypedBuilder;

use crate::config::{IndexConfig, LoadConfig};
use crate::index::{KmerIndex, QueryResult};
use crate::loader::{open_table, LoadStats, TableRow, TableRows};
use crate::voting::AnnotationVoter;
use crate::Result;

#[derive(Debug, Clone, TypedBuilder)]
pub struct CommandOptions {
    index: IndexConfig,

    /// Sequence and payload columns of the reference table.
    reference: LoadConfig,

    /// Sequence and name (or label) columns of the query table.
    queries: LoadConfig,

    #[builder(default)]
    json: bool,
}

enum RecordWriter<W: Write> {
    Tsv(csv::Writer<W>),
    Json(W),
}

impl<W: Write> RecordWriter<W> {
    fn new(out: W, json: bool) -> Self {
        if json {
            RecordWriter::Json(out)
        } else {
            RecordWriter::Tsv(csv::WriterBuilder::new().delimiter(b'\t').from_writer(out))
        }
    }

    fn write<S: Serialize>(&mut self, record: &S) -> Result<()> {
        match self {
            RecordWriter::Tsv(wtr) => wtr.serialize(record)?,
            RecordWriter::Json(out) => {
                serde_json::to_writer(&mut *out, record)?;
                out.write_all(b"\n")?;
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match self {
            RecordWriter::Tsv(wtr) => wtr.flush()?,
            RecordWriter::Json(out) => out.flush()?,
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct MatchRecord<'a> {
    query: &'a str,
    identifier: &'a str,
    shared_kmers: usize,
    similarity: f64,
    payload: &'a str,
}

impl<'a> MatchRecord<'a> {
    fn found(query: &'a str, result: &'a QueryResult<String>) -> Self {
        MatchRecord {
            query,
            identifier: result.identifier().as_str(),
            shared_kmers: result.shared_kmers(),
            similarity: result.similarity(),
            payload: result.payload(),
        }
    }

    fn not_found(query: &'a str) -> Self {
        MatchRecord {
            query,
            identifier: "*",
            shared_kmers: 0,
            similarity: 0.0,
            payload: "",
        }
    }
}

#[derive(Debug, Serialize)]
struct ProposalRecord<'a> {
    identifier: &'a str,
    score: f64,
    annotation: &'a str,
}

#[derive(Debug, Serialize)]
struct StatsRecord {
    ksize: usize,
    proteins: usize,
    kmers: usize,
    rows: usize,
    loaded: usize,
    skipped_short: usize,
    skipped_invalid: usize,
}

fn load_reference<P: AsRef<Path>>(
    refs: P,
    opts: &CommandOptions,
) -> Result<(KmerIndex<String>, LoadStats)> {
    let index = KmerIndex::new(&opts.index)?;
    let stats = index.load_path(refs, &opts.reference)?;
    Ok((index, stats))
}

/// Runs `f` on each query row, skipping malformed rows and invalid sequences.
fn for_each_query<P, F>(queries: P, opts: &CommandOptions, mut f: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnMut(&TableRow) -> Result<()>,
{
    let mut skipped = 0;
    for row in TableRows::new(open_table(queries)?, &opts.queries)? {
        let outcome = match row {
            Ok(row) => f(&row).map_err(|e| (Some(row.line), e)),
            Err(e) => Err((None, e)),
        };
        match outcome {
            Err((line, e)) if e.is_recoverable() => {
                match line {
                    Some(line) => warn!("Skipping query on line {}: {}", line, e),
                    None => warn!("Skipping query: {}", e),
                }
                skipped += 1;
            }
            Err((_, e)) => return Err(e),
            Ok(()) => {}
        }
    }
    if skipped > 0 {
        warn!("{} queries skipped", skipped);
    }
    Ok(())
}

pub fn closest<P, Q, W>(refs: P, queries: Q, opts: &CommandOptions, out: W) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    W: Write,
{
    let (index, _) = load_reference(refs, opts)?;
    let mut wtr = RecordWriter::new(out, opts.json);

    for_each_query(queries, opts, |row| {
        match index.find_closest(&row.sequence)? {
            Some(result) => wtr.write(&MatchRecord::found(&row.payload, &result)),
            None => wtr.write(&MatchRecord::not_found(&row.payload)),
        }
    })?;
    wtr.flush()
}

pub fn close<P, Q, W>(
    refs: P,
    queries: Q,
    threshold: f64,
    opts: &CommandOptions,
    out: W,
) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    W: Write,
{
    let (index, _) = load_reference(refs, opts)?;
    let mut wtr = RecordWriter::new(out, opts.json);

    for_each_query(queries, opts, |row| {
        for result in index.find_close(&row.sequence, threshold)? {
            wtr.write(&MatchRecord::found(&row.payload, &result))?;
        }
        Ok(())
    })?;
    wtr.flush()
}

/// Seeds every reference protein with its payload as default annotation,
/// offers each query row's label to the close references, and writes the
/// winning annotation per reference.
pub fn vote<P, Q, W>(refs: P, proposals: Q, opts: &CommandOptions, out: W) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    W: Write,
{
    let voter = AnnotationVoter::new(&opts.index)?;
    voter.index().load_path(refs, &opts.reference)?;

    let mut processed = 0;
    let mut matched = 0;
    for_each_query(proposals, opts, |row| {
        matched += voter.process_proposal(&row.sequence, &row.payload)?;
        processed += 1;
        Ok(())
    })?;
    info!(
        "Processed {} proposals, {} matches at similarity >= {}",
        processed,
        matched,
        voter.min_similarity()
    );

    let mut proposals = voter.proposals();
    proposals.sort_by(|a, b| a.0.cmp(&b.0));

    let mut wtr = RecordWriter::new(out, opts.json);
    for (identifier, proposal) in &proposals {
        wtr.write(&ProposalRecord {
            identifier: identifier.as_str(),
            score: proposal.best_score(),
            annotation: proposal.best_annotation(),
        })?;
    }
    wtr.flush()
}

pub fn stats<P, W>(refs: P, opts: &CommandOptions, out: W) -> Result<()>
where
    P: AsRef<Path>,
    W: Write,
{
    let (index, load) = load_reference(refs, opts)?;
    let mut wtr = RecordWriter::new(out, opts.json);
    wtr.write(&StatsRecord {
        ksize: index.ksize(),
        proteins: index.protein_count(),
        kmers: index.kmer_count(),
        rows: load.rows(),
        loaded: load.loaded(),
        skipped_short: load.skipped_short(),
        skipped_invalid: load.skipped_invalid(),
    })?;
    wtr.flush()
}
