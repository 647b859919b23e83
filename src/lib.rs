//! # Approximate similarity search and annotation transfer for proteins.
//!
//! protkmer indexes protein sequences by their k-mers (every substring of
//! a fixed length `k`) and answers "which stored protein shares the most
//! k-mers with this query, and how similar are they" without aligning the
//! query against the whole database. Similarity is the Jaccard index of the
//! two k-mer sets.
//!
//! Stored proteins are identified by the md5 digest of their canonical
//! (upper-cased) sequence, so the same sequence always gets the same
//! identifier. Each stored protein carries a payload of the caller's
//! choosing; the [`voting`] module uses that payload to keep the best
//! annotation proposed for each protein by similar external sequences.
//!
//! The index lives in memory and can be shared between threads: proteins
//! can be added and queried concurrently.

pub mod errors;
pub use errors::ProtKmerError as Error;

pub type Result<T> = std::result::Result<T, Error>;

pub mod cmd;
pub mod config;
pub mod encodings;
pub mod identity;
pub mod index;
pub mod kmer;
pub mod loader;
pub mod prelude;
pub mod voting;
