//! K-mer extraction and compact k-mer keys.
//!
//! A [`KmerKey`] stands in for the raw k-mer substring inside the index.
//! Short k-mers are packed into a single `u64` as a bijective base-30
//! numeral over the protein alphabet: every symbol maps to a digit in
//! `1..=29`, so no digit is ever zero and strings of different lengths can
//! never collide. The empty string packs to `0`.
//!
//! `30^13 - 1` still fits in a `u64`, which bounds the packed form to
//! k-mers of length 13 or less. Longer k-mers keep their bytes in a boxed
//! slice.

use std::fmt;

use crate::encodings::{rank, ALPHABET, ALPHABET_SIZE};
use crate::Error;

/// Longest k-mer stored in the packed representation.
pub const MAX_PACKED_LEN: usize = 13;

const BASE: u64 = ALPHABET_SIZE as u64 + 1;

/// Every contiguous window of length `ksize` over `seq`.
///
/// Yields `seq.len() - ksize + 1` k-mers, or none when `seq` is shorter
/// than `ksize`. `ksize` must be positive.
#[inline]
pub fn kmers(seq: &[u8], ksize: usize) -> std::slice::Windows<'_, u8> {
    seq.windows(ksize)
}

/// Number of k-mers [`kmers`] yields for a sequence of length `len`.
#[inline]
pub fn kmer_count(len: usize, ksize: usize) -> usize {
    (len + 1).saturating_sub(ksize)
}

/// Opaque, injective key for a k-mer of any length.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct KmerKey(Repr);

#[derive(Clone, PartialEq, Eq, Hash)]
enum Repr {
    Packed(u64),
    Bytes(Box<[u8]>),
}

impl KmerKey {
    /// Encodes a canonical k-mer.
    ///
    /// Fails if any symbol is outside the canonical alphabet (lowercase
    /// letters included), which keeps the encoding injective.
    pub fn encode(kmer: &[u8]) -> Result<KmerKey, Error> {
        if kmer.len() > MAX_PACKED_LEN {
            if let Some(pos) = kmer.iter().position(|&b| rank(b).is_none()) {
                return Err(invalid_symbol(kmer, pos));
            }
            return Ok(KmerKey(Repr::Bytes(kmer.into())));
        }

        let mut packed = 0u64;
        for (pos, &symbol) in kmer.iter().enumerate() {
            let digit = rank(symbol).ok_or_else(|| invalid_symbol(kmer, pos))?;
            packed = packed * BASE + digit as u64 + 1;
        }
        Ok(KmerKey(Repr::Packed(packed)))
    }

    /// Whether this key fits the single-word packed representation.
    pub fn is_packed(&self) -> bool {
        matches!(self.0, Repr::Packed(_))
    }

    /// Recovers the k-mer this key was encoded from.
    pub fn decode(&self) -> Vec<u8> {
        match &self.0 {
            Repr::Bytes(bytes) => bytes.to_vec(),
            Repr::Packed(packed) => {
                let mut value = *packed;
                let mut kmer = Vec::with_capacity(MAX_PACKED_LEN);
                while value > 0 {
                    let digit = (value % BASE) as usize;
                    kmer.push(ALPHABET[digit - 1]);
                    value /= BASE;
                }
                kmer.reverse();
                kmer
            }
        }
    }
}

fn invalid_symbol(kmer: &[u8], pos: usize) -> Error {
    Error::InvalidProt {
        message: format!(
            "k-mer {:?} has a non-canonical symbol at position {}",
            String::from_utf8_lossy(kmer),
            pos
        ),
    }
}

impl fmt::Debug for KmerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Packed(packed) => write!(f, "KmerKey::Packed({})", packed),
            Repr::Bytes(_) => write!(f, "KmerKey::Bytes({})", self),
        }
    }
}

impl fmt::Display for KmerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.decode()))
    }
}
