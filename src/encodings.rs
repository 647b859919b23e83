//! Protein alphabet and sequence canonicalization.

use crate::Error;

/// Every symbol accepted in a canonical protein sequence, in rank order.
///
/// The 20 standard residues plus the IUPAC ambiguity letters (`B Z J U O X`),
/// the stop symbol and the two gap symbols.
pub const ALPHABET: &[u8; 29] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ*-.";

pub const ALPHABET_SIZE: usize = ALPHABET.len();

const NO_RANK: u8 = u8::MAX;

const RANKS: [u8; 256] = {
    let mut lookup = [NO_RANK; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        let symbol = ALPHABET[i];
        lookup[symbol as usize] = i as u8;
        i += 1;
    }
    lookup
};

/// Dense rank of `symbol` in [`ALPHABET`]. Lowercase letters have no rank.
#[inline]
pub fn rank(symbol: u8) -> Option<u8> {
    match RANKS[symbol as usize] {
        NO_RANK => None,
        r => Some(r),
    }
}

/// Upper-cases `seq` and checks every symbol belongs to [`ALPHABET`].
pub fn canonicalize(seq: &[u8]) -> Result<Vec<u8>, Error> {
    let canonical = seq.to_ascii_uppercase();
    if let Some(pos) = canonical.iter().position(|&b| rank(b).is_none()) {
        return Err(Error::InvalidProt {
            message: describe_invalid(&canonical, pos),
        });
    }
    Ok(canonical)
}

fn describe_invalid(seq: &[u8], pos: usize) -> String {
    let symbol = seq[pos];
    if symbol.is_ascii_graphic() {
        format!("'{}' at position {}", symbol as char, pos)
    } else {
        format!("byte 0x{:02x} at position {}", symbol, pos)
    }
}
