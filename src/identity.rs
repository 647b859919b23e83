//! Content addresses for canonical protein sequences.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::encodings::canonicalize;
use crate::Error;
use crate::Result;

/// Known-answer vectors checked before the hasher is handed out.
const SELF_TEST: [(&[u8], &str); 2] = [
    (b"", "d41d8cd98f00b204e9800998ecf8427e"),
    (b"abc", "900150983cd24fb0d6963f7d28e17f72"),
];

/// The md5 digest of a canonical sequence, as 32 lowercase hex digits.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProteinId(String);

impl ProteinId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProteinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ProteinId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ProteinId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct ProteinHasher {
    _checked: (),
}

impl ProteinHasher {
    /// Fails with `HasherUnavailable` if the digest primitive does not
    /// reproduce its known answers.
    pub fn new() -> Result<ProteinHasher> {
        for (input, expected) in SELF_TEST.iter() {
            let digest = format!("{:x}", md5::compute(input));
            if digest != *expected {
                return Err(Error::HasherUnavailable {
                    message: format!(
                        "md5 self-test failed: got {}, expected {}",
                        digest, expected
                    ),
                });
            }
        }
        Ok(ProteinHasher { _checked: () })
    }

    /// Canonicalizes `seq` and returns its identifier.
    pub fn identify(&self, seq: &[u8]) -> Result<ProteinId> {
        let canonical = canonicalize(seq)?;
        Ok(self.digest(&canonical))
    }

    /// Identifier of an already canonical sequence.
    pub fn digest(&self, canonical: &[u8]) -> ProteinId {
        ProteinId(format!("{:x}", md5::compute(canonical)))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn identifiers_are_case_insensitive() -> Result<()> {
        let hasher = ProteinHasher::new()?;
        let upper = hasher.identify(b"MKVLAAGIVGLLLA")?;
        let lower = hasher.identify(b"mkvlaagivgllla")?;
        assert_eq!(upper, lower);
        assert_eq!(upper.as_str().len(), 32);
        assert!(upper.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        Ok(())
    }

    #[test]
    fn identify_is_idempotent() -> Result<()> {
        let hasher = ProteinHasher::new()?;
        let canonical = canonicalize(b"mkvLaag")?;
        assert_eq!(hasher.identify(&canonical)?, hasher.digest(&canonical));
        assert_eq!(hasher.identify(b"mkvLaag")?, hasher.digest(&canonical));
        Ok(())
    }

    #[test]
    fn distinct_sequences_distinct_ids() -> Result<()> {
        let hasher = ProteinHasher::new()?;
        assert_ne!(hasher.identify(b"MKVL")?, hasher.identify(b"MKVI")?);
        Ok(())
    }

    #[test]
    fn invalid_sequence_is_recoverable() -> Result<()> {
        let hasher = ProteinHasher::new()?;
        let err = hasher.identify(b"MK VL").unwrap_err();
        assert!(err.is_recoverable());
        Ok(())
    }
}
