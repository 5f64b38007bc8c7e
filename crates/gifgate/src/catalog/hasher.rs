//! Content identity for within-scan deduplication

use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// BLAKE3 digest of a file's raw bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash(blake3::Hash);

impl ContentHash {
    pub fn compute(bytes: &[u8]) -> Self {
        Self(blake3::hash(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex().to_string()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", &self.to_hex()[..12])
    }
}

impl Serialize for ContentHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Digests seen so far in one scan.
///
/// Owned by a single scan invocation and dropped with it; nothing is
/// persisted, so files outside the current scan are never compared.
#[derive(Debug, Default)]
pub struct SeenHashes {
    seen: HashSet<ContentHash>,
}

impl SeenHashes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `hash`. Returns `true` when an earlier file already had it.
    pub fn observe(&mut self, hash: ContentHash) -> bool {
        !self.seen.insert(hash)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable() {
        let a = ContentHash::compute(b"GIF89a");
        let b = ContentHash::compute(b"GIF89a");
        let c = ContentHash::compute(b"GIF87a");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_hex().len(), 64);
        assert_eq!(a.to_hex(), blake3::hash(b"GIF89a").to_hex().to_string());
    }

    #[test]
    fn test_first_occurrence_is_not_duplicate() {
        let mut seen = SeenHashes::new();
        let hash = ContentHash::compute(b"same");
        assert!(!seen.observe(hash));
        assert!(seen.observe(hash));
        assert!(seen.observe(hash));
        assert!(!seen.observe(ContentHash::compute(b"other")));
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_fresh_set_forgets() {
        let hash = ContentHash::compute(b"x");
        let mut first = SeenHashes::new();
        first.observe(hash);
        let mut second = SeenHashes::new();
        assert!(!second.observe(hash));
    }
}
