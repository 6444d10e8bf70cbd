use bytes::Bytes;

use crate::error::ParseError;

/// Fixed, non-empty byte sequence terminating a scanned segment.
///
/// Searching is linear in the haystack length: a Knuth–Morris–Pratt failure
/// table is computed once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiter {
    bytes: Bytes,
    failure: Box<[usize]>,
}

impl Delimiter {
    /// Creates a delimiter, rejecting an empty sequence.
    pub fn new(bytes: impl Into<Bytes>) -> Result<Self, ParseError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(ParseError::new("delimiter cannot be empty"));
        }

        let failure = failure_table(&bytes);
        Ok(Self { bytes, failure })
    }

    pub(crate) fn from_static(bytes: &'static [u8]) -> Self {
        Self::from_nonempty(Bytes::from_static(bytes))
    }

    pub(crate) fn from_nonempty(bytes: Bytes) -> Self {
        debug_assert!(!bytes.is_empty());
        Self {
            failure: failure_table(&bytes),
            bytes,
        }
    }

    /// Returns the delimiter bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length of the delimiter in bytes. Never zero.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always `false`; present for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Offset of the leftmost occurrence of the delimiter in `haystack`.
    pub fn find(&self, haystack: &[u8]) -> Option<usize> {
        let needle = self.as_bytes();
        if haystack.len() < needle.len() {
            return None;
        }

        let mut matched = 0usize;
        for (index, &byte) in haystack.iter().enumerate() {
            while matched > 0 && needle[matched] != byte {
                matched = self.failure[matched - 1];
            }
            if needle[matched] == byte {
                matched += 1;
            }
            if matched == needle.len() {
                return Some(index + 1 - needle.len());
            }
        }

        None
    }
}

impl AsRef<[u8]> for Delimiter {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

// failure[i] is the length of the longest proper prefix of needle[..=i]
// that is also a suffix of it.
fn failure_table(needle: &[u8]) -> Box<[usize]> {
    let mut table = vec![0usize; needle.len()];
    let mut matched = 0usize;

    for index in 1..needle.len() {
        while matched > 0 && needle[index] != needle[matched] {
            matched = table[matched - 1];
        }
        if needle[index] == needle[matched] {
            matched += 1;
        }
        table[index] = matched;
    }

    table.into_boxed_slice()
}
