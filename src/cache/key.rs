//! Cache Key Module
//!
//! Structured cache keys: an entity kind plus ordered segments. Prefix
//! invalidation matches whole segments, so `product:1` can never be confused
//! with `product:10` the way substring matching would.

use std::fmt;

// == Cache Key ==
/// A deterministic key built from an entity kind and identifier segments.
///
/// The same logical query always produces the same key, and distinct queries
/// never collide: kinds namespace the key space and every parameter lands in
/// its own segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    kind: &'static str,
    segments: Vec<String>,
}

impl CacheKey {
    // == Constructor ==
    /// Creates a key for the given entity kind with no segments yet.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            segments: Vec::new(),
        }
    }

    // == Segment ==
    /// Appends one identifier segment.
    pub fn segment(mut self, part: impl fmt::Display) -> Self {
        self.segments.push(part.to_string());
        self
    }

    /// The entity kind this key belongs to.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// The identifier segments in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    // == Prefix Match ==
    /// Whether this key falls under the given prefix key.
    ///
    /// Matches kind equality plus whole leading segments. A bare-kind prefix
    /// covers every key of that kind.
    pub fn starts_with(&self, prefix: &CacheKey) -> bool {
        self.kind == prefix.kind
            && prefix.segments.len() <= self.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for segment in &self.segments {
            write!(f, ":{}", segment)?;
        }
        Ok(())
    }
}
