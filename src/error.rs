//! Error types for heap operations

use circular_ring::RingError;
use thiserror::Error;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// `extract_min` was called on a heap with no elements
    #[error("heap is empty")]
    Empty,
    /// The new key is greater than the current key
    #[error("new key is greater than current key")]
    KeyIncreased,
    /// The handle is no longer valid (element was removed, relocated by a
    /// union, or belongs to a different heap)
    #[error("handle is no longer valid (element was removed)")]
    StaleHandle,
    /// A ring reported a structural violation; the heap is corrupted
    #[error("heap invariant violated: {0}")]
    Corrupted(#[from] RingError),
    /// A node linked into the heap is absent from the node arena
    #[error("heap invariant violated: ring member missing from node arena")]
    MissingNode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(HeapError::Empty.to_string(), "heap is empty");
        assert_eq!(
            HeapError::KeyIncreased.to_string(),
            "new key is greater than current key"
        );
        assert_eq!(
            HeapError::from(RingError::Empty).to_string(),
            "heap invariant violated: remove from empty ring"
        );
        assert_eq!(
            HeapError::MissingNode.to_string(),
            "heap invariant violated: ring member missing from node arena"
        );
    }
}
