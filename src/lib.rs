//! Fibonacci heap for Rust
//!
//! This crate provides a mergeable priority queue with handle-based
//! `decrease_key` and `delete`, built on arena-addressed circular rings.
//!
//! # Features
//!
//! - **Fibonacci Heap**: O(1) amortized insert and decrease_key; O(log n) amortized
//!   extract_min and delete; union by swap or by relocation
//! - **Generation-checked handles**: stale or foreign handles are rejected with
//!   [`HeapError::StaleHandle`] instead of dereferencing freed memory
//! - **Shortest paths**: Dijkstra's algorithm over weighted digraphs, written
//!   against the [`DecreaseKeyHeap`] trait
//!
//! # Example
//!
//! ```rust
//! use rust_fibonacci_heap::fibonacci::FibonacciHeap;
//!
//! let mut heap = FibonacciHeap::new();
//! let handle1 = heap.insert(5, "item1");
//! heap.insert(3, "item2");
//! heap.decrease_key(&handle1, 1).unwrap();
//! assert_eq!(heap.min(), Some((&1, &"item1")));
//! ```
//!
//! # Logging
//!
//! Structural events are emitted through [`tracing`] under the `fibonacci`
//! target (consolidation and cascading cuts at `trace`, unions at `debug`,
//! ring corruption at `error`). The shortest-path client opens a span per run.
//! No subscriber is installed by the library.

pub mod error;
pub mod fibonacci;
pub mod shortest_path;
mod storage;
pub mod traits;

// Re-export the main traits and error for convenience
pub use error::HeapError;
pub use traits::{DecreaseKeyHeap, Heap};
