//! Common traits for heap data structures
//!
//! This module provides a two-tier trait hierarchy for heap/priority queue data structures:
//!
//! - [`Heap`]: Base trait with the `BinaryHeap`-like push/peek/pop/merge surface
//! - [`DecreaseKeyHeap`]: Extended trait adding handle-based `decrease_key` and `delete`
//!
//! Clients such as [`crate::shortest_path`] are written against these traits and
//! only ever touch the heap through them.

use crate::error::HeapError;
use std::fmt::Debug;
use std::hash::Hash;

/// A handle to an element in the heap, used for decrease_key and delete
///
/// This is an opaque type that identifies a specific element in the heap.
pub trait Handle: Copy + Eq + Hash + Debug {}

/// Base trait for heap/priority queue data structures
///
/// Unlike `BinaryHeap` which stores values directly (using `Ord`), these heaps
/// store (key, value) pairs to separate the ordering key from the data.
///
/// # Example
///
/// ```rust
/// use rust_fibonacci_heap::Heap;
/// use rust_fibonacci_heap::fibonacci::FibonacciHeap;
///
/// let mut heap = <FibonacciHeap<i32, &str> as Heap<_, _>>::new();
/// heap.push(3, "three");
/// heap.push(1, "one");
/// heap.push(2, "two");
///
/// assert_eq!(heap.peek(), Some((&1, &"one")));
/// assert_eq!(heap.pop(), Some((1, "one")));
/// ```
pub trait Heap<K: Ord, V> {
    /// Creates a new empty heap
    fn new() -> Self;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Inserts an element with the given key
    fn push(&mut self, key: K, value: V);

    /// Returns the minimum key and associated value without removing it
    fn peek(&self) -> Option<(&K, &V)>;

    /// Removes and returns the minimum key and associated value
    fn pop(&mut self) -> Option<(K, V)>;

    /// Merges another heap into this one, consuming the other heap
    fn merge(&mut self, other: Self);
}

/// Extended heap trait with `decrease_key` support
///
/// These operations are essential for algorithms like Dijkstra's shortest path
/// that need to update keys of elements already in the heap.
///
/// # Example
///
/// ```rust
/// use rust_fibonacci_heap::{DecreaseKeyHeap, Heap};
/// use rust_fibonacci_heap::fibonacci::FibonacciHeap;
///
/// let mut heap = <FibonacciHeap<i32, &str> as Heap<_, _>>::new();
/// let handle = heap.push_with_handle(10, "item");
/// heap.decrease_key(&handle, 5).unwrap();
/// assert_eq!(heap.peek(), Some((&5, &"item")));
/// ```
pub trait DecreaseKeyHeap<K: Ord, V>: Heap<K, V> {
    /// The handle type for this heap
    type Handle: Handle;

    /// Inserts an element with the given key, returning a handle
    ///
    /// The handle stays valid until the element is removed.
    fn push_with_handle(&mut self, key: K, value: V) -> Self::Handle;

    /// Lowers the key of the element identified by `handle`
    ///
    /// # Errors
    /// - [`HeapError::KeyIncreased`] if `new_key` is greater than the current key
    /// - [`HeapError::StaleHandle`] if the element is no longer in this heap
    fn decrease_key(&mut self, handle: &Self::Handle, new_key: K) -> Result<(), HeapError>;

    /// Removes the element identified by `handle`, wherever it sits
    ///
    /// # Errors
    /// [`HeapError::StaleHandle`] if the element is no longer in this heap
    fn delete(&mut self, handle: &Self::Handle) -> Result<(K, V), HeapError>;
}
