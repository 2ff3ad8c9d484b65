//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) amortized insert, decrease_key, and merge
//! - O(log n) amortized extract_min and delete
//!
//! The structure consists of a collection of heap-ordered trees. Roots are linked
//! in a circular doubly linked list (the root ring), and every node owns a ring
//! of its children. The heap maintains a key to the minimum root.
//!
//! All nodes live in one slotmap arena, so handles are generation-checked keys:
//! using a handle after its element was removed yields
//! [`HeapError::StaleHandle`] instead of undefined behaviour.

use crate::error::HeapError;
use crate::storage::{Node, NodeArena, NodeKey};
use crate::traits::{DecreaseKeyHeap, Handle, Heap};
use circular_ring::{Ring, RingError};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt;
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_HEAP_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of a heap, carried by every handle it issues
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
struct HeapId(u64);

impl HeapId {
    fn next() -> Self {
        HeapId(NEXT_HEAP_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Handle to an element in a Fibonacci heap
///
/// A handle is tied to the heap that issued it. Passing it to another heap, or
/// using it after its element was extracted, deleted, cleared, or relocated by
/// [`FibonacciHeap::union`], is reported as [`HeapError::StaleHandle`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FibonacciHandle {
    heap: HeapId,
    node: NodeKey,
}

impl Handle for FibonacciHandle {}

/// Fibonacci Heap
///
/// # Example
///
/// ```rust
/// use rust_fibonacci_heap::fibonacci::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// let handle = heap.insert(5, "item");
/// heap.insert(3, "other");
/// heap.decrease_key(&handle, 1).unwrap();
/// assert_eq!(heap.min(), Some((&1, &"item")));
/// assert_eq!(heap.extract_min(), Ok((1, "item")));
/// ```
pub struct FibonacciHeap<K, V = ()> {
    nodes: NodeArena<K, V>,
    roots: Ring<NodeKey>,
    min: Option<NodeKey>,
    id: HeapId,
}

impl<K: Ord, V> Default for FibonacciHeap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + fmt::Debug, V: fmt::Debug> fmt::Debug for FibonacciHeap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FibonacciHeap")
            .field("len", &self.len())
            .field("min", &self.min())
            .field("roots", &self.roots.len())
            .finish()
    }
}

impl<K: Ord, V> FibonacciHeap<K, V> {
    /// Creates an empty heap
    pub fn new() -> Self {
        Self {
            nodes: NodeArena::default(),
            roots: Ring::new(),
            min: None,
            id: HeapId::next(),
        }
    }

    /// Returns true if the heap is empty
    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    /// Returns the number of elements in the heap
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Inserts an element, returning a handle for later `decrease_key`/`delete`
    ///
    /// # Time Complexity
    /// O(1)
    pub fn insert(&mut self, key: K, value: V) -> FibonacciHandle {
        let node = self.nodes.insert(Node::new(key, value));
        self.roots.push(&mut self.nodes, node);

        if self.min.map_or(true, |min| self.nodes[node].key < self.nodes[min].key) {
            self.min = Some(node);
        }

        self.handle(node)
    }

    /// Returns a handle to the minimum element without removing it
    pub fn peek_min(&self) -> Option<FibonacciHandle> {
        self.min.map(|node| self.handle(node))
    }

    /// Returns the minimum key and its value without removing it
    pub fn min(&self) -> Option<(&K, &V)> {
        self.min.map(|node| {
            let node = &self.nodes[node];
            (&node.key, &node.value)
        })
    }

    /// Returns true if `handle` still names an element of this heap
    pub fn contains(&self, handle: &FibonacciHandle) -> bool {
        self.resolve(handle).is_ok()
    }

    /// Returns the current key of the element named by `handle`
    pub fn key(&self, handle: &FibonacciHandle) -> Result<&K, HeapError> {
        let node = self.resolve(handle)?;
        Ok(&self.nodes[node].key)
    }

    /// Returns the value of the element named by `handle`
    pub fn value(&self, handle: &FibonacciHandle) -> Result<&V, HeapError> {
        let node = self.resolve(handle)?;
        Ok(&self.nodes[node].value)
    }

    /// Returns the value of the element named by `handle` mutably
    ///
    /// Only the value is exposed; keys change through `decrease_key` alone.
    pub fn value_mut(&mut self, handle: &FibonacciHandle) -> Result<&mut V, HeapError> {
        let node = self.resolve(handle)?;
        self.nodes
            .get_mut(node)
            .map(|node| &mut node.value)
            .ok_or(HeapError::StaleHandle)
    }

    /// Removes and returns the minimum element
    ///
    /// Children of the removed root are promoted to the root ring, and if any
    /// roots remain the heap is consolidated so that no two roots share a degree.
    ///
    /// # Errors
    /// [`HeapError::Empty`] if the heap has no elements.
    ///
    /// # Time Complexity
    /// O(log n) amortized
    pub fn extract_min(&mut self) -> Result<(K, V), HeapError> {
        let z = self.min.ok_or(HeapError::Empty)?;
        if !self.nodes.contains(z) {
            return Err(missing_node(z));
        }
        self.roots.remove(&mut self.nodes, z).map_err(corrupted)?;

        let mut children = self.nodes.with_children(z, |ring, _| ring.take());
        let orphans: SmallVec<[NodeKey; 16]> = children.drain(&mut self.nodes).collect();
        for child in orphans {
            let node = &mut self.nodes[child];
            node.parent = None;
            node.marked = false;
            self.roots.push(&mut self.nodes, child);
        }

        let Node { key, value, .. } = self.nodes.remove(z).ok_or_else(|| missing_node(z))?;

        self.min = self.roots.first();
        if self.min.is_some() {
            self.consolidate();
        }

        Ok((key, value))
    }

    /// Removes and returns the minimum element, or `None` if the heap is empty
    pub fn pop(&mut self) -> Option<(K, V)> {
        self.extract_min().ok()
    }

    /// Lowers the key of the element named by `handle`
    ///
    /// A key equal to the current one is accepted and changes nothing. If the
    /// new key breaks heap order with the parent, the node is cut to the root
    /// ring and its marked ancestors are cut after it.
    ///
    /// # Errors
    /// - [`HeapError::StaleHandle`] if the element is no longer in this heap
    /// - [`HeapError::KeyIncreased`] if `new_key` is greater than the current key
    ///
    /// # Time Complexity
    /// O(1) amortized
    pub fn decrease_key(&mut self, handle: &FibonacciHandle, new_key: K) -> Result<(), HeapError> {
        let node = self.resolve(handle)?;
        if new_key > self.nodes[node].key {
            return Err(HeapError::KeyIncreased);
        }
        self.nodes[node].key = new_key;

        if let Some(parent) = self.nodes[node].parent {
            if self.nodes[node].key < self.nodes[parent].key {
                self.cut(node, parent)?;
                self.cascading_cut(parent)?;
            }
        }

        if let Some(min) = self.min {
            if self.nodes[node].key < self.nodes[min].key {
                self.min = Some(node);
            }
        }

        Ok(())
    }

    /// Removes the element named by `handle`, wherever it sits in the forest
    ///
    /// Behaves as decreasing the key below the current minimum and then
    /// extracting the minimum, without needing a key smaller than every other.
    ///
    /// # Errors
    /// [`HeapError::StaleHandle`] if the element is no longer in this heap.
    ///
    /// # Time Complexity
    /// O(log n) amortized
    pub fn delete(&mut self, handle: &FibonacciHandle) -> Result<(K, V), HeapError> {
        let node = self.resolve(handle)?;

        if let Some(parent) = self.nodes[node].parent {
            self.cut(node, parent)?;
            self.cascading_cut(parent)?;
        }

        self.min = Some(node);
        self.extract_min()
    }

    /// Moves every element of `other` into this heap
    ///
    /// When this heap is empty the two are swapped in O(1) and handles issued
    /// by `other` keep working. Otherwise `other`'s nodes are moved into this
    /// heap's arena with their tree shape intact, the root rings are spliced,
    /// and `other`'s handles become stale. Use [`FibonacciHeap::union_tracked`]
    /// to translate them.
    ///
    /// # Time Complexity
    /// O(1) when either heap is empty. Otherwise O(|other|): every node of
    /// `other` is re-inserted into this heap's arena before the O(1) ring
    /// splice, so merge the smaller heap into the larger one.
    pub fn union(&mut self, other: Self) {
        self.absorb(other, |_, _| {});
    }

    /// Like [`FibonacciHeap::union`], returning where `other`'s handles went
    pub fn union_tracked(&mut self, other: Self) -> Relocation {
        let from = other.id;
        let mut moved = FxHashMap::default();
        let swapped = self.absorb(other, |old, new| {
            moved.insert(old, new);
        });

        Relocation {
            from,
            to: self.id,
            swapped,
            moved,
        }
    }

    /// Iterates over all elements in unspecified order
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            rings: vec![self.roots.iter(&self.nodes)],
        }
    }

    /// Removes every element; all outstanding handles become stale
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots = Ring::new();
        self.min = None;
    }

    /// Checks every structural invariant of the heap
    ///
    /// - every ring is well formed and its length matches its traversal
    /// - each node's degree equals the live size of its child ring
    /// - parent links agree with child-ring membership
    /// - heap order: no child has a smaller key than its parent
    /// - roots are unmarked
    /// - `len` matches the number of reachable nodes
    /// - `min` is a root with the smallest root key, and is `None` only when empty
    pub fn verify_invariants(&self) -> bool {
        if !self.roots.is_consistent(&self.nodes) {
            return false;
        }

        let mut reachable = 0usize;
        let mut stack: Vec<(Option<NodeKey>, Ring<NodeKey>)> = vec![(None, self.roots)];

        while let Some((owner, ring)) = stack.pop() {
            for key in ring.iter(&self.nodes) {
                let Some(node) = self.nodes.get(key) else {
                    return false;
                };
                reachable += 1;

                if node.parent != owner {
                    return false;
                }
                match owner {
                    Some(parent) if node.key < self.nodes[parent].key => return false,
                    None if node.marked => return false,
                    _ => {}
                }
                if !node.children.is_consistent(&self.nodes) {
                    return false;
                }
                if node.degree() != node.children.iter(&self.nodes).count() {
                    return false;
                }
                stack.push((Some(key), node.children));
            }
        }

        if reachable != self.len() {
            return false;
        }

        match self.min {
            None => self.roots.is_empty() && self.len() == 0,
            Some(min) => {
                let Some(min_node) = self.nodes.get(min) else {
                    return false;
                };
                min_node.parent.is_none()
                    && self
                        .roots
                        .iter(&self.nodes)
                        .all(|root| min_node.key <= self.nodes[root].key)
            }
        }
    }

    fn handle(&self, node: NodeKey) -> FibonacciHandle {
        FibonacciHandle {
            heap: self.id,
            node,
        }
    }

    fn resolve(&self, handle: &FibonacciHandle) -> Result<NodeKey, HeapError> {
        if handle.heap == self.id && self.nodes.contains(handle.node) {
            Ok(handle.node)
        } else {
            Err(HeapError::StaleHandle)
        }
    }

    /// Moves `other` into `self`, reporting each (old, new) node key.
    ///
    /// Returns true when the heaps were simply swapped.
    fn absorb(&mut self, mut other: Self, mut on_move: impl FnMut(NodeKey, NodeKey)) -> bool {
        if other.is_empty() {
            return false;
        }
        if self.is_empty() {
            tracing::debug!(target: "fibonacci", other_len = other.len(), "union by swap");
            mem::swap(self, &mut other);
            return true;
        }

        tracing::debug!(
            target: "fibonacci",
            self_len = self.len(),
            other_len = other.len(),
            "union by relocation"
        );

        let mut remap: FxHashMap<NodeKey, NodeKey> = FxHashMap::default();
        remap.reserve(other.len());
        for (old, node) in other.nodes.drain() {
            let new = self.nodes.insert(node);
            remap.insert(old, new);
            on_move(old, new);
        }
        for &new in remap.values() {
            self.nodes[new].remap(|key| remap[&key]);
        }

        let other_roots = other.roots.take().map_keys(|key| remap[&key]);
        self.roots.splice(&mut self.nodes, other_roots);

        if let (Some(mine), Some(theirs)) = (self.min, other.min.take().map(|key| remap[&key])) {
            if self.nodes[theirs].key < self.nodes[mine].key {
                self.min = Some(theirs);
            }
        }

        false
    }

    /// Links trees of equal degree until every root has a distinct degree,
    /// then rebuilds the root ring and recomputes the minimum.
    fn consolidate(&mut self) {
        let before = self.roots.len();
        let mut by_degree: SmallVec<[Option<NodeKey>; 64]> = SmallVec::new();

        while let Some(w) = self.roots.pop_first(&mut self.nodes) {
            let mut x = w;
            let mut d = self.nodes[x].degree();

            loop {
                if d >= by_degree.len() {
                    by_degree.resize(d + 1, None);
                }
                let Some(y) = by_degree[d].take() else {
                    break;
                };

                // On equal keys the root already in the table stays on top
                let (parent, child) = if self.nodes[x].key < self.nodes[y].key {
                    (x, y)
                } else {
                    (y, x)
                };
                self.link(child, parent);
                x = parent;
                d += 1;
            }

            by_degree[d] = Some(x);
        }

        self.min = None;
        for root in by_degree.into_iter().flatten() {
            self.roots.push(&mut self.nodes, root);
            if self.min.map_or(true, |min| self.nodes[root].key < self.nodes[min].key) {
                self.min = Some(root);
            }
        }

        tracing::trace!(target: "fibonacci", before, after = self.roots.len(), "consolidated roots");
    }

    /// Makes the detached root `child` a child of `parent`
    fn link(&mut self, child: NodeKey, parent: NodeKey) {
        let node = &mut self.nodes[child];
        node.parent = Some(parent);
        node.marked = false;
        self.nodes
            .with_children(parent, |ring, nodes| ring.push(nodes, child));
    }

    /// Cuts `node` from `parent`'s child ring and makes it an unmarked root
    fn cut(&mut self, node: NodeKey, parent: NodeKey) -> Result<(), HeapError> {
        self.nodes
            .with_children(parent, |ring, nodes| ring.remove(nodes, node))
            .map_err(corrupted)?;

        self.roots.push(&mut self.nodes, node);
        let node = &mut self.nodes[node];
        node.parent = None;
        node.marked = false;
        Ok(())
    }

    /// Walks up from `node`, cutting marked ancestors until an unmarked one
    /// (which gets marked) or a root is reached.
    fn cascading_cut(&mut self, mut node: NodeKey) -> Result<(), HeapError> {
        let mut cuts = 0usize;

        while let Some(parent) = self.nodes[node].parent {
            if !self.nodes[node].marked {
                self.nodes[node].marked = true;
                break;
            }
            self.cut(node, parent)?;
            cuts += 1;
            node = parent;
        }

        if cuts > 0 {
            tracing::trace!(target: "fibonacci", cuts, "cascading cut");
        }
        Ok(())
    }
}

fn corrupted(err: RingError) -> HeapError {
    tracing::error!(target: "fibonacci", error = %err, "ring invariant violated");
    HeapError::Corrupted(err)
}

fn missing_node(node: NodeKey) -> HeapError {
    tracing::error!(target: "fibonacci", ?node, "ring member missing from node arena");
    HeapError::MissingNode
}

/// Where the handles of a heap consumed by [`FibonacciHeap::union_tracked`] went
#[derive(Debug, Clone)]
pub struct Relocation {
    from: HeapId,
    to: HeapId,
    swapped: bool,
    moved: FxHashMap<NodeKey, NodeKey>,
}

impl Relocation {
    /// Translates a handle issued by the consumed heap into one for the
    /// surviving heap. Returns `None` for handles the consumed heap did not own.
    pub fn get(&self, handle: &FibonacciHandle) -> Option<FibonacciHandle> {
        if self.swapped {
            return (handle.heap == self.to).then_some(*handle);
        }
        if handle.heap != self.from {
            return None;
        }
        self.moved.get(&handle.node).map(|&node| FibonacciHandle {
            heap: self.to,
            node,
        })
    }

    /// Number of elements that were moved between arenas
    pub fn len(&self) -> usize {
        self.moved.len()
    }

    /// True when no element had to move (either heap was empty)
    pub fn is_empty(&self) -> bool {
        self.moved.is_empty()
    }
}

/// Iterator over the elements of a [`FibonacciHeap`]. Created by [`FibonacciHeap::iter`].
pub struct Iter<'a, K, V> {
    nodes: &'a NodeArena<K, V>,
    rings: Vec<circular_ring::Iter<'a, NodeKey, NodeArena<K, V>>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let ring = self.rings.last_mut()?;
            let Some(key) = ring.next() else {
                self.rings.pop();
                continue;
            };

            let nodes = self.nodes;
            let node = &nodes[key];
            if !node.children.is_empty() {
                self.rings.push(node.children.iter(nodes));
            }
            return Some((&node.key, &node.value));
        }
    }
}

impl<K: Ord, V> Heap<K, V> for FibonacciHeap<K, V> {
    fn new() -> Self {
        FibonacciHeap::new()
    }

    fn is_empty(&self) -> bool {
        FibonacciHeap::is_empty(self)
    }

    fn len(&self) -> usize {
        FibonacciHeap::len(self)
    }

    fn push(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn peek(&self) -> Option<(&K, &V)> {
        self.min()
    }

    fn pop(&mut self) -> Option<(K, V)> {
        FibonacciHeap::pop(self)
    }

    fn merge(&mut self, other: Self) {
        self.union(other);
    }
}

impl<K: Ord, V> DecreaseKeyHeap<K, V> for FibonacciHeap<K, V> {
    type Handle = FibonacciHandle;

    fn push_with_handle(&mut self, key: K, value: V) -> FibonacciHandle {
        self.insert(key, value)
    }

    fn decrease_key(&mut self, handle: &FibonacciHandle, new_key: K) -> Result<(), HeapError> {
        FibonacciHeap::decrease_key(self, handle, new_key)
    }

    fn delete(&mut self, handle: &FibonacciHandle) -> Result<(K, V), HeapError> {
        FibonacciHeap::delete(self, handle)
    }
}

impl<K: Ord, V> Extend<(K, V)> for FibonacciHeap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for FibonacciHeap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut heap = FibonacciHeap::new();
        heap.extend(iter);
        heap
    }
}
