//! Arena-addressed circular doubly-linked rings.
//!
//! Nodes live in some caller-owned arena and are named by small `Copy` keys
//! (slotmap keys, vector indices, ...). Each node carries a [`RingLink`]
//! holding the keys of its neighbours, and a [`Ring`] is nothing more than an
//! optional entry point plus a length. Because links are keys rather than
//! pointers there are no ownership cycles, and every operation is safe code.
//!
//! # Circular vs Linear Lists
//!
//! In a circular ring:
//! - A single node links to itself (both `next` and `prev`)
//! - There is no head or tail - any member can be the entry point
//! - Splicing two rings together is O(1)
//! - Iteration wraps around, so it stops when the start member recurs
//!
//! This is the shape Fibonacci heaps want: every root list and every child
//! list is a ring, and nodes move between rings in O(1).
//!
//! # Example
//!
//! ```rust
//! use circular_ring::{Ring, RingArena, RingLink};
//!
//! struct Arena(Vec<RingLink<usize>>);
//!
//! impl RingArena<usize> for Arena {
//!     fn link(&self, key: usize) -> &RingLink<usize> {
//!         &self.0[key]
//!     }
//!     fn link_mut(&mut self, key: usize) -> &mut RingLink<usize> {
//!         &mut self.0[key]
//!     }
//! }
//!
//! let mut arena = Arena(vec![RingLink::new(); 3]);
//! let mut ring = Ring::new();
//! ring.push(&mut arena, 0);
//! ring.push(&mut arena, 1);
//! ring.insert_after(&mut arena, Some(1), 2);
//!
//! assert_eq!(ring.iter(&arena).collect::<Vec<_>>(), vec![0, 1, 2]);
//!
//! ring.remove(&mut arena, 1).unwrap();
//! assert_eq!(ring.len(), 2);
//! assert!(arena.link(1).is_self_linked(1));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

use core::fmt;
use core::iter::FusedIterator;
use core::mem;

// =============================================================================
// RingLink
// =============================================================================

/// Neighbour keys embedded in every ring member.
///
/// A fresh link is unlinked (both sides `None`). A member of a ring always has
/// both sides set; a detached singleton points at itself.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RingLink<K> {
    prev: Option<K>,
    next: Option<K>,
}

impl<K> RingLink<K> {
    /// Creates a new unlinked `RingLink`.
    #[inline]
    pub const fn new() -> Self {
        RingLink {
            prev: None,
            next: None,
        }
    }

    /// Checks whether the link has been wired into any ring.
    #[inline]
    pub fn is_linked(&self) -> bool {
        self.next.is_some()
    }
}

impl<K: Copy + Eq> RingLink<K> {
    /// Gets the next key.
    #[inline]
    pub fn next(&self) -> Option<K> {
        self.next
    }

    /// Gets the previous key.
    #[inline]
    pub fn prev(&self) -> Option<K> {
        self.prev
    }

    /// True when `this` is a singleton: both neighbours are itself.
    #[inline]
    pub fn is_self_linked(&self, this: K) -> bool {
        self.next == Some(this) && self.prev == Some(this)
    }

    /// Rewrites both neighbour keys, e.g. when nodes move to another arena.
    pub fn map_keys<J>(self, mut f: impl FnMut(K) -> J) -> RingLink<J> {
        RingLink {
            prev: self.prev.map(&mut f),
            next: self.next.map(&mut f),
        }
    }

    #[inline]
    fn make_singleton(&mut self, this: K) {
        self.prev = Some(this);
        self.next = Some(this);
    }
}

impl<K> Default for RingLink<K> {
    #[inline]
    fn default() -> Self {
        RingLink::new()
    }
}

impl<K> fmt::Debug for RingLink<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_linked() {
            write!(f, "RingLink(linked)")
        } else {
            write!(f, "RingLink(unlinked)")
        }
    }
}

// =============================================================================
// RingArena
// =============================================================================

/// Storage that can hand out the [`RingLink`] of a node by key.
///
/// Implementations may panic on keys that are not present; rings only ever
/// ask for keys that were inserted into them.
pub trait RingArena<K> {
    /// Returns the link of `key`.
    fn link(&self, key: K) -> &RingLink<K>;

    /// Returns the link of `key` mutably.
    fn link_mut(&mut self, key: K) -> &mut RingLink<K>;
}

// =============================================================================
// RingError
// =============================================================================

/// Errors reported by ring operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RingError {
    /// `remove` was called on a ring with no members
    #[error("remove from empty ring")]
    Empty,
}

// =============================================================================
// Ring
// =============================================================================

/// A circular doubly-linked list of arena keys.
///
/// The ring stores only its entry point and length; the links themselves live
/// in the arena passed to each operation. Every node must belong to at most
/// one ring at a time.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ring<K> {
    start: Option<K>,
    len: usize,
}

impl<K> Default for Ring<K> {
    #[inline]
    fn default() -> Self {
        Ring {
            start: None,
            len: 0,
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for Ring<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ring")
            .field("start", &self.start)
            .field("len", &self.len)
            .finish()
    }
}

impl<K: Copy + Eq> Ring<K> {
    /// Creates an empty ring.
    #[inline]
    pub const fn new() -> Self {
        Ring {
            start: None,
            len: 0,
        }
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the ring has no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start.is_none()
    }

    /// The current entry point, if any.
    #[inline]
    pub fn first(&self) -> Option<K> {
        self.start
    }

    /// Splices `node` into the ring right after `at`.
    ///
    /// With `at == None` the node goes after the entry point, or becomes the
    /// sole member of an empty ring. `node` must not belong to any ring; a
    /// fresh or self-linked node is fine. `at`, when given, must be a member.
    pub fn insert_after<A>(&mut self, arena: &mut A, at: Option<K>, node: K)
    where
        A: RingArena<K> + ?Sized,
    {
        debug_assert!(
            !arena.link(node).is_linked() || arena.link(node).is_self_linked(node),
            "node already belongs to a ring"
        );
        debug_assert!(
            at.is_none() || self.start.is_some(),
            "insert_after a member of an empty ring"
        );

        match at.or(self.start) {
            None => {
                arena.link_mut(node).make_singleton(node);
                self.start = Some(node);
            }
            Some(at) => {
                let next = next_of(arena, at);
                arena.link_mut(at).next = Some(node);
                let link = arena.link_mut(node);
                link.prev = Some(at);
                link.next = Some(next);
                arena.link_mut(next).prev = Some(node);
            }
        }

        self.len += 1;
    }

    /// Adds `node` to the ring. Same as `insert_after(arena, None, node)`.
    #[inline]
    pub fn push<A>(&mut self, arena: &mut A, node: K)
    where
        A: RingArena<K> + ?Sized,
    {
        self.insert_after(arena, None, node);
    }

    /// Unlinks a member, leaving it as a detached singleton.
    ///
    /// Membership is the caller's responsibility: removing a node that lives
    /// in another ring corrupts both rings. The only condition checked here
    /// is an empty ring, which can never hold the node.
    pub fn remove<A>(&mut self, arena: &mut A, node: K) -> Result<(), RingError>
    where
        A: RingArena<K> + ?Sized,
    {
        if self.start.is_none() {
            return Err(RingError::Empty);
        }
        self.unlink(arena, node);
        Ok(())
    }

    /// Removes and returns the entry point, advancing it to its successor.
    ///
    /// This is one step of [`Ring::drain`] for callers that need to touch the
    /// arena between steps.
    pub fn pop_first<A>(&mut self, arena: &mut A) -> Option<K>
    where
        A: RingArena<K> + ?Sized,
    {
        let first = self.start?;
        self.unlink(arena, first);
        Some(first)
    }

    /// Moves every member of `other` into this ring in O(1).
    pub fn splice<A>(&mut self, arena: &mut A, other: Ring<K>)
    where
        A: RingArena<K> + ?Sized,
    {
        let (a, b) = match (self.start, other.start) {
            (_, None) => return,
            (None, Some(_)) => {
                *self = other;
                return;
            }
            (Some(a), Some(b)) => (a, b),
        };

        // Before:
        //   Ring A: ... <-> a_prev <-> a <-> ...
        //   Ring B: ... <-> b_prev <-> b <-> ...
        //
        // After:
        //   ... <-> a_prev <-> b <-> ... <-> b_prev <-> a <-> ...
        let a_prev = prev_of(arena, a);
        let b_prev = prev_of(arena, b);

        arena.link_mut(a_prev).next = Some(b);
        arena.link_mut(b).prev = Some(a_prev);

        arena.link_mut(b_prev).next = Some(a);
        arena.link_mut(a).prev = Some(b_prev);

        self.len += other.len;
    }

    /// Empties the ring handle and returns its previous contents.
    ///
    /// The members keep their links, so the returned ring is fully usable.
    #[inline]
    pub fn take(&mut self) -> Ring<K> {
        mem::take(self)
    }

    /// Iterates over all members, starting at the entry point.
    pub fn iter<'a, A>(&self, arena: &'a A) -> Iter<'a, K, A>
    where
        A: RingArena<K> + ?Sized,
    {
        Iter {
            arena,
            start: self.start,
            current: self.start,
        }
    }

    /// Iterates over all members, starting at `member`.
    ///
    /// `member` must belong to this ring.
    pub fn iter_from<'a, A>(&self, arena: &'a A, member: K) -> Iter<'a, K, A>
    where
        A: RingArena<K> + ?Sized,
    {
        Iter::from_member(arena, member)
    }

    /// Removes members one at a time as they are yielded.
    ///
    /// Once the iterator is exhausted the ring is empty. Dropping it early
    /// leaves the unvisited members in place.
    pub fn drain<'a, A>(&'a mut self, arena: &'a mut A) -> Drain<'a, K, A>
    where
        A: RingArena<K> + ?Sized,
    {
        Drain { ring: self, arena }
    }

    /// Rewrites the entry point, e.g. when members move to another arena.
    pub fn map_keys<J>(self, f: impl FnOnce(K) -> J) -> Ring<J> {
        Ring {
            start: self.start.map(f),
            len: self.len,
        }
    }

    /// Walks the ring and checks that `prev`/`next` agree and that exactly
    /// `len` steps lead back to the entry point.
    pub fn is_consistent<A>(&self, arena: &A) -> bool
    where
        A: RingArena<K> + ?Sized,
    {
        let Some(start) = self.start else {
            return self.len == 0;
        };

        let mut current = start;
        for _ in 0..self.len {
            let link = arena.link(current);
            let (Some(next), Some(_)) = (link.next, link.prev) else {
                return false;
            };
            if arena.link(next).prev != Some(current) {
                return false;
            }
            current = next;
            if current == start {
                break;
            }
        }

        current == start && self.iter(arena).count() == self.len
    }

    fn unlink<A>(&mut self, arena: &mut A, node: K)
    where
        A: RingArena<K> + ?Sized,
    {
        let prev = prev_of(arena, node);
        let next = next_of(arena, node);

        arena.link_mut(prev).next = Some(next);
        arena.link_mut(next).prev = Some(prev);
        arena.link_mut(node).make_singleton(node);

        self.len -= 1;
        if self.len == 0 {
            self.start = None;
        } else if self.start == Some(node) {
            self.start = Some(next);
        }
    }
}

#[inline]
fn next_of<K: Copy + Eq, A: RingArena<K> + ?Sized>(arena: &A, key: K) -> K {
    arena.link(key).next().unwrap_or(key)
}

#[inline]
fn prev_of<K: Copy + Eq, A: RingArena<K> + ?Sized>(arena: &A, key: K) -> K {
    arena.link(key).prev().unwrap_or(key)
}

// =============================================================================
// Iterators
// =============================================================================

/// Borrowing traversal of a ring. Created by [`Ring::iter`].
pub struct Iter<'a, K, A: ?Sized> {
    arena: &'a A,
    start: Option<K>,
    current: Option<K>,
}

impl<'a, K: Copy + Eq, A: RingArena<K> + ?Sized> Iter<'a, K, A> {
    /// Traverses the ring containing `member`, starting there.
    pub fn from_member(arena: &'a A, member: K) -> Self {
        Iter {
            arena,
            start: Some(member),
            current: Some(member),
        }
    }
}

impl<K: Copy + Eq, A: RingArena<K> + ?Sized> Iterator for Iter<'_, K, A> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        let current = self.current?;
        let next = next_of(self.arena, current);
        self.current = if Some(next) == self.start {
            None
        } else {
            Some(next)
        };
        Some(current)
    }
}

impl<K: Copy + Eq, A: RingArena<K> + ?Sized> FusedIterator for Iter<'_, K, A> {}

/// Draining traversal of a ring. Created by [`Ring::drain`].
pub struct Drain<'a, K, A: ?Sized> {
    ring: &'a mut Ring<K>,
    arena: &'a mut A,
}

impl<K: Copy + Eq, A: RingArena<K> + ?Sized> Iterator for Drain<'_, K, A> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.ring.pop_first(&mut *self.arena)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.ring.len, Some(self.ring.len))
    }
}

impl<K: Copy + Eq, A: RingArena<K> + ?Sized> ExactSizeIterator for Drain<'_, K, A> {}

impl<K: Copy + Eq, A: RingArena<K> + ?Sized> FusedIterator for Drain<'_, K, A> {}

// =============================================================================
// Tests
// =============================================================================
