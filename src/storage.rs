//! Arena storage for heap nodes
//!
//! Every node of a [`FibonacciHeap`](crate::fibonacci::FibonacciHeap) lives in a
//! single [`SlotMap`]. Ring links, parent links and child rings are all slotmap
//! keys, so the node graph has no ownership cycles and stale keys are detected
//! by the slotmap's generation counter instead of dangling.

use circular_ring::{Ring, RingArena, RingLink};
use slotmap::{new_key_type, SlotMap};
use std::mem;
use std::ops::{Index, IndexMut};

new_key_type! {
    /// Arena key of a heap node
    pub struct NodeKey;
}

/// A heap node: key, value, tree links and the mark bit
#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Position in whichever ring currently holds this node
    pub(crate) link: RingLink<NodeKey>,
    /// Non-owning back-reference; `None` for roots
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Ring<NodeKey>,
    pub(crate) marked: bool,
}

impl<K, V> Node<K, V> {
    pub(crate) fn new(key: K, value: V) -> Self {
        Node {
            key,
            value,
            link: RingLink::new(),
            parent: None,
            children: Ring::new(),
            marked: false,
        }
    }

    /// Number of children, read live from the child ring
    #[inline]
    pub(crate) fn degree(&self) -> usize {
        self.children.len()
    }

    /// Rewrites every key this node holds; used when re-homing into another arena
    pub(crate) fn remap(&mut self, mut f: impl FnMut(NodeKey) -> NodeKey) {
        self.link = self.link.map_keys(&mut f);
        self.parent = self.parent.map(&mut f);
        self.children = self.children.map_keys(f);
    }
}

/// SlotMap-backed node arena
#[derive(Debug)]
pub(crate) struct NodeArena<K, V> {
    nodes: SlotMap<NodeKey, Node<K, V>>,
}

impl<K, V> Default for NodeArena<K, V> {
    fn default() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }
}

impl<K, V> NodeArena<K, V> {
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub(crate) fn insert(&mut self, node: Node<K, V>) -> NodeKey {
        self.nodes.insert(node)
    }

    #[inline]
    pub(crate) fn remove(&mut self, key: NodeKey) -> Option<Node<K, V>> {
        self.nodes.remove(key)
    }

    #[inline]
    pub(crate) fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    #[inline]
    pub(crate) fn get(&self, key: NodeKey) -> Option<&Node<K, V>> {
        self.nodes.get(key)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, key: NodeKey) -> Option<&mut Node<K, V>> {
        self.nodes.get_mut(key)
    }

    pub(crate) fn drain(&mut self) -> impl Iterator<Item = (NodeKey, Node<K, V>)> + '_ {
        self.nodes.drain()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Runs `f` on `owner`'s child ring with the whole arena available.
    ///
    /// The ring is detached from its owner for the duration of the call, so
    /// `owner`'s degree reads as zero inside `f`.
    pub(crate) fn with_children<R>(
        &mut self,
        owner: NodeKey,
        f: impl FnOnce(&mut Ring<NodeKey>, &mut Self) -> R,
    ) -> R {
        let mut children = mem::take(&mut self[owner].children);
        let out = f(&mut children, self);
        self[owner].children = children;
        out
    }
}

impl<K, V> Index<NodeKey> for NodeArena<K, V> {
    type Output = Node<K, V>;

    #[inline]
    fn index(&self, key: NodeKey) -> &Node<K, V> {
        &self.nodes[key]
    }
}

impl<K, V> IndexMut<NodeKey> for NodeArena<K, V> {
    #[inline]
    fn index_mut(&mut self, key: NodeKey) -> &mut Node<K, V> {
        &mut self.nodes[key]
    }
}

impl<K, V> RingArena<NodeKey> for NodeArena<K, V> {
    #[inline]
    fn link(&self, key: NodeKey) -> &RingLink<NodeKey> {
        &self.nodes[key].link
    }

    #[inline]
    fn link_mut(&mut self, key: NodeKey) -> &mut RingLink<NodeKey> {
        &mut self.nodes[key].link
    }
}
