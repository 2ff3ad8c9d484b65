//! Single-source shortest paths (Dijkstra) over an explicit weighted digraph
//!
//! The algorithm touches the heap only through [`DecreaseKeyHeap`]: every
//! vertex is inserted up front, the closest one is extracted, and neighbours
//! that get closer have their key lowered with `decrease_key`.
//!
//! The heap has no notion of infinity. Unreached vertices are keyed with
//! [`Distance::Unreachable`], which compares greater than every finite distance.
//!
//! # Example
//!
//! ```rust
//! use rust_fibonacci_heap::shortest_path::{dijkstra, Distance, Graph};
//!
//! let graph: Graph<u32, u32> = [(1, 2, 2), (1, 3, 1), (2, 4, 1), (3, 4, 1), (4, 5, 2)]
//!     .into_iter()
//!     .collect();
//!
//! let paths = dijkstra(&graph, &1).unwrap();
//! assert_eq!(paths.distance(&4), Some(Distance::Finite(2)));
//! assert_eq!(paths.distance(&5), Some(Distance::Finite(4)));
//! assert_eq!(paths.path_to(&5), Some(vec![1, 3, 4, 5]));
//! ```

use crate::error::HeapError;
use crate::fibonacci::FibonacciHeap;
use crate::traits::DecreaseKeyHeap;
use rustc_hash::FxHashMap;
use std::fmt;
use num_traits::CheckedAdd;
use std::hash::Hash;
use thiserror::Error;

/// Trait for types that can be used as edge weights.
///
/// `Default` must be the zero weight; anything below it is negative.
/// Path lengths are summed with `checked_add`, so a sum that does not fit
/// is reported instead of wrapping.
pub trait Weight: Ord + Copy + CheckedAdd + Default {}

impl<T> Weight for T where T: Ord + Copy + CheckedAdd + Default {}

/// Distance from the source, with an explicit "not reached" sentinel.
///
/// Variant order makes `Unreachable` greater than every `Finite` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Distance<W> {
    /// Reached at this total weight
    Finite(W),
    /// No path from the source
    Unreachable,
}

impl<W> Distance<W> {
    /// The finite distance, if any
    pub fn finite(self) -> Option<W> {
        match self {
            Distance::Finite(w) => Some(w),
            Distance::Unreachable => None,
        }
    }

    /// True for `Finite`
    pub fn is_reachable(&self) -> bool {
        matches!(self, Distance::Finite(_))
    }
}

impl<W: fmt::Display> fmt::Display for Distance<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Finite(w) => fmt::Display::fmt(w, f),
            Distance::Unreachable => f.pad("unreachable"),
        }
    }
}

/// Errors from [`dijkstra`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortestPathError<V: fmt::Debug, W: fmt::Debug> {
    /// The graph has an edge with weight below zero
    #[error(
        "edge ({from:?}, {to:?}) has weight {weight:?}, but Dijkstra's algorithm requires non-negative weights"
    )]
    NegativeWeight {
        /// Tail of the offending edge
        from: V,
        /// Head of the offending edge
        to: V,
        /// The negative weight
        weight: W,
    },
    /// A path length does not fit in the weight type
    #[error("path length through edge ({from:?}, {to:?}) overflows the weight type")]
    Overflow {
        /// Tail of the edge whose relaxation overflowed
        from: V,
        /// Head of the edge whose relaxation overflowed
        to: V,
    },
    /// The heap rejected an operation
    #[error(transparent)]
    Heap(#[from] HeapError),
}

/// A directed graph with weighted edges.
///
/// Vertices are the endpoints of the edges plus any added explicitly. Adding
/// an edge that already exists overwrites its weight.
#[derive(Debug, Clone)]
pub struct Graph<V, W> {
    vertices: Vec<V>,
    index: FxHashMap<V, usize>,
    adjacency: Vec<Vec<(usize, W)>>,
    edge_count: usize,
}

impl<V, W> Default for Graph<V, W> {
    fn default() -> Self {
        Graph {
            vertices: Vec::new(),
            index: FxHashMap::default(),
            adjacency: Vec::new(),
            edge_count: 0,
        }
    }
}

impl<V: Clone + Eq + Hash, W: Copy> Graph<V, W> {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from `(from, to, weight)` triples
    pub fn from_edges(edges: impl IntoIterator<Item = (V, V, W)>) -> Self {
        edges.into_iter().collect()
    }

    /// Adds a vertex (no-op if present) and returns its dense index
    pub fn add_vertex(&mut self, vertex: V) -> usize {
        if let Some(&i) = self.index.get(&vertex) {
            return i;
        }
        let i = self.vertices.len();
        self.vertices.push(vertex.clone());
        self.index.insert(vertex, i);
        self.adjacency.push(Vec::new());
        i
    }

    /// Adds the edge `from -> to`, overwriting any previous weight
    pub fn add_edge(&mut self, from: V, to: V, weight: W) -> &mut Self {
        let a = self.add_vertex(from);
        let b = self.add_vertex(to);
        let out = &mut self.adjacency[a];
        match out.iter_mut().find(|(head, _)| *head == b) {
            Some(edge) => edge.1 = weight,
            None => {
                out.push((b, weight));
                self.edge_count += 1;
            }
        }
        self
    }

    /// True if `vertex` is in the graph
    pub fn contains_vertex(&self, vertex: &V) -> bool {
        self.index.contains_key(vertex)
    }

    /// All vertices, in insertion order
    pub fn vertices(&self) -> impl Iterator<Item = &V> + '_ {
        self.vertices.iter()
    }

    /// All edges as `(from, to, weight)`
    pub fn edges(&self) -> impl Iterator<Item = (&V, &V, W)> + '_ {
        self.adjacency.iter().enumerate().flat_map(move |(a, out)| {
            out.iter()
                .map(move |&(b, w)| (&self.vertices[a], &self.vertices[b], w))
        })
    }

    /// Out-neighbours of `vertex` with edge weights; empty for unknown vertices
    pub fn neighbours<'a>(&'a self, vertex: &V) -> impl Iterator<Item = (&'a V, W)> + 'a {
        let out: &'a [(usize, W)] = match self.index.get(vertex) {
            Some(&i) => &self.adjacency[i],
            None => &[],
        };
        out.iter().map(move |&(b, w)| (&self.vertices[b], w))
    }

    /// Weight of the edge `from -> to`, if it exists
    pub fn weight(&self, from: &V, to: &V) -> Option<W> {
        let a = *self.index.get(from)?;
        let b = *self.index.get(to)?;
        self.adjacency[a]
            .iter()
            .find(|(head, _)| *head == b)
            .map(|&(_, w)| w)
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of distinct edges
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}

impl<V: Clone + Eq + Hash, W: Copy> FromIterator<(V, V, W)> for Graph<V, W> {
    fn from_iter<I: IntoIterator<Item = (V, V, W)>>(iter: I) -> Self {
        let mut graph = Graph::new();
        for (from, to, weight) in iter {
            graph.add_edge(from, to, weight);
        }
        graph
    }
}

/// Result of a single-source shortest-path run
#[derive(Debug, Clone)]
pub struct ShortestPaths<V, W> {
    source: usize,
    vertices: Vec<V>,
    index: FxHashMap<V, usize>,
    distances: Vec<Distance<W>>,
    came_from: Vec<Option<usize>>,
}

impl<V: Clone + Eq + Hash, W: Copy> ShortestPaths<V, W> {
    /// The source vertex
    pub fn source(&self) -> &V {
        &self.vertices[self.source]
    }

    /// Distance to `vertex`, or `None` if the vertex is unknown
    pub fn distance(&self, vertex: &V) -> Option<Distance<W>> {
        self.index.get(vertex).map(|&i| self.distances[i])
    }

    /// The vertex before `vertex` on a shortest path
    pub fn predecessor(&self, vertex: &V) -> Option<&V> {
        let i = *self.index.get(vertex)?;
        self.came_from[i].map(|p| &self.vertices[p])
    }

    /// Vertices of a shortest path from the source to `vertex`, inclusive.
    ///
    /// `None` if `vertex` is unknown or unreachable.
    pub fn path_to(&self, vertex: &V) -> Option<Vec<V>> {
        let mut current = *self.index.get(vertex)?;
        if !self.distances[current].is_reachable() {
            return None;
        }

        let mut path = vec![self.vertices[current].clone()];
        while let Some(prev) = self.came_from[current] {
            path.push(self.vertices[prev].clone());
            current = prev;
        }
        path.reverse();
        Some(path)
    }

    /// Every vertex with its distance, in graph order
    pub fn iter(&self) -> impl Iterator<Item = (&V, Distance<W>)> + '_ {
        self.vertices.iter().zip(self.distances.iter().copied())
    }

    /// Only the vertices reached from the source, with their distances
    pub fn reachable(&self) -> impl Iterator<Item = (&V, W)> + '_ {
        self.iter().filter_map(|(v, d)| d.finite().map(|w| (v, w)))
    }

    /// Number of vertices covered
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// True if no vertex is covered
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Runs Dijkstra's algorithm from `source` using a [`FibonacciHeap`].
///
/// A source that is not in the graph is still reported, at distance zero.
///
/// # Errors
/// - [`ShortestPathError::NegativeWeight`] if any edge weight is below zero.
///   This is checked before the heap is created.
/// - [`ShortestPathError::Overflow`] if a reachable path length does not fit in `W`.
pub fn dijkstra<V, W>(
    graph: &Graph<V, W>,
    source: &V,
) -> Result<ShortestPaths<V, W>, ShortestPathError<V, W>>
where
    V: Clone + Eq + Hash + fmt::Debug,
    W: Weight + fmt::Debug,
{
    dijkstra_with::<V, W, FibonacciHeap<Distance<W>, usize>>(graph, source)
}

/// Runs Dijkstra's algorithm from `source` with any decrease-key heap.
///
/// # Errors
/// Same as [`dijkstra`], plus [`ShortestPathError::Heap`] if the heap rejects
/// a `decrease_key`.
#[tracing::instrument(
    skip_all,
    fields(vertices = graph.vertex_count(), edges = graph.edge_count())
)]
pub fn dijkstra_with<V, W, H>(
    graph: &Graph<V, W>,
    source: &V,
) -> Result<ShortestPaths<V, W>, ShortestPathError<V, W>>
where
    V: Clone + Eq + Hash + fmt::Debug,
    W: Weight + fmt::Debug,
    H: DecreaseKeyHeap<Distance<W>, usize>,
{
    let zero = W::default();
    if let Some((from, to, weight)) = graph.edges().find(|&(_, _, w)| w < zero) {
        tracing::debug!(?from, ?to, ?weight, "rejecting negative edge weight");
        return Err(ShortestPathError::NegativeWeight {
            from: from.clone(),
            to: to.clone(),
            weight,
        });
    }

    let mut vertices = graph.vertices.clone();
    let mut index = graph.index.clone();
    let source_index = match index.get(source) {
        Some(&i) => i,
        None => {
            let i = vertices.len();
            vertices.push(source.clone());
            index.insert(source.clone(), i);
            i
        }
    };

    let n = vertices.len();
    let mut heap = H::new();
    let mut distances = vec![Distance::Unreachable; n];
    let mut came_from = vec![None; n];
    distances[source_index] = Distance::Finite(zero);

    let mut handles: Vec<Option<H::Handle>> = (0..n)
        .map(|v| Some(heap.push_with_handle(distances[v], v)))
        .collect();

    while let Some((distance, u)) = heap.pop() {
        handles[u] = None;
        distances[u] = distance;

        let Distance::Finite(du) = distance else {
            continue;
        };
        let Some(out) = graph.adjacency.get(u) else {
            continue;
        };

        for &(v, w) in out {
            let Some(handle) = &handles[v] else {
                continue;
            };
            let Some(sum) = du.checked_add(&w) else {
                tracing::debug!(from = ?vertices[u], to = ?vertices[v], "path length overflow");
                return Err(ShortestPathError::Overflow {
                    from: vertices[u].clone(),
                    to: vertices[v].clone(),
                });
            };
            let candidate = Distance::Finite(sum);
            if candidate < distances[v] {
                heap.decrease_key(handle, candidate)?;
                distances[v] = candidate;
                came_from[v] = Some(u);
            }
        }
    }

    let reached = distances.iter().filter(|d| d.is_reachable()).count();
    tracing::debug!(reached, total = n, "shortest paths settled");

    Ok(ShortestPaths {
        source: source_index,
        vertices,
        index,
        distances,
        came_from,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_ordering() {
        assert!(Distance::Finite(u64::MAX) < Distance::Unreachable);
        assert!(Distance::Finite(1) < Distance::Finite(2));
        assert_eq!(Distance::Finite(3).finite(), Some(3));
        assert_eq!(Distance::<u32>::Unreachable.finite(), None);
        assert_eq!(Distance::Finite(7).to_string(), "7");
        assert_eq!(Distance::<u32>::Unreachable.to_string(), "unreachable");
    }

    #[test]
    fn test_graph_construction() {
        let mut graph = Graph::new();
        graph.add_edge("a", "b", 1).add_edge("a", "c", 4).add_edge("a", "b", 2);

        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.weight(&"a", &"b"), Some(2));
        assert_eq!(graph.weight(&"b", &"a"), None);
        assert!(graph.contains_vertex(&"c"));

        let mut out: Vec<_> = graph.neighbours(&"a").collect();
        out.sort();
        assert_eq!(out, vec![(&"b", 2), (&"c", 4)]);
        assert_eq!(graph.neighbours(&"zzz").count(), 0);
    }

    #[test]
    fn test_simple_graph() {
        let graph = Graph::from_edges([(1, 2, 2), (1, 3, 1), (2, 4, 1), (3, 4, 1), (4, 5, 2)]);
        let paths = dijkstra(&graph, &1).unwrap();

        let mut got: Vec<_> = paths.reachable().map(|(v, d)| (*v, d)).collect();
        got.sort();
        assert_eq!(got, vec![(1, 0), (2, 2), (3, 1), (4, 2), (5, 4)]);
        assert_eq!(paths.source(), &1);
        assert_eq!(paths.predecessor(&1), None);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let graph = Graph::from_edges([(1, 2, 3), (2, 3, -1)]);
        let err = dijkstra(&graph, &1).unwrap_err();
        assert_eq!(
            err,
            ShortestPathError::NegativeWeight {
                from: 2,
                to: 3,
                weight: -1
            }
        );
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn test_path_length_overflow_is_reported() {
        let graph = Graph::from_edges([(1u8, 2u8, u32::MAX), (2, 3, 1u32)]);
        let err = dijkstra(&graph, &1).unwrap_err();
        assert_eq!(err, ShortestPathError::Overflow { from: 2, to: 3 });
        assert!(err.to_string().contains("overflows"));

        // A single maximal edge still fits
        let graph = Graph::from_edges([(1u8, 2u8, u32::MAX)]);
        let paths = dijkstra(&graph, &1).unwrap();
        assert_eq!(paths.distance(&2), Some(Distance::Finite(u32::MAX)));
    }

    #[test]
    fn test_unreachable_and_missing_source() {
        let graph = Graph::from_edges([("a", "b", 1u32), ("c", "d", 1)]);
        let paths = dijkstra(&graph, &"a").unwrap();
        assert_eq!(paths.distance(&"d"), Some(Distance::Unreachable));
        assert_eq!(paths.path_to(&"d"), None);
        assert_eq!(paths.distance(&"nope"), None);

        let paths = dijkstra(&graph, &"z").unwrap();
        assert_eq!(paths.len(), 5);
        assert_eq!(paths.distance(&"z"), Some(Distance::Finite(0)));
        assert_eq!(paths.reachable().count(), 1);
    }
}
