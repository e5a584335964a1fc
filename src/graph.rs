use hashbrown::HashSet;
use indexmap::IndexSet;

use crate::error::Error;

// the aliases are mostly documentation; positions into the LexBFS order get their own
// name so that signatures distinguish "vertex" from "index into sigma"
pub type Vertex = usize;
pub type Edge = (Vertex, Vertex);
pub type Label = usize;

pub type Neighbourhood = HashSet<Vertex>;

/// Undirected simple graph on the vertices `0..n`, read-only once built.
///
/// Self-loops are silently ignored and duplicate insertions are idempotent, so the
/// structure can be fed straight from a deduplicated-or-not edge stream. Out-of-range
/// endpoints are rejected with [Error::InvalidVertex].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Graph {
    nodes: Vec<Neighbourhood>,
}

impl Graph {
    pub fn new(n: usize) -> Self {
        Self { nodes: vec![Neighbourhood::new(); n] }
    }

    pub fn from_edges(
        n: usize,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Result<Self, Error> {
        let mut graph = Self::new(n);
        for (a, b) in edges {
            graph.add_edge(a, b)?;
        }
        Ok(graph)
    }

    /// Build a graph from edges over arbitrary `usize` labels, compacting them to
    /// `0..n` in first-seen order. The returned table maps each vertex back to its
    /// label.
    pub fn from_edge_labels(
        edges: impl IntoIterator<Item = (Label, Label)>,
    ) -> (Self, Vec<Label>) {
        let mut labels: IndexSet<Label> = IndexSet::new();
        let mut compacted = Vec::new();
        for (a, b) in edges {
            let a = labels.insert_full(a).0;
            let b = labels.insert_full(b).0;
            compacted.push((a, b));
        }
        let mut graph = Self::new(labels.len());
        for (a, b) in compacted {
            // indices from the IndexSet are dense, so this cannot fail
            let _ = graph.add_edge(a, b);
        }
        (graph, labels.into_iter().collect())
    }

    pub fn add_edge(&mut self, a: Vertex, b: Vertex) -> Result<(), Error> {
        let order = self.nodes.len();
        for vertex in [a, b] {
            if vertex >= order {
                return Err(Error::InvalidVertex { vertex, order });
            }
        }
        if a == b {
            return Ok(());
        }
        self.nodes[a].insert(b);
        self.nodes[b].insert(a);
        Ok(())
    }

    #[inline]
    pub fn has_edge(&self, a: Vertex, b: Vertex) -> bool {
        self.nodes.get(a).is_some_and(|neighbours| neighbours.contains(&b))
    }

    #[inline]
    pub fn neighbours(&self, vertex: Vertex) -> &Neighbourhood {
        &self.nodes[vertex]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn degree(&self, vertex: Vertex) -> usize {
        self.nodes[vertex].len()
    }

    /// Each undirected edge exactly once, with `edge.0 < edge.1`.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.nodes.iter().enumerate().flat_map(|(vertex, neighbours)| {
            neighbours
                .iter()
                .filter(move |&&other| vertex < other)
                .map(move |&other| (vertex, other))
        })
    }

    pub fn num_edges(&self) -> usize {
        self.nodes.iter().map(HashSet::len).sum::<usize>() / 2
    }
}
