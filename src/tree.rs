use hashbrown::HashSet;
use itertools::Itertools;
use petgraph::{Direction, graph::DiGraph};
use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    graph::{Graph, Vertex},
};

pub type NodeIndex = petgraph::graph::NodeIndex<u32>;

pub type TreeGraph = DiGraph<ModuleKind, ()>;

/// Kind of a node in the decomposition tree.
///
/// Internal nodes are classified by their quotient graph: complete (`Series`),
/// edgeless (`Parallel`) or neither (`Prime`). Leaves carry the vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    Prime,
    Series,
    Parallel,
    Node(Vertex),
}

/// The modular decomposition tree: a rooted tree with edges pointing from a module
/// to its submodules and the vertices of the graph as leaves.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    pub graph: TreeGraph,
    pub root: NodeIndex,
}

impl Tree {
    pub fn kind(&self, module: NodeIndex) -> ModuleKind {
        self.graph[module]
    }

    /// Children in the order the decomposition produced them.
    pub fn children(&self, module: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        // petgraph iterates outgoing edges newest-first; the builder inserts child
        // edges in reverse so this comes out in insertion order
        self.graph.neighbors_directed(module, Direction::Outgoing)
    }

    pub fn leaf_count(&self) -> usize {
        self.graph
            .node_indices()
            .filter(|&node| matches!(self.graph[node], ModuleKind::Node(_)))
            .count()
    }

    /// All vertices below `module`, via an explicit stack instead of recursion.
    pub fn module_vertices(&self, module: NodeIndex) -> Vec<Vertex> {
        if let ModuleKind::Node(vertex) = self.graph[module] {
            return vec![vertex];
        }
        let mut vertices = Vec::new();
        let mut stack = vec![self.children(module)];
        'outer: while let Some(iter) = stack.last_mut() {
            for child in iter {
                match self.graph[child] {
                    ModuleKind::Node(vertex) => vertices.push(vertex),
                    _ => {
                        stack.push(self.children(child));
                        continue 'outer;
                    },
                }
            }
            stack.pop();
        }
        vertices
    }

    /// Render as a nested expression, e.g. `SERIES[0, PARALLEL[1, 2]]`. Meant for
    /// tests and diagnostics; children appear in tree order.
    pub fn to_expression(&self) -> String {
        self.expression_of(self.root)
    }

    fn expression_of(&self, module: NodeIndex) -> String {
        let name = match self.graph[module] {
            ModuleKind::Node(vertex) => return vertex.to_string(),
            ModuleKind::Prime => "PRIME",
            ModuleKind::Series => "SERIES",
            ModuleKind::Parallel => "PARALLEL",
        };
        let children =
            self.children(module).map(|child| self.expression_of(child)).join(", ");
        format!("{name}[{children}]")
    }

    /// Verify the tree is a well-formed modular decomposition of `graph`: leaf
    /// cover, arity, merging of degenerate chains, the module law and the type law.
    pub fn check(&self, graph: &Graph) -> Result<(), Error> {
        let n = graph.len();
        let mut seen = vec![false; n];
        for node in self.graph.node_indices() {
            if let ModuleKind::Node(vertex) = self.graph[node] {
                if vertex >= n {
                    return Err(Error::Internal("leaf vertex out of range"));
                }
                if seen[vertex] {
                    return Err(Error::Internal("vertex on two leaves"));
                }
                seen[vertex] = true;
            }
        }
        if seen.iter().any(|&covered| !covered) {
            return Err(Error::Internal("vertex missing from the tree"));
        }
        self.check_module(graph, self.root)
    }

    fn check_module(&self, graph: &Graph, module: NodeIndex) -> Result<(), Error> {
        let kind = self.graph[module];
        if matches!(kind, ModuleKind::Node(_)) {
            if self.children(module).next().is_some() {
                return Err(Error::Internal("leaf with children"));
            }
            return Ok(());
        }

        let children: Vec<_> = self.children(module).collect();
        if children.len() < 2 {
            return Err(Error::Internal("internal node with fewer than two children"));
        }
        for &child in &children {
            match (kind, self.graph[child]) {
                (ModuleKind::Series, ModuleKind::Series)
                | (ModuleKind::Parallel, ModuleKind::Parallel) => {
                    return Err(Error::Internal("unmerged degenerate chain"));
                },
                _ => {},
            }
        }

        // module law: everything outside must see each child module uniformly
        for &child in &children {
            let child_vertices: HashSet<Vertex> =
                self.module_vertices(child).into_iter().collect();
            for outside in 0..graph.len() {
                if child_vertices.contains(&outside) {
                    continue;
                }
                let adjacent = child_vertices
                    .iter()
                    .filter(|&&v| graph.has_edge(outside, v))
                    .count();
                if adjacent != 0 && adjacent != child_vertices.len() {
                    return Err(Error::Internal("child is not a module"));
                }
            }
        }

        // type law on the quotient, via representatives (uniform by the module law)
        let representatives: Vec<Vertex> = children
            .iter()
            .map(|&child| self.module_vertices(child)[0])
            .collect();
        let quotient_edges = representatives
            .iter()
            .tuple_combinations()
            .filter(|(&a, &b)| graph.has_edge(a, b))
            .count();
        let pairs = children.len() * (children.len() - 1) / 2;
        let expected = match kind {
            ModuleKind::Series => quotient_edges == pairs,
            ModuleKind::Parallel => quotient_edges == 0,
            ModuleKind::Prime => quotient_edges != 0 && quotient_edges != pairs,
            ModuleKind::Node(_) => unreachable!(),
        };
        if !expected {
            return Err(Error::Internal("node kind disagrees with its quotient"));
        }

        for child in children {
            self.check_module(graph, child)?;
        }
        Ok(())
    }
}
