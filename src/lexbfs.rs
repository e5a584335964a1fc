use crate::graph::{Graph, Vertex};

/// Output of the extended lexicographic BFS.
///
/// All four arrays are indexed by *position* in the visit order, not by vertex.
/// `lex_label[i]` lists the earlier-visited neighbours that contributed to position
/// i's label, in visit order; slices of the decomposition are recovered from
/// `xslice_len` by walking positions forward.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LexBfs {
    /// `sigma[i]` is the i-th vertex visited.
    pub sigma: Vec<Vertex>,
    /// `sigma_inv[sigma[i]] == i`.
    pub sigma_inv: Vec<usize>,
    /// Size of the slice starting at position i (the part containing i when it was
    /// emitted, including i itself).
    pub xslice_len: Vec<usize>,
    /// Per position, the vertices appended while refining, i.e. the lexicographic
    /// label restricted to visited vertices.
    pub lex_label: Vec<Vec<Vertex>>,
}

// parts are contiguous runs of positions; refinement only ever splits a sub-part off
// the front, so (start, len) records suffice
#[derive(Clone, Copy, Debug)]
struct Part {
    start: usize,
    len: usize,
}

impl Graph {
    /// Single-pass LexBFS via lazy partition refinement, O(n + m).
    ///
    /// The visit order starts from vertex 0 and ties are broken by the initial
    /// ordering `0, 1, …, n-1`, which keeps the whole decomposition deterministic.
    pub fn lex_bfs(&self) -> LexBfs {
        let n = self.len();
        let mut sigma: Vec<Vertex> = (0..n).collect();
        let mut sigma_inv: Vec<usize> = (0..n).collect();
        let mut xslice_len = vec![0; n];
        let mut lex_label: Vec<Vec<Vertex>> = vec![Vec::new(); n];

        if n == 0 {
            return LexBfs { sigma, sigma_inv, xslice_len, lex_label };
        }

        let mut parts = vec![Part { start: 0, len: n }];
        let mut part_of = vec![0usize; n];
        // sub-part split off a part during the current step; ids below
        // `parts_before` are left over from earlier steps and treated as stale
        let mut subpart = vec![0usize];

        for i in 0..n {
            let p = part_of[i];
            debug_assert_eq!(parts[p].start, i, "visited position must head its part");
            xslice_len[i] = parts[p].len;
            parts[p].start += 1;
            parts[p].len -= 1;

            let parts_before = parts.len();
            let vertex = sigma[i];
            for &neighbour in self.neighbours(vertex) {
                let j = sigma_inv[neighbour];
                if j <= i {
                    continue;
                }
                lex_label[j].push(vertex);

                let refined = part_of[j];
                if subpart[refined] < parts_before {
                    subpart[refined] = parts.len();
                    parts.push(Part { start: parts[refined].start, len: 0 });
                    subpart.push(0);
                }
                let target = subpart[refined];

                // move j to the head of its part and hand the head position over to
                // the sub-part; the sub-part stays contiguous right in front of the
                // refined part's remainder
                let head = parts[refined].start;
                sigma.swap(head, j);
                lex_label.swap(head, j);
                sigma_inv[sigma[head]] = head;
                sigma_inv[sigma[j]] = j;
                part_of[head] = target;
                parts[target].len += 1;
                parts[refined].start += 1;
                parts[refined].len -= 1;
            }
        }

        LexBfs { sigma, sigma_inv, xslice_len, lex_label }
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64;

    use super::*;
    use crate::graph::Graph;

    fn random_graph(rng: &mut impl Rng, n: usize, density: f64) -> Graph {
        let mut graph = Graph::new(n);
        for a in 0..n {
            for b in a + 1..n {
                if rng.gen_bool(density) {
                    graph.add_edge(a, b).unwrap();
                }
            }
        }
        graph
    }

    /// The classic LexBFS ordering property: a < b < c with (a, c) an edge but
    /// (b, c) not implies some d < a adjacent to b but not to c.
    fn assert_lexbfs_property(graph: &Graph, order: &LexBfs) {
        let n = graph.len();
        for a in 0..n {
            for b in a + 1..n {
                for c in b + 1..n {
                    let (va, vb, vc) = (order.sigma[a], order.sigma[b], order.sigma[c]);
                    if !(graph.has_edge(va, vc) && !graph.has_edge(vb, vc)) {
                        continue;
                    }
                    let witness = (0..a).any(|d| {
                        let vd = order.sigma[d];
                        graph.has_edge(vd, vb) && !graph.has_edge(vd, vc)
                    });
                    assert!(witness, "no witness for positions {a} < {b} < {c}");
                }
            }
        }
    }

    fn assert_consistent(graph: &Graph, order: &LexBfs) {
        let n = graph.len();
        let mut seen = vec![false; n];
        for (i, &vertex) in order.sigma.iter().enumerate() {
            assert!(!seen[vertex]);
            seen[vertex] = true;
            assert_eq!(order.sigma_inv[vertex], i);
        }
        // labels hold exactly the earlier neighbours, in visit order
        for (i, label) in order.lex_label.iter().enumerate() {
            let mut last = None;
            for &contributor in label {
                let j = order.sigma_inv[contributor];
                assert!(j < i);
                assert!(graph.has_edge(order.sigma[i], contributor));
                if let Some(last) = last {
                    assert!(j > last);
                }
                last = Some(j);
            }
            let expected =
                graph.neighbours(order.sigma[i]).iter().filter(|&&u| order.sigma_inv[u] < i).count();
            assert_eq!(label.len(), expected);
        }
    }

    #[test]
    fn empty_and_singleton() {
        assert_eq!(Graph::new(0).lex_bfs(), LexBfs::default());
        let order = Graph::new(1).lex_bfs();
        assert_eq!(order.sigma, vec![0]);
        assert_eq!(order.xslice_len, vec![1]);
    }

    #[test]
    fn path_order() {
        // path 0-1-2-3: starting at 0 the order follows the path
        let graph = Graph::from_edges(4, [(0, 1), (1, 2), (2, 3)]).unwrap();
        let order = graph.lex_bfs();
        assert_eq!(order.sigma, vec![0, 1, 2, 3]);
        assert_eq!(order.xslice_len, vec![4, 3, 2, 1]);
        assert_eq!(order.lex_label, vec![vec![], vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn star_slices() {
        let graph = Graph::from_edges(5, [(0, 1), (0, 2), (0, 3), (0, 4)]).unwrap();
        let order = graph.lex_bfs();
        assert_eq!(order.sigma, vec![0, 1, 2, 3, 4]);
        // all leaves end up in one slice labelled by the centre
        assert_eq!(order.xslice_len, vec![5, 4, 3, 2, 1]);
        for position in 1..5 {
            assert_eq!(order.lex_label[position], vec![0]);
        }
    }

    #[test]
    fn refinement_splits_by_adjacency() {
        // 0-1, 0-2, 1-3: after visiting 0, position of {1, 2} precedes {3}; after
        // visiting 1, vertex 3 gains a label entry
        let graph = Graph::from_edges(4, [(0, 1), (0, 2), (1, 3)]).unwrap();
        let order = graph.lex_bfs();
        assert_eq!(order.sigma[0], 0);
        let visited: Vec<_> = order.sigma[1..3].to_vec();
        assert!(visited.contains(&1) && visited.contains(&2));
        assert_eq!(order.sigma[3], 3);
        assert_eq!(order.lex_label[3], vec![1]);
    }

    #[test]
    fn random_graphs_satisfy_the_ordering_property() {
        let rng = &mut Pcg64::seed_from_u64(0x1eb);
        for _ in 0..40 {
            let n = rng.gen_range(1..24);
            let density = rng.gen_range(0.05..0.95);
            let graph = random_graph(rng, n, density);
            let order = graph.lex_bfs();
            assert_consistent(&graph, &order);
            assert_lexbfs_property(&graph, &order);
        }
    }
}
