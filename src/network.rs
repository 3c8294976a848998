use std::collections::HashMap;

use log::debug;
use petgraph::graph::NodeIndex;
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Graph};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: i64,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Link {
    pub weight: Option<f64>,
}

/// A loaded graph. Nodes are addressed by their position `0..N-1`, which is
/// the order in which they were read.
///
/// Edges are always stored with the direction they were read in. Whether this
/// direction is meaningful is decided by [`Network::is_directed`].
#[derive(Debug, Clone)]
pub struct Network {
    pub graph: Graph<Node, Link, Directed>,
    directed: bool,
}

impl Network {
    pub fn new(directed: bool) -> Self {
        Network {
            graph: Graph::new(),
            directed,
        }
    }

    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        self.graph.add_node(node)
    }

    pub fn add_edge(&mut self, source: NodeIndex, target: NodeIndex, link: Link) {
        self.graph.add_edge(source, target, link);
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Source and target node of every edge, in edge order.
    ///
    /// Undirected edges report the endpoint with the smaller index first.
    pub fn endpoints(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph.edge_references().map(move |e| {
            let (s, t) = (e.source().index(), e.target().index());
            if self.directed || s <= t {
                (s, t)
            } else {
                (t, s)
            }
        })
    }

    /// Neighbor lists ignoring edge direction. Self-loops are left out,
    /// parallel edges are listed once per edge.
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.node_count()];
        for e in self.graph.edge_references() {
            let (s, t) = (e.source().index(), e.target().index());
            if s != t {
                adjacency[s].push(t);
                adjacency[t].push(s);
            }
        }
        adjacency
    }

    /// Representative of the weakly connected component of each node.
    fn component_labels(&self) -> Vec<usize> {
        let mut components = UnionFind::new(self.node_count());
        for e in self.graph.edge_references() {
            components.union(e.source().index(), e.target().index());
        }
        components.into_labeling()
    }

    pub fn component_count(&self) -> usize {
        let mut labels = self.component_labels();
        labels.sort_unstable();
        labels.dedup();
        labels.len()
    }

    pub fn is_connected(&self) -> bool {
        self.component_count() <= 1
    }

    /// Induced subgraph of the largest weakly connected component.
    ///
    /// If several components have the same size, the one containing the node
    /// with the lowest index wins. Node and edge order is preserved.
    pub fn giant(&self) -> Result<Network> {
        if self.node_count() == 0 {
            return Err(Error::EmptyGraph);
        }
        let labels = self.component_labels();

        let mut sizes: HashMap<usize, usize> = HashMap::new();
        for &label in &labels {
            *sizes.entry(label).or_default() += 1;
        }
        let mut giant: Option<(usize, usize)> = None;
        for &label in &labels {
            let size = sizes[&label];
            if giant.map_or(true, |(_, best)| size > best) {
                giant = Some((label, size));
            }
        }
        let (giant_label, giant_size) = giant.ok_or(Error::EmptyGraph)?;
        debug!(
            "found {} components, the largest one has {} of {} nodes",
            sizes.len(),
            giant_size,
            self.node_count()
        );

        let graph = self.graph.filter_map(
            |idx, node| (labels[idx.index()] == giant_label).then(|| node.clone()),
            |_, link| Some(link.clone()),
        );
        Ok(Network {
            graph,
            directed: self.directed,
        })
    }
}
