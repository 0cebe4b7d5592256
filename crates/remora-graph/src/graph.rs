use std::collections::VecDeque;

use rustc_hash::FxBuildHasher;

use crate::table::ItemData;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

/// Directional endpoint pair used as the edge-map key.
///
/// The key stores ids in registration direction; undirected lookups probe
/// both orders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    pub from: String,
    pub to: String,
}

#[derive(Clone, Copy, Hash)]
struct EdgeKeyView<'a> {
    from: &'a str,
    to: &'a str,
}

impl<'a> hashbrown::Equivalent<EdgeKey> for EdgeKeyView<'a> {
    fn equivalent(&self, key: &EdgeKey) -> bool {
        key.from == self.from && key.to == self.to
    }
}

/// A node endpoint argument: either an arena index or an id.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Index(usize),
    Id(&'a str),
}

impl From<usize> for NodeRef<'_> {
    fn from(index: usize) -> Self {
        NodeRef::Index(index)
    }
}

impl<'a> From<&'a str> for NodeRef<'a> {
    fn from(id: &'a str) -> Self {
        NodeRef::Id(id)
    }
}

/// Edge set to follow during traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    All,
    In,
    Out,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    /// Position in the backing table's filtered view, `None` when filtered out.
    pub data_index: Option<usize>,
    /// All incident edges (a self-loop appears once).
    pub edges: Vec<usize>,
    /// Incoming edges; populated only for directed graphs.
    pub in_edges: Vec<usize>,
    /// Outgoing edges; populated only for directed graphs.
    pub out_edges: Vec<usize>,
}

impl Node {
    fn new(id: String, data_index: Option<usize>) -> Self {
        Self {
            id,
            data_index,
            edges: Vec::new(),
            in_edges: Vec::new(),
            out_edges: Vec::new(),
        }
    }

    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    pub fn in_degree(&self) -> usize {
        self.in_edges.len()
    }

    pub fn out_degree(&self) -> usize {
        self.out_edges.len()
    }
}

#[derive(Debug, Clone)]
pub struct Edge {
    /// Source endpoint (arena index) when the graph is directed.
    pub node1: usize,
    /// Target endpoint (arena index) when the graph is directed.
    pub node2: usize,
    pub data_index: Option<usize>,
}

impl Edge {
    pub fn is_self_loop(&self) -> bool {
        self.node1 == self.node2
    }
}

/// Active node and edge data indices adjacent to an item, consumed by
/// adjacency-highlight features.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacentIndices {
    pub node: Vec<usize>,
    pub edge: Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    directed: bool,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    node_index: HashMap<String, usize>,
    edge_index: HashMap<EdgeKey, usize>,
}

impl Graph {
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            ..Default::default()
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Registers a node and returns its arena index, or `None` when the id is
    /// already taken (the graph is left unchanged).
    pub fn add_node(&mut self, id: impl Into<String>, data_index: Option<usize>) -> Option<usize> {
        let id = id.into();
        if self.node_index.contains_key(id.as_str()) {
            tracing::warn!(id = %id, "graph nodes have a duplicate id");
            return None;
        }
        let index = self.nodes.len();
        self.node_index.insert(id.clone(), index);
        self.nodes.push(Node::new(id, data_index));
        Some(index)
    }

    fn resolve(&self, node: NodeRef<'_>) -> Option<usize> {
        match node {
            NodeRef::Index(index) => (index < self.nodes.len()).then_some(index),
            NodeRef::Id(id) => self.node_index.get(id).copied(),
        }
    }

    /// Registers an edge between two existing nodes and returns its arena
    /// index, or `None` when either endpoint cannot be resolved.
    pub fn add_edge<'a>(
        &mut self,
        node1: impl Into<NodeRef<'a>>,
        node2: impl Into<NodeRef<'a>>,
        data_index: Option<usize>,
    ) -> Option<usize> {
        let n1 = self.resolve(node1.into())?;
        let n2 = self.resolve(node2.into())?;

        let index = self.edges.len();
        self.edges.push(Edge {
            node1: n1,
            node2: n2,
            data_index,
        });

        if self.directed {
            self.nodes[n1].out_edges.push(index);
            self.nodes[n2].in_edges.push(index);
        }
        self.nodes[n1].edges.push(index);
        if n1 != n2 {
            self.nodes[n2].edges.push(index);
        }

        let key = EdgeKey {
            from: self.nodes[n1].id.clone(),
            to: self.nodes[n2].id.clone(),
        };
        self.edge_index.insert(key, index);
        Some(index)
    }

    pub fn node_by_id(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    /// Looks up an edge by its endpoint ids. Directed graphs match the
    /// registration direction only; undirected graphs probe both orders.
    pub fn get_edge(&self, node1: &str, node2: &str) -> Option<usize> {
        let forward = EdgeKeyView {
            from: node1,
            to: node2,
        };
        let found = self.edge_index.get(&forward).copied();
        if found.is_some() || self.directed {
            return found;
        }
        let reverse = EdgeKeyView {
            from: node2,
            to: node1,
        };
        self.edge_index.get(&reverse).copied()
    }

    /// Maps a node data index to its arena entry through the backing table's
    /// raw-index translation. O(1).
    pub fn node_by_data_index<M, L>(
        &self,
        data_index: usize,
        table: &ItemData<M, L>,
    ) -> Option<&Node> {
        let raw = table.raw_index(data_index)?;
        self.nodes.get(raw)
    }

    /// Maps an edge data index to its arena entry. O(1).
    pub fn edge_by_data_index<M, L>(
        &self,
        data_index: usize,
        table: &ItemData<M, L>,
    ) -> Option<&Edge> {
        let raw = table.raw_index(data_index)?;
        self.edges.get(raw)
    }

    /// Visits active nodes in registration order.
    pub fn each_node(&self, mut cb: impl FnMut(&Node)) {
        for node in &self.nodes {
            if node.data_index.is_some() {
                cb(node);
            }
        }
    }

    /// Visits active edges (both endpoints active too) in registration order.
    /// The callback receives the edge and its arena index.
    pub fn each_edge(&self, mut cb: impl FnMut(&Edge, usize)) {
        for (index, edge) in self.edges.iter().enumerate() {
            if edge.data_index.is_some()
                && self.nodes[edge.node1].data_index.is_some()
                && self.nodes[edge.node2].data_index.is_some()
            {
                cb(edge, index);
            }
        }
    }

    /// Breadth-first traversal from `start`. The callback receives the
    /// visited node and the node it was reached from; returning `true` stops
    /// the traversal immediately. The visited set is rebuilt per call.
    pub fn breadth_first_traverse<'a>(
        &self,
        start: impl Into<NodeRef<'a>>,
        direction: Direction,
        mut cb: impl FnMut(&Node, Option<&Node>) -> bool,
    ) {
        let Some(start) = self.resolve(start.into()) else {
            return;
        };

        let mut visited = vec![false; self.nodes.len()];
        visited[start] = true;
        if cb(&self.nodes[start], None) {
            return;
        }

        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            let edge_list = match direction {
                Direction::Out => &self.nodes[current].out_edges,
                Direction::In => &self.nodes[current].in_edges,
                Direction::All => &self.nodes[current].edges,
            };
            for &edge_index in edge_list {
                let edge = &self.edges[edge_index];
                let other = if edge.node1 == current {
                    edge.node2
                } else {
                    edge.node1
                };
                if !visited[other] {
                    visited[other] = true;
                    if cb(&self.nodes[other], Some(&self.nodes[current])) {
                        return;
                    }
                    queue.push_back(other);
                }
            }
        }
    }

    /// Reconciles data indices after the node table has been filtered
    /// externally: nodes take their new view positions, edges whose
    /// endpoints dropped out are filtered from the edge table, and the
    /// remaining edges are renumbered. O(nodes + edges).
    pub fn update<NM, NL, EM, EL>(
        &mut self,
        node_data: &ItemData<NM, NL>,
        edge_data: &mut ItemData<EM, EL>,
    ) {
        for node in &mut self.nodes {
            node.data_index = None;
        }
        for data_index in 0..node_data.count() {
            if let Some(raw) = node_data.raw_index(data_index) {
                if let Some(node) = self.nodes.get_mut(raw) {
                    node.data_index = Some(data_index);
                }
            }
        }

        let nodes = &self.nodes;
        let edges = &self.edges;
        edge_data.filter_self(|_, raw| {
            edges.get(raw).is_some_and(|edge| {
                nodes[edge.node1].data_index.is_some() && nodes[edge.node2].data_index.is_some()
            })
        });

        for edge in &mut self.edges {
            edge.data_index = None;
        }
        for data_index in 0..edge_data.count() {
            if let Some(raw) = edge_data.raw_index(data_index) {
                if let Some(edge) = self.edges.get_mut(raw) {
                    edge.data_index = Some(data_index);
                }
            }
        }
    }

    /// Active data indices of the edges incident to a node and of their
    /// endpoints.
    pub fn node_adjacent_indices(&self, node_index: usize) -> AdjacentIndices {
        let mut out = AdjacentIndices::default();
        let Some(node) = self.nodes.get(node_index) else {
            return out;
        };
        for &edge_index in &node.edges {
            let edge = &self.edges[edge_index];
            let Some(edge_data_index) = edge.data_index else {
                continue;
            };
            let (Some(d1), Some(d2)) = (
                self.nodes[edge.node1].data_index,
                self.nodes[edge.node2].data_index,
            ) else {
                continue;
            };
            out.edge.push(edge_data_index);
            out.node.push(d1);
            out.node.push(d2);
        }
        out
    }

    /// Data indices of an edge and its two endpoints.
    pub fn edge_adjacent_indices(&self, edge_index: usize) -> AdjacentIndices {
        let mut out = AdjacentIndices::default();
        let Some(edge) = self.edges.get(edge_index) else {
            return out;
        };
        if let Some(d) = edge.data_index {
            out.edge.push(d);
        }
        if let Some(d) = self.nodes[edge.node1].data_index {
            out.node.push(d);
        }
        if let Some(d) = self.nodes[edge.node2].data_index {
            out.node.push(d);
        }
        out
    }
}
